//! Command: print version information.

/// Print the cordova-reset version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("cordova-reset {}", super::version_string());
}
