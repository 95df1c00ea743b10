//! Build script for cordova-reset.

use std::process::Command;

fn main() {
    // CORDOVA_RESET_VERSION wins (release builds); otherwise ask git.
    if let Ok(version) = std::env::var("CORDOVA_RESET_VERSION") {
        println!("cargo:rustc-env=CORDOVA_RESET_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=CORDOVA_RESET_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=CORDOVA_RESET_VERSION");
}
