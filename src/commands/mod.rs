//! Top-level subcommand orchestration.
pub mod completions;
pub mod reset;
pub mod version;

/// Version string baked in at build time.
#[must_use]
pub fn version_string() -> &'static str {
    option_env!("CORDOVA_RESET_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
