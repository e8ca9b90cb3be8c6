/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version of the `check --json` report.
/// Bump this when the JSON shape changes incompatibly.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Returns a formatted version string including build metadata if available.
#[must_use]
pub fn version_string() -> String {
    match option_env!("DEVPACK_BUILD_GIT_HASH") {
        Some(hash) => format!("devpack {VERSION} ({hash})"),
        None => format!("devpack {VERSION}"),
    }
}
