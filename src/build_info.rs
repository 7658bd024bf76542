//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `legends <version> <commit> (<date>)`, as printed by `--version`.
pub fn version_line() -> String {
    format!(
        "legends {} {} ({})",
        env!("CARGO_PKG_VERSION"),
        BUILD_COMMIT,
        BUILD_DATE
    )
}
