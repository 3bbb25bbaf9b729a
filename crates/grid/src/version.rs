//! Build version string
//!
//! Release builds inject `GRID_BUILD_VERS`, `GRID_BUILD_DATE` and
//! `GRID_BUILD_HASH` at compile time.

const UNTAGGED: &str = "v0.0.0";

/// Version of this binary, e.g. `v1.4.0-20240312T101500-3f2a9c1`
pub fn version() -> String {
    format_version(
        option_env!("GRID_BUILD_VERS"),
        option_env!("GRID_BUILD_DATE"),
        option_env!("GRID_BUILD_HASH"),
    )
}

/// Join the build elements with `-`.
///
/// A version that is not a `v`-prefixed tag (a build from source or an
/// untagged commit) is reported as `v0.0.0`.
pub fn format_version(vers: Option<&str>, date: Option<&str>, hash: Option<&str>) -> String {
    let mut elements = Vec::with_capacity(3);
    match vers {
        Some(vers) if vers.starts_with('v') => elements.push(vers),
        _ => elements.push(UNTAGGED),
    }
    elements.extend(date.filter(|d| !d.is_empty()));
    elements.extend(hash.filter(|h| !h.is_empty()));
    elements.join("-")
}
