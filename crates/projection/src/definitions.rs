//! EPSG code to PROJ string lookup.
//!
//! The two fixed targets carry built-in definitions; every other code is
//! resolved through the `crs-definitions` database.

use flood_common::CrsCode;

/// WGS84 geographic, degrees.
pub const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// WGS84 geocentric cartesian, meters.
pub const ECEF_PROJ: &str = "+proj=geocent +datum=WGS84 +units=m +no_defs";

/// Get the PROJ string for an EPSG code.
///
/// Returns None when the code is not in the database.
pub fn proj_string(code: CrsCode) -> Option<String> {
    match code {
        CrsCode::WGS84 => Some(WGS84_PROJ.to_string()),
        CrsCode::ECEF => Some(ECEF_PROJ.to_string()),
        _ => crs_definitions::from_code(code.epsg()).map(|def| normalize(def.proj4)),
    }
}

/// Check whether a PROJ definition is geographic (angular units).
pub fn is_geographic(proj: &str) -> bool {
    proj.split_whitespace()
        .any(|p| p == "+proj=longlat" || p == "+proj=latlong")
}

// proj4rs rejects some PROJ 6+ only parameters
fn normalize(proj: &str) -> String {
    proj.split_whitespace()
        .filter(|p| !p.starts_with("+type="))
        .collect::<Vec<_>>()
        .join(" ")
}
