//! Coordinate Reference System identifiers and axis-order conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An EPSG coordinate reference system code.
///
/// The converter only ever deals with EPSG-registered systems: the source
/// CRS read from the raster, plus the two fixed targets [`CrsCode::WGS84`]
/// and [`CrsCode::ECEF`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrsCode(pub u16);

impl CrsCode {
    /// WGS84 geographic (longitude/latitude in degrees).
    pub const WGS84: CrsCode = CrsCode(4326);
    /// WGS84 Earth-Centered, Earth-Fixed cartesian (meters).
    pub const ECEF: CrsCode = CrsCode(4978);
    /// GeoTIFF marker for a user-defined (non-EPSG) system.
    pub const USER_DEFINED: u16 = 32767;

    /// Parse a CRS identifier.
    ///
    /// Accepts formats like:
    /// - "EPSG:32633"
    /// - "epsg:4326"
    /// - "4978"
    pub fn parse(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();
        let digits = normalized.strip_prefix("EPSG:").unwrap_or(&normalized);

        let code: u16 = digits
            .parse()
            .map_err(|_| CrsParseError::InvalidFormat(s.to_string()))?;

        Self::from_epsg(code)
    }

    /// Build from a raw EPSG number, rejecting the reserved values 0 and 32767.
    pub fn from_epsg(code: u16) -> Result<Self, CrsParseError> {
        if code == 0 || code == Self::USER_DEFINED {
            return Err(CrsParseError::NotEpsg(code));
        }
        Ok(CrsCode(code))
    }

    /// The numeric EPSG code.
    pub fn epsg(&self) -> u16 {
        self.0
    }

    /// The axis order the converter uses when storing coordinates in this CRS.
    ///
    /// Coordinates are always stored x-then-y; for the geographic target this
    /// means longitude before latitude.
    pub fn storage_axis_order(&self) -> AxisOrder {
        if *self == CrsCode::WGS84 {
            AxisOrder::LonLat
        } else {
            AxisOrder::XY
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// Axis order of a stored coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisOrder {
    /// X (easting), Y (northing)
    XY,
    /// Longitude, latitude
    LonLat,
}

impl AxisOrder {
    /// The format string recorded in run metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisOrder::XY => "x,y",
            AxisOrder::LonLat => "lon,lat",
        }
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Invalid CRS identifier: {0}")]
    InvalidFormat(String),

    #[error("CRS code {0} is not an EPSG-registered system")]
    NotEpsg(u16),
}
