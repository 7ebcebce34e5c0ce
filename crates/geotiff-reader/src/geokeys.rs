//! GeoKeyDirectory parsing.
//!
//! The directory is a flat `u16` array:
//!
//! ```text
//! [KeyDirectoryVersion, KeyRevision, MinorRevision, NumberOfKeys,
//!  KeyID1, TIFFTagLocation1, Count1, Value_Offset1, ...]
//! ```
//!
//! Only keys stored inline (TIFFTagLocation = 0) are needed here.

use std::collections::HashMap;

use flood_common::CrsCode;

use crate::error::{GeoTiffError, GeoTiffResult};

// GeoKey IDs
pub const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
pub const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
pub const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
pub const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

// GeoKey values
pub const MODEL_TYPE_PROJECTED: u16 = 1;
pub const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
pub const RASTER_PIXEL_IS_AREA: u16 = 1;
pub const RASTER_PIXEL_IS_POINT: u16 = 2;

/// Inline GeoKey values by key ID.
#[derive(Debug, Clone, Default)]
pub struct GeoKeys {
    keys: HashMap<u16, u16>,
}

impl GeoKeys {
    /// Parse a GeoKeyDirectory tag value.
    pub fn parse(directory: &[u16]) -> GeoTiffResult<Self> {
        if directory.len() < 4 {
            return Err(GeoTiffError::InvalidGeoKeys(format!(
                "header has {} entries, expected 4",
                directory.len()
            )));
        }

        let count = directory[3] as usize;
        let entries = &directory[4..];
        if entries.len() < count * 4 {
            return Err(GeoTiffError::InvalidGeoKeys(format!(
                "{} keys declared but only {} entries present",
                count,
                entries.len() / 4
            )));
        }

        let keys = entries
            .chunks_exact(4)
            .take(count)
            .filter(|entry| entry[1] == 0)
            .map(|entry| (entry[0], entry[3]))
            .collect();

        Ok(Self { keys })
    }

    /// Inline value of a key.
    pub fn get(&self, key: u16) -> Option<u16> {
        self.keys.get(&key).copied()
    }

    /// True when GTRasterTypeGeoKey declares PixelIsPoint.
    pub fn pixel_is_point(&self) -> bool {
        self.get(GT_RASTER_TYPE_GEO_KEY) == Some(RASTER_PIXEL_IS_POINT)
    }

    /// The EPSG code of the raster's CRS.
    ///
    /// A projected code wins over a geographic one, matching the model type
    /// hierarchy of GeoTIFF.
    pub fn crs(&self) -> GeoTiffResult<CrsCode> {
        let code = match self.get(GT_MODEL_TYPE_GEO_KEY) {
            Some(MODEL_TYPE_GEOGRAPHIC) => self.get(GEOGRAPHIC_TYPE_GEO_KEY),
            _ => self
                .get(PROJECTED_CS_TYPE_GEO_KEY)
                .or_else(|| self.get(GEOGRAPHIC_TYPE_GEO_KEY)),
        };

        let code =
            code.ok_or_else(|| GeoTiffError::unknown_crs("no EPSG code in GeoKeyDirectory"))?;

        CrsCode::from_epsg(code).map_err(|e| GeoTiffError::UnsupportedCrs {
            crs: code.to_string(),
            reason: e.to_string(),
        })
    }
}
