//! Common test fixtures for converter tests.
//!
//! This module provides pre-defined rasters and an in-memory raster source
//! so the conversion pipeline can be exercised without files on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use flood_common::{
    AffineTransform, ConvertError, ConvertResult, CrsCode, RasterHandle, RasterSource,
    NODATA_SENTINEL,
};

/// Common CRS codes used in tests.
pub mod crs {
    use flood_common::CrsCode;

    /// WGS84 geographic
    pub const WGS84: CrsCode = CrsCode::WGS84;

    /// WGS84 / UTM zone 15N (Houston area flood data)
    pub const UTM_15N: CrsCode = CrsCode(32615);

    /// WGS84 / UTM zone 33N
    pub const UTM_33N: CrsCode = CrsCode(32633);

    /// Not an EPSG-registered system
    pub const UNKNOWN: CrsCode = CrsCode(1);
}

/// Common affine transforms used in tests.
pub mod transforms {
    use flood_common::AffineTransform;

    /// 30 m UTM 15N grid near Houston, TX
    pub fn houston_utm() -> AffineTransform {
        AffineTransform::from_gdal([270000.0, 30.0, 0.0, 3300000.0, 0.0, -30.0])
    }

    /// 0.01 degree geographic grid over the Gulf coast
    pub fn gulf_geographic() -> AffineTransform {
        AffineTransform::from_origin(-95.5, 30.0, 0.01, 0.01)
    }
}

/// The 2x2 raster `[[1.0, -9999.0], [2.0, 3.0]]` with an identity transform.
///
/// Source CRS is WGS84 so the geographic reprojection is an identity.
pub fn two_by_two_raster() -> RasterHandle {
    RasterHandle::new(
        2,
        2,
        vec![1.0, NODATA_SENTINEL, 2.0, 3.0],
        NODATA_SENTINEL,
        CrsCode::WGS84,
        AffineTransform::identity(),
    )
    .expect("2x2 fixture is well formed")
}

/// Build a handle from parts, panicking on shape mismatch.
pub fn raster(
    height: usize,
    width: usize,
    data: Vec<f64>,
    crs: CrsCode,
    transform: AffineTransform,
) -> RasterHandle {
    RasterHandle::new(height, width, data, NODATA_SENTINEL, crs, transform)
        .expect("fixture data must match dimensions")
}

/// In-memory [`RasterSource`] keyed by path.
///
/// Unknown paths fail with `InputNotFound`, like a missing file would.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rasters: HashMap<PathBuf, RasterHandle>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raster under `path`.
    pub fn with_raster(mut self, path: impl Into<PathBuf>, handle: RasterHandle) -> Self {
        self.rasters.insert(path.into(), handle);
        self
    }
}

impl RasterSource for MemorySource {
    fn open(&self, path: &Path) -> ConvertResult<RasterHandle> {
        self.rasters
            .get(path)
            .cloned()
            .ok_or_else(|| ConvertError::input_not_found(path, "no such raster registered"))
    }
}
