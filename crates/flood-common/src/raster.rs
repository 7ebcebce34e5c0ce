//! Raster source seam.
//!
//! The conversion pipeline never decodes files itself; it asks a
//! [`RasterSource`] to open a path and hand back a fully materialized
//! [`RasterHandle`]. The GeoTIFF reader implements this for real files and
//! tests implement it over synthetic grids.

use std::path::Path;

use crate::{AffineTransform, BoundingBox, ConvertResult, CrsCode};

/// Nodata sentinel used by the flood-depth rasters.
pub const NODATA_SENTINEL: f64 = -9999.0;

/// Band 1 of an opened raster together with its georeferencing.
#[derive(Debug, Clone)]
pub struct RasterHandle {
    /// Number of rows (H)
    pub height: usize,
    /// Number of columns (W)
    pub width: usize,
    /// Pixel values in row-major order, `height * width` long
    pub data: Vec<f64>,
    /// Value marking "no measurement"
    pub nodata: f64,
    /// Source coordinate reference system
    pub crs: CrsCode,
    /// Extent of the grid in the source CRS
    pub bounds: BoundingBox,
    /// Pixel to source-CRS transform
    pub transform: AffineTransform,
}

impl RasterHandle {
    /// Assemble a handle, checking that `data` matches the grid dimensions.
    ///
    /// Bounds are derived from the transform.
    pub fn new(
        height: usize,
        width: usize,
        data: Vec<f64>,
        nodata: f64,
        crs: CrsCode,
        transform: AffineTransform,
    ) -> Result<Self, RasterShapeError> {
        let expected = height
            .checked_mul(width)
            .ok_or(RasterShapeError::Overflow { height, width })?;
        if data.len() != expected {
            return Err(RasterShapeError::LengthMismatch {
                height,
                width,
                actual: data.len(),
            });
        }

        Ok(Self {
            height,
            width,
            data,
            nodata,
            crs,
            bounds: transform.bounds(width, height),
            transform,
        })
    }

    /// (height, width)
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Value at (`row`, `col`), or None when out of range.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Total number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Opens rasters by path.
pub trait RasterSource {
    /// Read band 1 and the georeferencing of the raster at `path`.
    ///
    /// Fails with `InputNotFound` when the path is missing or cannot be
    /// decoded, and `UnsupportedCrs` when the CRS cannot be identified.
    fn open(&self, path: &Path) -> ConvertResult<RasterHandle>;
}

#[derive(Debug, thiserror::Error)]
pub enum RasterShapeError {
    #[error("raster data has {actual} values, expected {height}x{width}")]
    LengthMismatch {
        height: usize,
        width: usize,
        actual: usize,
    },

    #[error("raster dimensions {height}x{width} overflow")]
    Overflow { height: usize, width: usize },
}
