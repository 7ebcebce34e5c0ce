//! Common types shared across the flood raster converter crates.

pub mod affine;
pub mod bbox;
pub mod crs;
pub mod error;
pub mod raster;

pub use affine::AffineTransform;
pub use bbox::BoundingBox;
pub use crs::{AxisOrder, CrsCode, CrsParseError};
pub use error::{ConvertError, ConvertResult};
pub use raster::{RasterHandle, RasterShapeError, RasterSource, NODATA_SENTINEL};
