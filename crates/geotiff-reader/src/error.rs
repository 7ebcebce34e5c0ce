//! Error types for GeoTIFF reading.

use std::path::Path;

use flood_common::ConvertError;
use thiserror::Error;

/// Result type for GeoTIFF reader operations.
pub type GeoTiffResult<T> = Result<T, GeoTiffError>;

/// Error types for GeoTIFF reading.
#[derive(Error, Debug)]
pub enum GeoTiffError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error
    #[error("TIFF error: {0}")]
    Tiff(String),

    /// No usable ModelTransformation or tiepoint/pixel-scale tags
    #[error("Missing georeference: {0}")]
    MissingGeoreference(String),

    /// GeoKeyDirectory malformed
    #[error("Invalid GeoKey directory: {0}")]
    InvalidGeoKeys(String),

    /// No usable EPSG code. `crs` is the declared code, or `unknown`
    #[error("Unsupported CRS {crs}: {reason}")]
    UnsupportedCrs { crs: String, reason: String },

    /// Decoded pixel buffer does not match the image dimensions
    #[error("Invalid raster layout: {0}")]
    InvalidLayout(String),
}

impl From<tiff::TiffError> for GeoTiffError {
    fn from(e: tiff::TiffError) -> Self {
        GeoTiffError::Tiff(e.to_string())
    }
}

impl GeoTiffError {
    /// A CRS that could not be identified at all.
    pub fn unknown_crs(reason: impl Into<String>) -> Self {
        GeoTiffError::UnsupportedCrs {
            crs: "unknown".to_string(),
            reason: reason.into(),
        }
    }

    /// Map onto the run-level taxonomy, attaching the offending path.
    pub fn into_convert_error(self, path: &Path) -> ConvertError {
        match self {
            GeoTiffError::UnsupportedCrs { crs, reason } => {
                ConvertError::unsupported_crs(crs, format!("{} ({})", reason, path.display()))
            }
            other => ConvertError::input_not_found(path, other.to_string()),
        }
    }
}
