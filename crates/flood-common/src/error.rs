//! Error taxonomy for a conversion run.
//!
//! Every variant is fatal: nothing is retried or recovered locally, and a
//! failed run must not be assumed to have produced a usable output set.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using ConvertError.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Primary error type for a raster conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The raster path does not exist or could not be decoded.
    #[error("Input raster {path:?} not found or unreadable: {reason}")]
    InputNotFound { path: PathBuf, reason: String },

    /// A source or target CRS could not be resolved.
    #[error("Unsupported CRS {crs}: {reason}")]
    UnsupportedCrs { crs: String, reason: String },

    /// A pixel-center coordinate could not be reprojected.
    #[error("Reprojection failed at pixel (row {row}, col {col}): {cause}")]
    ReprojectionFailure {
        row: usize,
        col: usize,
        cause: String,
    },

    /// Writing an output artifact failed.
    #[error("Failed to write {path:?}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Create an InputNotFound error.
    pub fn input_not_found(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InputNotFound {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedCrs error.
    pub fn unsupported_crs(crs: impl ToString, reason: impl Into<String>) -> Self {
        Self::UnsupportedCrs {
            crs: crs.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an IoFailure error.
    pub fn io_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// Short category name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::InputNotFound { .. } => "InputNotFound",
            ConvertError::UnsupportedCrs { .. } => "UnsupportedCRS",
            ConvertError::ReprojectionFailure { .. } => "ReprojectionFailure",
            ConvertError::IoFailure { .. } => "IOFailure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = ConvertError::ReprojectionFailure {
            row: 3,
            col: 7,
            cause: "latitude out of range".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("col 7"));
        assert!(msg.contains("latitude out of range"));
        assert_eq!(err.kind(), "ReprojectionFailure");

        let err = ConvertError::unsupported_crs("EPSG:1", "unknown code");
        assert!(err.to_string().contains("EPSG:1"));
        assert_eq!(err.kind(), "UnsupportedCRS");
    }

    #[test]
    fn test_io_failure_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConvertError::io_failure("/out/ecef_matrix.bin", io);
        assert_eq!(err.kind(), "IOFailure");
        assert!(err.source().is_some());
        assert!(err.to_string().contains("ecef_matrix.bin"));
    }
}
