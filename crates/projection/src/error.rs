//! Error types for reprojection.

use flood_common::{ConvertError, CrsCode};
use thiserror::Error;

/// Errors raised while building a [`crate::Reprojector`].
#[derive(Error, Debug)]
pub enum ProjectionError {
    /// No PROJ definition is known for the code.
    #[error("{code} is not in the crs-definitions database")]
    UnknownCode { code: CrsCode },

    /// A PROJ definition exists but proj4rs cannot use it.
    #[error("invalid projection {code}: {reason}")]
    InvalidDefinition { code: CrsCode, reason: String },
}

impl ProjectionError {
    /// The CRS that could not be resolved.
    pub fn code(&self) -> CrsCode {
        match self {
            ProjectionError::UnknownCode { code } => *code,
            ProjectionError::InvalidDefinition { code, .. } => *code,
        }
    }
}

impl From<ProjectionError> for ConvertError {
    fn from(err: ProjectionError) -> Self {
        ConvertError::unsupported_crs(err.code(), err.to_string())
    }
}

/// A single coordinate that could not be transformed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("transform of ({x}, {y}) from {source_crs} to {target_crs} failed: {reason}")]
pub struct TransformError {
    pub x: f64,
    pub y: f64,
    pub source_crs: CrsCode,
    pub target_crs: CrsCode,
    pub reason: String,
}

impl TransformError {
    /// Attach the pixel position and turn this into a run-level failure.
    pub fn at_pixel(self, row: usize, col: usize) -> ConvertError {
        ConvertError::ReprojectionFailure {
            row,
            col,
            cause: self.to_string(),
        }
    }
}
