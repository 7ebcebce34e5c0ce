//! Binary grid and metadata output.
//!
//! Every grid is written as a flat, headerless file; the JSON sidecar
//! records shapes, dtypes, axis orders and georeferencing.

mod binary;
mod layout;
mod metadata;

pub use binary::{read_f64_grid, read_u8_grid, write_grid, Dtype, GridElement};
pub use layout::{
    OutputLayout, ECEF_MATRIX, INVALID_MASK, SRC_CRS_MATRIX, WATER_DEPTH_MATRIX, WGS84_MATRIX,
};
pub use metadata::{write_metadata, RunMetadata};

use std::path::PathBuf;

/// Files written by a run and their total size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub files: Vec<PathBuf>,
    pub bytes_written: u64,
}

impl WriteSummary {
    /// Record one written file.
    pub fn record(&mut self, path: PathBuf, bytes: u64) {
        self.files.push(path);
        self.bytes_written += bytes;
    }
}
