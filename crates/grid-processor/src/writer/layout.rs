//! Output directory and file names for a run.

use std::path::{Path, PathBuf};

use flood_common::{ConvertError, ConvertResult};

pub const ECEF_MATRIX: &str = "ecef_matrix.bin";
pub const WGS84_MATRIX: &str = "wgs84_matrix.bin";
pub const SRC_CRS_MATRIX: &str = "src_crs_matrix.bin";
pub const WATER_DEPTH_MATRIX: &str = "water_depth_matrix.bin";
pub const INVALID_MASK: &str = "invalid_mask.bin";

/// Where the outputs of one input raster go: `<save_dir>/<input_stem>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    stem: String,
    dir: PathBuf,
}

impl OutputLayout {
    /// Layout for `input_path` under `save_dir`.
    ///
    /// The stem is the input's file name minus its last extension, so
    /// `/a/b/Flood_Data.TIF` lands in `<save_dir>/Flood_Data/`.
    pub fn new(save_dir: &Path, input_path: &Path) -> Self {
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = save_dir.join(&stem);
        Self { stem, dir }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory (and parents) if missing.
    pub fn create(&self) -> ConvertResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ConvertError::io_failure(&self.dir, e))
    }

    pub fn ecef_matrix(&self) -> PathBuf {
        self.dir.join(ECEF_MATRIX)
    }

    pub fn wgs84_matrix(&self) -> PathBuf {
        self.dir.join(WGS84_MATRIX)
    }

    pub fn src_crs_matrix(&self) -> PathBuf {
        self.dir.join(SRC_CRS_MATRIX)
    }

    pub fn water_depth_matrix(&self) -> PathBuf {
        self.dir.join(WATER_DEPTH_MATRIX)
    }

    pub fn invalid_mask(&self) -> PathBuf {
        self.dir.join(INVALID_MASK)
    }

    /// `<stem>_meta.json`
    pub fn metadata(&self) -> PathBuf {
        self.dir.join(format!("{}_meta.json", self.stem))
    }
}
