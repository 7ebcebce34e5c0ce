//! Command-line surface of the `tiff-to-bin` converter.

use std::path::PathBuf;

use clap::Parser;
use grid_processor::{ConversionConfig, DEFAULT_DATA_PATH, DEFAULT_SAVE_DIR};

/// Convert a flood water-depth GeoTIFF into flat binary matrices
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "tiff-to-bin")]
#[command(about = "Convert a flood water-depth GeoTIFF into flat binary matrices")]
pub struct Args {
    /// Input raster
    #[arg(long = "data-path", default_value = DEFAULT_DATA_PATH, env = "CONVERT_DATA_PATH")]
    pub data_path: PathBuf,

    /// Output root; files go to <save_dir>/<input_stem>/
    #[arg(long = "save_dir", default_value = DEFAULT_SAVE_DIR, env = "CONVERT_SAVE_DIR")]
    pub save_dir: PathBuf,
}

impl Args {
    /// Layer the two flags over the environment configuration.
    pub fn into_config(self, base: ConversionConfig) -> ConversionConfig {
        ConversionConfig {
            data_path: self.data_path,
            save_dir: self.save_dir,
            ..base
        }
    }
}
