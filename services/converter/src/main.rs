//! tiff-to-bin
//!
//! Reads a single-band flood GeoTIFF and writes source-CRS, WGS84 and ECEF
//! coordinate grids, the raw depths, a validity mask and a JSON sidecar.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use converter::Args;
use geotiff_reader::GeoTiffSource;
use grid_processor::{convert, ConversionConfig};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let config = args.into_config(ConversionConfig::from_env());
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    info!(
        data_path = %config.data_path.display(),
        save_dir = %config.save_dir.display(),
        threads = ?config.threads,
        "Starting tiff-to-bin"
    );

    match convert(&config, &GeoTiffSource) {
        Ok(summary) => {
            info!(
                files = summary.files.len(),
                bytes_written = summary.bytes_written,
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Conversion failed");
            Err(e).with_context(|| format!("Failed to convert {}", config.data_path.display()))
        }
    }
}
