//! Flood raster to flat binary matrices.
//!
//! Turns a single-band water-depth raster into three coordinate grids
//! (source CRS, WGS84, ECEF), the raw values, a validity mask and a JSON
//! sidecar that downstream renderers can read without a raster library.
//!
//! # Architecture
//!
//! ```text
//! RasterSource::open(path)
//!      │
//!      ▼
//! RasterHandle ──► TargetPair::build(src_crs)
//!      │                 │
//!      │                 ▼
//!      │          GridTransformEngine::transform_grid
//!      │                 │ (rows in parallel)
//!      ▼                 ▼
//! build_mask        CoordinateGrids
//!      │                 │
//!      └──────┬──────────┘
//!             ▼
//!   write_outputs(<save_dir>/<stem>/)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{convert, ConversionConfig};
//! use geotiff_reader::GeoTiffSource;
//!
//! let config = ConversionConfig::from_env();
//! let summary = convert(&config, &GeoTiffSource)?;
//! println!("wrote {} bytes", summary.bytes_written);
//! ```

pub mod config;
pub mod engine;
pub mod mask;
pub mod pipeline;
pub mod writer;

// Re-export commonly used types at crate root
pub use config::{ConversionConfig, ExecutionMode, DEFAULT_DATA_PATH, DEFAULT_SAVE_DIR};
pub use engine::{CoordinateGrid, CoordinateGrids, GridTransformEngine, PixelCoordinates};
pub use mask::{build_mask, MaskStats, MaskedGrid};
pub use pipeline::{convert, write_outputs};
pub use writer::{
    read_f64_grid, read_u8_grid, write_grid, write_metadata, Dtype, GridElement, OutputLayout,
    RunMetadata, WriteSummary,
};
