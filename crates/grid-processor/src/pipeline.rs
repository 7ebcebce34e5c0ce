//! One conversion run: read, transform, mask, write.

use flood_common::{ConvertResult, RasterHandle, RasterSource, NODATA_SENTINEL};
use projection::TargetPair;
use tracing::{info, warn};

use crate::config::ConversionConfig;
use crate::engine::{CoordinateGrids, GridTransformEngine};
use crate::mask::{build_mask, MaskedGrid};
use crate::writer::{write_grid, write_metadata, OutputLayout, RunMetadata, WriteSummary};

/// Convert the raster named by `config.data_path`.
///
/// All grids are computed in memory before anything is written. Files are
/// written in a fixed order and a failure part way leaves the earlier ones
/// in place.
pub fn convert(config: &ConversionConfig, source: &dyn RasterSource) -> ConvertResult<WriteSummary> {
    info!(
        data_path = %config.data_path.display(),
        save_dir = %config.save_dir.display(),
        execution = %config.execution,
        "Starting conversion"
    );

    let raster = source.open(&config.data_path)?;
    let targets = TargetPair::build(raster.crs)?;

    let grids = run_engine(config, &raster, &targets)?;

    if raster.nodata != NODATA_SENTINEL {
        warn!(
            nodata = raster.nodata,
            sentinel = NODATA_SENTINEL,
            "Source nodata differs from the sentinel, masking on the sentinel"
        );
    }
    let masked = build_mask(&raster.data, NODATA_SENTINEL);
    let stats = masked.stats();
    info!(
        total = stats.total,
        invalid = stats.invalid,
        valid_min = ?stats.valid_min,
        valid_max = ?stats.valid_max,
        "Built validity mask"
    );

    let layout = OutputLayout::new(&config.save_dir, &config.data_path);
    let summary = write_outputs(&layout, &raster, &grids, &masked)?;

    info!(
        output_dir = %layout.dir().display(),
        files = summary.files.len(),
        bytes_written = summary.bytes_written,
        "Conversion complete"
    );

    Ok(summary)
}

fn run_engine(
    config: &ConversionConfig,
    raster: &RasterHandle,
    targets: &TargetPair,
) -> ConvertResult<CoordinateGrids> {
    let engine = GridTransformEngine::from_targets(raster.transform, targets);
    let run = || engine.transform_grid(raster.height, raster.width, config.execution);

    let Some(threads) = config.threads else {
        return run();
    };

    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(run),
        Err(e) => {
            warn!(threads, error = %e, "Could not build worker pool, using global pool");
            run()
        }
    }
}

/// Write every grid and the metadata sidecar into `layout`.
pub fn write_outputs(
    layout: &OutputLayout,
    raster: &RasterHandle,
    grids: &CoordinateGrids,
    masked: &MaskedGrid,
) -> ConvertResult<WriteSummary> {
    layout.create()?;

    let mut summary = WriteSummary::default();

    let path = layout.ecef_matrix();
    let bytes = write_grid(&path, &grids.ecef.data)?;
    summary.record(path, bytes);

    let path = layout.wgs84_matrix();
    let bytes = write_grid(&path, &grids.geographic.data)?;
    summary.record(path, bytes);

    let path = layout.src_crs_matrix();
    let bytes = write_grid(&path, &grids.source.data)?;
    summary.record(path, bytes);

    let path = layout.water_depth_matrix();
    let bytes = write_grid(&path, &masked.values)?;
    summary.record(path, bytes);

    let path = layout.invalid_mask();
    let bytes = write_grid(&path, &masked.mask)?;
    summary.record(path, bytes);

    let meta = RunMetadata::new(raster.height, raster.width, raster.crs, &raster.transform);
    let path = layout.metadata();
    let bytes = write_metadata(&path, &meta)?;
    summary.record(path, bytes);

    Ok(summary)
}
