//! End-to-end conversions against in-memory rasters.

use std::path::Path;

use flood_common::{AffineTransform, CrsCode, NODATA_SENTINEL};
use grid_processor::{
    convert, read_f64_grid, read_u8_grid, ConversionConfig, ExecutionMode, OutputLayout,
    RunMetadata,
};
use projection::Reprojector;
use test_utils::{
    assert_coords_approx_eq, create_flood_depth_grid, crs, raster, temp_test_dir, transforms,
    two_by_two_raster, MemorySource,
};

fn run(source: &MemorySource, data_path: &str, save_dir: &Path, mode: ExecutionMode) -> OutputLayout {
    let config = ConversionConfig {
        data_path: data_path.into(),
        save_dir: save_dir.to_path_buf(),
        execution: mode,
        threads: None,
    };
    convert(&config, source).unwrap();
    OutputLayout::new(save_dir, Path::new(data_path))
}

#[test]
fn test_two_by_two_identity_scenario() {
    let dir = temp_test_dir();
    let source = MemorySource::new().with_raster("tiff_samples/flood_data.tif", two_by_two_raster());

    let layout = run(
        &source,
        "tiff_samples/flood_data.tif",
        dir.path(),
        ExecutionMode::Sequential,
    );
    assert_eq!(layout.dir(), dir.path().join("flood_data"));

    assert_eq!(read_u8_grid(&layout.invalid_mask()).unwrap(), vec![0, 1, 0, 0]);
    assert_eq!(
        read_f64_grid(&layout.water_depth_matrix()).unwrap(),
        vec![1.0, NODATA_SENTINEL, 2.0, 3.0]
    );
    assert_eq!(
        read_f64_grid(&layout.src_crs_matrix()).unwrap(),
        vec![0.5, 0.5, 1.5, 0.5, 0.5, 1.5, 1.5, 1.5]
    );
    // Source is already WGS84
    assert_eq!(
        read_f64_grid(&layout.wgs84_matrix()).unwrap(),
        read_f64_grid(&layout.src_crs_matrix()).unwrap()
    );

    let meta = RunMetadata::load(&layout.metadata()).unwrap();
    assert_eq!(meta.shape, [2, 2]);
    assert_eq!(meta.crs, "EPSG:4326");
    assert_eq!(meta.transform, [0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    assert!(layout.metadata().ends_with("flood_data/flood_data_meta.json"));
}

#[test]
fn test_file_sizes_match_metadata_shape() {
    let dir = temp_test_dir();
    let (width, height) = (9, 5);
    let handle = raster(
        height,
        width,
        create_flood_depth_grid(width, height, 3),
        crs::UTM_15N,
        transforms::houston_utm(),
    );
    let source = MemorySource::new().with_raster("/data/houston.tif", handle);

    let layout = run(&source, "/data/houston.tif", dir.path(), ExecutionMode::Parallel);
    let meta = RunMetadata::load(&layout.metadata()).unwrap();
    let cells = (meta.height() * meta.width()) as u64;

    let size = |p: std::path::PathBuf| std::fs::metadata(p).unwrap().len();
    assert_eq!(size(layout.ecef_matrix()), cells * 2 * 8);
    assert_eq!(size(layout.wgs84_matrix()), cells * 2 * 8);
    assert_eq!(size(layout.src_crs_matrix()), cells * 2 * 8);
    assert_eq!(size(layout.water_depth_matrix()), cells * 8);
    assert_eq!(size(layout.invalid_mask()), cells);
    assert_eq!(meta.transform.len(), 6);
}

#[test]
fn test_projected_outputs_are_consistent() {
    let dir = temp_test_dir();
    let (width, height) = (6, 4);
    let values = create_flood_depth_grid(width, height, 5);
    let transform = transforms::houston_utm();
    let source = MemorySource::new().with_raster(
        "houston.tif",
        raster(height, width, values.clone(), crs::UTM_15N, transform),
    );

    let layout = run(&source, "houston.tif", dir.path(), ExecutionMode::Parallel);

    let src = read_f64_grid(&layout.src_crs_matrix()).unwrap();
    let wgs84 = read_f64_grid(&layout.wgs84_matrix()).unwrap();
    let ecef = read_f64_grid(&layout.ecef_matrix()).unwrap();
    let depth = read_f64_grid(&layout.water_depth_matrix()).unwrap();
    let mask = read_u8_grid(&layout.invalid_mask()).unwrap();

    // Values round-trip bit for bit and the mask flags exactly the sentinels
    assert_eq!(depth, values);
    for (value, flag) in depth.iter().zip(&mask) {
        assert_eq!(*flag == 1, *value == NODATA_SENTINEL);
    }

    let to_wgs84 = Reprojector::build(CrsCode(32615), CrsCode::WGS84).unwrap();
    let to_ecef = Reprojector::build(CrsCode(32615), CrsCode::ECEF).unwrap();
    for row in 0..height {
        for col in 0..width {
            let idx = 2 * (row * width + col);
            let center = transform.pixel_center(row, col);
            assert_eq!((src[idx], src[idx + 1]), center);

            let (lon, lat) = to_wgs84.apply(center.0, center.1).unwrap();
            assert_coords_approx_eq!((wgs84[idx], wgs84[idx + 1]), (lon, lat), 1e-9);

            let (x, y) = to_ecef.apply(center.0, center.1).unwrap();
            assert_coords_approx_eq!((ecef[idx], ecef[idx + 1]), (x, y), 1e-6);
        }
    }

    // Houston sits around 95.4W 29.8N
    assert!(wgs84[0] > -96.0 && wgs84[0] < -95.0, "lon {}", wgs84[0]);
    assert!(wgs84[1] > 29.0 && wgs84[1] < 30.5, "lat {}", wgs84[1]);
    // West of Greenwich and south of 90E, so both ECEF x and y are negative
    assert!(ecef[0] < 0.0 && ecef[1] < 0.0, "ecef ({}, {})", ecef[0], ecef[1]);
}

#[test]
fn test_sequential_and_parallel_outputs_identical() {
    let dir = temp_test_dir();
    let handle = raster(
        7,
        11,
        create_flood_depth_grid(11, 7, 2),
        crs::UTM_33N,
        AffineTransform::from_origin(400000.0, 5800000.0, 100.0, 100.0),
    );
    let source = MemorySource::new().with_raster("seq.tif", handle.clone()).with_raster("par.tif", handle);

    let seq = run(&source, "seq.tif", dir.path(), ExecutionMode::Sequential);
    let par = run(&source, "par.tif", dir.path(), ExecutionMode::Parallel);

    for (a, b) in [
        (seq.ecef_matrix(), par.ecef_matrix()),
        (seq.wgs84_matrix(), par.wgs84_matrix()),
        (seq.src_crs_matrix(), par.src_crs_matrix()),
    ] {
        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }
}

#[test]
fn test_rerun_overwrites_outputs() {
    let dir = temp_test_dir();
    let first = MemorySource::new().with_raster("flood_data.tif", two_by_two_raster());
    run(&first, "flood_data.tif", dir.path(), ExecutionMode::Sequential);

    let second = MemorySource::new().with_raster(
        "flood_data.tif",
        raster(1, 1, vec![4.0], CrsCode::WGS84, AffineTransform::identity()),
    );
    let layout = run(&second, "flood_data.tif", dir.path(), ExecutionMode::Sequential);

    assert_eq!(read_f64_grid(&layout.water_depth_matrix()).unwrap(), vec![4.0]);
    assert_eq!(RunMetadata::load(&layout.metadata()).unwrap().shape, [1, 1]);
}
