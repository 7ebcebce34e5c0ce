//! Reads GeoTIFFs written on the fly by the test-utils fixture writer.

use std::path::Path;

use flood_common::{AffineTransform, ConvertError, CrsCode, RasterSource, NODATA_SENTINEL};
use geotiff_reader::{read_geotiff, GeoTiffError, GeoTiffSource};
use test_utils::{
    assert_approx_eq, create_grid_with_nodata, create_test_grid, crs, temp_test_dir, transforms,
    write_geotiff_fixture, GeoTiffFixture, GeoreferenceTags,
};

#[test]
fn test_read_projected_fixture() {
    let dir = temp_test_dir();
    let path = dir.path().join("flood_data.tif");
    let data = create_grid_with_nodata(4, 3, 0.25, &[(1, 2)]);

    GeoTiffFixture::new(4, 3, data.clone(), crs::UTM_15N, transforms::houston_utm())
        .write(&path)
        .unwrap();

    let handle = read_geotiff(&path).unwrap();
    assert_eq!(handle.shape(), (3, 4));
    assert_eq!(handle.crs, crs::UTM_15N);
    assert_eq!(handle.nodata, NODATA_SENTINEL);
    assert_eq!(handle.data, data);
    assert_eq!(handle.value(1, 2), Some(NODATA_SENTINEL));
    assert_eq!(handle.transform, transforms::houston_utm());
}

#[test]
fn test_pixels_are_row_major() {
    let dir = temp_test_dir();
    let path = dir.path().join("pattern.tif");
    let (width, height) = (5, 3);

    write_geotiff_fixture(
        &path,
        width,
        height,
        &create_test_grid(width, height),
        crs::UTM_33N,
        AffineTransform::from_origin(400000.0, 5800000.0, 10.0, 10.0),
    )
    .unwrap();

    let handle = read_geotiff(&path).unwrap();
    for row in 0..height {
        for col in 0..width {
            assert_eq!(handle.value(row, col), Some((col * 1000 + row) as f64));
        }
    }
}

#[test]
fn test_read_model_transformation() {
    let dir = temp_test_dir();
    let path = dir.path().join("rotated.tif");
    let transform = AffineTransform::new(10.0, 2.0, 500000.0, 1.5, -10.0, 4000000.0);

    GeoTiffFixture::new(2, 2, vec![1.0, 2.0, 3.0, 4.0], crs::UTM_33N, transform)
        .with_georeference(GeoreferenceTags::Transformation)
        .write(&path)
        .unwrap();

    let handle = read_geotiff(&path).unwrap();
    assert_eq!(handle.transform, transform);
}

#[test]
fn test_pixel_is_point_keeps_centers_on_tiepoints() {
    let dir = temp_test_dir();
    let path = dir.path().join("points.tif");
    let transform = transforms::gulf_geographic();

    GeoTiffFixture::new(2, 2, vec![0.0; 4], crs::WGS84, transform)
        .pixel_is_point()
        .write(&path)
        .unwrap();

    let handle = read_geotiff(&path).unwrap();
    let (x, y) = handle.transform.pixel_center(0, 0);
    assert_approx_eq!(x, -95.5, 1e-12);
    assert_approx_eq!(y, 30.0, 1e-12);
}

#[test]
fn test_nodata_tag_never_replaces_sentinel() {
    let dir = temp_test_dir();

    for (name, tag) in [
        ("nan.tif", "nan"),
        ("zero.tif", "0"),
        ("float_max.tif", "-3.40282346638529e+38"),
        ("junk.tif", "n/a"),
    ] {
        let path = dir.path().join(name);
        GeoTiffFixture::new(1, 1, vec![0.0], crs::WGS84, AffineTransform::identity())
            .with_nodata(Some(tag))
            .write(&path)
            .unwrap();
        assert_eq!(read_geotiff(&path).unwrap().nodata, NODATA_SENTINEL, "{tag}");
    }

    let untagged = dir.path().join("untagged.tif");
    GeoTiffFixture::new(1, 1, vec![0.0], crs::WGS84, AffineTransform::identity())
        .with_nodata(None)
        .write(&untagged)
        .unwrap();
    assert_eq!(read_geotiff(&untagged).unwrap().nodata, NODATA_SENTINEL);
}

#[test]
fn test_missing_file_is_input_not_found() {
    let err = GeoTiffSource
        .open(Path::new("/nonexistent/flood_data.tif"))
        .unwrap_err();
    assert!(matches!(err, ConvertError::InputNotFound { .. }), "{err}");
}

#[test]
fn test_not_a_tiff_is_input_not_found() {
    let dir = temp_test_dir();
    let path = dir.path().join("garbage.tif");
    std::fs::write(&path, b"definitely not a tiff").unwrap();

    let err = GeoTiffSource.open(&path).unwrap_err();
    assert!(matches!(err, ConvertError::InputNotFound { .. }), "{err}");
}

#[test]
fn test_missing_geokeys_is_unsupported_crs() {
    let dir = temp_test_dir();
    let path = dir.path().join("no_crs.tif");

    GeoTiffFixture::new(1, 1, vec![1.0], CrsCode::WGS84, AffineTransform::identity())
        .without_crs()
        .write(&path)
        .unwrap();

    assert!(matches!(
        read_geotiff(&path),
        Err(GeoTiffError::UnsupportedCrs { .. })
    ));
    let err = GeoTiffSource.open(&path).unwrap_err();
    assert_eq!(err.kind(), "UnsupportedCRS");
    match err {
        ConvertError::UnsupportedCrs { crs, reason } => {
            assert_eq!(crs, "unknown");
            assert!(reason.starts_with("no GeoKeyDirectory tag"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_georeference() {
    let dir = temp_test_dir();
    let path = dir.path().join("no_transform.tif");

    GeoTiffFixture::new(1, 1, vec![1.0], CrsCode::WGS84, AffineTransform::identity())
        .with_georeference(GeoreferenceTags::None)
        .write(&path)
        .unwrap();

    assert!(matches!(
        read_geotiff(&path),
        Err(GeoTiffError::MissingGeoreference(_))
    ));
}
