//! Per-pixel coordinate generation.
//!
//! For every pixel the engine evaluates the affine transform at the pixel
//! center and pushes the result through the geographic and ECEF
//! reprojectors, filling three co-indexed `(H, W, 2)` grids.
//!
//! ```text
//! (row, col) ──► affine(col + 0.5, row + 0.5) ──► source (x, y)
//!                                                  ├─► geographic (lon, lat)
//!                                                  └─► ECEF (x, y)
//! ```
//!
//! Each row is written into disjoint slices of the three grids, so the
//! parallel driver needs no locking.

use flood_common::{AffineTransform, AxisOrder, BoundingBox, ConvertResult, CrsCode};
use projection::{Reprojector, TargetPair};
use rayon::prelude::*;

use crate::config::ExecutionMode;

/// Coordinates of one pixel center under all three systems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelCoordinates {
    pub source: (f64, f64),
    pub geographic: (f64, f64),
    pub ecef: (f64, f64),
}

/// A `(height, width, 2)` grid of coordinate pairs, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    pub height: usize,
    pub width: usize,
    pub axis_order: AxisOrder,
    /// `height * width * 2` values, pair `(i, j)` at `2 * (i * width + j)`
    pub data: Vec<f64>,
}

impl CoordinateGrid {
    /// A zero-filled grid.
    pub fn new(height: usize, width: usize, axis_order: AxisOrder) -> Self {
        Self {
            height,
            width,
            axis_order,
            data: vec![0.0; height * width * 2],
        }
    }

    /// Shape as `(height, width, 2)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, 2)
    }

    /// Coordinate pair at (`row`, `col`).
    pub fn get(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let idx = 2 * (row * self.width + col);
        Some((self.data[idx], self.data[idx + 1]))
    }

    /// Bounding box of every stored pair.
    pub fn extent(&self) -> BoundingBox {
        self.data.chunks_exact(2).fold(
            BoundingBox::from_points(&[]),
            |bbox, pair| bbox.expand(pair[0], pair[1]),
        )
    }
}

/// The three co-indexed grids produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrids {
    /// Pixel centers in the source CRS, `x,y`
    pub source: CoordinateGrid,
    /// EPSG:4326, `lon,lat`
    pub geographic: CoordinateGrid,
    /// EPSG:4978, `x,y`
    pub ecef: CoordinateGrid,
}

/// Maps every pixel of a raster to its three coordinate pairs.
#[derive(Debug, Clone, Copy)]
pub struct GridTransformEngine<'a> {
    transform: AffineTransform,
    geographic: &'a Reprojector,
    ecef: &'a Reprojector,
}

impl<'a> GridTransformEngine<'a> {
    pub fn new(
        transform: AffineTransform,
        geographic: &'a Reprojector,
        ecef: &'a Reprojector,
    ) -> Self {
        Self {
            transform,
            geographic,
            ecef,
        }
    }

    /// Engine over a prebuilt reprojector pair.
    pub fn from_targets(transform: AffineTransform, targets: &'a TargetPair) -> Self {
        Self::new(transform, &targets.geographic, &targets.ecef)
    }

    /// Coordinates of the center of pixel (`row`, `col`).
    ///
    /// # Errors
    /// `ReprojectionFailure` naming this pixel if either target rejects it.
    pub fn pixel_coordinates(&self, row: usize, col: usize) -> ConvertResult<PixelCoordinates> {
        let (x, y) = self.transform.pixel_center(row, col);

        let geographic = self
            .geographic
            .apply(x, y)
            .map_err(|e| e.at_pixel(row, col))?;
        let ecef = self.ecef.apply(x, y).map_err(|e| e.at_pixel(row, col))?;

        Ok(PixelCoordinates {
            source: (x, y),
            geographic,
            ecef,
        })
    }

    /// Fill all three grids for a `height` x `width` raster.
    ///
    /// Nodata pixels get coordinates like any other. Sequential and parallel
    /// runs produce identical grids; on failure the parallel driver reports
    /// whichever failing pixel it hit first, which is not necessarily the
    /// lowest one.
    pub fn transform_grid(
        &self,
        height: usize,
        width: usize,
        mode: ExecutionMode,
    ) -> ConvertResult<CoordinateGrids> {
        let mut source = CoordinateGrid::new(height, width, AxisOrder::XY);
        let mut geographic =
            CoordinateGrid::new(height, width, CrsCode::WGS84.storage_axis_order());
        let mut ecef = CoordinateGrid::new(height, width, CrsCode::ECEF.storage_axis_order());

        if height > 0 && width > 0 {
            let row_len = width * 2;
            match mode {
                ExecutionMode::Sequential => {
                    let rows = source
                        .data
                        .chunks_mut(row_len)
                        .zip(geographic.data.chunks_mut(row_len))
                        .zip(ecef.data.chunks_mut(row_len));
                    for (row, ((src, geo), ecef)) in rows.enumerate() {
                        self.fill_row(row, src, geo, ecef)?;
                    }
                }
                ExecutionMode::Parallel => {
                    source
                        .data
                        .par_chunks_mut(row_len)
                        .zip(geographic.data.par_chunks_mut(row_len))
                        .zip(ecef.data.par_chunks_mut(row_len))
                        .enumerate()
                        .try_for_each(|(row, ((src, geo), ecef))| {
                            self.fill_row(row, src, geo, ecef)
                        })?;
                }
            }

            let extent = geographic.extent();
            tracing::debug!(
                height,
                width,
                mode = %mode,
                min_lon = extent.min_x,
                min_lat = extent.min_y,
                max_lon = extent.max_x,
                max_lat = extent.max_y,
                "Transformed coordinate grids"
            );
        }

        Ok(CoordinateGrids {
            source,
            geographic,
            ecef,
        })
    }

    fn fill_row(
        &self,
        row: usize,
        source: &mut [f64],
        geographic: &mut [f64],
        ecef: &mut [f64],
    ) -> ConvertResult<()> {
        let cells = source
            .chunks_exact_mut(2)
            .zip(geographic.chunks_exact_mut(2))
            .zip(ecef.chunks_exact_mut(2));

        for (col, ((src, geo), ecef)) in cells.enumerate() {
            let coords = self.pixel_coordinates(row, col)?;
            src.copy_from_slice(&[coords.source.0, coords.source.1]);
            geo.copy_from_slice(&[coords.geographic.0, coords.geographic.1]);
            ecef.copy_from_slice(&[coords.ecef.0, coords.ecef.1]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_common::ConvertError;
    use test_utils::{assert_approx_eq, assert_coords_approx_eq};

    fn wgs84_targets() -> TargetPair {
        TargetPair::build(CrsCode::WGS84).unwrap()
    }

    #[test]
    fn test_pixel_center_not_corner() {
        let targets = wgs84_targets();
        let engine = GridTransformEngine::from_targets(AffineTransform::identity(), &targets);

        let coords = engine.pixel_coordinates(0, 0).unwrap();
        assert_eq!(coords.source, (0.5, 0.5));
        assert_eq!(coords.geographic, (0.5, 0.5));
    }

    #[test]
    fn test_identity_grid_values() {
        let targets = wgs84_targets();
        let engine = GridTransformEngine::from_targets(AffineTransform::identity(), &targets);

        let grids = engine
            .transform_grid(2, 2, ExecutionMode::Sequential)
            .unwrap();
        assert_eq!(grids.source.data, vec![0.5, 0.5, 1.5, 0.5, 0.5, 1.5, 1.5, 1.5]);
        assert_eq!(grids.geographic.data, grids.source.data);
        assert_eq!(grids.source.shape(), (2, 2, 2));
        assert_eq!(grids.geographic.axis_order, AxisOrder::LonLat);
        assert_eq!(grids.ecef.axis_order, AxisOrder::XY);
    }

    #[test]
    fn test_ecef_grid_on_equator() {
        // Pixel (0, 0) centered on (0, 0) degrees
        let targets = wgs84_targets();
        let transform = AffineTransform::from_origin(-0.5, 0.5, 1.0, 1.0);
        let engine = GridTransformEngine::from_targets(transform, &targets);

        let grids = engine.transform_grid(1, 1, ExecutionMode::Parallel).unwrap();
        assert_eq!(grids.source.get(0, 0), Some((0.0, 0.0)));
        let (x, y) = grids.ecef.get(0, 0).unwrap();
        assert_coords_approx_eq!((x, y), (6378137.0, 0.0), 1e-3);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let targets = TargetPair::build(CrsCode(32615)).unwrap();
        let transform = AffineTransform::from_gdal([270000.0, 30.0, 0.0, 3300000.0, 0.0, -30.0]);
        let engine = GridTransformEngine::from_targets(transform, &targets);

        let seq = engine
            .transform_grid(17, 23, ExecutionMode::Sequential)
            .unwrap();
        let par = engine.transform_grid(17, 23, ExecutionMode::Parallel).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_failure_reports_pixel() {
        // Every center is NaN, which the ECEF target rejects
        let targets = wgs84_targets();
        let transform = AffineTransform::new(f64::NAN, 0.0, 0.0, 0.0, 1.0, 0.0);
        let engine = GridTransformEngine::from_targets(transform, &targets);

        let err = engine
            .transform_grid(3, 2, ExecutionMode::Sequential)
            .unwrap_err();
        assert!(
            matches!(err, ConvertError::ReprojectionFailure { row: 0, col: 0, .. }),
            "{err}"
        );

        let err = engine
            .transform_grid(3, 2, ExecutionMode::Parallel)
            .unwrap_err();
        match err {
            ConvertError::ReprojectionFailure { row, col, .. } => {
                assert!(row < 3 && col < 2, "pixel ({}, {})", row, col);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_grid() {
        let targets = wgs84_targets();
        let engine = GridTransformEngine::from_targets(AffineTransform::identity(), &targets);
        let grids = engine.transform_grid(0, 5, ExecutionMode::Parallel).unwrap();
        assert!(grids.source.data.is_empty());
    }

    #[test]
    fn test_grid_get_and_extent() {
        let mut grid = CoordinateGrid::new(1, 2, AxisOrder::XY);
        grid.data.copy_from_slice(&[1.0, 2.0, -3.0, 4.0]);
        assert_eq!(grid.get(0, 1), Some((-3.0, 4.0)));
        assert_eq!(grid.get(1, 0), None);

        let extent = grid.extent();
        assert_approx_eq!(extent.min_x, -3.0, 0.0);
        assert_approx_eq!(extent.max_y, 4.0, 0.0);
    }
}
