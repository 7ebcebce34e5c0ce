//! Test data generators for creating synthetic flood-depth rasters.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use flood_common::NODATA_SENTINEL;

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being read/written correctly
/// by checking that grid[row][col] == col * 1000 + row.
///
/// # Returns
///
/// A `Vec<f64>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Creates a water-depth grid with dry land marked as nodata.
///
/// Depth increases towards the bottom-right corner (0 to ~3 m). Every cell
/// whose `(row + col) % nodata_stride == 0` holds the -9999 sentinel; a
/// stride of 0 produces no nodata cells.
pub fn create_flood_depth_grid(width: usize, height: usize, nodata_stride: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            if nodata_stride > 0 && (row + col) % nodata_stride == 0 {
                data.push(NODATA_SENTINEL);
                continue;
            }
            let x_factor = col as f64 / width.max(1) as f64;
            let y_factor = row as f64 / height.max(1) as f64;
            data.push(1.5 * x_factor + 1.5 * y_factor);
        }
    }
    data
}

/// Creates a grid with the sentinel at specific (row, col) positions.
///
/// All other cells hold `fill`.
pub fn create_grid_with_nodata(
    width: usize,
    height: usize,
    fill: f64,
    nodata_cells: &[(usize, usize)],
) -> Vec<f64> {
    let mut data = vec![fill; width * height];
    for &(row, col) in nodata_cells {
        if row < height && col < width {
            data[row * width + col] = NODATA_SENTINEL;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(10, 5);
        assert_eq!(grid.len(), 50);
        assert_eq!(grid[3 * 10 + 7], 7003.0);
    }

    #[test]
    fn test_flood_depth_grid_sentinels() {
        let grid = create_flood_depth_grid(4, 4, 3);
        for row in 0..4 {
            for col in 0..4 {
                let v = grid[row * 4 + col];
                if (row + col) % 3 == 0 {
                    assert_eq!(v, NODATA_SENTINEL);
                } else {
                    assert!(v >= 0.0 && v <= 3.0);
                }
            }
        }
        assert!(!create_flood_depth_grid(4, 4, 0).contains(&NODATA_SENTINEL));
    }

    #[test]
    fn test_grid_with_nodata() {
        let grid = create_grid_with_nodata(3, 2, 0.5, &[(0, 1), (1, 2), (5, 5)]);
        assert_eq!(grid, vec![0.5, NODATA_SENTINEL, 0.5, 0.5, 0.5, NODATA_SENTINEL]);
    }
}
