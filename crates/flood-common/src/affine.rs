//! Affine pixel-to-CRS transforms.

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// Six-coefficient affine map from pixel (column, row) to source CRS (x, y).
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
///
/// The coefficient names follow the usual `Affine(a, b, c, d, e, f)` convention;
/// [`AffineTransform::to_gdal`] gives the GDAL geotransform ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// Pixel width (x step per column)
    pub a: f64,
    /// Row rotation (x step per row)
    pub b: f64,
    /// X of the upper-left corner
    pub c: f64,
    /// Column rotation (y step per column)
    pub d: f64,
    /// Pixel height (y step per row, usually negative)
    pub e: f64,
    /// Y of the upper-left corner
    pub f: f64,
}

impl AffineTransform {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Identity map: pixel space equals CRS space.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// North-up transform from an origin and pixel size.
    pub fn from_origin(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self::new(pixel_width, 0.0, origin_x, 0.0, -pixel_height, origin_y)
    }

    /// Build from a GDAL geotransform `[c, a, b, f, d, e]`.
    pub fn from_gdal(gt: [f64; 6]) -> Self {
        Self::new(gt[1], gt[2], gt[0], gt[4], gt[5], gt[3])
    }

    /// Coefficients in GDAL geotransform order: `[c, a, b, f, d, e]`.
    pub fn to_gdal(&self) -> [f64; 6] {
        [self.c, self.a, self.b, self.f, self.d, self.e]
    }

    /// Apply the transform to fractional pixel coordinates.
    #[inline]
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// CRS coordinate of the center of pixel (`row`, `col`).
    #[inline]
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// True when there are no rotation terms.
    pub fn is_rectilinear(&self) -> bool {
        self.b == 0.0 && self.d == 0.0
    }

    /// Shift the origin by a fractional number of pixels.
    pub fn translate_pixels(&self, dcol: f64, drow: f64) -> Self {
        let (c, f) = self.apply(dcol, drow);
        Self { c, f, ..*self }
    }

    /// Bounds of a `width` x `height` grid under this transform.
    ///
    /// All four outer corners are considered so rotated grids are covered.
    pub fn bounds(&self, width: usize, height: usize) -> BoundingBox {
        let (w, h) = (width as f64, height as f64);
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(w, 0.0),
            self.apply(0.0, h),
            self.apply(w, h),
        ];
        BoundingBox::from_points(&corners)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}
