//! JSON sidecar describing the binary grids.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flood_common::{
    AffineTransform, AxisOrder, ConvertError, ConvertResult, CrsCode, CrsParseError,
};
use serde::{Deserialize, Serialize};

use super::binary::Dtype;

/// Everything a consumer needs to interpret the binary grids.
///
/// Field order matches the JSON written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// `[height, width]`
    pub shape: [usize; 2],
    /// Element type of the value and coordinate grids.
    pub dtype: String,
    /// Element type of the invalidity mask.
    pub mask_dtype: String,
    pub ecef_format: String,
    pub wgs84_format: String,
    pub src_crs_format: String,
    /// Source CRS, e.g. `EPSG:32615`.
    pub crs: String,
    /// Affine transform in GDAL order `[c, a, b, f, d, e]`.
    pub transform: [f64; 6],
}

impl RunMetadata {
    pub fn new(height: usize, width: usize, crs: CrsCode, transform: &AffineTransform) -> Self {
        Self {
            shape: [height, width],
            dtype: Dtype::Float64.as_str().to_string(),
            mask_dtype: Dtype::Uint8.as_str().to_string(),
            ecef_format: CrsCode::ECEF.storage_axis_order().as_str().to_string(),
            wgs84_format: CrsCode::WGS84.storage_axis_order().as_str().to_string(),
            src_crs_format: AxisOrder::XY.as_str().to_string(),
            crs: crs.to_string(),
            transform: transform.to_gdal(),
        }
    }

    pub fn height(&self) -> usize {
        self.shape[0]
    }

    pub fn width(&self) -> usize {
        self.shape[1]
    }

    /// The recorded transform as an [`AffineTransform`].
    pub fn affine(&self) -> AffineTransform {
        AffineTransform::from_gdal(self.transform)
    }

    /// The recorded source CRS.
    pub fn source_crs(&self) -> Result<CrsCode, CrsParseError> {
        CrsCode::parse(&self.crs)
    }

    /// Load a sidecar written by [`write_metadata`].
    pub fn load(path: &Path) -> ConvertResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConvertError::io_failure(path, e))?;
        serde_json::from_str(&text).map_err(|e| ConvertError::io_failure(path, e.into()))
    }
}

/// Write `meta` as indented UTF-8 JSON. Returns the number of bytes written.
pub fn write_metadata(path: &Path, meta: &RunMetadata) -> ConvertResult<u64> {
    let json = serde_json::to_vec_pretty(meta).map_err(|e| ConvertError::io_failure(path, e.into()))?;

    let file = File::create(path).map_err(|e| ConvertError::io_failure(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&json)
        .and_then(|_| writer.flush())
        .map_err(|e| ConvertError::io_failure(path, e))?;

    tracing::debug!(path = %path.display(), "Wrote run metadata");

    Ok(json.len() as u64)
}
