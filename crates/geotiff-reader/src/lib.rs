//! GeoTIFF raster source.
//!
//! Reads band 1 of a GeoTIFF together with the georeferencing the converter
//! needs: the affine pixel transform, the EPSG code of the CRS, and the
//! nodata value. Uses the pure Rust `tiff` crate, so no GDAL install is
//! required.
//!
//! # Georeferencing
//!
//! - `ModelTransformationTag` (34264) is used when present.
//! - Otherwise `ModelTiepointTag` (33922) + `ModelPixelScaleTag` (33550).
//! - `GTRasterTypeGeoKey = PixelIsPoint` shifts the origin half a pixel up
//!   and left so pixel centers land on the tie points, as GDAL does.
//! - The reported nodata value is always the -9999 sentinel. A
//!   `GDAL_NODATA` (42113) tag that declares anything else is logged and
//!   ignored.

pub mod error;
pub mod geokeys;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use flood_common::{
    AffineTransform, ConvertResult, RasterHandle, RasterSource, NODATA_SENTINEL,
};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::{debug, info, warn};

pub use error::{GeoTiffError, GeoTiffResult};
pub use geokeys::GeoKeys;

// GeoTIFF Tag IDs
pub const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
pub const MODEL_TIEPOINT_TAG: u16 = 33922;
pub const MODEL_TRANSFORMATION_TAG: u16 = 34264;
pub const GEO_KEY_DIRECTORY_TAG: u16 = 34735;
pub const GDAL_NODATA_TAG: u16 = 42113;

/// [`RasterSource`] backed by GeoTIFF files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoTiffSource;

impl RasterSource for GeoTiffSource {
    fn open(&self, path: &Path) -> ConvertResult<RasterHandle> {
        read_geotiff(path).map_err(|e| e.into_convert_error(path))
    }
}

/// Read band 1 and georeferencing from a GeoTIFF.
pub fn read_geotiff(path: impl AsRef<Path>) -> GeoTiffResult<RasterHandle> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let geokeys = match find_u16_vec(&mut decoder, GEO_KEY_DIRECTORY_TAG)? {
        Some(dir) => GeoKeys::parse(&dir)?,
        None => return Err(GeoTiffError::unknown_crs("no GeoKeyDirectory tag")),
    };
    let crs = geokeys.crs()?;

    let mut transform = read_transform(&mut decoder)?;
    if geokeys.pixel_is_point() {
        transform = transform.translate_pixels(-0.5, -0.5);
    }

    let nodata = NODATA_SENTINEL;
    if let Some(declared) = read_nodata(&mut decoder)? {
        if declared != nodata {
            warn!(
                path = %path.display(),
                declared,
                sentinel = nodata,
                "Ignoring GDAL_NODATA tag that differs from the sentinel"
            );
        }
    }

    let samples = match decoder.find_tag(Tag::SamplesPerPixel)? {
        Some(v) => v.into_u32()? as usize,
        None => 1,
    };
    let data = first_band(decoder.read_image()?, width * height, samples)?;

    debug!(
        path = %path.display(),
        width,
        height,
        samples,
        "Decoded GeoTIFF pixels"
    );

    let handle = RasterHandle::new(height, width, data, nodata, crs, transform)
        .map_err(|e| GeoTiffError::InvalidLayout(e.to_string()))?;

    info!(
        path = %path.display(),
        height,
        width,
        crs = %crs,
        nodata,
        "Opened raster"
    );

    Ok(handle)
}

/// Affine transform from ModelTransformation or tiepoint + pixel scale.
fn read_transform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> GeoTiffResult<AffineTransform> {
    if let Some(m) = find_f64_vec(decoder, MODEL_TRANSFORMATION_TAG)? {
        if m.len() < 16 {
            return Err(GeoTiffError::MissingGeoreference(format!(
                "ModelTransformation has {} values, expected 16",
                m.len()
            )));
        }
        // Row-major 4x4: x = m0*I + m1*J + m3, y = m4*I + m5*J + m7
        return Ok(AffineTransform::new(m[0], m[1], m[3], m[4], m[5], m[7]));
    }

    let tiepoint = find_f64_vec(decoder, MODEL_TIEPOINT_TAG)?;
    let scale = find_f64_vec(decoder, MODEL_PIXEL_SCALE_TAG)?;

    match (tiepoint, scale) {
        (Some(tie), Some(scale)) if tie.len() >= 6 && scale.len() >= 2 => {
            // ModelTiepoint format: [I, J, K, X, Y, Z]
            // ModelPixelScale format: [ScaleX, ScaleY, ScaleZ]
            let (i, j, x, y) = (tie[0], tie[1], tie[3], tie[4]);
            let (sx, sy) = (scale[0], scale[1]);
            Ok(AffineTransform::new(sx, 0.0, x - i * sx, 0.0, -sy, y + j * sy))
        }
        (Some(_), Some(_)) => Err(GeoTiffError::MissingGeoreference(
            "truncated tiepoint or pixel scale tag".to_string(),
        )),
        _ => Err(GeoTiffError::MissingGeoreference(
            "no ModelTransformation or tiepoint/pixel scale tags".to_string(),
        )),
    }
}

/// Parse the ASCII GDAL_NODATA tag.
fn read_nodata<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> GeoTiffResult<Option<f64>> {
    let Some(value) = decoder.find_tag(Tag::from_u16_exhaustive(GDAL_NODATA_TAG))? else {
        return Ok(None);
    };

    let text = value.into_string()?;
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());

    match text.to_lowercase().as_str() {
        "nan" => Ok(Some(f64::NAN)),
        other => match other.parse::<f64>() {
            Ok(v) => Ok(Some(v)),
            Err(_) => {
                warn!(value = text, "Unparseable GDAL_NODATA tag");
                Ok(None)
            }
        },
    }
}

fn find_f64_vec<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    tag: u16,
) -> GeoTiffResult<Option<Vec<f64>>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(tag))? {
        Some(v) => Ok(Some(v.into_f64_vec()?)),
        None => Ok(None),
    }
}

fn find_u16_vec<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    tag: u16,
) -> GeoTiffResult<Option<Vec<u16>>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(tag))? {
        Some(v) => Ok(Some(v.into_u16_vec()?)),
        None => Ok(None),
    }
}

/// Widen decoded samples to f64 and keep only the first sample of each pixel.
fn first_band(result: DecodingResult, pixels: usize, samples: usize) -> GeoTiffResult<Vec<f64>> {
    let all: Vec<f64> = match result {
        DecodingResult::U8(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::U32(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F32(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::F64(data) => data,
        DecodingResult::I8(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::I16(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::I32(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f64).collect(),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(GeoTiffError::InvalidLayout(
                "unsupported sample format".to_string(),
            ))
        }
    };

    let samples = samples.max(1);
    if all.len() != pixels * samples {
        return Err(GeoTiffError::InvalidLayout(format!(
            "decoded {} samples, expected {} pixels x {} samples",
            all.len(),
            pixels,
            samples
        )));
    }

    if samples == 1 {
        return Ok(all);
    }
    Ok(all.into_iter().step_by(samples).collect())
}
