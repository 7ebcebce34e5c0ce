//! Minimal GeoTIFF writer for reader and end-to-end tests.
//!
//! Writes a single-band Float64 image with GeoTIFF tags so tests can build
//! real input files on the fly instead of shipping binary fixtures.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use flood_common::{AffineTransform, CrsCode};
use tiff::encoder::colortype::Gray64Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
const MODEL_TIEPOINT_TAG: u16 = 33922;
const MODEL_TRANSFORMATION_TAG: u16 = 34264;
const GEO_KEY_DIRECTORY_TAG: u16 = 34735;
const GDAL_NODATA_TAG: u16 = 42113;

/// How georeferencing is stored in the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeoreferenceTags {
    /// ModelTiepoint + ModelPixelScale (rectilinear transforms only)
    #[default]
    TiepointScale,
    /// Full ModelTransformation matrix
    Transformation,
    /// No georeferencing tags at all
    None,
}

/// Description of a GeoTIFF to write.
#[derive(Debug, Clone)]
pub struct GeoTiffFixture {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
    pub crs: Option<CrsCode>,
    pub transform: AffineTransform,
    pub georeference: GeoreferenceTags,
    pub nodata: Option<String>,
    pub pixel_is_point: bool,
}

impl GeoTiffFixture {
    /// A fixture with the sentinel nodata tag and tiepoint georeferencing.
    pub fn new(
        width: usize,
        height: usize,
        data: Vec<f64>,
        crs: CrsCode,
        transform: AffineTransform,
    ) -> Self {
        assert_eq!(data.len(), width * height, "fixture data must match dimensions");
        Self {
            width,
            height,
            data,
            crs: Some(crs),
            transform,
            georeference: GeoreferenceTags::TiepointScale,
            nodata: Some("-9999".to_string()),
            pixel_is_point: false,
        }
    }

    pub fn with_georeference(mut self, georeference: GeoreferenceTags) -> Self {
        self.georeference = georeference;
        self
    }

    pub fn with_nodata(mut self, nodata: Option<&str>) -> Self {
        self.nodata = nodata.map(str::to_string);
        self
    }

    pub fn without_crs(mut self) -> Self {
        self.crs = None;
        self
    }

    pub fn pixel_is_point(mut self) -> Self {
        self.pixel_is_point = true;
        self
    }

    /// Write the fixture to `path`.
    pub fn write(&self, path: &Path) -> Result<(), tiff::TiffError> {
        let file = BufWriter::new(File::create(path)?);
        let mut encoder = TiffEncoder::new(file)?;
        let mut image = encoder.new_image::<Gray64Float>(self.width as u32, self.height as u32)?;

        {
            let dir = image.encoder();
            match self.georeference {
                GeoreferenceTags::TiepointScale => {
                    let t = &self.transform;
                    let scale = [t.a, -t.e, 0.0];
                    let tiepoint = [0.0, 0.0, 0.0, t.c, t.f, 0.0];
                    dir.write_tag(Tag::Unknown(MODEL_PIXEL_SCALE_TAG), &scale[..])?;
                    dir.write_tag(Tag::Unknown(MODEL_TIEPOINT_TAG), &tiepoint[..])?;
                }
                GeoreferenceTags::Transformation => {
                    let t = &self.transform;
                    let matrix = [
                        t.a, t.b, 0.0, t.c, //
                        t.d, t.e, 0.0, t.f, //
                        0.0, 0.0, 0.0, 0.0, //
                        0.0, 0.0, 0.0, 1.0,
                    ];
                    dir.write_tag(Tag::Unknown(MODEL_TRANSFORMATION_TAG), &matrix[..])?;
                }
                GeoreferenceTags::None => {}
            }

            if let Some(crs) = self.crs {
                let keys = self.geokey_directory(crs);
                dir.write_tag(Tag::Unknown(GEO_KEY_DIRECTORY_TAG), &keys[..])?;
            }

            if let Some(nodata) = &self.nodata {
                dir.write_tag(Tag::Unknown(GDAL_NODATA_TAG), nodata.as_str())?;
            }
        }

        image.write_data(&self.data)?;
        Ok(())
    }

    fn geokey_directory(&self, crs: CrsCode) -> Vec<u16> {
        let geographic = crs == CrsCode::WGS84;
        let model_type = if geographic { 2 } else { 1 };
        let raster_type = if self.pixel_is_point { 2 } else { 1 };
        let crs_key = if geographic { 2048 } else { 3072 };

        vec![
            1, 1, 0, 3, //
            1024, 0, 1, model_type, //
            1025, 0, 1, raster_type, //
            crs_key, 0, 1, crs.epsg(),
        ]
    }
}

/// Write a tiepoint-georeferenced GeoTIFF with the -9999 nodata tag.
pub fn write_geotiff_fixture(
    path: &Path,
    width: usize,
    height: usize,
    data: &[f64],
    crs: CrsCode,
    transform: AffineTransform,
) -> Result<(), tiff::TiffError> {
    GeoTiffFixture::new(width, height, data.to_vec(), crs, transform).write(path)
}
