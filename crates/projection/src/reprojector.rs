//! Build-once, apply-per-pixel coordinate reprojection.

use std::fmt;

use flood_common::CrsCode;
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use tracing::debug;

use crate::definitions::{is_geographic, proj_string};
use crate::error::{ProjectionError, TransformError};

/// A resolved source -> target transformation.
///
/// Building parses both PROJ definitions once; [`Reprojector::apply`] only
/// runs the transform. The handle is immutable after construction and is
/// shared read-only across worker threads.
pub struct Reprojector {
    source: CrsCode,
    target: CrsCode,
    pipeline: Pipeline,
}

enum Pipeline {
    /// Source and target are the same system
    Identity,
    Proj {
        source_proj: Proj,
        target_proj: Proj,
        /// True if source uses degrees (needs radian conversion)
        source_is_geographic: bool,
        /// True if target uses degrees (needs radian conversion)
        target_is_geographic: bool,
    },
}

impl Reprojector {
    /// Resolve both CRS definitions and build the transformation.
    ///
    /// # Errors
    /// `ProjectionError` if either code is unknown or cannot be parsed by proj4rs.
    pub fn build(source: CrsCode, target: CrsCode) -> Result<Self, ProjectionError> {
        // Resolve both up front so an unknown code fails even in the identity case
        let source_str = resolve(source)?;
        let target_str = resolve(target)?;

        if source == target {
            debug!(crs = %source, "Identity reprojection");
            return Ok(Self {
                source,
                target,
                pipeline: Pipeline::Identity,
            });
        }

        let source_proj = parse(source, &source_str)?;
        let target_proj = parse(target, &target_str)?;

        debug!(source = %source, target = %target, "Built reprojector");

        Ok(Self {
            source,
            target,
            pipeline: Pipeline::Proj {
                source_proj,
                target_proj,
                source_is_geographic: is_geographic(&source_str),
                target_is_geographic: is_geographic(&target_str),
            },
        })
    }

    /// Transform one coordinate pair, x-then-y in and out.
    ///
    /// Geographic coordinates are in degrees on both sides.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError> {
        match &self.pipeline {
            Pipeline::Identity => Ok((x, y)),
            Pipeline::Proj {
                source_proj,
                target_proj,
                source_is_geographic,
                target_is_geographic,
            } => {
                let mut point = if *source_is_geographic {
                    (x.to_radians(), y.to_radians(), 0.0)
                } else {
                    (x, y, 0.0)
                };

                transform(source_proj, target_proj, &mut point)
                    .map_err(|e| self.failure(x, y, format!("{e:?}")))?;

                let (out_x, out_y) = if *target_is_geographic {
                    (point.0.to_degrees(), point.1.to_degrees())
                } else {
                    (point.0, point.1)
                };

                if !out_x.is_finite() || !out_y.is_finite() {
                    return Err(self.failure(x, y, "non-finite result".to_string()));
                }

                Ok((out_x, out_y))
            }
        }
    }

    pub fn source(&self) -> CrsCode {
        self.source
    }

    pub fn target(&self) -> CrsCode {
        self.target
    }

    /// True when `apply` returns its input unchanged.
    pub fn is_identity(&self) -> bool {
        matches!(self.pipeline, Pipeline::Identity)
    }

    fn failure(&self, x: f64, y: f64, reason: String) -> TransformError {
        TransformError {
            x,
            y,
            source_crs: self.source,
            target_crs: self.target,
            reason,
        }
    }
}

impl fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reprojector")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("identity", &self.is_identity())
            .finish()
    }
}

/// The two reprojectors every conversion run needs.
#[derive(Debug)]
pub struct TargetPair {
    /// source -> EPSG:4326, yields (lon, lat)
    pub geographic: Reprojector,
    /// source -> EPSG:4978, yields (x, y)
    pub ecef: Reprojector,
}

impl TargetPair {
    pub fn build(source: CrsCode) -> Result<Self, ProjectionError> {
        Ok(Self {
            geographic: Reprojector::build(source, CrsCode::WGS84)?,
            ecef: Reprojector::build(source, CrsCode::ECEF)?,
        })
    }
}

fn resolve(code: CrsCode) -> Result<String, ProjectionError> {
    proj_string(code).ok_or(ProjectionError::UnknownCode { code })
}

fn parse(code: CrsCode, proj: &str) -> Result<Proj, ProjectionError> {
    Proj::from_proj_string(proj).map_err(|e| ProjectionError::InvalidDefinition {
        code,
        reason: format!("{e:?}"),
    })
}
