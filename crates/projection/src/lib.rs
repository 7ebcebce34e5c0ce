//! Coordinate reference system transformations.
//!
//! Wraps `proj4rs` behind a build-once, apply-per-pixel [`Reprojector`].
//! Inputs and outputs are always ordered x-then-y (longitude before
//! latitude), whatever the native axis order of the CRS.

pub mod definitions;
pub mod error;
pub mod reprojector;

pub use definitions::{is_geographic, proj_string};
pub use error::{ProjectionError, TransformError};
pub use reprojector::{Reprojector, TargetPair};
