//! Spatial referencing for extracted rasters.
//!
//! A raster leaves the HDF4 parser with no notion of where it sits on the
//! Earth. This crate attaches that: a coordinate reference system plus
//! either an affine pixel-to-world transform or a set of ground control
//! points pinning image corners to geographic corners. Once attached, the
//! reference is immutable.

pub mod corners;
pub mod crs;
pub mod gcp;
pub mod transform;

mod referencing;

pub use corners::CornerCoordinates;
pub use crs::Crs;
pub use gcp::GroundControlPoint;
pub use referencing::{GeoreferencedRaster, Georeferencing};
pub use transform::AffineTransform;

use thiserror::Error;

/// Errors attaching spatial references.
#[derive(Debug, Error)]
pub enum GeorefError {
    #[error("GCP referencing needs at least 3 points, got {0}")]
    NotEnoughGcps(usize),

    #[error("Non-finite coordinate in {0}")]
    NonFiniteCoordinate(&'static str),

    #[error("Pixel size must be finite and non-zero")]
    InvalidPixelSize,
}
