//! Shared types for the OCM-2 conversion toolkit.
//!
//! Everything downstream of the HDF4 parser speaks in terms of these types:
//! a [`Raster`] is a 2-D numeric array with shape and no-data metadata, and
//! a [`BoundingBox`] describes a geographic extent.

pub mod bbox;
pub mod raster;

pub use bbox::BoundingBox;
pub use raster::{Raster, RasterError, SampleType, Samples};
