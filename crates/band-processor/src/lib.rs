//! Radiometric band processing.
//!
//! Converts OCM-2 L1B radiance counts to top-of-atmosphere reflectance and
//! derives a categorical cloud mask from the converted bands.

pub mod cloud_mask;
pub mod reflectance;

pub use cloud_mask::{cloud_mask, CloudClass, CloudMaskConfig, CLOUD_MASK_NO_DATA};
pub use reflectance::{toa_reflectance, SOLAR_IRRADIANCE, TOA_BAND_COUNT};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BandProcessError {
    #[error("Band index {index} has no solar irradiance entry (bands 0..={max})")]
    BandIndexOutOfRange { index: usize, max: usize },

    #[error("Sun elevation {degrees} degrees is at or below the horizon")]
    SunBelowHorizon { degrees: f64 },

    #[error("Mask input bands have differing dimensions")]
    ShapeMismatch,

    #[error("Cloud mask requires at least one input band")]
    NoMaskBands,

    #[error(transparent)]
    Raster(#[from] ocm_common::RasterError),
}

/// Whether a sub-dataset index is radiometrically convertible.
///
/// Higher-indexed sub-datasets (quality flags and the like) pass through
/// the pipeline unconverted.
pub fn converts_to_reflectance(band_index: usize) -> bool {
    band_index < TOA_BAND_COUNT
}
