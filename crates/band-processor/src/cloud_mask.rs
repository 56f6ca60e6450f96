//! Threshold cloud mask over reflectance bands.
//!
//! Clouds are bright across the visible and near-infrared, so a pixel is
//! classified as cloud when its reflectance reaches the threshold in every
//! configured band. Any no-data input marks the pixel no-data.

use ocm_common::{Raster, Samples};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::BandProcessError;

const PARALLEL_THRESHOLD: usize = 4096;

/// No-data value of the mask raster.
pub const CLOUD_MASK_NO_DATA: u8 = 255;

/// Per-pixel mask classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CloudClass {
    Clear = 0,
    Cloud = 1,
    NoData = 255,
}

impl CloudClass {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Cloud mask tuning, overridable from the converter's config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudMaskConfig {
    /// Reflectance at or above which a band votes cloud.
    #[serde(default = "default_threshold")]
    pub reflectance_threshold: f64,

    /// Sub-dataset indices the mask is computed from.
    #[serde(default = "default_bands")]
    pub bands: Vec<usize>,
}

fn default_threshold() -> f64 {
    0.25
}

fn default_bands() -> Vec<usize> {
    // Blue and near-infrared.
    vec![0, 7]
}

impl Default for CloudMaskConfig {
    fn default() -> Self {
        Self {
            reflectance_threshold: default_threshold(),
            bands: default_bands(),
        }
    }
}

/// Classify every pixel across a set of co-registered reflectance bands.
pub fn cloud_mask(bands: &[&Raster], threshold: f64) -> Result<Raster, BandProcessError> {
    let first = *bands.first().ok_or(BandProcessError::NoMaskBands)?;
    if bands.iter().any(|b| !b.same_shape(first)) {
        return Err(BandProcessError::ShapeMismatch);
    }

    let classify = |index: usize| -> u8 {
        let mut cloudy = true;
        for band in bands {
            let value = band.value_at(index).unwrap_or(f64::NAN);
            if band.is_no_data(value) {
                return CloudClass::NoData.value();
            }
            cloudy &= value >= threshold;
        }
        if cloudy {
            CloudClass::Cloud.value()
        } else {
            CloudClass::Clear.value()
        }
    };

    let len = first.len();
    let classes: Vec<u8> = if len >= PARALLEL_THRESHOLD {
        (0..len).into_par_iter().map(classify).collect()
    } else {
        (0..len).map(classify).collect()
    };

    Ok(Raster::new(
        first.width(),
        first.height(),
        Samples::U8(classes),
        Some(CLOUD_MASK_NO_DATA as f64),
    )?)
}
