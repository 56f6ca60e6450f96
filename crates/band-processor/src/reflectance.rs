//! Top-of-atmosphere reflectance conversion.
//!
//! OCM-2 L1B sub-datasets store scaled radiance as signed 16-bit counts.
//! Reflectance for band b at solar elevation theta is
//!
//!   toa = (pi * rad * 10) / (esol[b] * 1000 * sin(theta))
//!
//! with esol the band's mean exo-atmospheric solar irradiance. Converted
//! values outside [0, 2] are physically implausible and reset to 0.

use ocm_common::{Raster, Samples};
use rayon::prelude::*;

use crate::BandProcessError;

/// Minimum pixels to benefit from parallel conversion.
const PARALLEL_THRESHOLD: usize = 4096;

/// Mean solar irradiance per spectral band, W/(cm^2 um), bands 0..=7.
pub const SOLAR_IRRADIANCE: [f64; 8] = [
    1.72815, 1.85211, 1.9721, 1.86697, 1.82781, 1.65765, 1.2897, 0.952073,
];

/// Number of spectral bands with irradiance calibration.
pub const TOA_BAND_COUNT: usize = SOLAR_IRRADIANCE.len();

/// Convert a radiance band to TOA reflectance.
///
/// The output is a Float32 raster with the input's no-data sentinel carried
/// over; no-data pixels are never converted.
pub fn toa_reflectance(
    raster: &Raster,
    band_index: usize,
    sun_elevation_deg: f64,
) -> Result<Raster, BandProcessError> {
    let esol = *SOLAR_IRRADIANCE
        .get(band_index)
        .ok_or(BandProcessError::BandIndexOutOfRange {
            index: band_index,
            max: TOA_BAND_COUNT - 1,
        })?;
    if sun_elevation_deg <= 0.0 || !sun_elevation_deg.is_finite() {
        return Err(BandProcessError::SunBelowHorizon {
            degrees: sun_elevation_deg,
        });
    }

    let denominator = esol * 1000.0 * sun_elevation_deg.to_radians().sin();
    let convert = |index: usize| -> f32 {
        // The shape was validated at construction, so every index is in range.
        let value = raster.value_at(index).unwrap_or(f64::NAN);
        if raster.is_no_data(value) {
            return raster.no_data().unwrap_or(f64::NAN) as f32;
        }
        let toa = (std::f64::consts::PI * value * 10.0) / denominator;
        if (0.0..=2.0).contains(&toa) {
            toa as f32
        } else {
            0.0
        }
    };

    let len = raster.len();
    let converted: Vec<f32> = if len >= PARALLEL_THRESHOLD {
        (0..len).into_par_iter().map(convert).collect()
    } else {
        (0..len).map(convert).collect()
    };

    Ok(Raster::new(
        raster.width(),
        raster.height(),
        Samples::F32(converted),
        raster.no_data(),
    )?)
}
