//! Scene metadata from product attributes and naming.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use georef::CornerCoordinates;
use hdf4_parser::Hdf4File;
use std::path::Path;
use tracing::warn;

/// Geometry and acquisition metadata of one L1B scene.
#[derive(Debug, Clone)]
pub struct SceneMetadata {
    pub corners: CornerCoordinates,
    pub sun_elevation_deg: f64,
    pub acquisition_date: Option<NaiveDate>,
}

impl SceneMetadata {
    /// Extract metadata from a parsed product.
    ///
    /// Corner coordinates and the sun elevation are required; the
    /// acquisition date comes from the filename and is best effort.
    pub fn from_file(file: &Hdf4File, path: &Path) -> Result<Self> {
        let corners = CornerCoordinates::new(
            corner(file, "Upper Left")?,
            corner(file, "Upper Right")?,
            corner(file, "Lower Right")?,
            corner(file, "Lower Left")?,
        )?;

        let sun_elevation_deg = numeric_attribute(file, "Sun Elevation Angle")?;

        let acquisition_date = path
            .file_stem()
            .and_then(|stem| acquisition_date_from_name(&stem.to_string_lossy()));
        if acquisition_date.is_none() {
            warn!(path = %path.display(), "Could not derive acquisition date from filename");
        }

        Ok(Self {
            corners,
            sun_elevation_deg,
            acquisition_date,
        })
    }
}

fn corner(file: &Hdf4File, position: &str) -> Result<(f64, f64)> {
    let lon = numeric_attribute(file, &format!("{position} Longitude"))?;
    let lat = numeric_attribute(file, &format!("{position} Latitude"))?;
    Ok((lon, lat))
}

fn numeric_attribute(file: &Hdf4File, name: &str) -> Result<f64> {
    file.attribute(name)
        .ok_or_else(|| anyhow!("Missing global attribute '{name}'"))?
        .value
        .as_f64()
        .ok_or_else(|| anyhow!("Global attribute '{name}' is not numeric"))
}

/// Parse the acquisition date from the `O2_26APR2021_...` naming scheme.
pub fn acquisition_date_from_name(stem: &str) -> Option<NaiveDate> {
    let token = stem.split('_').nth(1)?;
    NaiveDate::parse_from_str(token, "%d%b%Y").ok()
}
