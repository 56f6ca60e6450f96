//! Conversion pipeline.
//!
//! Parses the HDF4 container, converts spectral bands to TOA reflectance,
//! attaches ground-control-point referencing from the scene corners, and
//! writes one GeoTIFF per sub-dataset plus the optional cloud mask.
//! Batch runs over a directory keep going past individual failures.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use band_processor::{cloud_mask, converts_to_reflectance, toa_reflectance};
use chrono::NaiveDate;
use georef::{Crs, GeoreferencedRaster, Georeferencing};
use geotiff_writer::write_file;
use hdf4_parser::Hdf4File;
use ocm_common::Raster;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::config::ConverterConfig;
use crate::scene::SceneMetadata;

/// What one conversion produced.
#[derive(Debug, Serialize)]
pub struct ConvertSummary {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub acquisition_date: Option<NaiveDate>,
    pub bands_written: Vec<String>,
    pub bands_skipped: Vec<String>,
    pub cloud_mask_written: bool,
}

/// What a whole run produced.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub summaries: Vec<ConvertSummary>,
    pub failures: usize,
}

/// A single file, or every `.hdf` under a directory (sorted).
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("Input {} does not exist", input.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("hdf"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        bail!("No .hdf files found under {}", input.display());
    }
    Ok(files)
}

/// Where outputs land: an explicit override, or `GeoTiff` beside the input.
pub fn output_base(input: &Path, output: Option<&Path>) -> PathBuf {
    if let Some(output) = output {
        return output.to_path_buf();
    }
    if input.is_dir() {
        input.join("GeoTiff")
    } else {
        input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("GeoTiff")
    }
}

/// Convert every input, one subdirectory per file in batch mode.
///
/// Individual failures are logged and counted; the run as a whole errors
/// only when every input fails.
pub fn convert_batch(
    inputs: &[PathBuf],
    output_base: &Path,
    batch: bool,
    config: &ConverterConfig,
) -> Result<BatchOutcome> {
    let mut summaries: Vec<ConvertSummary> = Vec::new();
    let mut failures = 0usize;
    for input in inputs {
        let output_dir = if batch {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scene".to_string());
            output_base.join(stem)
        } else {
            output_base.to_path_buf()
        };

        match convert_file(input, &output_dir, config) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                error!(input = %input.display(), error = %e, "Conversion failed");
                failures += 1;
            }
        }
    }

    if !inputs.is_empty() && summaries.is_empty() {
        bail!("All {} input file(s) failed to convert", inputs.len());
    }
    Ok(BatchOutcome {
        summaries,
        failures,
    })
}

enum BandOutcome {
    Written {
        index: usize,
        file_name: String,
        reflectance: Option<Raster>,
    },
    Skipped {
        name: String,
    },
}

/// Convert a single L1B product into a directory of GeoTIFFs.
///
/// The output directory is recreated from scratch on every run.
pub fn convert_file(
    input: &Path,
    output_dir: &Path,
    config: &ConverterConfig,
) -> Result<ConvertSummary> {
    let file =
        Hdf4File::open(input).with_context(|| format!("Parsing {}", input.display()))?;
    let metadata = SceneMetadata::from_file(&file, input)?;
    if metadata.sun_elevation_deg <= 0.0 {
        bail!(
            "Sun elevation {} degrees is at or below the horizon",
            metadata.sun_elevation_deg
        );
    }

    if output_dir.exists() {
        std::fs::remove_dir_all(output_dir)
            .with_context(|| format!("Clearing output directory {}", output_dir.display()))?;
    }
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Creating output directory {}", output_dir.display()))?;

    info!(
        input = %input.display(),
        output = %output_dir.display(),
        datasets = file.sub_datasets().len(),
        sun_elevation = metadata.sun_elevation_deg,
        "Converting scene"
    );

    let dataset_count = file.sub_datasets().len();
    let outcomes: Vec<BandOutcome> = (0..dataset_count)
        .into_par_iter()
        .map(|index| process_band(&file, index, &metadata, config, output_dir))
        .collect::<Result<_>>()?;

    let mut bands_written = Vec::new();
    let mut bands_skipped = Vec::new();
    let mut reflectance_by_index: Vec<Option<Raster>> = (0..dataset_count).map(|_| None).collect();
    for outcome in outcomes {
        match outcome {
            BandOutcome::Written {
                index,
                file_name,
                reflectance,
            } => {
                reflectance_by_index[index] = reflectance;
                bands_written.push(file_name);
            }
            BandOutcome::Skipped { name } => bands_skipped.push(name),
        }
    }
    bands_written.sort();

    let cloud_mask_written = if config.write_cloud_mask.0 {
        write_mask(&reflectance_by_index, config, &metadata, output_dir)?
    } else {
        false
    };

    info!(
        written = bands_written.len(),
        skipped = bands_skipped.len(),
        cloud_mask = cloud_mask_written,
        "Scene converted"
    );

    Ok(ConvertSummary {
        input: input.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        acquisition_date: metadata.acquisition_date,
        bands_written,
        bands_skipped,
        cloud_mask_written,
    })
}

/// Read, convert, reference, and write one sub-dataset.
///
/// Unreadable datasets (wrong rank, truncated payload) are skipped so one
/// bad layer does not sink the scene; write failures are fatal.
fn process_band(
    file: &Hdf4File,
    index: usize,
    metadata: &SceneMetadata,
    config: &ConverterConfig,
    output_dir: &Path,
) -> Result<BandOutcome> {
    let name = file.sub_datasets()[index].name.clone();

    let raster = match file.read_raster(index) {
        Ok(raster) => raster,
        Err(e) => {
            warn!(dataset = %name, error = %e, "Skipping unreadable sub-dataset");
            return Ok(BandOutcome::Skipped { name });
        }
    };

    let (raster, reflectance) = if converts_to_reflectance(index) {
        let converted = toa_reflectance(&raster, index, metadata.sun_elevation_deg)?;
        let for_mask = config
            .cloud_mask
            .bands
            .contains(&index)
            .then(|| converted.clone());
        (converted, for_mask)
    } else {
        (raster, None)
    };

    let file_name = format!("band{index}_georef.tif");
    let referenced = reference(raster, metadata)?;
    write_file(output_dir.join(&file_name), &referenced, &config.encode_options())
        .with_context(|| format!("Writing {file_name}"))?;

    Ok(BandOutcome::Written {
        index,
        file_name,
        reflectance,
    })
}

fn reference(raster: Raster, metadata: &SceneMetadata) -> Result<GeoreferencedRaster> {
    let gcps = metadata
        .corners
        .to_gcps(raster.width(), raster.height());
    let referencing = Georeferencing::from_gcps(gcps, Crs::wgs84())?;
    Ok(GeoreferencedRaster::new(raster, referencing))
}

/// Derive and write the cloud mask, if every configured band converted.
fn write_mask(
    reflectance_by_index: &[Option<Raster>],
    config: &ConverterConfig,
    metadata: &SceneMetadata,
    output_dir: &Path,
) -> Result<bool> {
    let mut inputs = Vec::with_capacity(config.cloud_mask.bands.len());
    for &band in &config.cloud_mask.bands {
        match reflectance_by_index.get(band).and_then(|r| r.as_ref()) {
            Some(raster) => inputs.push(raster),
            None => {
                warn!(band, "Cloud mask band unavailable, skipping mask");
                return Ok(false);
            }
        }
    }

    let mask = cloud_mask(&inputs, config.cloud_mask.reflectance_threshold)?;
    let referenced = reference(mask, metadata)?;
    write_file(
        output_dir.join("cloud_mask.tif"),
        &referenced,
        &config.encode_options(),
    )
    .context("Writing cloud_mask.tif")?;
    Ok(true)
}
