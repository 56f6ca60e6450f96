//! OCM-2 L1B converter.
//!
//! Turns Oceansat-2 Ocean Colour Monitor HDF4 products into georeferenced
//! GeoTIFFs: one TOA reflectance band per spectral sub-dataset, verbatim
//! copies of the non-spectral layers, and a threshold cloud mask.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use converter::config::{CliOverrides, CompressionSetting, ConverterConfig};
use converter::pipeline::{collect_inputs, convert_batch, output_base};

#[derive(Parser, Debug)]
#[command(name = "ocm2")]
#[command(about = "Convert OCM-2 L1B HDF products to georeferenced GeoTIFFs")]
struct Args {
    /// HDF file or directory of HDF files to convert
    input: PathBuf,

    /// Output directory (default: GeoTiff beside the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cloud mask reflectance threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Skip cloud mask derivation
    #[arg(long)]
    no_cloud_mask: bool,

    /// GeoTIFF strip compression
    #[arg(long, value_enum)]
    compression: Option<CompressionSetting>,

    /// Rows per GeoTIFF strip
    #[arg(long)]
    rows_per_strip: Option<usize>,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    summary_json: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so --summary-json output stays parseable.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let overrides = CliOverrides {
        threshold: args.threshold,
        no_cloud_mask: args.no_cloud_mask,
        compression: args.compression,
        rows_per_strip: args.rows_per_strip,
    };
    let config = ConverterConfig::load(args.config.as_deref(), &overrides)?;

    let inputs = collect_inputs(&args.input)?;
    let batch = inputs.len() > 1 || args.input.is_dir();
    let output_base = output_base(&args.input, args.output.as_deref());

    info!(files = inputs.len(), output = %output_base.display(), "Starting conversion");

    let outcome = convert_batch(&inputs, &output_base, batch, &config)?;

    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&outcome.summaries)?);
    }

    info!(
        converted = outcome.summaries.len(),
        failed = outcome.failures,
        "Conversion run finished"
    );
    Ok(())
}
