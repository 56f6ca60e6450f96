//! Converter configuration.
//!
//! Defaults work without any file; a YAML config can tune the cloud mask
//! and GeoTIFF encoding, and CLI flags override both.

use anyhow::{Context, Result};
use band_processor::CloudMaskConfig;
use clap::ValueEnum;
use geotiff_writer::{Compression, EncodeOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Strip compression choice, shared between YAML and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionSetting {
    None,
    #[default]
    Deflate,
}

impl CompressionSetting {
    pub fn to_encoder(self) -> Compression {
        match self {
            CompressionSetting::None => Compression::None,
            CompressionSetting::Deflate => Compression::Deflate,
        }
    }
}

/// Top-level converter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Cloud mask tuning.
    pub cloud_mask: CloudMaskConfig,

    /// Whether to derive and write the cloud mask at all.
    pub write_cloud_mask: WriteCloudMask,

    /// GeoTIFF strip compression.
    pub compression: CompressionSetting,

    /// Rows per strip; the encoder picks a size when unset.
    pub rows_per_strip: Option<usize>,
}

/// Newtype so `#[serde(default)]` yields `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriteCloudMask(pub bool);

impl Default for WriteCloudMask {
    fn default() -> Self {
        WriteCloudMask(true)
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub threshold: Option<f64>,
    pub no_cloud_mask: bool,
    pub compression: Option<CompressionSetting>,
    pub rows_per_strip: Option<usize>,
}

impl ConverterConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("Parsing config file {}", path.display()))
    }

    /// Layer the configuration: defaults, then the YAML file, then CLI flags.
    pub fn load(path: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    fn apply(&mut self, overrides: &CliOverrides) {
        if let Some(threshold) = overrides.threshold {
            self.cloud_mask.reflectance_threshold = threshold;
        }
        if overrides.no_cloud_mask {
            self.write_cloud_mask = WriteCloudMask(false);
        }
        if let Some(compression) = overrides.compression {
            self.compression = compression;
        }
        if let Some(rows) = overrides.rows_per_strip {
            self.rows_per_strip = Some(rows);
        }
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            compression: self.compression.to_encoder(),
            rows_per_strip: self.rows_per_strip,
        }
    }
}
