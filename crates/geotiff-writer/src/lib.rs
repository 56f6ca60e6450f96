//! GeoTIFF serialization for georeferenced rasters.
//!
//! Writes classic (non-BigTIFF) single-band GeoTIFFs with either an affine
//! transform (ModelPixelScale + one tiepoint) or ground control points
//! (one ModelTiepoint per GCP), WGS 84 geo keys, optional Deflate strip
//! compression, and a GDAL-compatible no-data tag.

pub mod encoder;
pub mod geokeys;
pub mod tags;

pub use encoder::{encode, write_file, Compression, EncodeOptions};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoTiffError {
    #[error("Strip compression failed: {0}")]
    Compression(String),

    #[error("EPSG code {0} does not fit a GeoTIFF key (max 65535)")]
    EpsgOutOfRange(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
