//! OCM-2 L1B to GeoTIFF conversion pipeline.

pub mod config;
pub mod pipeline;
pub mod scene;
