//! Error types for HDF4 parsing.

use thiserror::Error;

/// Result type alias for HDF4 operations.
pub type Hdf4Result<T> = Result<T, Hdf4Error>;

#[derive(Debug, Error)]
pub enum Hdf4Error {
    #[error("Not an HDF4 file (bad magic number)")]
    BadMagic,

    #[error("Truncated file: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("Descriptor block cycle detected at offset {0}")]
    DescriptorCycle(u32),

    #[error("Missing object: tag {tag} ref {ref_id}")]
    MissingObject { tag: u16, ref_id: u16 },

    #[error("Special element (tag {tag}, ref {ref_id}) not supported: linked-block and compressed storage are out of scope")]
    UnsupportedSpecialElement { tag: u16, ref_id: u16 },

    #[error("Unsupported number type code {0}")]
    UnsupportedNumberType(u8),

    #[error("Sub-dataset {index} has rank {rank}; only rank-2 arrays can be read")]
    UnsupportedRank { index: usize, rank: usize },

    #[error("Sub-dataset {index}: data length {actual} does not match dims ({expected} bytes)")]
    DataLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("No sub-dataset with index {0}")]
    NoSuchDataset(usize),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Raster(#[from] ocm_common::RasterError),
}
