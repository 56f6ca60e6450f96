//! HDF number-type records (tag 106).

use ocm_common::SampleType;

use crate::error::{Hdf4Error, Hdf4Result};
use crate::reader::ByteReader;

/// DFNT number type codes.
pub mod codes {
    pub const DFNT_UCHAR8: u8 = 3;
    pub const DFNT_CHAR8: u8 = 4;
    pub const DFNT_FLOAT32: u8 = 5;
    pub const DFNT_FLOAT64: u8 = 6;
    pub const DFNT_INT8: u8 = 20;
    pub const DFNT_UINT8: u8 = 21;
    pub const DFNT_INT16: u8 = 22;
    pub const DFNT_UINT16: u8 = 23;
    pub const DFNT_INT32: u8 = 24;
    pub const DFNT_UINT32: u8 = 25;
}

/// A parsed number-type record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberType {
    pub code: u8,
    pub width_bits: u8,
}

impl NumberType {
    /// Parse the 4-byte NT payload: version, type code, width, class.
    pub fn parse(payload: &[u8]) -> Hdf4Result<Self> {
        let mut reader = ByteReader::new(payload);
        let _version = reader.read_u8()?;
        let code = reader.read_u8()?;
        let width_bits = reader.read_u8()?;
        let _class = reader.read_u8()?;

        let nt = Self { code, width_bits };
        // Validate eagerly so the error points at the NT record.
        nt.byte_width()?;
        Ok(nt)
    }

    /// Construct from a bare DFNT code (as used in Vdata field types).
    pub fn from_code(code: u8) -> Hdf4Result<Self> {
        let nt = Self {
            code,
            width_bits: 0,
        };
        let width = nt.byte_width()?;
        Ok(Self {
            code,
            width_bits: (width * 8) as u8,
        })
    }

    /// Bytes per element.
    pub fn byte_width(&self) -> Hdf4Result<usize> {
        use codes::*;
        Ok(match self.code {
            DFNT_UCHAR8 | DFNT_CHAR8 | DFNT_INT8 | DFNT_UINT8 => 1,
            DFNT_INT16 | DFNT_UINT16 => 2,
            DFNT_FLOAT32 | DFNT_INT32 | DFNT_UINT32 => 4,
            DFNT_FLOAT64 => 8,
            other => return Err(Hdf4Error::UnsupportedNumberType(other)),
        })
    }

    /// Whether this is a character (string) type.
    pub fn is_char(&self) -> bool {
        self.code == codes::DFNT_CHAR8 || self.code == codes::DFNT_UCHAR8
    }

    /// The raster sample type for this number type.
    ///
    /// Character data maps to unsigned bytes; callers that want text should
    /// check [`is_char`](Self::is_char) first.
    pub fn sample_type(&self) -> Hdf4Result<SampleType> {
        use codes::*;
        Ok(match self.code {
            DFNT_UCHAR8 | DFNT_CHAR8 | DFNT_UINT8 => SampleType::UInt8,
            DFNT_INT8 => SampleType::Int8,
            DFNT_INT16 => SampleType::Int16,
            DFNT_UINT16 => SampleType::UInt16,
            DFNT_INT32 => SampleType::Int32,
            DFNT_UINT32 => SampleType::UInt32,
            DFNT_FLOAT32 => SampleType::Float32,
            DFNT_FLOAT64 => SampleType::Float64,
            other => return Err(Hdf4Error::UnsupportedNumberType(other)),
        })
    }
}
