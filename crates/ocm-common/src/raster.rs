//! In-memory raster model.
//!
//! A [`Raster`] is a single-band 2-D array in row-major order, paired with
//! its sample type and an optional no-data sentinel. The HDF4 parser
//! produces rasters, the band processor transforms them, and the GeoTIFF
//! writer serializes them.

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric sample types supported by the pipeline.
///
/// These mirror the HDF4 number types an OCM-2 L1B product can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleType {
    UInt8,
    Int8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl SampleType {
    /// Bits per sample, as written to the TIFF BitsPerSample tag.
    pub fn bits(&self) -> u16 {
        match self {
            SampleType::UInt8 | SampleType::Int8 => 8,
            SampleType::Int16 | SampleType::UInt16 => 16,
            SampleType::Int32 | SampleType::UInt32 | SampleType::Float32 => 32,
            SampleType::Float64 => 64,
        }
    }

    /// Bytes per sample.
    pub fn byte_width(&self) -> usize {
        self.bits() as usize / 8
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::Float32 | SampleType::Float64)
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            SampleType::Int8 | SampleType::Int16 | SampleType::Int32
        )
    }
}

/// Typed sample storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::I8(v) => v.len(),
            Samples::I16(v) => v.len(),
            Samples::U16(v) => v.len(),
            Samples::I32(v) => v.len(),
            Samples::U32(v) => v.len(),
            Samples::F32(v) => v.len(),
            Samples::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_type(&self) -> SampleType {
        match self {
            Samples::U8(_) => SampleType::UInt8,
            Samples::I8(_) => SampleType::Int8,
            Samples::I16(_) => SampleType::Int16,
            Samples::U16(_) => SampleType::UInt16,
            Samples::I32(_) => SampleType::Int32,
            Samples::U32(_) => SampleType::UInt32,
            Samples::F32(_) => SampleType::Float32,
            Samples::F64(_) => SampleType::Float64,
        }
    }

    /// Read a sample as f64. Lossless for every supported type.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match self {
            Samples::U8(v) => v.get(index).and_then(|s| s.to_f64()),
            Samples::I8(v) => v.get(index).and_then(|s| s.to_f64()),
            Samples::I16(v) => v.get(index).and_then(|s| s.to_f64()),
            Samples::U16(v) => v.get(index).and_then(|s| s.to_f64()),
            Samples::I32(v) => v.get(index).and_then(|s| s.to_f64()),
            Samples::U32(v) => v.get(index).and_then(|s| s.to_f64()),
            Samples::F32(v) => v.get(index).and_then(|s| s.to_f64()),
            Samples::F64(v) => v.get(index).copied(),
        }
    }

    /// Serialize all samples as little-endian bytes (TIFF byte order).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Samples::U8(v) => v.clone(),
            Samples::I8(v) => v.iter().map(|s| *s as u8).collect(),
            Samples::I16(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            Samples::U16(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            Samples::I32(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            Samples::U32(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            Samples::F32(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            Samples::F64(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
        }
    }
}

/// Errors constructing or indexing rasters.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Sample count {actual} does not match {width}x{height}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("Raster dimensions must be non-zero")]
    EmptyRaster,
}

/// A single-band raster in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    samples: Samples,
    no_data: Option<f64>,
}

impl Raster {
    /// Create a raster, validating that the sample count matches the shape.
    pub fn new(
        width: usize,
        height: usize,
        samples: Samples,
        no_data: Option<f64>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyRaster);
        }
        if samples.len() != width * height {
            return Err(RasterError::ShapeMismatch {
                width,
                height,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
            no_data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn sample_type(&self) -> SampleType {
        self.samples.sample_type()
    }

    pub fn no_data(&self) -> Option<f64> {
        self.no_data
    }

    /// Read the value at (row, col) as f64.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.samples.get_f64(row * self.width + col)
    }

    /// Read the value at a flat row-major index.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.samples.get_f64(index)
    }

    /// Whether a value matches the no-data sentinel. NaN is always no-data.
    pub fn is_no_data(&self, value: f64) -> bool {
        if value.is_nan() {
            return true;
        }
        match self.no_data {
            Some(sentinel) => value == sentinel,
            None => false,
        }
    }

    /// Whether this raster has the same dimensions as another.
    pub fn same_shape(&self, other: &Raster) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_validation() {
        let r = Raster::new(3, 2, Samples::I16(vec![1, 2, 3, 4, 5, 6]), None).unwrap();
        assert_eq!(r.len(), 6);
        assert_eq!(r.sample_type(), SampleType::Int16);

        let err = Raster::new(3, 2, Samples::I16(vec![1, 2, 3]), None).unwrap_err();
        assert!(matches!(err, RasterError::ShapeMismatch { actual: 3, .. }));

        let err = Raster::new(0, 2, Samples::I16(vec![]), None).unwrap_err();
        assert!(matches!(err, RasterError::EmptyRaster));
    }

    #[test]
    fn test_row_major_indexing() {
        let r = Raster::new(3, 2, Samples::U8(vec![10, 11, 12, 20, 21, 22]), None).unwrap();
        assert_eq!(r.value(0, 0), Some(10.0));
        assert_eq!(r.value(0, 2), Some(12.0));
        assert_eq!(r.value(1, 1), Some(21.0));
        assert_eq!(r.value(2, 0), None);
        assert_eq!(r.value(0, 3), None);
    }

    #[test]
    fn test_no_data_sentinel() {
        let r = Raster::new(
            2,
            1,
            Samples::I16(vec![-32768, 100]),
            Some(-32768.0),
        )
        .unwrap();
        assert!(r.is_no_data(-32768.0));
        assert!(!r.is_no_data(100.0));
        assert!(r.is_no_data(f64::NAN));
    }

    #[test]
    fn test_le_bytes() {
        let s = Samples::I16(vec![1, -2]);
        assert_eq!(s.to_le_bytes(), vec![0x01, 0x00, 0xfe, 0xff]);

        let s = Samples::F32(vec![1.0]);
        assert_eq!(s.to_le_bytes(), 1.0_f32.to_le_bytes().to_vec());
    }

    #[test]
    fn test_sample_type_bits() {
        assert_eq!(SampleType::UInt8.bits(), 8);
        assert_eq!(SampleType::Int16.bits(), 16);
        assert_eq!(SampleType::Float64.bits(), 64);
        assert!(SampleType::Float32.is_float());
        assert!(SampleType::Int16.is_signed());
        assert!(!SampleType::UInt16.is_signed());
    }
}
