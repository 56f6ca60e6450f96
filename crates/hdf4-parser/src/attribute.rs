//! Global attributes.
//!
//! OCM-2 products carry scene metadata (corner coordinates, sun elevation)
//! as file attributes. Depending on the processing chain these arrive as
//! numeric arrays or as character strings, so the numeric accessor also
//! parses strings.

use crate::dd::DataDescriptor;
use crate::error::Hdf4Result;
use crate::ntype::codes;
use crate::reader::{latin1_trimmed, ByteReader};
use crate::vset::Vdata;

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl AttrValue {
    /// First element as f64; text values are parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Text(s) => s.trim().parse::<f64>().ok(),
            AttrValue::I8(v) => v.first().map(|x| *x as f64),
            AttrValue::U8(v) => v.first().map(|x| *x as f64),
            AttrValue::I16(v) => v.first().map(|x| *x as f64),
            AttrValue::U16(v) => v.first().map(|x| *x as f64),
            AttrValue::I32(v) => v.first().map(|x| *x as f64),
            AttrValue::U32(v) => v.first().map(|x| *x as f64),
            AttrValue::F32(v) => v.first().map(|x| *x as f64),
            AttrValue::F64(v) => v.first().copied(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A named global attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl Attribute {
    /// Decode an `Attr0.0` Vdata into an attribute.
    pub fn from_vdata(
        vdata: &Vdata,
        descriptors: &[DataDescriptor],
        data: &[u8],
    ) -> Hdf4Result<Self> {
        let storage = vdata.storage(descriptors, data)?;
        let count = vdata.element_count();
        let nt = vdata
            .fields
            .first()
            .map(|f| f.number_type)
            .ok_or_else(|| {
                crate::error::Hdf4Error::InvalidRecord(format!(
                    "attribute Vdata {} has no fields",
                    vdata.name
                ))
            })?;

        let value = if nt.is_char() {
            AttrValue::Text(latin1_trimmed(&storage[..count.min(storage.len())]))
        } else {
            let mut reader = ByteReader::new(storage);
            match nt.code {
                codes::DFNT_INT8 => {
                    AttrValue::I8(read_n(count, || Ok(reader.read_u8()? as i8))?)
                }
                codes::DFNT_UINT8 => AttrValue::U8(read_n(count, || reader.read_u8())?),
                codes::DFNT_INT16 => AttrValue::I16(read_n(count, || reader.read_i16())?),
                codes::DFNT_UINT16 => AttrValue::U16(read_n(count, || reader.read_u16())?),
                codes::DFNT_INT32 => {
                    AttrValue::I32(read_n(count, || Ok(reader.read_u32()? as i32))?)
                }
                codes::DFNT_UINT32 => AttrValue::U32(read_n(count, || reader.read_u32())?),
                codes::DFNT_FLOAT32 => {
                    AttrValue::F32(read_n(count, || Ok(f32::from_bits(reader.read_u32()?)))?)
                }
                codes::DFNT_FLOAT64 => AttrValue::F64(read_n(count, || {
                    let hi = reader.read_u32()? as u64;
                    let lo = reader.read_u32()? as u64;
                    Ok(f64::from_bits((hi << 32) | lo))
                })?),
                other => return Err(crate::error::Hdf4Error::UnsupportedNumberType(other)),
            }
        };

        Ok(Self {
            name: vdata.name.clone(),
            value,
        })
    }
}

fn read_n<T>(
    count: usize,
    mut read_one: impl FnMut() -> Hdf4Result<T>,
) -> Hdf4Result<Vec<T>> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(read_one()?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_attribute_parses_as_number() {
        let value = AttrValue::Text("  64.23 ".to_string());
        assert_eq!(value.as_f64(), Some(64.23));
        assert_eq!(value.as_str(), Some("  64.23 "));
    }

    #[test]
    fn test_numeric_attribute_first_element() {
        assert_eq!(AttrValue::F64(vec![72.5, 1.0]).as_f64(), Some(72.5));
        assert_eq!(AttrValue::I16(vec![]).as_f64(), None);
        assert_eq!(AttrValue::F64(vec![]).as_f64(), None);
    }

    #[test]
    fn test_non_numeric_text() {
        assert_eq!(AttrValue::Text("OCM-2".to_string()).as_f64(), None);
    }
}
