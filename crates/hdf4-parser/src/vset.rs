//! Vgroup and Vdata records.
//!
//! The SD layer of HDF4 mimics netCDF on top of the raw container: one
//! Vgroup of class `CDF0.0` for the file, one Vgroup of class `Var0.0` per
//! variable (its name is the sub-dataset name), and Vdatas of class
//! `Attr0.0` holding attribute values. Only what that layer needs is parsed
//! here.

use crate::dd::{self, tags, DataDescriptor};
use crate::error::{Hdf4Error, Hdf4Result};
use crate::ntype::NumberType;
use crate::reader::ByteReader;

/// Vgroup class used for the file-level group.
pub const CLASS_CDF: &str = "CDF0.0";
/// Vgroup class used for variables.
pub const CLASS_VAR: &str = "Var0.0";
/// Vdata class used for attributes.
pub const CLASS_ATTR: &str = "Attr0.0";

/// A parsed Vgroup record.
#[derive(Debug, Clone)]
pub struct Vgroup {
    pub ref_id: u16,
    pub name: String,
    pub class: String,
    /// Member (tag, ref) pairs.
    pub members: Vec<(u16, u16)>,
}

impl Vgroup {
    pub fn parse(ref_id: u16, payload: &[u8]) -> Hdf4Result<Self> {
        let mut reader = ByteReader::new(payload);
        let nelt = reader.read_u16()? as usize;

        let mut member_tags = Vec::with_capacity(nelt);
        for _ in 0..nelt {
            member_tags.push(reader.read_u16()?);
        }
        let mut members = Vec::with_capacity(nelt);
        for tag in member_tags {
            members.push((tag, reader.read_u16()?));
        }

        let name = reader.read_prefixed_string()?;
        let class = reader.read_prefixed_string()?;

        Ok(Self {
            ref_id,
            name,
            class,
            members,
        })
    }

    /// First member ref with the given tag.
    pub fn member_ref(&self, tag: u16) -> Option<u16> {
        self.members
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, r)| *r)
    }
}

/// One field of a Vdata record.
#[derive(Debug, Clone)]
pub struct VdataField {
    pub name: String,
    pub number_type: NumberType,
    pub isize: u16,
    pub order: u16,
}

/// A parsed Vdata header plus the location of its storage.
#[derive(Debug, Clone)]
pub struct Vdata {
    pub ref_id: u16,
    pub name: String,
    pub class: String,
    pub n_records: u32,
    pub record_size: u16,
    pub fields: Vec<VdataField>,
}

impl Vdata {
    pub fn parse(ref_id: u16, payload: &[u8]) -> Hdf4Result<Self> {
        let mut reader = ByteReader::new(payload);
        let _interlace = reader.read_u16()?;
        let n_records = reader.read_u32()?;
        let record_size = reader.read_u16()?;
        let nfields = reader.read_u16()? as usize;

        let mut type_codes = Vec::with_capacity(nfields);
        for _ in 0..nfields {
            type_codes.push(reader.read_u16()?);
        }
        let mut isizes = Vec::with_capacity(nfields);
        for _ in 0..nfields {
            isizes.push(reader.read_u16()?);
        }
        // Field offsets within a record; implied by isize order here.
        for _ in 0..nfields {
            reader.read_u16()?;
        }
        let mut orders = Vec::with_capacity(nfields);
        for _ in 0..nfields {
            orders.push(reader.read_u16()?);
        }

        let mut fields = Vec::with_capacity(nfields);
        for i in 0..nfields {
            let name = reader.read_prefixed_string()?;
            let code = u8::try_from(type_codes[i]).map_err(|_| {
                Hdf4Error::InvalidRecord(format!(
                    "Vdata {ref_id} field {name} has 16-bit type code {}",
                    type_codes[i]
                ))
            })?;
            fields.push(VdataField {
                name,
                number_type: NumberType::from_code(code)?,
                isize: isizes[i],
                order: orders[i],
            });
        }

        let name = reader.read_prefixed_string()?;
        let class = reader.read_prefixed_string()?;

        Ok(Self {
            ref_id,
            name,
            class,
            n_records,
            record_size,
            fields,
        })
    }

    /// Raw storage bytes for this Vdata (tag DFTAG_VS, same ref).
    pub fn storage<'a>(
        &self,
        descriptors: &[DataDescriptor],
        data: &'a [u8],
    ) -> Hdf4Result<&'a [u8]> {
        let dd = dd::find(descriptors, tags::DFTAG_VS, self.ref_id)?;
        dd.payload(data)
    }

    /// Total number of elements in a single-field Vdata.
    pub fn element_count(&self) -> usize {
        let order = self.fields.first().map(|f| f.order as usize).unwrap_or(1);
        self.n_records as usize * order.max(1)
    }
}

/// Parse every Vgroup and Vdata in the descriptor list, skipping records
/// that fail to parse (with a warning) rather than failing the whole file.
pub fn collect(
    descriptors: &[DataDescriptor],
    data: &[u8],
) -> (Vec<Vgroup>, Vec<Vdata>) {
    let mut vgroups = Vec::new();
    let mut vdatas = Vec::new();

    for dd in descriptors {
        match dd.tag {
            tags::DFTAG_VG => match dd.payload(data).and_then(|p| Vgroup::parse(dd.ref_id, p)) {
                Ok(vg) => vgroups.push(vg),
                Err(e) => tracing::warn!(ref_id = dd.ref_id, error = %e, "Skipping bad Vgroup"),
            },
            tags::DFTAG_VH => match dd.payload(data).and_then(|p| Vdata::parse(dd.ref_id, p)) {
                Ok(vd) => vdatas.push(vd),
                Err(e) => tracing::warn!(ref_id = dd.ref_id, error = %e, "Skipping bad Vdata"),
            },
            _ => {}
        }
    }

    (vgroups, vdatas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ntype::codes;

    fn vgroup_payload(members: &[(u16, u16)], name: &str, class: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(members.len() as u16).to_be_bytes());
        for (tag, _) in members {
            out.extend_from_slice(&tag.to_be_bytes());
        }
        for (_, r) in members {
            out.extend_from_slice(&r.to_be_bytes());
        }
        out.extend_from_slice(&(name.len() as u16).to_be_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&(class.len() as u16).to_be_bytes());
        out.extend_from_slice(class.as_bytes());
        out.extend_from_slice(&[0, 0, 0, 0]); // extag, exref
        out.extend_from_slice(&3u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out
    }

    #[test]
    fn test_parse_vgroup() {
        let payload = vgroup_payload(&[(720, 3), (1962, 9)], "L1B_Band1", CLASS_VAR);
        let vg = Vgroup::parse(5, &payload).unwrap();
        assert_eq!(vg.name, "L1B_Band1");
        assert_eq!(vg.class, CLASS_VAR);
        assert_eq!(vg.member_ref(720), Some(3));
        assert_eq!(vg.member_ref(1962), Some(9));
        assert_eq!(vg.member_ref(702), None);
    }

    #[test]
    fn test_parse_vdata_header() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&0u16.to_be_bytes()); // interlace
        payload.extend_from_slice(&4u32.to_be_bytes()); // nvert
        payload.extend_from_slice(&8u16.to_be_bytes()); // ivsize
        payload.extend_from_slice(&1u16.to_be_bytes()); // nfields
        payload.extend_from_slice(&(codes::DFNT_FLOAT64 as u16).to_be_bytes());
        payload.extend_from_slice(&8u16.to_be_bytes()); // isize
        payload.extend_from_slice(&0u16.to_be_bytes()); // offset
        payload.extend_from_slice(&1u16.to_be_bytes()); // order
        payload.extend_from_slice(&6u16.to_be_bytes());
        payload.extend_from_slice(b"VALUES");
        payload.extend_from_slice(&19u16.to_be_bytes());
        payload.extend_from_slice(b"Sun Elevation Angle");
        payload.extend_from_slice(&7u16.to_be_bytes());
        payload.extend_from_slice(b"Attr0.0");
        payload.extend_from_slice(&[0, 0, 0, 0]);
        payload.extend_from_slice(&3u16.to_be_bytes());
        payload.extend_from_slice(&0u16.to_be_bytes());

        let vd = Vdata::parse(9, &payload).unwrap();
        assert_eq!(vd.name, "Sun Elevation Angle");
        assert_eq!(vd.class, CLASS_ATTR);
        assert_eq!(vd.n_records, 4);
        assert_eq!(vd.fields.len(), 1);
        assert_eq!(vd.fields[0].name, "VALUES");
        assert_eq!(vd.element_count(), 4);
    }
}
