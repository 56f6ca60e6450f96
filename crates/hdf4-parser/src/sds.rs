//! Scientific dataset discovery and array decoding.
//!
//! Sub-datasets are numeric data groups (tag 720): a dimension record
//! (tag 701) naming the number type, the raw big-endian array (tag 702),
//! and optional label (704) and fill value (732) members. Names come from
//! the `Var0.0` Vgroup layer when present, with the label as fallback.

use ocm_common::{Raster, SampleType, Samples};

use crate::dd::{self, tags, DataDescriptor};
use crate::error::{Hdf4Error, Hdf4Result};
use crate::ntype::NumberType;
use crate::reader::{latin1_trimmed, ByteReader};
use crate::vset::{self, Vgroup};

/// Descriptive entry for one sub-dataset.
#[derive(Debug, Clone)]
pub struct SubDataset {
    /// Position in file enumeration order.
    pub index: usize,
    /// Dataset name (`Var0.0` Vgroup name, label, or `subdataset_{i}`).
    pub name: String,
    /// Dimension sizes, slowest-varying first (rows, cols for rank 2).
    pub dims: Vec<u32>,
    /// Sample type of the stored array.
    pub sample_type: SampleType,
    /// Fill value from the container, if recorded.
    pub fill_value: Option<f64>,

    pub(crate) number_type: NumberType,
    pub(crate) data: DataDescriptor,
}

impl SubDataset {
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// (width, height) for rank-2 datasets.
    pub fn shape_2d(&self) -> Option<(usize, usize)> {
        match self.dims.as_slice() {
            [rows, cols] => Some((*cols as usize, *rows as usize)),
            _ => None,
        }
    }
}

/// Parsed dimension record (tag 701).
struct DimensionRecord {
    dims: Vec<u32>,
    nt_ref: u16,
}

fn parse_dimension_record(payload: &[u8]) -> Hdf4Result<DimensionRecord> {
    let mut reader = ByteReader::new(payload);
    let rank = reader.read_u16()? as usize;
    if rank == 0 || rank > 8 {
        return Err(Hdf4Error::InvalidRecord(format!(
            "dimension record with rank {rank}"
        )));
    }
    let mut dims = Vec::with_capacity(rank);
    for _ in 0..rank {
        dims.push(reader.read_u32()?);
    }
    let nt_tag = reader.read_u16()?;
    let nt_ref = reader.read_u16()?;
    if nt_tag != tags::DFTAG_NT {
        return Err(Hdf4Error::InvalidRecord(format!(
            "dimension record points at tag {nt_tag}, expected number type"
        )));
    }
    // Scale number-type refs follow; nothing here uses them.
    Ok(DimensionRecord { dims, nt_ref })
}

/// Discover all sub-datasets, in NDG file order.
pub(crate) fn discover(
    descriptors: &[DataDescriptor],
    data: &[u8],
    vgroups: &[Vgroup],
) -> Hdf4Result<Vec<SubDataset>> {
    // Variable Vgroups name the NDG they wrap.
    let mut names_by_ndg: Vec<(u16, &str)> = Vec::new();
    for vg in vgroups {
        if vg.class == vset::CLASS_VAR {
            if let Some(ndg_ref) = vg.member_ref(tags::DFTAG_NDG) {
                names_by_ndg.push((ndg_ref, &vg.name));
            }
        }
    }

    let mut datasets = Vec::new();
    for dd_entry in descriptors.iter().filter(|d| d.tag == tags::DFTAG_NDG) {
        let index = datasets.len();
        let members = parse_group_members(dd_entry.payload(data)?)?;

        let sdd_ref = member(&members, tags::DFTAG_SDD).ok_or(Hdf4Error::MissingObject {
            tag: tags::DFTAG_SDD,
            ref_id: dd_entry.ref_id,
        })?;
        let sd_ref = member(&members, tags::DFTAG_SD).ok_or(Hdf4Error::MissingObject {
            tag: tags::DFTAG_SD,
            ref_id: dd_entry.ref_id,
        })?;

        let sdd = dd::find(descriptors, tags::DFTAG_SDD, sdd_ref)?;
        let record = parse_dimension_record(sdd.payload(data)?)?;

        let nt_dd = dd::find(descriptors, tags::DFTAG_NT, record.nt_ref)?;
        let number_type = NumberType::parse(nt_dd.payload(data)?)?;
        let sample_type = number_type.sample_type()?;

        let data_dd = *dd::find(descriptors, tags::DFTAG_SD, sd_ref)?;

        let expected: usize = record.dims.iter().map(|d| *d as usize).product::<usize>()
            * number_type.byte_width()?;
        if data_dd.length as usize != expected {
            return Err(Hdf4Error::DataLengthMismatch {
                index,
                expected,
                actual: data_dd.length as usize,
            });
        }

        let name = names_by_ndg
            .iter()
            .find(|(r, _)| *r == dd_entry.ref_id)
            .map(|(_, n)| n.to_string())
            .or_else(|| label_name(&members, descriptors, data))
            .unwrap_or_else(|| format!("subdataset_{index}"));

        let fill_value = fill_value(&members, descriptors, data, number_type);

        datasets.push(SubDataset {
            index,
            name,
            dims: record.dims,
            sample_type,
            fill_value,
            number_type,
            data: data_dd,
        });
    }

    Ok(datasets)
}

fn parse_group_members(payload: &[u8]) -> Hdf4Result<Vec<(u16, u16)>> {
    let mut reader = ByteReader::new(payload);
    let count = payload.len() / 4;
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        let tag = reader.read_u16()?;
        let ref_id = reader.read_u16()?;
        members.push((tag, ref_id));
    }
    Ok(members)
}

fn member(members: &[(u16, u16)], tag: u16) -> Option<u16> {
    members.iter().find(|(t, _)| *t == tag).map(|(_, r)| *r)
}

/// First NUL-terminated string of the label record, if the group has one.
fn label_name(
    members: &[(u16, u16)],
    descriptors: &[DataDescriptor],
    data: &[u8],
) -> Option<String> {
    let ref_id = member(members, tags::DFTAG_SDL)?;
    let payload = dd::find(descriptors, tags::DFTAG_SDL, ref_id)
        .ok()?
        .payload(data)
        .ok()?;
    let first = payload.split(|&b| b == 0).next()?;
    if first.is_empty() {
        return None;
    }
    Some(latin1_trimmed(first))
}

fn fill_value(
    members: &[(u16, u16)],
    descriptors: &[DataDescriptor],
    data: &[u8],
    number_type: NumberType,
) -> Option<f64> {
    let ref_id = member(members, tags::DFTAG_FV)?;
    let payload = dd::find(descriptors, tags::DFTAG_FV, ref_id)
        .ok()?
        .payload(data)
        .ok()?;
    decode_samples(payload, number_type, 1).ok()?.get_f64(0)
}

/// Decode `count` big-endian elements into typed storage.
pub(crate) fn decode_samples(
    payload: &[u8],
    number_type: NumberType,
    count: usize,
) -> Hdf4Result<Samples> {
    use crate::ntype::codes::*;

    let width = number_type.byte_width()?;
    if payload.len() < count * width {
        return Err(Hdf4Error::Truncated {
            offset: 0,
            needed: count * width,
        });
    }

    let chunks = payload[..count * width].chunks_exact(width);
    Ok(match number_type.code {
        DFNT_UCHAR8 | DFNT_CHAR8 | DFNT_UINT8 => Samples::U8(payload[..count].to_vec()),
        DFNT_INT8 => Samples::I8(payload[..count].iter().map(|&b| b as i8).collect()),
        DFNT_INT16 => Samples::I16(
            chunks
                .map(|c| i16::from_be_bytes([c[0], c[1]]))
                .collect(),
        ),
        DFNT_UINT16 => Samples::U16(
            chunks
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect(),
        ),
        DFNT_INT32 => Samples::I32(
            chunks
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        DFNT_UINT32 => Samples::U32(
            chunks
                .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        DFNT_FLOAT32 => Samples::F32(
            chunks
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        DFNT_FLOAT64 => Samples::F64(
            chunks
                .map(|c| {
                    f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                })
                .collect(),
        ),
        other => return Err(Hdf4Error::UnsupportedNumberType(other)),
    })
}

/// Read a sub-dataset's array into a raster. Rank-2 only.
pub(crate) fn read_raster(dataset: &SubDataset, data: &[u8]) -> Hdf4Result<Raster> {
    let (width, height) = dataset.shape_2d().ok_or(Hdf4Error::UnsupportedRank {
        index: dataset.index,
        rank: dataset.rank(),
    })?;

    let payload = dataset.data.payload(data)?;
    let samples = decode_samples(payload, dataset.number_type, width * height)?;
    Ok(Raster::new(width, height, samples, dataset.fill_value)?)
}
