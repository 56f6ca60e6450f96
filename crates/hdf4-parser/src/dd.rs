//! Data descriptor (DD) list walking.
//!
//! An HDF4 file is a 4-byte magic number followed by a chain of DD blocks.
//! Each block holds a count, the offset of the next block, and fixed-size
//! descriptors of tag / reference / offset / length. Everything else in the
//! container is reached through this list.

use crate::error::{Hdf4Error, Hdf4Result};
use crate::reader::ByteReader;

/// HDF4 magic number (`^N^C^S^A`).
pub const HDF_MAGIC: [u8; 4] = [0x0e, 0x03, 0x13, 0x01];

/// Tag numbers used by OCM-2 products.
pub mod tags {
    /// Empty descriptor slot.
    pub const DFTAG_NULL: u16 = 1;
    /// Library version string.
    pub const DFTAG_VERSION: u16 = 30;
    /// Number type.
    pub const DFTAG_NT: u16 = 106;
    /// Scientific data dimension record.
    pub const DFTAG_SDD: u16 = 701;
    /// Scientific data (raw array bytes).
    pub const DFTAG_SD: u16 = 702;
    /// Scientific data scales.
    pub const DFTAG_SDS: u16 = 703;
    /// Scientific data labels.
    pub const DFTAG_SDL: u16 = 704;
    /// Numeric data group.
    pub const DFTAG_NDG: u16 = 720;
    /// Fill value.
    pub const DFTAG_FV: u16 = 732;
    /// Vdata header.
    pub const DFTAG_VH: u16 = 1962;
    /// Vdata storage.
    pub const DFTAG_VS: u16 = 1963;
    /// Vgroup.
    pub const DFTAG_VG: u16 = 1965;

    /// Bit marking a special (linked-block / external / compressed) element.
    pub const SPECIAL_BIT: u16 = 0x4000;
}

/// One entry in the DD list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDescriptor {
    pub tag: u16,
    pub ref_id: u16,
    pub offset: u32,
    pub length: u32,
}

impl DataDescriptor {
    /// Whether this descriptor points at special-element storage.
    pub fn is_special(&self) -> bool {
        self.tag & tags::SPECIAL_BIT != 0
    }

    /// Tag with the special bit cleared.
    pub fn base_tag(&self) -> u16 {
        self.tag & !tags::SPECIAL_BIT
    }

    /// The payload bytes this descriptor points at.
    pub fn payload<'a>(&self, data: &'a [u8]) -> Hdf4Result<&'a [u8]> {
        let start = self.offset as usize;
        let end = start + self.length as usize;
        if end > data.len() {
            return Err(Hdf4Error::Truncated {
                offset: start,
                needed: self.length as usize,
            });
        }
        Ok(&data[start..end])
    }
}

/// Walk the DD block chain and collect all live descriptors in file order.
pub fn read_dd_list(data: &[u8]) -> Hdf4Result<Vec<DataDescriptor>> {
    if data.len() < 4 || data[0..4] != HDF_MAGIC {
        return Err(Hdf4Error::BadMagic);
    }

    let mut descriptors = Vec::new();
    let mut visited = Vec::new();
    let mut block_offset: u32 = 4;

    while block_offset != 0 {
        if visited.contains(&block_offset) {
            return Err(Hdf4Error::DescriptorCycle(block_offset));
        }
        visited.push(block_offset);

        let mut reader = ByteReader::at(data, block_offset as usize);
        let ndds = reader.read_i16()?;
        let next = reader.read_u32()?;

        if ndds < 0 {
            return Err(Hdf4Error::InvalidRecord(format!(
                "negative descriptor count at offset {block_offset}"
            )));
        }

        for _ in 0..ndds {
            let tag = reader.read_u16()?;
            let ref_id = reader.read_u16()?;
            let offset = reader.read_u32()?;
            let length = reader.read_u32()?;

            // NULL slots are pre-allocated free entries.
            if tag == tags::DFTAG_NULL || tag == 0 {
                continue;
            }
            descriptors.push(DataDescriptor {
                tag,
                ref_id,
                offset,
                length,
            });
        }

        block_offset = next;
    }

    Ok(descriptors)
}

/// Find a descriptor by tag and reference number.
///
/// If the plain tag is absent but a special-element variant exists, that is
/// reported as unsupported rather than missing.
pub fn find<'a>(
    descriptors: &'a [DataDescriptor],
    tag: u16,
    ref_id: u16,
) -> Hdf4Result<&'a DataDescriptor> {
    if let Some(dd) = descriptors
        .iter()
        .find(|d| d.tag == tag && d.ref_id == ref_id)
    {
        return Ok(dd);
    }
    if descriptors
        .iter()
        .any(|d| d.is_special() && d.base_tag() == tag && d.ref_id == ref_id)
    {
        return Err(Hdf4Error::UnsupportedSpecialElement { tag, ref_id });
    }
    Err(Hdf4Error::MissingObject { tag, ref_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_block_file(entries: &[(u16, u16, u32, u32)]) -> Vec<u8> {
        let mut out = HDF_MAGIC.to_vec();
        out.extend_from_slice(&(entries.len() as i16).to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        for (tag, ref_id, offset, length) in entries {
            out.extend_from_slice(&tag.to_be_bytes());
            out.extend_from_slice(&ref_id.to_be_bytes());
            out.extend_from_slice(&offset.to_be_bytes());
            out.extend_from_slice(&length.to_be_bytes());
        }
        out
    }

    #[test]
    fn test_rejects_bad_magic() {
        assert!(matches!(
            read_dd_list(b"MM\x00\x2a"),
            Err(Hdf4Error::BadMagic)
        ));
    }

    #[test]
    fn test_reads_single_block() {
        let file = single_block_file(&[
            (tags::DFTAG_NT, 1, 100, 4),
            (tags::DFTAG_NULL, 0, 0, 0),
            (tags::DFTAG_SD, 2, 104, 32),
        ]);
        let dds = read_dd_list(&file).unwrap();
        assert_eq!(dds.len(), 2);
        assert_eq!(dds[0].tag, tags::DFTAG_NT);
        assert_eq!(dds[1].ref_id, 2);
    }

    #[test]
    fn test_detects_block_cycle() {
        // Block at offset 4 pointing back at itself.
        let mut file = HDF_MAGIC.to_vec();
        file.extend_from_slice(&0i16.to_be_bytes());
        file.extend_from_slice(&4u32.to_be_bytes());
        assert!(matches!(
            read_dd_list(&file),
            Err(Hdf4Error::DescriptorCycle(4))
        ));
    }

    #[test]
    fn test_special_element_reported() {
        let file = single_block_file(&[(
            tags::DFTAG_SD | tags::SPECIAL_BIT,
            7,
            100,
            8,
        )]);
        let dds = read_dd_list(&file).unwrap();
        assert!(matches!(
            find(&dds, tags::DFTAG_SD, 7),
            Err(Hdf4Error::UnsupportedSpecialElement { tag: 702, ref_id: 7 })
        ));
        assert!(matches!(
            find(&dds, tags::DFTAG_SD, 8),
            Err(Hdf4Error::MissingObject { .. })
        ));
    }
}
