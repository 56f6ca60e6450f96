//! Pure Rust reader for HDF4 scientific data files.
//!
//! Covers what an OCM-2 L1B product needs: the data-descriptor list, number
//! types, numeric data groups, and the Vgroup/Vdata layer that carries
//! sub-dataset names and global attributes. Linked-block, external, and
//! compressed special elements are rejected with a typed error; OCM-2
//! products store their arrays contiguous and uncompressed.
//!
//! # Example
//!
//! ```no_run
//! use hdf4_parser::Hdf4File;
//!
//! let file = Hdf4File::open("O2_26APR2021_009_011_GAN_L1B_ST_S.hdf")?;
//! for sds in file.sub_datasets() {
//!     println!("{}: {:?} {:?}", sds.name, sds.dims, sds.sample_type);
//! }
//! let band = file.read_raster(0)?;
//! # Ok::<(), hdf4_parser::Hdf4Error>(())
//! ```

pub mod attribute;
pub mod dd;
pub mod error;
pub mod ntype;
pub mod sds;
pub mod vset;

mod reader;

pub use attribute::{AttrValue, Attribute};
pub use error::{Hdf4Error, Hdf4Result};
pub use sds::SubDataset;

use std::path::Path;

use bytes::Bytes;
use ocm_common::Raster;
use tracing::debug;

use dd::DataDescriptor;

/// An opened HDF4 file.
///
/// The whole container is held in memory; OCM-2 L1B products are a few
/// hundred megabytes at most.
#[derive(Debug)]
pub struct Hdf4File {
    data: Bytes,
    datasets: Vec<SubDataset>,
    attributes: Vec<Attribute>,
}

impl Hdf4File {
    /// Parse an HDF4 container from bytes.
    pub fn from_bytes(data: Bytes) -> Hdf4Result<Self> {
        let descriptors = dd::read_dd_list(&data)?;
        let (vgroups, vdatas) = vset::collect(&descriptors, &data);
        let datasets = sds::discover(&descriptors, &data, &vgroups)?;
        let attributes = file_attributes(&descriptors, &data, &vgroups, &vdatas);

        debug!(
            descriptors = descriptors.len(),
            datasets = datasets.len(),
            attributes = attributes.len(),
            "Parsed HDF4 container"
        );

        Ok(Self {
            data,
            datasets,
            attributes,
        })
    }

    /// Read and parse an HDF4 file from disk.
    pub fn open(path: impl AsRef<Path>) -> Hdf4Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(Bytes::from(data))
    }

    /// Sub-datasets in file enumeration order.
    pub fn sub_datasets(&self) -> &[SubDataset] {
        &self.datasets
    }

    /// File-level (global) attributes.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up a global attribute by exact name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Read sub-dataset `index` into a raster.
    pub fn read_raster(&self, index: usize) -> Hdf4Result<Raster> {
        let dataset = self
            .datasets
            .get(index)
            .ok_or(Hdf4Error::NoSuchDataset(index))?;
        sds::read_raster(dataset, &self.data)
    }
}

/// File attributes are `Attr0.0` Vdatas that do not belong to a variable
/// Vgroup. Checking membership (rather than requiring the `CDF0.0` group)
/// tolerates writers that omit the file group.
fn file_attributes(
    descriptors: &[DataDescriptor],
    data: &[u8],
    vgroups: &[vset::Vgroup],
    vdatas: &[vset::Vdata],
) -> Vec<Attribute> {
    let variable_attr_refs: Vec<u16> = vgroups
        .iter()
        .filter(|vg| vg.class == vset::CLASS_VAR)
        .flat_map(|vg| {
            vg.members
                .iter()
                .filter(|(tag, _)| *tag == dd::tags::DFTAG_VH)
                .map(|(_, r)| *r)
        })
        .collect();

    vdatas
        .iter()
        .filter(|vd| vd.class == vset::CLASS_ATTR)
        .filter(|vd| !variable_attr_refs.contains(&vd.ref_id))
        .filter_map(|vd| match Attribute::from_vdata(vd, descriptors, data) {
            Ok(attr) => Some(attr),
            Err(e) => {
                tracing::warn!(name = %vd.name, error = %e, "Skipping unreadable attribute");
                None
            }
        })
        .collect()
}
