//! Synthetic HDF4 file builder.
//!
//! Produces minimal but structurally real HDF4 containers: a DD list,
//! number-type / dimension / data records grouped by NDGs, `Var0.0`
//! Vgroups carrying sub-dataset names, and `Attr0.0` Vdatas carrying
//! global attributes, all wrapped in a `CDF0.0` file group. The parser
//! crate reads these exactly like files written by libhdf4.

const MAGIC: [u8; 4] = [0x0e, 0x03, 0x13, 0x01];

const TAG_NT: u16 = 106;
const TAG_SDD: u16 = 701;
const TAG_SD: u16 = 702;
const TAG_NDG: u16 = 720;
const TAG_FV: u16 = 732;
const TAG_VH: u16 = 1962;
const TAG_VS: u16 = 1963;
const TAG_VG: u16 = 1965;

const DFNT_CHAR8: u8 = 4;
const DFNT_FLOAT32: u8 = 5;
const DFNT_FLOAT64: u8 = 6;
const DFNT_INT16: u8 = 22;
const DFNT_UINT16: u8 = 23;

/// Builder for synthetic HDF4 test files.
#[derive(Default)]
pub struct Hdf4Builder {
    objects: Vec<(u16, u16, Vec<u8>)>,
    next_ref: u16,
    var_group_refs: Vec<u16>,
    attr_vdata_refs: Vec<u16>,
}

impl Hdf4Builder {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_ref: 0,
            var_group_refs: Vec::new(),
            attr_vdata_refs: Vec::new(),
        }
    }

    fn alloc_ref(&mut self) -> u16 {
        self.next_ref += 1;
        self.next_ref
    }

    /// Add a rank-2 i16 sub-dataset (row-major values).
    pub fn add_sds_i16(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        values: &[i16],
    ) -> &mut Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.add_sds(name, width, height, values.len(), DFNT_INT16, 16, data, None)
    }

    /// Add a rank-2 i16 sub-dataset with a recorded fill value.
    pub fn add_sds_i16_with_fill(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        values: &[i16],
        fill: i16,
    ) -> &mut Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.add_sds(
            name,
            width,
            height,
            values.len(),
            DFNT_INT16,
            16,
            data,
            Some(fill.to_be_bytes().to_vec()),
        )
    }

    /// Add a rank-2 u16 sub-dataset (e.g. a quality-flag band).
    pub fn add_sds_u16(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        values: &[u16],
    ) -> &mut Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.add_sds(name, width, height, values.len(), DFNT_UINT16, 16, data, None)
    }

    /// Add a rank-2 f32 sub-dataset.
    pub fn add_sds_f32(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        values: &[f32],
    ) -> &mut Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.add_sds(name, width, height, values.len(), DFNT_FLOAT32, 32, data, None)
    }

    #[allow(clippy::too_many_arguments)]
    fn add_sds(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        value_count: usize,
        type_code: u8,
        bits: u8,
        data: Vec<u8>,
        fill_be: Option<Vec<u8>>,
    ) -> &mut Self {
        assert_eq!(
            value_count,
            width * height,
            "sample count must match {width}x{height}"
        );

        let nt_ref = self.alloc_ref();
        self.objects
            .push((TAG_NT, nt_ref, vec![1, type_code, bits, 1]));

        // Dimension record: rank, dims (rows first), data NT, scale NTs.
        let mut sdd = Vec::new();
        push_u16(&mut sdd, 2);
        push_u32(&mut sdd, height as u32);
        push_u32(&mut sdd, width as u32);
        push_u16(&mut sdd, TAG_NT);
        push_u16(&mut sdd, nt_ref);
        for _ in 0..2 {
            push_u16(&mut sdd, TAG_NT);
            push_u16(&mut sdd, nt_ref);
        }
        let sdd_ref = self.alloc_ref();
        self.objects.push((TAG_SDD, sdd_ref, sdd));

        let sd_ref = self.alloc_ref();
        self.objects.push((TAG_SD, sd_ref, data));

        let mut ndg = Vec::new();
        push_u16(&mut ndg, TAG_SDD);
        push_u16(&mut ndg, sdd_ref);
        push_u16(&mut ndg, TAG_SD);
        push_u16(&mut ndg, sd_ref);
        if let Some(fill) = fill_be {
            let fv_ref = self.alloc_ref();
            self.objects.push((TAG_FV, fv_ref, fill));
            push_u16(&mut ndg, TAG_FV);
            push_u16(&mut ndg, fv_ref);
        }
        let ndg_ref = self.alloc_ref();
        self.objects.push((TAG_NDG, ndg_ref, ndg));

        // Variable Vgroup naming the NDG.
        let vg_ref = self.alloc_ref();
        let vg = vgroup_record(&[(TAG_NDG, ndg_ref)], name, "Var0.0");
        self.objects.push((TAG_VG, vg_ref, vg));
        self.var_group_refs.push(vg_ref);

        self
    }

    /// Add a char8 global attribute.
    pub fn add_text_attribute(&mut self, name: &str, value: &str) -> &mut Self {
        self.add_attribute(name, DFNT_CHAR8, 1, value.as_bytes().to_vec())
    }

    /// Add an f32 global attribute.
    pub fn add_f32_attribute(&mut self, name: &str, values: &[f32]) -> &mut Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.add_attribute(name, DFNT_FLOAT32, 4, data)
    }

    /// Add an f64 global attribute.
    pub fn add_f64_attribute(&mut self, name: &str, values: &[f64]) -> &mut Self {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.add_attribute(name, DFNT_FLOAT64, 8, data)
    }

    fn add_attribute(
        &mut self,
        name: &str,
        type_code: u8,
        element_size: u16,
        data: Vec<u8>,
    ) -> &mut Self {
        let count = (data.len() / element_size as usize) as u32;
        let ref_id = self.alloc_ref();

        let mut vh = Vec::new();
        push_u16(&mut vh, 0); // interlace
        push_u32(&mut vh, count); // nvert
        push_u16(&mut vh, element_size); // ivsize
        push_u16(&mut vh, 1); // nfields
        push_u16(&mut vh, type_code as u16);
        push_u16(&mut vh, element_size);
        push_u16(&mut vh, 0); // field offset
        push_u16(&mut vh, 1); // order
        push_str(&mut vh, "VALUES");
        push_str(&mut vh, name);
        push_str(&mut vh, "Attr0.0");
        push_u16(&mut vh, 0); // extag
        push_u16(&mut vh, 0); // exref
        push_u16(&mut vh, 3); // version
        push_u16(&mut vh, 0); // more

        self.objects.push((TAG_VH, ref_id, vh));
        self.objects.push((TAG_VS, ref_id, data));
        self.attr_vdata_refs.push(ref_id);
        self
    }

    /// Assemble the container bytes.
    pub fn build(&mut self) -> Vec<u8> {
        // File group tying variables and attributes together.
        let mut members: Vec<(u16, u16)> = self
            .var_group_refs
            .iter()
            .map(|r| (TAG_VG, *r))
            .collect();
        members.extend(self.attr_vdata_refs.iter().map(|r| (TAG_VH, *r)));
        let cdf_ref = self.next_ref + 1;
        let cdf = vgroup_record(&members, "test.hdf", "CDF0.0");

        let mut objects = self.objects.clone();
        objects.push((TAG_VG, cdf_ref, cdf));

        let header_len = 4 + 6 + 12 * objects.len();
        let mut out = MAGIC.to_vec();
        push_i16(&mut out, objects.len() as i16);
        push_u32(&mut out, 0); // no next DD block

        let mut offset = header_len as u32;
        for (tag, ref_id, payload) in &objects {
            push_u16(&mut out, *tag);
            push_u16(&mut out, *ref_id);
            push_u32(&mut out, offset);
            push_u32(&mut out, payload.len() as u32);
            offset += payload.len() as u32;
        }
        for (_, _, payload) in &objects {
            out.extend_from_slice(payload);
        }
        out
    }
}

fn vgroup_record(members: &[(u16, u16)], name: &str, class: &str) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, members.len() as u16);
    for (tag, _) in members {
        push_u16(&mut out, *tag);
    }
    for (_, ref_id) in members {
        push_u16(&mut out, *ref_id);
    }
    push_str(&mut out, name);
    push_str(&mut out, class);
    push_u16(&mut out, 0); // extag
    push_u16(&mut out, 0); // exref
    push_u16(&mut out, 3); // version
    push_u16(&mut out, 0); // more
    out
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_str(out: &mut Vec<u8>, s: &str) {
    push_u16(out, s.len() as u16);
    out.extend_from_slice(s.as_bytes());
}
