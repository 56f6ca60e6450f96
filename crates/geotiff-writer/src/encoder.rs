//! GeoTIFF encoding for georeferenced rasters.
//!
//! Produces classic little-endian TIFF: header, strip data, out-of-line
//! tag values, then a single IFD. Strips are compressed independently so
//! large rasters can deflate in parallel.

use std::io::Write;

use flate2::write::ZlibEncoder;
use georef::{GeoreferencedRaster, Georeferencing};
use ocm_common::SampleType;
use rayon::prelude::*;

use crate::geokeys;
use crate::tags::*;
use crate::GeoTiffError;

/// Minimum pixels to benefit from parallel strip compression.
const PARALLEL_THRESHOLD: usize = 4096;

/// Target uncompressed strip size in bytes.
const STRIP_TARGET_BYTES: usize = 64 * 1024;

/// Strip compression scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    None,
    #[default]
    Deflate,
}

impl Compression {
    fn tiff_code(&self) -> u16 {
        match self {
            Compression::None => COMPRESSION_NONE,
            Compression::Deflate => COMPRESSION_DEFLATE,
        }
    }
}

/// Encoding options.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub compression: Compression,
    /// Rows per strip, clamped to `1..=height`; derived from a ~64 KiB
    /// target when unset.
    pub rows_per_strip: Option<usize>,
}

/// Encode a georeferenced raster as GeoTIFF bytes.
pub fn encode(
    referenced: &GeoreferencedRaster,
    options: &EncodeOptions,
) -> Result<Vec<u8>, GeoTiffError> {
    let raster = referenced.raster();
    let width = raster.width();
    let height = raster.height();
    let sample_type = raster.sample_type();

    let bytes_per_row = width * sample_type.byte_width();
    // Clamping covers explicit values too: zero would desync the
    // RowsPerStrip tag from the strip layout.
    let rows_per_strip = options
        .rows_per_strip
        .unwrap_or_else(|| STRIP_TARGET_BYTES / bytes_per_row.max(1))
        .clamp(1, height);

    let raw = raster.samples().to_le_bytes();
    let strips = build_strips(&raw, bytes_per_row * rows_per_strip, options.compression)?;

    let mut entries = Vec::new();
    entries.push(Entry::long(IMAGE_WIDTH, &[width as u32]));
    entries.push(Entry::long(IMAGE_LENGTH, &[height as u32]));
    entries.push(Entry::short(BITS_PER_SAMPLE, &[sample_type.bits()]));
    entries.push(Entry::short(
        COMPRESSION,
        &[options.compression.tiff_code()],
    ));
    entries.push(Entry::short(
        PHOTOMETRIC_INTERPRETATION,
        &[PHOTOMETRIC_MIN_IS_BLACK],
    ));
    entries.push(Entry::short(SAMPLES_PER_PIXEL, &[1]));
    entries.push(Entry::long(ROWS_PER_STRIP, &[rows_per_strip as u32]));
    entries.push(Entry::short(PLANAR_CONFIGURATION, &[1]));
    entries.push(Entry::short(SAMPLE_FORMAT, &[sample_format(sample_type)]));

    match referenced.reference() {
        Georeferencing::Affine { transform, .. } => {
            let (dx, dy) = transform.pixel_size();
            let (origin_x, origin_y) = transform.origin();
            entries.push(Entry::double(MODEL_PIXEL_SCALE, &[dx, dy.abs(), 0.0]));
            entries.push(Entry::double(
                MODEL_TIEPOINT,
                &[0.0, 0.0, 0.0, origin_x, origin_y, 0.0],
            ));
        }
        Georeferencing::Gcps { gcps, .. } => {
            // One tiepoint per GCP and no pixel scale, the layout GDAL
            // produces for GCP-referenced GeoTIFFs.
            let mut tiepoints = Vec::with_capacity(gcps.len() * 6);
            for gcp in gcps {
                tiepoints.extend_from_slice(&[gcp.pixel, gcp.line, 0.0, gcp.x, gcp.y, gcp.z]);
            }
            entries.push(Entry::double(MODEL_TIEPOINT, &tiepoints));
        }
    }

    let keys = geokeys::geographic(referenced.crs())?;
    entries.push(Entry::short(GEO_KEY_DIRECTORY, &keys.directory));
    entries.push(Entry::ascii(
        GEO_ASCII_PARAMS,
        std::str::from_utf8(&keys.ascii_params).unwrap_or(""),
    ));

    if let Some(no_data) = raster.no_data() {
        entries.push(Entry::ascii(GDAL_NODATA, &format_no_data(no_data)));
    }

    Ok(assemble(&strips, entries))
}

/// Encode and write to a file.
pub fn write_file(
    path: impl AsRef<std::path::Path>,
    referenced: &GeoreferencedRaster,
    options: &EncodeOptions,
) -> Result<(), GeoTiffError> {
    let bytes = encode(referenced, options)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn sample_format(sample_type: SampleType) -> u16 {
    if sample_type.is_float() {
        FORMAT_FLOAT
    } else if sample_type.is_signed() {
        FORMAT_SIGNED
    } else {
        FORMAT_UNSIGNED
    }
}

fn format_no_data(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Split raw sample bytes into (optionally compressed) strips.
fn build_strips(
    raw: &[u8],
    bytes_per_strip: usize,
    compression: Compression,
) -> Result<Vec<Vec<u8>>, GeoTiffError> {
    let chunks: Vec<&[u8]> = raw.chunks(bytes_per_strip.max(1)).collect();

    match compression {
        Compression::None => Ok(chunks.into_iter().map(|c| c.to_vec()).collect()),
        Compression::Deflate => {
            if raw.len() >= PARALLEL_THRESHOLD {
                chunks.into_par_iter().map(deflate_strip).collect()
            } else {
                chunks.into_iter().map(deflate_strip).collect()
            }
        }
    }
}

fn deflate_strip(strip: &[u8]) -> Result<Vec<u8>, GeoTiffError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(strip)
        .and_then(|_| encoder.finish())
        .map_err(|e| GeoTiffError::Compression(e.to_string()))
}

/// One IFD entry with its value already serialized little-endian.
struct Entry {
    tag: u16,
    field_type: u16,
    count: u32,
    data: Vec<u8>,
}

impl Entry {
    fn short(tag: u16, values: &[u16]) -> Self {
        Self {
            tag,
            field_type: TYPE_SHORT,
            count: values.len() as u32,
            data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn long(tag: u16, values: &[u32]) -> Self {
        Self {
            tag,
            field_type: TYPE_LONG,
            count: values.len() as u32,
            data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    fn double(tag: u16, values: &[f64]) -> Self {
        Self {
            tag,
            field_type: TYPE_DOUBLE,
            count: values.len() as u32,
            data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    /// ASCII entry; the NUL terminator is appended here and included in
    /// the count, as the TIFF spec requires.
    fn ascii(tag: u16, value: &str) -> Self {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            field_type: TYPE_ASCII,
            count: data.len() as u32,
            data,
        }
    }
}

/// Lay out header, strips, out-of-line values, and the IFD.
fn assemble(strips: &[Vec<u8>], mut entries: Vec<Entry>) -> Vec<u8> {
    // Strip locations are known once the header size is fixed.
    let mut pos = 8usize;
    let mut strip_offsets = Vec::with_capacity(strips.len());
    let mut strip_counts = Vec::with_capacity(strips.len());
    for strip in strips {
        strip_offsets.push(pos as u32);
        strip_counts.push(strip.len() as u32);
        pos += strip.len();
    }
    entries.push(Entry::long(STRIP_OFFSETS, &strip_offsets));
    entries.push(Entry::long(STRIP_BYTE_COUNTS, &strip_counts));

    // IFD entries must be sorted by tag.
    entries.sort_by_key(|e| e.tag);

    // Out-of-line values follow the strips, each on a word boundary.
    let mut values_area = Vec::new();
    let values_start = pos + pos % 2;
    let mut value_offsets = Vec::with_capacity(entries.len());
    for entry in &entries {
        if entry.data.len() > 4 {
            if values_area.len() % 2 == 1 {
                values_area.push(0);
            }
            value_offsets.push(Some((values_start + values_area.len()) as u32));
            values_area.extend_from_slice(&entry.data);
        } else {
            value_offsets.push(None);
        }
    }

    let mut ifd_offset = values_start + values_area.len();
    ifd_offset += ifd_offset % 2;

    let mut out = Vec::with_capacity(ifd_offset + 6 + entries.len() * 12);
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&(ifd_offset as u32).to_le_bytes());

    for strip in strips {
        out.extend_from_slice(strip);
    }
    out.resize(values_start, 0);
    out.extend_from_slice(&values_area);
    out.resize(ifd_offset, 0);

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (entry, offset) in entries.iter().zip(&value_offsets) {
        out.extend_from_slice(&entry.tag.to_le_bytes());
        out.extend_from_slice(&entry.field_type.to_le_bytes());
        out.extend_from_slice(&entry.count.to_le_bytes());
        match offset {
            Some(offset) => out.extend_from_slice(&offset.to_le_bytes()),
            None => {
                let mut inline = [0u8; 4];
                inline[..entry.data.len()].copy_from_slice(&entry.data);
                out.extend_from_slice(&inline);
            }
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

    out
}
