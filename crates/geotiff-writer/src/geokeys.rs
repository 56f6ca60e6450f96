//! GeoTIFF key directory construction.
//!
//! The GeoKeyDirectory tag is a SHORT array: a 4-entry header followed by
//! one 4-entry record per key. Keys with small numeric values live inline;
//! text values point into the GeoAsciiParams tag.

use georef::Crs;

use crate::GeoTiffError;

// GeoKey ids
const GT_MODEL_TYPE: u16 = 1024;
const GT_RASTER_TYPE: u16 = 1025;
const GEOGRAPHIC_TYPE: u16 = 2048;
const GEOG_CITATION: u16 = 2049;
const GEOG_ANGULAR_UNITS: u16 = 2054;

// GeoKey values
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const ANGULAR_UNIT_DEGREE: u16 = 9102;

/// Built key directory plus its ASCII parameter block.
#[derive(Debug)]
pub struct GeoKeys {
    pub directory: Vec<u16>,
    pub ascii_params: Vec<u8>,
}

/// Build the key set for a geographic CRS.
///
/// OCM-2 output is always geographic (EPSG:4326); any other geographic
/// EPSG code passes straight through into GeographicTypeGeoKey, as long
/// as it fits the 16-bit key value.
pub fn geographic(crs: &Crs) -> Result<GeoKeys, GeoTiffError> {
    let epsg =
        u16::try_from(crs.epsg()).map_err(|_| GeoTiffError::EpsgOutOfRange(crs.epsg()))?;

    // Citation strings end with '|' inside GeoAsciiParams; the tag itself
    // is NUL-terminated by the IFD writer.
    let citation = format!("{}|", crs.citation());
    let citation_len = citation.len() as u16;

    let keys: [[u16; 4]; 5] = [
        [GT_MODEL_TYPE, 0, 1, MODEL_TYPE_GEOGRAPHIC],
        [GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA],
        [GEOGRAPHIC_TYPE, 0, 1, epsg],
        [
            GEOG_CITATION,
            crate::tags::GEO_ASCII_PARAMS,
            citation_len,
            0,
        ],
        [GEOG_ANGULAR_UNITS, 0, 1, ANGULAR_UNIT_DEGREE],
    ];

    // Header: key directory version, revision, minor revision, key count.
    let mut directory = vec![1, 1, 0, keys.len() as u16];
    for key in keys {
        directory.extend_from_slice(&key);
    }

    Ok(GeoKeys {
        directory,
        ascii_params: citation.into_bytes(),
    })
}
