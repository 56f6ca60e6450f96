//! Ready-made OCM-2-like scene fixtures.

use crate::generators::{create_radiance_grid, create_test_grid_i16};
use crate::hdf4::Hdf4Builder;

/// Attribute names an OCM-2 L1B product carries for its footprint.
pub const CORNER_ATTRIBUTES: [&str; 8] = [
    "Upper Left Longitude",
    "Upper Left Latitude",
    "Upper Right Longitude",
    "Upper Right Latitude",
    "Lower Left Longitude",
    "Lower Left Latitude",
    "Lower Right Longitude",
    "Lower Right Latitude",
];

/// Build a small OCM-2-like scene: eight radiance bands, one quality-flag
/// band, corner coordinates, and a sun elevation angle.
///
/// Corner geometry is an axis-aligned box over the Arabian Sea:
/// longitude 70..74, latitude 18..22. Sun elevation is 64.23 degrees.
pub fn ocm2_scene(width: usize, height: usize) -> Vec<u8> {
    let mut builder = Hdf4Builder::new();
    for band in 1..=8 {
        builder.add_sds_i16(
            &format!("L1B_Band{band}"),
            width,
            height,
            &create_radiance_grid(width, height),
        );
    }
    builder.add_sds_u16(
        "Quality_Flags",
        width,
        height,
        &vec![0u16; width * height],
    );

    builder
        .add_text_attribute("Upper Left Longitude", "70.0")
        .add_text_attribute("Upper Left Latitude", "22.0")
        .add_text_attribute("Upper Right Longitude", "74.0")
        .add_text_attribute("Upper Right Latitude", "22.0")
        .add_text_attribute("Lower Left Longitude", "70.0")
        .add_text_attribute("Lower Left Latitude", "18.0")
        .add_text_attribute("Lower Right Longitude", "74.0")
        .add_text_attribute("Lower Right Latitude", "18.0")
        .add_text_attribute("Sun Elevation Angle", "64.23");

    builder.build()
}

/// A single-band file with predictable `col * 100 + row` values and no
/// scene metadata, for parser-level tests.
pub fn single_band_file(width: usize, height: usize) -> Vec<u8> {
    Hdf4Builder::new()
        .add_sds_i16("band0", width, height, &create_test_grid_i16(width, height))
        .build()
}

/// Write a scene fixture into a temp directory, returning the directory
/// guard (keep it alive for the duration of the test) and the file path.
///
/// The file name follows the OCM-2 L1B naming convention so date parsing
/// can be exercised end to end.
pub fn scene_on_disk(width: usize, height: usize) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("O2_26APR2021_009_011_GAN_L1B_ST_S.hdf");
    std::fs::write(&path, ocm2_scene(width, height)).expect("write scene fixture");
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_on_disk() {
        let (_dir, path) = scene_on_disk(4, 4);
        assert!(path.exists());
    }

    #[test]
    fn test_scene_builds() {
        let bytes = ocm2_scene(4, 4);
        assert!(bytes.len() > 9 * 4 * 4 * 2);
    }
}
