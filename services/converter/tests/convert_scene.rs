//! End-to-end conversion of synthetic scenes, single-file and batch.

use converter::config::{ConverterConfig, WriteCloudMask};
use converter::pipeline::{collect_inputs, convert_batch, convert_file, output_base};
use test_utils::fixtures::scene_on_disk;

#[test]
fn converts_scene_to_geotiff_directory() {
    let (dir, input) = scene_on_disk(16, 8);
    let output = dir.path().join("GeoTiff");

    let summary = convert_file(&input, &output, &ConverterConfig::default()).unwrap();

    // Eight spectral bands plus the quality-flag layer.
    assert_eq!(summary.bands_written.len(), 9);
    assert!(summary.bands_skipped.is_empty());
    assert!(summary.cloud_mask_written);
    assert_eq!(
        summary.acquisition_date,
        chrono::NaiveDate::from_ymd_opt(2021, 4, 26)
    );

    for index in 0..9 {
        let band = output.join(format!("band{index}_georef.tif"));
        assert!(band.exists(), "missing {}", band.display());
    }
    let mask = output.join("cloud_mask.tif");
    assert!(mask.exists());

    // Every output is a little-endian classic TIFF.
    let header = std::fs::read(output.join("band0_georef.tif")).unwrap();
    assert_eq!(&header[0..4], b"II\x2a\x00");
    let mask_header = std::fs::read(&mask).unwrap();
    assert_eq!(&mask_header[0..4], b"II\x2a\x00");
}

#[test]
fn output_directory_is_recreated() {
    let (dir, input) = scene_on_disk(8, 8);
    let output = dir.path().join("GeoTiff");

    std::fs::create_dir_all(&output).unwrap();
    let stale = output.join("stale.tif");
    std::fs::write(&stale, b"old run").unwrap();

    convert_file(&input, &output, &ConverterConfig::default()).unwrap();
    assert!(!stale.exists());
    assert!(output.join("band0_georef.tif").exists());
}

#[test]
fn cloud_mask_can_be_disabled() {
    let (dir, input) = scene_on_disk(8, 8);
    let output = dir.path().join("GeoTiff");

    let config = ConverterConfig {
        write_cloud_mask: WriteCloudMask(false),
        ..ConverterConfig::default()
    };
    let summary = convert_file(&input, &output, &config).unwrap();

    assert!(!summary.cloud_mask_written);
    assert!(!output.join("cloud_mask.tif").exists());
    assert_eq!(summary.bands_written.len(), 9);
}

#[test]
fn missing_metadata_fails_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bare.hdf");
    std::fs::write(&input, test_utils::fixtures::single_band_file(4, 4)).unwrap();

    let output = dir.path().join("GeoTiff");
    let err = convert_file(&input, &output, &ConverterConfig::default()).unwrap_err();
    assert!(err.to_string().contains("Upper Left Longitude"));
}

#[test]
fn batch_survives_a_bad_file() {
    let (dir, good) = scene_on_disk(8, 8);
    let bad = dir.path().join("A1_corrupt.hdf");
    std::fs::write(&bad, b"not an hdf container").unwrap();

    let inputs = collect_inputs(dir.path()).unwrap();
    assert_eq!(inputs.len(), 2);

    let output = dir.path().join("GeoTiff");
    let outcome = convert_batch(&inputs, &output, true, &ConverterConfig::default()).unwrap();

    assert_eq!(outcome.summaries.len(), 1);
    assert_eq!(outcome.failures, 1);
    assert_eq!(outcome.summaries[0].input, good);

    // Each batch input lands in its own subdirectory named after the stem.
    let stem = good.file_stem().unwrap().to_string_lossy().into_owned();
    assert!(output.join(&stem).join("band0_georef.tif").exists());
}

#[test]
fn batch_fails_when_every_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.hdf");
    let second = dir.path().join("second.hdf");
    std::fs::write(&first, b"garbage").unwrap();
    std::fs::write(&second, b"more garbage").unwrap();

    let inputs = collect_inputs(dir.path()).unwrap();
    let output = dir.path().join("GeoTiff");
    let err = convert_batch(&inputs, &output, true, &ConverterConfig::default()).unwrap_err();
    assert!(err.to_string().contains("All 2 input file(s) failed"));
}

#[test]
fn input_collection_rejects_missing_and_empty_paths() {
    let dir = tempfile::tempdir().unwrap();
    let err = collect_inputs(&dir.path().join("nope")).unwrap_err();
    assert!(err.to_string().contains("does not exist"));

    let err = collect_inputs(dir.path()).unwrap_err();
    assert!(err.to_string().contains("No .hdf files"));

    // Extension matching ignores case.
    let upper = dir.path().join("SCENE.HDF");
    std::fs::write(&upper, b"x").unwrap();
    assert_eq!(collect_inputs(dir.path()).unwrap(), vec![upper]);
}

#[test]
fn output_base_defaults_beside_the_input() {
    let (dir, input) = scene_on_disk(4, 4);

    let explicit = dir.path().join("elsewhere");
    assert_eq!(output_base(&input, Some(explicit.as_path())), explicit);

    assert_eq!(output_base(&input, None), dir.path().join("GeoTiff"));
    assert_eq!(output_base(dir.path(), None), dir.path().join("GeoTiff"));
}
