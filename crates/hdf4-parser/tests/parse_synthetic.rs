//! Parser tests against synthetic HDF4 containers.

use bytes::Bytes;
use hdf4_parser::{Hdf4Error, Hdf4File};
use ocm_common::SampleType;
use test_utils::{create_test_grid_i16, ocm2_scene, single_band_file, Hdf4Builder};

#[test]
fn enumerates_sub_datasets_in_file_order() {
    let file = Hdf4File::from_bytes(Bytes::from(ocm2_scene(8, 6))).unwrap();

    let names: Vec<&str> = file.sub_datasets().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "L1B_Band1",
            "L1B_Band2",
            "L1B_Band3",
            "L1B_Band4",
            "L1B_Band5",
            "L1B_Band6",
            "L1B_Band7",
            "L1B_Band8",
            "Quality_Flags",
        ]
    );

    for (i, sds) in file.sub_datasets().iter().enumerate() {
        assert_eq!(sds.index, i);
        assert_eq!(sds.dims, vec![6, 8]); // rows, cols
    }
    assert_eq!(file.sub_datasets()[0].sample_type, SampleType::Int16);
    assert_eq!(file.sub_datasets()[8].sample_type, SampleType::UInt16);
}

#[test]
fn reads_raster_values_row_major() {
    let file = Hdf4File::from_bytes(Bytes::from(single_band_file(5, 3))).unwrap();
    let raster = file.read_raster(0).unwrap();

    assert_eq!(raster.width(), 5);
    assert_eq!(raster.height(), 3);
    let expected = create_test_grid_i16(5, 3);
    for row in 0..3 {
        for col in 0..5 {
            assert_eq!(
                raster.value(row, col).unwrap(),
                expected[row * 5 + col] as f64
            );
        }
    }
}

#[test]
fn reads_global_attributes() {
    let file = Hdf4File::from_bytes(Bytes::from(ocm2_scene(4, 4))).unwrap();

    let sun = file.attribute("Sun Elevation Angle").unwrap();
    assert_eq!(sun.value.as_f64(), Some(64.23));

    let ulx = file.attribute("Upper Left Longitude").unwrap();
    assert_eq!(ulx.value.as_f64(), Some(70.0));

    assert!(file.attribute("No Such Attribute").is_none());
}

#[test]
fn numeric_attributes_decode() {
    let mut builder = Hdf4Builder::new();
    builder
        .add_sds_i16("band", 2, 2, &[0, 0, 0, 0])
        .add_f64_attribute("Sun Elevation Angle", &[41.5])
        .add_f32_attribute("Gain", &[2.0, 4.0]);
    let file = Hdf4File::from_bytes(Bytes::from(builder.build())).unwrap();

    assert_eq!(
        file.attribute("Sun Elevation Angle").unwrap().value.as_f64(),
        Some(41.5)
    );
    assert_eq!(file.attribute("Gain").unwrap().value.as_f64(), Some(2.0));
}

#[test]
fn fill_value_becomes_no_data() {
    let mut builder = Hdf4Builder::new();
    builder.add_sds_i16_with_fill("band", 2, 2, &[-32768, 5, 6, 7], -32768);
    let file = Hdf4File::from_bytes(Bytes::from(builder.build())).unwrap();

    assert_eq!(file.sub_datasets()[0].fill_value, Some(-32768.0));
    let raster = file.read_raster(0).unwrap();
    assert_eq!(raster.no_data(), Some(-32768.0));
    assert!(raster.is_no_data(raster.value(0, 0).unwrap()));
    assert!(!raster.is_no_data(raster.value(0, 1).unwrap()));
}

#[test]
fn out_of_range_index_is_an_error() {
    let file = Hdf4File::from_bytes(Bytes::from(single_band_file(2, 2))).unwrap();
    assert!(matches!(
        file.read_raster(1),
        Err(Hdf4Error::NoSuchDataset(1))
    ));
}

#[test]
fn rejects_non_hdf_bytes() {
    let err = Hdf4File::from_bytes(Bytes::from_static(b"II*\x00not a tiff either")).unwrap_err();
    assert!(matches!(err, Hdf4Error::BadMagic));
}

#[test]
fn empty_file_is_bad_magic() {
    assert!(matches!(
        Hdf4File::from_bytes(Bytes::new()),
        Err(Hdf4Error::BadMagic)
    ));
}

#[test]
fn file_with_no_datasets_parses() {
    let mut builder = Hdf4Builder::new();
    builder.add_text_attribute("Mission", "OCM-2");
    let file = Hdf4File::from_bytes(Bytes::from(builder.build())).unwrap();
    assert!(file.sub_datasets().is_empty());
    assert_eq!(
        file.attribute("Mission").unwrap().value.as_str(),
        Some("OCM-2")
    );
}
