//! TIFF tag and field-type constants.

// Baseline TIFF tags
pub const IMAGE_WIDTH: u16 = 256;
pub const IMAGE_LENGTH: u16 = 257;
pub const BITS_PER_SAMPLE: u16 = 258;
pub const COMPRESSION: u16 = 259;
pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
pub const STRIP_OFFSETS: u16 = 273;
pub const SAMPLES_PER_PIXEL: u16 = 277;
pub const ROWS_PER_STRIP: u16 = 278;
pub const STRIP_BYTE_COUNTS: u16 = 279;
pub const PLANAR_CONFIGURATION: u16 = 284;
pub const SAMPLE_FORMAT: u16 = 339;

// GeoTIFF tags
pub const MODEL_PIXEL_SCALE: u16 = 33550;
pub const MODEL_TIEPOINT: u16 = 33922;
pub const GEO_KEY_DIRECTORY: u16 = 34735;
pub const GEO_ASCII_PARAMS: u16 = 34737;

// GDAL extension
pub const GDAL_NODATA: u16 = 42113;

// Field types
pub const TYPE_ASCII: u16 = 2;
pub const TYPE_SHORT: u16 = 3;
pub const TYPE_LONG: u16 = 4;
pub const TYPE_DOUBLE: u16 = 12;

// Compression codes
pub const COMPRESSION_NONE: u16 = 1;
pub const COMPRESSION_DEFLATE: u16 = 8;

// Photometric: black is zero
pub const PHOTOMETRIC_MIN_IS_BLACK: u16 = 1;

// SampleFormat values
pub const FORMAT_UNSIGNED: u16 = 1;
pub const FORMAT_SIGNED: u16 = 2;
pub const FORMAT_FLOAT: u16 = 3;
