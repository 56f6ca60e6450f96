//! Affine pixel-to-world transforms.

use ocm_common::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::GeorefError;

/// A north-up affine transform mapping pixel space to world space.
///
/// `origin_x`/`origin_y` locate the outer corner of the top-left pixel;
/// `pixel_width` is positive east, `pixel_height` negative south for the
/// usual north-up raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    origin_x: f64,
    origin_y: f64,
    pixel_width: f64,
    pixel_height: f64,
}

impl AffineTransform {
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        pixel_width: f64,
        pixel_height: f64,
    ) -> Result<Self, GeorefError> {
        if !origin_x.is_finite() || !origin_y.is_finite() {
            return Err(GeorefError::NonFiniteCoordinate("affine origin"));
        }
        if !pixel_width.is_finite()
            || !pixel_height.is_finite()
            || pixel_width == 0.0
            || pixel_height == 0.0
        {
            return Err(GeorefError::InvalidPixelSize);
        }
        Ok(Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        })
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    pub fn pixel_size(&self) -> (f64, f64) {
        (self.pixel_width, self.pixel_height)
    }

    /// World coordinates of a (fractional) pixel position.
    pub fn pixel_to_world(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width,
            self.origin_y + row * self.pixel_height,
        )
    }

    /// Corner coordinates of a raster under this transform, in UL, UR, LR,
    /// LL order.
    pub fn corners(&self, width: usize, height: usize) -> [(f64, f64); 4] {
        let (w, h) = (width as f64, height as f64);
        [
            self.pixel_to_world(0.0, 0.0),
            self.pixel_to_world(w, 0.0),
            self.pixel_to_world(w, h),
            self.pixel_to_world(0.0, h),
        ]
    }

    /// Bounding box of a raster under this transform.
    pub fn extent(&self, width: usize, height: usize) -> BoundingBox {
        let (x0, y0) = (self.origin_x, self.origin_y);
        let x1 = x0 + width as f64 * self.pixel_width;
        let y1 = y0 + height as f64 * self.pixel_height;

        BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}
