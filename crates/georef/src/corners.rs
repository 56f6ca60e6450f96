//! Scene corner geometry.
//!
//! OCM-2 products carry their footprint as four corner longitude/latitude
//! pairs in the global attributes. The corners turn into ground control
//! points (one per image corner) or, approximately, into a rectilinear
//! affine transform.

use ocm_common::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::{AffineTransform, GeorefError, GroundControlPoint};

/// The four geographic corners of a scene, as (longitude, latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerCoordinates {
    pub upper_left: (f64, f64),
    pub upper_right: (f64, f64),
    pub lower_right: (f64, f64),
    pub lower_left: (f64, f64),
}

impl CornerCoordinates {
    pub fn new(
        upper_left: (f64, f64),
        upper_right: (f64, f64),
        lower_right: (f64, f64),
        lower_left: (f64, f64),
    ) -> Result<Self, GeorefError> {
        let all = [upper_left, upper_right, lower_right, lower_left];
        if all
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(GeorefError::NonFiniteCoordinate("scene corner"));
        }
        Ok(Self {
            upper_left,
            upper_right,
            lower_right,
            lower_left,
        })
    }

    /// Pin the four image corners to the four geographic corners.
    ///
    /// Pixel positions are the true image corner coordinates: (0,0) top
    /// left through (0,h) bottom left.
    pub fn to_gcps(&self, width: usize, height: usize) -> Vec<GroundControlPoint> {
        let (w, h) = (width as f64, height as f64);
        vec![
            GroundControlPoint::new(0.0, 0.0, self.upper_left.0, self.upper_left.1),
            GroundControlPoint::new(w, 0.0, self.upper_right.0, self.upper_right.1),
            GroundControlPoint::new(w, h, self.lower_right.0, self.lower_right.1),
            GroundControlPoint::new(0.0, h, self.lower_left.0, self.lower_left.1),
        ]
    }

    /// Rectilinear approximation of the footprint as an affine transform.
    ///
    /// Exact only when the footprint is axis-aligned; for the tilted
    /// footprints a pushbroom scanner produces this is a coarse fit, which
    /// is why the pipeline prefers GCP referencing.
    pub fn approximate_affine(
        &self,
        width: usize,
        height: usize,
    ) -> Result<AffineTransform, GeorefError> {
        let dx = (self.upper_right.0 - self.upper_left.0) / width as f64;
        let dy = (self.lower_left.1 - self.upper_left.1) / height as f64;
        AffineTransform::new(self.upper_left.0, self.upper_left.1, dx, dy)
    }

    /// Axis-aligned bounding box of the footprint.
    pub fn bounding_box(&self) -> BoundingBox {
        let xs = [
            self.upper_left.0,
            self.upper_right.0,
            self.lower_right.0,
            self.lower_left.0,
        ];
        let ys = [
            self.upper_left.1,
            self.upper_right.1,
            self.lower_right.1,
            self.lower_left.1,
        ];
        let min_x = xs.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_y = ys.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_y = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        BoundingBox::new(min_x, min_y, max_x, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> CornerCoordinates {
        CornerCoordinates::new((70.0, 22.0), (74.0, 22.0), (74.0, 18.0), (70.0, 18.0)).unwrap()
    }

    #[test]
    fn test_to_gcps_pins_image_corners() {
        let gcps = square().to_gcps(800, 600);
        assert_eq!(gcps.len(), 4);
        assert_eq!((gcps[0].pixel, gcps[0].line), (0.0, 0.0));
        assert_eq!((gcps[1].pixel, gcps[1].line), (800.0, 0.0));
        assert_eq!((gcps[2].pixel, gcps[2].line), (800.0, 600.0));
        assert_eq!((gcps[3].pixel, gcps[3].line), (0.0, 600.0));
        assert_eq!((gcps[2].x, gcps[2].y), (74.0, 18.0));
    }

    #[test]
    fn test_approximate_affine_square_footprint() {
        let t = square().approximate_affine(800, 400).unwrap();
        assert_eq!(t.origin(), (70.0, 22.0));
        let (dx, dy) = t.pixel_size();
        assert!((dx - 0.005).abs() < 1e-12);
        assert!((dy - (-0.01)).abs() < 1e-12);

        let ext = t.extent(800, 400);
        assert_eq!(ext.min_x, 70.0);
        assert_eq!(ext.max_x, 74.0);
        assert_eq!(ext.min_y, 18.0);
        assert_eq!(ext.max_y, 22.0);
    }

    #[test]
    fn test_bounding_box_tilted() {
        let c =
            CornerCoordinates::new((70.0, 22.0), (74.0, 21.5), (73.5, 18.0), (69.5, 18.5)).unwrap();
        let bbox = c.bounding_box();
        assert_eq!(bbox.min_x, 69.5);
        assert_eq!(bbox.max_x, 74.0);
        assert_eq!(bbox.min_y, 18.0);
        assert_eq!(bbox.max_y, 22.0);
    }

    #[test]
    fn test_rejects_non_finite_corner() {
        assert!(CornerCoordinates::new(
            (f64::NAN, 22.0),
            (74.0, 22.0),
            (74.0, 18.0),
            (70.0, 18.0)
        )
        .is_err());
    }
}
