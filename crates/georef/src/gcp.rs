//! Ground control points.

use serde::{Deserialize, Serialize};

use crate::GeorefError;

/// A single ground control point tying an image position to a world
/// position.
///
/// `pixel` is the column (x) image coordinate, `line` the row (y); `x`/`y`
/// are world coordinates in the attached CRS (longitude/latitude for
/// EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundControlPoint {
    pub pixel: f64,
    pub line: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GroundControlPoint {
    pub fn new(pixel: f64, line: f64, x: f64, y: f64) -> Self {
        Self {
            pixel,
            line,
            x,
            y,
            z: 0.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pixel.is_finite()
            && self.line.is_finite()
            && self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
    }

    pub(crate) fn validate(gcps: &[GroundControlPoint]) -> Result<(), GeorefError> {
        if gcps.len() < 3 {
            return Err(GeorefError::NotEnoughGcps(gcps.len()));
        }
        if gcps.iter().any(|g| !g.is_finite()) {
            return Err(GeorefError::NonFiniteCoordinate("ground control point"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_count() {
        let gcps = vec![
            GroundControlPoint::new(0.0, 0.0, 70.0, 20.0),
            GroundControlPoint::new(10.0, 0.0, 71.0, 20.0),
        ];
        assert!(GroundControlPoint::validate(&gcps).is_err());
    }

    #[test]
    fn test_validate_finite() {
        let gcps = vec![
            GroundControlPoint::new(0.0, 0.0, 70.0, 20.0),
            GroundControlPoint::new(10.0, 0.0, f64::NAN, 20.0),
            GroundControlPoint::new(0.0, 10.0, 70.0, 19.0),
        ];
        assert!(GroundControlPoint::validate(&gcps).is_err());
    }
}
