//! Attaching spatial references to rasters.

use ocm_common::Raster;
use serde::{Deserialize, Serialize};

use crate::{AffineTransform, Crs, GeorefError, GroundControlPoint};

/// How a raster is tied to world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Georeferencing {
    /// Regular north-up affine mapping.
    Affine {
        transform: AffineTransform,
        crs: Crs,
    },
    /// Ground control points, for footprints an affine cannot represent.
    Gcps {
        gcps: Vec<GroundControlPoint>,
        crs: Crs,
    },
}

impl Georeferencing {
    pub fn affine(transform: AffineTransform, crs: Crs) -> Self {
        Georeferencing::Affine { transform, crs }
    }

    pub fn from_gcps(gcps: Vec<GroundControlPoint>, crs: Crs) -> Result<Self, GeorefError> {
        GroundControlPoint::validate(&gcps)?;
        Ok(Georeferencing::Gcps { gcps, crs })
    }

    pub fn crs(&self) -> &Crs {
        match self {
            Georeferencing::Affine { crs, .. } => crs,
            Georeferencing::Gcps { crs, .. } => crs,
        }
    }
}

/// A raster with its spatial reference attached.
///
/// The reference is set at construction and never replaced; both halves are
/// exposed read-only.
#[derive(Debug, Clone)]
pub struct GeoreferencedRaster {
    raster: Raster,
    reference: Georeferencing,
}

impl GeoreferencedRaster {
    pub fn new(raster: Raster, reference: Georeferencing) -> Self {
        Self { raster, reference }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn reference(&self) -> &Georeferencing {
        &self.reference
    }

    pub fn crs(&self) -> &Crs {
        self.reference.crs()
    }

    /// Give the raster back, dropping the reference.
    pub fn into_raster(self) -> Raster {
        self.raster
    }
}
