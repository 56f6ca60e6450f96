//! Coordinate reference system identifiers.

use serde::{Deserialize, Serialize};

/// A coordinate reference system, identified by EPSG code.
///
/// OCM-2 products are referenced to geographic WGS 84 (EPSG:4326); other
/// geographic codes can be carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    epsg: u32,
    citation: String,
}

impl Crs {
    pub fn new(epsg: u32, citation: impl Into<String>) -> Self {
        Self {
            epsg,
            citation: citation.into(),
        }
    }

    /// Geographic WGS 84, the reference the OCM-2 pipeline attaches.
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    pub fn citation(&self) -> &str {
        &self.citation
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wgs84() {
        let crs = Crs::wgs84();
        assert_eq!(crs.epsg(), 4326);
        assert_eq!(crs.citation(), "WGS 84");
    }
}
