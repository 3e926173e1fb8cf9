//! Region feature extraction from a GeoJSON feature collection.

use geo_types::Point;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::RegionGeometry;
use crate::error::CatalogError;
use crate::models::Region;

/// A catalog region with its (optional) geometry
#[derive(Debug, Clone)]
pub struct RegionFeature {
    pub region: Region,
    pub geometry: Option<RegionGeometry>,
}

impl RegionFeature {
    pub fn new(region: Region, geometry: Option<RegionGeometry>) -> Self {
        Self { region, geometry }
    }

    /// Whether this feature's geometry contains the point
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.geometry
            .as_ref()
            .is_some_and(|geometry| geometry.contains(point))
    }

    /// Name used in diagnostics
    pub fn label(&self) -> &str {
        if self.region.name_en.is_empty() {
            &self.region.id
        } else {
            &self.region.name_en
        }
    }
}

#[derive(Deserialize)]
struct RawCollection {
    features: Vec<Value>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Region>,
    #[serde(default)]
    geometry: Value,
}

/// Parse a feature collection into region features, preserving order.
///
/// Fails only when the document is not a feature collection at all. A
/// feature whose properties are not an object is skipped; malformed
/// property values are dropped, and a feature with unusable geometry is
/// kept without geometry.
pub fn extract_region_features(data: &str) -> Result<Vec<RegionFeature>, CatalogError> {
    let collection: RawCollection = serde_json::from_str(data)?;

    let mut features = Vec::with_capacity(collection.features.len());

    for (i, value) in collection.features.into_iter().enumerate() {
        let raw: RawFeature = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping feature {}: {}", i, e);
                continue;
            }
        };

        let region = raw.properties.unwrap_or_default();

        let geometry = if raw.geometry.is_null() {
            debug!("Feature {} ({}) has no geometry", i, region.id);
            None
        } else {
            let parsed = RegionGeometry::from_geojson(&raw.geometry);
            match &parsed {
                Some(g) => debug!("Parsed {} geometry for feature {} ({})", g.kind(), i, region.id),
                None => debug!("Could not parse geometry for feature {} ({})", i, region.id),
            }
            parsed
        };

        features.push(RegionFeature::new(region, geometry));
    }

    info!(
        "Parsed {} region features, {} with geometry",
        features.len(),
        features.iter().filter(|f| f.geometry.is_some()).count()
    );

    Ok(features)
}
