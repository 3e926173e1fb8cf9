//! In-memory region catalog with canonical-ID lookup and point resolution.

use geo_types::Point;
use hashbrown::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{canonical_id, extract_region_features, RegionFeature};
use crate::error::CatalogError;
use crate::models::Region;

/// Default dataset compiled into the binary
pub const EMBEDDED_DATASET: &str = include_str!("../../data/regions.geojson");

/// Immutable catalog of regions.
///
/// Built once, then only read. Share it behind an `Arc`.
pub struct RegionCatalog {
    /// Features in dataset order; the order decides which region wins a point
    features: Vec<RegionFeature>,
    /// Canonical identifier -> index into `features`
    by_id: HashMap<String, usize>,
}

impl RegionCatalog {
    /// Build the catalog from parsed features
    pub fn build(features: Vec<RegionFeature>) -> Self {
        let mut by_id = HashMap::new();

        for (i, feature) in features.iter().enumerate() {
            for id in feature.region.identifiers() {
                let key = canonical_id(id);
                if key.is_empty() {
                    continue;
                }
                // Later features win on duplicate identifiers
                if let Some(previous) = by_id.insert(key, i) {
                    if previous != i {
                        debug!(
                            "Identifier {:?} moved from {} to {}",
                            id,
                            features[previous].label(),
                            feature.label()
                        );
                    }
                }
            }
        }

        info!(
            "Region catalog built: {} regions, {} with geometry, {} identifiers",
            features.len(),
            features.iter().filter(|f| f.geometry.is_some()).count(),
            by_id.len()
        );

        Self { features, by_id }
    }

    /// Parse and index a GeoJSON feature collection
    pub fn from_geojson(data: &str) -> Result<Self, CatalogError> {
        Ok(Self::build(extract_region_features(data)?))
    }

    /// Load a dataset file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_geojson(&data)
    }

    /// Catalog from the embedded default dataset
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_geojson(EMBEDDED_DATASET)
    }

    /// Load the override dataset if given and readable, else the embedded one.
    ///
    /// An unreadable override only logs a warning. A readable override that
    /// does not parse is an error.
    pub fn load(override_path: Option<&Path>) -> Result<Self, CatalogError> {
        if let Some(path) = override_path {
            match Self::from_file(path) {
                Ok(catalog) => {
                    info!("Loaded region dataset from {}", path.display());
                    return Ok(catalog);
                }
                Err(CatalogError::Read { path, source }) => {
                    warn!(
                        "Failed to read region dataset {}, using embedded default: {}",
                        path.display(),
                        source
                    );
                }
                Err(e) => return Err(e),
            }
        }

        debug!("Loading embedded region dataset");
        Self::embedded()
    }

    /// Exact lookup by any identifying string
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.feature(id).map(|f| &f.region)
    }

    /// Exact lookup returning the full feature
    pub fn feature(&self, id: &str) -> Option<&RegionFeature> {
        let key = canonical_id(id);
        if key.is_empty() {
            return None;
        }
        self.by_id.get(&key).map(|&i| &self.features[i])
    }

    /// First region in dataset order whose geometry contains the point.
    ///
    /// The dataset lists specific regions before broader ones, so this is
    /// the smallest containing region.
    pub fn smallest_region(&self, lat: f64, lng: f64) -> Option<&Region> {
        let point = Point::new(lng, lat);

        let found = self.features.iter().find(|f| f.contains(&point));

        match found {
            Some(feature) => debug!("({}, {}) resolved to {}", lat, lng, feature.label()),
            None => debug!("({}, {}) is not inside any region", lat, lng),
        }

        found.map(|f| &f.region)
    }

    /// All features in dataset order
    pub fn features(&self) -> &[RegionFeature] {
        &self.features
    }

    /// Get total number of regions
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of regions reachable by coordinate lookup
    pub fn with_geometry(&self) -> usize {
        self.features.iter().filter(|f| f.geometry.is_some()).count()
    }

    /// Number of distinct canonical identifiers
    pub fn identifier_count(&self) -> usize {
        self.by_id.len()
    }
}
