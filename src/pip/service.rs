//! Region lookup service: identifier lookups, country fast path and
//! level-based hierarchy walks over a shared [`RegionCatalog`].

use std::sync::Arc;
use tracing::debug;

use super::RegionCatalog;
use crate::models::{Level, Region};

/// Options for a leveled lookup. Empty strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct CodingOptions {
    /// Target level (defaults to `country`)
    pub level: Option<String>,
    /// Coarsest acceptable level (defaults to `world`)
    pub max_level: Option<String>,
    /// Only accept regions where this property is populated
    pub with_prop: Option<String>,
}

impl CodingOptions {
    pub fn at_level(level: &str) -> Self {
        Self {
            level: Some(level.to_string()),
            ..Default::default()
        }
    }

    pub fn with_prop(mut self, prop: &str) -> Self {
        self.with_prop = Some(prop.to_string());
        self
    }

    pub fn max_level(mut self, level: &str) -> Self {
        self.max_level = Some(level.to_string());
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// A lookup request: an identifier, or coordinates as `[longitude, latitude]`.
#[derive(Debug, Clone, Copy)]
pub enum Query<'a> {
    Identifier(&'a str),
    Coordinates(&'a [f64]),
}

/// Read-only lookup service; clones share the same catalog.
#[derive(Clone)]
pub struct CountryCoder {
    catalog: Arc<RegionCatalog>,
}

impl CountryCoder {
    pub fn new(catalog: Arc<RegionCatalog>) -> Self {
        Self { catalog }
    }

    /// Get the underlying catalog (for stats)
    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    /// Region with an identifying property matching `id`
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.catalog.region(id)
    }

    /// Resolve an identifier or a coordinate query.
    ///
    /// Coordinate slices with fewer than two components resolve to nothing.
    pub fn resolve(&self, query: Query<'_>, opts: &CodingOptions) -> Option<&Region> {
        match query {
            Query::Identifier(id) => self.region(id),
            Query::Coordinates(&[lng, lat, ..]) => self.region_for_location(lat, lng, opts),
            Query::Coordinates(_) => None,
        }
    }

    /// Country containing the point.
    ///
    /// Follows the smallest region's `country` reference, else re-fetches it
    /// by its ISO alpha-2 code, else returns it unchanged.
    pub fn country_region(&self, lat: f64, lng: f64) -> Option<&Region> {
        let smallest = self.catalog.smallest_region(lat, lng)?;

        if !smallest.country.is_empty() {
            debug!("{} belongs to country {}", smallest.id, smallest.country);
            return self.region(&smallest.country);
        }
        if !smallest.iso1_a2.is_empty() {
            return self.region(&smallest.iso1_a2);
        }
        Some(smallest)
    }

    /// Region at the requested level containing the point.
    ///
    /// Accepts the smallest containing region or, failing that, the first of
    /// its groups whose level lies between the target and max level
    /// (inclusive) and which carries the required property. Country targets
    /// try the region from [`CountryCoder::country_region`] first, under the
    /// same conditions.
    pub fn region_for_location(&self, lat: f64, lng: f64, opts: &CodingOptions) -> Option<&Region> {
        let target = non_empty(&opts.level).unwrap_or("country");
        let max = non_empty(&opts.max_level).unwrap_or("world");
        let with_prop = non_empty(&opts.with_prop);

        let accepts = |region: &Region| with_prop.is_none_or(|prop| region.has_property(prop));

        debug!(
            "Leveled lookup at ({}, {}): level={}, max_level={}, with_prop={:?}",
            lat, lng, target, max, with_prop
        );

        let (Ok(target), Ok(max)) = (target.parse::<Level>(), max.parse::<Level>()) else {
            return None;
        };
        if max < target {
            return None;
        }

        let matches = |region: &Region| {
            region
                .admin_level()
                .is_some_and(|level| level.within(target, max))
                && accepts(region)
        };

        if target == Level::Country {
            if let Some(country) = self.country_region(lat, lng) {
                if matches(country) {
                    return Some(country);
                }
                debug!("{} rejected at country level, walking hierarchy", country.id);
            }
        }

        let smallest = self.catalog.smallest_region(lat, lng)?;

        if matches(smallest) {
            return Some(smallest);
        }

        smallest
            .groups()
            .iter()
            .filter_map(|group| self.region(group))
            .find(|&group| matches(group))
    }

    /// ISO 3166-1 alpha-2 code of the country containing the point, or `""`
    pub fn iso1_a2_code(&self, lat: f64, lng: f64) -> String {
        let opts = CodingOptions::default().with_prop("iso1A2");
        self.region_for_location(lat, lng, &opts)
            .map(|region| region.iso1_a2.clone())
            .unwrap_or_default()
    }

    /// English name of the country containing the point, or `""`
    pub fn name_en(&self, lat: f64, lng: f64) -> String {
        self.region_for_location(lat, lng, &CodingOptions::at_level("country"))
            .map(|region| region.name_en.clone())
            .unwrap_or_default()
    }

    /// English name for a code; falls back to the upper-cased code itself.
    pub fn name_en_by_code(&self, code: &str) -> String {
        match self.region(code) {
            Some(region) if !region.name_en.is_empty() => region.name_en.clone(),
            _ => code.to_uppercase(),
        }
    }
}
