//! Point-in-Polygon (PIP) region lookup.
//!
//! Parses a region feature collection into an immutable catalog and
//! resolves coordinates and identifiers to regions, walking the group
//! hierarchy to reach a requested level.

mod boundary;
mod canonical;
mod catalog;
mod geometry;
mod service;

pub use boundary::{extract_region_features, RegionFeature};
pub use canonical::canonical_id;
pub use catalog::{RegionCatalog, EMBEDDED_DATASET};
pub use geometry::RegionGeometry;
pub use service::{CodingOptions, CountryCoder, Query};
