//! Regioncoder - reverse geocoding of coordinates to countries and
//! administrative groupings.
//!
//! This library provides the region catalog and lookup service used by the query binary.

pub mod config;
pub mod error;
pub mod models;
pub mod pip;

pub use error::CatalogError;
pub use models::{Level, Region};
pub use pip::{CodingOptions, CountryCoder, RegionCatalog};
