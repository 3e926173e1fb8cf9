//! Core data models for the region catalog.

pub mod level;
pub mod region;

pub use level::{Level, UnknownLevel};
pub use region::Region;
