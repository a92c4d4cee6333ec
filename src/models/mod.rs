//! Data models for the AirWatch application
//!
//! This module contains the core domain models organized by concern:
//! - Location: what the user typed and where the geocoder placed it
//! - Air quality: pollutant identities and a measured snapshot

pub mod air_quality;
pub mod location;

// Re-export all public types for convenient access
pub use air_quality::{AirQualitySnapshot, Pollutant, PollutantReadings};
pub use location::{LocationQuery, ResolvedLocation};
