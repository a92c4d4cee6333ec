//! `AirWatch` - Air quality lookup by city, state and country
//!
//! This library geocodes a typed location, fetches current air quality for
//! the resulting coordinates and classifies it into a health-oriented
//! summary. The web layer serves the lookup form and a JSON API on top.

pub mod air_quality;
pub mod api;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod debounce;
pub mod error;
pub mod form;
pub mod http;
pub mod location_resolver;
pub mod models;
pub mod render;
pub mod report;
pub mod submission;
pub mod telemetry;
pub mod validation;
pub mod web;

// Re-export core types for public API
pub use air_quality::{AirQualitySource, OpenMeteoAirQuality};
pub use catalog::{IndexLevelTable, PollutantCatalog};
pub use classifier::Classifier;
pub use config::AirWatchConfig;
pub use error::AirWatchError;
pub use form::{FormView, SubmitControl};
pub use location_resolver::{LocationResolver, NominatimResolver};
pub use models::{AirQualitySnapshot, LocationQuery, Pollutant, ResolvedLocation};
pub use report::AirQualityReport;
pub use submission::AirQualityLookup;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirWatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
