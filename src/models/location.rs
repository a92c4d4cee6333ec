//! Location models: the raw form query and the geocoded result

use serde::{Deserialize, Serialize};

use crate::validation::{Field, capitalize_words};

/// Location as typed into the form
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LocationQuery {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    /// Optional; blank means "use the configured default"
    #[serde(default)]
    pub country: String,
}

impl LocationQuery {
    #[must_use]
    pub fn new(city: impl Into<String>, state: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            country: country.into(),
        }
    }

    /// Raw value of one field
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::City => &self.city,
            Field::State => &self.state,
            Field::Country => &self.country,
        }
    }

    /// Trimmed, word-capitalized copy
    #[must_use]
    pub fn tidy(&self) -> Self {
        Self {
            city: capitalize_words(&self.city),
            state: capitalize_words(&self.state),
            country: capitalize_words(&self.country),
        }
    }

    /// Fill a blank country with `default`
    #[must_use]
    pub fn with_default_country(mut self, default: &str) -> Self {
        if self.country.trim().is_empty() {
            self.country = default.to_string();
        }
        self
    }

    /// Free-text query sent to the geocoder: `"city, state, country"`
    #[must_use]
    pub fn search_text(&self) -> String {
        format!(
            "{}, {}, {}",
            self.city.trim(),
            self.state.trim(),
            self.country.trim()
        )
    }
}

/// A geocoded location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Human-readable name as returned by the geocoder
    pub display_name: String,
}

impl ResolvedLocation {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, display_name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            display_name: display_name.into(),
        }
    }

    /// Format location as a coordinates line
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("Lat: {:.4}, Lon: {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text_joins_trimmed_parts() {
        let query = LocationQuery::new(" São Paulo ", "SP ", " Brasil");
        assert_eq!(query.search_text(), "São Paulo, SP, Brasil");
    }

    #[test]
    fn test_default_country_only_fills_blank() {
        let query = LocationQuery::new("Denver", "Colorado", "  ").with_default_country("United States");
        assert_eq!(query.country, "United States");

        let query = LocationQuery::new("Lyon", "Rhône", "France").with_default_country("United States");
        assert_eq!(query.country, "France");
    }

    #[test]
    fn test_format_coordinates() {
        let location = ResolvedLocation::new(-23.5505, -46.6333, "São Paulo");
        assert_eq!(location.format_coordinates(), "Lat: -23.5505, Lon: -46.6333");

        let location = ResolvedLocation::new(46.818_234, 8.227_456, "Test");
        assert_eq!(location.format_coordinates(), "Lat: 46.8182, Lon: 8.2275");
    }
}
