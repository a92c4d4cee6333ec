//! Location Resolution Module
//!
//! This module turns the free-text location typed into the form into
//! coordinates using the Nominatim search API.

use std::time::Instant;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::AirWatchError;
use crate::http::get_json;
use crate::models::{LocationQuery, ResolvedLocation};

const ENDPOINT: &str = "geocoding";

/// Anything that can place a [`LocationQuery`] on the map
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Resolve to the best match, failing with `LocationNotFound` when
    /// nothing matches
    async fn resolve(&self, query: &LocationQuery) -> Result<ResolvedLocation, AirWatchError>;
}

/// Nominatim search result; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: Coordinate,
    lon: Coordinate,
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Text(String),
    Number(f64),
}

impl Coordinate {
    fn parse(&self, axis: &str) -> Result<f64, AirWatchError> {
        match self {
            Coordinate::Number(value) => Ok(*value),
            Coordinate::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                AirWatchError::invalid_response(ENDPOINT, format!("Invalid {axis}: {text}"))
            }),
        }
    }
}

/// Geocoder backed by the Nominatim search endpoint
pub struct NominatimResolver {
    client: ClientWithMiddleware,
    base_url: String,
}

impl NominatimResolver {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn search_url(&self, text: &str) -> String {
        format!(
            "{}?q={}&format=json&limit=1&addressdetails=1",
            self.base_url,
            urlencoding::encode(text)
        )
    }
}

#[async_trait]
impl LocationResolver for NominatimResolver {
    #[instrument(skip(self), fields(city = %query.city, state = %query.state, country = %query.country))]
    async fn resolve(&self, query: &LocationQuery) -> Result<ResolvedLocation, AirWatchError> {
        let text = query.search_text();
        info!("Geocoding location: '{}'", text);
        let start_time = Instant::now();

        let places: Vec<NominatimPlace> =
            get_json(&self.client, ENDPOINT, &self.search_url(&text)).await?;

        let Some(place) = places.into_iter().next() else {
            warn!("No results found for location '{}'", text);
            return Err(AirWatchError::location_not_found(text));
        };

        let location = ResolvedLocation::new(
            place.lat.parse("latitude")?,
            place.lon.parse("longitude")?,
            place.display_name,
        );

        debug!(
            "Resolved '{}' to {} ({:.4}, {:.4}) in {:.3}s",
            text,
            location.display_name,
            location.latitude,
            location.longitude,
            start_time.elapsed().as_secs_f64()
        );

        Ok(location)
    }
}
