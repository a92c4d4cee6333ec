//! Air quality API client for Open-Meteo
//!
//! Fetches the current European AQI and pollutant concentrations for a pair
//! of coordinates. Every call goes to the network; nothing is cached.

use std::time::Instant;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{info, instrument, warn};

use crate::AirWatchError;
use crate::http::get_json;
use crate::models::{AirQualitySnapshot, Pollutant};

const ENDPOINT: &str = "air-quality";
const INDEX_FIELD: &str = "european_aqi";

/// Anything that can report current air quality at a point
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirQualitySnapshot, AirWatchError>;
}

/// Comma-separated `current` field list: the index followed by each pollutant
#[must_use]
pub fn current_fields() -> String {
    std::iter::once(INDEX_FIELD)
        .chain(Pollutant::ALL.iter().map(|p| p.api_field()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Client for the Open-Meteo air quality endpoint
pub struct OpenMeteoAirQuality {
    client: ClientWithMiddleware,
    base_url: String,
}

impl OpenMeteoAirQuality {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn current_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?latitude={}&longitude={}&current={}&timezone=auto",
            self.base_url,
            latitude,
            longitude,
            urlencoding::encode(&current_fields())
        )
    }
}

#[async_trait]
impl AirQualitySource for OpenMeteoAirQuality {
    #[instrument(skip(self))]
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirQualitySnapshot, AirWatchError> {
        info!(
            "Getting current air quality for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );
        let start_time = Instant::now();

        let response: openmeteo::AirQualityResponse =
            get_json(&self.client, ENDPOINT, &self.current_url(latitude, longitude)).await?;

        let snapshot = response.into_snapshot()?;

        info!(
            "Retrieved air quality (index {:?}, {} readings) in {:.3}s",
            snapshot.index,
            snapshot.readings.len(),
            start_time.elapsed().as_secs_f64()
        );
        if snapshot.index.is_none() {
            warn!("Air quality response carried no {}", INDEX_FIELD);
        }

        Ok(snapshot)
    }
}

/// `Open-Meteo` API response structures and conversion
mod openmeteo {
    use serde::Deserialize;

    use super::{AirWatchError, AirQualitySnapshot, ENDPOINT, Pollutant};
    use crate::models::PollutantReadings;

    #[derive(Debug, Deserialize)]
    pub struct AirQualityResponse {
        pub timezone: Option<String>,
        pub current: Option<CurrentData>,
    }

    /// Any field may be null or missing
    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        pub time: String,
        pub european_aqi: Option<f64>,
        pub pm10: Option<f64>,
        pub pm2_5: Option<f64>,
        pub carbon_monoxide: Option<f64>,
        pub nitrogen_dioxide: Option<f64>,
        pub sulphur_dioxide: Option<f64>,
        pub ozone: Option<f64>,
    }

    impl CurrentData {
        fn reading(&self, pollutant: Pollutant) -> Option<f64> {
            match pollutant {
                Pollutant::Pm10 => self.pm10,
                Pollutant::Pm2_5 => self.pm2_5,
                Pollutant::CarbonMonoxide => self.carbon_monoxide,
                Pollutant::NitrogenDioxide => self.nitrogen_dioxide,
                Pollutant::SulphurDioxide => self.sulphur_dioxide,
                Pollutant::Ozone => self.ozone,
            }
        }
    }

    impl AirQualityResponse {
        pub fn into_snapshot(self) -> Result<AirQualitySnapshot, AirWatchError> {
            let current = self.current.ok_or_else(|| {
                AirWatchError::invalid_response(ENDPOINT, "No current air quality data")
            })?;

            let readings: PollutantReadings = Pollutant::ALL
                .into_iter()
                .filter_map(|p| current.reading(p).filter(|v| v.is_finite()).map(|v| (p, v)))
                .collect();

            let index = current
                .european_aqi
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.round() as u32);

            Ok(AirQualitySnapshot {
                timestamp: current.time,
                timezone: self.timezone,
                index,
                readings,
            })
        }
    }
}
