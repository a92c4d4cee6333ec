//! Air quality models: pollutant identities and measured snapshots

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Pollutants reported by the air quality endpoint.
///
/// Declaration order is the catalog order and is used to break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pollutant {
    Pm10,
    #[serde(rename = "pm2_5")]
    Pm2_5,
    CarbonMonoxide,
    NitrogenDioxide,
    SulphurDioxide,
    Ozone,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm10,
        Pollutant::Pm2_5,
        Pollutant::CarbonMonoxide,
        Pollutant::NitrogenDioxide,
        Pollutant::SulphurDioxide,
        Pollutant::Ozone,
    ];

    /// Field name used by the upstream API
    #[must_use]
    pub fn api_field(self) -> &'static str {
        match self {
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm2_5 => "pm2_5",
            Pollutant::CarbonMonoxide => "carbon_monoxide",
            Pollutant::NitrogenDioxide => "nitrogen_dioxide",
            Pollutant::SulphurDioxide => "sulphur_dioxide",
            Pollutant::Ozone => "ozone",
        }
    }

    /// Identifier of the element carrying this pollutant's value on the page
    #[must_use]
    pub fn element_id(self) -> &'static str {
        match self {
            Pollutant::Pm10 => "pm10-value",
            Pollutant::Pm2_5 => "pm25-value",
            Pollutant::CarbonMonoxide => "co-value",
            Pollutant::NitrogenDioxide => "no2-value",
            Pollutant::SulphurDioxide => "so2-value",
            Pollutant::Ozone => "o3-value",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_field())
    }
}

/// Concentrations keyed by pollutant, iterated in catalog order
pub type PollutantReadings = BTreeMap<Pollutant, f64>;

/// Current air quality at one point, as fetched
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQualitySnapshot {
    /// Measurement time as sent by the upstream (local time of `timezone`)
    pub timestamp: String,
    /// IANA zone the timestamp is expressed in, when known
    pub timezone: Option<String>,
    /// European AQI, absent when the upstream did not report one
    pub index: Option<u32>,
    /// Only the pollutants the upstream reported
    pub readings: PollutantReadings,
}

impl AirQualitySnapshot {
    #[must_use]
    pub fn reading(&self, pollutant: Pollutant) -> Option<f64> {
        self.readings.get(&pollutant).copied()
    }
}
