//! Plain-data summary of one lookup, ready for rendering or JSON

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use crate::catalog::IndexLevel;
use crate::classifier::Classifier;
use crate::models::{AirQualitySnapshot, Pollutant, ResolvedLocation};

const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";
const UNKNOWN_TIME: &str = "Horário indisponível";

/// Index tier as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub label: String,
    pub color: String,
    pub background: String,
    pub message: String,
    pub warning: bool,
}

impl From<&IndexLevel> for LevelSummary {
    fn from(level: &IndexLevel) -> Self {
        Self {
            label: level.label.to_string(),
            color: level.color.to_string(),
            background: level.background.to_string(),
            message: level.message.to_string(),
            warning: level.warning,
        }
    }
}

/// One pollutant line of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingSummary {
    pub pollutant: Pollutant,
    pub element_id: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub description: String,
    /// `"<value with one decimal> <unit>"`
    pub display: String,
}

/// Everything the result region shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReport {
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub coordinates: String,
    pub index: Option<u32>,
    pub level: Option<LevelSummary>,
    pub main_pollutant: Option<ReadingSummary>,
    /// Present readings only, in catalog order
    pub readings: Vec<ReadingSummary>,
    pub measured_at: String,
}

impl AirQualityReport {
    /// Classify a snapshot for a resolved location
    #[must_use]
    pub fn build(
        classifier: &Classifier,
        location: &ResolvedLocation,
        snapshot: &AirQualitySnapshot,
    ) -> Self {
        let readings: Vec<ReadingSummary> = classifier
            .pollutants()
            .iter()
            .filter_map(|info| {
                snapshot.reading(info.pollutant).map(|value| ReadingSummary {
                    pollutant: info.pollutant,
                    element_id: info.pollutant.element_id().to_string(),
                    name: info.name.to_string(),
                    value,
                    unit: info.unit.to_string(),
                    description: info.description.to_string(),
                    display: format!("{value:.1} {}", info.unit),
                })
            })
            .collect();

        let main_pollutant = classifier
            .main_pollutant(&snapshot.readings)
            .and_then(|main| {
                readings
                    .iter()
                    .find(|reading| reading.pollutant == main.info.pollutant)
                    .cloned()
            });

        Self {
            location_name: location.display_name.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            coordinates: location.format_coordinates(),
            index: snapshot.index,
            level: snapshot
                .index
                .and_then(|index| classifier.severity(index))
                .map(LevelSummary::from),
            main_pollutant,
            readings,
            measured_at: format_timestamp(&snapshot.timestamp, snapshot.timezone.as_deref()),
        }
    }

    /// Whether the health warning block should be shown
    #[must_use]
    pub fn has_warning(&self) -> bool {
        self.level.as_ref().is_some_and(|level| level.warning)
    }
}

/// Render an upstream timestamp as `dd/mm/yyyy HH:MM`.
///
/// Accepts RFC 3339 (shown in its own offset) and the naive
/// `YYYY-MM-DDTHH:MM[:SS]` form, which is taken to be local time of
/// `timezone`; the zone abbreviation is appended when the zone is known.
#[must_use]
pub fn format_timestamp(raw: &str, timezone: Option<&str>) -> String {
    let raw = raw.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return with_offset.format(DISPLAY_FORMAT).to_string();
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"));
    let Ok(naive) = naive else {
        return UNKNOWN_TIME.to_string();
    };

    let zoned = timezone
        .and_then(|name| name.parse::<Tz>().ok())
        .and_then(|tz| tz.from_local_datetime(&naive).earliest());

    match zoned {
        Some(local) => local.format("%d/%m/%Y %H:%M (%Z)").to_string(),
        None => naive.format(DISPLAY_FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PollutantReadings;

    fn snapshot(index: Option<u32>, readings: &[(Pollutant, f64)]) -> AirQualitySnapshot {
        AirQualitySnapshot {
            timestamp: "2024-01-15T12:00".to_string(),
            timezone: Some("America/Sao_Paulo".to_string()),
            index,
            readings: readings.iter().copied().collect::<PollutantReadings>(),
        }
    }

    fn sao_paulo() -> ResolvedLocation {
        ResolvedLocation::new(-23.5505, -46.6333, "São Paulo, Estado de São Paulo, Brasil")
    }

    #[test]
    fn test_report_for_good_air() {
        let classifier = Classifier::default();
        let snapshot = snapshot(
            Some(30),
            &[
                (Pollutant::Pm10, 15.5),
                (Pollutant::Pm2_5, 8.2),
                (Pollutant::CarbonMonoxide, 230.5),
                (Pollutant::NitrogenDioxide, 12.8),
                (Pollutant::SulphurDioxide, 3.1),
                (Pollutant::Ozone, 65.2),
            ],
        );

        let report = AirQualityReport::build(&classifier, &sao_paulo(), &snapshot);

        assert_eq!(report.index, Some(30));
        assert_eq!(report.level.as_ref().unwrap().label, "BOM");
        assert!(!report.has_warning());
        assert_eq!(report.coordinates, "Lat: -23.5505, Lon: -46.6333");
        assert!(report.location_name.contains("São Paulo"));
        assert_eq!(report.readings.len(), 6);
        assert_eq!(report.readings[0].display, "15.5 μg/m³");
        assert_eq!(report.readings[2].element_id, "co-value");
        // 65.2 / 100 beats 15.5 / 50
        assert_eq!(report.main_pollutant.as_ref().unwrap().pollutant, Pollutant::Ozone);
    }

    #[test]
    fn test_missing_readings_are_omitted() {
        let classifier = Classifier::default();
        let snapshot = snapshot(Some(85), &[(Pollutant::Pm10, 45.0), (Pollutant::Ozone, 120.0)]);

        let report = AirQualityReport::build(&classifier, &sao_paulo(), &snapshot);

        let ids: Vec<&str> = report.readings.iter().map(|r| r.element_id.as_str()).collect();
        assert_eq!(ids, vec!["pm10-value", "o3-value"]);
        assert!(report.has_warning());
        assert_eq!(report.level.unwrap().label, "MUITO RUIM");
    }

    #[test]
    fn test_missing_index_has_no_level() {
        let classifier = Classifier::default();
        let report = AirQualityReport::build(&classifier, &sao_paulo(), &snapshot(None, &[]));
        assert!(report.index.is_none());
        assert!(report.level.is_none());
        assert!(report.main_pollutant.is_none());
        assert!(!report.has_warning());
    }

    #[test]
    fn test_format_timestamp_variants() {
        assert_eq!(format_timestamp("2024-01-15T12:00:00Z", None), "15/01/2024 12:00");
        assert_eq!(format_timestamp("2024-01-15T12:00", None), "15/01/2024 12:00");
        assert_eq!(format_timestamp("2024-01-15T09:30:00", None), "15/01/2024 09:30");
        assert_eq!(
            format_timestamp("2024-01-15T12:00", Some("America/Sao_Paulo")),
            "15/01/2024 12:00 (-03)"
        );
        assert_eq!(format_timestamp("2024-01-15T12:00", Some("Not/AZone")), "15/01/2024 12:00");
        assert_eq!(format_timestamp("yesterday", None), UNKNOWN_TIME);
    }

    #[test]
    fn test_formatted_timestamp_has_no_iso_artifacts() {
        for raw in ["2024-01-15T12:00:00Z", "2024-07-01T23:45", "2023-12-31T00:00:00+01:00"] {
            let formatted = format_timestamp(raw, Some("Europe/Berlin"));
            assert!(!formatted.is_empty());
            assert!(!formatted.contains(raw));
            assert!(!formatted.contains('T') || formatted.contains("CET") || formatted.contains("CEST"));
            assert!(!formatted.ends_with('Z'));
            assert!(formatted.contains('/'));
        }
    }
}
