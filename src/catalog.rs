//! Read-only lookup tables for pollutants and index levels
//!
//! Both tables are plain values built once at startup and handed to the
//! [`Classifier`](crate::classifier::Classifier); nothing reads them as globals.

use serde::Serialize;

use crate::models::Pollutant;

/// Display metadata and reference guideline for one pollutant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantInfo {
    pub pollutant: Pollutant,
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
    /// Reference concentration used to rank pollutants against each other
    pub guideline: f64,
}

/// Pollutant metadata in catalog order
#[derive(Debug, Clone)]
pub struct PollutantCatalog {
    entries: Vec<PollutantInfo>,
}

const MICROGRAMS: &str = "μg/m³";

impl PollutantCatalog {
    /// Guidelines follow the WHO reference concentrations (µg/m³)
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            PollutantInfo {
                pollutant: Pollutant::Pm10,
                name: "MP10",
                unit: MICROGRAMS,
                description: "Material particulado menor que 10 micrômetros",
                guideline: 50.0,
            },
            PollutantInfo {
                pollutant: Pollutant::Pm2_5,
                name: "MP2.5",
                unit: MICROGRAMS,
                description: "Material particulado menor que 2.5 micrômetros",
                guideline: 25.0,
            },
            PollutantInfo {
                pollutant: Pollutant::CarbonMonoxide,
                name: "CO",
                unit: MICROGRAMS,
                description: "Monóxido de carbono",
                guideline: 10_000.0,
            },
            PollutantInfo {
                pollutant: Pollutant::NitrogenDioxide,
                name: "NO₂",
                unit: MICROGRAMS,
                description: "Dióxido de nitrogênio",
                guideline: 40.0,
            },
            PollutantInfo {
                pollutant: Pollutant::SulphurDioxide,
                name: "SO₂",
                unit: MICROGRAMS,
                description: "Dióxido de enxofre",
                guideline: 40.0,
            },
            PollutantInfo {
                pollutant: Pollutant::Ozone,
                name: "O₃",
                unit: MICROGRAMS,
                description: "Ozônio",
                guideline: 100.0,
            },
        ])
    }

    /// Entries are kept in the order given
    #[must_use]
    pub fn new(entries: Vec<PollutantInfo>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, pollutant: Pollutant) -> Option<&PollutantInfo> {
        self.entries.iter().find(|info| info.pollutant == pollutant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PollutantInfo> {
        self.entries.iter()
    }
}

/// Severity tier of the composite index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexLevel {
    /// Highest index value still in this tier; `None` for the open-ended top tier
    pub upper_bound: Option<u32>,
    pub label: &'static str,
    pub color: &'static str,
    pub background: &'static str,
    pub message: &'static str,
    /// Whether the page should carry a health warning for this tier
    pub warning: bool,
}

/// Ordered index bands
#[derive(Debug, Clone)]
pub struct IndexLevelTable {
    levels: Vec<IndexLevel>,
}

impl IndexLevelTable {
    /// European AQI bands at 20/40/60/80/100
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            IndexLevel {
                upper_bound: Some(20),
                label: "MUITO BOM",
                color: "#00e400",
                background: "#e8f5e8",
                message: "Qualidade do ar excelente. Aproveite as atividades ao ar livre.",
                warning: false,
            },
            IndexLevel {
                upper_bound: Some(40),
                label: "BOM",
                color: "#7cb342",
                background: "#f1f8e9",
                message: "Qualidade do ar satisfatória para a maioria das pessoas.",
                warning: false,
            },
            IndexLevel {
                upper_bound: Some(60),
                label: "MODERADO",
                color: "#ffa726",
                background: "#fff8e1",
                message: "Pessoas sensíveis podem experimentar sintomas menores.",
                warning: false,
            },
            IndexLevel {
                upper_bound: Some(80),
                label: "RUIM",
                color: "#ef5350",
                background: "#ffebee",
                message: "Grupos sensíveis podem sentir efeitos à saúde. Reduza esforços prolongados ao ar livre.",
                warning: true,
            },
            IndexLevel {
                upper_bound: Some(100),
                label: "MUITO RUIM",
                color: "#ab47bc",
                background: "#f3e5f5",
                message: "Toda a população pode sentir efeitos à saúde. Evite atividades ao ar livre.",
                warning: true,
            },
            IndexLevel {
                upper_bound: None,
                label: "PERIGOSO",
                color: "#8d1e37",
                background: "#ffebee",
                message: "Alerta de saúde: todos podem sentir efeitos graves à saúde.",
                warning: true,
            },
        ])
    }

    /// Levels must be sorted by `upper_bound`, open-ended tier last
    #[must_use]
    pub fn new(levels: Vec<IndexLevel>) -> Self {
        Self { levels }
    }

    /// First tier whose upper bound admits `index`.
    ///
    /// Values past every bound land in the last tier.
    #[must_use]
    pub fn level_for(&self, index: u32) -> Option<&IndexLevel> {
        self.levels
            .iter()
            .find(|level| level.upper_bound.is_none_or(|bound| index <= bound))
            .or_else(|| self.levels.last())
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexLevel> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "MUITO BOM")]
    #[case(15, "MUITO BOM")]
    #[case(20, "MUITO BOM")]
    #[case(21, "BOM")]
    #[case(30, "BOM")]
    #[case(40, "BOM")]
    #[case(55, "MODERADO")]
    #[case(75, "RUIM")]
    #[case(85, "MUITO RUIM")]
    #[case(100, "MUITO RUIM")]
    #[case(101, "PERIGOSO")]
    #[case(500, "PERIGOSO")]
    fn test_level_bands(#[case] index: u32, #[case] label: &str) {
        let table = IndexLevelTable::standard();
        assert_eq!(table.level_for(index).unwrap().label, label);
    }

    #[test]
    fn test_high_tiers_warn_about_health_effects() {
        let table = IndexLevelTable::standard();
        let level = table.level_for(85).unwrap();
        assert!(level.warning);
        assert!(level.message.contains("efeitos à saúde"));
        assert!(!table.level_for(30).unwrap().warning);
    }

    #[test]
    fn test_bounded_table_clamps_to_last_tier() {
        let table = IndexLevelTable::new(vec![IndexLevel {
            upper_bound: Some(10),
            label: "LOW",
            color: "#000",
            background: "#fff",
            message: "",
            warning: false,
        }]);
        assert_eq!(table.level_for(99).unwrap().label, "LOW");
        assert!(IndexLevelTable::new(Vec::new()).level_for(1).is_none());
    }

    #[test]
    fn test_catalog_order_and_lookup() {
        let catalog = PollutantCatalog::standard();
        let order: Vec<Pollutant> = catalog.iter().map(|info| info.pollutant).collect();
        assert_eq!(order, Pollutant::ALL.to_vec());
        assert_eq!(catalog.get(Pollutant::Ozone).unwrap().name, "O₃");
        assert_eq!(catalog.get(Pollutant::CarbonMonoxide).unwrap().guideline, 10_000.0);
    }
}
