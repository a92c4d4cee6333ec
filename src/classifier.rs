//! Classification of a snapshot: index severity and dominant pollutant

use serde::Serialize;
use tracing::debug;

use crate::catalog::{IndexLevel, IndexLevelTable, PollutantCatalog, PollutantInfo};
use crate::models::PollutantReadings;

/// The pollutant whose reading is furthest above its guideline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainPollutant<'a> {
    pub info: &'a PollutantInfo,
    pub value: f64,
    /// `value / guideline`
    pub ratio: f64,
}

/// Pure classification over injected lookup tables
#[derive(Debug, Clone)]
pub struct Classifier {
    pollutants: PollutantCatalog,
    levels: IndexLevelTable,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PollutantCatalog::standard(), IndexLevelTable::standard())
    }
}

impl Classifier {
    #[must_use]
    pub fn new(pollutants: PollutantCatalog, levels: IndexLevelTable) -> Self {
        Self { pollutants, levels }
    }

    #[must_use]
    pub fn pollutants(&self) -> &PollutantCatalog {
        &self.pollutants
    }

    /// Severity tier for a composite index value
    #[must_use]
    pub fn severity(&self, index: u32) -> Option<&IndexLevel> {
        self.levels.level_for(index)
    }

    /// Rank present readings by `reading / guideline`.
    ///
    /// Walks the catalog in order and only replaces the leader on a strictly
    /// higher ratio, so ties keep the earlier pollutant.
    #[must_use]
    pub fn main_pollutant(&self, readings: &PollutantReadings) -> Option<MainPollutant<'_>> {
        let mut best: Option<MainPollutant<'_>> = None;

        for info in self.pollutants.iter() {
            let Some(&value) = readings.get(&info.pollutant) else {
                continue;
            };
            if info.guideline <= 0.0 {
                continue;
            }
            let ratio = value / info.guideline;
            if best.as_ref().is_none_or(|current| ratio > current.ratio) {
                best = Some(MainPollutant { info, value, ratio });
            }
        }

        if let Some(main) = &best {
            debug!(
                "Main pollutant: {} ({:.1} {}, {:.2}x guideline)",
                main.info.pollutant, main.value, main.info.unit, main.ratio
            );
        }
        best
    }
}
