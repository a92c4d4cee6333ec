//! The lookup pipeline: validate, geocode, fetch, classify
//!
//! The two upstream calls run strictly one after the other. Stale
//! submissions are not cancelled or de-duplicated.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::air_quality::AirQualitySource;
use crate::classifier::Classifier;
use crate::form::{FormView, ResultRegion, SubmitControl};
use crate::location_resolver::LocationResolver;
use crate::models::LocationQuery;
use crate::report::AirQualityReport;
use crate::validation::validate_query;
use crate::{AirWatchError, Result};

/// Runs lookups against injected upstreams and lookup tables
#[derive(Clone)]
pub struct AirQualityLookup {
    resolver: Arc<dyn LocationResolver>,
    source: Arc<dyn AirQualitySource>,
    classifier: Arc<Classifier>,
    default_country: String,
}

impl AirQualityLookup {
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        source: Arc<dyn AirQualitySource>,
        classifier: Arc<Classifier>,
        default_country: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            source,
            classifier,
            default_country: default_country.into(),
        }
    }

    #[must_use]
    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    /// Validate and look up, returning the report or the first failure
    pub async fn lookup(&self, query: &LocationQuery) -> Result<AirQualityReport> {
        let query = validate_query(query)?;
        self.fetch_report(&query).await
    }

    /// Handle a form submission end to end.
    ///
    /// Never fails: validation errors land on the fields, anything later lands
    /// in the result region as a user message. The entered values are kept
    /// (tidied) either way and the submit control is idle on return.
    #[instrument(skip_all)]
    pub async fn submit(&self, view: &mut FormView, control: &SubmitControl) {
        let query = match validate_query(&view.query) {
            Ok(query) => query,
            Err(AirWatchError::Validation { errors }) => {
                info!("Submission rejected: {} invalid field(s)", errors.len());
                view.apply_errors(&errors);
                view.submit = control.state();
                return;
            }
            Err(other) => {
                view.result = ResultRegion::Error {
                    message: other.user_message(),
                };
                view.submit = control.state();
                return;
            }
        };
        view.apply_errors(&Default::default());
        view.query = query.clone();

        {
            let _loading = control.begin();
            view.result = match self.fetch_report(&query).await {
                Ok(report) => ResultRegion::Report(report),
                Err(err) => {
                    match &err {
                        AirWatchError::LocationNotFound { .. } => warn!("{}", err),
                        _ => error!("Error in form submission: {}", err),
                    }
                    ResultRegion::Error {
                        message: err.user_message(),
                    }
                }
            };
        }

        view.submit = control.state();
    }

    async fn fetch_report(&self, query: &LocationQuery) -> Result<AirQualityReport> {
        let query = query.clone().with_default_country(&self.default_country);

        let location = self.resolver.resolve(&query).await?;
        info!(
            "Location found: {} ({:.4}, {:.4})",
            location.display_name, location.latitude, location.longitude
        );

        let snapshot = self
            .source
            .fetch_current(location.latitude, location.longitude)
            .await?;

        Ok(AirQualityReport::build(&self.classifier, &location, &snapshot))
    }
}
