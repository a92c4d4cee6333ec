//! State of the lookup form surface
//!
//! Everything the page shows besides static markup: field values and their
//! validation status, the submit control, and the result region. Rendering
//! reads this state; nothing here produces markup.
//!
//! [`LiveValidator`] is the server-side model of the page's as-you-type
//! checks. The served page debounces in its own script and calls
//! `/api/validate`; this type pins the timing and blur rules that script
//! follows and is what the tests drive.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::debounce::Debouncer;
use crate::models::LocationQuery;
use crate::report::AirQualityReport;
use crate::validation::{Field, capitalize_words, validate_field};

/// Quiet period before live validation runs while typing
pub const LIVE_VALIDATION_DELAY: Duration = Duration::from_millis(300);

pub const SUBMIT_LABEL: &str = "Consultar Qualidade do Ar";
pub const BUSY_LABEL: &str = "Buscando...";

/// Validation status of one field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum FieldStatus {
    #[default]
    Unchecked,
    Valid,
    /// Carries the first failed rule's message
    Invalid(String),
}

impl FieldStatus {
    /// Status for a field given its validation errors
    #[must_use]
    pub fn from_errors(errors: &[String]) -> Self {
        match errors.first() {
            Some(first) => FieldStatus::Invalid(first.clone()),
            None => FieldStatus::Valid,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            FieldStatus::Invalid(message) => Some(message),
            _ => None,
        }
    }
}

/// Submit control state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitState {
    #[default]
    Idle,
    Busy,
}

impl SubmitState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SubmitState::Idle => SUBMIT_LABEL,
            SubmitState::Busy => BUSY_LABEL,
        }
    }

    #[must_use]
    pub fn is_busy(self) -> bool {
        self == SubmitState::Busy
    }
}

/// Owner of the submit control's busy flag.
///
/// Observers subscribe to state changes; [`SubmitControl::begin`] hands out a
/// guard that flips the control back to idle when dropped, whatever path the
/// submission leaves by.
#[derive(Debug)]
pub struct SubmitControl {
    state: watch::Sender<SubmitState>,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitControl {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(SubmitState::Idle),
        }
    }

    #[must_use]
    pub fn state(&self) -> SubmitState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    /// Mark the control busy until the returned guard is dropped
    #[must_use = "the control goes idle again as soon as the guard is dropped"]
    pub fn begin(&self) -> LoadingGuard<'_> {
        self.state.send_replace(SubmitState::Busy);
        debug!("Submit control busy");
        LoadingGuard { control: self }
    }
}

/// Restores the submit control on drop
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    control: &'a SubmitControl,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.control.state.send_replace(SubmitState::Idle);
        debug!("Submit control idle");
    }
}

/// What the result region currently shows
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultRegion {
    #[default]
    Hidden,
    Report(AirQualityReport),
    Error { message: String },
}

/// The whole form surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub query: LocationQuery,
    pub fields: BTreeMap<Field, FieldStatus>,
    pub submit: SubmitState,
    pub result: ResultRegion,
}

impl FormView {
    /// Fresh form with the country prefilled
    #[must_use]
    pub fn new(default_country: &str) -> Self {
        Self::with_query(LocationQuery::new("", "", default_country))
    }

    /// Form holding previously entered values
    #[must_use]
    pub fn with_query(query: LocationQuery) -> Self {
        Self {
            query,
            fields: Field::ALL
                .into_iter()
                .map(|field| (field, FieldStatus::Unchecked))
                .collect(),
            submit: SubmitState::Idle,
            result: ResultRegion::Hidden,
        }
    }

    /// Back to the initial state: blank fields, default country, no result
    pub fn reset(&mut self, default_country: &str) {
        *self = Self::new(default_country);
    }

    #[must_use]
    pub fn status(&self, field: Field) -> &FieldStatus {
        self.fields.get(&field).unwrap_or(&FieldStatus::Unchecked)
    }

    pub fn set_status(&mut self, field: Field, status: FieldStatus) {
        self.fields.insert(field, status);
    }

    /// Mark each field from a per-field error map; absent fields are valid
    pub fn apply_errors(&mut self, errors: &BTreeMap<Field, Vec<String>>) {
        for field in Field::ALL {
            let status = errors
                .get(&field)
                .map_or(FieldStatus::Valid, |messages| FieldStatus::from_errors(messages));
            self.set_status(field, status);
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fields
            .values()
            .all(|status| !matches!(status, FieldStatus::Invalid(_)))
    }
}

/// Status change produced by live validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUpdate {
    pub field: Field,
    pub status: FieldStatus,
    /// Tidied value to write back into the input, set on blur
    pub value: Option<String>,
}

/// Per-field validation while the user types.
///
/// Keystrokes are debounced by [`LIVE_VALIDATION_DELAY`]; leaving a field
/// validates at once and cancels that field's pending run.
pub struct LiveValidator {
    debouncers: HashMap<Field, Debouncer>,
    updates: mpsc::UnboundedSender<FieldUpdate>,
}

impl LiveValidator {
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<FieldUpdate>) {
        let (updates, receiver) = mpsc::unbounded_channel();
        let debouncers = Field::ALL
            .into_iter()
            .map(|field| (field, Debouncer::new(delay)))
            .collect();
        (Self { debouncers, updates }, receiver)
    }

    /// A keystroke changed `field` to `value`
    pub fn input(&self, field: Field, value: &str) {
        let Some(debouncer) = self.debouncers.get(&field) else {
            return;
        };
        let updates = self.updates.clone();
        let value = value.to_string();
        debouncer.schedule(move || {
            let status = FieldStatus::from_errors(&validate_field(field, &value));
            // receiver gone means the form was torn down
            let _ = updates.send(FieldUpdate {
                field,
                status,
                value: None,
            });
        });
    }

    /// Focus left `field`; validates immediately and tidies the value
    pub fn blur(&self, field: Field, value: &str) -> FieldUpdate {
        if let Some(debouncer) = self.debouncers.get(&field) {
            debouncer.cancel();
        }
        let status = FieldStatus::from_errors(&validate_field(field, value));
        let tidied = capitalize_words(value);
        let update = FieldUpdate {
            field,
            status,
            value: (!tidied.is_empty()).then_some(tidied),
        };
        let _ = self.updates.send(update.clone());
        update
    }
}
