//! HTML rendering of the form surface
//!
//! The only place that produces markup. Templates live in `templates/` and
//! receive pre-formatted strings so no formatting logic leaks into them.

use askama::Template;

use crate::form::{FieldStatus, FormView, ResultRegion};
use crate::report::{AirQualityReport, ReadingSummary};
use crate::validation::Field;

const NOT_AVAILABLE: &str = "Indisponível";

/// One text input with its validation state
pub struct FieldView {
    pub id: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub required: bool,
    pub group_class: &'static str,
    pub input_class: &'static str,
    pub error: String,
    pub has_error: bool,
}

/// Result region contents, flattened to text
pub struct ReportView<'a> {
    pub location_name: &'a str,
    pub coordinates: &'a str,
    pub index: String,
    pub label: String,
    pub color: String,
    pub background: String,
    pub message: String,
    pub warning: bool,
    pub main_pollutant: Option<&'a ReadingSummary>,
    pub readings: &'a [ReadingSummary],
    pub measured_at: &'a str,
}

impl<'a> From<&'a AirQualityReport> for ReportView<'a> {
    fn from(report: &'a AirQualityReport) -> Self {
        let (label, color, background, message) = match &report.level {
            Some(level) => (
                level.label.clone(),
                level.color.clone(),
                level.background.clone(),
                level.message.clone(),
            ),
            None => (
                NOT_AVAILABLE.to_string(),
                "#9e9e9e".to_string(),
                "#f5f5f5".to_string(),
                String::new(),
            ),
        };
        Self {
            location_name: &report.location_name,
            coordinates: &report.coordinates,
            index: report
                .index
                .map_or_else(|| "--".to_string(), |index| index.to_string()),
            label,
            color,
            background,
            message,
            warning: report.has_warning(),
            main_pollutant: report.main_pollutant.as_ref(),
            readings: &report.readings,
            measured_at: &report.measured_at,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub fields: Vec<FieldView>,
    pub submit_label: &'static str,
    pub busy: bool,
    pub report: Option<ReportView<'a>>,
    pub error_message: String,
    pub has_error: bool,
}

fn field_view(view: &FormView, field: Field) -> FieldView {
    let (label, placeholder) = match field {
        Field::City => ("Cidade", "Ex: São Paulo"),
        Field::State => ("Estado", "Ex: SP"),
        Field::Country => ("País", "Ex: Brasil"),
    };
    let status = view.status(field);
    let error = status.error().unwrap_or_default().to_string();
    let (group_class, input_class) = match status {
        FieldStatus::Valid => ("form-group valid", ""),
        FieldStatus::Invalid(_) => ("form-group", "error"),
        FieldStatus::Unchecked => ("form-group", ""),
    };
    FieldView {
        id: field.as_str(),
        label,
        placeholder,
        value: view.query.get(field).to_string(),
        required: field.rules().required,
        group_class,
        input_class,
        has_error: !error.is_empty(),
        error,
    }
}

/// Render the full page for the current form state
pub fn render_page(view: &FormView) -> Result<String, askama::Error> {
    let (report, error_message) = match &view.result {
        ResultRegion::Hidden => (None, String::new()),
        ResultRegion::Report(report) => (Some(ReportView::from(report)), String::new()),
        ResultRegion::Error { message } => (None, message.clone()),
    };

    IndexTemplate {
        fields: Field::ALL
            .into_iter()
            .map(|field| field_view(view, field))
            .collect(),
        submit_label: view.submit.label(),
        busy: view.submit.is_busy(),
        report,
        has_error: !error_message.is_empty(),
        error_message,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::models::{AirQualitySnapshot, LocationQuery, Pollutant, ResolvedLocation};
    use crate::validation::REQUIRED_MESSAGE;

    fn report(index: u32) -> AirQualityReport {
        let snapshot = AirQualitySnapshot {
            timestamp: "2024-01-15T12:00:00Z".to_string(),
            timezone: None,
            index: Some(index),
            readings: [
                (Pollutant::Pm10, 15.5),
                (Pollutant::Pm2_5, 8.2),
                (Pollutant::CarbonMonoxide, 230.5),
                (Pollutant::Ozone, 65.2),
            ]
            .into_iter()
            .collect(),
        };
        let location =
            ResolvedLocation::new(-23.5505, -46.6333, "São Paulo, Estado de São Paulo, Brasil");
        AirQualityReport::build(&Classifier::default(), &location, &snapshot)
    }

    #[test]
    fn test_empty_form_prefills_country() {
        let html = render_page(&FormView::new("United States")).unwrap();
        assert!(html.contains(r#"id="country""#));
        assert!(html.contains(r#"value="United States""#));
        assert!(html.contains("Consultar Qualidade do Ar"));
        assert!(!html.contains(r#"id="aqi-value""#));
        assert!(!html.contains(r#"id="error-message""#));
    }

    #[test]
    fn test_report_elements() {
        let mut view = FormView::with_query(LocationQuery::new("São Paulo", "SP", "Brasil"));
        view.result = ResultRegion::Report(report(30));
        let html = render_page(&view).unwrap();

        assert!(html.contains(r#"<span id="aqi-value">30</span>"#));
        assert!(html.contains(r#"<span id="aqi-category">BOM</span>"#));
        assert!(html.contains("São Paulo, Estado de São Paulo, Brasil"));
        assert!(html.contains("Lat: -23.5505, Lon: -46.6333"));
        assert!(html.contains(r#"<span class="pollutant-value" id="pm10-value">15.5 μg/m³</span>"#));
        assert!(html.contains(r#"id="co-value">230.5 μg/m³<"#));
        assert!(!html.contains(r#"id="no2-value""#));
        assert!(html.contains("15/01/2024 12:00"));
        assert!(!html.contains(r#"id="health-warning""#));
        // retained input
        assert!(html.contains(r#"value="São Paulo""#));
    }

    #[test]
    fn test_health_warning_for_high_index() {
        let mut view = FormView::new("Brasil");
        view.result = ResultRegion::Report(report(85));
        let html = render_page(&view).unwrap();
        assert!(html.contains(r#"id="health-warning""#));
        assert!(html.contains("efeitos à saúde"));
        assert!(html.contains("MUITO RUIM"));
    }

    #[test]
    fn test_error_and_field_messages() {
        let mut view = FormView::with_query(LocationQuery::new("", "SP", ""));
        view.set_status(Field::City, FieldStatus::Invalid(REQUIRED_MESSAGE.to_string()));
        view.result = ResultRegion::Error {
            message: crate::error::NETWORK_ERROR_MESSAGE.to_string(),
        };
        let html = render_page(&view).unwrap();
        assert!(html.contains(r#"id="error-message""#));
        assert!(html.contains("Erro de conexão"));
        assert!(html.contains(REQUIRED_MESSAGE));
        assert!(html.contains(r#"id="cityError" class="error-message show""#));
    }

    #[test]
    fn test_busy_submit_control() {
        let mut view = FormView::new("Brasil");
        view.submit = crate::form::SubmitState::Busy;
        let html = render_page(&view).unwrap();
        assert!(html.contains(r#"<button type="submit" id="submit-btn" disabled>Buscando...</button>"#));
        assert!(html.contains(r#"<div id="loading" class="show">"#));

        let html = render_page(&FormView::new("Brasil")).unwrap();
        assert!(html.contains(r#"<button type="submit" id="submit-btn">Consultar Qualidade do Ar</button>"#));
        assert!(html.contains(r#"<div id="loading">"#));
    }

    #[test]
    fn test_markup_is_escaped() {
        let view = FormView::with_query(LocationQuery::new("<script>", "SP", ""));
        let html = render_page(&view).unwrap();
        assert!(!html.contains(r#"value="<script>""#));
        assert!(html.contains("&lt;script&gt;"));
    }
}
