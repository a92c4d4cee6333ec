//! JSON API: lookup and live field validation

use std::collections::BTreeMap;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::AirWatchError;
use crate::models::LocationQuery;
use crate::report::AirQualityReport;
use crate::validation::{Field, capitalize_words, validate_field};
use crate::web::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/air-quality", get(get_air_quality))
        .route("/validate", get(get_validation))
}

#[derive(Serialize)]
pub struct ApiError {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<Field, Vec<String>>,
}

impl AirWatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            AirWatchError::Validation { .. } => StatusCode::BAD_REQUEST,
            AirWatchError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
            AirWatchError::Http { .. } | AirWatchError::InvalidResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AirWatchError::Network { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AirWatchError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AirWatchError::Validation { .. } => "validation",
            AirWatchError::LocationNotFound { .. } => "location_not_found",
            AirWatchError::Http { .. } => "upstream_status",
            AirWatchError::InvalidResponse { .. } => "invalid_response",
            AirWatchError::Network { .. } => "network",
            AirWatchError::Config { .. } => "config",
        }
    }
}

impl IntoResponse for AirWatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("API request failed: {}", self);
        } else {
            warn!("API request rejected: {}", self);
        }

        let body = ApiError {
            error: self.kind(),
            message: self.user_message(),
            fields: match self {
                AirWatchError::Validation { errors } => errors,
                _ => BTreeMap::new(),
            },
        };
        (status, Json(body)).into_response()
    }
}

async fn get_air_quality(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<AirQualityReport>, AirWatchError> {
    let report = state.lookup.lookup(&query).await?;
    Ok(Json(report))
}

#[derive(Deserialize)]
pub struct ValidationParams {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub field: Field,
    pub valid: bool,
    pub errors: Vec<String>,
    /// Tidied value the page writes back into the input on blur
    pub value: String,
}

async fn get_validation(
    Query(params): Query<ValidationParams>,
) -> Result<Json<ValidationResult>, (StatusCode, String)> {
    let field: Field = params
        .field
        .parse()
        .map_err(|e: String| (StatusCode::BAD_REQUEST, e))?;
    let errors = validate_field(field, &params.value);

    Ok(Json(ValidationResult {
        field,
        valid: errors.is_empty(),
        errors,
        value: capitalize_words(&params.value),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::REQUIRED_MESSAGE;

    async fn validate(field: &str, value: &str) -> Result<ValidationResult, StatusCode> {
        get_validation(Query(ValidationParams {
            field: field.to_string(),
            value: value.to_string(),
        }))
        .await
        .map(|Json(result)| result)
        .map_err(|(status, _)| status)
    }

    #[tokio::test]
    async fn test_validation_returns_tidied_value() {
        let result = validate("city", "  são  paulo ").await.unwrap();
        assert!(result.valid);
        assert_eq!(result.value, "São  Paulo");

        let result = validate("state", "SP").await.unwrap();
        assert_eq!(result.value, "SP");

        let result = validate("state", "   ").await.unwrap();
        assert_eq!(result.errors, vec![REQUIRED_MESSAGE.to_string()]);
        assert_eq!(result.value, "");

        assert_eq!(validate("zip", "12345").await.unwrap_err(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AirWatchError::validation(Field::City, "x"), StatusCode::BAD_REQUEST),
            (AirWatchError::location_not_found("Atlantis"), StatusCode::NOT_FOUND),
            (AirWatchError::http(500, "geocoding"), StatusCode::BAD_GATEWAY),
            (
                AirWatchError::invalid_response("air-quality", "missing current"),
                StatusCode::BAD_GATEWAY,
            ),
            (AirWatchError::network("refused"), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
