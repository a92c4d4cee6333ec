//! Error types and handling for the `AirWatch` application

use std::collections::BTreeMap;

use thiserror::Error;

use crate::validation::Field;

/// Message shown when the geocoder has no match for the query
pub const LOCATION_NOT_FOUND_MESSAGE: &str =
    "Localização não encontrada. Verifique os dados inseridos.";

/// Message shown for upstream failures (bad status or unreadable payload)
pub const API_ERROR_MESSAGE: &str = "Erro ao buscar dados. Tente novamente em alguns instantes.";

/// Message shown when an upstream could not be reached at all
pub const NETWORK_ERROR_MESSAGE: &str =
    "Erro de conexão. Verifique sua internet e tente novamente.";

/// Main error type for the `AirWatch` application
#[derive(Error, Debug)]
pub enum AirWatchError {
    /// Form input failed validation, keyed by field
    #[error("Invalid input: {}", describe_fields(.errors))]
    Validation { errors: BTreeMap<Field, Vec<String>> },

    /// Geocoding returned no match
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    /// Upstream answered with a non-success status
    #[error("HTTP error {status} from {endpoint}")]
    Http { status: u16, endpoint: String },

    /// Upstream answered but the payload could not be understood
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    /// The request never completed
    #[error("Network error: {message}")]
    Network { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

fn describe_fields(errors: &BTreeMap<Field, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field.as_str(), messages.join("; ")))
        .collect::<Vec<_>>()
        .join(", ")
}

impl AirWatchError {
    /// Create a validation error for a single field
    pub fn validation<S: Into<String>>(field: Field, message: S) -> Self {
        Self::Validation {
            errors: BTreeMap::from([(field, vec![message.into()])]),
        }
    }

    /// Create a new location-not-found error
    pub fn location_not_found<S: Into<String>>(query: S) -> Self {
        Self::LocationNotFound {
            query: query.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn http<S: Into<String>>(status: u16, endpoint: S) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
        }
    }

    /// Create a new invalid-response error
    pub fn invalid_response<E: Into<String>, M: Into<String>>(endpoint: E, message: M) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AirWatchError::Validation { errors } => errors
                .values()
                .flat_map(|messages| messages.first())
                .next()
                .cloned()
                .unwrap_or_else(|| "Dados inválidos".to_string()),
            AirWatchError::LocationNotFound { .. } => LOCATION_NOT_FOUND_MESSAGE.to_string(),
            AirWatchError::Http { .. } | AirWatchError::InvalidResponse { .. } => {
                API_ERROR_MESSAGE.to_string()
            }
            AirWatchError::Network { .. } => NETWORK_ERROR_MESSAGE.to_string(),
            AirWatchError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AirWatchError::location_not_found("Atlantis, XX, Nowhere");
        assert!(matches!(err, AirWatchError::LocationNotFound { .. }));

        let err = AirWatchError::http(500, "/search");
        assert!(matches!(err, AirWatchError::Http { status: 500, .. }));

        let err = AirWatchError::validation(Field::City, "Este campo é obrigatório");
        assert!(matches!(err, AirWatchError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            AirWatchError::location_not_found("x").user_message(),
            LOCATION_NOT_FOUND_MESSAGE
        );
        assert_eq!(AirWatchError::http(503, "/v1/air-quality").user_message(), API_ERROR_MESSAGE);
        assert_eq!(
            AirWatchError::invalid_response("/search", "expected value").user_message(),
            API_ERROR_MESSAGE
        );
        assert_eq!(AirWatchError::network("refused").user_message(), NETWORK_ERROR_MESSAGE);
        assert!(
            AirWatchError::config("bad port")
                .user_message()
                .contains("Configuration error")
        );
    }

    #[test]
    fn test_validation_user_message_is_first_error() {
        let err = AirWatchError::validation(Field::State, "Deve ter pelo menos 2 caracteres");
        assert_eq!(err.user_message(), "Deve ter pelo menos 2 caracteres");
        assert!(err.to_string().contains("state"));
    }
}
