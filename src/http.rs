//! Shared HTTP client for the upstream APIs

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::AirWatchError;
use crate::config::{AirWatchConfig, HttpConfig};

/// Build the client used for both upstreams.
///
/// Retrying is only wired in when `http.max_retries` is non-zero.
pub fn build_client(config: &AirWatchConfig) -> Result<ClientWithMiddleware> {
    build_client_with(&config.http, &config.geocoding.user_agent)
}

pub fn build_client_with(http: &HttpConfig, user_agent: &str) -> Result<ClientWithMiddleware> {
    let mut builder = Client::builder().user_agent(user_agent);
    if let Some(timeout) = http.timeout() {
        builder = builder.timeout(timeout);
    }
    let client = builder
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let mut builder = ClientBuilder::new(client);
    if http.max_retries > 0 {
        let policy = ExponentialBackoff::builder().build_with_max_retries(http.max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }
    Ok(builder.build())
}

/// GET `url` and decode a JSON body.
///
/// Transport failures become `Network`, non-2xx statuses become `Http` and
/// undecodable bodies become `InvalidResponse`.
pub async fn get_json<T: DeserializeOwned>(
    client: &ClientWithMiddleware,
    endpoint: &str,
    url: &str,
) -> Result<T, AirWatchError> {
    debug!("GET {}", url);

    let response = client.get(url).send().await.map_err(|e| {
        warn!("Request to {} failed: {}", endpoint, e);
        AirWatchError::network(format!("{endpoint}: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        warn!(
            "{} answered {} - {}",
            endpoint,
            status,
            status.canonical_reason().unwrap_or("Unknown error")
        );
        return Err(AirWatchError::http(status.as_u16(), endpoint));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| AirWatchError::network(format!("{endpoint}: {e}")))?;

    serde_json::from_slice(&body)
        .map_err(|e| AirWatchError::invalid_response(endpoint, e.to_string()))
}
