use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::air_quality::OpenMeteoAirQuality;
use crate::api;
use crate::classifier::Classifier;
use crate::config::AirWatchConfig;
use crate::form::{FormView, SubmitControl};
use crate::http::build_client;
use crate::location_resolver::NominatimResolver;
use crate::models::LocationQuery;
use crate::render::render_page;
use crate::submission::AirQualityLookup;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<AirQualityLookup>,
}

impl AppState {
    pub fn new(lookup: AirQualityLookup) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Wire the production upstreams from configuration
    pub fn from_config(config: &AirWatchConfig) -> Result<Self> {
        let client = build_client(config)?;
        let resolver = NominatimResolver::new(client.clone(), &config.geocoding.base_url);
        let source = OpenMeteoAirQuality::new(client, &config.air_quality.base_url);

        Ok(Self::new(AirQualityLookup::new(
            Arc::new(resolver),
            Arc::new(source),
            Arc::new(Classifier::default()),
            &config.defaults.country,
        )))
    }
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_page).post(submit_form))
        .route("/health", get(health))
        .nest("/api", api::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: AirWatchConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);

    axum::serve(listener, app(state))
        .await
        .context("Web server stopped unexpectedly")
}

async fn index_page(State(state): State<AppState>) -> Response {
    page(&FormView::new(state.lookup.default_country()))
}

async fn submit_form(
    State(state): State<AppState>,
    Form(query): Form<LocationQuery>,
) -> Response {
    let mut view = FormView::with_query(query);
    let control = SubmitControl::new();
    state.lookup.submit(&mut view, &control).await;
    page(&view)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

fn page(view: &FormView) -> Response {
    match render_page(view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}
