//! HTTP front door for ticker briefs.
//!
//! A brief combines market financials, a competitive profile and the latest
//! annual filing summary for one ticker. Requests arrive either as
//! gateway-style events on `POST /invoke` or as `GET /api/brief?ticker=`.

use anyhow::Context;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use brief_orchestrator::BriefOrchestrator;
use sec_client::SecClient;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use yahoo_client::YahooClient;

pub mod brief_routes;
pub mod config;
pub mod gateway;
pub mod request_id;

#[cfg(test)]
mod gateway_tests;

pub use config::ServerConfig;
pub use gateway::{dispatch, GatewayEvent, GatewayResponse};

const DEFAULT_LOG_FILTER: &str =
    "api_server=info,brief_orchestrator=info,yahoo_client=warn,sec_client=warn,tower_http=info";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: BriefOrchestrator,
}

impl AppState {
    pub fn new(orchestrator: BriefOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Wire the live Yahoo and SEC clients
    pub fn from_config(config: &ServerConfig) -> Self {
        let quotes = Arc::new(YahooClient::new(config.yahoo.clone()));
        let filings = Arc::new(SecClient::new(config.sec.clone()));
        Self::new(BriefOrchestrator::new(quotes, filings))
    }
}

/// Failure turning an envelope into an HTTP response
#[derive(Debug)]
pub enum AppError {
    InvalidEnvelope(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::InvalidEnvelope(msg) => msg,
        };
        tracing::error!("Invalid gateway envelope: {}", message);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response()
    }
}

impl TryFrom<GatewayResponse> for Response {
    type Error = AppError;

    fn try_from(envelope: GatewayResponse) -> Result<Self, Self::Error> {
        let status = StatusCode::from_u16(envelope.status_code)
            .map_err(|e| AppError::InvalidEnvelope(e.to_string()))?;

        let mut response = (status, envelope.body).into_response();
        for (name, value) in &envelope.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| AppError::InvalidEnvelope(e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::InvalidEnvelope(e.to_string()))?;
            response.headers_mut().insert(name, value);
        }

        Ok(response)
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(brief_routes::brief_routes())
        .route("/health", get(health))
        .layer(middleware::from_fn(request_id::tag_request))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// `LOG_FORMAT=json` selects JSON lines; `RUST_LOG` overrides the filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(
        "Listening on {} (provider timeout {}s)",
        config.bind_addr,
        config.timeout.as_secs()
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Run one dispatch against the live providers and print the body
pub async fn invoke_once(ticker: &str) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config);

    let response = dispatch(&state.orchestrator, &GatewayEvent::with_ticker(ticker)).await;
    tracing::info!("Local invocation finished with status {}", response.status_code);

    let body: serde_json::Value =
        serde_json::from_str(&response.body).context("response body is not JSON")?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
