//! Gateway-style request/response envelope and the top-level dispatcher.

use brief_core::{BriefError, TickerSymbol};
use brief_orchestrator::BriefOrchestrator;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument::WithSubscriber;
use tracing::Instrument;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Inbound event. Only the query string is read; anything else the gateway
/// sends is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl GatewayEvent {
    pub fn with_ticker(ticker: impl Into<String>) -> Self {
        let mut params = HashMap::new();
        params.insert("ticker".to_string(), ticker.into());
        Self {
            query_string_parameters: Some(params),
        }
    }

    pub fn ticker_param(&self) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get("ticker"))
            .map(String::as_str)
    }
}

/// Outbound envelope. `body` is already JSON-encoded text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl GatewayResponse {
    pub fn json<T: Serialize>(status_code: u16, payload: &T) -> Result<Self, BriefError> {
        let body = serde_json::to_string(payload)?;
        Ok(Self::with_body(status_code, body))
    }

    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        let body = serde_json::json!({ "error": message.into() }).to_string();
        Self::with_body(status_code, body)
    }

    fn with_body(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }
}

/// Validate the ticker, build the brief and wrap it in an envelope.
///
/// 400 for a missing ticker (no provider is contacted), 200 otherwise.
/// Provider failures stay inside their sections; a brief that panics or
/// cannot be encoded fails the whole request with a 500.
pub async fn dispatch(orchestrator: &BriefOrchestrator, event: &GatewayEvent) -> GatewayResponse {
    let ticker = match TickerSymbol::parse(event.ticker_param().unwrap_or_default()) {
        Ok(ticker) => ticker,
        Err(e) => {
            tracing::info!("Rejected request: {}", e);
            return GatewayResponse::error(400, e.to_string());
        }
    };

    let task = {
        let orchestrator = orchestrator.clone();
        let ticker = ticker.clone();
        tokio::spawn(
            async move { orchestrator.aggregate(&ticker).await }
                .instrument(tracing::Span::current())
                .with_current_subscriber(),
        )
    };

    let brief = match task.await {
        Ok(brief) => brief,
        Err(e) => {
            tracing::error!("Brief for {} aborted: {}", ticker, e);
            return GatewayResponse::error(500, format!("Failed to build brief: {}", e));
        }
    };

    match GatewayResponse::json(200, &brief) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Failed to encode brief for {}: {}", ticker, e);
            GatewayResponse::error(500, e.to_string())
        }
    }
}
