//! Per-request correlation for brief requests.
//!
//! Each HTTP request is tagged once, from the caller's `x-request-id` or a
//! fresh UUID v4. The same id is echoed on the response, and the brief itself
//! is built inside a `brief` span carrying it, so the section warnings emitted
//! by the orchestrator and the clients name the request they belong to.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

use crate::gateway::GatewayEvent;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Span for building the brief requested by `event`
    pub fn brief_span(&self, event: &GatewayEvent) -> Span {
        tracing::info_span!(
            "brief",
            request_id = %self.0,
            ticker = event.ticker_param().unwrap_or_default(),
        )
    }
}

/// Assign the id, record it on the HTTP span and echo it on the response.
pub async fn tag_request(mut request: Request, next: Next) -> Response {
    let id = RequestId::from_headers(request.headers());
    Span::current().record("request_id", id.as_str());

    let header = HeaderValue::from_str(id.as_str()).ok();
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;
    if let Some(header) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, header);
    }
    response
}
