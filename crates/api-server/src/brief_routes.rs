use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use std::collections::HashMap;
use tracing::Instrument;

use crate::gateway::{dispatch, GatewayEvent, GatewayResponse};
use crate::request_id::RequestId;
use crate::{AppError, AppState};

pub fn brief_routes() -> Router<AppState> {
    Router::new()
        .route("/invoke", post(invoke))
        .route("/api/brief", get(get_brief))
}

/// Gateway emulation: takes an event, answers with the full envelope.
async fn invoke(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    Json(event): Json<GatewayEvent>,
) -> Json<GatewayResponse> {
    Json(traced_dispatch(&state, request_id, &event).await)
}

/// Plain HTTP: the envelope's status, headers and body become the response.
async fn get_brief(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<axum::response::Response, AppError> {
    let event = GatewayEvent {
        query_string_parameters: Some(params),
    };
    traced_dispatch(&state, request_id, &event).await.try_into()
}

/// Dispatch inside the request's `brief` span. Routes mounted without
/// `tag_request` get a fresh id.
async fn traced_dispatch(
    state: &AppState,
    request_id: Option<Extension<RequestId>>,
    event: &GatewayEvent,
) -> GatewayResponse {
    let request_id = request_id.map(|Extension(id)| id).unwrap_or_else(RequestId::generate);
    async {
        tracing::info!("Brief requested");
        let response = dispatch(&state.orchestrator, event).await;
        tracing::info!(status = response.status_code, "Brief answered");
        response
    }
    .instrument(request_id.brief_span(event))
    .await
}
