use std::time::Instant;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use mastercom_domain::util::{format_ms_rfc3339, now_ms};
use mastercom_domain::webhook::EthocaWebhook;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation;

use super::request_id_from_headers;

/// Batch-level rejections carry the upstream protocol's machine-readable
/// codes rather than the generic api error envelope.
enum WebhookRejection {
    NoOutcomes,
    TooManyOutcomes { limit: usize },
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let (message, code) = match self {
            Self::NoOutcomes => (
                "No outcomes provided in webhook payload".to_string(),
                "NO_OUTCOMES",
            ),
            Self::TooManyOutcomes { limit } => (
                format!("Maximum of {limit} outcomes allowed per webhook"),
                "TOO_MANY_OUTCOMES",
            ),
        };
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": message, "code": code })),
        )
            .into_response()
    }
}

pub(crate) async fn receive_ethoca_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<EthocaWebhook>,
) -> Result<Response, ApiError> {
    let request_id = request_id_from_headers(&headers)?;

    if payload.outcomes.is_empty() {
        tracing::warn!(request_id = %request_id, "webhook payload contains no outcomes");
        return Ok(WebhookRejection::NoOutcomes.into_response());
    }
    let limit = state.config.webhook_batch_size;
    if payload.outcomes.len() > limit {
        tracing::warn!(
            request_id = %request_id,
            outcome_count = payload.outcomes.len(),
            "webhook payload exceeds batch limit"
        );
        return Ok(WebhookRejection::TooManyOutcomes { limit }.into_response());
    }
    validation::validate(&payload)?;

    let started = Instant::now();
    let acknowledgment = state.webhook.process(&payload.outcomes).await;
    state.webhook_stats.record(&acknowledgment);
    tracing::info!(
        request_id = %request_id,
        outcome_count = acknowledgment.outcome_responses.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "ethoca webhook processed"
    );

    Ok(Json(json!({
        "status": "SUCCESS",
        "outcomes": acknowledgment.outcome_responses,
        "requestId": request_id,
    }))
    .into_response())
}

pub(crate) async fn webhook_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "ethoca-webhook",
        "endpoint": state.config.webhook_endpoint,
        "timeoutSecs": state.config.webhook_timeout_secs,
        "maxRetries": state.config.webhook_max_retries,
        "batchSize": state.config.webhook_batch_size,
        "timestamp": format_ms_rfc3339(now_ms()),
    }))
}

pub(crate) async fn webhook_stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "stats": state.webhook_stats.snapshot(),
        "timestamp": format_ms_rfc3339(now_ms()),
    }))
}
