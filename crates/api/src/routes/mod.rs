mod cases;
mod documents;
mod webhooks;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use mastercom_domain::error::DomainError;

use crate::error::ApiError;
use crate::middleware as app_middleware;
use crate::observability;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/cases", post(cases::create_case).get(cases::list_cases))
        .route(
            "/cases/:case_id",
            get(cases::get_case)
                .put(cases::update_case)
                .delete(cases::delete_case),
        )
        .route(
            "/cases/:case_id/documents",
            get(documents::list_case_documents),
        )
        .route("/documents", post(documents::upload_document))
        .route(
            "/documents/:document_id",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route(
            "/documents/:document_id/content",
            get(documents::download_document),
        )
        .route("/webhooks/ethoca", post(webhooks::receive_ethoca_webhook))
        .route("/webhooks/ethoca/health", get(webhooks::webhook_health))
        .route("/webhooks/ethoca/stats", get(webhooks::webhook_stats));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api/v6", api)
        .layer(axum::middleware::from_fn(app_middleware::metrics_layer))
        .layer(app_middleware::timeout_layer())
        .layer(app_middleware::trace_layer())
        // Propagation must sit inside the set layer so the generated id is
        // visible on the request when the response header is copied back.
        .layer(app_middleware::propagate_request_id_layer())
        .layer(app_middleware::set_request_id_layer())
        .layer(app_middleware::cors_layer())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    environment: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "mastercom-service",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.app_env.clone(),
    })
}

async fn metrics() -> String {
    observability::render_metrics().unwrap_or_default()
}

pub(crate) fn request_id_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(std::string::ToString::to_string)
        .ok_or_else(|| ApiError::Validation("missing request id".into()))
}

pub(crate) fn map_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation(message) => ApiError::Validation(message),
        DomainError::NotFound => ApiError::NotFound,
        DomainError::Conflict => ApiError::Conflict,
    }
}
