use std::sync::OnceLock;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use axum::http::StatusCode;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;

use mastercom_domain::util::{format_ms_rfc3339, now_ms};
use mastercom_domain::webhook::{OutcomeAcknowledgement, OutcomeStatus};

const HTTP_REQUESTS_TOTAL: &str = "mastercom_api_http_requests_total";
const HTTP_REQUEST_DURATION_SECONDS: &str = "mastercom_api_http_request_duration_seconds";
const HTTP_REQUEST_ERRORS_TOTAL: &str = "mastercom_api_http_errors_total";
const WEBHOOK_OUTCOMES_TOTAL: &str = "mastercom_api_webhook_outcomes_total";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub fn init_metrics() -> Result<()> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

pub fn register_http_request(method: &str, route: &str, status: StatusCode, elapsed: Duration) {
    let status_code = status.as_u16().to_string();
    let duration_seconds = elapsed.as_secs_f64();
    let result = if status.is_server_error() {
        "error"
    } else {
        "success"
    };

    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status_code.clone(),
        "result" => result
    )
    .increment(1);

    histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status_code
    )
    .record(duration_seconds);

    if status.is_server_error() {
        counter!(
            HTTP_REQUEST_ERRORS_TOTAL,
            "method" => method.to_string(),
            "route" => route.to_string(),
            "status" => status.as_u16().to_string()
        )
        .increment(1);
    }
}

fn register_webhook_outcome(status: &str) {
    counter!(
        WEBHOOK_OUTCOMES_TOTAL,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Running totals for the webhook stats endpoint. Relaxed ordering is
/// enough: the counters are monotonic and independently read.
#[derive(Default)]
pub struct WebhookStats {
    batches: AtomicU64,
    outcomes: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    last_processed_at_ms: AtomicI64,
}

impl WebhookStats {
    pub fn record(&self, acknowledgment: &OutcomeAcknowledgement) {
        let mut succeeded = 0u64;
        let mut failed = 0u64;
        for update in &acknowledgment.outcome_responses {
            match update.status {
                OutcomeStatus::Success => succeeded += 1,
                OutcomeStatus::Failure => failed += 1,
            }
            register_webhook_outcome(update.status.as_str());
        }

        self.batches.fetch_add(1, Ordering::Relaxed);
        self.outcomes.fetch_add(
            acknowledgment.outcome_responses.len() as u64,
            Ordering::Relaxed,
        );
        self.succeeded.fetch_add(succeeded, Ordering::Relaxed);
        self.failed.fetch_add(failed, Ordering::Relaxed);
        self.last_processed_at_ms.store(now_ms(), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> WebhookStatsSnapshot {
        let last_processed_at_ms = self.last_processed_at_ms.load(Ordering::Relaxed);
        WebhookStatsSnapshot {
            total_batches: self.batches.load(Ordering::Relaxed),
            total_outcomes: self.outcomes.load(Ordering::Relaxed),
            successful_outcomes: self.succeeded.load(Ordering::Relaxed),
            failed_outcomes: self.failed.load(Ordering::Relaxed),
            last_processed_at: (last_processed_at_ms > 0)
                .then(|| format_ms_rfc3339(last_processed_at_ms)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookStatsSnapshot {
    pub total_batches: u64,
    pub total_outcomes: u64,
    pub successful_outcomes: u64,
    pub failed_outcomes: u64,
    pub last_processed_at: Option<String>,
}
