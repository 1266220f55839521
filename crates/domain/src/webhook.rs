use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::DomainResult;
use crate::error::DomainError;
use crate::ports::BoxFuture;
use crate::ports::webhook::OutcomeRoute;

pub const OUTCOME_STOPPED: &str = "STOPPED";
pub const OUTCOME_PARTIALLY_STOPPED: &str = "PARTIALLY_STOPPED";
pub const OUTCOME_RESOLVED: &str = "RESOLVED";
pub const OUTCOME_RESOLVED_PREVIOUSLY_REFUNDED: &str = "RESOLVED_PREVIOUSLY_REFUNDED";
pub const REFUND_STATUS_REFUNDED: &str = "REFUNDED";

pub const REASON_CODE_VALIDATION: &str = "VALIDATION_ERROR";
pub const REASON_CODE_PROCESSING: &str = "PROCESSING_ERROR";
const ERROR_SOURCE_SERVICE: &str = "Service";

/// Inbound Ethoca webhook batch. Size bounds (1..=25) are a transport
/// concern; the processor itself tolerates any batch size.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
pub struct EthocaWebhook {
    #[serde(default)]
    #[validate(nested)]
    pub outcomes: Vec<AlertOutcome>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertOutcome {
    #[validate(length(equal = 25))]
    pub alert_id: String,
    #[validate(length(min = 5, max = 30))]
    pub outcome: String,
    #[validate(length(min = 8, max = 12))]
    pub refund_status: String,
    #[validate(nested)]
    pub refund: Refund,
    #[validate(nested)]
    pub amount_stopped: MoneyAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 1024))]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, max = 25))]
    pub action_timestamp: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    #[validate(nested)]
    pub amount: MoneyAmount,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, max = 9))]
    pub refund_type: Option<String>,
    #[validate(length(min = 10, max = 25))]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 24))]
    pub acquirer_reference_number: Option<String>,
}

/// Monetary value as carried on the wire. Values are deliberately not
/// bounds-checked here: zero amounts must reach the processor so the
/// per-item business invariants can fail them individually.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoneyAmount {
    pub value: f64,
    #[validate(length(equal = 3))]
    pub currency_code: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Success,
    Failure,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        }
    }
}

/// Structured per-item error in the Ethoca acknowledgment envelope. Field
/// names are PascalCase on the wire per the upstream contract.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OutcomeError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recoverable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl OutcomeError {
    pub fn validation(details: impl Into<String>) -> Self {
        Self {
            source: Some(ERROR_SOURCE_SERVICE.to_string()),
            reason_code: Some(REASON_CODE_VALIDATION.to_string()),
            description: Some("Outcome failed business validation".to_string()),
            recoverable: Some(false),
            details: Some(details.into()),
        }
    }

    pub fn processing(details: impl Into<String>) -> Self {
        Self {
            source: Some(ERROR_SOURCE_SERVICE.to_string()),
            reason_code: Some(REASON_CODE_PROCESSING.to_string()),
            description: Some("Failed to process outcome".to_string()),
            recoverable: Some(true),
            details: Some(details.into()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OutcomeErrors {
    #[serde(rename = "Error")]
    pub error: Vec<OutcomeError>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub alert_id: String,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<OutcomeErrors>,
}

impl StatusUpdate {
    fn success(alert_id: String) -> Self {
        Self {
            alert_id,
            status: OutcomeStatus::Success,
            errors: None,
        }
    }

    fn failure(alert_id: String, error: OutcomeError) -> Self {
        Self {
            alert_id,
            status: OutcomeStatus::Failure,
            errors: Some(OutcomeErrors { error: vec![error] }),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeAcknowledgement {
    pub outcome_responses: Vec<StatusUpdate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    Fraud,
    Dispute,
    Other,
}

impl RouteKind {
    pub fn classify(outcome: &str) -> Self {
        match outcome {
            OUTCOME_STOPPED | OUTCOME_PARTIALLY_STOPPED => Self::Fraud,
            OUTCOME_RESOLVED | OUTCOME_RESOLVED_PREVIOUSLY_REFUNDED => Self::Dispute,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fraud => "fraud",
            Self::Dispute => "dispute",
            Self::Other => "other",
        }
    }
}

/// Route registry keyed by outcome classification. Swapping a handler here
/// changes the business logic for that class without touching the
/// processor's control flow.
#[derive(Clone)]
pub struct OutcomeRoutes {
    pub fraud: Arc<dyn OutcomeRoute>,
    pub dispute: Arc<dyn OutcomeRoute>,
    pub other: Arc<dyn OutcomeRoute>,
}

impl OutcomeRoutes {
    /// Default registry: every route only logs and succeeds.
    pub fn logging() -> Self {
        Self {
            fraud: Arc::new(LogFraudRoute),
            dispute: Arc::new(LogDisputeRoute),
            other: Arc::new(LogOtherRoute),
        }
    }

    pub fn route(&self, kind: RouteKind) -> &Arc<dyn OutcomeRoute> {
        match kind {
            RouteKind::Fraud => &self.fraud,
            RouteKind::Dispute => &self.dispute,
            RouteKind::Other => &self.other,
        }
    }
}

pub struct LogFraudRoute;

impl OutcomeRoute for LogFraudRoute {
    fn handle(&self, outcome: &AlertOutcome) -> BoxFuture<'_, DomainResult<()>> {
        let outcome = outcome.clone();
        Box::pin(async move {
            tracing::info!(
                alert_id = %outcome.alert_id,
                outcome = %outcome.outcome,
                amount_stopped = outcome.amount_stopped.value,
                currency = %outcome.amount_stopped.currency_code,
                "processing fraud outcome"
            );
            Ok(())
        })
    }
}

pub struct LogDisputeRoute;

impl OutcomeRoute for LogDisputeRoute {
    fn handle(&self, outcome: &AlertOutcome) -> BoxFuture<'_, DomainResult<()>> {
        let outcome = outcome.clone();
        Box::pin(async move {
            tracing::info!(
                alert_id = %outcome.alert_id,
                outcome = %outcome.outcome,
                refund_amount = outcome.refund.amount.value,
                currency = %outcome.refund.amount.currency_code,
                "processing dispute outcome"
            );
            Ok(())
        })
    }
}

pub struct LogOtherRoute;

impl OutcomeRoute for LogOtherRoute {
    fn handle(&self, outcome: &AlertOutcome) -> BoxFuture<'_, DomainResult<()>> {
        let outcome = outcome.clone();
        Box::pin(async move {
            tracing::info!(
                alert_id = %outcome.alert_id,
                outcome = %outcome.outcome,
                "processing unclassified outcome"
            );
            Ok(())
        })
    }
}

/// Validates and routes each outcome of a batch independently, producing a
/// per-item acknowledgment in input order. The batch as a whole never
/// fails; callers must inspect per-item statuses. Holds no shared mutable
/// state, so concurrent batches need no coordination.
#[derive(Clone)]
pub struct WebhookProcessor {
    routes: OutcomeRoutes,
}

impl WebhookProcessor {
    pub fn new(routes: OutcomeRoutes) -> Self {
        Self { routes }
    }

    pub async fn process(&self, outcomes: &[AlertOutcome]) -> OutcomeAcknowledgement {
        tracing::info!(outcome_count = outcomes.len(), "processing webhook batch");

        let mut outcome_responses = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            outcome_responses.push(self.process_outcome(outcome).await);
        }

        tracing::info!(
            processed_count = outcome_responses.len(),
            "webhook batch processing completed"
        );
        OutcomeAcknowledgement { outcome_responses }
    }

    async fn process_outcome(&self, outcome: &AlertOutcome) -> StatusUpdate {
        if let Err(err) = validate_outcome(outcome) {
            let message = match err {
                DomainError::Validation(message) => message,
                other => other.to_string(),
            };
            tracing::warn!(
                alert_id = %outcome.alert_id,
                error = %message,
                "outcome validation failed"
            );
            return StatusUpdate::failure(
                outcome.alert_id.clone(),
                OutcomeError::validation(message),
            );
        }

        let kind = RouteKind::classify(&outcome.outcome);
        match self.routes.route(kind).handle(outcome).await {
            Ok(()) => StatusUpdate::success(outcome.alert_id.clone()),
            Err(err) => {
                tracing::error!(
                    alert_id = %outcome.alert_id,
                    route = kind.as_str(),
                    error = %err,
                    "outcome route failed"
                );
                StatusUpdate::failure(
                    outcome.alert_id.clone(),
                    OutcomeError::processing(err.to_string()),
                )
            }
        }
    }
}

/// Business invariants scoped to one outcome. Structural shape is enforced
/// by payload binding at the boundary.
pub fn validate_outcome(outcome: &AlertOutcome) -> DomainResult<()> {
    if outcome.refund_status == REFUND_STATUS_REFUNDED && outcome.refund.amount.value <= 0.0 {
        return Err(DomainError::Validation(
            "refund amount must be greater than 0 when refund status is REFUNDED".into(),
        ));
    }

    if outcome.outcome == OUTCOME_STOPPED && outcome.amount_stopped.value <= 0.0 {
        return Err(DomainError::Validation(
            "amount stopped must be greater than 0 when outcome is STOPPED".into(),
        ));
    }

    Ok(())
}
