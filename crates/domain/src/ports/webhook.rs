use crate::ports::BoxFuture;
use crate::webhook::AlertOutcome;

use crate::DomainResult;

/// Business-logic handler for one class of alert outcome. The processor
/// selects a route by outcome classification; implementations are expected
/// to be replaced with real fraud/dispute handling without touching the
/// processor's control flow.
#[allow(clippy::needless_pass_by_value)]
pub trait OutcomeRoute: Send + Sync {
    fn handle(&self, outcome: &AlertOutcome) -> BoxFuture<'_, DomainResult<()>>;
}
