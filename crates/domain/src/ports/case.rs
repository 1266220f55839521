use crate::case::Case;
use crate::ports::BoxFuture;

use crate::DomainResult;

#[allow(clippy::needless_pass_by_value)]
pub trait CaseRepository: Send + Sync {
    fn create(&self, case: &Case) -> BoxFuture<'_, DomainResult<Case>>;

    fn get(&self, case_id: &str) -> BoxFuture<'_, DomainResult<Option<Case>>>;

    /// All cases matching the status filter, in store order (unordered).
    fn list(&self, status: Option<&str>) -> BoxFuture<'_, DomainResult<Vec<Case>>>;

    fn update(&self, case: &Case) -> BoxFuture<'_, DomainResult<Case>>;

    fn delete(&self, case_id: &str) -> BoxFuture<'_, DomainResult<()>>;
}
