use crate::document::Document;
use crate::ports::BoxFuture;

use crate::DomainResult;

#[allow(clippy::needless_pass_by_value)]
pub trait DocumentRepository: Send + Sync {
    fn create(&self, document: &Document) -> BoxFuture<'_, DomainResult<Document>>;

    fn get(&self, document_id: &str) -> BoxFuture<'_, DomainResult<Option<Document>>>;

    fn list_by_case(&self, case_id: &str) -> BoxFuture<'_, DomainResult<Vec<Document>>>;

    fn delete(&self, document_id: &str) -> BoxFuture<'_, DomainResult<()>>;
}
