use mastercom_domain::DomainResult;
use mastercom_domain::case::Case;
use mastercom_domain::document::Document;
use mastercom_domain::ports::BoxFuture;
use mastercom_domain::ports::case::CaseRepository;
use mastercom_domain::ports::document::DocumentRepository;

use crate::store::KeyedStore;

#[derive(Clone, Default)]
pub struct InMemoryCaseRepository {
    store: KeyedStore<Case>,
}

impl InMemoryCaseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaseRepository for InMemoryCaseRepository {
    fn create(&self, case: &Case) -> BoxFuture<'_, DomainResult<Case>> {
        let case = case.clone();
        Box::pin(async move {
            let case_id = case.case_id.clone();
            self.store.create(&case_id, case).await
        })
    }

    fn get(&self, case_id: &str) -> BoxFuture<'_, DomainResult<Option<Case>>> {
        let case_id = case_id.to_string();
        Box::pin(async move { Ok(self.store.get(&case_id).await) })
    }

    fn list(&self, status: Option<&str>) -> BoxFuture<'_, DomainResult<Vec<Case>>> {
        let status = status.map(str::to_string);
        Box::pin(async move {
            let cases = self
                .store
                .list(|case| status.as_deref().map_or(true, |status| case.status == status))
                .await;
            Ok(cases)
        })
    }

    fn update(&self, case: &Case) -> BoxFuture<'_, DomainResult<Case>> {
        let case = case.clone();
        Box::pin(async move {
            let case_id = case.case_id.clone();
            self.store.update(&case_id, case).await
        })
    }

    fn delete(&self, case_id: &str) -> BoxFuture<'_, DomainResult<()>> {
        let case_id = case_id.to_string();
        Box::pin(async move { self.store.delete(&case_id).await })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryDocumentRepository {
    store: KeyedStore<Document>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn create(&self, document: &Document) -> BoxFuture<'_, DomainResult<Document>> {
        let document = document.clone();
        Box::pin(async move {
            let document_id = document.document_id.clone();
            self.store.create(&document_id, document).await
        })
    }

    fn get(&self, document_id: &str) -> BoxFuture<'_, DomainResult<Option<Document>>> {
        let document_id = document_id.to_string();
        Box::pin(async move { Ok(self.store.get(&document_id).await) })
    }

    fn list_by_case(&self, case_id: &str) -> BoxFuture<'_, DomainResult<Vec<Document>>> {
        let case_id = case_id.to_string();
        Box::pin(async move {
            let documents = self
                .store
                .list(|document| document.case_id == case_id)
                .await;
            Ok(documents)
        })
    }

    fn delete(&self, document_id: &str) -> BoxFuture<'_, DomainResult<()>> {
        let document_id = document_id.to_string();
        Box::pin(async move { self.store.delete(&document_id).await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mastercom_domain::case::{
        CASE_STATUS_PENDING, CaseDraft, CaseListQuery, CaseService, CaseUpdate,
    };
    use mastercom_domain::document::{DocumentService, DocumentUpload};
    use mastercom_domain::error::DomainError;

    use super::*;

    fn case_service() -> CaseService {
        CaseService::new(Arc::new(InMemoryCaseRepository::new()))
    }

    fn document_service() -> DocumentService {
        DocumentService::new(Arc::new(InMemoryDocumentRepository::new()))
    }

    fn draft(transaction_id: &str) -> CaseDraft {
        CaseDraft {
            case_type: "FRAUD".to_string(),
            primary_account_number: "5555555555554444".to_string(),
            transaction_amount: 125.50,
            transaction_currency: "USD".to_string(),
            transaction_date: "2025-01-15T10:30:00Z".to_string(),
            transaction_id: transaction_id.to_string(),
            merchant_name: Some("ACME Store".to_string()),
            merchant_category_code: Some("5999".to_string()),
            reason_code: "4837".to_string(),
            dispute_amount: Some(125.50),
            dispute_currency: Some("USD".to_string()),
            filing_as: "ISSUER".to_string(),
            filing_ica: "1234".to_string(),
            filed_against_ica: "5678".to_string(),
            filed_by: None,
            filed_by_contact_name: None,
            filed_by_contact_phone: None,
            filed_by_contact_email: None,
        }
    }

    fn upload(case_id: &str, file_name: &str, content: &[u8]) -> DocumentUpload {
        DocumentUpload {
            case_id: case_id.to_string(),
            file_name: file_name.to_string(),
            content: content.to_vec(),
            uploaded_by: "analyst".to_string(),
            description: "supporting evidence".to_string(),
        }
    }

    #[tokio::test]
    async fn created_cases_get_distinct_ids_and_pending_status() {
        let service = case_service();
        let first = service.create(draft("txn-1")).await.expect("create");
        let second = service.create(draft("txn-2")).await.expect("create");

        assert!(!first.case_id.is_empty());
        assert_ne!(first.case_id, second.case_id);
        assert_eq!(first.status, CASE_STATUS_PENDING);
        assert_eq!(first.created_at_ms, first.updated_at_ms);
    }

    #[tokio::test]
    async fn get_update_delete_fail_with_not_found_for_unknown_ids() {
        let service = case_service();
        assert!(matches!(
            service.get("missing").await,
            Err(DomainError::NotFound)
        ));
        assert!(matches!(
            service
                .update(
                    "missing",
                    CaseUpdate {
                        draft: draft("txn-1"),
                        status: None,
                    },
                )
                .await,
            Err(DomainError::NotFound)
        ));
        assert!(matches!(
            service.delete("missing").await,
            Err(DomainError::NotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_identifier_conflicts_at_the_repository() {
        let repository = InMemoryCaseRepository::new();
        let service = CaseService::new(Arc::new(repository.clone()));
        let case = service.create(draft("txn-1")).await.expect("create");

        let err = repository.create(&case).await.expect_err("duplicate");
        assert!(matches!(err, DomainError::Conflict));
    }

    #[tokio::test]
    async fn update_refreshes_timestamp_and_honors_caller_status() {
        let service = case_service();
        let case = service.create(draft("txn-1")).await.expect("create");

        let kept = service
            .update(
                &case.case_id,
                CaseUpdate {
                    draft: draft("txn-1"),
                    status: None,
                },
            )
            .await
            .expect("update");
        assert_eq!(kept.status, CASE_STATUS_PENDING);
        assert_eq!(kept.created_at_ms, case.created_at_ms);
        assert!(kept.updated_at_ms >= case.updated_at_ms);

        let resolved = service
            .update(
                &case.case_id,
                CaseUpdate {
                    draft: draft("txn-1"),
                    status: Some("RESOLVED".to_string()),
                },
            )
            .await
            .expect("update");
        assert_eq!(resolved.status, "RESOLVED");
        assert_eq!(resolved.case_id, case.case_id);
    }

    #[tokio::test]
    async fn list_filters_by_status_and_reports_the_filtered_total() {
        let service = case_service();
        let mut case_ids = Vec::new();
        for index in 0..5 {
            let case = service
                .create(draft(&format!("txn-{index}")))
                .await
                .expect("create");
            case_ids.push(case.case_id);
        }
        for case_id in case_ids.iter().take(2) {
            service
                .update(
                    case_id,
                    CaseUpdate {
                        draft: draft("txn-updated"),
                        status: Some("RESOLVED".to_string()),
                    },
                )
                .await
                .expect("update");
        }

        let all = service.list(CaseListQuery::default()).await.expect("list");
        assert_eq!(all.total, 5);
        assert_eq!(all.cases.len(), 5);

        let resolved = service
            .list(CaseListQuery {
                status: Some("RESOLVED".to_string()),
                ..CaseListQuery::default()
            })
            .await
            .expect("list");
        assert_eq!(resolved.total, 2);
        assert!(resolved.cases.iter().all(|case| case.status == "RESOLVED"));

        let pending = service
            .list(CaseListQuery {
                page: 2,
                limit: 2,
                status: Some(CASE_STATUS_PENDING.to_string()),
            })
            .await
            .expect("list");
        assert_eq!(pending.total, 3);
        assert_eq!(pending.cases.len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_pages_are_empty_with_the_true_total() {
        let service = case_service();
        for index in 0..3 {
            service
                .create(draft(&format!("txn-{index}")))
                .await
                .expect("create");
        }

        let page = service
            .list(CaseListQuery {
                page: 9,
                limit: 10,
                status: None,
            })
            .await
            .expect("list");
        assert!(page.cases.is_empty());
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn uploaded_documents_round_trip_content_and_metadata() {
        let service = document_service();
        let content = b"%PDF-1.7 fake receipt".to_vec();
        let document = service
            .upload(upload("case-1", "receipt.pdf", &content))
            .await
            .expect("upload");

        assert_eq!(document.file_size, content.len() as u64);
        assert_eq!(document.file_type, ".pdf");

        let fetched = service.get(&document.document_id).await.expect("get");
        assert_eq!(fetched.file_name, "receipt.pdf");
        assert_eq!(fetched.file_type, ".pdf");
        assert_eq!(fetched.file_size, content.len() as u64);
        assert_eq!(fetched.content, content);
    }

    #[tokio::test]
    async fn list_by_case_returns_only_that_case_and_empty_for_unknown_ids() {
        let service = document_service();
        service
            .upload(upload("case-1", "a.pdf", b"a"))
            .await
            .expect("upload");
        service
            .upload(upload("case-1", "b.jpg", b"b"))
            .await
            .expect("upload");
        service
            .upload(upload("case-2", "c.txt", b"c"))
            .await
            .expect("upload");

        let documents = service.list_by_case("case-1").await.expect("list");
        assert_eq!(documents.len(), 2);
        assert!(documents.iter().all(|document| document.case_id == "case-1"));

        let none = service.list_by_case("case-9").await.expect("list");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_case_does_not_cascade_to_its_documents() {
        let cases = case_service();
        let documents = document_service();

        let case = cases.create(draft("txn-1")).await.expect("create");
        let document = documents
            .upload(upload(&case.case_id, "evidence.pdf", b"bytes"))
            .await
            .expect("upload");

        cases.delete(&case.case_id).await.expect("delete");

        let still_there = documents.get(&document.document_id).await.expect("get");
        assert_eq!(still_there.case_id, case.case_id);
        assert_eq!(
            documents
                .list_by_case(&case.case_id)
                .await
                .expect("list")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn document_get_and_delete_fail_with_not_found_for_unknown_ids() {
        let service = document_service();
        assert!(matches!(
            service.get("missing").await,
            Err(DomainError::NotFound)
        ));
        assert!(matches!(
            service.delete("missing").await,
            Err(DomainError::NotFound)
        ));
    }
}
