use std::sync::Arc;

use mastercom_domain::case::CaseService;
use mastercom_domain::document::DocumentService;
use mastercom_domain::ports::case::CaseRepository;
use mastercom_domain::ports::document::DocumentRepository;
use mastercom_domain::webhook::{OutcomeRoutes, WebhookProcessor};
use mastercom_infra::config::AppConfig;
use mastercom_infra::repositories::{InMemoryCaseRepository, InMemoryDocumentRepository};

use crate::observability::WebhookStats;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub cases: CaseService,
    pub documents: DocumentService,
    pub webhook: WebhookProcessor,
    pub webhook_stats: Arc<WebhookStats>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_outcome_routes(config, OutcomeRoutes::logging())
    }

    pub fn with_outcome_routes(config: AppConfig, routes: OutcomeRoutes) -> Self {
        let case_repo: Arc<dyn CaseRepository> = Arc::new(InMemoryCaseRepository::new());
        let document_repo: Arc<dyn DocumentRepository> =
            Arc::new(InMemoryDocumentRepository::new());
        Self {
            config,
            cases: CaseService::new(case_repo),
            documents: DocumentService::new(document_repo),
            webhook: WebhookProcessor::new(routes),
            webhook_stats: Arc::new(WebhookStats::default()),
        }
    }
}
