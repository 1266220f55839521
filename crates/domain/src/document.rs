use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::error::DomainError;
use crate::ports::document::DocumentRepository;
use crate::util::{now_ms, uuid_v7_without_dashes};

/// A file attached to a case. The case reference is soft: deleting a case
/// does not remove its documents, and uploads against unknown case ids are
/// accepted. Content is immutable after upload and never serialized; it is
/// served through a dedicated download path.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "id")]
    pub document_id: String,
    pub case_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub uploaded_by: String,
    pub uploaded_at_ms: i64,
    pub description: String,
}

#[derive(Clone, Debug)]
pub struct DocumentUpload {
    pub case_id: String,
    pub file_name: String,
    pub content: Vec<u8>,
    pub uploaded_by: String,
    pub description: String,
}

#[derive(Clone)]
pub struct DocumentService {
    repository: Arc<dyn DocumentRepository>,
}

impl DocumentService {
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self { repository }
    }

    pub async fn upload(&self, upload: DocumentUpload) -> DomainResult<Document> {
        let case_id = upload.case_id.trim().to_string();
        if case_id.is_empty() {
            return Err(DomainError::Validation("caseId is required".into()));
        }
        let file_name = upload.file_name.trim().to_string();
        if file_name.is_empty() {
            return Err(DomainError::Validation("fileName is required".into()));
        }

        let document = Document {
            document_id: uuid_v7_without_dashes(),
            case_id,
            file_type: file_extension(&file_name),
            file_size: upload.content.len() as u64,
            file_name,
            content: upload.content,
            uploaded_by: upload.uploaded_by,
            uploaded_at_ms: now_ms(),
            description: upload.description,
        };
        let document = self.repository.create(&document).await?;
        tracing::info!(
            document_id = %document.document_id,
            case_id = %document.case_id,
            file_size = document.file_size,
            "document uploaded"
        );
        Ok(document)
    }

    pub async fn get(&self, document_id: &str) -> DomainResult<Document> {
        self.repository
            .get(document_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    pub async fn list_by_case(&self, case_id: &str) -> DomainResult<Vec<Document>> {
        self.repository.list_by_case(case_id).await
    }

    pub async fn delete(&self, document_id: &str) -> DomainResult<()> {
        self.repository.delete(document_id).await?;
        tracing::info!(document_id, "document deleted");
        Ok(())
    }
}

/// Extension including the leading dot (".pdf"), or empty when the file
/// name has none.
fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_keeps_leading_dot() {
        assert_eq!(file_extension("evidence.pdf"), ".pdf");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("README"), "");
    }

    #[test]
    fn document_wire_format_omits_content() {
        let document = Document {
            document_id: "doc-1".to_string(),
            case_id: "case-1".to_string(),
            file_name: "evidence.pdf".to_string(),
            file_type: ".pdf".to_string(),
            file_size: 4,
            content: b"%PDF".to_vec(),
            uploaded_by: "analyst".to_string(),
            uploaded_at_ms: 42,
            description: "receipt".to_string(),
        };
        let value = serde_json::to_value(&document).expect("json");
        assert_eq!(value["id"], "doc-1");
        assert_eq!(value["fileSize"], 4);
        assert_eq!(value["fileType"], ".pdf");
        assert!(value.get("content").is_none());
    }
}
