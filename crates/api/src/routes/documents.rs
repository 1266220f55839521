use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use mastercom_domain::document::{Document, DocumentUpload};

use crate::error::ApiError;
use crate::state::AppState;

use super::map_domain_error;

pub(crate) async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut case_id = None;
    let mut file_name = None;
    let mut content = None;
    let mut uploaded_by = String::new();
    let mut description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("invalid multipart payload".into()))?
    {
        let name = field.name().map(std::string::ToString::to_string);
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().map(std::string::ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::Validation("failed to read file content".into()))?;
                content = Some(bytes.to_vec());
            }
            Some("caseId") => {
                case_id = Some(field.text().await.map_err(|_| {
                    ApiError::Validation("invalid multipart payload".into())
                })?);
            }
            Some("uploadedBy") => {
                uploaded_by = field.text().await.map_err(|_| {
                    ApiError::Validation("invalid multipart payload".into())
                })?;
            }
            Some("description") => {
                description = field.text().await.map_err(|_| {
                    ApiError::Validation("invalid multipart payload".into())
                })?;
            }
            _ => {}
        }
    }

    let content = content.ok_or_else(|| ApiError::Validation("file is required".into()))?;
    let case_id = case_id.ok_or_else(|| ApiError::Validation("caseId is required".into()))?;
    let file_name = file_name.ok_or_else(|| ApiError::Validation("file name is required".into()))?;

    let document = state
        .documents
        .upload(DocumentUpload {
            case_id,
            file_name,
            content,
            uploaded_by,
            description,
        })
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(document)).into_response())
}

pub(crate) async fn get_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let document = state
        .documents
        .get(&document_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(document))
}

/// Serves the stored bytes; metadata stays on the JSON endpoint.
pub(crate) async fn download_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Response, ApiError> {
    let document = state
        .documents
        .get(&document_id)
        .await
        .map_err(map_domain_error)?;
    let disposition = format!("attachment; filename=\"{}\"", document.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.content,
    )
        .into_response())
}

pub(crate) async fn list_case_documents(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state
        .documents
        .list_by_case(&case_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(documents))
}

pub(crate) async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .documents
        .delete(&document_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(json!({ "message": "Document deleted successfully" })))
}
