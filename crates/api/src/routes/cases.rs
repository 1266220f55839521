use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use mastercom_domain::case::{Case, CaseDraft, CaseListQuery, CasePage, CaseUpdate};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation;

use super::map_domain_error;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaseRequest {
    #[validate(length(min = 1, max = 64))]
    pub case_type: String,
    #[validate(length(min = 8, max = 19))]
    pub primary_account_number: String,
    pub transaction_amount: f64,
    #[validate(length(equal = 3))]
    pub transaction_currency: String,
    #[validate(length(min = 10, max = 35))]
    pub transaction_date: String,
    #[validate(length(min = 1, max = 64))]
    pub transaction_id: String,
    pub merchant_name: Option<String>,
    pub merchant_category_code: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub reason_code: String,
    pub dispute_amount: Option<f64>,
    pub dispute_currency: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub filing_as: String,
    #[validate(length(min = 1, max = 16))]
    pub filing_ica: String,
    #[validate(length(min = 1, max = 16))]
    pub filed_against_ica: String,
    pub filed_by: Option<String>,
    pub filed_by_contact_name: Option<String>,
    pub filed_by_contact_phone: Option<String>,
    #[validate(email)]
    pub filed_by_contact_email: Option<String>,
    /// Honored on update only; creation always starts PENDING.
    #[serde(default)]
    pub status: Option<String>,
}

impl CaseRequest {
    fn into_parts(self) -> (CaseDraft, Option<String>) {
        let draft = CaseDraft {
            case_type: self.case_type,
            primary_account_number: self.primary_account_number,
            transaction_amount: self.transaction_amount,
            transaction_currency: self.transaction_currency,
            transaction_date: self.transaction_date,
            transaction_id: self.transaction_id,
            merchant_name: self.merchant_name,
            merchant_category_code: self.merchant_category_code,
            reason_code: self.reason_code,
            dispute_amount: self.dispute_amount,
            dispute_currency: self.dispute_currency,
            filing_as: self.filing_as,
            filing_ica: self.filing_ica,
            filed_against_ica: self.filed_against_ica,
            filed_by: self.filed_by,
            filed_by_contact_name: self.filed_by_contact_name,
            filed_by_contact_phone: self.filed_by_contact_phone,
            filed_by_contact_email: self.filed_by_contact_email,
        };
        (draft, self.status)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListCasesQuery {
    page: Option<i64>,
    limit: Option<i64>,
    status: Option<String>,
}

pub(crate) async fn create_case(
    State(state): State<AppState>,
    Json(payload): Json<CaseRequest>,
) -> Result<Response, ApiError> {
    validation::validate(&payload)?;
    let (draft, _) = payload.into_parts();
    let case = state.cases.create(draft).await.map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(case)).into_response())
}

pub(crate) async fn list_cases(
    State(state): State<AppState>,
    Query(query): Query<ListCasesQuery>,
) -> Result<Json<CasePage>, ApiError> {
    let defaults = CaseListQuery::default();
    let page = state
        .cases
        .list(CaseListQuery {
            page: query.page.unwrap_or(defaults.page),
            limit: query.limit.unwrap_or(defaults.limit),
            status: query.status,
        })
        .await
        .map_err(map_domain_error)?;
    Ok(Json(page))
}

pub(crate) async fn get_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Result<Json<Case>, ApiError> {
    let case = state.cases.get(&case_id).await.map_err(map_domain_error)?;
    Ok(Json(case))
}

pub(crate) async fn update_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(payload): Json<CaseRequest>,
) -> Result<Json<Case>, ApiError> {
    validation::validate(&payload)?;
    let (draft, status) = payload.into_parts();
    let case = state
        .cases
        .update(&case_id, CaseUpdate { draft, status })
        .await
        .map_err(map_domain_error)?;
    Ok(Json(case))
}

pub(crate) async fn delete_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .cases
        .delete(&case_id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(json!({ "message": "Case deleted successfully" })))
}
