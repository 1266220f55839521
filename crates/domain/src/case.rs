use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::error::DomainError;
use crate::ports::case::CaseRepository;
use crate::util::{now_ms, parse_rfc3339, uuid_v7_without_dashes};

pub const CASE_STATUS_PENDING: &str = "PENDING";

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const CURRENCY_CODE_LENGTH: usize = 3;

/// A filed dispute/chargeback record. Status is a free-form string owned by
/// the caller; the service only forces `PENDING` at creation and never
/// transitions it on its own.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    #[serde(rename = "id")]
    pub case_id: String,
    pub case_type: String,
    pub primary_account_number: String,
    pub transaction_amount: f64,
    pub transaction_currency: String,
    pub transaction_date: String,
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_category_code: Option<String>,
    pub reason_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispute_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispute_currency: Option<String>,
    pub filing_as: String,
    pub filing_ica: String,
    pub filed_against_ica: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filed_by_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filed_by_contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filed_by_contact_email: Option<String>,
    pub status: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Caller-supplied case fields, shared by create and update.
#[derive(Clone, Debug)]
pub struct CaseDraft {
    pub case_type: String,
    pub primary_account_number: String,
    pub transaction_amount: f64,
    pub transaction_currency: String,
    pub transaction_date: String,
    pub transaction_id: String,
    pub merchant_name: Option<String>,
    pub merchant_category_code: Option<String>,
    pub reason_code: String,
    pub dispute_amount: Option<f64>,
    pub dispute_currency: Option<String>,
    pub filing_as: String,
    pub filing_ica: String,
    pub filed_against_ica: String,
    pub filed_by: Option<String>,
    pub filed_by_contact_name: Option<String>,
    pub filed_by_contact_phone: Option<String>,
    pub filed_by_contact_email: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CaseUpdate {
    pub draft: CaseDraft,
    /// `None` keeps the stored status; transitions are caller-driven.
    pub status: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CaseListQuery {
    pub page: i64,
    pub limit: i64,
    pub status: Option<String>,
}

impl Default for CaseListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            status: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CasePage {
    pub cases: Vec<Case>,
    pub total: usize,
    pub page: i64,
    pub limit: i64,
}

#[derive(Clone)]
pub struct CaseService {
    repository: Arc<dyn CaseRepository>,
}

impl CaseService {
    pub fn new(repository: Arc<dyn CaseRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, draft: CaseDraft) -> DomainResult<Case> {
        let draft = validate_case_draft(draft)?;
        let now = now_ms();
        let case = Case {
            case_id: uuid_v7_without_dashes(),
            case_type: draft.case_type,
            primary_account_number: draft.primary_account_number,
            transaction_amount: draft.transaction_amount,
            transaction_currency: draft.transaction_currency,
            transaction_date: draft.transaction_date,
            transaction_id: draft.transaction_id,
            merchant_name: draft.merchant_name,
            merchant_category_code: draft.merchant_category_code,
            reason_code: draft.reason_code,
            dispute_amount: draft.dispute_amount,
            dispute_currency: draft.dispute_currency,
            filing_as: draft.filing_as,
            filing_ica: draft.filing_ica,
            filed_against_ica: draft.filed_against_ica,
            filed_by: draft.filed_by,
            filed_by_contact_name: draft.filed_by_contact_name,
            filed_by_contact_phone: draft.filed_by_contact_phone,
            filed_by_contact_email: draft.filed_by_contact_email,
            status: CASE_STATUS_PENDING.to_string(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        let case = self.repository.create(&case).await?;
        tracing::info!(case_id = %case.case_id, case_type = %case.case_type, "case created");
        Ok(case)
    }

    pub async fn get(&self, case_id: &str) -> DomainResult<Case> {
        self.repository
            .get(case_id)
            .await?
            .ok_or(DomainError::NotFound)
    }

    pub async fn list(&self, query: CaseListQuery) -> DomainResult<CasePage> {
        let status = query
            .status
            .as_deref()
            .map(str::trim)
            .filter(|status| !status.is_empty());
        let mut cases = self.repository.list(status).await?;
        cases.sort_by(|left, right| {
            right
                .created_at_ms
                .cmp(&left.created_at_ms)
                .then_with(|| right.case_id.cmp(&left.case_id))
        });
        Ok(paginate(cases, query.page, query.limit))
    }

    pub async fn update(&self, case_id: &str, update: CaseUpdate) -> DomainResult<Case> {
        let draft = validate_case_draft(update.draft)?;
        let existing = self.get(case_id).await?;
        let status = match update.status {
            Some(status) if !status.trim().is_empty() => status.trim().to_string(),
            _ => existing.status,
        };
        let case = Case {
            case_id: existing.case_id,
            case_type: draft.case_type,
            primary_account_number: draft.primary_account_number,
            transaction_amount: draft.transaction_amount,
            transaction_currency: draft.transaction_currency,
            transaction_date: draft.transaction_date,
            transaction_id: draft.transaction_id,
            merchant_name: draft.merchant_name,
            merchant_category_code: draft.merchant_category_code,
            reason_code: draft.reason_code,
            dispute_amount: draft.dispute_amount,
            dispute_currency: draft.dispute_currency,
            filing_as: draft.filing_as,
            filing_ica: draft.filing_ica,
            filed_against_ica: draft.filed_against_ica,
            filed_by: draft.filed_by,
            filed_by_contact_name: draft.filed_by_contact_name,
            filed_by_contact_phone: draft.filed_by_contact_phone,
            filed_by_contact_email: draft.filed_by_contact_email,
            status,
            created_at_ms: existing.created_at_ms,
            updated_at_ms: now_ms(),
        };
        let case = self.repository.update(&case).await?;
        tracing::info!(case_id = %case.case_id, status = %case.status, "case updated");
        Ok(case)
    }

    pub async fn delete(&self, case_id: &str) -> DomainResult<()> {
        self.repository.delete(case_id).await?;
        tracing::info!(case_id, "case deleted");
        Ok(())
    }
}

/// Page arithmetic with explicit clamping: `page <= 0` behaves as page 1,
/// `limit <= 0` yields an empty page, and a start past the end yields an
/// empty page with the true total rather than an error.
fn paginate(cases: Vec<Case>, page: i64, limit: i64) -> CasePage {
    let total = cases.len();
    let page = page.max(DEFAULT_PAGE);
    if limit <= 0 {
        return CasePage {
            cases: Vec::new(),
            total,
            page,
            limit,
        };
    }
    let start = ((page - 1) as usize).saturating_mul(limit as usize);
    if start >= total {
        return CasePage {
            cases: Vec::new(),
            total,
            page,
            limit,
        };
    }
    let cases = cases
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();
    CasePage {
        cases,
        total,
        page,
        limit,
    }
}

fn validate_case_draft(mut draft: CaseDraft) -> Result<CaseDraft, DomainError> {
    let case_type = required(&draft.case_type, "caseType")?;
    let primary_account_number = required(&draft.primary_account_number, "primaryAccountNumber")?;
    let transaction_currency = currency(&draft.transaction_currency, "transactionCurrency")?;
    let transaction_id = required(&draft.transaction_id, "transactionId")?;
    let reason_code = required(&draft.reason_code, "reasonCode")?;
    let filing_as = required(&draft.filing_as, "filingAs")?;
    let filing_ica = required(&draft.filing_ica, "filingIca")?;
    let filed_against_ica = required(&draft.filed_against_ica, "filedAgainstIca")?;

    if draft.transaction_amount <= 0.0 {
        return Err(DomainError::Validation(
            "transactionAmount must be greater than 0".into(),
        ));
    }

    let transaction_date = draft.transaction_date.trim().to_string();
    if parse_rfc3339(&transaction_date).is_none() {
        return Err(DomainError::Validation(
            "transactionDate must be an RFC3339 timestamp".into(),
        ));
    }

    let dispute_currency = match draft.dispute_currency.take() {
        Some(value) if !value.trim().is_empty() => Some(currency(&value, "disputeCurrency")?),
        _ => None,
    };

    Ok(CaseDraft {
        case_type,
        primary_account_number,
        transaction_currency,
        transaction_date,
        transaction_id,
        reason_code,
        filing_as,
        filing_ica,
        filed_against_ica,
        dispute_currency,
        ..draft
    })
}

fn required(value: &str, field: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn currency(value: &str, field: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.len() != CURRENCY_CODE_LENGTH {
        return Err(DomainError::Validation(format!(
            "{field} must be a 3-letter currency code"
        )));
    }
    Ok(value.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case_with(case_id: &str, created_at_ms: i64) -> Case {
        Case {
            case_id: case_id.to_string(),
            case_type: "FRAUD".to_string(),
            primary_account_number: "5555555555554444".to_string(),
            transaction_amount: 125.50,
            transaction_currency: "USD".to_string(),
            transaction_date: "2025-01-15T10:30:00Z".to_string(),
            transaction_id: "txn-1".to_string(),
            merchant_name: None,
            merchant_category_code: None,
            reason_code: "4837".to_string(),
            dispute_amount: None,
            dispute_currency: None,
            filing_as: "ISSUER".to_string(),
            filing_ica: "1234".to_string(),
            filed_against_ica: "5678".to_string(),
            filed_by: None,
            filed_by_contact_name: None,
            filed_by_contact_phone: None,
            filed_by_contact_email: None,
            status: CASE_STATUS_PENDING.to_string(),
            created_at_ms,
            updated_at_ms: created_at_ms,
        }
    }

    fn draft() -> CaseDraft {
        CaseDraft {
            case_type: "FRAUD".to_string(),
            primary_account_number: "5555555555554444".to_string(),
            transaction_amount: 125.50,
            transaction_currency: "usd".to_string(),
            transaction_date: "2025-01-15T10:30:00Z".to_string(),
            transaction_id: "txn-1".to_string(),
            merchant_name: Some("ACME".to_string()),
            merchant_category_code: Some("5999".to_string()),
            reason_code: "4837".to_string(),
            dispute_amount: Some(125.50),
            dispute_currency: Some("usd".to_string()),
            filing_as: "ISSUER".to_string(),
            filing_ica: "1234".to_string(),
            filed_against_ica: "5678".to_string(),
            filed_by: None,
            filed_by_contact_name: None,
            filed_by_contact_phone: None,
            filed_by_contact_email: None,
        }
    }

    #[test]
    fn draft_currency_codes_are_normalized_to_uppercase() {
        let validated = validate_case_draft(draft()).expect("draft");
        assert_eq!(validated.transaction_currency, "USD");
        assert_eq!(validated.dispute_currency.as_deref(), Some("USD"));
    }

    #[test]
    fn draft_rejects_blank_required_fields() {
        let mut input = draft();
        input.primary_account_number = "  ".to_string();
        let err = validate_case_draft(input).expect_err("error");
        assert!(
            matches!(err, DomainError::Validation(message) if message.contains("primaryAccountNumber"))
        );
    }

    #[test]
    fn draft_rejects_non_positive_amount() {
        let mut input = draft();
        input.transaction_amount = 0.0;
        assert!(validate_case_draft(input).is_err());
    }

    #[test]
    fn draft_rejects_malformed_transaction_date() {
        let mut input = draft();
        input.transaction_date = "15/01/2025".to_string();
        let err = validate_case_draft(input).expect_err("error");
        assert!(matches!(err, DomainError::Validation(message) if message.contains("RFC3339")));
    }

    #[test]
    fn paginate_returns_min_of_limit_and_remainder() {
        let cases: Vec<Case> = (0..5).map(|i| case_with(&format!("case-{i}"), i)).collect();
        let page = paginate(cases.clone(), 1, 2);
        assert_eq!(page.cases.len(), 2);
        assert_eq!(page.total, 5);

        let page = paginate(cases.clone(), 3, 2);
        assert_eq!(page.cases.len(), 1);
        assert_eq!(page.total, 5);

        let page = paginate(cases, 4, 2);
        assert!(page.cases.is_empty());
        assert_eq!(page.total, 5);
    }

    #[test]
    fn paginate_clamps_non_positive_page_and_limit() {
        let cases: Vec<Case> = (0..3).map(|i| case_with(&format!("case-{i}"), i)).collect();

        let page = paginate(cases.clone(), 0, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.cases.len(), 2);

        let page = paginate(cases.clone(), -3, 2);
        assert_eq!(page.page, 1);

        let page = paginate(cases, 1, 0);
        assert!(page.cases.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn case_wire_format_uses_camel_case_and_skips_absent_optionals() {
        let case = case_with("case-1", 42);
        let value = serde_json::to_value(&case).expect("json");
        assert_eq!(value["id"], "case-1");
        assert_eq!(value["primaryAccountNumber"], "5555555555554444");
        assert_eq!(value["createdAtMs"], 42);
        assert!(value.get("merchantName").is_none());
    }
}
