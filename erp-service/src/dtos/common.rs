use axum::extract::FromRequestParts;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// `Query` whose rejection renders the standard error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `Path` whose rejection renders the standard error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query parameters accepted by every list endpoint. Modules ignore the
/// filters that do not apply to them.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub status: Option<String>,
    pub bank_id: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub bank_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub report: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextNumberParams {
    /// `YYYY-MM-DD`; defaults to today.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: String,
}

/// Trimmed value, or `None` when blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_become_none() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" KBank ".to_string())), Some("KBank".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
