use axum::extract::State;
use service_core::error::AppError;
use service_core::response::ApiResponse;

use crate::dtos::{ApiQuery, FinanceSummaryResponse, SummaryParams};
use crate::startup::AppState;

/// Income, expense and net per period, plus receipt and obligation rollups.
pub async fn finance_summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<ApiResponse<FinanceSummaryResponse>, AppError> {
    Ok(ApiResponse::ok(state.finance.summary(&params).await?))
}
