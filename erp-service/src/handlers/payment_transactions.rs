use axum::extract::State;
use service_core::error::AppError;
use service_core::response::{ApiResponse, Paginated};

use crate::dtos::{ApiQuery, ListParams, PaymentTransactionResponse};
use crate::startup::AppState;

/// Payment log across payables and receivables, filterable by `type`.
pub async fn list_payment_transactions(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Paginated<PaymentTransactionResponse>>, AppError> {
    Ok(ApiResponse::ok(state.payments.list(&params).await?))
}
