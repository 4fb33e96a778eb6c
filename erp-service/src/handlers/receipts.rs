use axum::extract::State;
use service_core::error::AppError;
use service_core::response::{ApiResponse, Paginated};

use crate::dtos::{
    ApiPath, ApiQuery, CreateReceiptRequest, DeletedResponse, ListParams, NextNumberParams,
    NextNumberResponse, ReceiptReportResponse, ReceiptResponse, ReceiptSummaryResponse,
    SummaryParams, UpdateReceiptRequest,
};
use crate::middleware::UserId;
use crate::startup::AppState;
use crate::utils::dates::parse_optional_date;
use crate::utils::ValidatedJson;

pub async fn create_receipt(
    State(state): State<AppState>,
    user_id: UserId,
    ValidatedJson(req): ValidatedJson<CreateReceiptRequest>,
) -> Result<ApiResponse<ReceiptResponse>, AppError> {
    let receipt = state.receipts.create(req, user_id.0).await?;
    Ok(ApiResponse::created(receipt))
}

pub async fn list_receipts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Paginated<ReceiptResponse>>, AppError> {
    Ok(ApiResponse::ok(state.receipts.list(&params).await?))
}

pub async fn next_receipt_number(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<NextNumberParams>,
) -> Result<ApiResponse<NextNumberResponse>, AppError> {
    let date = parse_optional_date("date", params.date.as_deref())?;
    let receipt_no = state.receipts.next_number(date).await?;
    Ok(ApiResponse::ok(NextNumberResponse { receipt_no }))
}

pub async fn receipt_summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<ApiResponse<ReceiptSummaryResponse>, AppError> {
    Ok(ApiResponse::ok(state.receipts.summary(&params).await?))
}

pub async fn receipt_report(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<ApiResponse<ReceiptReportResponse>, AppError> {
    Ok(ApiResponse::ok(state.receipts.report(&params).await?))
}

pub async fn get_receipt(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<ReceiptResponse>, AppError> {
    Ok(ApiResponse::ok(state.receipts.get(&id).await?))
}

pub async fn update_receipt(
    State(state): State<AppState>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<UpdateReceiptRequest>,
) -> Result<ApiResponse<ReceiptResponse>, AppError> {
    Ok(ApiResponse::updated(state.receipts.update(&id, req).await?))
}

pub async fn delete_receipt(
    State(state): State<AppState>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    state.receipts.delete(&id).await?;
    Ok(ApiResponse::deleted(DeletedResponse { id }))
}
