//! Income and expense handlers. Both ledgers share these handlers; the
//! router hands each one its own [`CashEntryService`] as state.

use axum::extract::State;
use service_core::error::AppError;
use service_core::response::{ApiResponse, Paginated};

use crate::dtos::{
    ApiPath, ApiQuery, CashEntryResponse, CreateCashEntryRequest, DeletedResponse, ListParams,
    SummaryParams, UpdateCashEntryRequest,
};
use crate::middleware::UserId;
use crate::services::rollup::{PeriodSummary, Report};
use crate::services::CashEntryService;
use crate::utils::ValidatedJson;

pub async fn create_entry(
    State(service): State<CashEntryService>,
    user_id: UserId,
    ValidatedJson(req): ValidatedJson<CreateCashEntryRequest>,
) -> Result<ApiResponse<CashEntryResponse>, AppError> {
    Ok(ApiResponse::created(service.create(req, user_id.0).await?))
}

pub async fn list_entries(
    State(service): State<CashEntryService>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Paginated<CashEntryResponse>>, AppError> {
    Ok(ApiResponse::ok(service.list(&params).await?))
}

pub async fn entry_summary(
    State(service): State<CashEntryService>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<ApiResponse<PeriodSummary>, AppError> {
    Ok(ApiResponse::ok(service.summary(&params).await?))
}

pub async fn entry_report(
    State(service): State<CashEntryService>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<ApiResponse<Report>, AppError> {
    Ok(ApiResponse::ok(service.report(&params).await?))
}

pub async fn get_entry(
    State(service): State<CashEntryService>,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<CashEntryResponse>, AppError> {
    Ok(ApiResponse::ok(service.get(&id).await?))
}

pub async fn update_entry(
    State(service): State<CashEntryService>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<UpdateCashEntryRequest>,
) -> Result<ApiResponse<CashEntryResponse>, AppError> {
    Ok(ApiResponse::updated(service.update(&id, req).await?))
}

pub async fn delete_entry(
    State(service): State<CashEntryService>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    service.delete(&id).await?;
    Ok(ApiResponse::deleted(DeletedResponse { id }))
}
