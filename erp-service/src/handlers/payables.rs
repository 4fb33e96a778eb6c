use axum::extract::State;
use service_core::error::AppError;
use service_core::response::{ApiResponse, Paginated};

use crate::dtos::{
    ApiPath, ApiQuery, CreatePayableRequest, DeletedResponse, ListParams, ObligationSummary,
    PayableResponse, PaymentTransactionResponse, RecordPaymentRequest, RecordPaymentResponse,
    SummaryParams, UpdatePayableRequest,
};
use crate::middleware::UserId;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn create_payable(
    State(state): State<AppState>,
    user_id: UserId,
    ValidatedJson(req): ValidatedJson<CreatePayableRequest>,
) -> Result<ApiResponse<PayableResponse>, AppError> {
    let payable = state.payables.create(req.into(), user_id.0).await?;
    Ok(ApiResponse::created(PayableResponse::new(
        payable,
        state.payables.today(),
    )))
}

pub async fn list_payables(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Paginated<PayableResponse>>, AppError> {
    let today = state.payables.today();
    let page = state.payables.list(&params).await?;
    Ok(ApiResponse::ok(page.map(|p| PayableResponse::new(p, today))))
}

pub async fn payable_summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<ApiResponse<ObligationSummary>, AppError> {
    Ok(ApiResponse::ok(state.payables.summary(&params).await?))
}

pub async fn get_payable(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<PayableResponse>, AppError> {
    let payable = state.payables.get(&id).await?;
    Ok(ApiResponse::ok(PayableResponse::new(
        payable,
        state.payables.today(),
    )))
}

pub async fn update_payable(
    State(state): State<AppState>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<UpdatePayableRequest>,
) -> Result<ApiResponse<PayableResponse>, AppError> {
    let payable = state.payables.update(&id, req.into()).await?;
    Ok(ApiResponse::updated(PayableResponse::new(
        payable,
        state.payables.today(),
    )))
}

pub async fn delete_payable(
    State(state): State<AppState>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    state.payables.delete(&id).await?;
    Ok(ApiResponse::deleted(DeletedResponse { id }))
}

pub async fn record_payable_payment(
    State(state): State<AppState>,
    user_id: UserId,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<RecordPaymentRequest>,
) -> Result<ApiResponse<RecordPaymentResponse>, AppError> {
    let payment = state.payables.record_payment(&id, req, user_id.0).await?;
    Ok(ApiResponse::created(payment))
}

pub async fn payable_payments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<Vec<PaymentTransactionResponse>>, AppError> {
    let history = state.payables.payments(&id).await?;
    Ok(ApiResponse::ok(history.into_iter().map(Into::into).collect()))
}
