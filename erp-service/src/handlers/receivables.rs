use axum::extract::State;
use service_core::error::AppError;
use service_core::response::{ApiResponse, Paginated};

use crate::dtos::{
    ApiPath, ApiQuery, CreateReceivableRequest, DeletedResponse, ListParams, ObligationSummary,
    ReceivableResponse, PaymentTransactionResponse, RecordPaymentRequest, RecordPaymentResponse,
    SummaryParams, UpdateReceivableRequest,
};
use crate::middleware::UserId;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn create_receivable(
    State(state): State<AppState>,
    user_id: UserId,
    ValidatedJson(req): ValidatedJson<CreateReceivableRequest>,
) -> Result<ApiResponse<ReceivableResponse>, AppError> {
    let receivable = state.receivables.create(req.into(), user_id.0).await?;
    Ok(ApiResponse::created(ReceivableResponse::new(
        receivable,
        state.receivables.today(),
    )))
}

pub async fn list_receivables(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Paginated<ReceivableResponse>>, AppError> {
    let today = state.receivables.today();
    let page = state.receivables.list(&params).await?;
    Ok(ApiResponse::ok(page.map(|p| ReceivableResponse::new(p, today))))
}

pub async fn receivable_summary(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SummaryParams>,
) -> Result<ApiResponse<ObligationSummary>, AppError> {
    Ok(ApiResponse::ok(state.receivables.summary(&params).await?))
}

pub async fn get_receivable(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<ReceivableResponse>, AppError> {
    let receivable = state.receivables.get(&id).await?;
    Ok(ApiResponse::ok(ReceivableResponse::new(
        receivable,
        state.receivables.today(),
    )))
}

pub async fn update_receivable(
    State(state): State<AppState>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<UpdateReceivableRequest>,
) -> Result<ApiResponse<ReceivableResponse>, AppError> {
    let receivable = state.receivables.update(&id, req.into()).await?;
    Ok(ApiResponse::updated(ReceivableResponse::new(
        receivable,
        state.receivables.today(),
    )))
}

pub async fn delete_receivable(
    State(state): State<AppState>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    state.receivables.delete(&id).await?;
    Ok(ApiResponse::deleted(DeletedResponse { id }))
}

pub async fn record_receivable_payment(
    State(state): State<AppState>,
    user_id: UserId,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<RecordPaymentRequest>,
) -> Result<ApiResponse<RecordPaymentResponse>, AppError> {
    let payment = state.receivables.record_payment(&id, req, user_id.0).await?;
    Ok(ApiResponse::created(payment))
}

pub async fn receivable_payments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<Vec<PaymentTransactionResponse>>, AppError> {
    let history = state.receivables.payments(&id).await?;
    Ok(ApiResponse::ok(history.into_iter().map(Into::into).collect()))
}
