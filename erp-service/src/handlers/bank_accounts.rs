use axum::extract::State;
use service_core::error::AppError;
use service_core::response::{ApiResponse, Paginated};

use crate::dtos::{
    ApiPath, ApiQuery, BankAccountResponse, CreateBankAccountRequest, DeletedResponse, ListParams,
    UpdateBankAccountRequest,
};
use crate::middleware::UserId;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

pub async fn create_bank_account(
    State(state): State<AppState>,
    user_id: UserId,
    ValidatedJson(req): ValidatedJson<CreateBankAccountRequest>,
) -> Result<ApiResponse<BankAccountResponse>, AppError> {
    let account = state.bank_accounts.create(req, user_id.0).await?;
    Ok(ApiResponse::created(account))
}

pub async fn list_bank_accounts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<ApiResponse<Paginated<BankAccountResponse>>, AppError> {
    Ok(ApiResponse::ok(state.bank_accounts.list(&params).await?))
}

pub async fn get_bank_account(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<BankAccountResponse>, AppError> {
    Ok(ApiResponse::ok(state.bank_accounts.get(&id).await?))
}

pub async fn update_bank_account(
    State(state): State<AppState>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<UpdateBankAccountRequest>,
) -> Result<ApiResponse<BankAccountResponse>, AppError> {
    Ok(ApiResponse::updated(state.bank_accounts.update(&id, req).await?))
}

pub async fn delete_bank_account(
    State(state): State<AppState>,
    _user_id: UserId,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    state.bank_accounts.delete(&id).await?;
    Ok(ApiResponse::deleted(DeletedResponse { id }))
}
