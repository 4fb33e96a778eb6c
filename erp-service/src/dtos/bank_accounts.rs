use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::BankAccount;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBankAccountRequest {
    #[validate(length(min = 1, max = 255))]
    pub bank_name: String,
    #[validate(length(min = 1, max = 255))]
    pub account_name: String,
    #[validate(length(min = 1, max = 64))]
    pub account_number: String,
    pub account_type: Option<String>,
    pub branch: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBankAccountRequest {
    #[validate(length(min = 1, max = 255))]
    pub bank_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub account_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub branch: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct BankAccountResponse {
    pub bank_account_id: String,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub account_type: Option<String>,
    pub branch: Option<String>,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BankAccount> for BankAccountResponse {
    fn from(account: BankAccount) -> Self {
        Self {
            bank_account_id: account.bank_account_id,
            bank_name: account.bank_name,
            account_name: account.account_name,
            account_number: account.account_number,
            account_type: account.account_type,
            branch: account.branch,
            is_active: account.is_active,
            created_by: account.created_by,
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
        }
    }
}
