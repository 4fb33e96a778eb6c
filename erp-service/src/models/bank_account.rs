use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use super::{new_id, Entity, Lifecycle};

/// Bank account that cash entries, receipts and payments can be booked against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub bank_account_id: String,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub account_type: Option<String>,
    pub branch: Option<String>,
    pub is_active: bool,
    pub created_by: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "deleted_at", default)]
    pub lifecycle: Lifecycle,
}

impl Entity for BankAccount {
    const ID_FIELD: &'static str = "bank_account_id";
}

impl BankAccount {
    pub const COLLECTION: &'static str = "bank_accounts";

    pub fn new(
        bank_name: String,
        account_name: String,
        account_number: String,
        account_type: Option<String>,
        branch: Option<String>,
        created_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            bank_account_id: new_id(),
            bank_name,
            account_name,
            account_number,
            account_type,
            branch,
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        }
    }
}
