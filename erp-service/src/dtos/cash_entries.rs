use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{CashEntry, CashEntryKind};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCashEntryRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub amount: Decimal,
    /// `YYYY-MM-DD`; defaults to now.
    pub transaction_date: Option<String>,
    pub bank_account_id: Option<String>,
    #[validate(length(max = 64))]
    pub payment_method: Option<String>,
    #[validate(length(max = 128))]
    pub reference: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCashEntryRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub transaction_date: Option<String>,
    pub bank_account_id: Option<String>,
    #[validate(length(max = 64))]
    pub payment_method: Option<String>,
    #[validate(length(max = 128))]
    pub reference: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CashEntryResponse {
    pub entry_id: String,
    pub kind: CashEntryKind,
    pub title: String,
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub transaction_date: String,
    pub bank_account_id: Option<String>,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CashEntry> for CashEntryResponse {
    fn from(entry: CashEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            kind: entry.kind,
            title: entry.title,
            category: entry.category,
            amount: entry.amount,
            transaction_date: entry.transaction_date.to_rfc3339(),
            bank_account_id: entry.bank_account_id,
            payment_method: entry.payment_method,
            reference: entry.reference,
            note: entry.note,
            created_by: entry.created_by,
            created_at: entry.created_at.to_rfc3339(),
            updated_at: entry.updated_at.to_rfc3339(),
        }
    }
}
