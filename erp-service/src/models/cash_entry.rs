use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Entity, Lifecycle};

/// Incomes and expenses share one shape and live in separate collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashEntryKind {
    Income,
    Expense,
}

impl CashEntryKind {
    pub fn collection(&self) -> &'static str {
        match self {
            CashEntryKind::Income => "incomes",
            CashEntryKind::Expense => "expenses",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CashEntryKind::Income => "income",
            CashEntryKind::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CashEntryKind::Income => "Income",
            CashEntryKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for CashEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashEntry {
    pub entry_id: String,
    pub kind: CashEntryKind,
    pub title: String,
    pub category: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub transaction_date: DateTime<Utc>,
    pub bank_account_id: Option<String>,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub created_by: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "deleted_at", default)]
    pub lifecycle: Lifecycle,
}

impl Entity for CashEntry {
    const ID_FIELD: &'static str = "entry_id";
}
