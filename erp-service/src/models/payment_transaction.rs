use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Entity, ObligationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Payable,
    Receivable,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Payable => "payable",
            PaymentKind::Receivable => "receivable",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One payment applied to a payable or receivable. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    /// Business id of the payable/receivable.
    pub parent_id: String,
    pub invoice_no: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance_before: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance_after: Decimal,
    pub status_after: ObligationStatus,
    pub payment_date: NaiveDate,
    pub bank_account_id: Option<String>,
    pub payment_method: Option<String>,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub created_by: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Entity for PaymentTransaction {
    const ID_FIELD: &'static str = "transaction_id";
    const SOFT_DELETE: bool = false;
}

impl PaymentTransaction {
    pub const COLLECTION: &'static str = "payment_transactions";
}
