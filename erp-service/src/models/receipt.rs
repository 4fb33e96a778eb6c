//! Receipt model.

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Entity, Lifecycle};

/// Line on a receipt. `total` is always populated on stored items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptItem {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Issued receipt with server-computed totals.
///
/// `sub_total`, `total_vat` and `total_amount` are derived from `items` and
/// `discount` and are rewritten together on every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub receipt_id: String,
    pub receipt_no: String,
    pub customer_name: String,
    pub customer_address: Option<String>,
    pub customer_tax_id: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub receipt_date: DateTime<Utc>,
    pub bank_account_id: Option<String>,
    pub payment_method: Option<String>,
    pub items: Vec<ReceiptItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub sub_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_vat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub note: Option<String>,
    pub created_by: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "deleted_at", default)]
    pub lifecycle: Lifecycle,
}

impl Entity for Receipt {
    const ID_FIELD: &'static str = "receipt_id";
}

impl Receipt {
    pub const COLLECTION: &'static str = "receipts";
    pub const NUMBER_FIELD: &'static str = "receipt_no";
}
