use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Receipt, ReceiptItem};
use crate::services::rollup::{PeriodSummary, Report};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReceiptItemRequest {
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Explicit line total; computed from quantity × unit price when omitted or zero.
    pub total: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReceiptRequest {
    /// Manually assigned number; generated when omitted.
    #[validate(length(min = 1, max = 64))]
    pub receipt_no: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: String,
    pub customer_address: Option<String>,
    #[validate(length(max = 32))]
    pub customer_tax_id: Option<String>,
    /// `YYYY-MM-DD`; defaults to now.
    pub receipt_date: Option<String>,
    pub bank_account_id: Option<String>,
    pub payment_method: Option<String>,
    #[validate(nested)]
    pub items: Vec<ReceiptItemRequest>,
    #[serde(default)]
    pub discount: Decimal,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReceiptRequest {
    #[validate(length(min = 1, max = 255))]
    pub customer_name: Option<String>,
    pub customer_address: Option<String>,
    #[validate(length(max = 32))]
    pub customer_tax_id: Option<String>,
    pub receipt_date: Option<String>,
    pub bank_account_id: Option<String>,
    pub payment_method: Option<String>,
    #[validate(nested)]
    pub items: Option<Vec<ReceiptItemRequest>>,
    pub discount: Option<Decimal>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReceiptItemResponse {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl From<ReceiptItem> for ReceiptItemResponse {
    fn from(item: ReceiptItem) -> Self {
        Self {
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total: item.total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub receipt_id: String,
    pub receipt_no: String,
    pub customer_name: String,
    pub customer_address: Option<String>,
    pub customer_tax_id: Option<String>,
    pub receipt_date: String,
    pub bank_account_id: Option<String>,
    pub payment_method: Option<String>,
    pub items: Vec<ReceiptItemResponse>,
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
    pub created_at: String,
    pub updated_at: String,
}

impl From<Receipt> for ReceiptResponse {
    fn from(receipt: Receipt) -> Self {
        Self {
            receipt_id: receipt.receipt_id,
            receipt_no: receipt.receipt_no,
            customer_name: receipt.customer_name,
            customer_address: receipt.customer_address,
            customer_tax_id: receipt.customer_tax_id,
            receipt_date: receipt.receipt_date.to_rfc3339(),
            bank_account_id: receipt.bank_account_id,
            payment_method: receipt.payment_method,
            items: receipt.items.into_iter().map(Into::into).collect(),
            sub_total: receipt.sub_total,
            discount: receipt.discount,
            total_vat: receipt.total_vat,
            total_amount: receipt.total_amount,
            note: receipt.note,
            created_by: receipt.created_by,
            created_at: receipt.created_at.to_rfc3339(),
            updated_at: receipt.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NextNumberResponse {
    pub receipt_no: String,
}

/// Receipt bucket: amounts plus the VAT and discount inside them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReceiptBucket {
    pub count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_vat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_discount: Decimal,
}

impl ReceiptBucket {
    pub fn add(&mut self, receipt: &Receipt) {
        self.count += 1;
        self.total_amount += receipt.total_amount;
        self.total_vat += receipt.total_vat;
        self.total_discount += receipt.discount;
    }
}

pub type ReceiptSummaryResponse = PeriodSummary<ReceiptBucket>;
pub type ReceiptReportResponse = Report;
