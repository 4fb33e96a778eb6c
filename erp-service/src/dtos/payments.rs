use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ObligationStatus, PaymentKind, PaymentTransaction};

#[derive(Debug, Serialize)]
pub struct PaymentTransactionResponse {
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
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
    pub created_at: String,
}

impl From<PaymentTransaction> for PaymentTransactionResponse {
    fn from(tx: PaymentTransaction) -> Self {
        Self {
            transaction_id: tx.transaction_id,
            kind: tx.kind,
            parent_id: tx.parent_id,
            invoice_no: tx.invoice_no,
            amount: tx.amount,
            balance_before: tx.balance_before,
            balance_after: tx.balance_after,
            status_after: tx.status_after,
            payment_date: tx.payment_date,
            bank_account_id: tx.bank_account_id,
            payment_method: tx.payment_method,
            reference: tx.reference,
            note: tx.note,
            created_by: tx.created_by,
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// Result of recording a payment: the logged transaction and the parent's
/// new balance.
#[derive(Debug, Serialize)]
pub struct RecordPaymentResponse {
    pub transaction: PaymentTransactionResponse,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub status: ObligationStatus,
}
