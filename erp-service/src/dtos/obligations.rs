//! Payable and receivable DTOs. The two sides differ only in the name of
//! the counterparty field.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Obligation, Payable, Receivable};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePayableRequest {
    #[validate(length(min = 1, max = 64))]
    pub invoice_no: String,
    #[validate(length(min = 1, max = 255))]
    pub supplier_name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    /// `YYYY-MM-DD`; defaults to today.
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReceivableRequest {
    #[validate(length(min = 1, max = 64))]
    pub invoice_no: String,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePayableRequest {
    #[validate(length(min = 1, max = 64))]
    pub invoice_no: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub supplier_name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReceivableRequest {
    #[validate(length(min = 1, max = 64))]
    pub invoice_no: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub customer_name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
}

/// Raw create input shared by both sides, before date parsing and checks.
#[derive(Debug)]
pub struct ObligationInput {
    pub invoice_no: String,
    pub party_name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
}

/// Raw update input shared by both sides.
#[derive(Debug, Default)]
pub struct ObligationChanges {
    pub invoice_no: Option<String>,
    pub party_name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
}

impl From<CreatePayableRequest> for ObligationInput {
    fn from(req: CreatePayableRequest) -> Self {
        Self {
            invoice_no: req.invoice_no,
            party_name: req.supplier_name,
            description: req.description,
            amount: req.amount,
            issue_date: req.issue_date,
            due_date: req.due_date,
            bank_account_id: req.bank_account_id,
            note: req.note,
        }
    }
}

impl From<CreateReceivableRequest> for ObligationInput {
    fn from(req: CreateReceivableRequest) -> Self {
        Self {
            invoice_no: req.invoice_no,
            party_name: req.customer_name,
            description: req.description,
            amount: req.amount,
            issue_date: req.issue_date,
            due_date: req.due_date,
            bank_account_id: req.bank_account_id,
            note: req.note,
        }
    }
}

impl From<UpdatePayableRequest> for ObligationChanges {
    fn from(req: UpdatePayableRequest) -> Self {
        Self {
            invoice_no: req.invoice_no,
            party_name: req.supplier_name,
            description: req.description,
            amount: req.amount,
            issue_date: req.issue_date,
            due_date: req.due_date,
            bank_account_id: req.bank_account_id,
            note: req.note,
        }
    }
}

impl From<UpdateReceivableRequest> for ObligationChanges {
    fn from(req: UpdateReceivableRequest) -> Self {
        Self {
            invoice_no: req.invoice_no,
            party_name: req.customer_name,
            description: req.description,
            amount: req.amount,
            issue_date: req.issue_date,
            due_date: req.due_date,
            bank_account_id: req.bank_account_id,
            note: req.note,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PayableResponse {
    pub payable_id: String,
    pub invoice_no: String,
    pub supplier_name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub status: &'static str,
    /// `status`, or `overdue` when past due with a balance left.
    pub effective_status: &'static str,
    pub is_overdue: bool,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl PayableResponse {
    pub fn new(payable: Payable, today: NaiveDate) -> Self {
        let state = payable.balance_state();
        Self {
            effective_status: state.effective_status(payable.due_date, today),
            is_overdue: state.is_overdue(payable.due_date, today),
            paid_amount: state.paid(),
            status: payable.status.as_str(),
            payable_id: payable.payable_id,
            invoice_no: payable.invoice_no,
            supplier_name: payable.supplier_name,
            description: payable.description,
            amount: payable.amount,
            balance: payable.balance,
            issue_date: payable.issue_date,
            due_date: payable.due_date,
            bank_account_id: payable.bank_account_id,
            note: payable.note,
            created_by: payable.created_by,
            created_at: payable.created_at.to_rfc3339(),
            updated_at: payable.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReceivableResponse {
    pub receivable_id: String,
    pub invoice_no: String,
    pub customer_name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub status: &'static str,
    pub effective_status: &'static str,
    pub is_overdue: bool,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ReceivableResponse {
    pub fn new(receivable: Receivable, today: NaiveDate) -> Self {
        let state = receivable.balance_state();
        Self {
            effective_status: state.effective_status(receivable.due_date, today),
            is_overdue: state.is_overdue(receivable.due_date, today),
            paid_amount: state.paid(),
            status: receivable.status.as_str(),
            receivable_id: receivable.receivable_id,
            invoice_no: receivable.invoice_no,
            customer_name: receivable.customer_name,
            description: receivable.description,
            amount: receivable.amount,
            balance: receivable.balance,
            issue_date: receivable.issue_date,
            due_date: receivable.due_date,
            bank_account_id: receivable.bank_account_id,
            note: receivable.note,
            created_by: receivable.created_by,
            created_at: receivable.created_at.to_rfc3339(),
            updated_at: receivable.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    /// `YYYY-MM-DD`; defaults to today.
    pub payment_date: Option<String>,
    pub bank_account_id: Option<String>,
    #[validate(length(max = 64))]
    pub payment_method: Option<String>,
    #[validate(length(max = 128))]
    pub reference: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub partial: u64,
    pub paid: u64,
    pub overdue: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ObligationSummary {
    pub count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_due: Decimal,
    pub overdue_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub overdue_amount: Decimal,
    pub by_status: StatusCounts,
}
