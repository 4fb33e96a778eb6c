//! Shared shape of payables and receivables.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Entity, PaymentKind};

/// Stored settlement state. `overdue` is never stored; it is derived from the
/// due date at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObligationStatus {
    Pending,
    Partial,
    Paid,
}

impl ObligationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObligationStatus::Pending => "pending",
            ObligationStatus::Partial => "partial",
            ObligationStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for ObligationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount, outstanding balance and status of one payable/receivable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceState {
    pub amount: Decimal,
    pub balance: Decimal,
    pub status: ObligationStatus,
}

/// Validated input for a new payable or receivable.
#[derive(Debug, Clone)]
pub struct NewObligation {
    pub invoice_no: String,
    pub party_name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
}

/// A document whose balance is settled by recorded payments.
pub trait Obligation: Entity + Clone {
    const COLLECTION: &'static str;
    /// Which side of the ledger payments against this document belong to.
    const KIND: PaymentKind;
    /// Field holding the counterparty name (`supplier_name` / `customer_name`).
    const PARTY_FIELD: &'static str;
    /// Human-readable name used in error messages.
    const LABEL: &'static str;

    fn from_new(new: NewObligation, created_by: String, now: DateTime<Utc>) -> Self;
    fn id(&self) -> &str;
    fn invoice_no(&self) -> &str;
    fn balance_state(&self) -> BalanceState;
    fn issue_date(&self) -> NaiveDate;
    fn due_date(&self) -> Option<NaiveDate>;
}
