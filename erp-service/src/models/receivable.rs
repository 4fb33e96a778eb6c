use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    new_id, BalanceState, Entity, Lifecycle, NewObligation, Obligation, ObligationStatus,
    PaymentKind,
};

/// Amount owed to the organization by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receivable {
    pub receivable_id: String,
    pub invoice_no: String,
    pub customer_name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub status: ObligationStatus,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub bank_account_id: Option<String>,
    pub note: Option<String>,
    pub created_by: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "deleted_at", default)]
    pub lifecycle: Lifecycle,
}

impl Entity for Receivable {
    const ID_FIELD: &'static str = "receivable_id";
}

impl Obligation for Receivable {
    const COLLECTION: &'static str = "receivables";
    const KIND: PaymentKind = PaymentKind::Receivable;
    const PARTY_FIELD: &'static str = "customer_name";
    const LABEL: &'static str = "Receivable";

    fn from_new(new: NewObligation, created_by: String, now: DateTime<Utc>) -> Self {
        Self {
            receivable_id: new_id(),
            invoice_no: new.invoice_no,
            customer_name: new.party_name,
            description: new.description,
            amount: new.amount,
            balance: new.amount,
            status: ObligationStatus::Pending,
            issue_date: new.issue_date,
            due_date: new.due_date,
            bank_account_id: new.bank_account_id,
            note: new.note,
            created_by,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        }
    }

    fn id(&self) -> &str {
        &self.receivable_id
    }

    fn invoice_no(&self) -> &str {
        &self.invoice_no
    }

    fn balance_state(&self) -> BalanceState {
        BalanceState {
            amount: self.amount,
            balance: self.balance,
            status: self.status,
        }
    }

    fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}
