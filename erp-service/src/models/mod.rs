//! Domain models persisted to MongoDB.
//!
//! Money is `Decimal` in memory and a BSON double on disk so store-side
//! sorts and ranges compare numerically.

mod bank_account;
mod cash_entry;
mod lifecycle;
mod obligation;
mod payable;
mod payment_transaction;
mod receipt;
mod receivable;

pub use bank_account::BankAccount;
pub use cash_entry::{CashEntry, CashEntryKind};
pub use lifecycle::{Lifecycle, DELETED_AT_FIELD};
pub use obligation::{BalanceState, NewObligation, Obligation, ObligationStatus};
pub use payable::Payable;
pub use payment_transaction::{PaymentKind, PaymentTransaction};
pub use receipt::{Receipt, ReceiptItem};
pub use receivable::Receivable;

use serde::{de::DeserializeOwned, Serialize};

/// A document type stored in its own collection and addressed by a
/// business-unique string id (never MongoDB's `_id`).
pub trait Entity: Serialize + DeserializeOwned + Unpin + Send + Sync + 'static {
    /// Field holding the business id, e.g. `receipt_id`.
    const ID_FIELD: &'static str;
    /// Whether reads hide documents whose `deleted_at` is set.
    const SOFT_DELETE: bool = true;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
