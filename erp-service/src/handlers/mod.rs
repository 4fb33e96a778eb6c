pub mod bank_accounts;
pub mod cash_entries;
pub mod finance;
pub mod health;
pub mod payables;
pub mod payment_transactions;
pub mod receipts;
pub mod receivables;

pub use health::{health_check, metrics_handler, readiness_check};
