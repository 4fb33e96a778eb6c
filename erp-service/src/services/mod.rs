//! Services layer for erp-service.
//!
//! Pure calculation modules (`numbering`, `rollup`, `tracker`, `query`) sit
//! under the per-module services that load and persist documents.

pub mod bank_accounts;
pub mod cash_entries;
mod database;
pub mod error;
pub mod finance;
pub mod metrics;
pub mod numbering;
pub mod obligations;
pub mod payments;
pub mod query;
pub mod receipts;
pub mod rollup;
pub mod store;
mod tracker;

pub use bank_accounts::BankAccountService;
pub use cash_entries::CashEntryService;
pub use database::MongoDb;
pub use error::ServiceError;
pub use finance::FinanceService;
pub use obligations::ObligationService;
pub use payments::PaymentTransactionService;
pub use receipts::ReceiptService;
pub use store::DocumentStore;
