pub mod bank_accounts;
pub mod cash_entries;
pub mod common;
pub mod finance;
pub mod obligations;
pub mod payments;
pub mod receipts;

pub use bank_accounts::{BankAccountResponse, CreateBankAccountRequest, UpdateBankAccountRequest};
pub use cash_entries::{CashEntryResponse, CreateCashEntryRequest, UpdateCashEntryRequest};
pub use common::{ApiPath, ApiQuery, DeletedResponse, ListParams, NextNumberParams, SummaryParams};
pub use finance::{FinanceSummaryResponse, NetAmount};
pub use obligations::{
    CreatePayableRequest, CreateReceivableRequest, ObligationChanges, ObligationInput,
    ObligationSummary, PayableResponse, ReceivableResponse, RecordPaymentRequest, StatusCounts,
    UpdatePayableRequest, UpdateReceivableRequest,
};
pub use payments::{PaymentTransactionResponse, RecordPaymentResponse};
pub use receipts::{
    CreateReceiptRequest, NextNumberResponse, ReceiptBucket, ReceiptItemRequest,
    ReceiptReportResponse, ReceiptResponse, ReceiptSummaryResponse, UpdateReceiptRequest,
};
