use service_core::response::Paginated;

use crate::config::FinanceConfig;
use crate::dtos::common::non_blank;
use crate::dtos::{ListParams, PaymentTransactionResponse};
use crate::models::{PaymentKind, PaymentTransaction};
use crate::services::query::{DateRange, Filter, Pagination, Sort};
use crate::services::{DocumentStore, MongoDb, ServiceError};

const SORT_FIELDS: &[&str] = &["payment_date", "amount", "invoice_no"];
const SEARCH_FIELDS: &[&str] = &["invoice_no", "reference", "note"];

/// Read side of the payment log written by payables and receivables.
#[derive(Clone)]
pub struct PaymentTransactionService {
    transactions: DocumentStore<PaymentTransaction>,
    finance: FinanceConfig,
}

impl PaymentTransactionService {
    pub fn new(db: &MongoDb, finance: FinanceConfig) -> Self {
        Self {
            transactions: DocumentStore::new(db.database(), PaymentTransaction::COLLECTION),
            finance,
        }
    }

    pub async fn list(
        &self,
        params: &ListParams,
    ) -> Result<Paginated<PaymentTransactionResponse>, ServiceError> {
        let sort = Sort::resolve(
            params.sort_by.as_deref(),
            params.sort_order.as_deref(),
            SORT_FIELDS,
        )?;
        let pagination = Pagination::new(params.page, params.limit);
        let range = DateRange::from_params(
            params.start_date.as_deref(),
            params.end_date.as_deref(),
            self.finance.timezone,
        )?;
        let kind = parse_kind(params.kind.as_deref())?;

        let filter = Filter::new()
            .search(SEARCH_FIELDS, params.search.as_deref())
            .eq_opt("type", kind.map(|k| k.as_str()))
            .eq_opt("bank_account_id", non_blank(params.bank_id.clone()))
            .within_days("payment_date", &range);

        let (transactions, total) = self
            .transactions
            .find_many(filter, &sort, &pagination)
            .await?;
        Ok(Paginated::new(transactions, pagination.page, pagination.limit, total).map(Into::into))
    }
}

fn parse_kind(value: Option<&str>) -> Result<Option<PaymentKind>, ServiceError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some("payable") => Ok(Some(PaymentKind::Payable)),
        Some("receivable") => Ok(Some(PaymentKind::Receivable)),
        Some(other) => Err(ServiceError::validation(
            "type",
            format!("'{}' is not one of payable, receivable", other),
        )),
    }
}
