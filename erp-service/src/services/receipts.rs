//! Receipt issuing: numbering, totals and rollups.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use service_core::response::Paginated;
use tracing::instrument;

use crate::config::FinanceConfig;
use crate::dtos::common::non_blank;
use crate::dtos::{
    CreateReceiptRequest, ListParams, ReceiptBucket, ReceiptItemRequest, ReceiptReportResponse,
    ReceiptResponse, ReceiptSummaryResponse, SummaryParams, UpdateReceiptRequest,
};
use crate::models::{new_id, Lifecycle, Receipt, ReceiptItem};
use crate::services::bank_accounts::BankAccountService;
use crate::services::numbering::{document_prefix, next_number};
use crate::services::query::{DateRange, Filter, Pagination, Sort};
use crate::services::rollup::{
    self, check_limit, compute_totals, line_total, ReportGranularity, MAX_QUANTITY,
};
use crate::services::{metrics, DocumentStore, MongoDb, ServiceError};
use crate::utils::dates::{local_date, local_midnight, parse_optional_date, today};

const SORT_FIELDS: &[&str] = &[
    "receipt_no",
    "receipt_date",
    "customer_name",
    "total_amount",
    "updated_at",
];
const SEARCH_FIELDS: &[&str] = &["receipt_no", "customer_name", "customer_tax_id", "note"];

/// Attempts at inserting a generated number before giving up on a race.
const MAX_NUMBER_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct ReceiptService {
    receipts: DocumentStore<Receipt>,
    bank_accounts: BankAccountService,
    finance: FinanceConfig,
}

impl ReceiptService {
    pub fn new(db: &MongoDb, bank_accounts: BankAccountService, finance: FinanceConfig) -> Self {
        Self {
            receipts: DocumentStore::new(db.database(), Receipt::COLLECTION),
            bank_accounts,
            finance,
        }
    }

    /// Number the next receipt dated `date` would get.
    pub async fn next_number(&self, date: Option<NaiveDate>) -> Result<String, ServiceError> {
        let date = date.unwrap_or_else(|| today(self.finance.timezone));
        let prefix = document_prefix(&self.finance.receipt_prefix, date);
        let existing = self
            .receipts
            .distinct_strings(
                Filter::new().starts_with(Receipt::NUMBER_FIELD, &prefix),
                Receipt::NUMBER_FIELD,
            )
            .await?;
        Ok(next_number(
            &prefix,
            existing.iter().map(String::as_str),
            self.finance.number_width,
        ))
    }

    #[instrument(skip(self, req), fields(customer = %req.customer_name))]
    pub async fn create(
        &self,
        req: CreateReceiptRequest,
        created_by: String,
    ) -> Result<ReceiptResponse, ServiceError> {
        let items = build_items(&req.items)?;
        let totals = compute_totals(items.iter().map(|i| i.total), req.discount)?;
        let bank_account_id = non_blank(req.bank_account_id);
        self.bank_accounts
            .ensure_usable(bank_account_id.as_deref())
            .await?;
        let receipt_date = self.resolve_date(req.receipt_date.as_deref())?;

        let now = Utc::now();
        let mut receipt = Receipt {
            receipt_id: new_id(),
            receipt_no: String::new(),
            customer_name: req.customer_name.trim().to_string(),
            customer_address: non_blank(req.customer_address),
            customer_tax_id: non_blank(req.customer_tax_id),
            receipt_date,
            bank_account_id,
            payment_method: non_blank(req.payment_method),
            items,
            sub_total: totals.sub_total,
            discount: totals.discount,
            total_vat: totals.total_vat,
            total_amount: totals.total_amount,
            note: non_blank(req.note),
            created_by,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        };

        match non_blank(req.receipt_no) {
            Some(manual) => {
                receipt.receipt_no = manual;
                self.insert_manual(&receipt).await?;
            }
            None => self.insert_numbered(&mut receipt).await?,
        }

        metrics::record_document_created("receipt");
        tracing::info!(
            receipt_id = %receipt.receipt_id,
            receipt_no = %receipt.receipt_no,
            total_amount = %receipt.total_amount,
            "Receipt created"
        );
        Ok(receipt.into())
    }

    async fn insert_manual(&self, receipt: &Receipt) -> Result<(), ServiceError> {
        let taken = self
            .receipts
            .count(Filter::new().eq(Receipt::NUMBER_FIELD, receipt.receipt_no.as_str()))
            .await?;
        if taken > 0 {
            return Err(duplicate_number(&receipt.receipt_no));
        }
        match self.receipts.insert(receipt).await {
            Err(e) if e.is_duplicate_key() => Err(duplicate_number(&receipt.receipt_no)),
            other => other,
        }
    }

    /// Insert with a generated number, rescanning when a concurrent create
    /// took the same number first.
    async fn insert_numbered(&self, receipt: &mut Receipt) -> Result<(), ServiceError> {
        let date = local_date(receipt.receipt_date, self.finance.timezone);
        let mut attempt = 1;
        loop {
            receipt.receipt_no = self.next_number(Some(date)).await?;
            match self.receipts.insert(receipt).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_duplicate_key() && attempt < MAX_NUMBER_ATTEMPTS => {
                    tracing::warn!(
                        receipt_no = %receipt.receipt_no,
                        attempt,
                        "Receipt number taken concurrently, retrying"
                    );
                    attempt += 1;
                }
                Err(e) if e.is_duplicate_key() => return Err(duplicate_number(&receipt.receipt_no)),
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<ReceiptResponse, ServiceError> {
        Ok(self.find(id).await?.into())
    }

    pub async fn list(&self, params: &ListParams) -> Result<Paginated<ReceiptResponse>, ServiceError> {
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

        let filter = Filter::new()
            .search(SEARCH_FIELDS, params.search.as_deref())
            .eq_opt("bank_account_id", non_blank(params.bank_id.clone()))
            .within("receipt_date", &range);

        let (receipts, total) = self.receipts.find_many(filter, &sort, &pagination).await?;
        Ok(Paginated::new(receipts, pagination.page, pagination.limit, total).map(Into::into))
    }

    /// Apply changes and recompute every derived total.
    #[instrument(skip(self, req))]
    pub async fn update(
        &self,
        id: &str,
        req: UpdateReceiptRequest,
    ) -> Result<ReceiptResponse, ServiceError> {
        let mut receipt = self.find(id).await?;

        if let Some(name) = req.customer_name {
            receipt.customer_name = name.trim().to_string();
        }
        if req.customer_address.is_some() {
            receipt.customer_address = non_blank(req.customer_address);
        }
        if req.customer_tax_id.is_some() {
            receipt.customer_tax_id = non_blank(req.customer_tax_id);
        }
        if let Some(date) = req.receipt_date.as_deref() {
            receipt.receipt_date = self.resolve_date(Some(date))?;
        }
        if req.bank_account_id.is_some() {
            let bank_account_id = non_blank(req.bank_account_id);
            self.bank_accounts
                .ensure_usable(bank_account_id.as_deref())
                .await?;
            receipt.bank_account_id = bank_account_id;
        }
        if req.payment_method.is_some() {
            receipt.payment_method = non_blank(req.payment_method);
        }
        if req.note.is_some() {
            receipt.note = non_blank(req.note);
        }
        if let Some(items) = req.items.as_deref() {
            receipt.items = build_items(items)?;
        }

        let discount = req.discount.unwrap_or(receipt.discount);
        let totals = compute_totals(receipt.items.iter().map(|i| i.total), discount)?;
        receipt.sub_total = totals.sub_total;
        receipt.discount = totals.discount;
        receipt.total_vat = totals.total_vat;
        receipt.total_amount = totals.total_amount;

        let saved = self
            .receipts
            .save(Filter::by_id::<Receipt>(id), &receipt)
            .await?
            .ok_or_else(|| ServiceError::not_found("Receipt", id))?;

        tracing::info!(receipt_id = %id, total_amount = %saved.total_amount, "Receipt updated");
        Ok(saved.into())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.receipts.soft_delete(Filter::by_id::<Receipt>(id)).await? {
            return Err(ServiceError::not_found("Receipt", id));
        }
        tracing::info!(receipt_id = %id, "Receipt deleted");
        Ok(())
    }

    pub async fn summary(&self, params: &SummaryParams) -> Result<ReceiptSummaryResponse, ServiceError> {
        let receipts = self.scan(params).await?;
        let mut summary = ReceiptSummaryResponse::default();
        rollup::partition(
            receipts.iter().map(|r| (r.receipt_date, r)),
            Utc::now(),
            self.finance.timezone,
            |bucket: &mut ReceiptBucket, receipt: &Receipt| bucket.add(receipt),
            &mut summary,
        );
        Ok(summary)
    }

    pub async fn report(&self, params: &SummaryParams) -> Result<ReceiptReportResponse, ServiceError> {
        let granularity = ReportGranularity::parse(params.report.as_deref())?;
        let receipts = self.scan(params).await?;
        Ok(rollup::report(
            receipts.iter().map(|r| (r.receipt_date, r.total_amount)),
            granularity,
            self.finance.timezone,
        ))
    }

    /// Receipts matching summary filters.
    pub(crate) async fn scan(&self, params: &SummaryParams) -> Result<Vec<Receipt>, ServiceError> {
        let range = DateRange::from_params(
            params.start_date.as_deref(),
            params.end_date.as_deref(),
            self.finance.timezone,
        )?;
        let filter = Filter::new()
            .eq_opt("bank_account_id", non_blank(params.bank_id.clone()))
            .within("receipt_date", &range);
        self.receipts.find_all(filter, None).await
    }

    async fn find(&self, id: &str) -> Result<Receipt, ServiceError> {
        self.receipts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Receipt", id))
    }

    /// Local midnight of the given day, or now when omitted.
    fn resolve_date(&self, value: Option<&str>) -> Result<DateTime<Utc>, ServiceError> {
        Ok(match parse_optional_date("receipt_date", value)? {
            Some(date) => local_midnight(date, self.finance.timezone),
            None => Utc::now(),
        })
    }
}

fn build_items(items: &[ReceiptItemRequest]) -> Result<Vec<ReceiptItem>, ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::validation("items", "at least one item is required"));
    }
    items
        .iter()
        .map(|item| {
            if item.quantity <= Decimal::ZERO {
                return Err(ServiceError::validation("items", "quantity must be greater than zero"));
            }
            if item.quantity > MAX_QUANTITY {
                return Err(ServiceError::validation(
                    "items",
                    format!("quantity must not exceed {}", MAX_QUANTITY),
                ));
            }
            if item.unit_price < Decimal::ZERO {
                return Err(ServiceError::validation("items", "unit_price must not be negative"));
            }
            check_limit("items", item.unit_price)?;
            if item.total.is_some_and(|t| t < Decimal::ZERO) {
                return Err(ServiceError::validation("items", "total must not be negative"));
            }
            Ok(ReceiptItem {
                description: item.description.trim().to_string(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: line_total(item.quantity, item.unit_price, item.total)?,
            })
        })
        .collect()
}

fn duplicate_number(receipt_no: &str) -> ServiceError {
    ServiceError::Conflict(format!("Receipt number {} already exists", receipt_no))
}
