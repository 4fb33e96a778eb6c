//! Incomes and expenses.

use chrono::{DateTime, Utc};
use mongodb::bson::{DateTime as BsonDateTime, Document};
use service_core::response::Paginated;
use tracing::instrument;

use crate::config::FinanceConfig;
use crate::dtos::common::non_blank;
use crate::dtos::{CashEntryResponse, CreateCashEntryRequest, ListParams, SummaryParams, UpdateCashEntryRequest};
use crate::models::{new_id, CashEntry, CashEntryKind, Lifecycle};
use crate::services::bank_accounts::BankAccountService;
use crate::services::query::{DateRange, Filter, Pagination, Sort};
use crate::services::rollup::{self, check_amount, PeriodSummary, Report, ReportGranularity};
use crate::services::store::money;
use crate::services::{metrics, DocumentStore, MongoDb, ServiceError};
use crate::utils::dates::{local_midnight, parse_optional_date};

const SORT_FIELDS: &[&str] = &["transaction_date", "amount", "title", "category", "updated_at"];
const SEARCH_FIELDS: &[&str] = &["title", "category", "reference", "note"];

#[derive(Clone)]
pub struct CashEntryService {
    kind: CashEntryKind,
    entries: DocumentStore<CashEntry>,
    bank_accounts: BankAccountService,
    finance: FinanceConfig,
}

impl CashEntryService {
    pub fn new(
        db: &MongoDb,
        kind: CashEntryKind,
        bank_accounts: BankAccountService,
        finance: FinanceConfig,
    ) -> Self {
        Self {
            kind,
            entries: DocumentStore::new(db.database(), kind.collection()),
            bank_accounts,
            finance,
        }
    }

    #[instrument(skip(self, req), fields(kind = %self.kind))]
    pub async fn create(
        &self,
        req: CreateCashEntryRequest,
        created_by: String,
    ) -> Result<CashEntryResponse, ServiceError> {
        check_amount("amount", req.amount)?;
        let bank_account_id = non_blank(req.bank_account_id);
        self.bank_accounts
            .ensure_usable(bank_account_id.as_deref())
            .await?;

        let now = Utc::now();
        let entry = CashEntry {
            entry_id: new_id(),
            kind: self.kind,
            title: req.title.trim().to_string(),
            category: non_blank(req.category),
            amount: req.amount,
            transaction_date: self.resolve_date(req.transaction_date.as_deref())?,
            bank_account_id,
            payment_method: non_blank(req.payment_method),
            reference: non_blank(req.reference),
            note: non_blank(req.note),
            created_by,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        };
        self.entries.insert(&entry).await?;

        metrics::record_document_created(self.kind.as_str());
        tracing::info!(entry_id = %entry.entry_id, amount = %entry.amount, "{} recorded", self.kind.label());
        Ok(entry.into())
    }

    pub async fn get(&self, id: &str) -> Result<CashEntryResponse, ServiceError> {
        self.entries
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ServiceError::not_found(self.kind.label(), id))
    }

    pub async fn list(&self, params: &ListParams) -> Result<Paginated<CashEntryResponse>, ServiceError> {
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
            .eq_opt("category", non_blank(params.category.clone()))
            .eq_opt("bank_account_id", non_blank(params.bank_id.clone()))
            .within("transaction_date", &range);

        let (entries, total) = self.entries.find_many(filter, &sort, &pagination).await?;
        Ok(Paginated::new(entries, pagination.page, pagination.limit, total).map(Into::into))
    }

    #[instrument(skip(self, req), fields(kind = %self.kind))]
    pub async fn update(
        &self,
        id: &str,
        req: UpdateCashEntryRequest,
    ) -> Result<CashEntryResponse, ServiceError> {
        let mut set = Document::new();
        if let Some(title) = req.title {
            set.insert("title", title.trim());
        }
        if req.category.is_some() {
            set.insert("category", non_blank(req.category));
        }
        if let Some(amount) = req.amount {
            check_amount("amount", amount)?;
            set.insert("amount", money(amount));
        }
        if let Some(date) = req.transaction_date.as_deref() {
            let at = self.resolve_date(Some(date))?;
            set.insert("transaction_date", BsonDateTime::from_chrono(at));
        }
        if req.bank_account_id.is_some() {
            let bank_account_id = non_blank(req.bank_account_id);
            self.bank_accounts
                .ensure_usable(bank_account_id.as_deref())
                .await?;
            set.insert("bank_account_id", bank_account_id);
        }
        if req.payment_method.is_some() {
            set.insert("payment_method", non_blank(req.payment_method));
        }
        if req.reference.is_some() {
            set.insert("reference", non_blank(req.reference));
        }
        if req.note.is_some() {
            set.insert("note", non_blank(req.note));
        }

        let entry = self
            .entries
            .update_fields(Filter::by_id::<CashEntry>(id), set)
            .await?
            .ok_or_else(|| ServiceError::not_found(self.kind.label(), id))?;
        tracing::info!(entry_id = %id, "{} updated", self.kind.label());
        Ok(entry.into())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.entries.soft_delete(Filter::by_id::<CashEntry>(id)).await? {
            return Err(ServiceError::not_found(self.kind.label(), id));
        }
        tracing::info!(entry_id = %id, "{} deleted", self.kind.label());
        Ok(())
    }

    pub async fn summary(&self, params: &SummaryParams) -> Result<PeriodSummary, ServiceError> {
        let entries = self.scan(params).await?;
        Ok(rollup::summarize(
            entries.iter().map(|e| (e.transaction_date, e.amount)),
            Utc::now(),
            self.finance.timezone,
        ))
    }

    pub async fn report(&self, params: &SummaryParams) -> Result<Report, ServiceError> {
        let granularity = ReportGranularity::parse(params.report.as_deref())?;
        let entries = self.scan(params).await?;
        Ok(rollup::report(
            entries.iter().map(|e| (e.transaction_date, e.amount)),
            granularity,
            self.finance.timezone,
        ))
    }

    pub(crate) async fn scan(&self, params: &SummaryParams) -> Result<Vec<CashEntry>, ServiceError> {
        let range = DateRange::from_params(
            params.start_date.as_deref(),
            params.end_date.as_deref(),
            self.finance.timezone,
        )?;
        let filter = Filter::new()
            .eq_opt("bank_account_id", non_blank(params.bank_id.clone()))
            .within("transaction_date", &range);
        self.entries.find_all(filter, None).await
    }

    fn resolve_date(&self, value: Option<&str>) -> Result<DateTime<Utc>, ServiceError> {
        Ok(match parse_optional_date("transaction_date", value)? {
            Some(date) => local_midnight(date, self.finance.timezone),
            None => Utc::now(),
        })
    }
}
