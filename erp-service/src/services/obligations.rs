//! Payables and receivables: CRUD, payments and balance tracking.
//!
//! One generic service covers both sides; they differ only in collection,
//! counterparty field and payment kind.

use chrono::{NaiveDate, Utc};
use mongodb::bson::{doc, Document};
use service_core::response::Paginated;
use tracing::instrument;

use crate::config::FinanceConfig;
use crate::dtos::common::non_blank;
use crate::dtos::{
    ListParams, ObligationChanges, ObligationInput, ObligationSummary, RecordPaymentRequest,
    RecordPaymentResponse, SummaryParams,
};
use crate::models::{
    new_id, NewObligation, Obligation, ObligationStatus, PaymentTransaction,
};
use crate::services::bank_accounts::BankAccountService;
use crate::services::query::{DateRange, Filter, Pagination, Sort};
use crate::services::rollup::check_amount;
use crate::services::store::money;
use crate::services::{metrics, DocumentStore, MongoDb, ServiceError};
use crate::utils::dates::{parse_optional_date, today, DATE_FORMAT};

const SORT_FIELDS: &[&str] = &[
    "invoice_no",
    "amount",
    "balance",
    "status",
    "issue_date",
    "due_date",
    "updated_at",
];

pub struct ObligationService<T: Obligation> {
    documents: DocumentStore<T>,
    transactions: DocumentStore<PaymentTransaction>,
    bank_accounts: BankAccountService,
    finance: FinanceConfig,
}

impl<T: Obligation> Clone for ObligationService<T> {
    fn clone(&self) -> Self {
        Self {
            documents: self.documents.clone(),
            transactions: self.transactions.clone(),
            bank_accounts: self.bank_accounts.clone(),
            finance: self.finance.clone(),
        }
    }
}

impl<T: Obligation> ObligationService<T> {
    pub fn new(db: &MongoDb, bank_accounts: BankAccountService, finance: FinanceConfig) -> Self {
        Self {
            documents: DocumentStore::new(db.database(), T::COLLECTION),
            transactions: DocumentStore::new(db.database(), PaymentTransaction::COLLECTION),
            bank_accounts,
            finance,
        }
    }

    pub fn today(&self) -> NaiveDate {
        today(self.finance.timezone)
    }

    #[instrument(skip(self, input), fields(kind = %T::KIND, invoice_no = %input.invoice_no))]
    pub async fn create(&self, input: ObligationInput, created_by: String) -> Result<T, ServiceError> {
        check_amount("amount", input.amount)?;
        let invoice_no = input.invoice_no.trim().to_string();
        let issue_date = parse_optional_date("issue_date", input.issue_date.as_deref())?
            .unwrap_or_else(|| self.today());
        let due_date = parse_optional_date("due_date", input.due_date.as_deref())?;
        check_dates(issue_date, due_date)?;
        let bank_account_id = non_blank(input.bank_account_id);
        self.bank_accounts
            .ensure_usable(bank_account_id.as_deref())
            .await?;
        self.ensure_invoice_free(&invoice_no, None).await?;

        let document = T::from_new(
            NewObligation {
                invoice_no,
                party_name: input.party_name.trim().to_string(),
                description: non_blank(input.description),
                amount: input.amount,
                issue_date,
                due_date,
                bank_account_id,
                note: non_blank(input.note),
            },
            created_by,
            Utc::now(),
        );

        match self.documents.insert(&document).await {
            Err(e) if e.is_duplicate_key() => return Err(self.duplicate_invoice(document.invoice_no())),
            other => other?,
        }

        metrics::record_document_created(T::KIND.as_str());
        tracing::info!(id = %document.id(), amount = %input.amount, "{} created", T::LABEL);
        Ok(document)
    }

    pub async fn get(&self, id: &str) -> Result<T, ServiceError> {
        self.documents
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(T::LABEL, id))
    }

    pub async fn list(&self, params: &ListParams) -> Result<Paginated<T>, ServiceError> {
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

        let filter = self
            .status_filter(Filter::new(), params.status.as_deref())?
            .search(
                &["invoice_no", T::PARTY_FIELD, "description"],
                params.search.as_deref(),
            )
            .eq_opt("bank_account_id", non_blank(params.bank_id.clone()))
            .within_days("issue_date", &range);

        let (items, total) = self.documents.find_many(filter, &sort, &pagination).await?;
        Ok(Paginated::new(items, pagination.page, pagination.limit, total))
    }

    /// `overdue` is derived, so it becomes a due-date condition.
    fn status_filter(&self, filter: Filter, status: Option<&str>) -> Result<Filter, ServiceError> {
        Ok(match status.map(str::trim) {
            None | Some("") => filter,
            Some("pending") => filter.eq("status", ObligationStatus::Pending.as_str()),
            Some("partial") => filter.eq("status", ObligationStatus::Partial.as_str()),
            Some("paid") => filter.eq("status", ObligationStatus::Paid.as_str()),
            Some("overdue") => self.overdue_filter(filter),
            Some(other) => {
                return Err(ServiceError::validation(
                    "status",
                    format!("'{}' is not one of pending, partial, paid, overdue", other),
                ))
            }
        })
    }

    fn overdue_filter(&self, filter: Filter) -> Filter {
        let today = self.today().format(DATE_FORMAT).to_string();
        filter
            .condition("status", doc! { "$ne": ObligationStatus::Paid.as_str() })
            .condition("due_date", doc! { "$lt": today })
    }

    /// Apply field changes. A new amount keeps what was already paid.
    #[instrument(skip(self, changes), fields(kind = %T::KIND))]
    pub async fn update(&self, id: &str, changes: ObligationChanges) -> Result<T, ServiceError> {
        let current = self.get(id).await?;
        let state = current.balance_state();
        let mut set = Document::new();

        if let Some(invoice_no) = changes.invoice_no {
            let invoice_no = invoice_no.trim().to_string();
            if invoice_no != current.invoice_no() {
                self.ensure_invoice_free(&invoice_no, Some(id)).await?;
            }
            set.insert("invoice_no", invoice_no);
        }
        if let Some(name) = changes.party_name {
            set.insert(T::PARTY_FIELD, name.trim());
        }
        if changes.description.is_some() {
            set.insert("description", non_blank(changes.description));
        }
        if changes.note.is_some() {
            set.insert("note", non_blank(changes.note));
        }

        let issue_date = parse_optional_date("issue_date", changes.issue_date.as_deref())?;
        let due_date = match changes.due_date.as_deref() {
            // An empty string clears the due date.
            Some(v) if v.trim().is_empty() => Some(None),
            other => parse_optional_date("due_date", other)?.map(Some),
        };
        check_dates(
            issue_date.unwrap_or(current.issue_date()),
            due_date.unwrap_or(current.due_date()),
        )?;
        if let Some(d) = issue_date {
            set.insert("issue_date", d.format(DATE_FORMAT).to_string());
        }
        if let Some(d) = due_date {
            set.insert("due_date", d.map(|d| d.format(DATE_FORMAT).to_string()));
        }

        if changes.bank_account_id.is_some() {
            let bank_account_id = non_blank(changes.bank_account_id);
            self.bank_accounts
                .ensure_usable(bank_account_id.as_deref())
                .await?;
            set.insert("bank_account_id", bank_account_id);
        }

        let mut filter = Filter::by_id::<T>(id);
        if let Some(amount) = changes.amount {
            let rebased = state.rebase(amount)?;
            set.insert("amount", money(rebased.amount));
            set.insert("balance", money(rebased.balance));
            set.insert("status", rebased.status.as_str());
            filter = filter.eq("balance", money(state.balance));
        }

        let updated = match self.documents.update_fields(filter, set).await {
            Err(e) if e.is_duplicate_key() => {
                return Err(ServiceError::Conflict(format!(
                    "{} invoice number already exists",
                    T::LABEL
                )))
            }
            other => other?,
        };
        let updated = match updated {
            Some(doc) => doc,
            None => return Err(self.lost_race(id).await),
        };

        tracing::info!(id = %id, "{} updated", T::LABEL);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.documents.soft_delete(Filter::by_id::<T>(id)).await? {
            return Err(ServiceError::not_found(T::LABEL, id));
        }
        tracing::info!(id = %id, "{} deleted", T::LABEL);
        Ok(())
    }

    /// Apply a payment and log it.
    ///
    /// The balance write only succeeds while the stored balance still equals
    /// the one the payment was checked against.
    #[instrument(skip(self, req), fields(kind = %T::KIND, amount = %req.amount))]
    pub async fn record_payment(
        &self,
        id: &str,
        req: RecordPaymentRequest,
        created_by: String,
    ) -> Result<RecordPaymentResponse, ServiceError> {
        let document = self.get(id).await?;
        let before = document.balance_state();
        let after = before.apply_payment(req.amount)?;

        let payment_date = parse_optional_date("payment_date", req.payment_date.as_deref())?
            .unwrap_or_else(|| self.today());
        let bank_account_id = non_blank(req.bank_account_id);
        self.bank_accounts
            .ensure_usable(bank_account_id.as_deref())
            .await?;

        let updated = self
            .documents
            .update_fields(
                Filter::by_id::<T>(id).eq("balance", money(before.balance)),
                doc! {
                    "balance": money(after.balance),
                    "status": after.status.as_str(),
                },
            )
            .await?;
        if updated.is_none() {
            return Err(self.lost_race(id).await);
        }

        let transaction = PaymentTransaction {
            transaction_id: new_id(),
            kind: T::KIND,
            parent_id: document.id().to_string(),
            invoice_no: document.invoice_no().to_string(),
            amount: req.amount,
            balance_before: before.balance,
            balance_after: after.balance,
            status_after: after.status,
            payment_date,
            bank_account_id,
            payment_method: non_blank(req.payment_method),
            reference: non_blank(req.reference),
            note: non_blank(req.note),
            created_by,
            created_at: Utc::now(),
        };
        if let Err(e) = self.transactions.insert(&transaction).await {
            tracing::error!(
                id = %id,
                amount = %req.amount,
                error = %e,
                "Balance updated but payment transaction was not logged"
            );
            return Err(e);
        }

        metrics::record_payment(T::KIND.as_str());
        tracing::info!(
            id = %id,
            transaction_id = %transaction.transaction_id,
            balance = %after.balance,
            status = %after.status,
            "Payment recorded"
        );

        Ok(RecordPaymentResponse {
            transaction: transaction.into(),
            amount: after.amount,
            balance: after.balance,
            status: after.status,
        })
    }

    /// Payment history, oldest first. Still available after the parent is
    /// soft-deleted.
    pub async fn payments(&self, id: &str) -> Result<Vec<PaymentTransaction>, ServiceError> {
        let exists = self
            .documents
            .count(Filter::by_id::<T>(id).include_deleted())
            .await?;
        if exists == 0 {
            return Err(ServiceError::not_found(T::LABEL, id));
        }
        let sort = Sort::resolve(Some("created_at"), Some("asc"), &[])?;
        self.transactions
            .find_all(
                Filter::new()
                    .eq("type", T::KIND.as_str())
                    .eq("parent_id", id),
                Some(&sort),
            )
            .await
    }

    pub async fn summary(&self, params: &SummaryParams) -> Result<ObligationSummary, ServiceError> {
        let documents = self.scan(params).await?;
        Ok(summarize(&documents, self.today()))
    }

    pub(crate) async fn scan(&self, params: &SummaryParams) -> Result<Vec<T>, ServiceError> {
        let range = DateRange::from_params(
            params.start_date.as_deref(),
            params.end_date.as_deref(),
            self.finance.timezone,
        )?;
        let filter = Filter::new()
            .eq_opt("bank_account_id", non_blank(params.bank_id.clone()))
            .within_days("issue_date", &range);
        self.documents.find_all(filter, None).await
    }

    async fn ensure_invoice_free(&self, invoice_no: &str, except_id: Option<&str>) -> Result<(), ServiceError> {
        let mut filter = Filter::new().eq("invoice_no", invoice_no);
        if let Some(id) = except_id {
            filter = filter.condition(T::ID_FIELD, doc! { "$ne": id });
        }
        if self.documents.count(filter).await? > 0 {
            return Err(self.duplicate_invoice(invoice_no));
        }
        Ok(())
    }

    /// Explain a conditional write that matched nothing.
    async fn lost_race(&self, id: &str) -> ServiceError {
        match self.documents.find_by_id(id).await {
            Ok(Some(_)) => ServiceError::Conflict(format!(
                "{} {} was modified concurrently, please retry",
                T::LABEL,
                id
            )),
            Ok(None) => ServiceError::not_found(T::LABEL, id),
            Err(e) => e,
        }
    }

    fn duplicate_invoice(&self, invoice_no: &str) -> ServiceError {
        ServiceError::Conflict(format!(
            "{} with invoice number {} already exists",
            T::LABEL,
            invoice_no
        ))
    }
}

fn check_dates(issue_date: NaiveDate, due_date: Option<NaiveDate>) -> Result<(), ServiceError> {
    match due_date {
        Some(due) if due < issue_date => Err(ServiceError::validation(
            "due_date",
            "due_date must not be before issue_date",
        )),
        _ => Ok(()),
    }
}

/// Totals, paid/due split and status counts over `documents`.
pub fn summarize<T: Obligation>(documents: &[T], today: NaiveDate) -> ObligationSummary {
    let mut summary = ObligationSummary::default();
    for document in documents {
        let state = document.balance_state();
        summary.count += 1;
        summary.total_amount += state.amount;
        summary.total_paid += state.paid();
        summary.total_due += state.balance;
        match state.status {
            ObligationStatus::Pending => summary.by_status.pending += 1,
            ObligationStatus::Partial => summary.by_status.partial += 1,
            ObligationStatus::Paid => summary.by_status.paid += 1,
        }
        if state.is_overdue(document.due_date(), today) {
            summary.overdue_count += 1;
            summary.overdue_amount += state.balance;
        }
    }
    summary.by_status.overdue = summary.overdue_count;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Payable, Receivable};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn receivable(amount: Decimal, due: Option<NaiveDate>) -> Receivable {
        Receivable::from_new(
            NewObligation {
                invoice_no: "INV-001".to_string(),
                party_name: "Acme".to_string(),
                description: None,
                amount,
                issue_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                due_date: due,
                bank_account_id: None,
                note: None,
            },
            "user-1".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn summary_splits_paid_due_and_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let past = NaiveDate::from_ymd_opt(2025, 2, 1);
        let future = NaiveDate::from_ymd_opt(2025, 4, 1);

        let open = receivable(dec!(1000), past);
        let mut partial = receivable(dec!(500), future);
        let state = partial.balance_state().apply_payment(dec!(200)).unwrap();
        partial.balance = state.balance;
        partial.status = state.status;
        let mut settled = receivable(dec!(300), past);
        settled.balance = Decimal::ZERO;
        settled.status = ObligationStatus::Paid;

        let summary = summarize(&[open, partial, settled], today);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_amount, dec!(1800));
        assert_eq!(summary.total_paid, dec!(500));
        assert_eq!(summary.total_due, dec!(1300));
        assert_eq!(summary.overdue_count, 1);
        assert_eq!(summary.overdue_amount, dec!(1000));
        assert_eq!(summary.by_status.pending, 1);
        assert_eq!(summary.by_status.partial, 1);
        assert_eq!(summary.by_status.paid, 1);
    }

    #[test]
    fn new_documents_start_pending_with_full_balance() {
        let payable = Payable::from_new(
            NewObligation {
                invoice_no: "PO-9".to_string(),
                party_name: "Paper Co".to_string(),
                description: None,
                amount: dec!(75.25),
                issue_date: NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
                due_date: None,
                bank_account_id: None,
                note: None,
            },
            "user-1".to_string(),
            Utc::now(),
        );
        assert_eq!(payable.balance, dec!(75.25));
        assert_eq!(payable.status, ObligationStatus::Pending);
        assert_eq!(payable.supplier_name, "Paper Co");
    }

    #[test]
    fn due_date_before_issue_date_is_invalid() {
        let issue = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        assert!(check_dates(issue, NaiveDate::from_ymd_opt(2025, 5, 4)).is_err());
        assert!(check_dates(issue, Some(issue)).is_ok());
        assert!(check_dates(issue, None).is_ok());
    }
}
