use mongodb::bson::{doc, Document};
use service_core::response::Paginated;
use tracing::instrument;

use crate::dtos::common::non_blank;
use crate::dtos::{BankAccountResponse, CreateBankAccountRequest, ListParams, UpdateBankAccountRequest};
use crate::models::BankAccount;
use crate::services::query::{Filter, Pagination, Sort};
use crate::services::{DocumentStore, MongoDb, ServiceError};

const SORT_FIELDS: &[&str] = &["bank_name", "account_name", "account_number", "updated_at"];
const SEARCH_FIELDS: &[&str] = &["bank_name", "account_name", "account_number", "branch"];

#[derive(Clone)]
pub struct BankAccountService {
    accounts: DocumentStore<BankAccount>,
}

impl BankAccountService {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            accounts: DocumentStore::new(db.database(), BankAccount::COLLECTION),
        }
    }

    #[instrument(skip(self, req), fields(account_number = %req.account_number))]
    pub async fn create(
        &self,
        req: CreateBankAccountRequest,
        created_by: String,
    ) -> Result<BankAccountResponse, ServiceError> {
        let account_number = req.account_number.trim().to_string();
        self.ensure_number_free(&account_number, None).await?;

        let account = BankAccount::new(
            req.bank_name.trim().to_string(),
            req.account_name.trim().to_string(),
            account_number,
            non_blank(req.account_type),
            non_blank(req.branch),
            created_by,
        );

        match self.accounts.insert(&account).await {
            Err(e) if e.is_duplicate_key() => {
                return Err(ServiceError::Conflict(format!(
                    "Bank account number {} already exists",
                    account.account_number
                )))
            }
            other => other?,
        }

        tracing::info!(bank_account_id = %account.bank_account_id, "Bank account created");
        Ok(account.into())
    }

    pub async fn get(&self, id: &str) -> Result<BankAccountResponse, ServiceError> {
        self.accounts
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ServiceError::not_found("Bank account", id))
    }

    pub async fn list(
        &self,
        params: &ListParams,
    ) -> Result<Paginated<BankAccountResponse>, ServiceError> {
        let sort = Sort::resolve(
            params.sort_by.as_deref(),
            params.sort_order.as_deref(),
            SORT_FIELDS,
        )?;
        let pagination = Pagination::new(params.page, params.limit);

        let mut filter = Filter::new().search(SEARCH_FIELDS, params.search.as_deref());
        match params.status.as_deref() {
            None | Some("") => {}
            Some("active") => filter = filter.eq("is_active", true),
            Some("inactive") => filter = filter.eq("is_active", false),
            Some(other) => {
                return Err(ServiceError::validation(
                    "status",
                    format!("'{}' is not one of active, inactive", other),
                ))
            }
        }

        let (accounts, total) = self.accounts.find_many(filter, &sort, &pagination).await?;
        Ok(Paginated::new(accounts, pagination.page, pagination.limit, total).map(Into::into))
    }

    #[instrument(skip(self, req))]
    pub async fn update(
        &self,
        id: &str,
        req: UpdateBankAccountRequest,
    ) -> Result<BankAccountResponse, ServiceError> {
        let mut set = Document::new();
        if let Some(name) = req.bank_name {
            set.insert("bank_name", name.trim());
        }
        if let Some(name) = req.account_name {
            set.insert("account_name", name.trim());
        }
        if let Some(number) = req.account_number {
            let number = number.trim().to_string();
            self.ensure_number_free(&number, Some(id)).await?;
            set.insert("account_number", number);
        }
        if let Some(kind) = req.account_type {
            set.insert("account_type", non_blank(Some(kind)));
        }
        if let Some(branch) = req.branch {
            set.insert("branch", non_blank(Some(branch)));
        }
        if let Some(active) = req.is_active {
            set.insert("is_active", active);
        }

        let updated = match self.accounts.update_fields(Filter::by_id::<BankAccount>(id), set).await {
            Err(e) if e.is_duplicate_key() => {
                return Err(ServiceError::Conflict(
                    "Bank account number already exists".to_string(),
                ))
            }
            other => other?,
        };

        let account = updated.ok_or_else(|| ServiceError::not_found("Bank account", id))?;
        tracing::info!(bank_account_id = %id, "Bank account updated");
        Ok(account.into())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if !self.accounts.soft_delete(Filter::by_id::<BankAccount>(id)).await? {
            return Err(ServiceError::not_found("Bank account", id));
        }
        tracing::info!(bank_account_id = %id, "Bank account deleted");
        Ok(())
    }

    /// Check that an optional `bank_account_id` reference points at an
    /// active account.
    pub async fn ensure_usable(&self, id: Option<&str>) -> Result<(), ServiceError> {
        let Some(id) = id else {
            return Ok(());
        };
        let found = self
            .accounts
            .count(Filter::by_id::<BankAccount>(id).eq("is_active", true))
            .await?;
        if found == 0 {
            return Err(ServiceError::validation(
                "bank_account_id",
                format!("bank account {} does not exist or is inactive", id),
            ));
        }
        Ok(())
    }

    async fn ensure_number_free(
        &self,
        account_number: &str,
        except_id: Option<&str>,
    ) -> Result<(), ServiceError> {
        let mut filter = Filter::new().eq("account_number", account_number);
        if let Some(id) = except_id {
            filter = filter.condition("bank_account_id", doc! { "$ne": id });
        }
        if self.accounts.count(filter).await? > 0 {
            return Err(ServiceError::Conflict(format!(
                "Bank account number {} already exists",
                account_number
            )));
        }
        Ok(())
    }
}
