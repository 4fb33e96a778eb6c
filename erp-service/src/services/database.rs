use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Client as MongoClient, Database, IndexModel,
};
use service_core::error::AppError;

use crate::models::{
    BankAccount, CashEntryKind, Entity, Obligation, Payable, PaymentTransaction, Receipt, Receivable,
    DELETED_AT_FIELD,
};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for erp-service");

        self.create_indexes(
            BankAccount::COLLECTION,
            vec![
                unique_index(doc! { "bank_account_id": 1 }, "bank_account_id_unique"),
                active_unique_index(doc! { "account_number": 1 }, "account_number_active_unique"),
            ],
        )
        .await?;

        self.create_indexes(
            Receipt::COLLECTION,
            vec![
                unique_index(doc! { "receipt_id": 1 }, "receipt_id_unique"),
                active_unique_index(doc! { "receipt_no": 1 }, "receipt_no_active_unique"),
                index(doc! { "receipt_date": -1 }, "receipt_date_lookup"),
                index(doc! { "bank_account_id": 1 }, "receipt_bank_lookup"),
            ],
        )
        .await?;

        for (collection, id_field) in [
            (Payable::COLLECTION, Payable::ID_FIELD),
            (Receivable::COLLECTION, Receivable::ID_FIELD),
        ] {
            self.create_indexes(
                collection,
                vec![
                    unique_index(doc! { id_field: 1 }, &format!("{}_unique", id_field)),
                    active_unique_index(doc! { "invoice_no": 1 }, "invoice_no_active_unique"),
                    index(doc! { "status": 1, "due_date": 1 }, "status_due_lookup"),
                ],
            )
            .await?;
        }

        self.create_indexes(
            PaymentTransaction::COLLECTION,
            vec![
                unique_index(doc! { "transaction_id": 1 }, "transaction_id_unique"),
                index(doc! { "type": 1, "parent_id": 1 }, "parent_lookup"),
                index(doc! { "payment_date": -1 }, "payment_date_lookup"),
            ],
        )
        .await?;

        for kind in [CashEntryKind::Income, CashEntryKind::Expense] {
            self.create_indexes(
                kind.collection(),
                vec![
                    unique_index(doc! { "entry_id": 1 }, "entry_id_unique"),
                    index(doc! { "transaction_date": -1 }, "transaction_date_lookup"),
                    index(doc! { "bank_account_id": 1 }, "entry_bank_lookup"),
                ],
            )
            .await?;
        }

        Ok(())
    }

    async fn create_indexes(&self, collection: &str, models: Vec<IndexModel>) -> Result<(), AppError> {
        self.db
            .collection::<Document>(collection)
            .create_indexes(models, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create indexes on {} collection: {}", collection, e);
                AppError::from(e)
            })?;
        tracing::info!(collection = %collection, "Created indexes");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn index(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().name(name.to_string()).build())
        .build()
}

fn unique_index(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .name(name.to_string())
                .unique(true)
                .build(),
        )
        .build()
}

/// Unique among documents that are not soft-deleted, so a deleted number can
/// be issued again.
fn active_unique_index(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .name(name.to_string())
                .unique(true)
                .partial_filter_expression(doc! { DELETED_AT_FIELD: { "$type": "null" } })
                .build(),
        )
        .build()
}
