//! Generic collection access shared by every module.

use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Bson, DateTime as BsonDateTime, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database,
};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::{Entity, DELETED_AT_FIELD};
use crate::services::query::{Filter, Pagination, Sort};
use crate::services::ServiceError;

/// MongoDB duplicate-key error code.
const DUPLICATE_KEY: i32 = 11000;

pub struct DocumentStore<T: Entity> {
    collection: Collection<T>,
}

impl<T: Entity> Clone for DocumentStore<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

impl<T: Entity> DocumentStore<T> {
    pub fn new(db: &Database, collection: &str) -> Self {
        Self {
            collection: db.collection(collection),
        }
    }

    pub async fn insert(&self, entity: &T) -> Result<(), ServiceError> {
        self.collection.insert_one(entity, None).await?;
        Ok(())
    }

    pub async fn find_one(&self, filter: Filter) -> Result<Option<T>, ServiceError> {
        Ok(self.collection.find_one(filter.build::<T>(), None).await?)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>, ServiceError> {
        self.find_one(Filter::by_id::<T>(id)).await
    }

    /// One page of matches plus the total match count.
    pub async fn find_many(
        &self,
        filter: Filter,
        sort: &Sort,
        pagination: &Pagination,
    ) -> Result<(Vec<T>, u64), ServiceError> {
        let filter = filter.build::<T>();
        let total = self
            .collection
            .count_documents(filter.clone(), None)
            .await?;

        let options = FindOptions::builder()
            .sort(sort.to_document())
            .skip(pagination.skip())
            .limit(pagination.limit as i64)
            .build();
        let items = self
            .collection
            .find(filter, options)
            .await?
            .try_collect()
            .await?;
        Ok((items, total))
    }

    /// Every match, for rollups.
    pub async fn find_all(&self, filter: Filter, sort: Option<&Sort>) -> Result<Vec<T>, ServiceError> {
        let options = FindOptions::builder()
            .sort(sort.map(Sort::to_document))
            .build();
        Ok(self
            .collection
            .find(filter.build::<T>(), options)
            .await?
            .try_collect()
            .await?)
    }

    pub async fn count(&self, filter: Filter) -> Result<u64, ServiceError> {
        Ok(self
            .collection
            .count_documents(filter.build::<T>(), None)
            .await?)
    }

    /// Projected scan returning the string values of a single field.
    pub async fn distinct_strings(
        &self,
        filter: Filter,
        field: &str,
    ) -> Result<Vec<String>, ServiceError> {
        let options = FindOptions::builder()
            .projection(doc! { field: 1, "_id": 0 })
            .build();
        let docs: Vec<Document> = self
            .collection
            .clone_with_type::<Document>()
            .find(filter.build::<T>(), options)
            .await?
            .try_collect()
            .await?;
        Ok(docs
            .iter()
            .filter_map(|d| d.get_str(field).ok().map(str::to_string))
            .collect())
    }

    /// `$set` the given fields plus `updated_at` and return the updated
    /// document, or `None` when nothing matched.
    pub async fn update_fields(
        &self,
        filter: Filter,
        mut set: Document,
    ) -> Result<Option<T>, ServiceError> {
        set.insert("updated_at", BsonDateTime::from_chrono(Utc::now()));
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .collection
            .find_one_and_update(filter.build::<T>(), doc! { "$set": set }, options)
            .await?)
    }

    /// Overwrite the stored fields of the matching document with `entity`.
    pub async fn save(&self, filter: Filter, entity: &T) -> Result<Option<T>, ServiceError> {
        self.update_fields(filter, bson::to_document(entity)?).await
    }

    /// Mark the matching document deleted. Returns `false` when nothing matched.
    pub async fn soft_delete(&self, filter: Filter) -> Result<bool, ServiceError> {
        let now = BsonDateTime::from_chrono(Utc::now());
        let result = self
            .collection
            .update_one(
                filter.build::<T>(),
                doc! { "$set": { DELETED_AT_FIELD: now, "updated_at": now } },
                None,
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}

/// BSON form of a money value, matching how models serialize it.
pub(crate) fn money(value: Decimal) -> Bson {
    Bson::Double(value.to_f64().unwrap_or_default())
}

pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

impl ServiceError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, ServiceError::Store(e) if is_duplicate_key(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReceiptItem;
    use rust_decimal_macros::dec;

    #[test]
    fn money_matches_model_serialization() {
        let item = ReceiptItem {
            description: "Ink".to_string(),
            quantity: dec!(3),
            unit_price: dec!(12.35),
            total: dec!(37.05),
        };
        let doc = bson::to_document(&item).unwrap();
        assert_eq!(doc.get("unit_price"), Some(&money(dec!(12.35))));
        assert_eq!(doc.get("total"), Some(&money(dec!(37.05))));

        let back: ReceiptItem = bson::from_document(doc).unwrap();
        assert_eq!(back, item);
    }
}
