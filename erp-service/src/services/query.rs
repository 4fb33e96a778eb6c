//! Typed query building: filters, sorting, pagination and date ranges.
//!
//! Repositories never accept raw BSON from handlers. Services turn request
//! parameters into these types and the store renders them.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use mongodb::bson::{doc, Bson, DateTime as BsonDateTime, Document};

use crate::models::{Entity, DELETED_AT_FIELD};
use crate::services::ServiceError;
use crate::utils::dates::{local_midnight, parse_optional_date, DATE_FORMAT};

/// Filter over one collection. Soft-deleted documents are excluded unless
/// [`Filter::include_deleted`] is called.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Document,
    include_deleted: bool,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id<T: Entity>(id: &str) -> Self {
        Self::new().eq(T::ID_FIELD, id)
    }

    pub fn eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.conditions.insert(field, value.into());
        self
    }

    pub fn eq_opt<V: Into<Bson>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    /// Attach an operator document to a field, e.g. `{"$lt": ...}`.
    pub fn condition(mut self, field: &str, condition: Document) -> Self {
        self.conditions.insert(field, condition);
        self
    }

    /// Case-insensitive substring match across `fields`. Blank terms are ignored.
    pub fn search(mut self, fields: &[&str], term: Option<&str>) -> Self {
        let term = match term.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return self,
        };
        let pattern = regex::escape(term);
        let clauses: Vec<Bson> = fields
            .iter()
            .map(|f| Bson::Document(doc! { *f: { "$regex": pattern.as_str(), "$options": "i" } }))
            .collect();
        self.conditions.insert("$or", clauses);
        self
    }

    pub fn starts_with(mut self, field: &str, prefix: &str) -> Self {
        self.conditions.insert(
            field,
            doc! { "$regex": format!("^{}", regex::escape(prefix)) },
        );
        self
    }

    /// Restrict a BSON datetime field to the range's instants.
    pub fn within(mut self, field: &str, range: &DateRange) -> Self {
        let mut bounds = Document::new();
        if let Some(start) = range.start_instant() {
            bounds.insert("$gte", BsonDateTime::from_chrono(start));
        }
        if let Some(end) = range.end_instant() {
            bounds.insert("$lt", BsonDateTime::from_chrono(end));
        }
        if !bounds.is_empty() {
            self.conditions.insert(field, bounds);
        }
        self
    }

    /// Restrict a `YYYY-MM-DD` string field to the range's calendar days.
    pub fn within_days(mut self, field: &str, range: &DateRange) -> Self {
        let mut bounds = Document::new();
        if let Some(start) = range.start_date {
            bounds.insert("$gte", start.format(DATE_FORMAT).to_string());
        }
        if let Some(end) = range.end_date {
            bounds.insert("$lte", end.format(DATE_FORMAT).to_string());
        }
        if !bounds.is_empty() {
            self.conditions.insert(field, bounds);
        }
        self
    }

    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Render the filter for collection `T`.
    pub fn build<T: Entity>(self) -> Document {
        let mut conditions = self.conditions;
        if T::SOFT_DELETE && !self.include_deleted {
            conditions.insert(DELETED_AT_FIELD, Bson::Null);
        }
        conditions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: Option<&str>) -> Result<Self, ServiceError> {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("desc") => Ok(SortOrder::Desc),
            Some("asc") => Ok(SortOrder::Asc),
            Some(other) => Err(ServiceError::validation(
                "sort_order",
                format!("'{}' is not one of asc, desc", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub const DEFAULT_FIELD: &'static str = "created_at";

    /// Resolve request sort parameters against a per-module whitelist.
    pub fn resolve(
        sort_by: Option<&str>,
        sort_order: Option<&str>,
        allowed: &[&str],
    ) -> Result<Self, ServiceError> {
        let order = SortOrder::parse(sort_order)?;
        let field = match sort_by.map(str::trim) {
            None | Some("") => Self::DEFAULT_FIELD.to_string(),
            Some(f) if f == Self::DEFAULT_FIELD || allowed.contains(&f) => f.to_string(),
            Some(f) => {
                return Err(ServiceError::validation(
                    "sort_by",
                    format!("cannot sort by '{}'", f),
                ))
            }
        };
        Ok(Self { field, order })
    }

    pub fn to_document(&self) -> Document {
        let direction = match self.order {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        };
        let mut sort = doc! { self.field.as_str(): direction };
        // Stable pages when the sort key has ties.
        if self.field != Self::DEFAULT_FIELD {
            sort.insert(Self::DEFAULT_FIELD, -1);
        }
        sort
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if l >= 1 => (l as u64).min(Self::MAX_LIMIT),
            _ => Self::DEFAULT_LIMIT,
        };
        // The driver sends skip as an i64.
        let max_page = i64::MAX as u64 / limit + 1;
        let page = page.filter(|p| *p >= 1).unwrap_or(1) as u64;
        Self {
            page: page.min(max_page),
            limit,
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Inclusive calendar-day range interpreted in the business timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tz: Tz,
}

impl DateRange {
    pub fn from_params(
        start_date: Option<&str>,
        end_date: Option<&str>,
        tz: Tz,
    ) -> Result<Self, ServiceError> {
        let start_date = parse_optional_date("start_date", start_date)?;
        let end_date = parse_optional_date("end_date", end_date)?;
        if let (Some(s), Some(e)) = (start_date, end_date) {
            if s > e {
                return Err(ServiceError::validation(
                    "end_date",
                    "end_date must not be before start_date",
                ));
            }
        }
        Ok(Self {
            start_date,
            end_date,
            tz,
        })
    }

    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start_date.map(|d| local_midnight(d, self.tz))
    }

    /// Exclusive upper bound: midnight after `end_date`.
    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .map(|d| local_midnight(d, self.tz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentTransaction, Receipt};
    use chrono::TimeZone;
    use chrono_tz::Asia::Bangkok;

    #[test]
    fn filters_hide_soft_deleted_documents_by_default() {
        let filter = Filter::by_id::<Receipt>("r-1").build::<Receipt>();
        assert_eq!(filter.get_str("receipt_id").unwrap(), "r-1");
        assert_eq!(filter.get("deleted_at"), Some(&Bson::Null));

        let admin = Filter::by_id::<Receipt>("r-1")
            .include_deleted()
            .build::<Receipt>();
        assert!(admin.get("deleted_at").is_none());
    }

    #[test]
    fn append_only_collections_have_no_deleted_clause() {
        let filter = Filter::new().eq("invoice_no", "INV-1").build::<PaymentTransaction>();
        assert!(filter.get("deleted_at").is_none());
    }

    #[test]
    fn search_escapes_regex_and_spans_fields() {
        let filter = Filter::new()
            .search(&["receipt_no", "customer_name"], Some("RC-2025.(1)"))
            .build::<Receipt>();
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);
        let first = clauses[0].as_document().unwrap();
        let regex = first.get_document("receipt_no").unwrap();
        assert_eq!(regex.get_str("$regex").unwrap(), r"RC\-2025\.\(1\)");
        assert_eq!(regex.get_str("$options").unwrap(), "i");

        let blank = Filter::new().search(&["a"], Some("  ")).build::<Receipt>();
        assert!(blank.get("$or").is_none());
    }

    #[test]
    fn pagination_clamps_page_and_limit() {
        assert_eq!(Pagination::new(Some(2), Some(10)).skip(), 10);
        assert_eq!(Pagination::new(Some(0), None), Pagination { page: 1, limit: 10 });
        assert_eq!(Pagination::new(Some(-3), Some(500)).limit, Pagination::MAX_LIMIT);
        assert_eq!(Pagination::new(None, Some(0)).limit, Pagination::DEFAULT_LIMIT);
    }

    #[test]
    fn huge_page_numbers_keep_skip_within_i64() {
        for limit in [1, 10, 100] {
            let pagination = Pagination::new(Some(i64::MAX), Some(limit));
            assert!(pagination.skip() <= i64::MAX as u64);
            assert!(pagination.skip() > 0);
        }
    }

    #[test]
    fn sort_defaults_to_newest_first() {
        let sort = Sort::resolve(None, None, &["receipt_no"]).unwrap();
        assert_eq!(sort.field, Sort::DEFAULT_FIELD);
        assert_eq!(sort.order, SortOrder::Desc);
        assert_eq!(sort.to_document(), doc! { "created_at": -1 });

        let by_no = Sort::resolve(Some("receipt_no"), Some("ASC"), &["receipt_no"]).unwrap();
        assert_eq!(by_no.to_document(), doc! { "receipt_no": 1, "created_at": -1 });
    }

    #[test]
    fn unknown_sort_keys_are_rejected() {
        assert!(matches!(
            Sort::resolve(Some("password"), None, &["receipt_no"]),
            Err(ServiceError::Validation { field: "sort_by", .. })
        ));
        assert!(matches!(
            Sort::resolve(None, Some("sideways"), &[]),
            Err(ServiceError::Validation { field: "sort_order", .. })
        ));
    }

    #[test]
    fn date_range_covers_whole_local_days() {
        let range = DateRange::from_params(Some("2025-01-01"), Some("2025-01-31"), Bangkok).unwrap();
        assert_eq!(
            range.start_instant().unwrap(),
            Utc.with_ymd_and_hms(2024, 12, 31, 17, 0, 0).unwrap()
        );
        assert_eq!(
            range.end_instant().unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 31, 17, 0, 0).unwrap()
        );

        let filter = Filter::new().within("receipt_date", &range).build::<Receipt>();
        let bounds = filter.get_document("receipt_date").unwrap();
        assert!(bounds.contains_key("$gte"));
        assert!(bounds.contains_key("$lt"));

        let days = Filter::new().within_days("due_date", &range).build::<Receipt>();
        let bounds = days.get_document("due_date").unwrap();
        assert_eq!(bounds.get_str("$gte").unwrap(), "2025-01-01");
        assert_eq!(bounds.get_str("$lte").unwrap(), "2025-01-31");
    }

    #[test]
    fn reversed_date_range_is_a_validation_error() {
        assert!(matches!(
            DateRange::from_params(Some("2025-02-01"), Some("2025-01-01"), Bangkok),
            Err(ServiceError::Validation { field: "end_date", .. })
        ));
    }
}
