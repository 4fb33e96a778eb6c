//! Soft-delete state of a stored document.
//!
//! Storage keeps a nullable `deleted_at` timestamp; the domain layer sees an
//! explicit [`Lifecycle`] instead of an `Option`.

use chrono::{DateTime, Utc};
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Name of the storage field backing [`Lifecycle`].
pub const DELETED_AT_FIELD: &str = "deleted_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted { at: DateTime<Utc> },
}

impl Lifecycle {
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Lifecycle::Active => None,
            Lifecycle::Deleted { at } => Some(*at),
        }
    }
}

impl Serialize for Lifecycle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.deleted_at()
            .map(BsonDateTime::from_chrono)
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Lifecycle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let deleted_at = Option::<BsonDateTime>::deserialize(deserializer)?;
        Ok(match deleted_at {
            None => Lifecycle::Active,
            Some(at) => Lifecycle::Deleted { at: at.to_chrono() },
        })
    }
}
