use rust_decimal::Decimal;
use service_core::error::AppError;
use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Discount {discount} exceeds sub total {sub_total}")]
    InvalidDiscount { discount: Decimal, sub_total: Decimal },

    #[error("Payment of {requested} exceeds outstanding balance {outstanding}")]
    InsufficientOutstandingBalance {
        requested: Decimal,
        outstanding: Decimal,
    },

    #[error("Store error: {0}")]
    Store(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation { field, message } => {
                let mut error = ValidationError::new("invalid");
                error.message = Some(Cow::Owned(message));
                let mut errors = ValidationErrors::new();
                errors.add(field, error);
                AppError::ValidationError(errors)
            }
            ServiceError::NotFound { entity, .. } => {
                AppError::NotFound(anyhow::anyhow!("{} not found", entity))
            }
            ServiceError::Conflict(message) => AppError::Conflict(anyhow::anyhow!(message)),
            e @ ServiceError::InvalidDiscount { .. } => AppError::BusinessRule {
                code: "INVALID_DISCOUNT",
                message: e.to_string(),
            },
            e @ ServiceError::InsufficientOutstandingBalance { .. } => AppError::BusinessRule {
                code: "INSUFFICIENT_OUTSTANDING_BALANCE",
                message: e.to_string(),
            },
            ServiceError::Store(e) => AppError::DatabaseError(e.into()),
            ServiceError::Serialization(e) => AppError::InternalError(e.into()),
        }
    }
}
