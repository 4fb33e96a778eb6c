//! Balance and status transitions of payables and receivables.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{BalanceState, ObligationStatus};
use crate::services::rollup::check_limit;
use crate::services::ServiceError;

impl BalanceState {
    /// Fresh document: nothing paid yet.
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            balance: amount,
            status: ObligationStatus::Pending,
        }
    }

    pub fn paid(&self) -> Decimal {
        self.amount - self.balance
    }

    /// State after applying a payment of `payment`.
    pub fn apply_payment(&self, payment: Decimal) -> Result<Self, ServiceError> {
        if payment <= Decimal::ZERO {
            return Err(ServiceError::validation(
                "amount",
                "payment amount must be greater than zero",
            ));
        }
        if payment > self.balance {
            return Err(ServiceError::InsufficientOutstandingBalance {
                requested: payment,
                outstanding: self.balance,
            });
        }
        Ok(Self::settled(self.amount, self.balance - payment))
    }

    /// State after the document amount changes, keeping what was already paid.
    pub fn rebase(&self, new_amount: Decimal) -> Result<Self, ServiceError> {
        if new_amount <= Decimal::ZERO {
            return Err(ServiceError::validation(
                "amount",
                "amount must be greater than zero",
            ));
        }
        check_limit("amount", new_amount)?;
        let paid = self.paid();
        if new_amount < paid {
            return Err(ServiceError::validation(
                "amount",
                format!("amount cannot be less than the {} already paid", paid),
            ));
        }
        Ok(Self::settled(new_amount, new_amount - paid))
    }

    /// Past due with money still outstanding.
    pub fn is_overdue(&self, due_date: Option<NaiveDate>, today: NaiveDate) -> bool {
        matches!(due_date, Some(due) if today > due) && self.balance > Decimal::ZERO
    }

    /// Status reported to clients: `overdue` overrides any unpaid status.
    pub fn effective_status(&self, due_date: Option<NaiveDate>, today: NaiveDate) -> &'static str {
        if self.is_overdue(due_date, today) {
            "overdue"
        } else {
            self.status.as_str()
        }
    }

    fn settled(amount: Decimal, balance: Decimal) -> Self {
        let status = if balance.is_zero() {
            ObligationStatus::Paid
        } else if balance < amount {
            ObligationStatus::Partial
        } else {
            ObligationStatus::Pending
        };
        Self {
            amount,
            balance,
            status,
        }
    }
}
