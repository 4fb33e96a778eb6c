use rust_decimal::Decimal;
use serde::Serialize;

use crate::dtos::ObligationSummary;
use crate::services::rollup::PeriodSummary;

/// Income minus expense per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NetAmount {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct FinanceSummaryResponse {
    pub income: PeriodSummary,
    pub expense: PeriodSummary,
    pub net: PeriodSummary<NetAmount>,
    pub receipts: PeriodSummary,
    pub payables: ObligationSummary,
    pub receivables: ObligationSummary,
}
