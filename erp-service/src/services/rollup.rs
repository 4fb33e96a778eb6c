//! Money arithmetic for receipts and time-bucketed rollups.
//!
//! Everything here is pure: callers load the documents and hand over
//! `(instant, amount)` pairs.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::services::ServiceError;
use crate::utils::dates::{local_date, year_month};

pub const VAT_RATE: Decimal = dec!(0.07);

/// Round to satang (2 dp), halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest money value accepted on a single document, line or payment.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Largest quantity accepted on a receipt line.
pub const MAX_QUANTITY: Decimal = dec!(1000000);

/// Strictly positive and within [`MAX_AMOUNT`].
pub fn check_amount(field: &'static str, amount: Decimal) -> Result<(), ServiceError> {
    if amount <= Decimal::ZERO {
        return Err(ServiceError::validation(
            field,
            format!("{} must be greater than zero", field),
        ));
    }
    check_limit(field, amount)
}

pub fn check_limit(field: &'static str, amount: Decimal) -> Result<(), ServiceError> {
    if amount > MAX_AMOUNT {
        return Err(too_large(field));
    }
    Ok(())
}

fn too_large(field: &'static str) -> ServiceError {
    ServiceError::validation(field, format!("{} must not exceed {}", field, MAX_AMOUNT))
}

/// Line total: the caller's explicit total when non-zero, else the exact
/// quantity × price.
pub fn line_total(
    quantity: Decimal,
    unit_price: Decimal,
    explicit: Option<Decimal>,
) -> Result<Decimal, ServiceError> {
    let total = match explicit {
        Some(total) if !total.is_zero() => total,
        _ => quantity
            .checked_mul(unit_price)
            .ok_or_else(|| too_large("items"))?,
    };
    check_limit("items", total)?;
    Ok(total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTotals {
    pub sub_total: Decimal,
    pub discount: Decimal,
    pub total_vat: Decimal,
    pub total_amount: Decimal,
}

pub fn compute_totals<I>(line_totals: I, discount: Decimal) -> Result<DocumentTotals, ServiceError>
where
    I: IntoIterator<Item = Decimal>,
{
    if discount < Decimal::ZERO {
        return Err(ServiceError::validation("discount", "discount must not be negative"));
    }
    let sub_total = line_totals
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, total| sum.checked_add(total))
        .ok_or_else(|| too_large("items"))?;
    check_limit("items", sub_total)?;
    if discount > sub_total {
        return Err(ServiceError::InvalidDiscount {
            discount,
            sub_total,
        });
    }
    let taxable = sub_total - discount;
    let total_vat = round_money(taxable * VAT_RATE);
    Ok(DocumentTotals {
        sub_total,
        discount,
        total_vat,
        total_amount: taxable + total_vat,
    })
}

/// Document count and amount total of one time bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl Bucket {
    fn add(&mut self, amount: Decimal) {
        self.count += 1;
        self.total_amount += amount;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSummary<B = Bucket> {
    pub today: B,
    pub this_month: B,
    pub all_time: B,
}

/// Spread `entries` over today / this month / all time, relative to `now`
/// in `tz`.
pub fn summarize<I>(entries: I, now: DateTime<Utc>, tz: Tz) -> PeriodSummary
where
    I: IntoIterator<Item = (DateTime<Utc>, Decimal)>,
{
    let mut summary = PeriodSummary::default();
    partition(
        entries,
        now,
        tz,
        |bucket: &mut Bucket, amount: Decimal| bucket.add(amount),
        &mut summary,
    );
    summary
}

/// Bucket selection shared by the plain and receipt summaries.
pub(crate) fn partition<I, B, V, F>(
    entries: I,
    now: DateTime<Utc>,
    tz: Tz,
    mut add: F,
    summary: &mut PeriodSummary<B>,
) where
    I: IntoIterator<Item = (DateTime<Utc>, V)>,
    V: Copy,
    F: FnMut(&mut B, V),
{
    let today = local_date(now, tz);
    let month = year_month(today);
    for (at, value) in entries {
        let day = local_date(at, tz);
        if day == today {
            add(&mut summary.today, value);
        }
        if year_month(day) == month {
            add(&mut summary.this_month, value);
        }
        add(&mut summary.all_time, value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportGranularity {
    Day,
    Month,
    All,
}

impl FromStr for ReportGranularity {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(ReportGranularity::Day),
            "month" => Ok(ReportGranularity::Month),
            "all" => Ok(ReportGranularity::All),
            other => Err(ServiceError::validation(
                "report",
                format!("'{}' is not one of day, month, all", other),
            )),
        }
    }
}

impl ReportGranularity {
    pub fn parse(value: Option<&str>) -> Result<Self, ServiceError> {
        match value.map(str::trim) {
            None | Some("") => Ok(ReportGranularity::Day),
            Some(v) => v.parse(),
        }
    }

    fn period_key(&self, at: DateTime<Utc>, tz: Tz) -> String {
        let day = local_date(at, tz);
        match self {
            ReportGranularity::Day => day.format("%Y-%m-%d").to_string(),
            ReportGranularity::Month => day.format("%Y-%m").to_string(),
            ReportGranularity::All => "all".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub period: String,
    pub count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub granularity: &'static str,
    pub rows: Vec<ReportRow>,
    pub total: Bucket,
}

/// Group entries by local day, month, or a single `all` row, sorted by period.
pub fn report<I>(entries: I, granularity: ReportGranularity, tz: Tz) -> Report
where
    I: IntoIterator<Item = (DateTime<Utc>, Decimal)>,
{
    let mut groups: BTreeMap<String, Bucket> = BTreeMap::new();
    let mut total = Bucket::default();
    for (at, amount) in entries {
        groups
            .entry(granularity.period_key(at, tz))
            .or_default()
            .add(amount);
        total.add(amount);
    }

    let rows = groups
        .into_iter()
        .map(|(period, bucket)| ReportRow {
            period,
            count: bucket.count,
            total_amount: bucket.total_amount,
        })
        .collect();

    Report {
        granularity: match granularity {
            ReportGranularity::Day => "day",
            ReportGranularity::Month => "month",
            ReportGranularity::All => "all",
        },
        rows,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Bangkok;

    #[test]
    fn vat_is_seven_percent_after_discount() {
        let totals = compute_totals([dec!(1000), dec!(500)], dec!(100)).unwrap();
        assert_eq!(totals.sub_total, dec!(1500));
        assert_eq!(totals.total_vat, dec!(98.00));
        assert_eq!(totals.total_amount, dec!(1498.00));
        assert_eq!(
            totals.total_amount,
            totals.sub_total - totals.discount + totals.total_vat
        );
    }

    #[test]
    fn vat_rounds_half_away_from_zero() {
        // 0.07 * 0.50 = 0.035
        let totals = compute_totals([dec!(0.50)], Decimal::ZERO).unwrap();
        assert_eq!(totals.total_vat, dec!(0.04));
        assert_eq!(totals.total_amount, dec!(0.54));

        let totals = compute_totals([dec!(123.45)], dec!(0.45)).unwrap();
        assert_eq!(totals.total_vat, dec!(8.61));
        assert_eq!(totals.total_amount, dec!(131.61));
    }

    #[test]
    fn discount_equal_to_sub_total_is_allowed() {
        let totals = compute_totals([dec!(200)], dec!(200)).unwrap();
        assert_eq!(totals.total_vat, Decimal::ZERO);
        assert_eq!(totals.total_amount, Decimal::ZERO);
    }

    #[test]
    fn discount_above_sub_total_is_rejected() {
        let err = compute_totals([dec!(100)], dec!(150)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDiscount { .. }));

        let err = compute_totals([dec!(100)], dec!(-1)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { field: "discount", .. }));
    }

    #[test]
    fn line_total_defaults_to_quantity_times_price() {
        assert_eq!(line_total(dec!(3), dec!(12.50), None).unwrap(), dec!(37.50));
        assert_eq!(line_total(dec!(3), dec!(12.50), Some(Decimal::ZERO)).unwrap(), dec!(37.50));
        assert_eq!(line_total(dec!(3), dec!(12.50), Some(dec!(30))).unwrap(), dec!(30));
    }

    #[test]
    fn fractional_quantities_keep_the_exact_product() {
        assert_eq!(line_total(dec!(0.5), dec!(0.01), None).unwrap(), dec!(0.005));
        assert_eq!(line_total(dec!(2.5), dec!(19.99), None).unwrap(), dec!(49.975));
    }

    #[test]
    fn oversized_amounts_are_rejected_instead_of_overflowing() {
        let err = line_total(Decimal::MAX, dec!(2), None).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { field: "items", .. }));
        assert!(line_total(dec!(1), MAX_AMOUNT + dec!(0.01), None).is_err());
        assert!(line_total(dec!(1), dec!(1), Some(Decimal::MAX)).is_err());

        let err = compute_totals([Decimal::MAX, Decimal::MAX], Decimal::ZERO).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { field: "items", .. }));
        assert!(compute_totals([MAX_AMOUNT, dec!(1)], Decimal::ZERO).is_err());

        let ceiling = compute_totals([MAX_AMOUNT], Decimal::ZERO).unwrap();
        assert_eq!(ceiling.total_amount, dec!(1070000000000));
    }

    #[test]
    fn amount_checks_bound_both_ends() {
        assert!(check_amount("amount", dec!(0.01)).is_ok());
        assert!(check_amount("amount", MAX_AMOUNT).is_ok());
        assert!(matches!(
            check_amount("amount", Decimal::ZERO),
            Err(ServiceError::Validation { field: "amount", .. })
        ));
        assert!(check_amount("amount", Decimal::MAX).is_err());
    }

    #[test]
    fn summary_buckets_follow_local_calendar() {
        // 2025-03-15 10:00 Bangkok
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 3, 0, 0).unwrap();
        let entries = vec![
            // 2025-03-15 00:30 Bangkok, still today locally
            (Utc.with_ymd_and_hms(2025, 3, 14, 17, 30, 0).unwrap(), dec!(100)),
            // 2025-03-02
            (Utc.with_ymd_and_hms(2025, 3, 2, 5, 0, 0).unwrap(), dec!(50)),
            // 2025-02-28 23:00 Bangkok, previous month
            (Utc.with_ymd_and_hms(2025, 2, 28, 16, 0, 0).unwrap(), dec!(25)),
        ];

        let summary = summarize(entries, now, Bangkok);
        assert_eq!(summary.today, Bucket { count: 1, total_amount: dec!(100) });
        assert_eq!(summary.this_month, Bucket { count: 2, total_amount: dec!(150) });
        assert_eq!(summary.all_time, Bucket { count: 3, total_amount: dec!(175) });
    }

    #[test]
    fn report_groups_by_period_in_order() {
        let entries = vec![
            (Utc.with_ymd_and_hms(2025, 2, 1, 3, 0, 0).unwrap(), dec!(10)),
            (Utc.with_ymd_and_hms(2025, 1, 5, 3, 0, 0).unwrap(), dec!(20)),
            (Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap(), dec!(5)),
        ];

        let daily = report(entries.clone(), ReportGranularity::Day, Bangkok);
        let periods: Vec<&str> = daily.rows.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["2025-01-05", "2025-02-01"]);
        assert_eq!(daily.rows[0].count, 2);
        assert_eq!(daily.rows[0].total_amount, dec!(25));
        assert_eq!(daily.total.total_amount, dec!(35));

        let monthly = report(entries.clone(), ReportGranularity::Month, Bangkok);
        assert_eq!(monthly.rows.len(), 2);
        assert_eq!(monthly.rows[1].period, "2025-02");

        let all = report(entries, ReportGranularity::All, Bangkok);
        assert_eq!(all.rows.len(), 1);
        assert_eq!(all.rows[0].count, 3);
    }

    #[test]
    fn report_granularity_parsing() {
        assert_eq!(ReportGranularity::parse(None).unwrap(), ReportGranularity::Day);
        assert_eq!(ReportGranularity::parse(Some("MONTH")).unwrap(), ReportGranularity::Month);
        assert!(ReportGranularity::parse(Some("week")).is_err());
    }
}
