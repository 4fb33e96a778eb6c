//! Calendar helpers for the configured business timezone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::services::ServiceError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` request value, reporting failures against `field`.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ServiceError::validation(field, format!("'{}' is not a YYYY-MM-DD date", value)))
}

pub fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, ServiceError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(field, v).map(Some),
    }
}

/// The instant a local calendar day starts.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// Local calendar day an instant falls on.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

pub fn today(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

/// `(year, month)` of a local date, used for month buckets.
pub fn year_month(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Bangkok;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("start_date", "2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_date("start_date", "01/03/2025").is_err());
        assert_eq!(parse_optional_date("end_date", Some("")).unwrap(), None);
    }

    #[test]
    fn midnight_is_shifted_to_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let start = local_midnight(date, Bangkok);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 1, 9, 17, 0, 0).unwrap());
        assert_eq!(local_date(start, Bangkok), date);
    }

    #[test]
    fn late_utc_evening_is_next_local_day() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 31, 18, 30, 0).unwrap();
        assert_eq!(
            local_date(instant, Bangkok),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
    }
}
