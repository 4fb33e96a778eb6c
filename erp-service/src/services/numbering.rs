//! Sequential document numbers such as `RC-2025-008`.

use chrono::{Datelike, NaiveDate};

/// Prefix shared by every number issued for `code` in the year of `date`.
pub fn document_prefix(code: &str, date: NaiveDate) -> String {
    format!("{}-{}-", code, date.year())
}

/// Next number after the highest numeric suffix among `existing` numbers
/// carrying `prefix`. Starts at 1 when nothing matches.
pub fn next_number<'a, I>(prefix: &str, existing: I, width: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|number| sequence_of(prefix, number))
        .max()
        .unwrap_or(0);
    format_number(prefix, max + 1, width)
}

pub fn format_number(prefix: &str, sequence: u64, width: usize) -> String {
    format!("{}{:0width$}", prefix, sequence, width = width)
}

fn sequence_of(prefix: &str, number: &str) -> Option<u64> {
    let suffix = number.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continues_after_current_max() {
        let existing = ["RC-2025-001", "RC-2025-007", "RC-2025-003"];
        assert_eq!(next_number("RC-2025-", existing, 3), "RC-2025-008");
    }

    #[test]
    fn starts_a_new_sequence() {
        assert_eq!(next_number("RC-2025-", [], 3), "RC-2025-001");
        assert_eq!(
            next_number("RC-2025-", ["RC-2024-019"], 3),
            "RC-2025-001"
        );
    }

    #[test]
    fn compares_numerically_and_skips_manual_numbers() {
        let existing = ["RC-2025-999", "RC-2025-1000", "RC-2025-ABC", "RC-2025-"];
        assert_eq!(next_number("RC-2025-", existing, 3), "RC-2025-1001");
    }

    #[test]
    fn prefix_uses_calendar_year() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(document_prefix("RC", date), "RC-2025-");
        assert_eq!(format_number("RC-2025-", 42, 5), "RC-2025-00042");
    }
}
