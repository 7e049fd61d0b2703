//! Date pagination policy.

use chrono::NaiveDate;

use crate::constants::DATE_FORMAT;

/// Pick the date whose logs are shown.
///
/// The requested date wins when it has data. Otherwise the most recent
/// available date is used, or `today` when the table is empty.
#[must_use]
pub fn resolve_date(requested: NaiveDate, available: &[NaiveDate], today: NaiveDate) -> NaiveDate {
    if available.contains(&requested) {
        return requested;
    }
    available.iter().max().copied().unwrap_or(today)
}

/// Parse the `date` query parameter (`YYYY-MM-DD`), falling back to `today`.
#[must_use]
pub fn parse_requested_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap_or_else(|e| {
            tracing::debug!(date = %s, error = %e, "unparseable date parameter, using today");
            today
        }),
        None => today,
    }
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_requested_date_available() {
        let available = [d(2024, 1, 3), d(2024, 1, 2)];
        assert_eq!(resolve_date(d(2024, 1, 2), &available, d(2024, 2, 1)), d(2024, 1, 2));
    }

    #[test]
    fn test_missing_date_snaps_to_most_recent() {
        let available = [d(2024, 1, 3), d(2024, 1, 2)];
        assert_eq!(resolve_date(d(2024, 1, 5), &available, d(2024, 2, 1)), d(2024, 1, 3));
    }

    #[test]
    fn test_most_recent_regardless_of_order() {
        let available = [d(2023, 12, 30), d(2024, 1, 4), d(2024, 1, 1)];
        assert_eq!(resolve_date(d(2020, 1, 1), &available, d(2024, 2, 1)), d(2024, 1, 4));
    }

    #[test]
    fn test_empty_available_uses_today() {
        assert_eq!(resolve_date(d(2024, 1, 5), &[], d(2024, 2, 1)), d(2024, 2, 1));
    }

    #[test]
    fn test_parse_requested_date() {
        let today = d(2024, 2, 1);
        assert_eq!(parse_requested_date(Some("2024-01-03"), today), d(2024, 1, 3));
        assert_eq!(parse_requested_date(None, today), today);
        assert_eq!(parse_requested_date(Some(""), today), today);
        assert_eq!(parse_requested_date(Some("03/01/2024"), today), today);
        assert_eq!(parse_requested_date(Some("2024-02-30"), today), today);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(d(2024, 1, 3)), "2024-01-03");
    }
}
