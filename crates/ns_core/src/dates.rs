//! Turns the raw date tokens scraped off result cards into calendar dates.
//!
//! Parsing never fails: anything unreadable becomes [`SENTINEL_DATE`], which is
//! older than any recency cutoff and therefore ends pagination instead of the run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const SENTINEL_DATE: NaiveDate = NaiveDate::MIN;

/// How a site encodes the date on its result cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Milliseconds since the Unix epoch, e.g. `data-timestamp="1700000000000"`.
    EpochMillis,
    /// `2024-01-12T15:04:05Z`, or a bare `2024-01-12`.
    Rfc3339,
    /// A chrono format string for human-readable dates such as `%B %d, %Y`.
    Pattern(&'static str),
}

pub fn normalize_date(raw: &str, format: DateFormat) -> NaiveDate {
    parse_date(raw.trim(), format).unwrap_or(SENTINEL_DATE)
}

fn parse_date(raw: &str, format: DateFormat) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    match format {
        DateFormat::EpochMillis => {
            let millis = raw.parse::<i64>().ok()?;
            DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .ok()
            .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()),
        DateFormat::Pattern(pattern) => NaiveDate::parse_from_str(raw, pattern)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, pattern)
                    .map(|dt| dt.date())
                    .ok()
            }),
    }
}

/// True when `date` is more than `months` thirty-day periods before `today`.
pub fn is_outside_window(today: NaiveDate, date: NaiveDate, months: u32) -> bool {
    let days = today.signed_duration_since(date).num_days();
    (days as f64 / 30.0) > f64::from(months)
}
