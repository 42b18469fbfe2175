//! Review date resolution.
//!
//! Review sources report dates as relative phrases ("4 weeks ago",
//! "a month ago", "Edited 2 days ago"). Dashboards and trend charts need
//! absolute timestamps, so every consumer goes through [`parse_review_date`].
//!
//! Resolution rules:
//! - ISO-8601 / RFC 3339 timestamps and plain `YYYY-MM-DD` dates are taken
//!   as-is.
//! - A leading article ("a week ago", "an hour ago") counts as 1.
//! - The first run of digits is the amount; the unit is found by keyword,
//!   checked in the order year, month, week, day, hour.
//! - A month is 30 days and a year 365 days.
//! - Anything unparseable resolves to `now`, including amounts too large
//!   to represent.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("static regex"));

/// Unit keyword recognized in a relative date phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
}

impl RelativeUnit {
    // Keyword precedence matters: "month" must win over "day" in phrases
    // like "a month and a day ago".
    const SEARCH_ORDER: [RelativeUnit; 5] = [
        RelativeUnit::Year,
        RelativeUnit::Month,
        RelativeUnit::Week,
        RelativeUnit::Day,
        RelativeUnit::Hour,
    ];

    fn keyword(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
        }
    }

    /// Span covered by `amount` of this unit, or `None` when it overflows.
    pub fn span(&self, amount: i64) -> Option<Duration> {
        match self {
            Self::Year => Duration::try_days(amount.checked_mul(365)?),
            Self::Month => Duration::try_days(amount.checked_mul(30)?),
            Self::Week => Duration::try_weeks(amount),
            Self::Day => Duration::try_days(amount),
            Self::Hour => Duration::try_hours(amount),
        }
    }

    fn find_in(text: &str) -> Option<Self> {
        Self::SEARCH_ORDER
            .into_iter()
            .find(|unit| text.contains(unit.keyword()))
    }
}

/// A relative phrase broken into amount and unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeDate {
    pub amount: i64,
    pub unit: RelativeUnit,
}

impl RelativeDate {
    /// Parse "N units ago" style text. Returns `None` when either the amount
    /// or the unit is missing.
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.trim().to_lowercase();
        let normalized = if let Some(rest) = normalized.strip_prefix("an ") {
            format!("1 {rest}")
        } else if let Some(rest) = normalized.strip_prefix("a ") {
            format!("1 {rest}")
        } else {
            normalized
        };

        let amount = AMOUNT
            .captures(&normalized)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())?;
        let unit = RelativeUnit::find_in(&normalized)?;
        Some(Self { amount, unit })
    }

    /// Instant this phrase refers to, relative to `now`. `None` when the
    /// result falls outside the representable range.
    pub fn resolve(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.unit
            .span(self.amount)
            .and_then(|span| now.checked_sub_signed(span))
    }
}

fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Resolve a free-text review date to a timestamp, falling back to `now`.
pub fn parse_review_date(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    if let Some(absolute) = parse_absolute(text) {
        return absolute;
    }
    RelativeDate::parse(text)
        .and_then(|relative| relative.resolve(now))
        .unwrap_or(now)
}

/// [`parse_review_date`] against the current clock.
pub fn resolve_review_date(text: &str) -> DateTime<Utc> {
    parse_review_date(text, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_hours() {
        assert_eq!(parse_review_date("5 hours ago", now()), now() - Duration::hours(5));
    }

    #[test]
    fn test_days() {
        assert_eq!(parse_review_date("3 days ago", now()), now() - Duration::days(3));
    }

    #[test]
    fn test_weeks() {
        assert_eq!(parse_review_date("4 weeks ago", now()), now() - Duration::weeks(4));
    }

    #[test]
    fn test_months_are_thirty_days() {
        assert_eq!(parse_review_date("2 months ago", now()), now() - Duration::days(60));
    }

    #[test]
    fn test_years_are_365_days() {
        assert_eq!(parse_review_date("2 years ago", now()), now() - Duration::days(730));
    }

    #[test]
    fn test_article_without_number() {
        assert_eq!(parse_review_date("a week ago", now()), now() - Duration::weeks(1));
        assert_eq!(parse_review_date("a month ago", now()), now() - Duration::days(30));
        assert_eq!(parse_review_date("a year ago", now()), now() - Duration::days(365));
        assert_eq!(parse_review_date("a day ago", now()), now() - Duration::days(1));
    }

    #[test]
    fn test_an_hour_ago() {
        assert_eq!(parse_review_date("an hour ago", now()), now() - Duration::hours(1));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(
            parse_review_date("  A Week Ago ", now()),
            now() - Duration::weeks(1)
        );
    }

    #[test]
    fn test_prefixed_phrase() {
        assert_eq!(
            parse_review_date("Edited 2 days ago", now()),
            now() - Duration::days(2)
        );
    }

    #[test]
    fn test_no_number_falls_back_to_now() {
        assert_eq!(parse_review_date("recently", now()), now());
        assert_eq!(parse_review_date("", now()), now());
    }

    #[test]
    fn test_unknown_unit_falls_back_to_now() {
        assert_eq!(parse_review_date("10 minutes ago", now()), now());
    }

    #[test]
    fn test_overflowing_span_falls_back_to_now() {
        assert_eq!(parse_review_date("999999999 years ago", now()), now());
        assert_eq!(parse_review_date("9999999999999999 weeks ago", now()), now());
        assert_eq!(parse_review_date("9223372036854775807 hours ago", now()), now());
    }

    #[test]
    fn test_out_of_calendar_range_falls_back_to_now() {
        // Representable as a span, but before the earliest supported date.
        assert!(RelativeUnit::Day.span(100_000_000).is_some());
        assert_eq!(parse_review_date("100000000 days ago", now()), now());
    }

    #[test]
    fn test_digits_beyond_i64_fall_back_to_now() {
        assert_eq!(parse_review_date("99999999999999999999 days ago", now()), now());
    }

    #[test]
    fn test_resolve_components() {
        let relative = RelativeDate {
            amount: 3,
            unit: RelativeUnit::Week,
        };
        assert_eq!(relative.resolve(now()), Some(now() - Duration::weeks(3)));
        let huge = RelativeDate {
            amount: i64::MAX,
            unit: RelativeUnit::Year,
        };
        assert_eq!(huge.resolve(now()), None);
    }

    #[test]
    fn test_absolute_dates() {
        assert_eq!(
            parse_review_date("2024-03-01", now()),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_review_date("2024-03-01T08:30:00Z", now()),
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_relative_date_parse_components() {
        let parsed = RelativeDate::parse("11 months ago").unwrap();
        assert_eq!(parsed.amount, 11);
        assert_eq!(parsed.unit, RelativeUnit::Month);
        assert!(RelativeDate::parse("yesterday").is_none());
    }

    #[test]
    fn test_resolve_review_date_is_not_in_future() {
        let resolved = resolve_review_date("3 days ago");
        assert!(resolved < Utc::now());
    }
}
