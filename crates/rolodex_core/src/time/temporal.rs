//! Timezone-aware timestamp input and calendar helpers.
//!
//! # Responsibility
//! - Distinguish aware from naive timestamps at the core boundary.
//! - Normalize aware timestamps to UTC without changing the absolute instant.
//! - Provide day-level calendar arithmetic helpers (leap years, month lengths).
//!
//! # Invariants
//! - A naive timestamp is never silently assumed to be UTC.
//! - Conversions preserve the instant, not the wall-clock fields, so DST
//!   transitions never shift a stored value.

use crate::error::{DomainError, DomainResult};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A timestamp as supplied by a caller, before zone validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalValue {
    /// Carries a UTC offset; safe to normalize.
    Aware(DateTime<FixedOffset>),
    /// Wall-clock fields only; rejected wherever an instant is required.
    Naive(NaiveDateTime),
}

impl TemporalValue {
    /// Parses caller text into a temporal value.
    ///
    /// RFC 3339 input yields `Aware`. `YYYY-MM-DDTHH:MM:SS[.fff]` and
    /// `YYYY-MM-DD HH:MM:SS[.fff]` without an offset yield `Naive`.
    ///
    /// # Errors
    /// - `InvalidTimestamp` when the text matches none of the accepted shapes.
    pub fn parse(text: &str) -> DomainResult<Self> {
        let trimmed = text.trim();
        if let Ok(value) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::Aware(value));
        }

        for format in NAIVE_FORMATS {
            if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self::Naive(value));
            }
        }

        Err(DomainError::InvalidTimestamp {
            value: trimmed.to_string(),
            reason: "expected RFC 3339 with offset, e.g. 2024-01-31T09:00:00+01:00".to_string(),
        })
    }

    /// Returns whether this value carries timezone information.
    pub fn is_aware(&self) -> bool {
        matches!(self, Self::Aware(_))
    }

    /// Returns the UTC offset when the value is aware.
    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            Self::Aware(value) => Some(*value.offset()),
            Self::Naive(_) => None,
        }
    }

    /// Converts to the same absolute instant in UTC.
    ///
    /// # Errors
    /// - `NaiveDatetime { field }` when the value has no offset.
    pub fn require_utc(self, field: &'static str) -> DomainResult<DateTime<Utc>> {
        match self {
            Self::Aware(value) => Ok(value.with_timezone(&Utc)),
            Self::Naive(_) => Err(DomainError::NaiveDatetime { field }),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TemporalValue {
    fn from(value: DateTime<Tz>) -> Self {
        let offset = value.offset().fix();
        Self::Aware(value.with_timezone(&offset))
    }
}

impl From<NaiveDateTime> for TemporalValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
///
/// Returns 0 for an out-of-range month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Midnight UTC of the instant's UTC calendar date.
pub fn midnight_utc(instant: DateTime<Utc>) -> DateTime<Utc> {
    utc_midnight_of(instant.date_naive())
}

/// Midnight UTC of a calendar date.
pub fn utc_midnight_of(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Whole elapsed days from `earlier` to `later`, truncated toward zero.
pub fn whole_days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_days()
}

/// Renders an instant's wall-clock representation in `zone`.
pub fn in_zone<Tz: TimeZone>(instant: DateTime<Utc>, zone: &Tz) -> DateTime<Tz> {
    instant.with_timezone(zone)
}

#[cfg(test)]
mod tests {
    use super::{days_in_month, is_leap_year, midnight_utc, whole_days_between, TemporalValue};
    use crate::error::DomainError;
    use chrono::{Duration, NaiveDate, TimeZone, Timelike, Utc};

    #[test]
    fn leap_year_rule_handles_century_exceptions() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
    }

    #[test]
    fn february_length_tracks_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 13), 0);
    }

    #[test]
    fn parse_distinguishes_aware_and_naive_text() {
        let aware = TemporalValue::parse("2024-03-10T09:30:00-05:00").unwrap();
        assert!(aware.is_aware());

        let naive = TemporalValue::parse("2024-03-10T09:30:00").unwrap();
        assert!(!naive.is_aware());

        let spaced = TemporalValue::parse("2024-03-10 09:30:00.250").unwrap();
        assert!(!spaced.is_aware());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = TemporalValue::parse("next tuesday").unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimestamp { .. }));
    }

    #[test]
    fn naive_value_is_rejected_with_field_name() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let err = TemporalValue::from(naive)
            .require_utc("completion_date")
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::NaiveDatetime {
                field: "completion_date"
            }
        );
    }

    #[test]
    fn midnight_discards_time_of_day() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 17, 23, 59, 59).unwrap();
        let midnight = midnight_utc(instant);
        assert_eq!(midnight.hour(), 0);
        assert_eq!(midnight.date_naive(), instant.date_naive());
    }

    #[test]
    fn whole_days_truncate_partial_days() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(whole_days_between(start, start + Duration::hours(47)), 1);
        assert_eq!(whole_days_between(start, start + Duration::hours(48)), 2);
    }
}
