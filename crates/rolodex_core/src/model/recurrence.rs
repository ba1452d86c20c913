//! Recurrence rules for repeating reminders.
//!
//! # Responsibility
//! - Validate `(interval, unit, end_date)` rules at construction.
//! - Compute the next occurrence date from a reference instant.
//!
//! # Invariants
//! - `interval >= 1`; a pattern is immutable once built.
//! - Occurrences fall on midnight UTC; the reference time-of-day is dropped.
//! - Month and year steps clamp the day to the target month's length.
//! - No occurrence is produced from a reference at or past `end_date`, and no
//!   candidate later than `end_date` is ever returned.

use crate::error::{DomainError, DomainResult};
use crate::time::temporal::{days_in_month, midnight_utc, utc_midnight_of, TemporalValue};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Wire token for daily recurrence.
pub const RECURRENCE_UNIT_DAY: &str = "DAY";
/// Wire token for weekly recurrence.
pub const RECURRENCE_UNIT_WEEK: &str = "WEEK";
/// Wire token for monthly recurrence.
pub const RECURRENCE_UNIT_MONTH: &str = "MONTH";
/// Wire token for yearly recurrence.
pub const RECURRENCE_UNIT_YEAR: &str = "YEAR";

/// Step unit of a recurrence pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
    Year,
}

impl RecurrenceUnit {
    /// Stable, case-sensitive wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => RECURRENCE_UNIT_DAY,
            Self::Week => RECURRENCE_UNIT_WEEK,
            Self::Month => RECURRENCE_UNIT_MONTH,
            Self::Year => RECURRENCE_UNIT_YEAR,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl FromStr for RecurrenceUnit {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            RECURRENCE_UNIT_DAY => Ok(Self::Day),
            RECURRENCE_UNIT_WEEK => Ok(Self::Week),
            RECURRENCE_UNIT_MONTH => Ok(Self::Month),
            RECURRENCE_UNIT_YEAR => Ok(Self::Year),
            other => Err(DomainError::InvalidUnit(other.to_string())),
        }
    }
}

impl Display for RecurrenceUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repeat rule: every `interval` `unit`s, optionally until `end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecurrencePatternRecord", into = "RecurrencePatternRecord")]
pub struct RecurrencePattern {
    interval: u32,
    unit: RecurrenceUnit,
    end_date: Option<DateTime<Utc>>,
}

/// Serialized shape; deserialization re-runs pattern validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecurrencePatternRecord {
    interval: i64,
    unit: RecurrenceUnit,
    end_date: Option<DateTime<Utc>>,
}

impl RecurrencePattern {
    /// Builds a validated pattern.
    ///
    /// # Errors
    /// - `InvalidInterval` when `interval == 0`.
    /// - `NaiveDatetime` when `end_date` lacks an offset.
    pub fn new(
        interval: u32,
        unit: RecurrenceUnit,
        end_date: Option<TemporalValue>,
    ) -> DomainResult<Self> {
        Self::with_start_hint(interval, unit, end_date, None)
    }

    /// Builds a validated pattern, checking `end_date` against a start hint.
    ///
    /// # Errors
    /// - Everything `new` rejects.
    /// - `InvalidDateRange` when both dates are given and `end_date <= start_date`.
    pub fn with_start_hint(
        interval: u32,
        unit: RecurrenceUnit,
        end_date: Option<TemporalValue>,
        start_date: Option<TemporalValue>,
    ) -> DomainResult<Self> {
        if interval == 0 {
            return Err(DomainError::InvalidInterval(0));
        }

        let end_date = end_date
            .map(|value| value.require_utc("end_date"))
            .transpose()?;
        let start_date = start_date
            .map(|value| value.require_utc("start_date"))
            .transpose()?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end <= start {
                return Err(DomainError::InvalidDateRange {
                    start: start.to_rfc3339(),
                    end: end.to_rfc3339(),
                });
            }
        }

        Ok(Self {
            interval,
            unit,
            end_date,
        })
    }

    /// Builds a pattern from loosely typed caller input.
    ///
    /// # Errors
    /// - `InvalidInterval` when `interval` is not a positive 32-bit value.
    /// - `InvalidUnit` when `unit` is not one of the four wire tokens.
    /// - Everything `with_start_hint` rejects.
    pub fn from_parts(
        interval: i64,
        unit: &str,
        end_date: Option<TemporalValue>,
        start_date: Option<TemporalValue>,
    ) -> DomainResult<Self> {
        let interval = u32::try_from(interval)
            .ok()
            .filter(|value| *value >= 1)
            .ok_or(DomainError::InvalidInterval(interval))?;
        let unit = unit.parse::<RecurrenceUnit>()?;
        Self::with_start_hint(interval, unit, end_date, start_date)
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn unit(&self) -> RecurrenceUnit {
        self.unit
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// Computes the next occurrence after `from_date`.
    ///
    /// Returns `Ok(None)` when the series has ended.
    ///
    /// # Errors
    /// - `NaiveDatetime` when `from_date` lacks an offset.
    pub fn get_next_date(
        &self,
        from_date: impl Into<TemporalValue>,
    ) -> DomainResult<Option<DateTime<Utc>>> {
        let from = from_date.into().require_utc("from_date")?;
        Ok(self.next_after(from))
    }

    /// Typed variant of `get_next_date` for already-normalized instants.
    pub fn next_after(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some(end) = self.end_date {
            if from >= end {
                return None;
            }
        }

        let base = midnight_utc(from).date_naive();
        let next = match self.unit {
            RecurrenceUnit::Day => base.checked_add_days(Days::new(u64::from(self.interval))),
            RecurrenceUnit::Week => {
                base.checked_add_days(Days::new(u64::from(self.interval) * 7))
            }
            RecurrenceUnit::Month => add_months_clamped(base, self.interval),
            RecurrenceUnit::Year => add_years_clamped(base, self.interval),
        }?;
        let candidate = utc_midnight_of(next);

        match self.end_date {
            Some(end) if candidate > end => None,
            _ => Some(candidate),
        }
    }

    /// Lists up to `limit` consecutive occurrences after `from`.
    pub fn upcoming(&self, from: DateTime<Utc>, limit: usize) -> Vec<DateTime<Utc>> {
        let mut dates = Vec::with_capacity(limit);
        let mut cursor = from;
        while dates.len() < limit {
            match self.next_after(cursor) {
                Some(next) => {
                    dates.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        dates
    }
}

impl Display for RecurrencePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.interval == 1 {
            write!(f, "every {}", self.unit.noun())?;
        } else {
            write!(f, "every {} {}s", self.interval, self.unit.noun())?;
        }
        if let Some(end) = self.end_date {
            write!(f, " until {}", end.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}

impl TryFrom<RecurrencePatternRecord> for RecurrencePattern {
    type Error = DomainError;

    fn try_from(value: RecurrencePatternRecord) -> Result<Self, Self::Error> {
        let interval = u32::try_from(value.interval)
            .ok()
            .filter(|interval| *interval >= 1)
            .ok_or(DomainError::InvalidInterval(value.interval))?;
        Self::new(interval, value.unit, value.end_date.map(TemporalValue::from))
    }
}

impl From<RecurrencePattern> for RecurrencePatternRecord {
    fn from(value: RecurrencePattern) -> Self {
        Self {
            interval: i64::from(value.interval),
            unit: value.unit,
            end_date: value.end_date,
        }
    }
}

fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let zero_based = i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(i64::from(date.year()) + zero_based / 12).ok()?;
    let month = u32::try_from(zero_based % 12).ok()? + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

fn add_years_clamped(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    let year = i32::try_from(i64::from(date.year()) + i64::from(years)).ok()?;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
}
