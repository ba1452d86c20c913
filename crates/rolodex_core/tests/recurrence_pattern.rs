use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use rolodex_core::time::temporal::days_in_month;
use rolodex_core::{DomainError, RecurrencePattern, RecurrenceUnit, TemporalValue};

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

fn midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    utc(year, month, day, 0, 0)
}

fn pattern(interval: u32, unit: RecurrenceUnit) -> RecurrencePattern {
    RecurrencePattern::new(interval, unit, None).unwrap()
}

fn pattern_until(interval: u32, unit: RecurrenceUnit, end: DateTime<Utc>) -> RecurrencePattern {
    RecurrencePattern::new(interval, unit, Some(end.into())).unwrap()
}

#[test]
fn monthly_from_january_31_clamps_to_leap_february() {
    let monthly = pattern(1, RecurrenceUnit::Month);

    let leap = monthly.get_next_date(midnight(2024, 1, 31)).unwrap();
    assert_eq!(leap, Some(midnight(2024, 2, 29)));

    let common = monthly.get_next_date(midnight(2023, 1, 31)).unwrap();
    assert_eq!(common, Some(midnight(2023, 2, 28)));
}

#[test]
fn monthly_rolls_over_into_next_year() {
    let quarterly = pattern(3, RecurrenceUnit::Month);
    let next = quarterly.get_next_date(utc(2023, 11, 30, 18, 0)).unwrap();
    assert_eq!(next, Some(midnight(2024, 2, 29)));
}

#[test]
fn yearly_from_leap_day_lands_on_february_28() {
    let yearly = pattern(1, RecurrenceUnit::Year);
    assert_eq!(
        yearly.get_next_date(midnight(2024, 2, 29)).unwrap(),
        Some(midnight(2025, 2, 28))
    );
    let every_four = pattern(4, RecurrenceUnit::Year);
    assert_eq!(
        every_four.get_next_date(midnight(2024, 2, 29)).unwrap(),
        Some(midnight(2028, 2, 29))
    );
}

#[test]
fn time_of_day_is_discarded_using_the_utc_calendar_date() {
    let daily = pattern(1, RecurrenceUnit::Day);
    // 23:30 at -05:00 is already the next day in UTC.
    let evening = TemporalValue::parse("2024-03-10T23:30:00-05:00").unwrap();
    assert_eq!(
        daily.get_next_date(evening).unwrap(),
        Some(midnight(2024, 3, 12))
    );

    let weekly = pattern(2, RecurrenceUnit::Week);
    assert_eq!(
        weekly.get_next_date(utc(2024, 1, 1, 17, 45)).unwrap(),
        Some(midnight(2024, 1, 15))
    );
}

#[test]
fn reference_at_or_after_end_date_yields_nothing() {
    let end = midnight(2024, 3, 1);
    let daily = pattern_until(1, RecurrenceUnit::Day, end);

    assert_eq!(daily.get_next_date(end).unwrap(), None);
    assert_eq!(daily.get_next_date(utc(2024, 3, 5, 8, 0)).unwrap(), None);
}

#[test]
fn candidate_equal_to_end_date_is_kept_but_later_is_dropped() {
    let end = midnight(2024, 3, 1);

    let daily = pattern_until(1, RecurrenceUnit::Day, end);
    assert_eq!(
        daily.get_next_date(utc(2024, 2, 29, 10, 0)).unwrap(),
        Some(end)
    );

    let weekly = pattern_until(1, RecurrenceUnit::Week, end);
    assert_eq!(weekly.get_next_date(midnight(2024, 2, 29)).unwrap(), None);
}

#[test]
fn naive_reference_date_is_rejected() {
    let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let err = pattern(1, RecurrenceUnit::Day)
        .get_next_date(naive)
        .unwrap_err();
    assert_eq!(err, DomainError::NaiveDatetime { field: "from_date" });
}

#[test]
fn construction_validates_interval_unit_and_range() {
    assert_eq!(
        RecurrencePattern::new(0, RecurrenceUnit::Day, None).unwrap_err(),
        DomainError::InvalidInterval(0)
    );
    assert_eq!(
        RecurrencePattern::from_parts(-3, "DAY", None, None).unwrap_err(),
        DomainError::InvalidInterval(-3)
    );

    let unit_err = RecurrencePattern::from_parts(1, "FORTNIGHT", None, None).unwrap_err();
    assert_eq!(unit_err, DomainError::InvalidUnit("FORTNIGHT".to_string()));
    assert!(unit_err.to_string().contains("DAY|WEEK|MONTH|YEAR"));

    let start = TemporalValue::from(midnight(2024, 6, 1));
    let before = TemporalValue::from(midnight(2024, 5, 1));
    let range_err = RecurrencePattern::with_start_hint(
        1,
        RecurrenceUnit::Week,
        Some(before),
        Some(start),
    )
    .unwrap_err();
    assert!(matches!(range_err, DomainError::InvalidDateRange { .. }));

    let same_err =
        RecurrencePattern::with_start_hint(1, RecurrenceUnit::Week, Some(start), Some(start))
            .unwrap_err();
    assert!(matches!(same_err, DomainError::InvalidDateRange { .. }));
}

#[test]
fn naive_end_date_is_rejected() {
    let naive_end = TemporalValue::parse("2024-12-31T00:00:00").unwrap();
    let err = RecurrencePattern::new(1, RecurrenceUnit::Month, Some(naive_end)).unwrap_err();
    assert_eq!(err, DomainError::NaiveDatetime { field: "end_date" });
}

#[test]
fn patterns_compare_by_value() {
    let end = midnight(2024, 12, 31);
    assert_eq!(
        pattern_until(2, RecurrenceUnit::Week, end),
        pattern_until(2, RecurrenceUnit::Week, end)
    );
    assert_ne!(
        pattern_until(2, RecurrenceUnit::Week, end),
        pattern(2, RecurrenceUnit::Week)
    );
    assert_ne!(pattern(2, RecurrenceUnit::Week), pattern(2, RecurrenceUnit::Day));

    // Same instant expressed in another offset is the same end date.
    let berlin_end = TemporalValue::parse("2024-12-31T01:00:00+01:00").unwrap();
    assert_eq!(
        RecurrencePattern::new(2, RecurrenceUnit::Week, Some(berlin_end)).unwrap(),
        pattern_until(2, RecurrenceUnit::Week, end)
    );
}

#[test]
fn upcoming_follows_clamped_dates_forward() {
    let monthly = pattern(1, RecurrenceUnit::Month);
    assert_eq!(
        monthly.upcoming(midnight(2024, 1, 31), 3),
        vec![
            midnight(2024, 2, 29),
            midnight(2024, 3, 29),
            midnight(2024, 4, 29)
        ]
    );

    let bounded = pattern_until(1, RecurrenceUnit::Week, midnight(2024, 1, 20));
    assert_eq!(bounded.upcoming(midnight(2024, 1, 1), 10).len(), 2);
}

#[test]
fn serialization_uses_uppercase_unit_tokens_and_revalidates() {
    let json = serde_json::to_value(pattern(2, RecurrenceUnit::Week)).unwrap();
    assert_eq!(json["unit"], "WEEK");
    assert_eq!(json["interval"], 2);
    assert!(json["end_date"].is_null());

    let decoded: RecurrencePattern = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, pattern(2, RecurrenceUnit::Week));

    let zero_interval = serde_json::json!({ "interval": 0, "unit": "DAY", "end_date": null });
    assert!(serde_json::from_value::<RecurrencePattern>(zero_interval).is_err());

    let lowercase_unit = serde_json::json!({ "interval": 1, "unit": "day", "end_date": null });
    assert!(serde_json::from_value::<RecurrencePattern>(lowercase_unit).is_err());
}

fn any_instant() -> impl Strategy<Value = DateTime<Utc>> {
    // 1970-01-01 .. 2100-01-01
    (0_i64..4_102_444_800).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #[test]
    fn day_and_week_steps_are_exact_from_midnight(
        from in any_instant(),
        interval in 1_u32..1000,
        weekly in any::<bool>(),
    ) {
        let (unit, days) = if weekly {
            (RecurrenceUnit::Week, i64::from(interval) * 7)
        } else {
            (RecurrenceUnit::Day, i64::from(interval))
        };
        let next = pattern(interval, unit).get_next_date(from).unwrap().unwrap();
        let base = from.date_naive();

        prop_assert_eq!((next.date_naive() - base).num_days(), days);
        prop_assert_eq!(next.num_seconds_from_midnight(), 0);
    }

    #[test]
    fn month_steps_clamp_day_of_month(
        from in any_instant(),
        interval in 1_u32..120,
    ) {
        let next = pattern(interval, RecurrenceUnit::Month)
            .get_next_date(from)
            .unwrap()
            .unwrap();

        let months_from = i64::from(from.year()) * 12 + i64::from(from.month0());
        let months_next = i64::from(next.year()) * 12 + i64::from(next.month0());
        prop_assert_eq!(months_next - months_from, i64::from(interval));

        let expected_day = from.day().min(days_in_month(next.year(), next.month()));
        prop_assert_eq!(next.day(), expected_day);
        prop_assert_eq!(next.num_seconds_from_midnight(), 0);
    }

    #[test]
    fn bounded_patterns_never_pass_end_date(
        from in any_instant(),
        end in any_instant(),
        interval in 1_u32..60,
        unit_index in 0_usize..4,
    ) {
        let unit = [
            RecurrenceUnit::Day,
            RecurrenceUnit::Week,
            RecurrenceUnit::Month,
            RecurrenceUnit::Year,
        ][unit_index];
        let bounded = pattern_until(interval, unit, end);

        match bounded.get_next_date(from).unwrap() {
            Some(next) => {
                prop_assert!(from < end);
                prop_assert!(next <= end);
            }
            None => {
                let unbounded = pattern(interval, unit).get_next_date(from).unwrap();
                prop_assert!(from >= end || unbounded.map_or(true, |next| next > end));
            }
        }
    }
}
