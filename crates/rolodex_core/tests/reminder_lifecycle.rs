use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rolodex_core::{
    spawn_next, Clock, DomainError, FixedClock, NewReminder, RecurrencePattern, RecurrenceUnit,
    Reminder, ReminderStatus, TemporalValue,
};
use uuid::Uuid;

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

fn clock() -> FixedClock {
    FixedClock::new(utc(2024, 1, 1, 8))
}

fn one_off(clock: &FixedClock) -> Reminder {
    Reminder::create(
        NewReminder::new(Uuid::new_v4(), "Call Ana", utc(2024, 1, 1, 9)),
        clock,
    )
    .unwrap()
}

fn weekly(clock: &FixedClock, end: Option<DateTime<Utc>>) -> Reminder {
    let pattern = RecurrencePattern::new(1, RecurrenceUnit::Week, end.map(TemporalValue::from))
        .unwrap();
    Reminder::create(
        NewReminder::new(Uuid::new_v4(), "Weekly check-in", utc(2024, 1, 1, 9))
            .with_description("ask about the move")
            .with_note(Uuid::new_v4())
            .with_recurrence(pattern),
        clock,
    )
    .unwrap()
}

#[test]
fn create_trims_fields_and_starts_pending() {
    let clock = clock();
    let reminder = Reminder::create(
        NewReminder::new(Uuid::new_v4(), "  Send birthday card  ", utc(2024, 2, 3, 10))
            .with_description("   "),
        &clock,
    )
    .unwrap();

    assert!(!reminder.id().is_nil());
    assert_eq!(reminder.title(), "Send birthday card");
    assert_eq!(reminder.description(), None);
    assert_eq!(reminder.status(), ReminderStatus::Pending);
    assert_eq!(reminder.completion_date(), None);
    assert_eq!(reminder.created_at(), clock.now());
    assert!(!reminder.is_recurring());
}

#[test]
fn create_rejects_blank_title_and_naive_due_date() {
    let clock = clock();
    let blank = Reminder::create(
        NewReminder::new(Uuid::new_v4(), "   ", utc(2024, 1, 1, 9)),
        &clock,
    )
    .unwrap_err();
    assert_eq!(blank, DomainError::EmptyTitle);

    let naive_due = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let naive = Reminder::create(NewReminder::new(Uuid::new_v4(), "Call", naive_due), &clock)
        .unwrap_err();
    assert_eq!(naive, DomainError::NaiveDatetime { field: "due_date" });
}

#[test]
fn complete_transitions_once_and_then_rejects() {
    let clock = clock();
    let mut reminder = one_off(&clock);
    clock.advance(Duration::hours(5));

    let successor = reminder.complete(utc(2024, 1, 1, 12), &clock).unwrap();
    assert!(successor.is_none());
    assert_eq!(reminder.status(), ReminderStatus::Completed);
    assert_eq!(reminder.completion_date(), Some(utc(2024, 1, 1, 12)));
    assert_eq!(reminder.updated_at(), utc(2024, 1, 1, 13));

    let again = reminder.complete(utc(2024, 1, 2, 12), &clock).unwrap_err();
    assert_eq!(
        again,
        DomainError::InvalidTransition {
            action: "complete",
            current: "completed"
        }
    );
    assert_eq!(reminder.completion_date(), Some(utc(2024, 1, 1, 12)));
}

#[test]
fn completion_exactly_at_due_date_is_accepted() {
    let clock = clock();
    let mut reminder = one_off(&clock);
    assert!(reminder.complete(reminder.due_date(), &clock).is_ok());
}

#[test]
fn completion_before_due_or_without_zone_is_rejected_and_state_kept() {
    let clock = clock();
    let mut reminder = one_off(&clock);

    let early = reminder.complete(utc(2024, 1, 1, 8), &clock).unwrap_err();
    assert!(matches!(early, DomainError::CompletionBeforeDue { .. }));

    let naive = TemporalValue::parse("2024-01-02 10:00:00").unwrap();
    let naive_err = reminder.complete(naive, &clock).unwrap_err();
    assert_eq!(
        naive_err,
        DomainError::NaiveDatetime {
            field: "completion_date"
        }
    );

    assert_eq!(reminder.status(), ReminderStatus::Pending);
    assert_eq!(reminder.completion_date(), None);
}

#[test]
fn cancel_only_succeeds_from_pending() {
    let clock = clock();

    let mut pending = one_off(&clock);
    pending.cancel(&clock).unwrap();
    assert_eq!(pending.status(), ReminderStatus::Cancelled);
    assert_eq!(
        pending.cancel(&clock).unwrap_err(),
        DomainError::InvalidTransition {
            action: "cancel",
            current: "cancelled"
        }
    );
    assert!(matches!(
        pending.complete(utc(2024, 1, 2, 9), &clock),
        Err(DomainError::InvalidTransition { .. })
    ));

    let mut completed = one_off(&clock);
    completed.complete(utc(2024, 1, 2, 9), &clock).unwrap();
    assert_eq!(
        completed.cancel(&clock).unwrap_err(),
        DomainError::InvalidTransition {
            action: "cancel",
            current: "completed"
        }
    );
}

#[test]
fn completing_recurring_reminder_spawns_one_pending_successor() {
    let clock = clock();
    let mut original = weekly(&clock, None);

    let successor = original
        .complete(utc(2024, 1, 3, 15), &clock)
        .unwrap()
        .expect("weekly reminder should have a successor");

    assert_ne!(successor.id(), original.id());
    assert_eq!(successor.status(), ReminderStatus::Pending);
    assert_eq!(successor.due_date(), utc(2024, 1, 10, 0));
    assert_eq!(successor.contact_id(), original.contact_id());
    assert_eq!(successor.note_id(), original.note_id());
    assert_eq!(successor.title(), original.title());
    assert_eq!(successor.description(), Some("ask about the move"));
    assert_eq!(successor.recurrence_pattern(), original.recurrence_pattern());

    assert_eq!(original.status(), ReminderStatus::Completed);
    assert_eq!(original.due_date(), utc(2024, 1, 1, 9));
}

#[test]
fn completing_past_pattern_end_spawns_nothing() {
    let clock = clock();
    let mut original = weekly(&clock, Some(utc(2024, 1, 5, 0)));

    let successor = original.complete(utc(2024, 1, 3, 15), &clock).unwrap();
    assert!(successor.is_none());
    assert_eq!(original.status(), ReminderStatus::Completed);
}

#[test]
fn next_occurrence_uses_completion_date_once_completed() {
    let clock = clock();
    let mut reminder = weekly(&clock, None);
    assert_eq!(reminder.get_next_occurrence(), Some(utc(2024, 1, 8, 0)));

    reminder.complete(utc(2024, 1, 4, 20), &clock).unwrap();
    assert_eq!(reminder.get_next_occurrence(), Some(utc(2024, 1, 11, 0)));

    assert_eq!(one_off(&clock).get_next_occurrence(), None);
}

#[test]
fn spawn_next_is_a_pure_factory() {
    let clock = clock();
    let recurring = weekly(&clock, None);
    let first = spawn_next(&recurring, utc(2024, 1, 2, 9), &clock)
        .unwrap()
        .unwrap();
    let second = spawn_next(&recurring, utc(2024, 1, 2, 9), &clock)
        .unwrap()
        .unwrap();

    assert_eq!(first.due_date(), second.due_date());
    assert_ne!(first.id(), second.id());
    assert_eq!(recurring.status(), ReminderStatus::Pending);

    assert_eq!(
        spawn_next(&one_off(&clock), utc(2024, 1, 2, 9), &clock).unwrap(),
        None
    );
}

#[test]
fn overdue_means_pending_and_strictly_past_due() {
    let clock = clock();
    let mut reminder = one_off(&clock);
    assert!(!reminder.is_overdue(reminder.due_date()));
    assert!(reminder.is_overdue(utc(2024, 1, 1, 10)));

    reminder.cancel(&clock).unwrap();
    assert!(!reminder.is_overdue(utc(2024, 1, 1, 10)));
}

#[test]
fn serialization_uses_lowercase_status_and_revalidates() {
    let clock = clock();
    let mut reminder = weekly(&clock, None);
    reminder.complete(utc(2024, 1, 2, 9), &clock).unwrap();

    let json = serde_json::to_value(&reminder).unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["recurrence_pattern"]["unit"], "WEEK");

    let decoded: Reminder = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(decoded, reminder);

    let mut broken = json;
    broken["completion_date"] = serde_json::Value::Null;
    let err = serde_json::from_value::<Reminder>(broken).unwrap_err();
    assert!(err.to_string().contains("missing completion_date"));
}
