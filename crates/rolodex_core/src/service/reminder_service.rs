//! Reminder use-case service.
//!
//! # Responsibility
//! - Parse loosely typed reminder input into validated aggregates.
//! - Persist lifecycle transitions, including recurring successors.
//! - Answer pending/overdue/by-contact/by-note queries.
//!
//! # Invariants
//! - A completed original and its successor are both saved by
//!   `complete_reminder`; the model itself never persists.
//! - "Now" comes only from the injected clock.

use crate::error::DomainError;
use crate::model::recurrence::RecurrencePattern;
use crate::model::reminder::{ContactId, NewReminder, NoteId, Reminder, ReminderId};
use crate::repo::reminder_repo::ReminderRepository;
use crate::service::error::ServiceResult;
use crate::time::clock::Clock;
use crate::time::temporal::TemporalValue;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{info, warn};

/// Loosely typed recurrence input, e.g. from a form or JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRequest {
    pub interval: i64,
    /// One of `DAY|WEEK|MONTH|YEAR`.
    pub unit: String,
    /// Optional RFC 3339 end date.
    pub end_date: Option<String>,
}

/// Loosely typed reminder creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReminderRequest {
    pub contact_id: ContactId,
    pub title: String,
    /// RFC 3339 due date; offset-less text is rejected.
    pub due_date: String,
    pub description: Option<String>,
    pub recurrence: Option<RecurrenceRequest>,
    pub note_id: Option<NoteId>,
    /// IANA zone name, e.g. `Europe/Berlin`.
    pub timezone: Option<String>,
}

/// Result of completing a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// The original reminder, now completed.
    pub completed: Reminder,
    /// Next occurrence of a recurring reminder, already persisted.
    pub successor: Option<Reminder>,
}

/// Reminder service facade over a repository and a clock.
pub struct ReminderService<R: ReminderRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: ReminderRepository, C: Clock> ReminderService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Parses request text and creates a pending reminder.
    ///
    /// The due date doubles as the recurrence start hint, so an end date at
    /// or before it is rejected.
    pub fn create_reminder(&self, request: CreateReminderRequest) -> ServiceResult<Reminder> {
        let new_reminder = parse_create_request(request)
            .inspect_err(|err| log_rejected("reminder_create", None, err))?;
        self.schedule(new_reminder)
    }

    /// Creates and persists a reminder from typed input.
    pub fn schedule(&self, request: NewReminder) -> ServiceResult<Reminder> {
        let reminder = Reminder::create(request, &self.clock)
            .inspect_err(|err| log_rejected("reminder_create", None, err))?;
        self.repo.save_reminder(&reminder)?;
        info!(
            "event=reminder_create module=service status=ok reminder_id={} contact_id={} recurring={}",
            reminder.id(),
            reminder.contact_id(),
            reminder.is_recurring()
        );
        Ok(reminder)
    }

    /// Completes a pending reminder at `completion_date` (now when omitted).
    ///
    /// Persists the completed original and, for recurring reminders with a
    /// remaining occurrence, the new pending successor.
    pub fn complete_reminder(
        &self,
        id: ReminderId,
        completion_date: Option<TemporalValue>,
    ) -> ServiceResult<CompletionOutcome> {
        let mut reminder = self.load(id)?;
        let completion_date =
            completion_date.unwrap_or_else(|| TemporalValue::from(self.clock.now()));

        let successor = reminder
            .complete(completion_date, &self.clock)
            .inspect_err(|err| log_rejected("reminder_complete", Some(id), err))?;

        self.repo.save_reminder(&reminder)?;
        if let Some(next) = successor.as_ref() {
            self.repo.save_reminder(next)?;
        }

        info!(
            "event=reminder_complete module=service status=ok reminder_id={} successor_id={}",
            id,
            successor
                .as_ref()
                .map_or_else(|| "none".to_string(), |next| next.id().to_string())
        );
        Ok(CompletionOutcome {
            completed: reminder,
            successor,
        })
    }

    /// Cancels a pending reminder.
    pub fn cancel_reminder(&self, id: ReminderId) -> ServiceResult<Reminder> {
        let mut reminder = self.load(id)?;
        reminder
            .cancel(&self.clock)
            .inspect_err(|err| log_rejected("reminder_cancel", Some(id), err))?;
        self.repo.save_reminder(&reminder)?;
        info!("event=reminder_cancel module=service status=ok reminder_id={id}");
        Ok(reminder)
    }

    /// Next occurrence of a stored reminder; `None` when non-recurring.
    pub fn next_occurrence(&self, id: ReminderId) -> ServiceResult<Option<DateTime<Utc>>> {
        Ok(self.load(id)?.get_next_occurrence())
    }

    pub fn get_reminder(&self, id: ReminderId) -> ServiceResult<Option<Reminder>> {
        Ok(self.repo.get_reminder(id)?)
    }

    pub fn list_for_contact(&self, contact_id: ContactId) -> ServiceResult<Vec<Reminder>> {
        Ok(self.repo.list_by_contact(contact_id)?)
    }

    pub fn list_for_note(&self, note_id: NoteId) -> ServiceResult<Vec<Reminder>> {
        Ok(self.repo.list_by_note(note_id)?)
    }

    pub fn list_pending(&self) -> ServiceResult<Vec<Reminder>> {
        Ok(self.repo.list_pending()?)
    }

    /// Pending reminders due strictly before the clock's current instant.
    pub fn list_overdue(&self) -> ServiceResult<Vec<Reminder>> {
        Ok(self.repo.list_overdue(self.clock.now())?)
    }

    fn load(&self, id: ReminderId) -> ServiceResult<Reminder> {
        Ok(self.repo.require_reminder(id)?)
    }
}

fn parse_create_request(request: CreateReminderRequest) -> Result<NewReminder, DomainError> {
    let due_date = TemporalValue::parse(&request.due_date)?;
    let due_instant = TemporalValue::from(due_date.require_utc("due_date")?);
    let recurrence = request
        .recurrence
        .as_ref()
        .map(|recurrence| parse_recurrence(recurrence, due_instant))
        .transpose()?;
    let timezone = request
        .timezone
        .as_deref()
        .map(parse_timezone)
        .transpose()?;

    Ok(NewReminder {
        contact_id: request.contact_id,
        title: request.title,
        due_date,
        description: request.description,
        recurrence_pattern: recurrence,
        note_id: request.note_id,
        timezone,
    })
}

fn parse_recurrence(
    request: &RecurrenceRequest,
    start_hint: TemporalValue,
) -> Result<RecurrencePattern, DomainError> {
    let end_date = request
        .end_date
        .as_deref()
        .map(TemporalValue::parse)
        .transpose()?;
    RecurrencePattern::from_parts(
        request.interval,
        request.unit.as_str(),
        end_date,
        Some(start_hint),
    )
}

fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

fn log_rejected(event: &str, id: Option<ReminderId>, err: &DomainError) {
    warn!(
        "event={event} module=service status=rejected reminder_id={} error_code={}",
        id.map_or_else(|| "new".to_string(), |id| id.to_string()),
        err.code()
    );
}
