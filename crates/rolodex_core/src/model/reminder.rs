//! Reminder aggregate and lifecycle state machine.
//!
//! # Responsibility
//! - Validate reminder creation (title, timezone-aware due date, pattern).
//! - Govern `pending -> completed | cancelled` transitions.
//! - Produce the successor occurrence of a completed recurring reminder.
//!
//! # Invariants
//! - `completed` and `cancelled` are terminal; no transition leaves them.
//! - `completion_date` is set iff status is `completed`, and is `>= due_date`.
//! - Completing never mutates another reminder; a successor is a new value
//!   the caller must persist.
//! - All instants are stored in UTC; `timezone` only affects presentation.

use crate::error::{DomainError, DomainResult};
use crate::model::recurrence::RecurrencePattern;
use crate::time::clock::Clock;
use crate::time::temporal::{in_zone, TemporalValue};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a reminder.
pub type ReminderId = Uuid;
/// Opaque reference to the owning contact.
pub type ContactId = Uuid;
/// Opaque reference to the note a reminder was created from.
pub type NoteId = Uuid;

/// Wire token for pending reminders.
pub const REMINDER_STATUS_PENDING: &str = "pending";
/// Wire token for completed reminders.
pub const REMINDER_STATUS_COMPLETED: &str = "completed";
/// Wire token for cancelled reminders.
pub const REMINDER_STATUS_CANCELLED: &str = "cancelled";

/// Reminder lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    /// Initial state; the only one accepting transitions.
    Pending,
    /// Terminal; `completion_date` is recorded.
    Completed,
    /// Terminal; dismissed without completion.
    Cancelled,
}

impl ReminderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => REMINDER_STATUS_PENDING,
            Self::Completed => REMINDER_STATUS_COMPLETED,
            Self::Cancelled => REMINDER_STATUS_CANCELLED,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for ReminderStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            REMINDER_STATUS_PENDING => Ok(Self::Pending),
            REMINDER_STATUS_COMPLETED => Ok(Self::Completed),
            REMINDER_STATUS_CANCELLED => Ok(Self::Cancelled),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation input for `Reminder::create`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    pub contact_id: ContactId,
    pub title: String,
    pub due_date: TemporalValue,
    pub description: Option<String>,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub note_id: Option<NoteId>,
    /// IANA zone the caller scheduled in; presentation only.
    pub timezone: Option<Tz>,
}

impl NewReminder {
    pub fn new(
        contact_id: ContactId,
        title: impl Into<String>,
        due_date: impl Into<TemporalValue>,
    ) -> Self {
        Self {
            contact_id,
            title: title.into(),
            due_date: due_date.into(),
            description: None,
            recurrence_pattern: None,
            note_id: None,
            timezone: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_recurrence(mut self, pattern: RecurrencePattern) -> Self {
        self.recurrence_pattern = Some(pattern);
        self
    }

    pub fn with_note(mut self, note_id: NoteId) -> Self {
        self.note_id = Some(note_id);
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = Some(timezone);
        self
    }
}

/// A dated follow-up attached to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReminderRecord", into = "ReminderRecord")]
pub struct Reminder {
    id: ReminderId,
    contact_id: ContactId,
    note_id: Option<NoteId>,
    title: String,
    description: Option<String>,
    due_date: DateTime<Utc>,
    status: ReminderStatus,
    completion_date: Option<DateTime<Utc>>,
    recurrence_pattern: Option<RecurrencePattern>,
    timezone: Option<Tz>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Serialized shape; deserialization re-validates lifecycle invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReminderRecord {
    id: ReminderId,
    contact_id: ContactId,
    note_id: Option<NoteId>,
    title: String,
    description: Option<String>,
    due_date: DateTime<Utc>,
    status: ReminderStatus,
    completion_date: Option<DateTime<Utc>>,
    recurrence_pattern: Option<RecurrencePattern>,
    timezone: Option<Tz>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Creates a pending reminder with a generated id.
    ///
    /// A supplied recurrence pattern is exercised once against the due date
    /// so invalid rules surface here rather than at completion.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank after trimming.
    /// - `NaiveDatetime { field: "due_date" }` when the due date has no offset.
    pub fn create(request: NewReminder, clock: &impl Clock) -> DomainResult<Self> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        let due_date = request.due_date.require_utc("due_date")?;

        if let Some(pattern) = request.recurrence_pattern.as_ref() {
            let _ = pattern.get_next_date(due_date)?;
        }

        let now = clock.now();
        Ok(Self {
            id: Uuid::new_v4(),
            contact_id: request.contact_id,
            note_id: request.note_id,
            title: title.to_string(),
            description: normalize_description(request.description),
            due_date,
            status: ReminderStatus::Pending,
            completion_date: None,
            recurrence_pattern: request.recurrence_pattern,
            timezone: request.timezone,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> ReminderId {
        self.id
    }

    pub fn contact_id(&self) -> ContactId {
        self.contact_id
    }

    pub fn note_id(&self) -> Option<NoteId> {
        self.note_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn status(&self) -> ReminderStatus {
        self.status
    }

    pub fn completion_date(&self) -> Option<DateTime<Utc>> {
        self.completion_date
    }

    pub fn recurrence_pattern(&self) -> Option<&RecurrencePattern> {
        self.recurrence_pattern.as_ref()
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence_pattern.is_some()
    }

    /// Due date rendered in the reminder's zone (UTC when none was recorded).
    pub fn due_date_local(&self) -> DateTime<Tz> {
        in_zone(self.due_date, &self.timezone.unwrap_or(Tz::UTC))
    }

    /// Pending and due strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == ReminderStatus::Pending && self.due_date < now
    }

    /// Marks the reminder completed and returns the next occurrence, if any.
    ///
    /// # Errors
    /// - `InvalidTransition` when the reminder is not pending.
    /// - `NaiveDatetime { field: "completion_date" }` for an offset-less date.
    /// - `CompletionBeforeDue` when `completion_date < due_date`.
    pub fn complete(
        &mut self,
        completion_date: impl Into<TemporalValue>,
        clock: &impl Clock,
    ) -> DomainResult<Option<Reminder>> {
        self.ensure_pending("complete")?;
        let completion = completion_date.into().require_utc("completion_date")?;
        if completion < self.due_date {
            return Err(DomainError::CompletionBeforeDue {
                due: self.due_date.to_rfc3339(),
                completion: completion.to_rfc3339(),
            });
        }

        self.status = ReminderStatus::Completed;
        self.completion_date = Some(completion);
        self.updated_at = clock.now();

        spawn_next(self, completion, clock)
    }

    /// Dismisses a pending reminder.
    ///
    /// # Errors
    /// - `InvalidTransition` when the reminder is not pending.
    pub fn cancel(&mut self, clock: &impl Clock) -> DomainResult<()> {
        self.ensure_pending("cancel")?;
        self.status = ReminderStatus::Cancelled;
        self.updated_at = clock.now();
        Ok(())
    }

    /// Next occurrence computed from the completion date, or the due date
    /// while still open. `None` for one-off reminders or ended series.
    pub fn get_next_occurrence(&self) -> Option<DateTime<Utc>> {
        let pattern = self.recurrence_pattern.as_ref()?;
        pattern.next_after(self.completion_date.unwrap_or(self.due_date))
    }

    fn ensure_pending(&self, action: &'static str) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                action,
                current: self.status.as_str(),
            });
        }
        Ok(())
    }
}

/// Builds the successor of a recurring reminder completed at `completion_date`.
///
/// The successor is a fresh pending reminder sharing contact, title,
/// description, note, pattern and timezone. Returns `Ok(None)` for one-off
/// reminders and for series whose next date falls past the pattern end.
pub fn spawn_next(
    reminder: &Reminder,
    completion_date: DateTime<Utc>,
    clock: &impl Clock,
) -> DomainResult<Option<Reminder>> {
    let Some(pattern) = reminder.recurrence_pattern.as_ref() else {
        return Ok(None);
    };
    let Some(next_due) = pattern.next_after(completion_date) else {
        return Ok(None);
    };

    let request = NewReminder {
        contact_id: reminder.contact_id,
        title: reminder.title.clone(),
        due_date: TemporalValue::from(next_due),
        description: reminder.description.clone(),
        recurrence_pattern: Some(pattern.clone()),
        note_id: reminder.note_id,
        timezone: reminder.timezone,
    };
    Reminder::create(request, clock).map(Some)
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl TryFrom<ReminderRecord> for Reminder {
    type Error = DomainError;

    fn try_from(value: ReminderRecord) -> Result<Self, Self::Error> {
        let title = value.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }

        match (value.status, value.completion_date) {
            (ReminderStatus::Completed, None) => {
                return Err(DomainError::InconsistentReminder(
                    "completed reminder is missing completion_date",
                ));
            }
            (ReminderStatus::Completed, Some(completion)) if completion < value.due_date => {
                return Err(DomainError::CompletionBeforeDue {
                    due: value.due_date.to_rfc3339(),
                    completion: completion.to_rfc3339(),
                });
            }
            (ReminderStatus::Pending | ReminderStatus::Cancelled, Some(_)) => {
                return Err(DomainError::InconsistentReminder(
                    "completion_date is only valid for completed reminders",
                ));
            }
            _ => {}
        }

        Ok(Self {
            id: value.id,
            contact_id: value.contact_id,
            note_id: value.note_id,
            title,
            description: normalize_description(value.description),
            due_date: value.due_date,
            status: value.status,
            completion_date: value.completion_date,
            recurrence_pattern: value.recurrence_pattern,
            timezone: value.timezone,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl From<Reminder> for ReminderRecord {
    fn from(value: Reminder) -> Self {
        Self {
            id: value.id,
            contact_id: value.contact_id,
            note_id: value.note_id,
            title: value.title,
            description: value.description,
            due_date: value.due_date,
            status: value.status,
            completion_date: value.completion_date,
            recurrence_pattern: value.recurrence_pattern,
            timezone: value.timezone,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
