//! Reminder repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide load/save by id and the list queries the service layer needs.
//!
//! # Invariants
//! - `save_reminder` is an upsert keyed by reminder id.
//! - List results are ordered by `due_date ASC, id ASC`.
//! - "Overdue" means pending and `due_date < now`.

use crate::model::reminder::{ContactId, NoteId, Reminder, ReminderId, ReminderStatus};
use crate::repo::error::{RepoError, RepoResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage contract for reminders.
pub trait ReminderRepository {
    fn save_reminder(&self, reminder: &Reminder) -> RepoResult<()>;
    fn get_reminder(&self, id: ReminderId) -> RepoResult<Option<Reminder>>;
    fn list_by_contact(&self, contact_id: ContactId) -> RepoResult<Vec<Reminder>>;
    fn list_by_note(&self, note_id: NoteId) -> RepoResult<Vec<Reminder>>;
    fn list_pending(&self) -> RepoResult<Vec<Reminder>>;
    fn list_overdue(&self, now: DateTime<Utc>) -> RepoResult<Vec<Reminder>>;

    /// Loads a reminder that must exist.
    ///
    /// # Errors
    /// - `ReminderNotFound` when no row has `id`.
    fn require_reminder(&self, id: ReminderId) -> RepoResult<Reminder> {
        self.get_reminder(id)?
            .ok_or(RepoError::ReminderNotFound(id))
    }
}

/// Process-local reminder store.
#[derive(Debug, Default)]
pub struct InMemoryReminderRepository {
    rows: RwLock<BTreeMap<ReminderId, Reminder>>,
}

impl InMemoryReminderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reminders, in any status.
    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, BTreeMap<ReminderId, Reminder>>> {
        self.rows
            .read()
            .map_err(|_| RepoError::Backend("reminder store lock poisoned".to_string()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, BTreeMap<ReminderId, Reminder>>> {
        self.rows
            .write()
            .map_err(|_| RepoError::Backend("reminder store lock poisoned".to_string()))
    }

    fn select(&self, filter: impl Fn(&Reminder) -> bool) -> RepoResult<Vec<Reminder>> {
        let mut selected = self
            .read()?
            .values()
            .filter(|reminder| filter(reminder))
            .cloned()
            .collect::<Vec<_>>();
        selected.sort_by(|left, right| {
            left.due_date()
                .cmp(&right.due_date())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(selected)
    }
}

impl ReminderRepository for InMemoryReminderRepository {
    fn save_reminder(&self, reminder: &Reminder) -> RepoResult<()> {
        self.write()?.insert(reminder.id(), reminder.clone());
        Ok(())
    }

    fn get_reminder(&self, id: ReminderId) -> RepoResult<Option<Reminder>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn list_by_contact(&self, contact_id: ContactId) -> RepoResult<Vec<Reminder>> {
        self.select(|reminder| reminder.contact_id() == contact_id)
    }

    fn list_by_note(&self, note_id: NoteId) -> RepoResult<Vec<Reminder>> {
        self.select(|reminder| reminder.note_id() == Some(note_id))
    }

    fn list_pending(&self) -> RepoResult<Vec<Reminder>> {
        self.select(|reminder| reminder.status() == ReminderStatus::Pending)
    }

    fn list_overdue(&self, now: DateTime<Utc>) -> RepoResult<Vec<Reminder>> {
        self.select(|reminder| reminder.is_overdue(now))
    }
}

impl<R: ReminderRepository + ?Sized> ReminderRepository for &R {
    fn save_reminder(&self, reminder: &Reminder) -> RepoResult<()> {
        (**self).save_reminder(reminder)
    }

    fn get_reminder(&self, id: ReminderId) -> RepoResult<Option<Reminder>> {
        (**self).get_reminder(id)
    }

    fn list_by_contact(&self, contact_id: ContactId) -> RepoResult<Vec<Reminder>> {
        (**self).list_by_contact(contact_id)
    }

    fn list_by_note(&self, note_id: NoteId) -> RepoResult<Vec<Reminder>> {
        (**self).list_by_note(note_id)
    }

    fn list_pending(&self) -> RepoResult<Vec<Reminder>> {
        (**self).list_pending()
    }

    fn list_overdue(&self, now: DateTime<Utc>) -> RepoResult<Vec<Reminder>> {
        (**self).list_overdue(now)
    }
}
