//! Temporal domain core for the Rolodex contact manager.
//! This crate is the single source of truth for reminder, recurrence and
//! tag cadence rules.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod time;

pub use config::{ConfigError, CoreConfig, LogLevel};
pub use error::{DomainError, DomainResult};
pub use logging::{init_logging, init_logging_from_config, logging_status, LoggingError};
pub use model::recurrence::{RecurrencePattern, RecurrenceUnit};
pub use model::reminder::{
    spawn_next, ContactId, NewReminder, NoteId, Reminder, ReminderId, ReminderStatus,
};
pub use model::tag::{
    EntityId, Tag, TagCadence, TagId, TagKey, TaggedEntityType, MAX_FREQUENCY_DAYS,
    MIN_FREQUENCY_DAYS,
};
pub use repo::reminder_repo::{InMemoryReminderRepository, ReminderRepository};
pub use repo::tag_repo::{InMemoryTagRepository, TagRepository};
pub use repo::{RepoError, RepoResult};
pub use service::error::{ServiceError, ServiceResult};
pub use service::reminder_service::{
    CompletionOutcome, CreateReminderRequest, RecurrenceRequest, ReminderService,
};
pub use service::tag_service::{StaleTag, TagService};
pub use time::clock::{Clock, FixedClock, SystemClock};
pub use time::temporal::TemporalValue;

/// Minimal health-check API for embedding smoke tests.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
