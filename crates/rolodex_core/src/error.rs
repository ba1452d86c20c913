//! Domain validation errors.
//!
//! # Responsibility
//! - Provide one closed error taxonomy for temporal, reminder and tag rules.
//! - Keep messages stable and naming the violated field or state.
//!
//! # Invariants
//! - Every variant is a validation failure raised at the offending call.
//! - No variant is transient; retrying the same input fails the same way.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Validation failure raised by the temporal domain core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A timestamp without timezone information was supplied.
    #[error("{field} must be timezone-aware")]
    NaiveDatetime { field: &'static str },

    /// Timestamp text could not be parsed at all.
    #[error("invalid timestamp `{value}`: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("recurrence interval must be >= 1, got {0}")]
    InvalidInterval(i64),

    #[error("invalid recurrence unit `{0}`; expected one of DAY|WEEK|MONTH|YEAR")]
    InvalidUnit(String),

    #[error("recurrence end_date ({end}) must be after start_date ({start})")]
    InvalidDateRange { start: String, end: String },

    #[error("reminder title must not be empty")]
    EmptyTitle,

    #[error("completion_date ({completion}) must not be before due_date ({due})")]
    CompletionBeforeDue { due: String, completion: String },

    #[error("cannot {action} reminder in status `{current}`")]
    InvalidTransition {
        action: &'static str,
        current: &'static str,
    },

    #[error("invalid reminder status `{0}`; expected one of pending|completed|cancelled")]
    InvalidStatus(String),

    /// Persisted reminder fields contradict each other.
    #[error("inconsistent reminder state: {0}")]
    InconsistentReminder(&'static str),

    #[error("frequency_days must be between {min} and {max}, got {value}")]
    InvalidFrequency { value: i64, min: u32, max: u32 },

    #[error("tag name must not be empty")]
    EmptyTagName,

    #[error("invalid tagged entity type `{0}`; expected one of contact|note|statement")]
    InvalidEntityType(String),

    #[error("unknown IANA timezone `{0}`")]
    InvalidTimezone(String),
}

impl DomainError {
    /// Stable snake_case code for structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NaiveDatetime { .. } => "naive_datetime",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
            Self::InvalidInterval(_) => "invalid_interval",
            Self::InvalidUnit(_) => "invalid_unit",
            Self::InvalidDateRange { .. } => "invalid_date_range",
            Self::EmptyTitle => "empty_title",
            Self::CompletionBeforeDue { .. } => "completion_before_due",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::InvalidStatus(_) => "invalid_status",
            Self::InconsistentReminder(_) => "inconsistent_reminder",
            Self::InvalidFrequency { .. } => "invalid_frequency",
            Self::EmptyTagName => "empty_tag_name",
            Self::InvalidEntityType(_) => "invalid_entity_type",
            Self::InvalidTimezone(_) => "invalid_timezone",
        }
    }
}
