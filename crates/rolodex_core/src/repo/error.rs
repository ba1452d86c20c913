use crate::model::reminder::ReminderId;
use crate::model::tag::TagKey;
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure for reminder and tag storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("reminder not found: {0}")]
    ReminderNotFound(ReminderId),
    #[error("tag not found: {0}")]
    TagNotFound(TagKey),
    /// Backend-specific failure surfaced by non-memory implementations.
    #[error("storage backend error: {0}")]
    Backend(String),
}
