//! Service-level error envelope.

use crate::error::DomainError;
use crate::model::reminder::ReminderId;
use crate::model::tag::TagKey;
use crate::repo::error::RepoError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by reminder and tag use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Input or lifecycle rule violation.
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("reminder not found: {0}")]
    ReminderNotFound(ReminderId),
    #[error("tag not found: {0}")]
    TagNotFound(TagKey),
    /// Persistence-layer failure.
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ReminderNotFound(id) => Self::ReminderNotFound(id),
            RepoError::TagNotFound(key) => Self::TagNotFound(key),
            other => Self::Repo(other),
        }
    }
}

impl ServiceError {
    /// Stable snake_case code for structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Domain(err) => err.code(),
            Self::ReminderNotFound(_) => "reminder_not_found",
            Self::TagNotFound(_) => "tag_not_found",
            Self::Repo(_) => "repo_failure",
        }
    }
}
