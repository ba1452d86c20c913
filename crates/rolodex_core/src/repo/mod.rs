//! Persistence contracts consumed by the service layer.
//!
//! # Responsibility
//! - Define the load/save/query primitives the domain core depends on.
//! - Ship an in-memory implementation for embedding and tests.
//!
//! # Invariants
//! - Repositories store aggregates as given; validation happens in the model.
//! - Lookups that require an existing row return `NotFound` variants.

pub mod error;
pub mod reminder_repo;
pub mod tag_repo;

pub use error::{RepoError, RepoResult};
