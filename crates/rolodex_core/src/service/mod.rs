//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model transitions with repository load/save calls.
//! - Keep callers decoupled from storage details and from "now".
//!
//! # Invariants
//! - Services never bypass model validation; every mutation goes through the
//!   aggregate's own methods.
//! - Log lines carry ids and codes only, never titles or descriptions.

pub mod error;
pub mod reminder_service;
pub mod tag_service;
