//! Temporal domain model for contact follow-ups.
//!
//! # Responsibility
//! - Define recurrence rules, the reminder lifecycle and tag cadences.
//! - Keep every rule pure: no I/O, "now" always arrives through `Clock`.
//!
//! # Invariants
//! - Every stored instant is UTC; zone information is validated at entry.
//! - Each aggregate is mutated only through its own methods.

pub mod recurrence;
pub mod reminder;
pub mod tag;
