//! Time primitives shared by the reminder and tag cadence models.
//!
//! # Responsibility
//! - Gate every timestamp entering the core through `TemporalValue`.
//! - Provide the injected `Clock` capability used wherever "now" matters.
//!
//! # Invariants
//! - Stored and compared instants are always `DateTime<Utc>`.
//! - No code in core reads wall-clock time except `SystemClock`.

pub mod clock;
pub mod temporal;
