//! Domain model for recurring tasks and their completion days.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the weekly recurrence encoding shared by storage and display.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Calendar days are shared by date, never owned by one task.

pub mod day;
pub mod recurrence;
pub mod task;
