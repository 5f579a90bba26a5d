//! Shared calendar day record.
//!
//! # Invariants
//! - At most one `CalendarDay` exists per date across all tasks.
//! - Rows are created lazily by the completion toggle and never mutated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage id of a calendar day row.
pub type DayId = i64;

/// Text form used when dates are persisted.
pub const DATE_STORAGE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDay {
    pub id: DayId,
    pub date: NaiveDate,
}
