//! Pure progress computations over a task's completion dates.
//!
//! # Responsibility
//! - Derive the current streak and the rolling activity calendar.
//! - Combine them with the recurrence label for display callers.
//!
//! # Invariants
//! - No I/O: every function takes plain dates and returns plain records.
//! - `today` is always supplied by the caller, already normalized to UTC.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod calendar;
pub mod streak;
pub mod summary;

pub type ProgressResult<T> = Result<T, ProgressError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    /// The requested calendar window leaves the supported date range.
    DateOutOfRange { today: NaiveDate, weeks_back: u32 },
}

impl Display for ProgressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DateOutOfRange { today, weeks_back } => write!(
                f,
                "activity calendar of {weeks_back} weeks before {today} is out of range"
            ),
        }
    }
}

impl Error for ProgressError {}
