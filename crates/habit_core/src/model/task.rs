//! Recurring task domain model.
//!
//! # Responsibility
//! - Define the task record handed between storage and callers.
//! - Validate user-supplied drafts before they reach storage.
//!
//! # Invariants
//! - `name` is trimmed and never blank.
//! - `recurrence` has at least one active weekday.
//! - `reminder_time` is opaque and stored verbatim.

use crate::model::recurrence::ActiveDays;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Identifier of the owning user. Users live outside this crate.
pub type UserId = Uuid;

/// Validation failures for task drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Name is blank after trim.
    EmptyName,
    /// No weekday is marked active.
    NoActiveDays,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name is required"),
            Self::NoActiveDays => write!(f, "at least one day must be marked active"),
        }
    }
}

impl Error for TaskValidationError {}

/// User-editable task fields, as submitted by a create or edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub reminder_time: Option<String>,
    pub active_days: ActiveDays,
}

impl TaskDraft {
    /// Validates and normalizes the draft.
    ///
    /// Trims name and description; a blank description becomes `None`.
    pub fn normalized(&self) -> Result<Self, TaskValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TaskValidationError::EmptyName);
        }
        if self.active_days.is_empty() {
            return Err(TaskValidationError::NoActiveDays);
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            description,
            start_date: self.start_date,
            reminder_time: self.reminder_time.clone(),
            active_days: self.active_days,
        })
    }
}

/// Persisted recurring task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub uuid: TaskId,
    pub creator_id: UserId,
    pub name: String,
    pub description: Option<String>,
    /// First calendar day the task is active.
    pub start_date: NaiveDate,
    /// Opaque time of day, passed through unmodified.
    pub reminder_time: Option<String>,
    pub recurrence: ActiveDays,
    /// Epoch milliseconds, maintained by storage.
    pub created_at: i64,
    /// Epoch milliseconds, maintained by storage.
    pub updated_at: i64,
}

impl Task {
    /// Returns whether the task is due on `date`.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.recurrence.is_active_on(date.weekday())
    }

    /// Returns the editable fields of this task.
    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            reminder_time: self.reminder_time.clone(),
            active_days: self.recurrence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskDraft, TaskValidationError};
    use crate::model::recurrence::ActiveDays;
    use chrono::NaiveDate;

    fn draft(name: &str, reminder_time: Option<&str>) -> TaskDraft {
        TaskDraft {
            name: name.to_string(),
            description: Some("  ".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            reminder_time: reminder_time.map(str::to_string),
            active_days: ActiveDays::EVERY_DAY,
        }
    }

    #[test]
    fn normalized_trims_name_and_drops_blank_description() {
        let normalized = draft("  Run  ", None).normalized().unwrap();
        assert_eq!(normalized.name, "Run");
        assert_eq!(normalized.description, None);
    }

    #[test]
    fn normalized_keeps_reminder_time_verbatim() {
        for value in ["7:30 AM", "24:00", " after lunch "] {
            let normalized = draft("Run", Some(value)).normalized().unwrap();
            assert_eq!(normalized.reminder_time.as_deref(), Some(value));
        }
    }

    #[test]
    fn normalized_rejects_blank_name() {
        assert_eq!(
            draft(" \t ", None).normalized(),
            Err(TaskValidationError::EmptyName)
        );
    }
}
