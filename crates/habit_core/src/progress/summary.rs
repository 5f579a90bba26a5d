//! Display-ready progress for one task.

use crate::model::task::{Task, TaskId};
use crate::progress::calendar::{build_activity_calendar, ActivityCalendar};
use crate::progress::streak::{current_streak_start, streak_length, streak_text};
use crate::progress::ProgressResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub task_id: TaskId,
    /// Recurrence label, e.g. `Every weekday` or `M, W, F`.
    pub recurrence_label: String,
    pub streak_start: Option<NaiveDate>,
    /// Consecutive days in the current streak, `0` without one.
    pub streak_days: u32,
    pub streak_text: String,
    pub due_today: bool,
    pub completed_today: bool,
    pub calendar: ActivityCalendar,
}

/// Summarizes `task` as of `today` from its completion dates.
pub fn summarize(
    task: &Task,
    completed: &BTreeSet<NaiveDate>,
    today: NaiveDate,
    weeks_back: u32,
) -> ProgressResult<TaskProgress> {
    let streak_start = current_streak_start(completed, today);
    let calendar = build_activity_calendar(completed, today, weeks_back)?;

    Ok(TaskProgress {
        task_id: task.uuid,
        recurrence_label: task.recurrence.label(),
        streak_start,
        streak_days: streak_start.map_or(0, |start| streak_length(start, completed)),
        streak_text: streak_text(streak_start),
        due_today: task.is_due_on(today),
        completed_today: completed.contains(&today),
        calendar,
    })
}
