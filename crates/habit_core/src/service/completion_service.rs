//! Completion toggle and progress use-cases.
//!
//! # Responsibility
//! - Flip a task's completion for one calendar day.
//! - Read completion dates back and summarize progress for display.
//!
//! # Invariants
//! - Each toggle call applies exactly one flip and reports the resulting state.
//! - The calendar day for a date is resolved through the shared registry, never
//!   created per task.
//! - Task existence and ownership are checked by the caller.

use crate::model::task::{Task, TaskId};
use crate::progress::summary::{summarize, TaskProgress};
use crate::progress::ProgressError;
use crate::repo::completion_repo::CompletionStore;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

#[derive(Debug)]
pub enum CompletionServiceError {
    Repo(RepoError),
    Progress(ProgressError),
}

impl Display for CompletionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Progress(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CompletionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Progress(err) => Some(err),
        }
    }
}

impl From<RepoError> for CompletionServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ProgressError> for CompletionServiceError {
    fn from(value: ProgressError) -> Self {
        Self::Progress(value)
    }
}

pub type CompletionServiceResult<T> = Result<T, CompletionServiceError>;

/// Result of one toggle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub task_id: TaskId,
    pub date: NaiveDate,
    /// Completion state after the call.
    pub completed: bool,
}

/// Completion service facade.
pub struct CompletionService<S: CompletionStore> {
    store: S,
}

impl<S: CompletionStore> CompletionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Flips whether `task_id` is completed on `date`.
    ///
    /// A concurrent caller may win the race between the existence check and
    /// the write; the store then reports a no-op, and the outcome still
    /// reflects the state this call asked for.
    pub fn toggle(
        &self,
        task_id: TaskId,
        date: NaiveDate,
    ) -> CompletionServiceResult<ToggleOutcome> {
        let started_at = Instant::now();
        match self.toggle_inner(task_id, date) {
            Ok(completed) => {
                info!(
                    "event=completion_toggle module=completion status=ok task_id={task_id} date={date} completed={completed} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(ToggleOutcome {
                    task_id,
                    date,
                    completed,
                })
            }
            Err(err) => {
                error!(
                    "event=completion_toggle module=completion status=error task_id={task_id} date={date} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }

    fn toggle_inner(&self, task_id: TaskId, date: NaiveDate) -> Result<bool, RepoError> {
        let day = self.store.find_or_create_day(date)?;
        if self.store.completion_exists(task_id, day.id)? {
            self.store.delete_completion(task_id, day.id)?;
            Ok(false)
        } else {
            self.store.insert_completion(task_id, day.id)?;
            Ok(true)
        }
    }

    /// Returns whether `task_id` is completed on `date` without touching the
    /// calendar day registry.
    pub fn is_completed_on(
        &self,
        task_id: TaskId,
        date: NaiveDate,
    ) -> CompletionServiceResult<bool> {
        match self.store.find_day(date)? {
            Some(day) => Ok(self.store.completion_exists(task_id, day.id)?),
            None => Ok(false),
        }
    }

    pub fn completed_dates(
        &self,
        task_id: TaskId,
    ) -> CompletionServiceResult<BTreeSet<NaiveDate>> {
        Ok(self.store.completed_dates(task_id)?)
    }

    /// Loads completions for `task` and summarizes streak and calendar.
    pub fn progress(
        &self,
        task: &Task,
        today: NaiveDate,
        weeks_back: u32,
    ) -> CompletionServiceResult<TaskProgress> {
        let completed = self.store.completed_dates(task.uuid)?;
        Ok(summarize(task, &completed, today, weeks_back)?)
    }
}
