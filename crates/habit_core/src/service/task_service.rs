//! Task use-case service.
//!
//! # Responsibility
//! - Provide validated create/edit/get/list/delete entry points.
//! - Scope lookups to the owning user when the caller asks for it.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - A task owned by someone else is reported as not found.

use crate::model::task::{Task, TaskDraft, TaskId, TaskValidationError, UserId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    Validation(TaskValidationError),
    TaskNotFound(TaskId),
    Repo(RepoError),
    /// Write succeeded but the row could not be read back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(task_id) => Self::TaskNotFound(task_id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task service facade.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task for `creator_id` and returns the stored record.
    pub fn create_task(&self, creator_id: UserId, draft: &TaskDraft) -> TaskServiceResult<Task> {
        let task_id = self.repo.create_task(creator_id, draft)?;
        let task = self
            .repo
            .get_task(task_id)?
            .ok_or(TaskServiceError::InconsistentState("created task missing"))?;

        info!(
            "event=task_create module=task status=ok task_id={task_id} recurrence={}",
            task.recurrence.encode()
        );
        Ok(task)
    }

    /// Replaces the editable fields of a task and returns the stored record.
    pub fn update_task(&self, task_id: TaskId, draft: &TaskDraft) -> TaskServiceResult<Task> {
        self.repo.update_task(task_id, draft)?;
        let task = self
            .repo
            .get_task(task_id)?
            .ok_or(TaskServiceError::InconsistentState("updated task missing"))?;

        info!(
            "event=task_update module=task status=ok task_id={task_id} recurrence={}",
            task.recurrence.encode()
        );
        Ok(task)
    }

    pub fn get_task(&self, task_id: TaskId) -> TaskServiceResult<Option<Task>> {
        Ok(self.repo.get_task(task_id)?)
    }

    /// Loads a task only when `creator_id` owns it.
    pub fn get_task_for_creator(
        &self,
        creator_id: UserId,
        task_id: TaskId,
    ) -> TaskServiceResult<Task> {
        self.repo
            .get_task(task_id)?
            .filter(|task| task.creator_id == creator_id)
            .ok_or(TaskServiceError::TaskNotFound(task_id))
    }

    /// Lists tasks of one creator, oldest first.
    pub fn list_tasks(&self, creator_id: UserId) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks_for_creator(creator_id)?)
    }

    /// Deletes a task together with its completions.
    pub fn delete_task(&self, task_id: TaskId) -> TaskServiceResult<()> {
        self.repo.delete_task(task_id)?;
        info!("event=task_delete module=task status=ok task_id={task_id}");
        Ok(())
    }
}
