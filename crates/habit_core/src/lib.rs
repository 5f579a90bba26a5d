//! Core domain logic for the habit tracker.
//! This crate is the single source of truth for recurrence, completion and
//! streak invariants; web and CLI layers call into it with plain values.

pub mod db;
pub mod logging;
pub mod model;
pub mod progress;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::day::{CalendarDay, DayId};
pub use model::recurrence::{ActiveDays, WEEK_ORDER};
pub use model::task::{Task, TaskDraft, TaskId, TaskValidationError, UserId};
pub use progress::calendar::{
    build_activity_calendar, ActivityCalendar, CalendarCell, DEFAULT_WEEKS_BACK,
};
pub use progress::streak::{current_streak_start, streak_length, streak_text, STREAK_GRACE_DAYS};
pub use progress::summary::{summarize, TaskProgress};
pub use progress::{ProgressError, ProgressResult};
pub use repo::completion_repo::{CompletionStore, SqliteCompletionStore};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::completion_service::{
    CompletionService, CompletionServiceError, CompletionServiceResult, ToggleOutcome,
};
pub use service::task_service::{TaskService, TaskServiceError, TaskServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
