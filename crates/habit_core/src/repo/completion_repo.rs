//! Completion storage contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve the shared calendar-day row for a date (find-or-create).
//! - Add, remove and read (task, day) completion pairs.
//!
//! # Invariants
//! - `calendar_days.date` is unique; find-or-create is an upsert, so two
//!   first completions of the same date never produce two rows.
//! - `(task_uuid, day_id)` is the primary key of `task_completions`; a losing
//!   concurrent insert is a no-op, not an error.
//! - Calendar days are never updated or deleted here.

use crate::model::day::{CalendarDay, DayId};
use crate::model::task::TaskId;
use crate::repo::{date_to_db, ensure_connection_ready, parse_date, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

const CALENDAR_DAY_COLUMNS: &[&str] = &["id", "date"];
const COMPLETION_COLUMNS: &[&str] = &["task_uuid", "day_id", "created_at"];

/// Storage operations the completion toggle needs.
///
/// Implementations must back `find_or_create_day` and `insert_completion` with
/// uniqueness guarantees that hold across concurrent callers.
pub trait CompletionStore {
    /// Returns the calendar day for `date`, creating it when absent.
    fn find_or_create_day(&self, date: NaiveDate) -> RepoResult<CalendarDay>;
    /// Returns the calendar day for `date` without creating it.
    fn find_day(&self, date: NaiveDate) -> RepoResult<Option<CalendarDay>>;
    fn completion_exists(&self, task_id: TaskId, day_id: DayId) -> RepoResult<bool>;
    /// Inserts the pair. Returns `false` when it already existed.
    fn insert_completion(&self, task_id: TaskId, day_id: DayId) -> RepoResult<bool>;
    /// Removes the pair. Returns `false` when it was already absent.
    fn delete_completion(&self, task_id: TaskId, day_id: DayId) -> RepoResult<bool>;
    /// All dates the task was completed on, ascending.
    fn completed_dates(&self, task_id: TaskId) -> RepoResult<BTreeSet<NaiveDate>>;
}

/// SQLite-backed completion store.
pub struct SqliteCompletionStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompletionStore<'conn> {
    /// Creates store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                ("calendar_days", CALENDAR_DAY_COLUMNS),
                ("task_completions", COMPLETION_COLUMNS),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl CompletionStore for SqliteCompletionStore<'_> {
    fn find_or_create_day(&self, date: NaiveDate) -> RepoResult<CalendarDay> {
        let date_text = date_to_db(date);
        self.conn.execute(
            "INSERT INTO calendar_days (date) VALUES (?1)
             ON CONFLICT(date) DO NOTHING;",
            [date_text.as_str()],
        )?;

        let id: DayId = self.conn.query_row(
            "SELECT id FROM calendar_days WHERE date = ?1;",
            [date_text.as_str()],
            |row| row.get(0),
        )?;

        Ok(CalendarDay { id, date })
    }

    fn find_day(&self, date: NaiveDate) -> RepoResult<Option<CalendarDay>> {
        let id: Option<DayId> = self
            .conn
            .query_row(
                "SELECT id FROM calendar_days WHERE date = ?1;",
                [date_to_db(date)],
                |row| row.get(0),
            )
            .optional()?;

        Ok(id.map(|id| CalendarDay { id, date }))
    }

    fn completion_exists(&self, task_id: TaskId, day_id: DayId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM task_completions
                WHERE task_uuid = ?1 AND day_id = ?2
            );",
            params![task_id.to_string(), day_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_completion(&self, task_id: TaskId, day_id: DayId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT INTO task_completions (task_uuid, day_id) VALUES (?1, ?2)
             ON CONFLICT(task_uuid, day_id) DO NOTHING;",
            params![task_id.to_string(), day_id],
        )?;
        Ok(changed == 1)
    }

    fn delete_completion(&self, task_id: TaskId, day_id: DayId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM task_completions WHERE task_uuid = ?1 AND day_id = ?2;",
            params![task_id.to_string(), day_id],
        )?;
        Ok(changed == 1)
    }

    fn completed_dates(&self, task_id: TaskId) -> RepoResult<BTreeSet<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.date
             FROM task_completions tc
             INNER JOIN calendar_days d ON d.id = tc.day_id
             WHERE tc.task_uuid = ?1;",
        )?;

        let mut rows = stmt.query([task_id.to_string()])?;
        let mut dates = BTreeSet::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            dates.insert(parse_date(&value, "calendar_days.date")?);
        }

        Ok(dates)
    }
}
