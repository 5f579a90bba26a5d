//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `tasks` table.
//! - Persist recurrence as its 7-bit integer form.
//!
//! # Invariants
//! - Write paths normalize and validate the draft before SQL mutations.
//! - Listing is scoped to one creator and ordered `created_at ASC, uuid ASC`.
//! - Deleting a task cascades to its completions; calendar days stay.

use crate::model::recurrence::ActiveDays;
use crate::model::task::{Task, TaskDraft, TaskId, UserId};
use crate::repo::{date_to_db, ensure_connection_ready, parse_date, parse_uuid};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    creator_uuid,
    name,
    description,
    start_date,
    reminder_time,
    recurrence,
    created_at,
    updated_at
FROM tasks";

const TASK_COLUMNS: &[&str] = &[
    "uuid",
    "creator_uuid",
    "name",
    "description",
    "start_date",
    "reminder_time",
    "recurrence",
    "created_at",
    "updated_at",
];

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    /// Creates a task owned by `creator_id` and returns its new id.
    fn create_task(&self, creator_id: UserId, draft: &TaskDraft) -> RepoResult<TaskId>;
    /// Replaces all editable fields of an existing task.
    fn update_task(&self, task_id: TaskId, draft: &TaskDraft) -> RepoResult<()>;
    fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks_for_creator(&self, creator_id: UserId) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, task_id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("tasks", TASK_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, creator_id: UserId, draft: &TaskDraft) -> RepoResult<TaskId> {
        let draft = draft.normalized()?;
        let task_id = Uuid::new_v4();

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                creator_uuid,
                name,
                description,
                start_date,
                reminder_time,
                recurrence
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task_id.to_string(),
                creator_id.to_string(),
                draft.name.as_str(),
                draft.description.as_deref(),
                date_to_db(draft.start_date),
                draft.reminder_time.as_deref(),
                i64::from(draft.active_days.encode()),
            ],
        )?;

        Ok(task_id)
    }

    fn update_task(&self, task_id: TaskId, draft: &TaskDraft) -> RepoResult<()> {
        let draft = draft.normalized()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                name = ?1,
                description = ?2,
                start_date = ?3,
                reminder_time = ?4,
                recurrence = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                draft.name.as_str(),
                draft.description.as_deref(),
                date_to_db(draft.start_date),
                draft.reminder_time.as_deref(),
                i64::from(draft.active_days.encode()),
                task_id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task_id));
        }

        Ok(())
    }

    fn get_task(&self, task_id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([task_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks_for_creator(&self, creator_id: UserId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE creator_uuid = ?1
             ORDER BY created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([creator_id.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, task_id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [task_id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(task_id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let creator_text: String = row.get("creator_uuid")?;
    let start_text: String = row.get("start_date")?;

    // Bits above the seven weekdays are ignored on read.
    let recurrence = ActiveDays::decode(row.get("recurrence")?);

    Ok(Task {
        uuid: parse_uuid(&uuid_text, "tasks.uuid")?,
        creator_id: parse_uuid(&creator_text, "tasks.creator_uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
        start_date: parse_date(&start_text, "tasks.start_date")?,
        reminder_time: row.get("reminder_time")?,
        recurrence,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
