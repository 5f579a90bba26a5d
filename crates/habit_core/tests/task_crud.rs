use chrono::{NaiveDate, Weekday};
use habit_core::db::migrations::latest_version;
use habit_core::db::open_db_in_memory;
use habit_core::{
    ActiveDays, RepoError, SqliteTaskRepository, TaskDraft, TaskRepository, TaskService,
    TaskServiceError, TaskValidationError,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn draft(name: &str, active_days: ActiveDays) -> TaskDraft {
    TaskDraft {
        name: name.to_string(),
        description: None,
        start_date: date(2024, 1, 1),
        reminder_time: None,
        active_days,
    }
}

fn task_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .expect("count tasks")
}

#[test]
fn create_and_get_roundtrip_normalizes_text_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let creator = Uuid::new_v4();

    let mut input = draft("  Stretch  ", ActiveDays::WEEKDAYS);
    input.description = Some("   ".to_string());
    input.reminder_time = Some("07:30".to_string());

    let created = service.create_task(creator, &input).unwrap();
    assert_eq!(created.name, "Stretch");
    assert_eq!(created.description, None);
    assert_eq!(created.reminder_time.as_deref(), Some("07:30"));
    assert_eq!(created.creator_id, creator);

    let loaded = service.get_task(created.uuid).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.recurrence, ActiveDays::WEEKDAYS);
    assert_eq!(loaded.start_date, date(2024, 1, 1));
}

#[test]
fn recurrence_is_persisted_as_seven_bit_integer() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    let pattern = ActiveDays::from_weekdays([Weekday::Sun, Weekday::Wed]);
    let task = service
        .create_task(Uuid::new_v4(), &draft("Read", pattern))
        .unwrap();

    let stored: i64 = conn
        .query_row(
            "SELECT recurrence FROM tasks WHERE uuid = ?1;",
            [task.uuid.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, 0b000_1001);
}

#[test]
fn validation_failures_block_writes() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let creator = Uuid::new_v4();

    let err = service
        .create_task(creator, &draft("   ", ActiveDays::EVERY_DAY))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Validation(TaskValidationError::EmptyName)
    ));

    let err = service
        .create_task(creator, &draft("Run", ActiveDays::NONE))
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Validation(TaskValidationError::NoActiveDays)
    ));

    assert_eq!(task_count(&conn), 0);
}

#[test]
fn reminder_time_is_stored_verbatim() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).expect("task repo"));
    let creator = Uuid::new_v4();

    for reminder in ["7:30", "7:30 AM", "24:00", " after lunch "] {
        let mut input = draft("Stretch", ActiveDays::EVERY_DAY);
        input.reminder_time = Some(reminder.to_string());

        let created = service.create_task(creator, &input).unwrap();
        let loaded = service.get_task(created.uuid).unwrap().unwrap();
        assert_eq!(loaded.reminder_time.as_deref(), Some(reminder));
    }
}

#[test]
fn update_replaces_editable_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let task = service
        .create_task(Uuid::new_v4(), &draft("Walk", ActiveDays::EVERY_DAY))
        .unwrap();

    let mut edit = task.draft();
    edit.name = "Walk the dog".to_string();
    edit.description = Some("around the block".to_string());
    edit.start_date = date(2024, 2, 1);
    edit.active_days = ActiveDays::WEEKEND;

    let updated = service.update_task(task.uuid, &edit).unwrap();
    assert_eq!(updated.uuid, task.uuid);
    assert_eq!(updated.name, "Walk the dog");
    assert_eq!(updated.description.as_deref(), Some("around the block"));
    assert_eq!(updated.start_date, date(2024, 2, 1));
    assert_eq!(updated.recurrence, ActiveDays::WEEKEND);
    assert_eq!(updated.recurrence.label(), "Every weekend");
}

#[test]
fn update_and_delete_of_missing_task_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    let err = service
        .update_task(missing, &draft("Ghost", ActiveDays::EVERY_DAY))
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::TaskNotFound(id) if id == missing));

    let err = service.delete_task(missing).unwrap_err();
    assert!(matches!(err, TaskServiceError::TaskNotFound(id) if id == missing));
}

#[test]
fn list_is_scoped_to_creator_and_ordered_by_creation() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let first = service
        .create_task(alice, &draft("first", ActiveDays::EVERY_DAY))
        .unwrap();
    let second = service
        .create_task(alice, &draft("second", ActiveDays::EVERY_DAY))
        .unwrap();
    service
        .create_task(bob, &draft("other", ActiveDays::EVERY_DAY))
        .unwrap();

    conn.execute(
        "UPDATE tasks SET created_at = ?2 WHERE uuid = ?1;",
        params![first.uuid.to_string(), 2000],
    )
    .unwrap();
    conn.execute(
        "UPDATE tasks SET created_at = ?2 WHERE uuid = ?1;",
        params![second.uuid.to_string(), 1000],
    )
    .unwrap();

    let listed: Vec<Uuid> = service
        .list_tasks(alice)
        .unwrap()
        .into_iter()
        .map(|task| task.uuid)
        .collect();
    assert_eq!(listed, vec![second.uuid, first.uuid]);
}

#[test]
fn ownership_lookup_hides_other_users_tasks() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();
    let task = service
        .create_task(owner, &draft("Private", ActiveDays::EVERY_DAY))
        .unwrap();

    assert_eq!(
        service.get_task_for_creator(owner, task.uuid).unwrap().uuid,
        task.uuid
    );
    let err = service
        .get_task_for_creator(Uuid::new_v4(), task.uuid)
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::TaskNotFound(_)));
}

#[test]
fn due_dates_follow_start_date_and_recurrence() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let mut input = draft("Gym", ActiveDays::from_weekdays([Weekday::Mon]));
    input.start_date = date(2024, 1, 8);
    let task = service.create_task(Uuid::new_v4(), &input).unwrap();

    // Jan 1 is a Monday before the start date.
    assert!(!task.is_due_on(date(2024, 1, 1)));
    assert!(task.is_due_on(date(2024, 1, 8)));
    assert!(!task.is_due_on(date(2024, 1, 9)));
    assert!(task.is_due_on(date(2024, 1, 15)));
}

#[test]
fn corrupted_persisted_date_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let task_id = repo
        .create_task(Uuid::new_v4(), &draft("Broken", ActiveDays::EVERY_DAY))
        .unwrap();

    conn.execute("UPDATE tasks SET start_date = 'someday';", [])
        .unwrap();

    let err = repo.get_task(task_id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn stored_recurrence_outside_seven_bits_is_masked_on_read() {
    let conn = open_db_in_memory().expect("open in-memory db");
    let repo = SqliteTaskRepository::try_new(&conn).expect("task repo");
    let task_id = repo
        .create_task(Uuid::new_v4(), &draft("Legacy", ActiveDays::EVERY_DAY))
        .unwrap();

    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .expect("disable check constraints");
    conn.execute("UPDATE tasks SET recurrence = 129;", [])
        .unwrap();

    let task = repo.get_task(task_id).unwrap().unwrap();
    assert_eq!(task.recurrence, ActiveDays::from_weekdays([Weekday::Sun]));
    assert_eq!(task.recurrence.label(), "Su");
}

#[test]
fn task_serializes_with_iso_dates() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let task = service
        .create_task(Uuid::new_v4(), &draft("Journal", ActiveDays::EVERY_DAY))
        .unwrap();

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["start_date"], "2024-01-01");
    assert_eq!(value["recurrence"]["monday"], true);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTaskRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_tasks_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTaskRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("tasks"))
    ));
}
