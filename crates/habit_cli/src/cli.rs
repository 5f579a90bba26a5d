//! Command-line surface for the habit core.
//!
//! # Responsibility
//! - Parse arguments and environment into core calls.
//! - Render tasks, toggles and activity calendars as plain text.
//!
//! # Invariants
//! - Every command runs against one migrated connection.
//! - Tasks owned by another user are reported as not found.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc, Weekday};
use clap::{Args, Parser, Subcommand};
use habit_core::db::open_db;
use habit_core::{
    default_log_level, init_logging, ActiveDays, ActivityCalendar, CompletionService,
    SqliteCompletionStore, SqliteTaskRepository, Task, TaskDraft, TaskId, TaskService, UserId,
    DEFAULT_WEEKS_BACK, WEEK_ORDER,
};
use rusqlite::Connection;
use std::path::PathBuf;

/// Upper bound for `show --weeks`.
const MAX_WEEKS_BACK: i64 = 52;

/// habit - recurring tasks with streaks and an activity calendar
#[derive(Parser, Debug)]
#[command(name = "habit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "HABIT_DB", default_value = "habit.db")]
    pub db: PathBuf,

    /// Absolute directory for rolling log files (logging is off without it)
    #[arg(long, global = true, env = "HABIT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, env = "HABIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Acting user id
    #[arg(
        long,
        global = true,
        env = "HABIT_USER",
        default_value = "00000000-0000-0000-0000-000000000000"
    )]
    pub user: UserId,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a recurring task
    Add(AddArgs),

    /// Edit fields of an existing task
    Edit {
        id: TaskId,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// List your tasks with their current streak
    List,

    /// Mark or unmark a task as done on a date
    Toggle {
        id: TaskId,

        /// Date to toggle (defaults to today, UTC; future dates are refused)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Show a task with its activity calendar
    Show {
        id: TaskId,

        /// Full weeks shown before the current one (at most 52)
        #[arg(
            long,
            default_value_t = DEFAULT_WEEKS_BACK,
            value_parser = clap::value_parser!(u32).range(0..=MAX_WEEKS_BACK)
        )]
        weeks: u32,
    },

    /// Delete a task and its completions
    Delete { id: TaskId },

    /// Print the core version
    Version,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    /// Active days, comma separated (e.g. sun,mon,wed)
    #[arg(long, value_delimiter = ',', value_parser = parse_weekday)]
    pub days: Vec<Weekday>,

    /// First active date (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    #[arg(long)]
    pub description: Option<String>,

    /// Reminder time of day, e.g. 07:30
    #[arg(long)]
    pub reminder: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Replace active days, comma separated
    #[arg(long, value_delimiter = ',', value_parser = parse_weekday)]
    pub days: Option<Vec<Weekday>>,

    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// New description; an empty value clears it
    #[arg(long)]
    pub description: Option<String>,

    /// New reminder time; an empty value clears it
    #[arg(long)]
    pub reminder: Option<String>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if let Some(log_dir) = &self.log_dir {
            let level = self.log_level.as_deref().unwrap_or(default_log_level());
            init_logging(level, log_dir).context("failed to initialize logging")?;
        }

        if let Commands::Version = self.command {
            println!("habit_core version={}", habit_core::core_version());
            return Ok(());
        }

        let conn = open_db(&self.db)
            .with_context(|| format!("failed to open database `{}`", self.db.display()))?;
        let today = Utc::now().date_naive();

        match self.command {
            Commands::Add(args) => add(&conn, self.user, args, today),
            Commands::Edit { id, fields } => edit(&conn, self.user, id, fields),
            Commands::List => list(&conn, self.user, today),
            Commands::Toggle { id, date } => {
                toggle(&conn, self.user, id, toggle_date(date, today)?)
            }
            Commands::Show { id, weeks } => show(&conn, self.user, id, today, weeks),
            Commands::Delete { id } => delete(&conn, self.user, id),
            Commands::Version => Ok(()),
        }
    }
}

fn add(conn: &Connection, user: UserId, args: AddArgs, today: NaiveDate) -> Result<()> {
    let tasks = TaskService::new(SqliteTaskRepository::try_new(conn)?);
    let draft = TaskDraft {
        name: args.name,
        description: args.description,
        start_date: args.start.unwrap_or(today),
        reminder_time: non_empty(args.reminder),
        active_days: ActiveDays::from_weekdays(args.days),
    };

    let task = tasks.create_task(user, &draft)?;
    println!("{}", task.uuid);
    Ok(())
}

fn edit(conn: &Connection, user: UserId, id: TaskId, fields: EditArgs) -> Result<()> {
    let tasks = TaskService::new(SqliteTaskRepository::try_new(conn)?);
    let mut draft = tasks.get_task_for_creator(user, id)?.draft();

    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(days) = fields.days {
        draft.active_days = ActiveDays::from_weekdays(days);
    }
    if let Some(start) = fields.start {
        draft.start_date = start;
    }
    if let Some(description) = fields.description {
        draft.description = Some(description);
    }
    if let Some(reminder) = fields.reminder {
        draft.reminder_time = non_empty(Some(reminder));
    }

    let task = tasks.update_task(id, &draft)?;
    print_task(&task);
    Ok(())
}

fn list(conn: &Connection, user: UserId, today: NaiveDate) -> Result<()> {
    let tasks = TaskService::new(SqliteTaskRepository::try_new(conn)?);
    let completions = CompletionService::new(SqliteCompletionStore::try_new(conn)?);

    for task in tasks.list_tasks(user)? {
        let progress = completions.progress(&task, today, 0)?;
        println!(
            "{}  {}  [{}]  {}",
            task.uuid, task.name, progress.recurrence_label, progress.streak_text
        );
    }
    Ok(())
}

fn toggle(conn: &Connection, user: UserId, id: TaskId, date: NaiveDate) -> Result<()> {
    let tasks = TaskService::new(SqliteTaskRepository::try_new(conn)?);
    tasks.get_task_for_creator(user, id)?;

    let completions = CompletionService::new(SqliteCompletionStore::try_new(conn)?);
    let outcome = completions.toggle(id, date)?;
    let state = if outcome.completed { "done" } else { "not done" };
    println!("{} {}", outcome.date, state);
    Ok(())
}

fn show(conn: &Connection, user: UserId, id: TaskId, today: NaiveDate, weeks: u32) -> Result<()> {
    let tasks = TaskService::new(SqliteTaskRepository::try_new(conn)?);
    let task = tasks.get_task_for_creator(user, id)?;

    let completions = CompletionService::new(SqliteCompletionStore::try_new(conn)?);
    let progress = completions.progress(&task, today, weeks)?;

    print_task(&task);
    println!("repeats: {}", progress.recurrence_label);
    println!("{}", progress.streak_text);
    if progress.streak_days > 0 {
        println!("streak days: {}", progress.streak_days);
    }
    println!();
    print_calendar(&progress.calendar);
    Ok(())
}

fn delete(conn: &Connection, user: UserId, id: TaskId) -> Result<()> {
    let tasks = TaskService::new(SqliteTaskRepository::try_new(conn)?);
    tasks.get_task_for_creator(user, id)?;
    tasks.delete_task(id)?;
    println!("deleted {id}");
    Ok(())
}

fn print_task(task: &Task) {
    println!("{}  {}", task.uuid, task.name);
    if let Some(description) = &task.description {
        println!("  {description}");
    }
    println!("starts: {}", task.start_date);
    if let Some(reminder) = &task.reminder_time {
        println!("reminder: {reminder}");
    }
}

// Completed cells are starred, today is bracketed.
fn print_calendar(calendar: &ActivityCalendar) {
    let header: Vec<String> = WEEK_ORDER
        .iter()
        .map(|day| format!("{:>8}", short_weekday(*day)))
        .collect();
    println!("{}", header.concat());

    for week in &calendar.weeks {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                let mark = if cell.marked { "*" } else { "" };
                let text = if cell.is_today {
                    format!("[{}{mark}]", cell.label)
                } else {
                    format!("{}{mark}", cell.label)
                };
                format!("{text:>8}")
            })
            .collect();
        println!("{}", row.concat());
    }
}

fn short_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

// A completion after today would hide the current streak.
fn toggle_date(requested: Option<NaiveDate>, today: NaiveDate) -> Result<NaiveDate> {
    match requested {
        Some(date) if date > today => bail!("cannot toggle {date}: it is after today ({today})"),
        Some(date) => Ok(date),
        None => Ok(today),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_weekday(value: &str) -> std::result::Result<Weekday, String> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| format!("unknown weekday `{value}` (expected sun, mon, tue, ...)"))
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date `{value}` (expected YYYY-MM-DD)"))
}
