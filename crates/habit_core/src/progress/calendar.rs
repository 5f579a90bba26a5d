//! Rolling activity calendar.
//!
//! # Invariants
//! - The grid is `weeks_back + 1` rows of exactly 7 cells.
//! - Rows run oldest week first; each row runs Sunday to Saturday.
//! - The last row is the week containing `today`, so a Sunday `today` opens
//!   the final row rather than closing the previous one.

use crate::progress::{ProgressError, ProgressResult};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trailing whole weeks shown before the current one.
pub const DEFAULT_WEEKS_BACK: u32 = 3;

const DAYS_PER_WEEK: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Short `M/D` label.
    pub label: String,
    /// Whether the task was completed on `date`.
    pub marked: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCalendar {
    pub weeks: Vec<[CalendarCell; 7]>,
}

impl ActivityCalendar {
    /// First day shown (a Sunday).
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|week| week[0].date)
    }

    /// Last day shown (a Saturday).
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|week| week[6].date)
    }

    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks.iter().flatten()
    }

    pub fn marked_count(&self) -> usize {
        self.cells().filter(|cell| cell.marked).count()
    }
}

/// Builds the activity grid ending with the week that contains `today`.
///
/// # Errors
/// - `ProgressError::DateOutOfRange` when the window would leave the range of
///   representable dates.
pub fn build_activity_calendar(
    completed: &BTreeSet<NaiveDate>,
    today: NaiveDate,
    weeks_back: u32,
) -> ProgressResult<ActivityCalendar> {
    let out_of_range = || ProgressError::DateOutOfRange { today, weeks_back };

    let week_start = today
        .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))
        .ok_or_else(out_of_range)?;
    let first_sunday = week_start
        .checked_sub_days(Days::new(u64::from(weeks_back) * DAYS_PER_WEEK))
        .ok_or_else(out_of_range)?;

    let mut weeks = Vec::with_capacity(weeks_back as usize + 1);
    for week_index in 0..=u64::from(weeks_back) {
        let mut cells = Vec::with_capacity(DAYS_PER_WEEK as usize);
        for offset in 0..DAYS_PER_WEEK {
            let date = first_sunday
                .checked_add_days(Days::new(week_index * DAYS_PER_WEEK + offset))
                .ok_or_else(out_of_range)?;
            cells.push(CalendarCell {
                date,
                label: format!("{}/{}", date.month(), date.day()),
                marked: completed.contains(&date),
                is_today: date == today,
            });
        }
        let week: [CalendarCell; 7] = cells.try_into().map_err(|_| out_of_range())?;
        weeks.push(week);
    }

    Ok(ActivityCalendar { weeks })
}
