//! Current completion streak.
//!
//! # Invariants
//! - A streak is current only when its newest day is today or yesterday.
//! - Days are compared as calendar dates; "consecutive" means exactly one
//!   calendar day apart.

use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeSet;

/// Days a streak survives without a completion before it is broken.
pub const STREAK_GRACE_DAYS: u64 = 1;

/// Returns the first day of the streak that is still current on `today`.
///
/// Returns `None` when there are no completions or the newest completion is
/// neither `today` nor within [`STREAK_GRACE_DAYS`] before it.
pub fn current_streak_start(
    completed: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let most_recent = *completed.last()?;
    let oldest_current = today
        .checked_sub_days(Days::new(STREAK_GRACE_DAYS))
        .unwrap_or(NaiveDate::MIN);
    if most_recent > today || most_recent < oldest_current {
        return None;
    }

    let mut start = most_recent;
    while let Some(previous) = start.pred_opt() {
        if !completed.contains(&previous) {
            break;
        }
        start = previous;
    }
    Some(start)
}

/// Number of days in the streak beginning at `start`.
pub fn streak_length(start: NaiveDate, completed: &BTreeSet<NaiveDate>) -> u32 {
    let mut length = 0;
    let mut cursor = Some(start);
    while let Some(day) = cursor.filter(|day| completed.contains(day)) {
        length += 1;
        cursor = day.succ_opt();
    }
    length
}

/// Display text for a streak start: `Streak ongoing since M/D/YYYY` or
/// `No Streak`.
pub fn streak_text(start: Option<NaiveDate>) -> String {
    match start {
        Some(date) => format!(
            "Streak ongoing since {}/{}/{}",
            date.month(),
            date.day(),
            date.year()
        ),
        None => "No Streak".to_string(),
    }
}
