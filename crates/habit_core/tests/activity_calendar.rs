use chrono::{Datelike, NaiveDate, Weekday};
use habit_core::{build_activity_calendar, ProgressError, DEFAULT_WEEKS_BACK};
use std::collections::BTreeSet;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

#[test]
fn default_window_is_four_contiguous_weeks() {
    // Wednesday.
    let today = date(2024, 1, 17);
    let calendar = build_activity_calendar(&BTreeSet::new(), today, DEFAULT_WEEKS_BACK).unwrap();

    assert_eq!(calendar.weeks.len(), 4);
    assert_eq!(calendar.cells().count(), 28);
    assert_eq!(calendar.first_date(), Some(date(2023, 12, 24)));
    assert_eq!(calendar.last_date(), Some(date(2024, 1, 20)));

    let dates: Vec<NaiveDate> = calendar.cells().map(|cell| cell.date).collect();
    for pair in dates.windows(2) {
        assert_eq!(pair[0].succ_opt(), Some(pair[1]));
    }
    for week in &calendar.weeks {
        assert_eq!(week[0].date.weekday(), Weekday::Sun);
        assert_eq!(week[6].date.weekday(), Weekday::Sat);
    }
}

#[test]
fn cells_mark_completed_dates_and_today() {
    let today = date(2024, 1, 17);
    let completed: BTreeSet<NaiveDate> = [date(2024, 1, 17), date(2024, 1, 2), date(2023, 11, 1)]
        .into_iter()
        .collect();

    let calendar = build_activity_calendar(&completed, today, 3).unwrap();

    let today_cell = calendar.cells().find(|cell| cell.date == today).unwrap();
    assert!(today_cell.marked);
    assert!(today_cell.is_today);
    assert_eq!(today_cell.label, "1/17");
    assert_eq!(calendar.cells().filter(|cell| cell.is_today).count(), 1);

    // Nov 1 is outside the window.
    assert_eq!(calendar.marked_count(), 2);
}

#[test]
fn unmarked_today_is_still_present() {
    let today = date(2024, 1, 17);
    let calendar = build_activity_calendar(&BTreeSet::new(), today, 3).unwrap();
    let today_cell = calendar.cells().find(|cell| cell.date == today).unwrap();
    assert!(!today_cell.marked);
}

#[test]
fn sunday_today_opens_the_last_row() {
    let today = date(2024, 1, 21);
    let calendar = build_activity_calendar(&BTreeSet::new(), today, 3).unwrap();

    let last_week = calendar.weeks.last().unwrap();
    assert_eq!(last_week[0].date, today);
    assert_eq!(calendar.last_date(), Some(date(2024, 1, 27)));
    assert_eq!(calendar.first_date(), Some(date(2023, 12, 31)));
}

#[test]
fn saturday_today_closes_the_last_row() {
    let today = date(2024, 1, 20);
    let calendar = build_activity_calendar(&BTreeSet::new(), today, 3).unwrap();
    assert_eq!(calendar.last_date(), Some(today));
}

#[test]
fn window_size_follows_weeks_back() {
    let today = date(2024, 1, 17);
    let single = build_activity_calendar(&BTreeSet::new(), today, 0).unwrap();
    assert_eq!(single.weeks.len(), 1);
    assert_eq!(single.first_date(), Some(date(2024, 1, 14)));

    let wide = build_activity_calendar(&BTreeSet::new(), today, 7).unwrap();
    assert_eq!(wide.weeks.len(), 8);
}

#[test]
fn labels_cross_year_boundary() {
    let calendar = build_activity_calendar(&BTreeSet::new(), date(2024, 1, 3), 0).unwrap();
    let labels: Vec<&str> = calendar.cells().map(|cell| cell.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["12/31", "1/1", "1/2", "1/3", "1/4", "1/5", "1/6"]
    );
}

#[test]
fn window_before_minimum_date_is_an_error() {
    let err = build_activity_calendar(&BTreeSet::new(), NaiveDate::MIN, 3).unwrap_err();
    assert!(matches!(err, ProgressError::DateOutOfRange { weeks_back: 3, .. }));
}

#[test]
fn serializes_weeks_as_nested_arrays() {
    let calendar = build_activity_calendar(&BTreeSet::new(), date(2024, 1, 17), 1).unwrap();
    let value = serde_json::to_value(&calendar).unwrap();
    let weeks = value["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].as_array().unwrap().len(), 7);
    assert_eq!(weeks[0][0]["date"], "2024-01-07");
    assert_eq!(weeks[0][0]["label"], "1/7");
}
