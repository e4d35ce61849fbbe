use chrono::{NaiveDate, Weekday};
use shiftboard::{RecurrenceKind, RecurrencePattern, RecurrenceValidationError};
use shiftboard::recurrence::{sunday_index, weekday_from_sunday_index};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn daily_fires_every_day_inside_window() {
    let pattern = RecurrencePattern::daily(d(2025, 1, 6)).with_window(d(2025, 1, 6), Some(d(2025, 1, 10)));
    assert!(pattern.occurs_on(d(2025, 1, 6)));
    assert!(pattern.occurs_on(d(2025, 1, 8)));
    assert!(pattern.occurs_on(d(2025, 1, 10)));
    assert!(!pattern.occurs_on(d(2025, 1, 5)));
    assert!(!pattern.occurs_on(d(2025, 1, 11)));
}

#[test]
fn weekly_follows_anchor_weekday() {
    // 2025-01-06 is a Monday.
    let pattern = RecurrencePattern::weekly(d(2025, 1, 6)).with_window(d(2025, 1, 6), None);
    assert!(pattern.occurs_on(d(2025, 1, 13)));
    assert!(pattern.occurs_on(d(2025, 1, 20)));
    assert!(!pattern.occurs_on(d(2025, 1, 7)));
}

#[test]
fn weekdays_excludes_weekend() {
    let pattern = RecurrencePattern::weekdays(d(2025, 1, 6));
    assert!(pattern.occurs_on(d(2025, 1, 10))); // Friday
    assert!(!pattern.occurs_on(d(2025, 1, 11))); // Saturday
    assert!(!pattern.occurs_on(d(2025, 1, 12))); // Sunday
    assert!(pattern.occurs_on(d(2025, 1, 13))); // Monday
}

#[test]
fn custom_fires_only_on_selected_weekdays() {
    let pattern =
        RecurrencePattern::custom(d(2025, 1, 6), vec![Weekday::Tue, Weekday::Thu]);
    assert!(pattern.occurs_on(d(2025, 1, 7)));
    assert!(pattern.occurs_on(d(2025, 1, 9)));
    assert!(!pattern.occurs_on(d(2025, 1, 6)));
    assert!(!pattern.occurs_on(d(2025, 1, 8)));
}

#[test]
fn one_off_templates_never_fire_through_the_engine() {
    let pattern = RecurrencePattern::once(d(2025, 1, 6));
    assert!(!pattern.occurs_on(d(2025, 1, 6)));
}

#[test]
fn inactive_pattern_never_fires_regardless_of_window() {
    let mut pattern = RecurrencePattern::daily(d(2025, 1, 6)).with_window(d(2025, 1, 1), None);
    pattern.is_active = false;
    assert!(!pattern.occurs_on(d(2025, 1, 6)));
    assert!(!pattern.occurs_on(d(2025, 6, 1)));
}

#[test]
fn window_bounds_are_inclusive() {
    let pattern =
        RecurrencePattern::daily(d(2025, 3, 1)).with_window(d(2025, 3, 1), Some(d(2025, 3, 3)));
    assert!(pattern.occurs_on(d(2025, 3, 1)));
    assert!(pattern.occurs_on(d(2025, 3, 3)));
    assert!(!pattern.occurs_on(d(2025, 3, 4)));
}

#[test]
fn next_occurrence_scans_within_horizon() {
    // Weekly Monday pattern asked from a Tuesday.
    let pattern = RecurrencePattern::weekly(d(2025, 1, 6)).with_window(d(2025, 1, 6), None);
    assert_eq!(
        pattern.next_occurrence(d(2025, 1, 7), 30),
        Some(d(2025, 1, 13))
    );
}

#[test]
fn next_occurrence_respects_horizon_bound() {
    let pattern = RecurrencePattern::weekly(d(2025, 1, 6)).with_window(d(2025, 1, 6), None);
    // Next Monday is 6 days out; a 5-day horizon misses it.
    assert_eq!(pattern.next_occurrence(d(2025, 1, 7), 5), None);
}

#[test]
fn next_occurrence_none_for_ended_window() {
    let pattern =
        RecurrencePattern::daily(d(2025, 1, 1)).with_window(d(2025, 1, 1), Some(d(2025, 1, 5)));
    assert_eq!(pattern.next_occurrence(d(2025, 1, 6), 365), None);
}

#[test]
fn next_occurrence_waits_for_window_start() {
    let pattern = RecurrencePattern::daily(d(2025, 2, 1)).with_window(d(2025, 2, 1), None);
    assert_eq!(
        pattern.next_occurrence(d(2025, 1, 30), 10),
        Some(d(2025, 2, 1))
    );
}

#[test]
fn custom_with_empty_weekdays_is_rejected() {
    let pattern = RecurrencePattern::custom(d(2025, 1, 6), Vec::<Weekday>::new());
    assert!(matches!(
        pattern.validate(),
        Err(RecurrenceValidationError::EmptyCustomWeekdays)
    ));
}

#[test]
fn window_end_before_start_is_rejected() {
    let pattern =
        RecurrencePattern::daily(d(2025, 1, 6)).with_window(d(2025, 1, 10), Some(d(2025, 1, 6)));
    assert!(matches!(
        pattern.validate(),
        Err(RecurrenceValidationError::WindowEndBeforeStart { .. })
    ));
}

#[test]
fn kind_round_trips_through_str() {
    for kind in [
        RecurrenceKind::None,
        RecurrenceKind::Daily,
        RecurrenceKind::Weekly,
        RecurrenceKind::Weekdays,
        RecurrenceKind::Custom,
    ] {
        assert_eq!(kind.as_str().parse::<RecurrenceKind>(), Ok(kind));
    }
}

#[test]
fn sunday_indexing_matches_store_numbering() {
    assert_eq!(weekday_from_sunday_index(0), Some(Weekday::Sun));
    assert_eq!(weekday_from_sunday_index(6), Some(Weekday::Sat));
    assert_eq!(weekday_from_sunday_index(7), None);
    assert_eq!(sunday_index(Weekday::Sun), 0);
    assert_eq!(sunday_index(Weekday::Wed), 3);
}
