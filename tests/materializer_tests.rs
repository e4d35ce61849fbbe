use chrono::{NaiveDate, NaiveTime};
use shiftboard::materializer::{materialize_for_date, materialize_for_range};
use shiftboard::{EventTemplate, MaterializeError, RecurrencePattern, WorkingHours};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn delivery_template() -> EventTemplate {
    // 90 packages -> 3600s of processing.
    let recurrence = RecurrencePattern::weekdays(d(2025, 1, 6)).with_window(d(2025, 1, 6), None);
    EventTemplate::new(1, "Morning delivery", t(9, 0), 60, 90, recurrence)
}

fn store_hours() -> WorkingHours {
    WorkingHours::new(t(8, 0), t(16, 0)).unwrap()
}

#[test]
fn non_firing_date_yields_nothing() {
    let template = delivery_template();
    // 2025-01-11 is a Saturday.
    let result = materialize_for_date(&template, d(2025, 1, 11), None).unwrap();
    assert!(result.is_none());
}

#[test]
fn firing_date_builds_a_task_with_derived_fields() {
    let template = delivery_template();
    let task = materialize_for_date(&template, d(2025, 1, 6), Some(&store_hours()))
        .unwrap()
        .expect("Monday should fire");

    assert_eq!(task.date, d(2025, 1, 6));
    assert_eq!(task.start_time, t(9, 0));
    assert_eq!(task.end_time, t(10, 0));
    assert_eq!(task.duration_seconds, 3600);
    assert_eq!(task.duration_label, "1h 00min 00s");
    assert_eq!(task.packages, 90);
    assert_eq!(task.template_id, Some(1));
    assert!(task.crew.is_empty());
    assert!(!task.is_completed);
}

#[test]
fn bad_pallet_extends_the_task() {
    let mut template = delivery_template();
    template.pallet_condition_ok = false;
    let task = materialize_for_date(&template, d(2025, 1, 6), None)
        .unwrap()
        .unwrap();
    assert_eq!(task.duration_seconds, 3600 + 1200);
    assert_eq!(task.end_time, t(10, 20));
}

#[test]
fn materialization_is_pure_and_repeatable() {
    let template = delivery_template();
    let first = materialize_for_date(&template, d(2025, 1, 6), Some(&store_hours())).unwrap();
    let second = materialize_for_date(&template, d(2025, 1, 6), Some(&store_hours())).unwrap();
    assert_eq!(first, second);
}

#[test]
fn out_of_hours_is_a_typed_error_carrying_both_ranges() {
    let mut template = delivery_template();
    template.start_time = t(15, 30); // ends 16:30, past closing
    let err = materialize_for_date(&template, d(2025, 1, 6), Some(&store_hours()))
        .expect_err("range leaves the window");
    match err {
        MaterializeError::OutOfWorkingHours {
            start,
            end,
            open,
            close,
        } => {
            assert_eq!(start, t(15, 30));
            assert_eq!(end, t(16, 30));
            assert_eq!(open, t(8, 0));
            assert_eq!(close, t(16, 0));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn without_configured_hours_any_range_is_accepted() {
    let mut template = delivery_template();
    template.start_time = t(22, 0);
    let task = materialize_for_date(&template, d(2025, 1, 6), None)
        .unwrap()
        .unwrap();
    assert_eq!(task.end_time, t(23, 0));
}

#[test]
fn oversized_duration_crosses_midnight() {
    let mut template = delivery_template();
    template.start_time = t(23, 30);
    let err = materialize_for_date(&template, d(2025, 1, 6), None)
        .expect_err("an hour past 23:30 crosses midnight");
    assert!(matches!(err, MaterializeError::CrossesMidnight(_)));
}

#[test]
fn range_pass_collects_successes_and_skips_weekends() {
    let template = delivery_template();
    // Mon 2025-01-06 .. Sun 2025-01-12: five weekday firings.
    let outcome = materialize_for_range(&template, d(2025, 1, 6), d(2025, 1, 12), None);
    assert_eq!(outcome.tasks.len(), 5);
    assert!(outcome.skipped.is_empty());
    let dates: Vec<NaiveDate> = outcome.tasks.iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        vec![d(2025, 1, 6), d(2025, 1, 7), d(2025, 1, 8), d(2025, 1, 9), d(2025, 1, 10)]
    );
}

#[test]
fn one_bad_date_never_blocks_the_rest() {
    let mut template = delivery_template();
    template.start_time = t(15, 30);
    // Every firing date is out of hours; the pass still visits them all.
    let outcome =
        materialize_for_range(&template, d(2025, 1, 6), d(2025, 1, 8), Some(&store_hours()));
    assert!(outcome.tasks.is_empty());
    assert_eq!(outcome.skipped.len(), 3);
    assert!(
        outcome
            .skipped
            .iter()
            .all(|s| matches!(s.reason, MaterializeError::OutOfWorkingHours { .. }))
    );
    assert!(outcome.to_cli_summary().starts_with("generated=0, skipped=3"));
}

#[test]
fn range_summary_reports_generated_count() {
    let template = delivery_template();
    let outcome = materialize_for_range(&template, d(2025, 1, 6), d(2025, 1, 7), None);
    assert_eq!(outcome.to_cli_summary(), "generated=2");
}
