use chrono::{NaiveDate, NaiveTime};
use shiftboard::TaskRecord;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn new_derives_end_time_and_label() {
    let task = TaskRecord::new(1, "Unload", d(2025, 1, 6), t(9, 0), 6000, 150).unwrap();
    assert_eq!(task.end_time, t(10, 40));
    assert_eq!(task.duration_label, "1h 40min 00s");
    assert!(task.crew.is_empty());
    assert!(!task.is_completed);
    assert!(!task.is_pinned);
    assert_eq!(task.template_id, None);
}

#[test]
fn new_rejects_midnight_crossings() {
    assert!(TaskRecord::new(1, "Night", d(2025, 1, 6), t(23, 0), 7200, 0).is_err());
}

#[test]
fn rederive_refreshes_stale_fields() {
    let mut task = TaskRecord::new(1, "Unload", d(2025, 1, 6), t(9, 0), 3600, 0).unwrap();
    task.start_time = t(10, 0);
    task.duration_seconds = 1800;
    task.rederive().unwrap();
    assert_eq!(task.end_time, t(10, 30));
    assert_eq!(task.duration_label, "0h 30min 00s");
}

#[test]
fn task_round_trips_through_json() {
    let mut task = TaskRecord::new(3, "Shelving", d(2025, 2, 1), t(8, 15), 2400, 60).unwrap();
    task.crew = vec!["A".into(), "B".into()];
    task.is_pinned = true;
    task.template_id = Some(7);

    let json = serde_json::to_string(&task).unwrap();
    let back: TaskRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, task);
}

#[test]
fn template_reference_is_omitted_from_json_when_absent() {
    let task = TaskRecord::new(1, "Adhoc", d(2025, 2, 1), t(8, 0), 600, 0).unwrap();
    let json = serde_json::to_string(&task).unwrap();
    assert!(!json.contains("template_id"));
}
