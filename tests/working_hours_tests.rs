use chrono::NaiveTime;
use shiftboard::WorkingHours;
use shiftboard::working_hours::range_is_open;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn store_hours() -> WorkingHours {
    WorkingHours::new(t(8, 0), t(16, 0)).unwrap()
}

#[test]
fn new_rejects_swapped_or_equal_times() {
    assert!(WorkingHours::new(t(16, 0), t(8, 0)).is_err());
    assert!(WorkingHours::new(t(8, 0), t(8, 0)).is_err());
}

#[test]
fn contains_is_inclusive_on_both_ends() {
    let hours = store_hours();
    assert!(hours.contains(t(8, 0)));
    assert!(hours.contains(t(16, 0)));
    assert!(hours.contains(t(12, 30)));
    assert!(!hours.contains(t(7, 59)));
    assert!(!hours.contains(t(16, 1)));
}

#[test]
fn contains_range_needs_both_endpoints_inside() {
    let hours = store_hours();
    assert!(hours.contains_range(t(8, 0), t(16, 0)));
    assert!(hours.contains_range(t(9, 0), t(10, 30)));
    assert!(!hours.contains_range(t(7, 0), t(10, 0)));
    assert!(!hours.contains_range(t(15, 0), t(16, 30)));
}

#[test]
fn contains_range_rejects_swapped_endpoints() {
    let hours = store_hours();
    assert!(!hours.contains_range(t(17, 0), t(9, 0)));
}

#[test]
fn missing_hours_accept_everything() {
    assert!(range_is_open(None, t(0, 0), t(23, 59)));
    assert!(range_is_open(None, t(3, 0), t(4, 0)));
}

#[test]
fn inactive_hours_accept_everything() {
    let mut hours = store_hours();
    hours.is_active = false;
    assert!(range_is_open(Some(&hours), t(2, 0), t(3, 0)));
}

#[test]
fn active_hours_enforce_the_window() {
    let hours = store_hours();
    assert!(range_is_open(Some(&hours), t(9, 0), t(10, 0)));
    assert!(!range_is_open(Some(&hours), t(6, 0), t(10, 0)));
}

#[test]
fn hours_round_trip_through_json() {
    let hours = store_hours();
    let json = serde_json::to_string(&hours).unwrap();
    let back: WorkingHours = serde_json::from_str(&json).unwrap();
    assert_eq!(back, hours);
}
