use chrono::NaiveTime;
use shiftboard::clock::{add_seconds, diff_minutes, format_duration, minutes_since_midnight};
use shiftboard::duration_policy::{
    PALLET_PENALTY_SECONDS, SECONDS_PER_PACKAGE, processing_seconds,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn packages_alone_drive_the_base_duration() {
    assert_eq!(processing_seconds(0, true, 0), 0);
    assert_eq!(processing_seconds(1, true, 0), SECONDS_PER_PACKAGE);
    assert_eq!(processing_seconds(150, true, 0), 6000);
}

#[test]
fn bad_pallet_adds_a_fixed_penalty() {
    assert_eq!(
        processing_seconds(10, false, 0),
        10 * SECONDS_PER_PACKAGE + PALLET_PENALTY_SECONDS
    );
    assert_eq!(processing_seconds(0, false, 0), PALLET_PENALTY_SECONDS);
}

#[test]
fn manual_delay_is_counted_in_minutes() {
    assert_eq!(processing_seconds(0, true, 5), 300);
    assert_eq!(processing_seconds(10, false, 5), 400 + 1200 + 300);
}

#[test]
fn format_duration_uses_canonical_form() {
    assert_eq!(format_duration(6000), "1h 40min 00s");
    assert_eq!(format_duration(0), "0h 00min 00s");
    assert_eq!(format_duration(59), "0h 00min 59s");
    assert_eq!(format_duration(3661), "1h 01min 01s");
    assert_eq!(format_duration(36_000), "10h 00min 00s");
}

#[test]
fn add_seconds_stays_within_the_day() {
    assert_eq!(add_seconds(t(9, 0), 6000).unwrap(), t(10, 40));
    assert_eq!(add_seconds(t(0, 0), 0).unwrap(), t(0, 0));
}

#[test]
fn add_seconds_rejects_midnight_crossings() {
    let err = add_seconds(t(23, 30), 3600).expect_err("should cross midnight");
    assert_eq!(err.start, t(23, 30));
    assert_eq!(err.seconds, 3600);
    // Landing exactly on 24:00 is also a crossing.
    assert!(add_seconds(t(23, 0), 3600).is_err());
    assert!(add_seconds(t(23, 0), 3599).is_ok());
}

#[test]
fn policy_and_clock_round_trip() {
    // start + processing_seconds(p, true) == start + p * 40s
    let start = t(8, 0);
    for packages in [0u32, 1, 10, 150] {
        let clean = add_seconds(start, processing_seconds(packages, true, 0)).unwrap();
        let expected = add_seconds(start, packages * SECONDS_PER_PACKAGE).unwrap();
        assert_eq!(clean, expected);

        let penalized = add_seconds(start, processing_seconds(packages, false, 0)).unwrap();
        let expected = add_seconds(
            start,
            packages * SECONDS_PER_PACKAGE + PALLET_PENALTY_SECONDS,
        )
        .unwrap();
        assert_eq!(penalized, expected);
    }
}

#[test]
fn diff_minutes_truncates_at_second_level() {
    assert_eq!(diff_minutes(t(9, 0), t(10, 40)), 100);
    assert_eq!(diff_minutes(t(9, 0), t(9, 0)), 0);
    let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let end = NaiveTime::from_hms_opt(9, 5, 59).unwrap();
    assert_eq!(diff_minutes(start, end), 5);
}

#[test]
fn minutes_since_midnight_ignores_seconds() {
    assert_eq!(minutes_since_midnight(t(0, 0)), 0);
    assert_eq!(
        minutes_since_midnight(NaiveTime::from_hms_opt(9, 30, 59).unwrap()),
        570
    );
}
