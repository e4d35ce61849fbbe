use chrono::{NaiveTime, Timelike};
use std::fmt;

const SECONDS_PER_DAY: u32 = 86_400;

/// A time-of-day sum reached or passed 24:00. Shift times never wrap into the
/// next day, so the overflow is surfaced instead of wrapping silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidnightOverflow {
    pub start: NaiveTime,
    pub seconds: u32,
}

impl fmt::Display for MidnightOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "adding {}s to {} crosses midnight",
            self.seconds,
            self.start.format("%H:%M")
        )
    }
}

impl std::error::Error for MidnightOverflow {}

/// Add a duration to a time of day, staying within the same calendar day.
pub fn add_seconds(start: NaiveTime, seconds: u32) -> Result<NaiveTime, MidnightOverflow> {
    let total = start.num_seconds_from_midnight() + seconds;
    if total >= SECONDS_PER_DAY {
        return Err(MidnightOverflow { start, seconds });
    }
    Ok(NaiveTime::from_num_seconds_from_midnight_opt(total, 0)
        .expect("seconds from midnight below one day"))
}

/// Whole minutes between two times of day, truncated toward zero.
/// `end` is expected to be at or after `start` on the same notional day.
pub fn diff_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    (end - start).num_minutes()
}

/// Minute-of-day value used for window and overlap comparisons.
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Render a duration in the canonical `{h}h {mm}min {ss}s` form.
pub fn format_duration(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}h {:02}min {:02}s", hours, minutes, secs)
}
