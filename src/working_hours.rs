use crate::clock::minutes_since_midnight;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The configured open/close window of a store. At most one record exists per
/// store; a store that has not configured hours simply has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidWorkingHours {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl fmt::Display for InvalidWorkingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "closing time {} must be after opening time {}",
            self.end_time.format("%H:%M"),
            self.start_time.format("%H:%M")
        )
    }
}

impl std::error::Error for InvalidWorkingHours {}

impl WorkingHours {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime) -> Result<Self, InvalidWorkingHours> {
        if end_time <= start_time {
            return Err(InvalidWorkingHours {
                start_time,
                end_time,
            });
        }
        Ok(Self {
            start_time,
            end_time,
            is_active: true,
        })
    }

    /// Whether a time of day falls inside the window, inclusive on both ends.
    /// Comparison is at minute granularity.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let t = minutes_since_midnight(time);
        minutes_since_midnight(self.start_time) <= t && t <= minutes_since_midnight(self.end_time)
    }

    /// Whether a [start, end] range sits inside the window. The trailing
    /// end-against-close check is redundant with `contains` but kept as a
    /// safety net against swapped endpoints.
    pub fn contains_range(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.contains(start)
            && self.contains(end)
            && minutes_since_midnight(end) <= minutes_since_midnight(self.end_time)
    }
}

/// Window check with the default-open policy: a store without configured
/// hours, or with an inactive record, accepts every range.
pub fn range_is_open(hours: Option<&WorkingHours>, start: NaiveTime, end: NaiveTime) -> bool {
    match hours {
        Some(window) if window.is_active => window.contains_range(start, end),
        _ => true,
    }
}
