use crate::recurrence::RecurrencePattern;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A recurring definition of work from which concrete tasks are generated.
///
/// `section` and `initials` are free-form labels owned by the planning UI;
/// they pass through this crate unchanged and unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub id: i32,
    pub title: String,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub packages: u32,
    pub team_size: u32,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub initials: String,
    pub pallet_condition_ok: bool,
    pub recurrence: RecurrencePattern,
}

impl EventTemplate {
    pub fn new(
        id: i32,
        title: impl Into<String>,
        start_time: NaiveTime,
        duration_minutes: u32,
        packages: u32,
        recurrence: RecurrencePattern,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            start_time,
            duration_minutes,
            packages,
            team_size: 1,
            section: String::new(),
            initials: String::new(),
            pallet_condition_ok: true,
            recurrence,
        }
    }
}
