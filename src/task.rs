use crate::clock::{self, MidnightOverflow};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single dated, timed unit of work on the board, either materialized from
/// an event template or created directly by a planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i32,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_seconds: u32,
    /// Display form of the duration, kept alongside the raw seconds because
    /// the stores persist it.
    pub duration_label: String,
    pub packages: u32,
    /// Team-member ids assigned to the task.
    #[serde(default)]
    pub crew: Vec<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_pinned: bool,
    /// Originating template, when materialized. Ad-hoc tasks carry none, and
    /// deleting a template clears the reference without deleting the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i32>,
}

impl TaskRecord {
    /// Build a record with `end_time` and `duration_label` derived from the
    /// start time and duration, so neither can drift out of sync.
    pub fn new(
        id: i32,
        title: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_seconds: u32,
        packages: u32,
    ) -> Result<Self, MidnightOverflow> {
        let end_time = clock::add_seconds(start_time, duration_seconds)?;
        Ok(Self {
            id,
            title: title.into(),
            date,
            start_time,
            end_time,
            duration_seconds,
            duration_label: clock::format_duration(duration_seconds),
            packages,
            crew: Vec::new(),
            is_completed: false,
            is_pinned: false,
            template_id: None,
        })
    }

    /// Recompute the derived fields after an edit to start time or duration.
    pub fn rederive(&mut self) -> Result<(), MidnightOverflow> {
        self.end_time = clock::add_seconds(self.start_time, self.duration_seconds)?;
        self.duration_label = clock::format_duration(self.duration_seconds);
        Ok(())
    }
}
