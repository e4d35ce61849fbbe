use crate::clock::MidnightOverflow;
use crate::duration_policy;
use crate::task::TaskRecord;
use crate::template::EventTemplate;
use crate::working_hours::{WorkingHours, range_is_open};
use chrono::{Duration, NaiveDate, NaiveTime};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum MaterializeError {
    /// The computed task range falls outside the configured store hours.
    /// Carries both ranges so a message can state them together.
    OutOfWorkingHours {
        start: NaiveTime,
        end: NaiveTime,
        open: NaiveTime,
        close: NaiveTime,
    },
    CrossesMidnight(MidnightOverflow),
}

impl fmt::Display for MaterializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterializeError::OutOfWorkingHours {
                start,
                end,
                open,
                close,
            } => write!(
                f,
                "task range {}-{} is outside store hours {}-{}",
                start.format("%H:%M"),
                end.format("%H:%M"),
                open.format("%H:%M"),
                close.format("%H:%M")
            ),
            MaterializeError::CrossesMidnight(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MaterializeError {}

impl From<MidnightOverflow> for MaterializeError {
    fn from(value: MidnightOverflow) -> Self {
        Self::CrossesMidnight(value)
    }
}

/// A date the range pass could not materialize, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDate {
    pub date: NaiveDate,
    pub reason: MaterializeError,
}

/// Result of expanding a template over a date range. Failed dates are
/// collected rather than aborting the pass; the caller decides how to report
/// them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeOutcome {
    pub tasks: Vec<TaskRecord>,
    pub skipped: Vec<SkippedDate>,
}

impl RangeOutcome {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("generated={}", self.tasks.len()));
        if !self.skipped.is_empty() {
            let dates = self
                .skipped
                .iter()
                .map(|s| s.date.to_string())
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("skipped={} ({})", self.skipped.len(), dates));
        }
        parts.join(", ")
    }
}

/// Expand a template for one date.
///
/// `Ok(None)` means the pattern simply does not fire that day; only window
/// violations and cross-midnight durations are errors. The returned record
/// has no assigned id (0) and an empty crew; the caller owns identity.
pub fn materialize_for_date(
    template: &EventTemplate,
    date: NaiveDate,
    hours: Option<&WorkingHours>,
) -> Result<Option<TaskRecord>, MaterializeError> {
    if !template.recurrence.occurs_on(date) {
        return Ok(None);
    }

    let duration_seconds =
        duration_policy::processing_seconds(template.packages, template.pallet_condition_ok, 0);
    let mut task = TaskRecord::new(
        0,
        template.title.clone(),
        date,
        template.start_time,
        duration_seconds,
        template.packages,
    )?;

    if !range_is_open(hours, task.start_time, task.end_time) {
        let window = hours.expect("range_is_open is permissive without hours");
        return Err(MaterializeError::OutOfWorkingHours {
            start: task.start_time,
            end: task.end_time,
            open: window.start_time,
            close: window.end_time,
        });
    }

    task.template_id = Some(template.id);
    Ok(Some(task))
}

/// Expand a template over an inclusive date range, one bad date never
/// blocking the rest. No de-duplication happens here; "already materialized
/// for this template and date" is the persistence boundary's concern.
pub fn materialize_for_range(
    template: &EventTemplate,
    start_date: NaiveDate,
    end_date: NaiveDate,
    hours: Option<&WorkingHours>,
) -> RangeOutcome {
    let mut outcome = RangeOutcome::default();
    let mut date = start_date;
    while date <= end_date {
        match materialize_for_date(template, date, hours) {
            Ok(Some(task)) => outcome.tasks.push(task),
            Ok(None) => {}
            Err(reason) => outcome.skipped.push(SkippedDate { date, reason }),
        }
        date = date + Duration::days(1);
    }
    outcome
}
