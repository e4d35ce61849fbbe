use crate::clock::minutes_since_midnight;
use crate::task::TaskRecord;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A task as proposed for creation or edit: its slot on the calendar and the
/// crew the planner wants to commit to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub member_ids: Vec<String>,
}

impl CandidateSlot {
    pub fn new<I, S>(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            date,
            start_time,
            end_time,
            member_ids: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// Member ids from the candidate's crew that are already committed to an
/// overlapping task on the same date.
///
/// `exclude_task_id` is the task currently being edited, which must not
/// conflict with itself. Completed tasks no longer hold a commitment.
/// Overlap is half-open at minute granularity: a task ending 11:00 does not
/// conflict with one starting 11:00.
pub fn find_conflicts(
    candidate: &CandidateSlot,
    existing_tasks: &[TaskRecord],
    exclude_task_id: Option<i32>,
) -> HashSet<String> {
    let new_start = minutes_since_midnight(candidate.start_time);
    let new_end = minutes_since_midnight(candidate.end_time);

    let mut busy = HashSet::new();
    for task in existing_tasks {
        if task.date != candidate.date {
            continue;
        }
        if exclude_task_id == Some(task.id) {
            continue;
        }
        if task.is_completed {
            continue;
        }

        let existing_start = minutes_since_midnight(task.start_time);
        let existing_end = minutes_since_midnight(task.end_time);
        let overlaps = new_start < existing_end && new_end > existing_start;
        if !overlaps {
            continue;
        }

        for member in &candidate.member_ids {
            if task.crew.contains(member) {
                busy.insert(member.clone());
            }
        }
    }
    busy
}
