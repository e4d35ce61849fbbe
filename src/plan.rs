use crate::clock::MidnightOverflow;
use crate::conflict::{self, CandidateSlot};
use crate::materializer::{self, MaterializeError};
use crate::task::TaskRecord;
use crate::template::EventTemplate;
use crate::template_validation::{self, TemplateValidationError};
use crate::working_hours::{InvalidWorkingHours, WorkingHours, range_is_open};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub enum PlanError {
    TemplateNotFound(i32),
    TaskNotFound(i32),
    Template(TemplateValidationError),
    WorkingHours(InvalidWorkingHours),
    Materialize(MaterializeError),
    /// The proposed crew contains members already booked on an overlapping
    /// task; carries the busy member ids.
    RosterConflict { members: Vec<String> },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::TemplateNotFound(id) => write!(f, "template {id} not found"),
            PlanError::TaskNotFound(id) => write!(f, "task {id} not found"),
            PlanError::Template(err) => write!(f, "{err}"),
            PlanError::WorkingHours(err) => write!(f, "{err}"),
            PlanError::Materialize(err) => write!(f, "{err}"),
            PlanError::RosterConflict { members } => {
                write!(f, "members already booked: {}", members.join(", "))
            }
        }
    }
}

impl std::error::Error for PlanError {}

impl From<TemplateValidationError> for PlanError {
    fn from(value: TemplateValidationError) -> Self {
        Self::Template(value)
    }
}

impl From<InvalidWorkingHours> for PlanError {
    fn from(value: InvalidWorkingHours) -> Self {
        Self::WorkingHours(value)
    }
}

impl From<MaterializeError> for PlanError {
    fn from(value: MaterializeError) -> Self {
        Self::Materialize(value)
    }
}

impl From<MidnightOverflow> for PlanError {
    fn from(value: MidnightOverflow) -> Self {
        Self::Materialize(MaterializeError::CrossesMidnight(value))
    }
}

/// What a range expansion did, date by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionSummary {
    pub template_id: i32,
    /// Ids of the tasks created by this pass.
    pub generated: Vec<i32>,
    /// Dates rejected by the window or midnight checks.
    pub skipped: Vec<NaiveDate>,
    /// Dates already carrying a task for this template; left untouched.
    pub already_planned: Vec<NaiveDate>,
}

impl ExpansionSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("generated={}", self.generated.len()));
        if !self.skipped.is_empty() {
            let dates = self
                .skipped
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("skipped={} ({})", self.skipped.len(), dates));
        }
        if !self.already_planned.is_empty() {
            parts.push(format!("existing={}", self.already_planned.len()));
        }
        parts.join(", ")
    }
}

/// The store's planning state: event templates, the task board, and the
/// opening-hours record. All scheduling entry points live here; the stores
/// and service surfaces persist and expose it.
pub struct StorePlan {
    templates: Vec<EventTemplate>,
    tasks: Vec<TaskRecord>,
    working_hours: Option<WorkingHours>,
    next_task_id: i32,
}

impl Default for StorePlan {
    fn default() -> Self {
        Self::new()
    }
}

impl StorePlan {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            tasks: Vec::new(),
            working_hours: None,
            next_task_id: 1,
        }
    }

    pub(crate) fn from_parts(
        working_hours: Option<WorkingHours>,
        templates: Vec<EventTemplate>,
        tasks: Vec<TaskRecord>,
    ) -> Self {
        let next_task_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            templates,
            tasks,
            working_hours,
            next_task_id,
        }
    }

    pub fn working_hours(&self) -> Option<&WorkingHours> {
        self.working_hours.as_ref()
    }

    pub fn set_working_hours(&mut self, hours: WorkingHours) -> Result<(), PlanError> {
        if hours.end_time <= hours.start_time {
            return Err(InvalidWorkingHours {
                start_time: hours.start_time,
                end_time: hours.end_time,
            }
            .into());
        }
        self.working_hours = Some(hours);
        Ok(())
    }

    pub fn clear_working_hours(&mut self) {
        self.working_hours = None;
    }

    pub fn templates(&self) -> &[EventTemplate] {
        &self.templates
    }

    pub fn find_template(&self, template_id: i32) -> Option<&EventTemplate> {
        self.templates.iter().find(|t| t.id == template_id)
    }

    /// Insert or replace a template. Structural validation happens here, at
    /// definition time, never during materialization.
    pub fn upsert_template(&mut self, template: EventTemplate) -> Result<(), PlanError> {
        template_validation::validate_template(&template)?;
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
        Ok(())
    }

    /// Remove a template. Tasks already materialized from it stay on the
    /// board as valid historical records; only their back-reference is
    /// cleared.
    pub fn delete_template(&mut self, template_id: i32) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != template_id);
        if self.templates.len() == before {
            return false;
        }
        for task in &mut self.tasks {
            if task.template_id == Some(template_id) {
                task.template_id = None;
            }
        }
        true
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn tasks_on(&self, date: NaiveDate) -> Vec<TaskRecord> {
        self.tasks
            .iter()
            .filter(|t| t.date == date)
            .cloned()
            .collect()
    }

    pub fn find_task(&self, task_id: i32) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Insert or replace a task record, re-deriving its end time and
    /// duration label so stored state can never desynchronize.
    pub fn upsert_task_record(&mut self, mut task: TaskRecord) -> Result<(), PlanError> {
        task.rederive()?;
        if task.id >= self.next_task_id {
            self.next_task_id = task.id + 1;
        }
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        Ok(())
    }

    /// Create an ad-hoc task with no template back-reference. The window
    /// check applies exactly as for materialized tasks.
    pub fn create_task(
        &mut self,
        title: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_seconds: u32,
        packages: u32,
    ) -> Result<i32, PlanError> {
        let id = self.next_task_id;
        let task = TaskRecord::new(id, title, date, start_time, duration_seconds, packages)?;
        if !range_is_open(self.working_hours.as_ref(), task.start_time, task.end_time) {
            let window = self
                .working_hours
                .as_ref()
                .expect("range_is_open is permissive without hours");
            return Err(MaterializeError::OutOfWorkingHours {
                start: task.start_time,
                end: task.end_time,
                open: window.start_time,
                close: window.end_time,
            }
            .into());
        }
        self.next_task_id += 1;
        self.tasks.push(task);
        Ok(id)
    }

    pub fn delete_task(&mut self, task_id: i32) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        self.tasks.len() != before
    }

    pub fn set_completed(&mut self, task_id: i32, completed: bool) -> Result<(), PlanError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(PlanError::TaskNotFound(task_id))?;
        task.is_completed = completed;
        Ok(())
    }

    pub fn set_pinned(&mut self, task_id: i32, pinned: bool) -> Result<(), PlanError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(PlanError::TaskNotFound(task_id))?;
        task.is_pinned = pinned;
        Ok(())
    }

    /// Commit a roster to a task. The conflict check runs here, immediately
    /// before the write, against the current task set.
    pub fn set_crew(&mut self, task_id: i32, crew: Vec<String>) -> Result<(), PlanError> {
        let task = self
            .find_task(task_id)
            .ok_or(PlanError::TaskNotFound(task_id))?;
        let candidate = CandidateSlot {
            date: task.date,
            start_time: task.start_time,
            end_time: task.end_time,
            member_ids: crew.clone(),
        };
        let busy = conflict::find_conflicts(&candidate, &self.tasks, Some(task_id));
        if !busy.is_empty() {
            let mut members: Vec<String> = busy.into_iter().collect();
            members.sort();
            return Err(PlanError::RosterConflict { members });
        }
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .expect("task existed above");
        task.crew = crew;
        Ok(())
    }

    /// Which of the candidate's members are already booked on an overlapping
    /// task.
    pub fn check_conflicts(
        &self,
        candidate: &CandidateSlot,
        exclude_task_id: Option<i32>,
    ) -> HashSet<String> {
        conflict::find_conflicts(candidate, &self.tasks, exclude_task_id)
    }

    fn already_materialized(&self, template_id: i32, date: NaiveDate) -> bool {
        self.tasks
            .iter()
            .any(|t| t.template_id == Some(template_id) && t.date == date)
    }

    /// Expand a template for one date. `Ok(None)` when the pattern does not
    /// fire or the date already carries a task for this template.
    pub fn expand_for_date(
        &mut self,
        template_id: i32,
        date: NaiveDate,
    ) -> Result<Option<TaskRecord>, PlanError> {
        let template = self
            .find_template(template_id)
            .ok_or(PlanError::TemplateNotFound(template_id))?
            .clone();
        if self.already_materialized(template_id, date) {
            return Ok(None);
        }
        let Some(mut task) =
            materializer::materialize_for_date(&template, date, self.working_hours.as_ref())?
        else {
            return Ok(None);
        };
        task.id = self.next_task_id;
        self.next_task_id += 1;
        self.tasks.push(task.clone());
        Ok(Some(task))
    }

    /// Expand a template over an inclusive date range. Window failures and
    /// already-planned dates are reported in the summary, never abort the
    /// pass.
    pub fn expand_for_range(
        &mut self,
        template_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ExpansionSummary, PlanError> {
        let template = self
            .find_template(template_id)
            .ok_or(PlanError::TemplateNotFound(template_id))?
            .clone();

        let outcome = materializer::materialize_for_range(
            &template,
            start_date,
            end_date,
            self.working_hours.as_ref(),
        );

        let mut summary = ExpansionSummary {
            template_id,
            generated: Vec::new(),
            skipped: outcome.skipped.iter().map(|s| s.date).collect(),
            already_planned: Vec::new(),
        };
        for mut task in outcome.tasks {
            if self.already_materialized(template_id, task.date) {
                summary.already_planned.push(task.date);
                continue;
            }
            task.id = self.next_task_id;
            self.next_task_id += 1;
            summary.generated.push(task.id);
            self.tasks.push(task);
        }
        Ok(summary)
    }
}
