use super::{PersistenceError, PersistenceResult};
use crate::{EventTemplate, StorePlan, TaskRecord, WorkingHours};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct PlanSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    working_hours: Option<WorkingHours>,
    templates: Vec<EventTemplate>,
    tasks: Vec<TaskRecord>,
}

impl PlanSnapshot {
    fn from_plan(plan: &StorePlan) -> PersistenceResult<Self> {
        super::validate_plan(plan)?;
        Ok(Self {
            working_hours: plan.working_hours().cloned(),
            templates: plan.templates().to_vec(),
            tasks: plan.tasks().to_vec(),
        })
    }

    fn into_plan(self) -> PersistenceResult<StorePlan> {
        super::validate_templates(&self.templates)?;
        super::validate_tasks(&self.tasks)?;
        let mut plan = StorePlan::from_parts(self.working_hours, self.templates, Vec::new());
        for task in self.tasks {
            plan.upsert_task_record(task)
                .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        }
        Ok(plan)
    }
}

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &StorePlan, path: P) -> PersistenceResult<()> {
    let snapshot = PlanSnapshot::from_plan(plan)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<StorePlan> {
    let file = File::open(path)?;
    let snapshot: PlanSnapshot = serde_json::from_reader(file)?;
    snapshot.into_plan()
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: i32,
    title: String,
    date: String,
    start_time: String,
    end_time: String,
    duration_seconds: u32,
    duration_label: String,
    packages: u32,
    crew: String,
    is_completed: String,
    is_pinned: String,
    template_id: String,
    #[serde(default)]
    working_hours_json: String,
    #[serde(default)]
    templates_json: String,
}

impl From<&TaskRecord> for TaskCsvRecord {
    fn from(task: &TaskRecord) -> Self {
        let mut record = TaskCsvRecord::default();
        record.id = task.id;
        record.title = task.title.clone();
        record.date = task.date.to_string();
        record.start_time = task.start_time.to_string();
        record.end_time = task.end_time.to_string();
        record.duration_seconds = task.duration_seconds;
        record.duration_label = task.duration_label.clone();
        record.packages = task.packages;
        record.crew = task.crew.join(",");
        record.is_completed = task.is_completed.to_string();
        record.is_pinned = task.is_pinned.to_string();
        record.template_id = task
            .template_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        record
    }
}

impl TaskCsvRecord {
    fn meta_row(plan: &StorePlan) -> PersistenceResult<Self> {
        let mut record = TaskCsvRecord::default();
        record.title = "__meta__".to_string();
        record.working_hours_json = serde_json::to_string(&plan.working_hours())?;
        record.templates_json = serde_json::to_string(plan.templates())?;
        Ok(record)
    }

    fn is_meta_row(&self) -> bool {
        !self.templates_json.trim().is_empty()
    }

    fn into_task(self) -> PersistenceResult<TaskRecord> {
        if self.is_meta_row() {
            return Err(PersistenceError::InvalidData(
                "meta row cannot be converted to task".into(),
            ));
        }
        let mut task = TaskRecord::new(
            self.id,
            self.title,
            parse_date(&self.date)?,
            parse_time(&self.start_time)?,
            self.duration_seconds,
            self.packages,
        )
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        task.crew = split_members(&self.crew);
        task.is_completed = parse_bool(&self.is_completed)?;
        task.is_pinned = parse_bool(&self.is_pinned)?;
        task.template_id = parse_opt_i32(&self.template_id)?;
        Ok(task)
    }
}

pub fn save_plan_to_csv<P: AsRef<Path>>(plan: &StorePlan, path: P) -> PersistenceResult<()> {
    super::validate_plan(plan)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(TaskCsvRecord::meta_row(plan)?)?;
    for task in plan.tasks() {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_plan_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<StorePlan> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut working_hours: Option<WorkingHours> = None;
    let mut templates: Vec<EventTemplate> = Vec::new();
    let mut tasks: Vec<TaskRecord> = Vec::new();
    let mut saw_meta = false;

    for row in reader.deserialize::<TaskCsvRecord>() {
        let record = row?;
        if record.is_meta_row() {
            working_hours = serde_json::from_str(&record.working_hours_json)?;
            templates = serde_json::from_str(&record.templates_json)?;
            saw_meta = true;
            continue;
        }
        tasks.push(record.into_task()?);
    }

    if !saw_meta {
        return Err(PersistenceError::InvalidData(
            "csv file is missing the meta row".into(),
        ));
    }

    PlanSnapshot {
        working_hours,
        templates,
        tasks,
    }
    .into_plan()
}

fn parse_date(value: &str) -> PersistenceResult<NaiveDate> {
    value
        .parse::<NaiveDate>()
        .map_err(|err| PersistenceError::InvalidData(format!("bad date '{value}': {err}")))
}

fn parse_time(value: &str) -> PersistenceResult<NaiveTime> {
    value
        .parse::<NaiveTime>()
        .map_err(|err| PersistenceError::InvalidData(format!("bad time '{value}': {err}")))
}

fn parse_bool(value: &str) -> PersistenceResult<bool> {
    match value.trim() {
        "" | "false" => Ok(false),
        "true" => Ok(true),
        other => Err(PersistenceError::InvalidData(format!(
            "bad boolean '{other}'"
        ))),
    }
}

fn parse_opt_i32(value: &str) -> PersistenceResult<Option<i32>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|err| PersistenceError::InvalidData(format!("bad id '{trimmed}': {err}")))
}

fn split_members(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
