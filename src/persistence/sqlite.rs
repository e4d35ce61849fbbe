use super::{PersistenceResult, PlanStore};
use crate::{EventTemplate, StorePlan, TaskRecord, WorkingHours};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqlitePlanStore {
    connection: Mutex<Connection>,
}

impl SqlitePlanStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS plan_config (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                working_hours_json TEXT
            );
            CREATE TABLE IF NOT EXISTS templates (
                id INTEGER PRIMARY KEY,
                template_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                task_json TEXT NOT NULL,
                template_id INTEGER,
                date TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_tasks_template_date
                ON tasks (template_id, date)
                WHERE template_id IS NOT NULL;
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_config(
        &self,
        tx: &rusqlite::Transaction,
        hours: Option<&WorkingHours>,
    ) -> PersistenceResult<()> {
        let json = match hours {
            Some(hours) => Some(serde_json::to_string(hours)?),
            None => None,
        };
        tx.execute("DELETE FROM plan_config", [])?;
        tx.execute(
            "INSERT INTO plan_config (id, working_hours_json) VALUES (1, ?1)",
            params![json],
        )?;
        Ok(())
    }

    fn save_templates(
        &self,
        tx: &rusqlite::Transaction,
        templates: &[EventTemplate],
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM templates", [])?;
        let mut stmt = tx.prepare("INSERT INTO templates (id, template_json) VALUES (?1, ?2)")?;
        for template in templates {
            let json = serde_json::to_string(template)?;
            stmt.execute(params![template.id, json])?;
        }
        Ok(())
    }

    fn save_tasks(&self, tx: &rusqlite::Transaction, tasks: &[TaskRecord]) -> PersistenceResult<()> {
        tx.execute("DELETE FROM tasks", [])?;
        let mut stmt = tx.prepare(
            "INSERT INTO tasks (id, task_json, template_id, date) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for task in tasks {
            let json = serde_json::to_string(task)?;
            stmt.execute(params![task.id, json, task.template_id, task.date.to_string()])?;
        }
        Ok(())
    }

    /// Append one materialized task, relying on the unique (template, date)
    /// index for de-duplication. Returns `false` when the slot was already
    /// materialized, which callers treat as "skip", not as an error.
    pub fn append_materialized(&self, task: &TaskRecord) -> PersistenceResult<bool> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let json = serde_json::to_string(task)?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO tasks (id, task_json, template_id, date) VALUES (?1, ?2, ?3, ?4)",
            params![task.id, json, task.template_id, task.date.to_string()],
        )?;
        Ok(inserted > 0)
    }
}

impl PlanStore for SqlitePlanStore {
    fn save_plan(&self, plan: &StorePlan) -> PersistenceResult<()> {
        super::validate_plan(plan)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        self.save_config(&tx, plan.working_hours())?;
        self.save_templates(&tx, plan.templates())?;
        self.save_tasks(&tx, plan.tasks())?;
        tx.commit()?;
        Ok(())
    }

    fn load_plan(&self) -> PersistenceResult<Option<StorePlan>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare("SELECT working_hours_json FROM plan_config WHERE id = 1")?;
        let config_row: Option<Option<String>> =
            stmt.query_row([], |row| row.get(0)).optional()?;

        let Some(working_hours_json) = config_row else {
            return Ok(None);
        };

        let working_hours: Option<WorkingHours> = match working_hours_json {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };

        let mut stmt = conn.prepare("SELECT template_json FROM templates ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut templates = Vec::new();
        for json in rows {
            let template: EventTemplate = serde_json::from_str(&json?)?;
            templates.push(template);
        }

        let mut stmt = conn.prepare("SELECT task_json FROM tasks ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut tasks = Vec::new();
        for json in rows {
            let task: TaskRecord = serde_json::from_str(&json?)?;
            tasks.push(task);
        }

        super::validate_templates(&templates)?;
        super::validate_tasks(&tasks)?;

        let mut plan = StorePlan::from_parts(working_hours, templates, Vec::new());
        for task in tasks {
            plan.upsert_task_record(task)
                .map_err(|err| super::PersistenceError::InvalidData(err.to_string()))?;
        }

        Ok(Some(plan))
    }
}
