use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    CandidateSlot, EventTemplate, ExpansionSummary, PlanError, StorePlan, TaskRecord, WorkingHours,
};

#[derive(Clone)]
pub struct AppState {
    plan: Arc<RwLock<StorePlan>>,
}

impl AppState {
    pub fn new(plan: StorePlan) -> Self {
        Self {
            plan: Arc::new(RwLock::new(plan)),
        }
    }

    pub fn with_shared(plan: Arc<RwLock<StorePlan>>) -> Self {
        Self { plan }
    }

    fn plan(&self) -> Arc<RwLock<StorePlan>> {
        self.plan.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<PlanError> for ApiError {
    fn from(value: PlanError) -> Self {
        match &value {
            PlanError::TemplateNotFound(_) | PlanError::TaskNotFound(_) => {
                ApiError::NotFound(value.to_string())
            }
            PlanError::RosterConflict { .. } => ApiError::Conflict(value.to_string()),
            _ => ApiError::Invalid(value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Conflict(message) => {
                let body = Json(ErrorBody {
                    error: "conflict",
                    message,
                });
                (StatusCode::CONFLICT, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExpandPayload {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct CrewPayload {
    crew: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ConflictPayload {
    #[serde(flatten)]
    candidate: CandidateSlot,
    #[serde(default)]
    exclude_task_id: Option<i32>,
}

#[derive(Debug, Serialize)]
struct ConflictResponse {
    members: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/working_hours",
            get(get_working_hours)
                .put(set_working_hours)
                .delete(clear_working_hours),
        )
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/:id",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/templates/:id/expand", post(expand_template))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/crew", put(assign_crew))
        .route("/conflicts", post(check_conflicts))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, plan: StorePlan) -> std::io::Result<()> {
    let state = AppState::new(plan);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_working_hours(State(state): State<AppState>) -> Result<Json<WorkingHours>, ApiError> {
    let plan = state.plan();
    let hours = {
        let guard = plan.read();
        guard.working_hours().cloned()
    };
    match hours {
        Some(hours) => Ok(Json(hours)),
        None => Err(ApiError::not_found("no working hours configured")),
    }
}

async fn set_working_hours(
    State(state): State<AppState>,
    Json(hours): Json<WorkingHours>,
) -> Result<Json<WorkingHours>, ApiError> {
    let plan = state.plan();
    {
        let mut guard = plan.write();
        guard.set_working_hours(hours.clone()).map_err(ApiError::from)?;
    }
    Ok(Json(hours))
}

async fn clear_working_hours(State(state): State<AppState>) -> StatusCode {
    let plan = state.plan();
    let mut guard = plan.write();
    guard.clear_working_hours();
    StatusCode::NO_CONTENT
}

async fn list_templates(State(state): State<AppState>) -> Json<Vec<EventTemplate>> {
    let plan = state.plan();
    let templates = {
        let guard = plan.read();
        guard.templates().to_vec()
    };
    Json(templates)
}

async fn create_template(
    State(state): State<AppState>,
    Json(template): Json<EventTemplate>,
) -> Result<(StatusCode, Json<EventTemplate>), ApiError> {
    let plan = state.plan();
    {
        let mut guard = plan.write();
        if guard.find_template(template.id).is_some() {
            return Err(ApiError::Conflict(format!(
                "template {} already exists",
                template.id
            )));
        }
        guard.upsert_template(template.clone()).map_err(ApiError::from)?;
    }
    let created = {
        let guard = plan.read();
        guard
            .find_template(template.id)
            .cloned()
            .ok_or_else(|| ApiError::internal("template not found after creation"))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<i32>,
) -> Result<Json<EventTemplate>, ApiError> {
    let plan = state.plan();
    let result = {
        let guard = plan.read();
        guard.find_template(template_id).cloned()
    };
    match result {
        Some(template) => Ok(Json(template)),
        None => Err(ApiError::not_found(format!(
            "template {template_id} not found"
        ))),
    }
}

async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<i32>,
    Json(template): Json<EventTemplate>,
) -> Result<Json<EventTemplate>, ApiError> {
    if template.id != template_id {
        return Err(ApiError::invalid(
            "template id in payload does not match path parameter",
        ));
    }
    let plan = state.plan();
    {
        let mut guard = plan.write();
        if guard.find_template(template_id).is_none() {
            return Err(ApiError::not_found(format!(
                "template {template_id} not found"
            )));
        }
        guard.upsert_template(template.clone()).map_err(ApiError::from)?;
    }
    Ok(Json(template))
}

async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let plan = state.plan();
    let removed = {
        let mut guard = plan.write();
        guard.delete_template(template_id)
    };
    if !removed {
        return Err(ApiError::not_found(format!(
            "template {template_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn expand_template(
    State(state): State<AppState>,
    Path(template_id): Path<i32>,
    Json(payload): Json<ExpandPayload>,
) -> Result<Json<ExpansionSummary>, ApiError> {
    if payload.end_date < payload.start_date {
        return Err(ApiError::invalid("end_date is before start_date"));
    }
    let plan = state.plan();
    let summary = {
        let mut guard = plan.write();
        guard
            .expand_for_range(template_id, payload.start_date, payload.end_date)
            .map_err(ApiError::from)?
    };
    Ok(Json(summary))
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<TaskRecord>> {
    let plan = state.plan();
    let tasks = {
        let guard = plan.read();
        guard.tasks().to_vec()
    };
    Json(tasks)
}

async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<TaskRecord>,
) -> Result<(StatusCode, Json<TaskRecord>), ApiError> {
    let plan = state.plan();
    {
        let mut guard = plan.write();
        if guard.find_task(task.id).is_some() {
            return Err(ApiError::Conflict(format!(
                "task {} already exists",
                task.id
            )));
        }
        guard.upsert_task_record(task.clone()).map_err(ApiError::from)?;
    }
    let created = {
        let guard = plan.read();
        guard
            .find_task(task.id)
            .cloned()
            .ok_or_else(|| ApiError::internal("task not found after creation"))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<Json<TaskRecord>, ApiError> {
    let plan = state.plan();
    let result = {
        let guard = plan.read();
        guard.find_task(task_id).cloned()
    };
    match result {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::not_found(format!("task {task_id} not found"))),
    }
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Json(task): Json<TaskRecord>,
) -> Result<Json<TaskRecord>, ApiError> {
    if task.id != task_id {
        return Err(ApiError::invalid(
            "task id in payload does not match path parameter",
        ));
    }
    let plan = state.plan();
    {
        let mut guard = plan.write();
        if guard.find_task(task_id).is_none() {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        guard.upsert_task_record(task.clone()).map_err(ApiError::from)?;
    }
    let updated = {
        let guard = plan.read();
        guard
            .find_task(task_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("task not found after update"))?
    };
    Ok(Json(updated))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let plan = state.plan();
    let removed = {
        let mut guard = plan.write();
        guard.delete_task(task_id)
    };
    if !removed {
        return Err(ApiError::not_found(format!("task {task_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_crew(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Json(payload): Json<CrewPayload>,
) -> Result<Json<TaskRecord>, ApiError> {
    let plan = state.plan();
    {
        let mut guard = plan.write();
        guard.set_crew(task_id, payload.crew).map_err(ApiError::from)?;
    }
    let updated = {
        let guard = plan.read();
        guard
            .find_task(task_id)
            .cloned()
            .ok_or_else(|| ApiError::internal("task not found after crew assignment"))?
    };
    Ok(Json(updated))
}

async fn check_conflicts(
    State(state): State<AppState>,
    Json(payload): Json<ConflictPayload>,
) -> Json<ConflictResponse> {
    let plan = state.plan();
    let busy = {
        let guard = plan.read();
        guard.check_conflicts(&payload.candidate, payload.exclude_task_id)
    };
    let mut members: Vec<String> = busy.into_iter().collect();
    members.sort();
    Json(ConflictResponse { members })
}
