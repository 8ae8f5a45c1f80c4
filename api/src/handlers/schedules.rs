use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::{ErrorResponse, SuccessResponse};
use crate::state::AppState;
use common::db::repositories::schedule::ScheduleFilter;
use common::db::repositories::{ExecutionRepository, ReferenceRepository, ScheduleRepository};
use common::errors::ExecutionError;
use common::models::{ExecutionStatus, FrequencyUnit, PmExecution, PmSchedule, ScheduleUpdate};

fn default_frequency_value() -> i32 {
    1
}

/// Request body for creating a schedule
#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub machine_id: Uuid,
    pub procedure_id: Uuid,
    pub user_id: Uuid,
    pub frequency: FrequencyUnit,
    #[serde(default = "default_frequency_value")]
    pub frequency_value: i32,
    pub next_due: DateTime<Utc>,
}

/// Query parameters for listing schedules
#[derive(Debug, Deserialize)]
pub struct ListSchedulesQuery {
    pub machine_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub overdue: Option<bool>,
}

/// Create a new maintenance schedule
///
/// The referenced machine, procedure, and responsible user must exist.
#[tracing::instrument(skip(state, request))]
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<Json<SuccessResponse<PmSchedule>>, ErrorResponse> {
    let refs = ReferenceRepository::new(state.db_pool.clone());

    if !refs.machine_exists(request.machine_id).await? {
        return Err(ExecutionError::MachineNotFound(request.machine_id).into());
    }
    if !refs.procedure_exists(request.procedure_id).await? {
        return Err(ExecutionError::ProcedureNotFound(request.procedure_id).into());
    }
    if !refs.user_exists(request.user_id).await? {
        return Err(ExecutionError::UserNotFound(request.user_id).into());
    }

    let schedule = PmSchedule::new(
        request.machine_id,
        request.procedure_id,
        request.user_id,
        request.frequency,
        request.frequency_value,
        request.next_due,
    );

    let repo = ScheduleRepository::new(state.db_pool.clone());
    repo.create(&schedule).await?;

    tracing::info!(schedule_id = %schedule.id, "Schedule created via API");
    Ok(Json(SuccessResponse::new(schedule)))
}

/// List schedules with optional filters
#[tracing::instrument(skip(state))]
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ListSchedulesQuery>,
) -> Result<Json<SuccessResponse<Vec<PmSchedule>>>, ErrorResponse> {
    let filter = ScheduleFilter {
        machine_id: query.machine_id,
        user_id: query.user_id,
        is_active: query.is_active,
        overdue: query.overdue,
    };

    let repo = ScheduleRepository::new(state.db_pool.clone());
    let schedules = repo.find_with_filter(filter).await?;

    tracing::info!(count = schedules.len(), "Listed schedules");
    Ok(Json(SuccessResponse::new(schedules)))
}

/// Get schedule details by ID
#[tracing::instrument(skip(state))]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse<PmSchedule>>, ErrorResponse> {
    let repo = ScheduleRepository::new(state.db_pool.clone());

    match repo.find_by_id(id).await? {
        Some(schedule) => Ok(Json(SuccessResponse::new(schedule))),
        None => Err(ErrorResponse::new(
            "not_found",
            format!("Schedule not found: {}", id),
        )),
    }
}

/// Apply a partial update to a schedule
///
/// Manual edits to `next_due` are permitted and bypass the frequency formula.
#[tracing::instrument(skip(state, update))]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ScheduleUpdate>,
) -> Result<Json<SuccessResponse<PmSchedule>>, ErrorResponse> {
    let repo = ScheduleRepository::new(state.db_pool.clone());
    let schedule = repo.update(id, &update).await?;

    Ok(Json(SuccessResponse::new(schedule)))
}

/// Deactivate a schedule (soft delete)
#[tracing::instrument(skip(state))]
pub async fn deactivate_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse<serde_json::Value>>, ErrorResponse> {
    let repo = ScheduleRepository::new(state.db_pool.clone());
    repo.deactivate(id).await?;

    Ok(Json(SuccessResponse::new(serde_json::json!({
        "message": "Schedule deactivated"
    }))))
}

/// Request body for creating an execution against a schedule
#[derive(Debug, Deserialize)]
pub struct CreateExecutionRequest {
    pub executed_by_id: Uuid,
    pub notes: Option<String>,
}

/// Query parameters for listing a schedule's executions
#[derive(Debug, Deserialize)]
pub struct ListExecutionsQuery {
    pub status: Option<String>,
}

/// Create a new execution for a schedule, in the initial `scheduled` status
#[tracing::instrument(skip(state, request))]
pub async fn create_execution(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
    Json(request): Json<CreateExecutionRequest>,
) -> Result<Json<SuccessResponse<PmExecution>>, ErrorResponse> {
    let mut execution = PmExecution::new(schedule_id, request.executed_by_id);
    execution.notes = request.notes;

    let repo = ExecutionRepository::new(state.db_pool.clone());
    repo.create(&execution).await?;

    tracing::info!(
        execution_id = %execution.id,
        schedule_id = %schedule_id,
        "Execution created via API"
    );
    Ok(Json(SuccessResponse::new(execution)))
}

/// List the execution history of a schedule
#[tracing::instrument(skip(state))]
pub async fn list_schedule_executions(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
    Query(query): Query<ListExecutionsQuery>,
) -> Result<Json<SuccessResponse<Vec<PmExecution>>>, ErrorResponse> {
    let status = match query.status {
        Some(status_str) => match status_str.parse::<ExecutionStatus>() {
            Ok(s) => Some(s),
            Err(_) => {
                return Err(ErrorResponse::new(
                    "validation_error",
                    format!("Invalid status value: {}", status_str),
                ));
            }
        },
        None => None,
    };

    let repo = ExecutionRepository::new(state.db_pool.clone());
    let executions = repo.find_by_schedule_id(schedule_id, status).await?;

    Ok(Json(SuccessResponse::new(executions)))
}
