use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::handlers::{ErrorResponse, SuccessResponse};
use crate::state::AppState;
use common::db::repositories::ExecutionRepository;
use common::models::{ExecutionUpdate, PmExecution};

/// Get execution details by ID
#[tracing::instrument(skip(state))]
pub async fn get_execution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse<PmExecution>>, ErrorResponse> {
    let repo = ExecutionRepository::new(state.db_pool.clone());

    match repo.find_by_id(id).await? {
        Some(execution) => Ok(Json(SuccessResponse::new(execution))),
        None => {
            tracing::warn!(execution_id = %id, "Execution not found");
            Err(ErrorResponse::new(
                "not_found",
                format!("Execution not found: {}", id),
            ))
        }
    }
}

/// Apply a partial update to an execution
///
/// A status of `completed` triggers the schedule roll-forward; the status
/// write and the schedule mutation commit or abort together.
#[tracing::instrument(skip(state, update))]
pub async fn update_execution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ExecutionUpdate>,
) -> Result<Json<SuccessResponse<PmExecution>>, ErrorResponse> {
    let repo = ExecutionRepository::new(state.db_pool.clone());
    let execution = repo.apply_update(id, &update).await?;

    tracing::info!(
        execution_id = %id,
        status = %execution.status,
        "Execution updated via API"
    );
    Ok(Json(SuccessResponse::new(execution)))
}
