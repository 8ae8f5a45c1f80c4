use axum::{extract::State, Json};
use serde::Serialize;

use crate::handlers::{ErrorResponse, SuccessResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// Health check endpoint: verifies the database connection is alive
#[tracing::instrument(skip(state))]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<HealthStatus>>, ErrorResponse> {
    state.db_pool.health_check().await?;

    Ok(Json(SuccessResponse::new(HealthStatus {
        status: "ok",
        database: "ok",
    })))
}
