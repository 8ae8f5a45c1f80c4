use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::handlers::{ErrorResponse, SuccessResponse};
use crate::state::AppState;
use common::db::repositories::ScheduleRepository;
use common::models::PmSchedule;

fn default_horizon_days() -> i64 {
    7
}

/// Query parameters for the upcoming dashboard
#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    /// Number of days to look ahead
    #[serde(default = "default_horizon_days")]
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct OverdueReport {
    pub overdue_count: usize,
    pub overdue_schedules: Vec<PmSchedule>,
}

#[derive(Debug, Serialize)]
pub struct UpcomingReport {
    pub upcoming_count: usize,
    pub upcoming_schedules: Vec<PmSchedule>,
    pub days_ahead: i64,
}

/// List all active schedules whose due date has passed
///
/// Overdue is a derived read over stored `next_due` values; nothing is
/// triggered by this query.
#[tracing::instrument(skip(state))]
pub async fn overdue_schedules(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<OverdueReport>>, ErrorResponse> {
    let repo = ScheduleRepository::new(state.db_pool.clone());
    let schedules = repo.list_overdue(Utc::now()).await?;

    tracing::info!(count = schedules.len(), "Listed overdue schedules");
    Ok(Json(SuccessResponse::new(OverdueReport {
        overdue_count: schedules.len(),
        overdue_schedules: schedules,
    })))
}

/// List active schedules due within the requested horizon
///
/// Out-of-range horizons are rejected with a validation error by the
/// repository before any date arithmetic runs.
#[tracing::instrument(skip(state))]
pub async fn upcoming_schedules(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<SuccessResponse<UpcomingReport>>, ErrorResponse> {
    let repo = ScheduleRepository::new(state.db_pool.clone());
    let schedules = repo.list_upcoming(Utc::now(), query.days).await?;

    tracing::info!(
        count = schedules.len(),
        days_ahead = query.days,
        "Listed upcoming schedules"
    );
    Ok(Json(SuccessResponse::new(UpcomingReport {
        upcoming_count: schedules.len(),
        upcoming_schedules: schedules,
        days_ahead: query.days,
    })))
}
