// Schedule repository implementation
//
// Owns the pm_schedules table: policy CRUD, soft delete, and the
// overdue/upcoming read surface. Roll-forward on completion lives in the
// execution repository because it is atomic with the execution status write.

use super::queries::schedule_queries;
use crate::db::DbPool;
use crate::errors::{validate_frequency_value, validate_horizon_days, DatabaseError, ExecutionError};
use crate::models::{PmSchedule, ScheduleUpdate};
use chrono::{DateTime, Duration, Utc};
use tracing::instrument;
use uuid::Uuid;

/// Repository for PM schedule database operations
#[derive(Clone)]
pub struct ScheduleRepository {
    pool: DbPool,
}

impl ScheduleRepository {
    /// Create a new ScheduleRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new schedule
    ///
    /// The frequency multiplier is validated here, at the schedule boundary;
    /// the arithmetic itself accepts any multiplier.
    #[instrument(skip(self, schedule))]
    pub async fn create(&self, schedule: &PmSchedule) -> Result<(), ExecutionError> {
        validate_frequency_value(schedule.frequency_value)?;

        sqlx::query(
            r#"
            INSERT INTO pm_schedules (
                id, machine_id, procedure_id, user_id,
                frequency, frequency_value, last_completed, next_due,
                is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(schedule.id)
        .bind(schedule.machine_id)
        .bind(schedule.procedure_id)
        .bind(schedule.user_id)
        .bind(schedule.frequency.to_string())
        .bind(schedule.frequency_value)
        .bind(schedule.last_completed)
        .bind(schedule.next_due)
        .bind(schedule.is_active)
        .bind(schedule.created_at)
        .bind(schedule.updated_at)
        .execute(self.pool.pool())
        .await
        .map_err(DatabaseError::from)?;

        tracing::info!(
            schedule_id = %schedule.id,
            machine_id = %schedule.machine_id,
            frequency = %schedule.frequency,
            frequency_value = schedule.frequency_value,
            "Schedule created"
        );
        Ok(())
    }

    /// Find a schedule by ID
    ///
    /// Inactive schedules remain addressable by id.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PmSchedule>, DatabaseError> {
        let schedule = sqlx::query_as::<_, PmSchedule>(&format!(
            "SELECT {} FROM pm_schedules WHERE id = $1",
            schedule_queries::SELECT_ALL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(schedule)
    }

    /// Find schedules with optional filters
    #[instrument(skip(self))]
    pub async fn find_with_filter(
        &self,
        filter: ScheduleFilter,
    ) -> Result<Vec<PmSchedule>, DatabaseError> {
        let mut query = format!(
            "SELECT {} FROM pm_schedules WHERE 1 = 1",
            schedule_queries::SELECT_ALL_COLUMNS
        );

        let mut param_count = 1;

        if filter.machine_id.is_some() {
            query.push_str(&format!(" AND machine_id = ${}", param_count));
            param_count += 1;
        }

        if filter.user_id.is_some() {
            query.push_str(&format!(" AND user_id = ${}", param_count));
            param_count += 1;
        }

        if filter.is_active.is_some() {
            query.push_str(&format!(" AND is_active = ${}", param_count));
            param_count += 1;
        }

        if filter.overdue == Some(true) {
            query.push_str(&format!(" AND next_due < ${}", param_count));
        }

        query.push_str(" ORDER BY next_due ASC");

        let mut query_builder = sqlx::query_as::<_, PmSchedule>(&query);

        if let Some(machine_id) = filter.machine_id {
            query_builder = query_builder.bind(machine_id);
        }

        if let Some(user_id) = filter.user_id {
            query_builder = query_builder.bind(user_id);
        }

        if let Some(is_active) = filter.is_active {
            query_builder = query_builder.bind(is_active);
        }

        if filter.overdue == Some(true) {
            query_builder = query_builder.bind(Utc::now());
        }

        let schedules = query_builder.fetch_all(self.pool.pool()).await?;

        tracing::debug!(count = schedules.len(), "Found schedules with filter");
        Ok(schedules)
    }

    /// Apply a typed partial update to a schedule
    ///
    /// Manual edits to `next_due` are permitted and bypass the frequency
    /// formula; the invariant between `last_completed` and `next_due` is
    /// restored by the next completion roll-forward.
    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: Uuid,
        update: &ScheduleUpdate,
    ) -> Result<PmSchedule, ExecutionError> {
        if let Some(value) = update.frequency_value {
            validate_frequency_value(value)?;
        }

        let schedule = sqlx::query_as::<_, PmSchedule>(&format!(
            r#"
            UPDATE pm_schedules
            SET machine_id = COALESCE($2, machine_id),
                procedure_id = COALESCE($3, procedure_id),
                user_id = COALESCE($4, user_id),
                frequency = COALESCE($5, frequency),
                frequency_value = COALESCE($6, frequency_value),
                last_completed = COALESCE($7, last_completed),
                next_due = COALESCE($8, next_due),
                is_active = COALESCE($9, is_active),
                updated_at = $10
            WHERE id = $1
            RETURNING {}
            "#,
            schedule_queries::SELECT_ALL_COLUMNS
        ))
        .bind(id)
        .bind(update.machine_id)
        .bind(update.procedure_id)
        .bind(update.user_id)
        .bind(update.frequency.map(|f| f.to_string()))
        .bind(update.frequency_value)
        .bind(update.last_completed)
        .bind(update.next_due)
        .bind(update.is_active)
        .bind(Utc::now())
        .fetch_optional(self.pool.pool())
        .await
        .map_err(DatabaseError::from)?
        .ok_or(ExecutionError::ScheduleNotFound(id))?;

        tracing::info!(schedule_id = %id, "Schedule updated");
        Ok(schedule)
    }

    /// Deactivate a schedule (soft delete)
    ///
    /// Referencing executions remain readable; the schedule stays
    /// addressable by id but drops out of overdue/upcoming queries.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: Uuid) -> Result<(), ExecutionError> {
        let result = sqlx::query(
            r#"
            UPDATE pm_schedules
            SET is_active = FALSE, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(self.pool.pool())
        .await
        .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(ExecutionError::ScheduleNotFound(id));
        }

        tracing::info!(schedule_id = %id, "Schedule deactivated");
        Ok(())
    }

    /// List active schedules whose due date is in the past
    #[instrument(skip(self))]
    pub async fn list_overdue(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<PmSchedule>, DatabaseError> {
        let schedules = sqlx::query_as::<_, PmSchedule>(&format!(
            r#"
            SELECT {}
            FROM pm_schedules
            WHERE is_active = TRUE AND next_due < $1
            ORDER BY next_due ASC
            "#,
            schedule_queries::SELECT_ALL_COLUMNS
        ))
        .bind(now)
        .fetch_all(self.pool.pool())
        .await?;

        tracing::debug!(count = schedules.len(), "Found overdue schedules");
        Ok(schedules)
    }

    /// List active schedules due within the next `horizon_days` days
    ///
    /// The horizon is validated here, at the query boundary; out-of-range
    /// values are rejected before any date arithmetic.
    #[instrument(skip(self))]
    pub async fn list_upcoming(
        &self,
        now: DateTime<Utc>,
        horizon_days: i64,
    ) -> Result<Vec<PmSchedule>, ExecutionError> {
        validate_horizon_days(horizon_days)?;
        let end = now + Duration::days(horizon_days);

        let schedules = sqlx::query_as::<_, PmSchedule>(&format!(
            r#"
            SELECT {}
            FROM pm_schedules
            WHERE is_active = TRUE AND next_due >= $1 AND next_due <= $2
            ORDER BY next_due ASC
            "#,
            schedule_queries::SELECT_ALL_COLUMNS
        ))
        .bind(now)
        .bind(end)
        .fetch_all(self.pool.pool())
        .await
        .map_err(DatabaseError::from)?;

        tracing::debug!(
            count = schedules.len(),
            horizon_days = horizon_days,
            "Found upcoming schedules"
        );
        Ok(schedules)
    }
}

/// Filter for querying schedules
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub machine_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub overdue: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_filter_default() {
        let filter = ScheduleFilter::default();
        assert!(filter.machine_id.is_none());
        assert!(filter.user_id.is_none());
        assert!(filter.is_active.is_none());
        assert!(filter.overdue.is_none());
    }
}
