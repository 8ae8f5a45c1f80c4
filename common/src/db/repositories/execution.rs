// Execution repository implementation
//
// Owns the pm_executions table and the status lifecycle. The completion
// roll-forward mutates the parent schedule inside the same transaction as the
// execution status write: a reader never observes `completed_at` set without
// the schedule's `next_due` advanced, or the reverse.

use super::queries::{execution_queries, schedule_queries};
use crate::db::DbPool;
use crate::errors::{DatabaseError, ExecutionError};
use crate::frequency::advance;
use crate::models::{ExecutionStatus, ExecutionUpdate, PmExecution, PmSchedule};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

/// Repository for PM execution database operations
#[derive(Clone)]
pub struct ExecutionRepository {
    pool: DbPool,
}

impl ExecutionRepository {
    /// Create a new ExecutionRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new execution record against a schedule
    ///
    /// Both the schedule and the executing user must exist.
    #[instrument(skip(self, execution))]
    pub async fn create(&self, execution: &PmExecution) -> Result<(), ExecutionError> {
        let schedule_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pm_schedules WHERE id = $1)")
                .bind(execution.pm_schedule_id)
                .fetch_one(self.pool.pool())
                .await
                .map_err(DatabaseError::from)?;
        if !schedule_exists {
            return Err(ExecutionError::ScheduleNotFound(execution.pm_schedule_id));
        }

        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(execution.executed_by_id)
                .fetch_one(self.pool.pool())
                .await
                .map_err(DatabaseError::from)?;
        if !user_exists {
            return Err(ExecutionError::UserNotFound(execution.executed_by_id));
        }

        sqlx::query(
            r#"
            INSERT INTO pm_executions (
                id, pm_schedule_id, executed_by_id, status, notes,
                started_at, completed_at, next_due_calculated,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(execution.id)
        .bind(execution.pm_schedule_id)
        .bind(execution.executed_by_id)
        .bind(execution.status.to_string())
        .bind(&execution.notes)
        .bind(execution.started_at)
        .bind(execution.completed_at)
        .bind(execution.next_due_calculated)
        .bind(execution.created_at)
        .bind(execution.updated_at)
        .execute(self.pool.pool())
        .await
        .map_err(DatabaseError::from)?;

        tracing::info!(
            execution_id = %execution.id,
            schedule_id = %execution.pm_schedule_id,
            "Execution created"
        );
        Ok(())
    }

    /// Find an execution by ID
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PmExecution>, DatabaseError> {
        let execution = sqlx::query_as::<_, PmExecution>(&format!(
            "SELECT {} FROM pm_executions WHERE id = $1",
            execution_queries::SELECT_ALL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(execution)
    }

    /// Find executions for a schedule, optionally filtered by status
    #[instrument(skip(self))]
    pub async fn find_by_schedule_id(
        &self,
        schedule_id: Uuid,
        status: Option<ExecutionStatus>,
    ) -> Result<Vec<PmExecution>, DatabaseError> {
        let executions = match status {
            Some(status) => {
                sqlx::query_as::<_, PmExecution>(&format!(
                    r#"
                    SELECT {}
                    FROM pm_executions
                    WHERE pm_schedule_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    "#,
                    execution_queries::SELECT_ALL_COLUMNS
                ))
                .bind(schedule_id)
                .bind(status.to_string())
                .fetch_all(self.pool.pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, PmExecution>(&format!(
                    r#"
                    SELECT {}
                    FROM pm_executions
                    WHERE pm_schedule_id = $1
                    ORDER BY created_at DESC
                    "#,
                    execution_queries::SELECT_ALL_COLUMNS
                ))
                .bind(schedule_id)
                .fetch_all(self.pool.pool())
                .await?
            }
        };

        Ok(executions)
    }

    /// Apply a typed partial update to an execution, driving the status
    /// lifecycle.
    ///
    /// Transitions may only originate from a non-terminal status. The
    /// `in_progress` transition stamps `started_at` once and never
    /// overwrites it. The `completed` transition stamps `completed_at`
    /// (caller value or now) and rolls the parent schedule forward in the
    /// same transaction, with the schedule row locked for the duration.
    /// Lock or serialization conflicts surface as `ConflictingMutation`.
    #[instrument(skip(self, update))]
    pub async fn apply_update(
        &self,
        id: Uuid,
        update: &ExecutionUpdate,
    ) -> Result<PmExecution, ExecutionError> {
        let mut tx = self
            .pool
            .pool()
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        // Lock the execution row so concurrent updates to the same
        // execution serialize.
        let mut execution = sqlx::query_as::<_, PmExecution>(&format!(
            "SELECT {} FROM pm_executions WHERE id = $1 FOR UPDATE",
            execution_queries::SELECT_ALL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::from)?
        .ok_or(ExecutionError::ExecutionNotFound(id))?;

        let schedule_id = execution.pm_schedule_id;
        let conflict = |e: sqlx::Error| match DatabaseError::from(e) {
            DatabaseError::WriteConflict(_) => ExecutionError::ConflictingMutation(schedule_id),
            other => ExecutionError::Database(other),
        };

        // Terminal executions are immutable history.
        if execution.status.is_terminal() {
            return Err(ExecutionError::InvalidTransition {
                from: execution.status.to_string(),
                to: update.status.unwrap_or(execution.status).to_string(),
            });
        }

        if let Some(next) = update.status {
            if !execution.status.can_transition_to(next) {
                return Err(ExecutionError::InvalidTransition {
                    from: execution.status.to_string(),
                    to: next.to_string(),
                });
            }
        }

        let now = Utc::now();

        if let Some(notes) = &update.notes {
            execution.notes = Some(notes.clone());
        }

        match update.status {
            Some(ExecutionStatus::InProgress) => {
                // Idempotent: an existing started_at is never overwritten.
                if execution.started_at.is_none() {
                    execution.started_at = Some(update.started_at.unwrap_or(now));
                }
                execution.status = ExecutionStatus::InProgress;
            }
            Some(ExecutionStatus::Completed) => {
                let completed_at = update.completed_at.unwrap_or(now);
                execution.completed_at = Some(completed_at);
                execution.status = ExecutionStatus::Completed;

                // Roll the parent schedule forward under a row lock.
                let schedule = sqlx::query_as::<_, PmSchedule>(&format!(
                    "SELECT {} FROM pm_schedules WHERE id = $1 FOR UPDATE",
                    schedule_queries::SELECT_ALL_COLUMNS
                ))
                .bind(schedule_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(conflict)?
                .ok_or(ExecutionError::ScheduleNotFound(schedule_id))?;

                let next_due = advance(completed_at, schedule.frequency, schedule.frequency_value);
                execution.next_due_calculated = Some(next_due);

                sqlx::query(
                    r#"
                    UPDATE pm_schedules
                    SET last_completed = $2, next_due = $3, updated_at = $4
                    WHERE id = $1
                    "#,
                )
                .bind(schedule_id)
                .bind(completed_at)
                .bind(next_due)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(conflict)?;

                tracing::info!(
                    execution_id = %id,
                    schedule_id = %schedule_id,
                    completed_at = %completed_at,
                    next_due = %next_due,
                    "Schedule rolled forward on completion"
                );
            }
            Some(status) => {
                // cancelled / overdue / scheduled: status write only,
                // no schedule side effects.
                execution.status = status;
            }
            None => {}
        }

        execution.updated_at = now;

        sqlx::query(
            r#"
            UPDATE pm_executions
            SET status = $2,
                notes = $3,
                started_at = $4,
                completed_at = $5,
                next_due_calculated = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(execution.id)
        .bind(execution.status.to_string())
        .bind(&execution.notes)
        .bind(execution.started_at)
        .bind(execution.completed_at)
        .bind(execution.next_due_calculated)
        .bind(execution.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(conflict)?;

        tx.commit()
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::WriteConflict(_) => {
                    ExecutionError::ConflictingMutation(schedule_id)
                }
                other => ExecutionError::Database(other),
            })?;

        tracing::debug!(
            execution_id = %id,
            status = %execution.status,
            "Execution updated"
        );
        Ok(execution)
    }
}
