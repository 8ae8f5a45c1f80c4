// Error handling framework for the maintenance engine

use thiserror::Error;
use uuid::Uuid;

/// Upper bound on the frequency multiplier accepted at the schedule boundary
///
/// Keeps the day arithmetic far away from the chrono date range; 1000 annual
/// periods is already a thousand-year cadence.
pub const MAX_FREQUENCY_VALUE: i32 = 1000;

/// Upper bound on the upcoming-query horizon, in days (ten years)
pub const MAX_HORIZON_DAYS: i64 = 3650;

/// Frequency-policy validation errors
///
/// Raised at the schedule and query boundaries; the frequency arithmetic
/// itself has no error conditions.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Frequency multiplier must be between 1 and {max}, got {0}", max = MAX_FREQUENCY_VALUE)]
    InvalidMultiplier(i32),

    #[error("Horizon must be between 0 and {max} days, got {0}", max = MAX_HORIZON_DAYS)]
    InvalidHorizon(i64),
}

/// Maintenance execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Schedule not found: {0}")]
    ScheduleNotFound(Uuid),

    #[error("Execution not found: {0}")]
    ExecutionNotFound(Uuid),

    #[error("Machine not found: {0}")]
    MachineNotFound(Uuid),

    #[error("Procedure not found: {0}")]
    ProcedureNotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Invalid status transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("Conflicting mutation on schedule {0}, retry the completion")]
    ConflictingMutation(Uuid),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(#[from] PolicyError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Database-specific errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate key violation: {0}")]
    DuplicateKey(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Concurrent write conflict: {0}")]
    WriteConflict(String),
}

// Implement From for common external errors
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Check for specific database error codes
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => DatabaseError::DuplicateKey(db_err.message().to_string()),
                        "23503" => DatabaseError::ForeignKeyViolation(db_err.message().to_string()),
                        // serialization_failure / deadlock_detected / lock_not_available
                        "40001" | "40P01" | "55P03" => {
                            DatabaseError::WriteConflict(db_err.message().to_string())
                        }
                        _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                    }
                } else {
                    DatabaseError::QueryFailed(db_err.message().to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Validate a frequency multiplier at the schedule boundary
pub fn validate_frequency_value(value: i32) -> Result<(), PolicyError> {
    if !(1..=MAX_FREQUENCY_VALUE).contains(&value) {
        return Err(PolicyError::InvalidMultiplier(value));
    }
    Ok(())
}

/// Validate an upcoming-query horizon at the query boundary
///
/// Bounds checking here keeps `chrono::Duration::days` out of panic range
/// for any caller-supplied value.
pub fn validate_horizon_days(days: i64) -> Result<(), PolicyError> {
    if !(0..=MAX_HORIZON_DAYS).contains(&days) {
        return Err(PolicyError::InvalidHorizon(days));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_error_display() {
        let err = PolicyError::InvalidMultiplier(0);
        assert!(err.to_string().contains(">= 1"));
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = ExecutionError::InvalidTransition {
            from: "completed".to_string(),
            to: "in_progress".to_string(),
        };
        assert!(err.to_string().contains("completed"));
        assert!(err.to_string().contains("in_progress"));
    }

    #[test]
    fn test_validate_frequency_value() {
        assert!(validate_frequency_value(1).is_ok());
        assert!(validate_frequency_value(12).is_ok());
        assert!(validate_frequency_value(MAX_FREQUENCY_VALUE).is_ok());
        assert!(validate_frequency_value(0).is_err());
        assert!(validate_frequency_value(-3).is_err());
        assert!(validate_frequency_value(MAX_FREQUENCY_VALUE + 1).is_err());
        assert!(validate_frequency_value(i32::MAX).is_err());
    }

    #[test]
    fn test_validate_horizon_days() {
        assert!(validate_horizon_days(0).is_ok());
        assert!(validate_horizon_days(7).is_ok());
        assert!(validate_horizon_days(MAX_HORIZON_DAYS).is_ok());
        assert!(validate_horizon_days(-1).is_err());
        assert!(validate_horizon_days(MAX_HORIZON_DAYS + 1).is_err());
        // An unbounded horizon must be rejected before any date arithmetic
        assert!(validate_horizon_days(i64::MAX).is_err());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }
}
