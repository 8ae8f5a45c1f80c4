pub mod dashboard;
pub mod executions;
pub mod health;
pub mod schedules;

// Common response types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::errors::{DatabaseError, ExecutionError};
use serde::Serialize;

/// Standard API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub trace_id: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<ExecutionError> for ErrorResponse {
    fn from(err: ExecutionError) -> Self {
        let code = match &err {
            ExecutionError::ScheduleNotFound(_)
            | ExecutionError::ExecutionNotFound(_)
            | ExecutionError::MachineNotFound(_)
            | ExecutionError::ProcedureNotFound(_)
            | ExecutionError::UserNotFound(_) => "not_found",
            ExecutionError::InvalidPolicy(_) => "validation_error",
            ExecutionError::InvalidTransition { .. } | ExecutionError::ConflictingMutation(_) => {
                "conflict"
            }
            ExecutionError::Database(_) => "database_error",
        };
        ErrorResponse::new(code, err.to_string())
    }
}

impl From<DatabaseError> for ErrorResponse {
    fn from(err: DatabaseError) -> Self {
        let code = match &err {
            DatabaseError::NotFound(_) => "not_found",
            DatabaseError::WriteConflict(_) => "conflict",
            _ => "database_error",
        };
        ErrorResponse::new(code, err.to_string())
    }
}

/// Standard API success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for SuccessResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
