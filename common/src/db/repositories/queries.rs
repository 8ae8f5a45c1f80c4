// SQL query constants for repositories
// Centralizes repeated SELECT column lists

/// SQL query fragments for pm_schedules table
pub mod schedule_queries {
    pub const SELECT_ALL_COLUMNS: &str = r#"id, machine_id, procedure_id, user_id,
        frequency, frequency_value, last_completed, next_due, is_active,
        created_at, updated_at"#;
}

/// SQL query fragments for pm_executions table
pub mod execution_queries {
    pub const SELECT_ALL_COLUMNS: &str = r#"id, pm_schedule_id, executed_by_id, status,
        notes, started_at, completed_at, next_due_calculated,
        created_at, updated_at"#;
}
