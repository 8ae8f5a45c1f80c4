// Property-based tests for API payload shapes

use common::models::{ExecutionStatus, ExecutionUpdate, FrequencyUnit, ScheduleUpdate};
use proptest::prelude::*;

/// *For any* frequency unit, the JSON wire form is the snake_case name the
/// database also stores.
#[test]
fn property_frequency_unit_json_matches_text_form() {
    proptest!(|(unit in prop::sample::select(vec![
        FrequencyUnit::Daily,
        FrequencyUnit::Weekly,
        FrequencyUnit::Monthly,
        FrequencyUnit::Quarterly,
        FrequencyUnit::Annual,
    ]))| {
        let json = serde_json::to_string(&unit).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", unit));
    });
}

/// *For any* execution status, the JSON wire form matches the stored text.
#[test]
fn property_execution_status_json_matches_text_form() {
    proptest!(|(status in prop::sample::select(vec![
        ExecutionStatus::Scheduled,
        ExecutionStatus::InProgress,
        ExecutionStatus::Completed,
        ExecutionStatus::Cancelled,
        ExecutionStatus::Overdue,
    ]))| {
        let json = serde_json::to_string(&status).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", status));
    });
}

#[test]
fn execution_update_deserializes_with_missing_fields() {
    let update: ExecutionUpdate = serde_json::from_str(r#"{"status": "in_progress"}"#).unwrap();
    assert_eq!(update.status, Some(ExecutionStatus::InProgress));
    assert!(update.notes.is_none());
    assert!(update.started_at.is_none());
    assert!(update.completed_at.is_none());
}

#[test]
fn execution_update_rejects_unknown_status() {
    let result = serde_json::from_str::<ExecutionUpdate>(r#"{"status": "done"}"#);
    assert!(result.is_err());
}

#[test]
fn schedule_update_empty_body_is_empty() {
    let update: ScheduleUpdate = serde_json::from_str("{}").unwrap();
    assert!(update.is_empty());
}

#[test]
fn schedule_update_partial_body_is_not_empty() {
    let update: ScheduleUpdate =
        serde_json::from_str(r#"{"frequency": "monthly", "frequency_value": 3}"#).unwrap();
    assert!(!update.is_empty());
    assert_eq!(update.frequency, Some(FrequencyUnit::Monthly));
    assert_eq!(update.frequency_value, Some(3));
}
