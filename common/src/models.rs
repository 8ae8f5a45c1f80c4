use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Schedule Models
// ============================================================================

/// PmSchedule represents one recurring maintenance policy: a machine, the
/// procedure to perform on it, the responsible user, and a frequency policy
/// that determines when the next execution is due.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PmSchedule {
    pub id: Uuid,
    pub machine_id: Uuid,
    pub procedure_id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub frequency: FrequencyUnit,
    pub frequency_value: i32,
    pub last_completed: Option<DateTime<Utc>>,
    pub next_due: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PmSchedule {
    /// Create a new schedule for a maintenance policy
    ///
    /// The caller supplies the initial due date; `last_completed` starts
    /// unset and is filled in by the first completed execution.
    pub fn new(
        machine_id: Uuid,
        procedure_id: Uuid,
        user_id: Uuid,
        frequency: FrequencyUnit,
        frequency_value: i32,
        next_due: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            machine_id,
            procedure_id,
            user_id,
            frequency,
            frequency_value,
            last_completed: None,
            next_due,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether this schedule is overdue relative to `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.next_due < now
    }
}

/// FrequencyUnit is the recurrence granularity of a schedule.
///
/// Due-date arithmetic uses fixed day counts for the calendar-shaped units
/// (30/90/365 days); see `frequency::advance`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyUnit {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl std::fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrequencyUnit::Daily => write!(f, "daily"),
            FrequencyUnit::Weekly => write!(f, "weekly"),
            FrequencyUnit::Monthly => write!(f, "monthly"),
            FrequencyUnit::Quarterly => write!(f, "quarterly"),
            FrequencyUnit::Annual => write!(f, "annual"),
        }
    }
}

impl FromStr for FrequencyUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(FrequencyUnit::Daily),
            "weekly" => Ok(FrequencyUnit::Weekly),
            "monthly" => Ok(FrequencyUnit::Monthly),
            "quarterly" => Ok(FrequencyUnit::Quarterly),
            "annual" => Ok(FrequencyUnit::Annual),
            _ => Err(format!("Invalid frequency unit: {}", s)),
        }
    }
}

impl TryFrom<String> for FrequencyUnit {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

/// Typed partial update for a schedule
///
/// Replaces field-by-field dynamic updates with an explicit value object so
/// unknown fields are rejected at compile time. `None` means "leave as is",
/// which also means nullable fields (`last_completed`) cannot be cleared
/// back to NULL through this path; `is_active` is cleared via deactivation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleUpdate {
    pub machine_id: Option<Uuid>,
    pub procedure_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub frequency: Option<FrequencyUnit>,
    pub frequency_value: Option<i32>,
    pub last_completed: Option<DateTime<Utc>>,
    pub next_due: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl ScheduleUpdate {
    pub fn is_empty(&self) -> bool {
        self.machine_id.is_none()
            && self.procedure_id.is_none()
            && self.user_id.is_none()
            && self.frequency.is_none()
            && self.frequency_value.is_none()
            && self.last_completed.is_none()
            && self.next_due.is_none()
            && self.is_active.is_none()
    }
}

// ============================================================================
// Execution Models
// ============================================================================

/// PmExecution represents one concrete maintenance event against a schedule.
///
/// A schedule accumulates many executions over its lifetime; the schedule row
/// only reflects the latest roll-forward while the execution table holds the
/// full history. `next_due_calculated` is a frozen snapshot of the due date
/// computed at completion time and survives later manual schedule edits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PmExecution {
    pub id: Uuid,
    pub pm_schedule_id: Uuid,
    pub executed_by_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: ExecutionStatus,
    pub notes: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub next_due_calculated: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PmExecution {
    /// Create a new execution in the initial `scheduled` status
    pub fn new(pm_schedule_id: Uuid, executed_by_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            pm_schedule_id,
            executed_by_id,
            status: ExecutionStatus::Scheduled,
            notes: None,
            started_at: None,
            completed_at: None,
            next_due_calculated: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// ExecutionStatus is the caller-settable lifecycle field of an execution.
///
/// `completed` and `cancelled` are terminal; the engine only acts on the
/// transition into `completed`. `overdue` is an informational marker callers
/// may set on stale executions and carries no engine side effects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
}

impl ExecutionStatus {
    /// Terminal statuses admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Cancelled)
    }

    /// Check whether a transition from `self` to `next` is permitted.
    ///
    /// Any move out of a non-terminal status is allowed (the field is
    /// caller-settable), including a repeat of the current status so the
    /// `in_progress` transition stays idempotent. Moves out of a terminal
    /// status are rejected, which also prevents re-applying the completion
    /// roll-forward.
    pub fn can_transition_to(&self, _next: ExecutionStatus) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::Scheduled => write!(f, "scheduled"),
            ExecutionStatus::InProgress => write!(f, "in_progress"),
            ExecutionStatus::Completed => write!(f, "completed"),
            ExecutionStatus::Cancelled => write!(f, "cancelled"),
            ExecutionStatus::Overdue => write!(f, "overdue"),
        }
    }
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(ExecutionStatus::Scheduled),
            "in_progress" => Ok(ExecutionStatus::InProgress),
            "completed" => Ok(ExecutionStatus::Completed),
            "cancelled" => Ok(ExecutionStatus::Cancelled),
            "overdue" => Ok(ExecutionStatus::Overdue),
            _ => Err(format!("Invalid execution status: {}", s)),
        }
    }
}

impl TryFrom<String> for ExecutionStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

/// Typed partial update for an execution
///
/// Carries the status transition together with the optional timestamps the
/// transition may consume. `None` means "leave as is".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionUpdate {
    pub status: Option<ExecutionStatus>,
    pub notes: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Referenced Entity Models
// ============================================================================

/// Machine is an opaque external entity the engine references by id
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Machine {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Procedure is an opaque external entity the engine references by id
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Procedure {
    pub id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// User is an opaque external entity the engine references by id
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(ExecutionStatus::Completed.is_terminal());
        assert!(ExecutionStatus::Cancelled.is_terminal());
        assert!(!ExecutionStatus::Scheduled.is_terminal());
        assert!(!ExecutionStatus::InProgress.is_terminal());
        assert!(!ExecutionStatus::Overdue.is_terminal());
    }

    #[test]
    fn test_transition_from_non_terminal_allowed() {
        assert!(ExecutionStatus::Scheduled.can_transition_to(ExecutionStatus::InProgress));
        assert!(ExecutionStatus::Scheduled.can_transition_to(ExecutionStatus::Completed));
        assert!(ExecutionStatus::Scheduled.can_transition_to(ExecutionStatus::Cancelled));
        assert!(ExecutionStatus::InProgress.can_transition_to(ExecutionStatus::Completed));
        assert!(ExecutionStatus::Overdue.can_transition_to(ExecutionStatus::Completed));
        // Repeating in_progress is permitted; started_at stays untouched
        assert!(ExecutionStatus::InProgress.can_transition_to(ExecutionStatus::InProgress));
    }

    #[test]
    fn test_transition_from_terminal_rejected() {
        assert!(!ExecutionStatus::Completed.can_transition_to(ExecutionStatus::InProgress));
        assert!(!ExecutionStatus::Completed.can_transition_to(ExecutionStatus::Completed));
        assert!(!ExecutionStatus::Cancelled.can_transition_to(ExecutionStatus::Scheduled));
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            ExecutionStatus::Scheduled,
            ExecutionStatus::InProgress,
            ExecutionStatus::Completed,
            ExecutionStatus::Cancelled,
            ExecutionStatus::Overdue,
        ] {
            let parsed: ExecutionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_frequency_unit_string_round_trip() {
        for unit in [
            FrequencyUnit::Daily,
            FrequencyUnit::Weekly,
            FrequencyUnit::Monthly,
            FrequencyUnit::Quarterly,
            FrequencyUnit::Annual,
        ] {
            let parsed: FrequencyUnit = unit.to_string().parse().unwrap();
            assert_eq!(parsed, unit);
        }
    }

    #[test]
    fn test_new_execution_starts_scheduled() {
        let execution = PmExecution::new(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(execution.status, ExecutionStatus::Scheduled);
        assert!(execution.started_at.is_none());
        assert!(execution.completed_at.is_none());
        assert!(execution.next_due_calculated.is_none());
    }

    #[test]
    fn test_schedule_overdue_check() {
        let mut schedule = PmSchedule::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            FrequencyUnit::Monthly,
            1,
            Utc::now() - chrono::Duration::days(1),
        );
        assert!(schedule.is_overdue(Utc::now()));

        schedule.is_active = false;
        assert!(!schedule.is_overdue(Utc::now()));
    }
}
