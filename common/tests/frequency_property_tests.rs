// Property-based tests for frequency arithmetic and the execution lifecycle

use chrono::{Duration, TimeZone, Utc};
use common::errors::{
    validate_frequency_value, validate_horizon_days, MAX_FREQUENCY_VALUE, MAX_HORIZON_DAYS,
};
use common::frequency::advance;
use common::models::{ExecutionStatus, FrequencyUnit};
use proptest::prelude::*;

fn arb_frequency_unit() -> impl Strategy<Value = FrequencyUnit> {
    prop::sample::select(vec![
        FrequencyUnit::Daily,
        FrequencyUnit::Weekly,
        FrequencyUnit::Monthly,
        FrequencyUnit::Quarterly,
        FrequencyUnit::Annual,
    ])
}

fn arb_status() -> impl Strategy<Value = ExecutionStatus> {
    prop::sample::select(vec![
        ExecutionStatus::Scheduled,
        ExecutionStatus::InProgress,
        ExecutionStatus::Completed,
        ExecutionStatus::Cancelled,
        ExecutionStatus::Overdue,
    ])
}

proptest! {
    /// *For any* frequency unit and multiplier >= 1, advancing a timestamp
    /// strictly increases it.
    #[test]
    fn property_advance_strictly_increases(
        unit in arb_frequency_unit(),
        multiplier in 1i32..120,
        offset_secs in 0i64..3_000_000_000,
    ) {
        let base = Utc.timestamp_opt(offset_secs, 0).unwrap();
        let next = advance(base, unit, multiplier);
        prop_assert!(next > base);
    }

    /// *For any* inputs, advance is deterministic: same inputs, same output.
    #[test]
    fn property_advance_is_deterministic(
        unit in arb_frequency_unit(),
        multiplier in 1i32..120,
        offset_secs in 0i64..3_000_000_000,
    ) {
        let base = Utc.timestamp_opt(offset_secs, 0).unwrap();
        prop_assert_eq!(advance(base, unit, multiplier), advance(base, unit, multiplier));
    }

    /// *For any* unit, the advance is linear in the multiplier: advancing by
    /// N units equals N single-unit advances.
    #[test]
    fn property_advance_is_linear_in_multiplier(
        unit in arb_frequency_unit(),
        multiplier in 1i32..60,
        offset_secs in 0i64..3_000_000_000,
    ) {
        let base = Utc.timestamp_opt(offset_secs, 0).unwrap();
        let mut stepped = base;
        for _ in 0..multiplier {
            stepped = advance(stepped, unit, 1);
        }
        prop_assert_eq!(advance(base, unit, multiplier), stepped);
    }

    /// *For any* base timestamp, the fixed day counts hold exactly:
    /// 1/7/30/90/365 days per unit.
    #[test]
    fn property_advance_uses_fixed_day_counts(
        offset_secs in 0i64..3_000_000_000,
    ) {
        let base = Utc.timestamp_opt(offset_secs, 0).unwrap();
        prop_assert_eq!(advance(base, FrequencyUnit::Daily, 1) - base, Duration::days(1));
        prop_assert_eq!(advance(base, FrequencyUnit::Weekly, 1) - base, Duration::days(7));
        prop_assert_eq!(advance(base, FrequencyUnit::Monthly, 1) - base, Duration::days(30));
        prop_assert_eq!(advance(base, FrequencyUnit::Quarterly, 1) - base, Duration::days(90));
        prop_assert_eq!(advance(base, FrequencyUnit::Annual, 1) - base, Duration::days(365));
    }

    /// *For any* pair of statuses, a transition out of a terminal status is
    /// never permitted.
    #[test]
    fn property_no_transition_out_of_terminal(
        from in arb_status(),
        to in arb_status(),
    ) {
        if from.is_terminal() {
            prop_assert!(!from.can_transition_to(to));
        }
    }

    /// *For any* status, the string representation round-trips through
    /// parsing (the database stores statuses as text).
    #[test]
    fn property_status_round_trips_through_text(status in arb_status()) {
        let parsed: ExecutionStatus = status.to_string().parse().unwrap();
        prop_assert_eq!(parsed, status);
    }
}

proptest! {
    /// *For any* horizon outside 0..=MAX_HORIZON_DAYS, validation rejects it
    /// before any date arithmetic can run on it.
    #[test]
    fn property_out_of_range_horizon_is_rejected(days in prop_oneof![
        i64::MIN..0,
        (MAX_HORIZON_DAYS + 1)..i64::MAX,
    ]) {
        prop_assert!(validate_horizon_days(days).is_err());
    }

    /// *For any* multiplier within bounds, both validation and the advance
    /// arithmetic accept it.
    #[test]
    fn property_bounded_multiplier_is_accepted(
        unit in arb_frequency_unit(),
        multiplier in 1i32..=MAX_FREQUENCY_VALUE,
    ) {
        prop_assert!(validate_frequency_value(multiplier).is_ok());
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prop_assert!(advance(base, unit, multiplier) > base);
    }
}

#[test]
fn extreme_horizon_is_rejected_not_applied() {
    assert!(validate_horizon_days(i64::MAX).is_err());
    assert!(validate_horizon_days(i64::MIN).is_err());
    assert!(validate_horizon_days(7).is_ok());
}

#[test]
fn extreme_multiplier_is_rejected_at_the_boundary() {
    assert!(validate_frequency_value(i32::MAX).is_err());
    assert!(validate_frequency_value(MAX_FREQUENCY_VALUE).is_ok());
}

#[test]
fn scenario_biweekly_completion_rolls_two_weeks_forward() {
    // Policy: every 2 weeks. Completion on 20 Jan 2024 pushes the due date
    // to 3 Feb 2024 regardless of the previous due date.
    let completed_at = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
    let next_due = advance(completed_at, FrequencyUnit::Weekly, 2);
    assert_eq!(next_due, Utc.with_ymd_and_hms(2024, 2, 3, 0, 0, 0).unwrap());
}
