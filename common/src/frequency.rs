// Frequency arithmetic for preventive-maintenance schedules
//
// Turns a (unit, multiplier) policy and a base timestamp into the next due
// timestamp. Month/quarter/year units use fixed day counts (30/90/365) rather
// than calendar-aware increments; downstream overdue reporting depends on this
// exact cadence, so it must not be changed to calendar arithmetic.

use crate::models::FrequencyUnit;
use chrono::{DateTime, Duration, Utc};

/// Number of days a single period of the given unit spans
const fn days_per_unit(unit: FrequencyUnit) -> i64 {
    match unit {
        FrequencyUnit::Daily => 1,
        FrequencyUnit::Weekly => 7,
        FrequencyUnit::Monthly => 30,
        FrequencyUnit::Quarterly => 90,
        FrequencyUnit::Annual => 365,
    }
}

/// Advance `base` by one frequency period of `multiplier` units.
///
/// Pure and deterministic; for any multiplier >= 1 the result is strictly
/// after `base`. Policy validation (multiplier within 1..=MAX_FREQUENCY_VALUE,
/// which keeps the day arithmetic inside the chrono date range) is the
/// schedule boundary's job, not this function's.
pub fn advance(base: DateTime<Utc>, unit: FrequencyUnit, multiplier: i32) -> DateTime<Utc> {
    base + Duration::days(days_per_unit(unit) * multiplier as i64)
}
