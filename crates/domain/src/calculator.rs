//! Cost and time derivations.
//!
//! Used at write time (the persisted `total_cost`) and at read time for the
//! derived-only fields of the views. Everything here is pure.

use chrono::{Duration, NaiveTime};
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::service_record::Part;

define_label! {
    /// How pressing an overdue follow-up or service is.
    Urgency for "urgency" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

/// `Σ(cost × quantity) + labor_hours × labor_rate`.
///
/// # Errors
///
/// Returns [`ValidationError::CostOverflow`] when any product or the sum
/// leaves the `Decimal` range.
pub fn total_cost(
    parts: &[Part],
    labor_hours: Option<Decimal>,
    labor_rate: Decimal,
) -> Result<Decimal, ValidationError> {
    let parts_total = parts.iter().try_fold(Decimal::ZERO, |total, part| {
        part.line_total()
            .and_then(|line| total.checked_add(line))
            .ok_or(ValidationError::CostOverflow)
    })?;
    labor_hours
        .unwrap_or(Decimal::ZERO)
        .checked_mul(labor_rate)
        .and_then(|labor| parts_total.checked_add(labor))
        .ok_or(ValidationError::CostOverflow)
}

/// Minutes from `start` to `end` on the same day.
#[must_use]
pub fn duration_minutes(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<i64> {
    Some((end? - start?).num_minutes())
}

/// Cost per labor hour, rounded to two decimals.
#[must_use]
pub fn cost_per_hour(total_cost: Decimal, labor_hours: Option<Decimal>) -> Option<Decimal> {
    let hours = labor_hours.filter(|hours| !hours.is_zero())?;
    total_cost.checked_div(hours).map(|rate| rate.round_dp(2))
}

/// Urgency of a follow-up that is `days_overdue` late.
#[must_use]
pub fn follow_up_urgency(days_overdue: i64) -> Urgency {
    match days_overdue {
        d if d > 14 => Urgency::Critical,
        d if d > 7 => Urgency::High,
        d if d > 0 => Urgency::Medium,
        _ => Urgency::Low,
    }
}

/// Urgency of a device whose periodic service is `days_overdue` late.
#[must_use]
pub fn service_urgency(days_overdue: i64) -> Urgency {
    match days_overdue {
        d if d > 30 => Urgency::Critical,
        d if d > 14 => Urgency::High,
        d if d > 0 => Urgency::Medium,
        _ => Urgency::Low,
    }
}

/// End of an appointment starting at `start` and lasting `minutes`, on a 24 h clock.
#[must_use]
pub fn appointment_end_time(start: NaiveTime, minutes: u32) -> NaiveTime {
    let (end, _wrapped_seconds) = start.overflowing_add_signed(Duration::minutes(i64::from(minutes)));
    end
}
