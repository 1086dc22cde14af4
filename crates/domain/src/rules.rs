//! Lifecycle rules — the tunable numbers the engine enforces.
//!
//! Enumerations and transition graphs live on their types; everything that
//! an operator may want to tune (labor rate, business window, protection
//! periods) lives here and is injected into the services at startup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration data consumed by validation, calculation and the services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleRules {
    /// Currency units charged per labor hour.
    pub labor_rate: Decimal,
    /// First hour (inclusive) at which an appointment may start.
    pub business_open_hour: u32,
    /// Hour (exclusive) by which an appointment must have started.
    pub business_close_hour: u32,
    /// Shortest bookable appointment, in minutes.
    pub min_appointment_minutes: u32,
    /// Duration assumed when an appointment does not state one.
    pub default_appointment_minutes: u32,
    /// How far ahead a service date may be, in days.
    pub max_service_horizon_days: i64,
    /// Completed records older than this many days cannot be deleted.
    pub delete_protection_days: i64,
}

impl Default for LifecycleRules {
    fn default() -> Self {
        Self {
            labor_rate: Decimal::from(80),
            business_open_hour: 8,
            business_close_hour: 18,
            min_appointment_minutes: 15,
            default_appointment_minutes: 60,
            max_service_horizon_days: 365,
            delete_protection_days: 30,
        }
    }
}

impl LifecycleRules {
    /// Whether `hour` falls in the `[open, close)` business window.
    #[must_use]
    pub fn within_business_hours(&self, hour: u32) -> bool {
        (self.business_open_hour..self.business_close_hour).contains(&hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_eighty_per_hour_and_eight_to_six_window() {
        let rules = LifecycleRules::default();
        assert_eq!(rules.labor_rate, Decimal::from(80));
        assert!(rules.within_business_hours(8));
        assert!(rules.within_business_hours(17));
        assert!(!rules.within_business_hours(7));
        assert!(!rules.within_business_hours(18));
    }

    #[test]
    fn should_fill_missing_fields_with_defaults_when_deserializing() {
        let rules: LifecycleRules = serde_json::from_str(r#"{"labor_rate": 95}"#).unwrap();
        assert_eq!(rules.labor_rate, Decimal::from(95));
        assert_eq!(rules.min_appointment_minutes, 15);
        assert_eq!(rules.delete_protection_days, 30);
    }
}
