//! Validation rules for service records and appointments.
//!
//! Pure, stateless checks: one function per entity and operation. Create
//! checks require every mandatory field; patch checks look only at the fields
//! the patch carries, combining them with the stored record for cross-field
//! rules. Nothing is coerced: the first violation is returned.

use chrono::{Days, NaiveDate, NaiveTime, Timelike};
use rust_decimal::Decimal;

use crate::appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment};
use crate::error::ValidationError;
use crate::rules::LifecycleRules;
use crate::service_record::{NewServiceRecord, Part, ServiceRecord, ServiceRecordPatch};

/// Unwrap a mandatory field or report it missing.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when `value` is `None`.
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { field })
}

/// Check a create payload for a service record.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_new_service_record(
    input: &NewServiceRecord,
    rules: &LifecycleRules,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    require(input.device_id, "device_id")?;
    require(input.service_type, "service_type")?;
    let service_date = require(input.service_date, "service_date")?;
    non_empty(require(input.description.as_deref(), "description")?, "description")?;

    service_date_within_horizon(service_date, rules, today)?;
    parts(&input.parts_used)?;
    non_negative(input.labor_hours, "labor_hours")?;
    non_negative(input.total_cost, "total_cost")?;
    condition(input.condition_before, "condition_before")?;
    condition(input.condition_after, "condition_after")?;
    start_before_end(input.start_time, input.end_time)?;
    follow_up(input.follow_up_required, input.follow_up_date, service_date)?;
    follow_up_not_in_past(input.follow_up_date, today)
}

/// Check a patch against the stored record.
///
/// # Errors
///
/// Returns the first violated rule among the supplied fields.
pub fn validate_service_record_patch(
    patch: &ServiceRecordPatch,
    current: &ServiceRecord,
    rules: &LifecycleRules,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if let Some(description) = patch.description.as_deref() {
        non_empty(description, "description")?;
    }
    if let Some(service_date) = patch.service_date {
        service_date_within_horizon(service_date, rules, today)?;
    }
    if let Some(parts_used) = patch.parts_used.as_deref() {
        parts(parts_used)?;
    }
    non_negative(patch.labor_hours, "labor_hours")?;
    non_negative(patch.total_cost, "total_cost")?;
    condition(patch.condition_before, "condition_before")?;
    condition(patch.condition_after, "condition_after")?;
    if patch.start_time.is_some() || patch.end_time.is_some() {
        start_before_end(
            patch.start_time.or(current.start_time),
            patch.end_time.or(current.end_time),
        )?;
    }
    follow_up_not_in_past(patch.follow_up_date, today)
}

/// Follow-up consistency of a (merged) record.
///
/// # Errors
///
/// Returns [`ValidationError::FollowUpDateMissing`] or
/// [`ValidationError::FollowUpNotAfterService`].
pub fn validate_follow_up(record: &ServiceRecord) -> Result<(), ValidationError> {
    follow_up(
        record.follow_up_required,
        record.follow_up_date,
        record.service_date,
    )
}

/// Check a create payload for an appointment.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_new_appointment(
    input: &NewAppointment,
    rules: &LifecycleRules,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    require(input.client_id, "client_id")?;
    require(input.technician_id, "technician_id")?;
    let appointment_date = require(input.appointment_date, "appointment_date")?;
    let start_time = require(input.start_time, "start_time")?;
    require(input.appointment_type, "appointment_type")?;

    not_in_past(appointment_date, today)?;
    business_hours(start_time, rules)?;
    if let Some(minutes) = input.estimated_duration {
        duration(minutes, rules)?;
    }
    non_negative(input.estimated_cost, "estimated_cost")?;
    if let Some(description) = input.description.as_deref() {
        non_empty(description, "description")?;
    }
    Ok(())
}

/// Check an appointment patch against the stored appointment.
///
/// # Errors
///
/// Returns the first violated rule among the supplied fields.
pub fn validate_appointment_patch(
    patch: &AppointmentPatch,
    current: &Appointment,
    rules: &LifecycleRules,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if let Some(appointment_date) = patch.appointment_date {
        if appointment_date != current.appointment_date {
            not_in_past(appointment_date, today)?;
        }
    }
    if let Some(start_time) = patch.start_time {
        business_hours(start_time, rules)?;
    }
    if let Some(minutes) = patch.estimated_duration {
        duration(minutes, rules)?;
    }
    non_negative(patch.estimated_cost, "estimated_cost")?;
    if let Some(description) = patch.description.as_deref() {
        non_empty(description, "description")?;
    }
    let cancelling = patch.status == Some(AppointmentStatus::Cancelled)
        && current.status != AppointmentStatus::Cancelled;
    let reason_given = patch
        .cancelled_reason
        .as_deref()
        .is_some_and(|reason| !reason.trim().is_empty());
    if cancelling && !reason_given {
        return Err(ValidationError::CancelReasonMissing);
    }
    Ok(())
}

fn non_empty(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

fn non_negative(value: Option<Decimal>, field: &'static str) -> Result<(), ValidationError> {
    match value {
        Some(value) if value < Decimal::ZERO => {
            Err(ValidationError::NegativeValue { field })
        }
        _ => Ok(()),
    }
}

fn condition(value: Option<u8>, field: &'static str) -> Result<(), ValidationError> {
    match value {
        Some(value) if !(1..=5).contains(&value) => {
            Err(ValidationError::ConditionOutOfRange { field, value })
        }
        _ => Ok(()),
    }
}

fn parts(parts: &[Part]) -> Result<(), ValidationError> {
    for part in parts {
        non_empty(&part.name, "parts_used.name")?;
        non_negative(Some(part.cost), "parts_used.cost")?;
        if part.quantity == 0 {
            return Err(ValidationError::ZeroQuantity {
                name: part.name.clone(),
            });
        }
    }
    Ok(())
}

fn start_before_end(
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if start >= end => {
            Err(ValidationError::StartNotBeforeEnd { start, end })
        }
        _ => Ok(()),
    }
}

fn follow_up(
    required: bool,
    follow_up_date: Option<NaiveDate>,
    service_date: NaiveDate,
) -> Result<(), ValidationError> {
    if !required {
        return Ok(());
    }
    let follow_up = follow_up_date.ok_or(ValidationError::FollowUpDateMissing)?;
    if follow_up <= service_date {
        return Err(ValidationError::FollowUpNotAfterService {
            follow_up,
            service_date,
        });
    }
    Ok(())
}

fn follow_up_not_in_past(
    follow_up_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    match follow_up_date {
        Some(date) if date < today => Err(ValidationError::FollowUpInPast { date, today }),
        _ => Ok(()),
    }
}

fn service_date_within_horizon(
    date: NaiveDate,
    rules: &LifecycleRules,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    let days = u64::try_from(rules.max_service_horizon_days).unwrap_or(0);
    let limit = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    if date > limit {
        return Err(ValidationError::ServiceDateTooFarAhead { date, limit });
    }
    Ok(())
}

fn not_in_past(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        return Err(ValidationError::AppointmentInPast { date, today });
    }
    Ok(())
}

fn business_hours(start: NaiveTime, rules: &LifecycleRules) -> Result<(), ValidationError> {
    if !rules.within_business_hours(start.hour()) {
        return Err(ValidationError::OutsideBusinessHours {
            start,
            open: rules.business_open_hour,
            close: rules.business_close_hour,
        });
    }
    Ok(())
}

fn duration(minutes: u32, rules: &LifecycleRules) -> Result<(), ValidationError> {
    if minutes < rules.min_appointment_minutes {
        return Err(ValidationError::DurationTooShort {
            minutes,
            min: rules.min_appointment_minutes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::AppointmentType;
    use crate::id::{ClientId, DeviceId, TechnicianId};
    use crate::service_record::ServiceType;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record_input() -> NewServiceRecord {
        NewServiceRecord {
            device_id: Some(DeviceId::new()),
            service_type: Some(ServiceType::Maintenance),
            service_date: Some(today()),
            description: Some("annual boiler check".to_string()),
            ..NewServiceRecord::default()
        }
    }

    fn appointment_input() -> NewAppointment {
        NewAppointment {
            client_id: Some(ClientId::new()),
            technician_id: Some(TechnicianId::new()),
            appointment_date: Some(today()),
            start_time: Some(hm(9, 0)),
            appointment_type: Some(AppointmentType::Maintenance),
            ..NewAppointment::default()
        }
    }

    fn check_record(input: &NewServiceRecord) -> Result<(), ValidationError> {
        validate_new_service_record(input, &LifecycleRules::default(), today())
    }

    fn check_appointment(input: &NewAppointment) -> Result<(), ValidationError> {
        validate_new_appointment(input, &LifecycleRules::default(), today())
    }

    #[test]
    fn should_accept_minimal_service_record() {
        assert_eq!(check_record(&record_input()), Ok(()));
    }

    #[test]
    fn should_require_each_mandatory_service_record_field() {
        let cases = [
            (NewServiceRecord { device_id: None, ..record_input() }, "device_id"),
            (NewServiceRecord { service_type: None, ..record_input() }, "service_type"),
            (NewServiceRecord { service_date: None, ..record_input() }, "service_date"),
            (NewServiceRecord { description: None, ..record_input() }, "description"),
        ];
        for (input, field) in cases {
            assert_eq!(check_record(&input), Err(ValidationError::MissingField { field }));
        }
    }

    #[test]
    fn should_reject_blank_description() {
        let input = NewServiceRecord {
            description: Some("   ".to_string()),
            ..record_input()
        };
        assert_eq!(
            check_record(&input),
            Err(ValidationError::EmptyField { field: "description" })
        );
    }

    #[test]
    fn should_reject_negative_labor_hours() {
        let input = NewServiceRecord {
            labor_hours: Some(dec!(-0.5)),
            ..record_input()
        };
        assert_eq!(
            check_record(&input),
            Err(ValidationError::NegativeValue { field: "labor_hours" })
        );
    }

    #[test]
    fn should_accept_zero_labor_hours() {
        let input = NewServiceRecord {
            labor_hours: Some(Decimal::ZERO),
            ..record_input()
        };
        assert_eq!(check_record(&input), Ok(()));
    }

    #[test]
    fn should_reject_condition_outside_one_to_five() {
        for value in [0, 6] {
            let input = NewServiceRecord {
                condition_after: Some(value),
                ..record_input()
            };
            assert_eq!(
                check_record(&input),
                Err(ValidationError::ConditionOutOfRange {
                    field: "condition_after",
                    value
                })
            );
        }
    }

    #[test]
    fn should_reject_part_without_quantity() {
        let input = NewServiceRecord {
            parts_used: vec![Part {
                name: "ignition electrode".to_string(),
                cost: dec!(18),
                quantity: 0,
            }],
            ..record_input()
        };
        assert!(matches!(
            check_record(&input),
            Err(ValidationError::ZeroQuantity { .. })
        ));
    }

    #[test]
    fn should_reject_start_not_before_end() {
        let input = NewServiceRecord {
            start_time: Some(hm(10, 0)),
            end_time: Some(hm(10, 0)),
            ..record_input()
        };
        assert!(matches!(
            check_record(&input),
            Err(ValidationError::StartNotBeforeEnd { .. })
        ));
    }

    #[test]
    fn should_require_follow_up_date_after_service_date() {
        let missing = NewServiceRecord {
            follow_up_required: true,
            ..record_input()
        };
        assert_eq!(check_record(&missing), Err(ValidationError::FollowUpDateMissing));

        let same_day = NewServiceRecord {
            follow_up_required: true,
            follow_up_date: Some(today()),
            ..record_input()
        };
        assert!(matches!(
            check_record(&same_day),
            Err(ValidationError::FollowUpNotAfterService { .. })
        ));

        let next_week = NewServiceRecord {
            follow_up_required: true,
            follow_up_date: today().checked_add_days(Days::new(7)),
            ..record_input()
        };
        assert_eq!(check_record(&next_week), Ok(()));
    }

    #[test]
    fn should_reject_follow_up_date_in_the_past() {
        let input = NewServiceRecord {
            service_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            follow_up_required: true,
            follow_up_date: NaiveDate::from_ymd_opt(2024, 5, 20),
            ..record_input()
        };
        assert!(matches!(
            check_record(&input),
            Err(ValidationError::FollowUpInPast { .. })
        ));
    }

    #[test]
    fn should_reject_service_date_more_than_a_year_ahead() {
        let at_limit = NewServiceRecord {
            service_date: today().checked_add_days(Days::new(365)),
            ..record_input()
        };
        assert_eq!(check_record(&at_limit), Ok(()));

        let beyond = NewServiceRecord {
            service_date: today().checked_add_days(Days::new(366)),
            ..record_input()
        };
        assert!(matches!(
            check_record(&beyond),
            Err(ValidationError::ServiceDateTooFarAhead { .. })
        ));
    }

    #[test]
    fn should_accept_business_window_edges() {
        for start in [hm(8, 0), hm(17, 59)] {
            let input = NewAppointment {
                start_time: Some(start),
                ..appointment_input()
            };
            assert_eq!(check_appointment(&input), Ok(()), "{start}");
        }
    }

    #[test]
    fn should_reject_start_outside_business_window() {
        for start in [hm(7, 59), hm(18, 0), hm(23, 30)] {
            let input = NewAppointment {
                start_time: Some(start),
                ..appointment_input()
            };
            assert!(
                matches!(
                    check_appointment(&input),
                    Err(ValidationError::OutsideBusinessHours { .. })
                ),
                "{start}"
            );
        }
    }

    #[test]
    fn should_reject_appointment_in_the_past() {
        let input = NewAppointment {
            appointment_date: today().checked_sub_days(Days::new(1)),
            ..appointment_input()
        };
        assert!(matches!(
            check_appointment(&input),
            Err(ValidationError::AppointmentInPast { .. })
        ));
    }

    #[test]
    fn should_reject_duration_below_fifteen_minutes() {
        let input = NewAppointment {
            estimated_duration: Some(10),
            ..appointment_input()
        };
        assert_eq!(
            check_appointment(&input),
            Err(ValidationError::DurationTooShort { minutes: 10, min: 15 })
        );
    }

    #[test]
    fn should_require_each_mandatory_appointment_field() {
        let cases = [
            (NewAppointment { client_id: None, ..appointment_input() }, "client_id"),
            (NewAppointment { technician_id: None, ..appointment_input() }, "technician_id"),
            (NewAppointment { appointment_date: None, ..appointment_input() }, "appointment_date"),
            (NewAppointment { start_time: None, ..appointment_input() }, "start_time"),
            (NewAppointment { appointment_type: None, ..appointment_input() }, "appointment_type"),
        ];
        for (input, field) in cases {
            assert_eq!(check_appointment(&input), Err(ValidationError::MissingField { field }));
        }
    }
}
