//! Operation inputs for appointments, and the overrides accepted when an
//! appointment is converted into a service record.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Appointment, AppointmentStatus, AppointmentType, Priority};
use crate::error::ValidationError;
use crate::id::{AppointmentId, ClientId, DeviceId, TechnicianId, UserId};
use crate::rules::LifecycleRules;
use crate::service_record::{NewServiceRecord, Part, ServiceRecordStatus, ServiceType};
use crate::time::Timestamp;
use crate::validation;

/// Payload for booking an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewAppointment {
    pub client_id: Option<ClientId>,
    pub technician_id: Option<TechnicianId>,
    pub device_id: Option<DeviceId>,
    pub appointment_date: Option<NaiveDate>,
    #[serde(with = "crate::time::hhmm::option")]
    pub start_time: Option<NaiveTime>,
    pub appointment_type: Option<AppointmentType>,
    pub priority: Option<Priority>,
    /// Minutes; defaults to [`LifecycleRules::default_appointment_minutes`].
    pub estimated_duration: Option<u32>,
    pub description: Option<String>,
    pub internal_notes: Option<String>,
    pub client_requirements: Option<String>,
    pub estimated_cost: Option<Decimal>,
}

impl NewAppointment {
    /// Validate and turn the payload into a scheduled [`Appointment`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn into_appointment(
        self,
        rules: &LifecycleRules,
        created_by: Option<UserId>,
        now: Timestamp,
    ) -> Result<Appointment, ValidationError> {
        validation::validate_new_appointment(&self, rules, crate::time::date_of(now))?;

        Ok(Appointment {
            id: AppointmentId::new(),
            client_id: validation::require(self.client_id, "client_id")?,
            technician_id: validation::require(self.technician_id, "technician_id")?,
            device_id: self.device_id,
            appointment_date: validation::require(self.appointment_date, "appointment_date")?,
            start_time: validation::require(self.start_time, "start_time")?,
            appointment_type: validation::require(self.appointment_type, "appointment_type")?,
            priority: self.priority.unwrap_or_default(),
            estimated_duration: self
                .estimated_duration
                .unwrap_or(rules.default_appointment_minutes),
            description: self.description,
            internal_notes: self.internal_notes,
            client_requirements: self.client_requirements,
            estimated_cost: self.estimated_cost,
            status: AppointmentStatus::Scheduled,
            cancelled_reason: None,
            cancelled_by: None,
            created_by,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of an appointment. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentPatch {
    pub technician_id: Option<TechnicianId>,
    pub device_id: Option<DeviceId>,
    pub appointment_date: Option<NaiveDate>,
    #[serde(with = "crate::time::hhmm::option")]
    pub start_time: Option<NaiveTime>,
    pub appointment_type: Option<AppointmentType>,
    pub priority: Option<Priority>,
    pub estimated_duration: Option<u32>,
    pub description: Option<String>,
    pub internal_notes: Option<String>,
    pub client_requirements: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub status: Option<AppointmentStatus>,
    /// Mandatory when moving to `cancelled`.
    pub cancelled_reason: Option<String>,
    pub expected_version: Option<u32>,
}

impl AppointmentPatch {
    /// Patch that only moves the appointment to `status`.
    #[must_use]
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Fields a caller may set on the service record produced by a conversion.
///
/// Status is not among them: a converted record always starts `in_progress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOverrides {
    pub device_id: Option<DeviceId>,
    pub technician_id: Option<TechnicianId>,
    pub service_type: Option<ServiceType>,
    pub service_date: Option<NaiveDate>,
    #[serde(with = "crate::time::hhmm::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "crate::time::hhmm::option")]
    pub end_time: Option<NaiveTime>,
    pub description: Option<String>,
    pub parts_used: Option<Vec<Part>>,
    pub labor_hours: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub client_signature: Option<bool>,
    pub photos: Option<Vec<String>>,
    pub condition_before: Option<u8>,
    pub recommendations: Option<String>,
    pub warranty_work: Option<bool>,
    pub follow_up_required: Option<bool>,
    pub follow_up_date: Option<NaiveDate>,
}

impl Appointment {
    /// Create input for the service record this appointment turns into.
    #[must_use]
    pub fn service_record_input(&self, overrides: ConversionOverrides) -> NewServiceRecord {
        let service_type = self.appointment_type.service_type();
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map_or_else(
                || format!("{} — converted from appointment", self.appointment_type),
                str::to_string,
            );

        NewServiceRecord {
            device_id: overrides.device_id.or(self.device_id),
            technician_id: overrides.technician_id.or(Some(self.technician_id)),
            service_type: Some(overrides.service_type.unwrap_or(service_type)),
            service_date: Some(overrides.service_date.unwrap_or(self.appointment_date)),
            start_time: overrides.start_time.or(Some(self.start_time)),
            end_time: overrides.end_time,
            description: Some(overrides.description.unwrap_or(description)),
            parts_used: overrides.parts_used.unwrap_or_default(),
            labor_hours: overrides.labor_hours,
            total_cost: overrides.total_cost,
            client_signature: overrides.client_signature.unwrap_or(false),
            photos: overrides.photos.unwrap_or_default(),
            condition_before: overrides.condition_before,
            condition_after: None,
            recommendations: overrides.recommendations,
            status: Some(ServiceRecordStatus::InProgress),
            warranty_work: overrides
                .warranty_work
                .unwrap_or(self.appointment_type == AppointmentType::WarrantyClaim),
            follow_up_required: overrides.follow_up_required.unwrap_or(false),
            follow_up_date: overrides.follow_up_date,
            appointment_id: Some(self.id),
        }
    }
}
