//! Operation inputs for service records.
//!
//! Each operation has its own input type carrying only the fields legal for
//! it. Mandatory create fields are `Option`s so that a missing field is
//! reported as a validation error naming it, instead of a decoding failure.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Part, ServiceRecord, ServiceRecordStatus, ServiceType};
use crate::error::ValidationError;
use crate::id::{AppointmentId, DeviceId, ServiceRecordId, TechnicianId, UserId};
use crate::rules::LifecycleRules;
use crate::time::Timestamp;
use crate::{calculator, validation};

/// Payload for creating a service record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewServiceRecord {
    pub device_id: Option<DeviceId>,
    pub technician_id: Option<TechnicianId>,
    pub service_type: Option<ServiceType>,
    pub service_date: Option<NaiveDate>,
    #[serde(with = "crate::time::hhmm::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(with = "crate::time::hhmm::option")]
    pub end_time: Option<NaiveTime>,
    pub description: Option<String>,
    pub parts_used: Vec<Part>,
    pub labor_hours: Option<Decimal>,
    /// Flat fee, only kept when neither parts nor labor are given.
    pub total_cost: Option<Decimal>,
    pub client_signature: bool,
    pub photos: Vec<String>,
    pub condition_before: Option<u8>,
    pub condition_after: Option<u8>,
    pub recommendations: Option<String>,
    pub status: Option<ServiceRecordStatus>,
    pub warranty_work: bool,
    pub follow_up_required: bool,
    pub follow_up_date: Option<NaiveDate>,
    /// Set by appointment conversion only.
    #[serde(skip)]
    pub appointment_id: Option<AppointmentId>,
}

impl NewServiceRecord {
    /// Validate and turn the payload into a fresh [`ServiceRecord`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn into_record(
        self,
        rules: &LifecycleRules,
        created_by: Option<UserId>,
        now: Timestamp,
    ) -> Result<ServiceRecord, ValidationError> {
        validation::validate_new_service_record(&self, rules, crate::time::date_of(now))?;

        let total_cost = if self.parts_used.is_empty() && self.labor_hours.is_none() {
            self.total_cost.unwrap_or(Decimal::ZERO)
        } else {
            calculator::total_cost(&self.parts_used, self.labor_hours, rules.labor_rate)?
        };

        Ok(ServiceRecord {
            id: ServiceRecordId::new(),
            device_id: validation::require(self.device_id, "device_id")?,
            technician_id: self.technician_id,
            appointment_id: self.appointment_id,
            service_type: validation::require(self.service_type, "service_type")?,
            service_date: validation::require(self.service_date, "service_date")?,
            start_time: self.start_time,
            end_time: self.end_time,
            description: validation::require(self.description, "description")?,
            parts_used: self.parts_used,
            labor_hours: self.labor_hours,
            total_cost,
            client_signature: self.client_signature,
            photos: self.photos,
            condition_before: self.condition_before,
            condition_after: self.condition_after,
            recommendations: self.recommendations,
            status: self.status.unwrap_or_default(),
            warranty_work: self.warranty_work,
            follow_up_required: self.follow_up_required,
            follow_up_date: self.follow_up_date,
            created_by,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a service record. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceRecordPatch {
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
    pub condition_after: Option<u8>,
    pub recommendations: Option<String>,
    pub status: Option<ServiceRecordStatus>,
    pub warranty_work: Option<bool>,
    pub follow_up_required: Option<bool>,
    pub follow_up_date: Option<NaiveDate>,
    /// When set, the update only applies if the stored version still matches.
    pub expected_version: Option<u32>,
}

/// Data captured when a technician closes out a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompleteServiceRecord {
    /// Defaults to the current time-of-day.
    #[serde(with = "crate::time::hhmm::option")]
    pub end_time: Option<NaiveTime>,
    pub parts_used: Option<Vec<Part>>,
    pub labor_hours: Option<Decimal>,
    pub client_signature: Option<bool>,
    pub photos: Option<Vec<String>>,
    pub condition_after: Option<u8>,
    pub recommendations: Option<String>,
    pub follow_up_required: Option<bool>,
    pub follow_up_date: Option<NaiveDate>,
    pub expected_version: Option<u32>,
}

impl CompleteServiceRecord {
    /// Express the completion as a patch forcing `status = completed`.
    #[must_use]
    pub fn into_patch(self, current_time: NaiveTime) -> ServiceRecordPatch {
        ServiceRecordPatch {
            end_time: Some(self.end_time.unwrap_or(current_time)),
            parts_used: self.parts_used,
            labor_hours: self.labor_hours,
            client_signature: self.client_signature,
            photos: self.photos,
            condition_after: self.condition_after,
            recommendations: self.recommendations,
            status: Some(ServiceRecordStatus::Completed),
            follow_up_required: self.follow_up_required,
            follow_up_date: self.follow_up_date,
            expected_version: self.expected_version,
            ..ServiceRecordPatch::default()
        }
    }
}
