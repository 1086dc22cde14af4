//! Appointment — a promised future visit by a technician to a client.

mod input;
mod kind;
mod status;

pub use input::{AppointmentPatch, ConversionOverrides, NewAppointment};
pub use kind::{AppointmentType, Priority};
pub use status::AppointmentStatus;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::id::{AppointmentId, ClientId, DeviceId, TechnicianId, UserId};
use crate::time::Timestamp;

/// A booked visit, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub client_id: ClientId,
    pub technician_id: TechnicianId,
    pub device_id: Option<DeviceId>,
    pub appointment_date: NaiveDate,
    #[serde(with = "crate::time::hhmm")]
    pub start_time: NaiveTime,
    pub appointment_type: AppointmentType,
    pub priority: Priority,
    /// Minutes.
    pub estimated_duration: u32,
    pub description: Option<String>,
    pub internal_notes: Option<String>,
    pub client_requirements: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub status: AppointmentStatus,
    pub cancelled_reason: Option<String>,
    pub cancelled_by: Option<UserId>,
    pub created_by: Option<UserId>,
    pub version: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Appointment {
    /// Fold a validated patch into the appointment, leaving status to the guard.
    pub fn merge(&mut self, patch: AppointmentPatch) {
        if let Some(technician_id) = patch.technician_id {
            self.technician_id = technician_id;
        }
        if let Some(device_id) = patch.device_id {
            self.device_id = Some(device_id);
        }
        if let Some(appointment_date) = patch.appointment_date {
            self.appointment_date = appointment_date;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(appointment_type) = patch.appointment_type {
            self.appointment_type = appointment_type;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(estimated_duration) = patch.estimated_duration {
            self.estimated_duration = estimated_duration;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(internal_notes) = patch.internal_notes {
            self.internal_notes = Some(internal_notes);
        }
        if let Some(client_requirements) = patch.client_requirements {
            self.client_requirements = Some(client_requirements);
        }
        if let Some(estimated_cost) = patch.estimated_cost {
            self.estimated_cost = Some(estimated_cost);
        }
        if let Some(cancelled_reason) = patch.cancelled_reason {
            self.cancelled_reason = Some(cancelled_reason);
        }
    }

    /// Reason the appointment may not be deleted, if any.
    #[must_use]
    pub fn deletion_blocker(&self) -> Option<String> {
        (!self.status.is_deletable()).then(|| format!("appointment is {}", self.status))
    }

    /// Record a successful write.
    pub fn touch(&mut self, now: Timestamp) {
        self.version += 1;
        self.updated_at = now;
    }
}
