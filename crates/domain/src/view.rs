//! Read model: stored entities enriched with directory joins and derived fields.
//!
//! Views never alter the stored entity; it is flattened into the output as-is
//! and the derived fields are added next to it.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::appointment::Appointment;
use crate::calculator::{self, Urgency};
use crate::directory::{Client, Device, Technician};
use crate::id::{ClientId, DeviceId, TechnicianId};
use crate::service_record::ServiceRecord;
use crate::time::{self, Timestamp};

/// Directory records related to an entity, as far as they could be found.
#[derive(Debug, Clone, Default)]
pub struct Related {
    pub client: Option<Client>,
    pub device: Option<Device>,
    pub technician: Option<Technician>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub id: ClientId,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            company_name: client.company_name.clone(),
            contact_person: client.contact_person.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSummary {
    pub id: DeviceId,
    pub brand: String,
    pub model: String,
    pub device_type: Option<String>,
    pub serial_number: Option<String>,
    pub next_service_date: Option<NaiveDate>,
}

impl From<&Device> for DeviceSummary {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id,
            brand: device.brand.clone(),
            model: device.model.clone(),
            device_type: device.device_type.clone(),
            serial_number: device.serial_number.clone(),
            next_service_date: device.next_service_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicianSummary {
    pub id: TechnicianId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl From<&Technician> for TechnicianSummary {
    fn from(technician: &Technician) -> Self {
        Self {
            id: technician.id,
            first_name: technician.first_name.clone(),
            last_name: technician.last_name.clone(),
            phone: technician.phone.clone(),
        }
    }
}

/// A service record as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRecordView {
    #[serde(flatten)]
    pub record: ServiceRecord,
    pub client: Option<ClientSummary>,
    pub device: Option<DeviceSummary>,
    pub technician: Option<TechnicianSummary>,
    pub client_name: Option<String>,
    pub technician_name: Option<String>,
    pub device_info: Option<String>,
    pub duration_minutes: Option<i64>,
    pub cost_per_hour: Option<Decimal>,
    pub urgency: Option<Urgency>,
}

impl ServiceRecordView {
    #[must_use]
    pub fn build(record: ServiceRecord, related: &Related, today: NaiveDate) -> Self {
        let urgency = if record.follow_up_required {
            record
                .follow_up_date
                .map(|date| calculator::follow_up_urgency((today - date).num_days()))
        } else {
            related
                .device
                .as_ref()
                .and_then(|device| device.service_days_overdue(today))
                .map(calculator::service_urgency)
        };

        Self {
            duration_minutes: calculator::duration_minutes(record.start_time, record.end_time),
            cost_per_hour: calculator::cost_per_hour(record.total_cost, record.labor_hours),
            urgency,
            client: related.client.as_ref().map(ClientSummary::from),
            device: related.device.as_ref().map(DeviceSummary::from),
            technician: related.technician.as_ref().map(TechnicianSummary::from),
            client_name: related.client.as_ref().map(|c| c.company_name.clone()),
            technician_name: related.technician.as_ref().map(Technician::full_name),
            device_info: related.device.as_ref().map(Device::display_name),
            record,
        }
    }
}

/// An appointment as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub client: Option<ClientSummary>,
    pub device: Option<DeviceSummary>,
    pub technician: Option<TechnicianSummary>,
    pub client_name: Option<String>,
    pub technician_name: Option<String>,
    pub device_info: Option<String>,
    pub is_today: bool,
    pub is_overdue: bool,
    #[serde(with = "crate::time::hhmm")]
    pub estimated_end_time: NaiveTime,
}

impl AppointmentView {
    #[must_use]
    pub fn build(appointment: Appointment, related: &Related, now: Timestamp) -> Self {
        let starts_at = appointment
            .appointment_date
            .and_time(appointment.start_time)
            .and_utc();

        Self {
            is_today: appointment.appointment_date == time::date_of(now),
            is_overdue: appointment.status.is_pending() && now > starts_at,
            estimated_end_time: calculator::appointment_end_time(
                appointment.start_time,
                appointment.estimated_duration,
            ),
            client: related.client.as_ref().map(ClientSummary::from),
            device: related.device.as_ref().map(DeviceSummary::from),
            technician: related.technician.as_ref().map(TechnicianSummary::from),
            client_name: related.client.as_ref().map(|c| c.company_name.clone()),
            technician_name: related.technician.as_ref().map(Technician::full_name),
            device_info: related.device.as_ref().map(Device::display_name),
            appointment,
        }
    }
}
