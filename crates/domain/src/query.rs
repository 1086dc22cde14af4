//! Listing filters and pagination.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::appointment::AppointmentStatus;
use crate::id::{ClientId, DeviceId, TechnicianId};
use crate::service_record::{ServiceRecordStatus, ServiceType};

/// Upper bound on `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

/// One-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl PageRequest {
    /// Same request with `page >= 1` and `per_page` in `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(self) -> u64 {
        let page = self.clamped();
        u64::from(page.page - 1) * u64::from(page.per_page)
    }

    #[must_use]
    pub fn limit(self) -> u32 {
        self.clamped().per_page
    }
}

/// A page of results together with the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let request = request.clamped();
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }
}

/// Criteria for listing service records. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceRecordFilter {
    pub device_id: Option<DeviceId>,
    pub technician_id: Option<TechnicianId>,
    pub status: Option<ServiceRecordStatus>,
    pub service_type: Option<ServiceType>,
    /// Inclusive lower bound on `service_date`.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on `service_date`.
    pub date_to: Option<NaiveDate>,
}

impl ServiceRecordFilter {
    /// Whether `record` satisfies the filter.
    #[must_use]
    pub fn matches(&self, record: &crate::service_record::ServiceRecord) -> bool {
        self.device_id.is_none_or(|id| record.device_id == id)
            && self
                .technician_id
                .is_none_or(|id| record.technician_id == Some(id))
            && self.status.is_none_or(|status| record.status == status)
            && self
                .service_type
                .is_none_or(|service_type| record.service_type == service_type)
            && self.date_from.is_none_or(|from| record.service_date >= from)
            && self.date_to.is_none_or(|to| record.service_date <= to)
    }
}

/// Criteria for listing appointments. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentFilter {
    pub client_id: Option<ClientId>,
    pub technician_id: Option<TechnicianId>,
    pub status: Option<AppointmentStatus>,
    /// Inclusive lower bound on `appointment_date`.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on `appointment_date`.
    pub date_to: Option<NaiveDate>,
}

impl AppointmentFilter {
    /// Whether `appointment` satisfies the filter.
    #[must_use]
    pub fn matches(&self, appointment: &crate::appointment::Appointment) -> bool {
        self.client_id.is_none_or(|id| appointment.client_id == id)
            && self
                .technician_id
                .is_none_or(|id| appointment.technician_id == id)
            && self.status.is_none_or(|status| appointment.status == status)
            && self
                .date_from
                .is_none_or(|from| appointment.appointment_date >= from)
            && self.date_to.is_none_or(|to| appointment.appointment_date <= to)
    }
}
