//! Directory records the engine looks up but never writes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{ClientId, DeviceId, TechnicianId};

/// A customer company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A heating unit installed at a client site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub client_id: ClientId,
    pub brand: String,
    pub model: String,
    pub device_type: Option<String>,
    pub serial_number: Option<String>,
    pub last_service_date: Option<NaiveDate>,
    pub next_service_date: Option<NaiveDate>,
}

impl Device {
    /// Days since periodic service fell due, when it is overdue.
    #[must_use]
    pub fn service_days_overdue(&self, today: NaiveDate) -> Option<i64> {
        self.next_service_date
            .filter(|due| *due < today)
            .map(|due| (today - due).num_days())
    }

    /// `"<brand> <model>"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// A field technician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl Technician {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
