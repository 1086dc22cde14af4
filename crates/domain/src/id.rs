//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`ServiceRecord`](crate::service_record::ServiceRecord).
    ServiceRecordId
);

define_id!(
    /// Unique identifier for an [`Appointment`](crate::appointment::Appointment).
    AppointmentId
);

define_id!(
    /// Unique identifier for a [`Client`](crate::directory::Client).
    ClientId
);

define_id!(
    /// Unique identifier for a serviced [`Device`](crate::directory::Device).
    DeviceId
);

define_id!(
    /// Unique identifier for a [`Technician`](crate::directory::Technician).
    TechnicianId
);

define_id!(
    /// Unique identifier for an authenticated user (see [`Actor`](crate::actor::Actor)).
    UserId
);
