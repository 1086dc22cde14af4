//! Appointment status and its lifecycle graph.

use crate::transition::Lifecycle;

define_label! {
    /// Where a promised visit stands.
    #[derive(Default)]
    AppointmentStatus for "status" {
        #[default]
        Scheduled => "scheduled",
        Confirmed => "confirmed",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
        NoShow => "no_show",
        Rescheduled => "rescheduled",
    }
}

impl AppointmentStatus {
    /// Visit still expected to happen.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed)
    }

    /// Appointment may no longer be deleted once work has started.
    #[must_use]
    pub fn is_deletable(self) -> bool {
        !matches!(self, Self::InProgress | Self::Completed)
    }
}

impl Lifecycle for AppointmentStatus {
    const ENTITY: &'static str = "Appointment";

    fn allowed_targets(self) -> &'static [Self] {
        match self {
            Self::Scheduled => &[
                Self::Confirmed,
                Self::Cancelled,
                Self::InProgress,
                Self::NoShow,
                Self::Rescheduled,
            ],
            Self::Confirmed => &[
                Self::InProgress,
                Self::Cancelled,
                Self::NoShow,
                Self::Rescheduled,
            ],
            Self::InProgress => &[Self::Completed, Self::Cancelled],
            Self::Completed => &[],
            Self::Cancelled | Self::NoShow => &[Self::Rescheduled],
            Self::Rescheduled => &[Self::Scheduled, Self::Confirmed],
        }
    }
}
