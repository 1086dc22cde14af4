//! Appointment types and priorities.

use crate::service_record::ServiceType;

define_label! {
    /// Purpose of a visit.
    AppointmentType for "appointment_type" {
        Maintenance => "maintenance",
        Repair => "repair",
        Inspection => "inspection",
        Consultation => "consultation",
        Installation => "installation",
        WarrantyClaim => "warranty_claim",
        Emergency => "emergency",
    }
}

impl AppointmentType {
    /// Kind of service record a visit of this type produces.
    ///
    /// A consultation has no service counterpart and is recorded as an inspection.
    #[must_use]
    pub fn service_type(self) -> ServiceType {
        match self {
            Self::Maintenance => ServiceType::Maintenance,
            Self::Repair => ServiceType::Repair,
            Self::Inspection | Self::Consultation => ServiceType::Inspection,
            Self::Installation => ServiceType::Installation,
            Self::WarrantyClaim => ServiceType::Warranty,
            Self::Emergency => ServiceType::Emergency,
        }
    }
}

define_label! {
    /// Scheduling priority.
    #[derive(Default, PartialOrd, Ord)]
    Priority for "priority" {
        Low => "low",
        #[default]
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_warranty_claim_to_warranty_service() {
        assert_eq!(AppointmentType::WarrantyClaim.service_type(), ServiceType::Warranty);
        assert_eq!(AppointmentType::Consultation.service_type(), ServiceType::Inspection);
    }

    #[test]
    fn should_default_priority_to_normal_and_order_by_severity() {
        assert_eq!(Priority::default(), Priority::Normal);
        assert!(Priority::Urgent > Priority::High);
    }
}
