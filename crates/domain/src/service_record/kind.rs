//! Kinds of service work and the parts consumed by it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

define_label! {
    /// What kind of work a service record documents.
    ServiceType for "service_type" {
        Maintenance => "maintenance",
        Repair => "repair",
        Inspection => "inspection",
        Installation => "installation",
        Warranty => "warranty",
        Emergency => "emergency",
        Upgrade => "upgrade",
        Cleaning => "cleaning",
    }
}

/// A part consumed during a service visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    /// Unit cost.
    pub cost: Decimal,
    pub quantity: u32,
}

impl Part {
    /// `cost × quantity`, or `None` when the product overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.cost.checked_mul(Decimal::from(self.quantity))
    }
}
