//! Service record — the record of work performed on a client's device.
//!
//! A record is owned by the device it services. It references, but does
//! not own, the technician and (when produced by conversion) the
//! appointment that preceded it.

mod input;
mod kind;
mod status;

pub use input::{CompleteServiceRecord, NewServiceRecord, ServiceRecordPatch};
pub use kind::{Part, ServiceType};
pub use status::ServiceRecordStatus;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator;
use crate::error::ValidationError;
use crate::id::{AppointmentId, DeviceId, ServiceRecordId, TechnicianId, UserId};
use crate::rules::LifecycleRules;
use crate::time::Timestamp;

/// Work performed on a device, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: ServiceRecordId,
    pub device_id: DeviceId,
    pub technician_id: Option<TechnicianId>,
    /// Appointment this record was converted from, if any.
    pub appointment_id: Option<AppointmentId>,
    pub service_type: ServiceType,
    pub service_date: NaiveDate,
    #[serde(default, with = "crate::time::hhmm::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "crate::time::hhmm::option")]
    pub end_time: Option<NaiveTime>,
    pub description: String,
    pub parts_used: Vec<Part>,
    pub labor_hours: Option<Decimal>,
    pub total_cost: Decimal,
    pub client_signature: bool,
    pub photos: Vec<String>,
    pub condition_before: Option<u8>,
    pub condition_after: Option<u8>,
    pub recommendations: Option<String>,
    pub status: ServiceRecordStatus,
    pub warranty_work: bool,
    pub follow_up_required: bool,
    pub follow_up_date: Option<NaiveDate>,
    pub created_by: Option<UserId>,
    /// Incremented on every successful update.
    pub version: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ServiceRecord {
    /// Whether the record prices itself from parts and labor rather than a flat fee.
    #[must_use]
    pub fn has_itemized_cost(&self) -> bool {
        !self.parts_used.is_empty() || self.labor_hours.is_some()
    }

    /// Fold a validated patch into the record.
    ///
    /// Status is not touched here: it goes through the transition guard first.
    /// The total is re-derived whenever parts or labor are patched; a patched
    /// `total_cost` only sticks on flat-fee records.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CostOverflow`] when repricing overflows; the
    /// record is then partially merged and must be discarded.
    pub fn merge(
        &mut self,
        patch: ServiceRecordPatch,
        rules: &LifecycleRules,
    ) -> Result<(), ValidationError> {
        let reprice = patch.parts_used.is_some() || patch.labor_hours.is_some();

        if let Some(technician_id) = patch.technician_id {
            self.technician_id = Some(technician_id);
        }
        if let Some(service_type) = patch.service_type {
            self.service_type = service_type;
        }
        if let Some(service_date) = patch.service_date {
            self.service_date = service_date;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = Some(start_time);
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = Some(end_time);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(parts_used) = patch.parts_used {
            self.parts_used = parts_used;
        }
        if let Some(labor_hours) = patch.labor_hours {
            self.labor_hours = Some(labor_hours);
        }
        if let Some(client_signature) = patch.client_signature {
            self.client_signature = client_signature;
        }
        if let Some(photos) = patch.photos {
            self.photos = photos;
        }
        if let Some(condition_before) = patch.condition_before {
            self.condition_before = Some(condition_before);
        }
        if let Some(condition_after) = patch.condition_after {
            self.condition_after = Some(condition_after);
        }
        if let Some(recommendations) = patch.recommendations {
            self.recommendations = Some(recommendations);
        }
        if let Some(warranty_work) = patch.warranty_work {
            self.warranty_work = warranty_work;
        }
        if let Some(follow_up_required) = patch.follow_up_required {
            self.follow_up_required = follow_up_required;
        }
        if let Some(follow_up_date) = patch.follow_up_date {
            self.follow_up_date = Some(follow_up_date);
        }

        if self.has_itemized_cost() {
            if reprice {
                self.total_cost =
                    calculator::total_cost(&self.parts_used, self.labor_hours, rules.labor_rate)?;
            }
        } else if reprice {
            self.total_cost = patch.total_cost.unwrap_or(Decimal::ZERO);
        } else if let Some(total_cost) = patch.total_cost {
            self.total_cost = total_cost;
        }
        Ok(())
    }

    /// Reason the record may not be deleted on `today`, if any.
    ///
    /// Completed records whose service date lies more than
    /// [`LifecycleRules::delete_protection_days`] in the past are historical
    /// and kept.
    #[must_use]
    pub fn deletion_blocker(&self, today: NaiveDate, rules: &LifecycleRules) -> Option<String> {
        if self.status != ServiceRecordStatus::Completed {
            return None;
        }
        let age = (today - self.service_date).num_days();
        (age > rules.delete_protection_days).then(|| {
            format!(
                "completed {age} days ago (records older than {} days are protected)",
                rules.delete_protection_days
            )
        })
    }

    /// Record a successful write.
    pub fn touch(&mut self, now: Timestamp) {
        self.version += 1;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;
    use rust_decimal_macros::dec;

    fn sample(service_date: NaiveDate) -> ServiceRecord {
        let ts = now();
        ServiceRecord {
            id: ServiceRecordId::new(),
            device_id: DeviceId::new(),
            technician_id: None,
            appointment_id: None,
            service_type: ServiceType::Repair,
            service_date,
            start_time: None,
            end_time: None,
            description: "burner cleaning".to_string(),
            parts_used: vec![],
            labor_hours: None,
            total_cost: Decimal::ZERO,
            client_signature: false,
            photos: vec![],
            condition_before: None,
            condition_after: None,
            recommendations: None,
            status: ServiceRecordStatus::Completed,
            warranty_work: false,
            follow_up_required: false,
            follow_up_date: None,
            created_by: None,
            version: 1,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn should_reprice_when_labor_is_patched() {
        let mut record = sample(date(2024, 6, 1));
        record.parts_used = vec![Part {
            name: "filter".to_string(),
            cost: dec!(50),
            quantity: 2,
        }];
        record.total_cost = dec!(100);

        let patch = ServiceRecordPatch {
            labor_hours: Some(dec!(1.5)),
            ..ServiceRecordPatch::default()
        };
        record.merge(patch, &LifecycleRules::default()).unwrap();

        assert_eq!(record.total_cost, dec!(220));
    }

    #[test]
    fn should_fail_merge_when_labor_overflows() {
        let mut record = sample(date(2024, 6, 1));
        let patch = ServiceRecordPatch {
            labor_hours: Some(Decimal::MAX),
            ..ServiceRecordPatch::default()
        };
        let err = record
            .merge(patch, &LifecycleRules::default())
            .unwrap_err();
        assert_eq!(err, ValidationError::CostOverflow);
    }

    #[test]
    fn should_ignore_flat_total_when_record_is_itemized() {
        let mut record = sample(date(2024, 6, 1));
        record.labor_hours = Some(dec!(2));
        record.total_cost = dec!(160);

        let patch = ServiceRecordPatch {
            total_cost: Some(dec!(999)),
            ..ServiceRecordPatch::default()
        };
        record.merge(patch, &LifecycleRules::default()).unwrap();

        assert_eq!(record.total_cost, dec!(160));
    }

    #[test]
    fn should_keep_flat_total_on_flat_fee_record() {
        let mut record = sample(date(2024, 6, 1));
        let patch = ServiceRecordPatch {
            total_cost: Some(dec!(120)),
            ..ServiceRecordPatch::default()
        };
        record.merge(patch, &LifecycleRules::default()).unwrap();
        assert_eq!(record.total_cost, dec!(120));
    }

    #[test]
    fn should_leave_absent_fields_untouched() {
        let mut record = sample(date(2024, 6, 1));
        record.recommendations = Some("replace seal next year".to_string());
        let before = record.clone();

        record
            .merge(ServiceRecordPatch::default(), &LifecycleRules::default())
            .unwrap();

        assert_eq!(record, before);
    }

    #[test]
    fn should_block_deletion_of_completed_record_older_than_thirty_days() {
        let record = sample(date(2024, 6, 1));
        let rules = LifecycleRules::default();
        assert!(record.deletion_blocker(date(2024, 7, 2), &rules).is_some());
        assert!(record.deletion_blocker(date(2024, 7, 1), &rules).is_none());
        assert!(record.deletion_blocker(date(2024, 6, 30), &rules).is_none());
    }

    #[test]
    fn should_allow_deletion_of_old_record_that_is_not_completed() {
        let mut record = sample(date(2020, 1, 1));
        record.status = ServiceRecordStatus::Cancelled;
        assert!(
            record
                .deletion_blocker(date(2024, 1, 1), &LifecycleRules::default())
                .is_none()
        );
    }

    #[test]
    fn should_bump_version_when_touched() {
        let mut record = sample(date(2024, 6, 1));
        let ts = now();
        record.touch(ts);
        assert_eq!(record.version, 2);
        assert_eq!(record.updated_at, ts);
    }

    #[test]
    fn should_serialize_times_as_hours_and_minutes() {
        let mut record = sample(date(2024, 6, 1));
        record.start_time = NaiveTime::from_hms_opt(9, 5, 0);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["start_time"], "09:05");
        assert!(json["end_time"].is_null());
        assert_eq!(json["status"], "completed");
    }
}
