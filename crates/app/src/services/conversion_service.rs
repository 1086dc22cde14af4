//! Conversion service — turns an appointment into a service record.
//!
//! Two writes are chained: the record is created `in_progress`, then the
//! appointment is driven to `in_progress`. A retry after a partial failure
//! reuses the record already linked to the appointment. When the second
//! write fails the record is parked in `pending_parts` for review and the
//! failure is returned.

use std::sync::Arc;

use fieldhub_domain::actor::{Action, Actor, Module};
use fieldhub_domain::appointment::{AppointmentPatch, AppointmentStatus, ConversionOverrides};
use fieldhub_domain::error::FieldHubError;
use fieldhub_domain::id::AppointmentId;
use fieldhub_domain::service_record::{ServiceRecordPatch, ServiceRecordStatus};
use fieldhub_domain::transition;
use fieldhub_domain::view::ServiceRecordView;

use super::appointment_service::AppointmentService;
use super::service_record_service::ServiceRecordService;
use crate::ports::{AppointmentRepository, DirectoryRepository, ServiceRecordRepository};

/// Application service chaining the two lifecycles.
pub struct ConversionService<R, A, D> {
    records: Arc<ServiceRecordService<R, D>>,
    appointments: Arc<AppointmentService<A, D>>,
}

impl<R, A, D> ConversionService<R, A, D>
where
    R: ServiceRecordRepository,
    A: AppointmentRepository,
    D: DirectoryRepository,
{
    pub fn new(
        records: Arc<ServiceRecordService<R, D>>,
        appointments: Arc<AppointmentService<A, D>>,
    ) -> Self {
        Self {
            records,
            appointments,
        }
    }

    /// Convert appointment `id` into an `in_progress` service record.
    ///
    /// # Errors
    ///
    /// Returns [`FieldHubError::Forbidden`], [`FieldHubError::NotFound`] for
    /// an unknown appointment or device, [`FieldHubError::InvalidTransition`]
    /// when the appointment can no longer start, [`FieldHubError::Validation`]
    /// when the synthesized record breaks a rule, or the error of whichever
    /// write failed.
    #[tracing::instrument(skip(self, actor, overrides), fields(actor = %actor.id))]
    pub async fn convert_appointment_to_service_record(
        &self,
        actor: &Actor,
        id: AppointmentId,
        overrides: ConversionOverrides,
    ) -> Result<ServiceRecordView, FieldHubError> {
        actor.require(Module::Appointments, Action::Convert)?;
        let appointment = self.appointments.load(id).await?;
        transition::guard(appointment.status, AppointmentStatus::InProgress)?;

        let record = match self.records.find_converted(&appointment).await? {
            Some(existing) => {
                tracing::info!(
                    appointment_id = %id,
                    record_id = %existing.id,
                    "reusing service record from earlier conversion"
                );
                if existing.status == ServiceRecordStatus::PendingParts {
                    let resume = ServiceRecordPatch {
                        status: Some(ServiceRecordStatus::InProgress),
                        ..ServiceRecordPatch::default()
                    };
                    tracing::info!(record_id = %existing.id, "resuming parked service record");
                    self.records.apply(existing.id, resume).await?
                } else {
                    existing
                }
            }
            None => {
                let input = appointment.service_record_input(overrides);
                self.records.insert(actor, input).await?
            }
        };

        if appointment.status != AppointmentStatus::InProgress {
            let step = self
                .appointments
                .apply(actor, id, AppointmentPatch::status(AppointmentStatus::InProgress))
                .await;
            if let Err(err) = step {
                tracing::warn!(
                    appointment_id = %id,
                    record_id = %record.id,
                    error = %err,
                    "appointment update failed after conversion, parking record in pending_parts"
                );
                let park = ServiceRecordPatch {
                    status: Some(ServiceRecordStatus::PendingParts),
                    ..ServiceRecordPatch::default()
                };
                if let Err(compensation) = self.records.apply(record.id, park).await {
                    tracing::error!(
                        record_id = %record.id,
                        error = %compensation,
                        "could not park converted service record"
                    );
                }
                return Err(err);
            }
        }

        tracing::info!(appointment_id = %id, record_id = %record.id, "appointment converted");
        self.records.view(record).await
    }
}
