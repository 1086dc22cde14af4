//! Service record service — use-cases for recording work on devices.

use fieldhub_domain::actor::{Action, Actor, Module};
use fieldhub_domain::appointment::Appointment;
use fieldhub_domain::error::{CannotDeleteError, ConflictError, FieldHubError};
use fieldhub_domain::id::ServiceRecordId;
use fieldhub_domain::query::{Page, PageRequest, ServiceRecordFilter};
use fieldhub_domain::rules::LifecycleRules;
use fieldhub_domain::service_record::{
    CompleteServiceRecord, NewServiceRecord, ServiceRecord, ServiceRecordPatch,
    ServiceRecordStatus,
};
use fieldhub_domain::time::{self, now};
use fieldhub_domain::transition::{self, Transition};
use fieldhub_domain::validation;
use fieldhub_domain::view::ServiceRecordView;

use super::enrich;
use crate::ports::{DirectoryRepository, ServiceRecordRepository};

const ENTITY: &str = "ServiceRecord";

/// Application service for the service-record lifecycle.
pub struct ServiceRecordService<R, D> {
    records: R,
    directory: D,
    rules: LifecycleRules,
}

impl<R: ServiceRecordRepository, D: DirectoryRepository> ServiceRecordService<R, D> {
    /// Create a new service backed by the given repositories.
    pub fn new(records: R, directory: D, rules: LifecycleRules) -> Self {
        Self {
            records,
            directory,
            rules,
        }
    }

    /// Record work performed on a device.
    ///
    /// # Errors
    ///
    /// Returns [`FieldHubError::Forbidden`] when the actor may not create
    /// records, [`FieldHubError::Validation`] if the payload breaks a rule,
    /// [`FieldHubError::NotFound`] if the device or technician is unknown, or
    /// a storage error from the repository.
    #[tracing::instrument(skip(self, actor, input), fields(actor = %actor.id))]
    pub async fn create_service_record(
        &self,
        actor: &Actor,
        input: NewServiceRecord,
    ) -> Result<ServiceRecordView, FieldHubError> {
        actor.require(Module::ServiceRecords, Action::Create)?;
        let record = self.insert(actor, input).await?;
        self.view(record).await
    }

    /// Look up a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`FieldHubError::NotFound`] when no record with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, actor))]
    pub async fn get_service_record(
        &self,
        actor: &Actor,
        id: ServiceRecordId,
    ) -> Result<ServiceRecordView, FieldHubError> {
        actor.require(Module::ServiceRecords, Action::Read)?;
        let record = self.load(id).await?;
        self.view(record).await
    }

    /// List records matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, actor))]
    pub async fn list_service_records(
        &self,
        actor: &Actor,
        filter: ServiceRecordFilter,
        page: PageRequest,
    ) -> Result<Page<ServiceRecordView>, FieldHubError> {
        actor.require(Module::ServiceRecords, Action::Read)?;
        let found = self.records.query(filter, page).await?;

        let mut items = Vec::with_capacity(found.items.len());
        for record in found.items {
            items.push(self.view(record).await?);
        }
        Ok(Page {
            items,
            total: found.total,
            page: found.page,
            per_page: found.per_page,
        })
    }

    /// Apply a partial update, moving the status through the guard when set.
    ///
    /// # Errors
    ///
    /// Returns [`FieldHubError::NotFound`] if the record does not exist,
    /// [`FieldHubError::Conflict`] on a stale `expected_version`,
    /// [`FieldHubError::Validation`] or [`FieldHubError::InvalidTransition`]
    /// when the patch breaks a rule, or a storage error.
    #[tracing::instrument(skip(self, actor, patch), fields(actor = %actor.id))]
    pub async fn update_service_record(
        &self,
        actor: &Actor,
        id: ServiceRecordId,
        patch: ServiceRecordPatch,
    ) -> Result<ServiceRecordView, FieldHubError> {
        actor.require(Module::ServiceRecords, Action::Update)?;
        let record = self.apply(id, patch).await?;
        self.view(record).await
    }

    /// Close out a record: forces `completed` and stamps the end time.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_service_record`].
    #[tracing::instrument(skip(self, actor, input), fields(actor = %actor.id))]
    pub async fn complete_service_record(
        &self,
        actor: &Actor,
        id: ServiceRecordId,
        input: CompleteServiceRecord,
    ) -> Result<ServiceRecordView, FieldHubError> {
        actor.require(Module::ServiceRecords, Action::Complete)?;
        let patch = input.into_patch(time::minute_of(now()));
        let record = self.apply(id, patch).await?;
        self.view(record).await
    }

    /// Delete a record unless it is protected history.
    ///
    /// # Errors
    ///
    /// Returns [`FieldHubError::NotFound`] if the record does not exist,
    /// [`FieldHubError::CannotDelete`] for completed records past the
    /// protection window, or a storage error.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete_service_record(
        &self,
        actor: &Actor,
        id: ServiceRecordId,
    ) -> Result<(), FieldHubError> {
        actor.require(Module::ServiceRecords, Action::Delete)?;
        let record = self.load(id).await?;
        if let Some(reason) = record.deletion_blocker(time::date_of(now()), &self.rules) {
            return Err(CannotDeleteError {
                entity: ENTITY,
                id: id.to_string(),
                reason,
            }
            .into());
        }
        self.records.delete(id).await?;
        tracing::info!(record_id = %id, "service record deleted");
        Ok(())
    }

    pub(crate) async fn insert(
        &self,
        actor: &Actor,
        input: NewServiceRecord,
    ) -> Result<ServiceRecord, FieldHubError> {
        let record = input.into_record(&self.rules, Some(actor.id), now())?;
        enrich::existing_device(&self.directory, record.device_id).await?;
        if let Some(technician_id) = record.technician_id {
            enrich::existing_technician(&self.directory, technician_id).await?;
        }

        let record = self.records.create(record).await?;
        tracing::info!(
            record_id = %record.id,
            status = %record.status,
            total_cost = %record.total_cost,
            "service record created"
        );
        Ok(record)
    }

    pub(crate) async fn find_converted(
        &self,
        appointment: &Appointment,
    ) -> Result<Option<ServiceRecord>, FieldHubError> {
        self.records.find_by_appointment(appointment.id).await
    }

    pub(crate) async fn apply(
        &self,
        id: ServiceRecordId,
        patch: ServiceRecordPatch,
    ) -> Result<ServiceRecord, FieldHubError> {
        let current = self.load(id).await?;
        if let Some(expected) = patch.expected_version {
            if expected != current.version {
                return Err(ConflictError {
                    entity: ENTITY,
                    id: id.to_string(),
                    expected,
                    found: current.version,
                }
                .into());
            }
        }

        let ts = now();
        validation::validate_service_record_patch(
            &patch,
            &current,
            &self.rules,
            time::date_of(ts),
        )?;
        let transition = patch
            .status
            .map(|to| transition::guard(current.status, to))
            .transpose()?;
        if let Some(technician_id) = patch.technician_id {
            enrich::existing_technician(&self.directory, technician_id).await?;
        }

        let mut updated = current;
        updated.merge(patch, &self.rules)?;
        if let Some(transition) = transition {
            updated.status = transition.target();
            if updated.status == ServiceRecordStatus::FollowUpRequired {
                updated.follow_up_required = true;
            }
        }
        validation::validate_follow_up(&updated)?;
        updated.touch(ts);

        let saved = self.records.update(updated).await?;
        if let Some(Transition::Changed { from, to }) = transition {
            tracing::info!(record_id = %id, %from, %to, "service record status changed");
        }
        Ok(saved)
    }

    pub(crate) async fn view(&self, record: ServiceRecord) -> Result<ServiceRecordView, FieldHubError> {
        let related = enrich::record_related(&self.directory, &record).await?;
        Ok(ServiceRecordView::build(
            record,
            &related,
            time::date_of(now()),
        ))
    }

    async fn load(&self, id: ServiceRecordId) -> Result<ServiceRecord, FieldHubError> {
        self.records
            .get_by_id(id)
            .await?
            .ok_or_else(|| enrich::not_found(ENTITY, id))
    }
}
