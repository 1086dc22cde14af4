//! Appointment service — use-cases for booking and managing visits.

use fieldhub_domain::actor::{Action, Actor, Module};
use fieldhub_domain::appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment};
use fieldhub_domain::error::{CannotDeleteError, ConflictError, FieldHubError};
use fieldhub_domain::id::AppointmentId;
use fieldhub_domain::query::{AppointmentFilter, Page, PageRequest};
use fieldhub_domain::rules::LifecycleRules;
use fieldhub_domain::time::{self, now};
use fieldhub_domain::transition::{self, Transition};
use fieldhub_domain::validation;
use fieldhub_domain::view::AppointmentView;

use super::enrich;
use crate::ports::{AppointmentRepository, DirectoryRepository};

const ENTITY: &str = "Appointment";

/// Application service for the appointment lifecycle.
pub struct AppointmentService<R, D> {
    appointments: R,
    directory: D,
    rules: LifecycleRules,
}

impl<R: AppointmentRepository, D: DirectoryRepository> AppointmentService<R, D> {
    /// Create a new service backed by the given repositories.
    pub fn new(appointments: R, directory: D, rules: LifecycleRules) -> Self {
        Self {
            appointments,
            directory,
            rules,
        }
    }

    /// Book a visit.
    ///
    /// # Errors
    ///
    /// Returns [`FieldHubError::Forbidden`], [`FieldHubError::Validation`],
    /// [`FieldHubError::NotFound`] when the client, technician or device is
    /// unknown, or a storage error.
    #[tracing::instrument(skip(self, actor, input), fields(actor = %actor.id))]
    pub async fn create_appointment(
        &self,
        actor: &Actor,
        input: NewAppointment,
    ) -> Result<AppointmentView, FieldHubError> {
        actor.require(Module::Appointments, Action::Create)?;
        let appointment = input.into_appointment(&self.rules, Some(actor.id), now())?;

        enrich::existing_client(&self.directory, appointment.client_id).await?;
        enrich::existing_technician(&self.directory, appointment.technician_id).await?;
        if let Some(device_id) = appointment.device_id {
            enrich::existing_device(&self.directory, device_id).await?;
        }

        let appointment = self.appointments.create(appointment).await?;
        tracing::info!(
            appointment_id = %appointment.id,
            date = %appointment.appointment_date,
            "appointment booked"
        );
        self.view(appointment).await
    }

    /// Look up an appointment by id.
    ///
    /// # Errors
    ///
    /// Returns [`FieldHubError::NotFound`] when no appointment with `id`
    /// exists, or a storage error.
    #[tracing::instrument(skip(self, actor))]
    pub async fn get_appointment(
        &self,
        actor: &Actor,
        id: AppointmentId,
    ) -> Result<AppointmentView, FieldHubError> {
        actor.require(Module::Appointments, Action::Read)?;
        let appointment = self.load(id).await?;
        self.view(appointment).await
    }

    /// List appointments matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, actor))]
    pub async fn list_appointments(
        &self,
        actor: &Actor,
        filter: AppointmentFilter,
        page: PageRequest,
    ) -> Result<Page<AppointmentView>, FieldHubError> {
        actor.require(Module::Appointments, Action::Read)?;
        let found = self.appointments.query(filter, page).await?;

        let mut items = Vec::with_capacity(found.items.len());
        for appointment in found.items {
            items.push(self.view(appointment).await?);
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
    /// Returns [`FieldHubError::NotFound`], [`FieldHubError::Conflict`],
    /// [`FieldHubError::Validation`] (including a cancellation without a
    /// reason), [`FieldHubError::InvalidTransition`], or a storage error.
    #[tracing::instrument(skip(self, actor, patch), fields(actor = %actor.id))]
    pub async fn update_appointment(
        &self,
        actor: &Actor,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<AppointmentView, FieldHubError> {
        actor.require(Module::Appointments, Action::Update)?;
        let appointment = self.apply(actor, id, patch).await?;
        self.view(appointment).await
    }

    /// Delete an appointment that has not started.
    ///
    /// # Errors
    ///
    /// Returns [`FieldHubError::NotFound`], [`FieldHubError::CannotDelete`]
    /// while in progress or completed, or a storage error.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete_appointment(
        &self,
        actor: &Actor,
        id: AppointmentId,
    ) -> Result<(), FieldHubError> {
        actor.require(Module::Appointments, Action::Delete)?;
        let appointment = self.load(id).await?;
        if let Some(reason) = appointment.deletion_blocker() {
            return Err(CannotDeleteError {
                entity: ENTITY,
                id: id.to_string(),
                reason,
            }
            .into());
        }
        self.appointments.delete(id).await?;
        tracing::info!(appointment_id = %id, "appointment deleted");
        Ok(())
    }

    pub(crate) async fn apply(
        &self,
        actor: &Actor,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, FieldHubError> {
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
        validation::validate_appointment_patch(&patch, &current, &self.rules, time::date_of(ts))?;
        let transition = patch
            .status
            .map(|to| transition::guard(current.status, to))
            .transpose()?;
        if let Some(technician_id) = patch.technician_id {
            enrich::existing_technician(&self.directory, technician_id).await?;
        }
        if let Some(device_id) = patch.device_id {
            enrich::existing_device(&self.directory, device_id).await?;
        }

        let mut updated = current;
        updated.merge(patch);
        if let Some(transition) = transition {
            updated.status = transition.target();
            if matches!(
                transition,
                Transition::Changed {
                    to: AppointmentStatus::Cancelled,
                    ..
                }
            ) {
                updated.cancelled_by = Some(actor.id);
            }
        }
        updated.touch(ts);

        let saved = self.appointments.update(updated).await?;
        if let Some(Transition::Changed { from, to }) = transition {
            tracing::info!(appointment_id = %id, %from, %to, "appointment status changed");
        }
        Ok(saved)
    }

    pub(crate) async fn view(&self, appointment: Appointment) -> Result<AppointmentView, FieldHubError> {
        let related = enrich::appointment_related(&self.directory, &appointment).await?;
        Ok(AppointmentView::build(appointment, &related, now()))
    }

    pub(crate) async fn load(&self, id: AppointmentId) -> Result<Appointment, FieldHubError> {
        self.appointments
            .get_by_id(id)
            .await?
            .ok_or_else(|| enrich::not_found(ENTITY, id))
    }
}
