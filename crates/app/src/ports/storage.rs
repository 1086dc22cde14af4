//! Storage ports — repository traits for persistence.
//!
//! Updates are conditional: a record handed to `update` carries the version it
//! will have once stored, and the write only applies while the stored copy is
//! still at the version right before it. A lost race surfaces as
//! [`FieldHubError::Conflict`].

use std::future::Future;
use std::sync::Arc;

use fieldhub_domain::appointment::Appointment;
use fieldhub_domain::error::FieldHubError;
use fieldhub_domain::id::{AppointmentId, ServiceRecordId};
use fieldhub_domain::query::{AppointmentFilter, Page, PageRequest, ServiceRecordFilter};
use fieldhub_domain::service_record::ServiceRecord;

/// Persistence for service records.
pub trait ServiceRecordRepository {
    /// Insert a new record.
    fn create(
        &self,
        record: ServiceRecord,
    ) -> impl Future<Output = Result<ServiceRecord, FieldHubError>> + Send;

    /// Fetch a record by id.
    fn get_by_id(
        &self,
        id: ServiceRecordId,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, FieldHubError>> + Send;

    /// Fetch the record converted from `appointment_id`, if one exists.
    fn find_by_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, FieldHubError>> + Send;

    /// List records matching `filter`, newest service date first.
    fn query(
        &self,
        filter: ServiceRecordFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ServiceRecord>, FieldHubError>> + Send;

    /// Replace a stored record, conditional on its previous version.
    fn update(
        &self,
        record: ServiceRecord,
    ) -> impl Future<Output = Result<ServiceRecord, FieldHubError>> + Send;

    /// Remove a record.
    fn delete(&self, id: ServiceRecordId)
    -> impl Future<Output = Result<(), FieldHubError>> + Send;
}

/// Persistence for appointments.
pub trait AppointmentRepository {
    /// Insert a new appointment.
    fn create(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, FieldHubError>> + Send;

    /// Fetch an appointment by id.
    fn get_by_id(
        &self,
        id: AppointmentId,
    ) -> impl Future<Output = Result<Option<Appointment>, FieldHubError>> + Send;

    /// List appointments matching `filter`, earliest first.
    fn query(
        &self,
        filter: AppointmentFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Appointment>, FieldHubError>> + Send;

    /// Replace a stored appointment, conditional on its previous version.
    fn update(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, FieldHubError>> + Send;

    /// Remove an appointment.
    fn delete(&self, id: AppointmentId)
    -> impl Future<Output = Result<(), FieldHubError>> + Send;
}

impl<T: ServiceRecordRepository + Send + Sync> ServiceRecordRepository for Arc<T> {
    fn create(
        &self,
        record: ServiceRecord,
    ) -> impl Future<Output = Result<ServiceRecord, FieldHubError>> + Send {
        (**self).create(record)
    }

    fn get_by_id(
        &self,
        id: ServiceRecordId,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, FieldHubError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, FieldHubError>> + Send {
        (**self).find_by_appointment(appointment_id)
    }

    fn query(
        &self,
        filter: ServiceRecordFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ServiceRecord>, FieldHubError>> + Send {
        (**self).query(filter, page)
    }

    fn update(
        &self,
        record: ServiceRecord,
    ) -> impl Future<Output = Result<ServiceRecord, FieldHubError>> + Send {
        (**self).update(record)
    }

    fn delete(
        &self,
        id: ServiceRecordId,
    ) -> impl Future<Output = Result<(), FieldHubError>> + Send {
        (**self).delete(id)
    }
}

impl<T: AppointmentRepository + Send + Sync> AppointmentRepository for Arc<T> {
    fn create(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, FieldHubError>> + Send {
        (**self).create(appointment)
    }

    fn get_by_id(
        &self,
        id: AppointmentId,
    ) -> impl Future<Output = Result<Option<Appointment>, FieldHubError>> + Send {
        (**self).get_by_id(id)
    }

    fn query(
        &self,
        filter: AppointmentFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Appointment>, FieldHubError>> + Send {
        (**self).query(filter, page)
    }

    fn update(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, FieldHubError>> + Send {
        (**self).update(appointment)
    }

    fn delete(&self, id: AppointmentId) -> impl Future<Output = Result<(), FieldHubError>> + Send {
        (**self).delete(id)
    }
}
