//! Directory port — read-only lookups of clients, devices and technicians.

use std::future::Future;
use std::sync::Arc;

use fieldhub_domain::directory::{Client, Device, Technician};
use fieldhub_domain::error::FieldHubError;
use fieldhub_domain::id::{ClientId, DeviceId, TechnicianId};

/// Looks up the records service records and appointments refer to.
pub trait DirectoryRepository {
    fn get_client(
        &self,
        id: ClientId,
    ) -> impl Future<Output = Result<Option<Client>, FieldHubError>> + Send;

    fn get_device(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, FieldHubError>> + Send;

    fn get_technician(
        &self,
        id: TechnicianId,
    ) -> impl Future<Output = Result<Option<Technician>, FieldHubError>> + Send;
}

impl<T: DirectoryRepository + Send + Sync> DirectoryRepository for Arc<T> {
    fn get_client(
        &self,
        id: ClientId,
    ) -> impl Future<Output = Result<Option<Client>, FieldHubError>> + Send {
        (**self).get_client(id)
    }

    fn get_device(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, FieldHubError>> + Send {
        (**self).get_device(id)
    }

    fn get_technician(
        &self,
        id: TechnicianId,
    ) -> impl Future<Output = Result<Option<Technician>, FieldHubError>> + Send {
        (**self).get_technician(id)
    }
}
