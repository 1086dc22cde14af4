//! Directory joins shared by the services.

use fieldhub_domain::appointment::Appointment;
use fieldhub_domain::directory::{Client, Device, Technician};
use fieldhub_domain::error::{FieldHubError, NotFoundError};
use fieldhub_domain::id::{ClientId, DeviceId, TechnicianId};
use fieldhub_domain::service_record::ServiceRecord;
use fieldhub_domain::view::Related;

use crate::ports::DirectoryRepository;

pub(crate) async fn record_related<D: DirectoryRepository>(
    directory: &D,
    record: &ServiceRecord,
) -> Result<Related, FieldHubError> {
    let device = directory.get_device(record.device_id).await?;
    let client = match &device {
        Some(device) => directory.get_client(device.client_id).await?,
        None => None,
    };
    let technician = match record.technician_id {
        Some(id) => directory.get_technician(id).await?,
        None => None,
    };
    Ok(Related {
        client,
        device,
        technician,
    })
}

pub(crate) async fn appointment_related<D: DirectoryRepository>(
    directory: &D,
    appointment: &Appointment,
) -> Result<Related, FieldHubError> {
    let client = directory.get_client(appointment.client_id).await?;
    let device = match appointment.device_id {
        Some(id) => directory.get_device(id).await?,
        None => None,
    };
    let technician = directory.get_technician(appointment.technician_id).await?;
    Ok(Related {
        client,
        device,
        technician,
    })
}

pub(crate) async fn existing_client<D: DirectoryRepository>(
    directory: &D,
    id: ClientId,
) -> Result<Client, FieldHubError> {
    directory
        .get_client(id)
        .await?
        .ok_or_else(|| not_found("Client", id))
}

pub(crate) async fn existing_device<D: DirectoryRepository>(
    directory: &D,
    id: DeviceId,
) -> Result<Device, FieldHubError> {
    directory
        .get_device(id)
        .await?
        .ok_or_else(|| not_found("Device", id))
}

pub(crate) async fn existing_technician<D: DirectoryRepository>(
    directory: &D,
    id: TechnicianId,
) -> Result<Technician, FieldHubError> {
    directory
        .get_technician(id)
        .await?
        .ok_or_else(|| not_found("Technician", id))
}

pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> FieldHubError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}
