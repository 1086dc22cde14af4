//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use fieldhub_domain::actor::{Actor, Role};
use fieldhub_domain::appointment::Appointment;
use fieldhub_domain::directory::{Client, Device, Technician};
use fieldhub_domain::error::{ConflictError, FieldHubError, NotFoundError};
use fieldhub_domain::id::{AppointmentId, ClientId, DeviceId, ServiceRecordId, TechnicianId, UserId};
use fieldhub_domain::query::{AppointmentFilter, Page, PageRequest, ServiceRecordFilter};
use fieldhub_domain::service_record::ServiceRecord;

use crate::ports::{AppointmentRepository, DirectoryRepository, ServiceRecordRepository};

pub fn actor(role: Role) -> Actor {
    Actor::new(UserId::new(), role)
}

pub fn admin() -> Actor {
    actor(Role::Admin)
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = u64::try_from(items.len()).unwrap();
    let offset = usize::try_from(page.offset()).unwrap();
    let limit = usize::try_from(page.limit()).unwrap();
    let items = items.into_iter().skip(offset).take(limit).collect();
    Page::new(items, total, page)
}

fn check_version(entity: &'static str, id: String, stored: u32, next: u32) -> Result<(), FieldHubError> {
    if stored + 1 != next {
        return Err(ConflictError {
            entity,
            id,
            expected: next - 1,
            found: stored,
        }
        .into());
    }
    Ok(())
}

#[derive(Default)]
pub struct InMemoryServiceRecordRepo {
    store: Mutex<HashMap<ServiceRecordId, ServiceRecord>>,
}

impl InMemoryServiceRecordRepo {
    pub fn get(&self, id: ServiceRecordId) -> Option<ServiceRecord> {
        self.store.lock().unwrap().get(&id).cloned()
    }

    /// Overwrite a stored record, bypassing version checks.
    pub fn put(&self, record: ServiceRecord) {
        self.store.lock().unwrap().insert(record.id, record);
    }

    pub fn find_linked(&self, appointment_id: AppointmentId) -> Option<ServiceRecord> {
        self.store
            .lock()
            .unwrap()
            .values()
            .find(|r| r.appointment_id == Some(appointment_id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ServiceRecordRepository for InMemoryServiceRecordRepo {
    fn create(
        &self,
        record: ServiceRecord,
    ) -> impl Future<Output = Result<ServiceRecord, FieldHubError>> + Send {
        self.put(record.clone());
        async { Ok(record) }
    }

    fn get_by_id(
        &self,
        id: ServiceRecordId,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, FieldHubError>> + Send {
        let result = self.get(id);
        async { Ok(result) }
    }

    fn find_by_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, FieldHubError>> + Send {
        let result = self.find_linked(appointment_id);
        async { Ok(result) }
    }

    fn query(
        &self,
        filter: ServiceRecordFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ServiceRecord>, FieldHubError>> + Send {
        let mut matching: Vec<ServiceRecord> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.service_date.cmp(&a.service_date));
        let result = paginate(matching, page);
        async { Ok(result) }
    }

    fn update(
        &self,
        record: ServiceRecord,
    ) -> impl Future<Output = Result<ServiceRecord, FieldHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let stored_version = store.get(&record.id).map(|stored| stored.version);
        let result = match stored_version {
            None => Err(NotFoundError {
                entity: "ServiceRecord",
                id: record.id.to_string(),
            }
            .into()),
            Some(version) => check_version(
                "ServiceRecord",
                record.id.to_string(),
                version,
                record.version,
            )
            .map(|()| {
                store.insert(record.id, record.clone());
                record
            }),
        };
        async { result }
    }

    fn delete(
        &self,
        id: ServiceRecordId,
    ) -> impl Future<Output = Result<(), FieldHubError>> + Send {
        self.store.lock().unwrap().remove(&id);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct InMemoryAppointmentRepo {
    store: Mutex<HashMap<AppointmentId, Appointment>>,
    fail_updates: AtomicBool,
}

impl InMemoryAppointmentRepo {
    pub fn get(&self, id: AppointmentId) -> Option<Appointment> {
        self.store.lock().unwrap().get(&id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().unwrap().is_empty()
    }

    /// Make every subsequent `update` fail with a storage error.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

impl AppointmentRepository for InMemoryAppointmentRepo {
    fn create(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, FieldHubError>> + Send {
        self.store
            .lock()
            .unwrap()
            .insert(appointment.id, appointment.clone());
        async { Ok(appointment) }
    }

    fn get_by_id(
        &self,
        id: AppointmentId,
    ) -> impl Future<Output = Result<Option<Appointment>, FieldHubError>> + Send {
        let result = self.get(id);
        async { Ok(result) }
    }

    fn query(
        &self,
        filter: AppointmentFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Appointment>, FieldHubError>> + Send {
        let mut matching: Vec<Appointment> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        matching.sort_by_key(|a| (a.appointment_date, a.start_time));
        let result = paginate(matching, page);
        async { Ok(result) }
    }

    fn update(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, FieldHubError>> + Send {
        let result = if self.fail_updates.load(Ordering::SeqCst) {
            Err(FieldHubError::Storage(Box::new(std::io::Error::other(
                "appointment store unavailable",
            ))))
        } else {
            let mut store = self.store.lock().unwrap();
            let stored_version = store.get(&appointment.id).map(|stored| stored.version);
            match stored_version {
                None => Err(NotFoundError {
                    entity: "Appointment",
                    id: appointment.id.to_string(),
                }
                .into()),
                Some(version) => check_version(
                    "Appointment",
                    appointment.id.to_string(),
                    version,
                    appointment.version,
                )
                .map(|()| {
                    store.insert(appointment.id, appointment.clone());
                    appointment
                }),
            }
        };
        async { result }
    }

    fn delete(&self, id: AppointmentId) -> impl Future<Output = Result<(), FieldHubError>> + Send {
        self.store.lock().unwrap().remove(&id);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    clients: Mutex<HashMap<ClientId, Client>>,
    devices: Mutex<HashMap<DeviceId, Device>>,
    technicians: Mutex<HashMap<TechnicianId, Technician>>,
}

/// Seed one client owning one device, plus one technician.
pub fn seed_directory(directory: &InMemoryDirectory) -> (Client, Device, Technician) {
    let client = Client {
        id: ClientId::new(),
        company_name: "Acme Bakery".to_string(),
        contact_person: Some("Jo Baker".to_string()),
        phone: None,
        email: None,
    };
    let device = Device {
        id: DeviceId::new(),
        client_id: client.id,
        brand: "Buderus".to_string(),
        model: "GB172".to_string(),
        device_type: Some("gas boiler".to_string()),
        serial_number: None,
        last_service_date: None,
        next_service_date: None,
    };
    let technician = Technician {
        id: TechnicianId::new(),
        first_name: "Sam".to_string(),
        last_name: "Fixer".to_string(),
        phone: None,
    };
    directory
        .clients
        .lock()
        .unwrap()
        .insert(client.id, client.clone());
    directory
        .devices
        .lock()
        .unwrap()
        .insert(device.id, device.clone());
    directory
        .technicians
        .lock()
        .unwrap()
        .insert(technician.id, technician.clone());
    (client, device, technician)
}

impl DirectoryRepository for InMemoryDirectory {
    fn get_client(
        &self,
        id: ClientId,
    ) -> impl Future<Output = Result<Option<Client>, FieldHubError>> + Send {
        let result = self.clients.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }

    fn get_device(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, FieldHubError>> + Send {
        let result = self.devices.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }

    fn get_technician(
        &self,
        id: TechnicianId,
    ) -> impl Future<Output = Result<Option<Technician>, FieldHubError>> + Send {
        let result = self.technicians.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }
}
