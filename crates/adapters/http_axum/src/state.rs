//! Shared application state for axum handlers.

use std::sync::Arc;

use fieldhub_app::ports::{AppointmentRepository, DirectoryRepository, ServiceRecordRepository};
use fieldhub_app::services::appointment_service::AppointmentService;
use fieldhub_app::services::conversion_service::ConversionService;
use fieldhub_app::services::service_record_service::ServiceRecordService;

/// Application state shared across all axum handlers.
///
/// Generic over the service record repository, the appointment repository
/// and the directory. `Clone` is implemented manually so only the `Arc`
/// wrappers are cloned.
pub struct AppState<R, A, D> {
    /// Service record use-cases.
    pub service_records: Arc<ServiceRecordService<R, D>>,
    /// Appointment use-cases.
    pub appointments: Arc<AppointmentService<A, D>>,
    /// Appointment to service record conversion.
    pub conversion: Arc<ConversionService<R, A, D>>,
}

impl<R, A, D> Clone for AppState<R, A, D> {
    fn clone(&self) -> Self {
        Self {
            service_records: Arc::clone(&self.service_records),
            appointments: Arc::clone(&self.appointments),
            conversion: Arc::clone(&self.conversion),
        }
    }
}

impl<R, A, D> AppState<R, A, D>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    /// Create the state, wiring the conversion service over the two lifecycles.
    pub fn new(
        service_records: ServiceRecordService<R, D>,
        appointments: AppointmentService<A, D>,
    ) -> Self {
        let service_records = Arc::new(service_records);
        let appointments = Arc::new(appointments);
        let conversion = Arc::new(ConversionService::new(
            Arc::clone(&service_records),
            Arc::clone(&appointments),
        ));
        Self {
            service_records,
            appointments,
            conversion,
        }
    }
}
