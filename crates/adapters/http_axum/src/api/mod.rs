//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod appointments;
#[allow(clippy::missing_errors_doc)]
pub mod service_records;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, post};

use fieldhub_app::ports::{AppointmentRepository, DirectoryRepository, ServiceRecordRepository};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, A, D>() -> Router<AppState<R, A, D>>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    Router::new()
        // Service records
        .route(
            "/service-records",
            get(service_records::list::<R, A, D>).post(service_records::create::<R, A, D>),
        )
        .route(
            "/service-records/{id}",
            get(service_records::get::<R, A, D>)
                .patch(service_records::update::<R, A, D>)
                .delete(service_records::delete::<R, A, D>),
        )
        .route(
            "/service-records/{id}/complete",
            post(service_records::complete::<R, A, D>),
        )
        // Appointments
        .route(
            "/appointments",
            get(appointments::list::<R, A, D>).post(appointments::create::<R, A, D>),
        )
        .route(
            "/appointments/{id}",
            get(appointments::get::<R, A, D>)
                .patch(appointments::update::<R, A, D>)
                .delete(appointments::delete::<R, A, D>),
        )
        .route(
            "/appointments/{id}/convert",
            post(appointments::convert::<R, A, D>),
        )
}

/// Parse a path identifier, reporting garbage as a validation error.
fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| ApiError::invalid("id", raw))
}
