//! JSON REST handlers for appointments and their conversion into service records.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Deserialize;

use fieldhub_app::ports::{AppointmentRepository, DirectoryRepository, ServiceRecordRepository};
use fieldhub_domain::appointment::{
    AppointmentPatch, AppointmentStatus, ConversionOverrides, NewAppointment,
};
use fieldhub_domain::id::{AppointmentId, ClientId, TechnicianId};
use fieldhub_domain::query::{AppointmentFilter, Page, PageRequest};
use fieldhub_domain::view::{AppointmentView, ServiceRecordView};

use super::parse_id;
use crate::actor::CurrentActor;
use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::state::AppState;

/// Query string accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub client_id: Option<ClientId>,
    pub technician_id: Option<TechnicianId>,
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    fn split(self) -> (AppointmentFilter, PageRequest) {
        let defaults = PageRequest::default();
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        };
        let filter = AppointmentFilter {
            client_id: self.client_id,
            technician_id: self.technician_id,
            status: self.status,
            date_from: self.date_from,
            date_to: self.date_to,
        };
        (filter, page)
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Page<AppointmentView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from endpoints returning a single appointment.
pub enum GetResponse {
    Ok(Json<AppointmentView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<AppointmentView>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the convert endpoint.
pub enum ConvertResponse {
    Created(Json<ServiceRecordView>),
}

impl IntoResponse for ConvertResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/appointments`
pub async fn list<R, A, D>(
    State(state): State<AppState<R, A, D>>,
    CurrentActor(actor): CurrentActor,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let (filter, page) = query.split();
    let found = state
        .appointments
        .list_appointments(&actor, filter, page)
        .await?;
    Ok(ListResponse::Ok(Json(found)))
}

/// `POST /api/appointments`
pub async fn create<R, A, D>(
    State(state): State<AppState<R, A, D>>,
    CurrentActor(actor): CurrentActor,
    JsonBody(input): JsonBody<NewAppointment>,
) -> Result<CreateResponse, ApiError>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let created = state.appointments.create_appointment(&actor, input).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /api/appointments/{id}`
pub async fn get<R, A, D>(
    State(state): State<AppState<R, A, D>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let id: AppointmentId = parse_id(&id)?;
    let appointment = state.appointments.get_appointment(&actor, id).await?;
    Ok(GetResponse::Ok(Json(appointment)))
}

/// `PATCH /api/appointments/{id}`
pub async fn update<R, A, D>(
    State(state): State<AppState<R, A, D>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<AppointmentPatch>,
) -> Result<GetResponse, ApiError>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let id: AppointmentId = parse_id(&id)?;
    let appointment = state
        .appointments
        .update_appointment(&actor, id, patch)
        .await?;
    Ok(GetResponse::Ok(Json(appointment)))
}

/// `DELETE /api/appointments/{id}`
pub async fn delete<R, A, D>(
    State(state): State<AppState<R, A, D>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let id: AppointmentId = parse_id(&id)?;
    state.appointments.delete_appointment(&actor, id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `POST /api/appointments/{id}/convert`
///
/// Answers with the resulting service record. The body is optional.
pub async fn convert<R, A, D>(
    State(state): State<AppState<R, A, D>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: Option<JsonBody<ConversionOverrides>>,
) -> Result<ConvertResponse, ApiError>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let id: AppointmentId = parse_id(&id)?;
    let overrides = body.map(|JsonBody(overrides)| overrides).unwrap_or_default();
    let record = state
        .conversion
        .convert_appointment_to_service_record(&actor, id, overrides)
        .await?;
    Ok(ConvertResponse::Created(Json(record)))
}
