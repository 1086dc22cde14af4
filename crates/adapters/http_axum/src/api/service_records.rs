//! JSON REST handlers for service records.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Deserialize;

use fieldhub_app::ports::{AppointmentRepository, DirectoryRepository, ServiceRecordRepository};
use fieldhub_domain::id::{DeviceId, ServiceRecordId, TechnicianId};
use fieldhub_domain::query::{Page, PageRequest, ServiceRecordFilter};
use fieldhub_domain::service_record::{
    CompleteServiceRecord, NewServiceRecord, ServiceRecordPatch, ServiceRecordStatus, ServiceType,
};
use fieldhub_domain::view::ServiceRecordView;

use super::parse_id;
use crate::actor::CurrentActor;
use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::state::AppState;

/// Query string accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub device_id: Option<DeviceId>,
    pub technician_id: Option<TechnicianId>,
    pub status: Option<ServiceRecordStatus>,
    pub service_type: Option<ServiceType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    fn split(self) -> (ServiceRecordFilter, PageRequest) {
        let defaults = PageRequest::default();
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        };
        let filter = ServiceRecordFilter {
            device_id: self.device_id,
            technician_id: self.technician_id,
            status: self.status,
            service_type: self.service_type,
            date_from: self.date_from,
            date_to: self.date_to,
        };
        (filter, page)
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Page<ServiceRecordView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from endpoints returning a single record.
pub enum GetResponse {
    Ok(Json<ServiceRecordView>),
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
    Created(Json<ServiceRecordView>),
}

impl IntoResponse for CreateResponse {
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

/// `GET /api/service-records`
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
        .service_records
        .list_service_records(&actor, filter, page)
        .await?;
    Ok(ListResponse::Ok(Json(found)))
}

/// `POST /api/service-records`
pub async fn create<R, A, D>(
    State(state): State<AppState<R, A, D>>,
    CurrentActor(actor): CurrentActor,
    JsonBody(input): JsonBody<NewServiceRecord>,
) -> Result<CreateResponse, ApiError>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let created = state
        .service_records
        .create_service_record(&actor, input)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /api/service-records/{id}`
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
    let id: ServiceRecordId = parse_id(&id)?;
    let record = state.service_records.get_service_record(&actor, id).await?;
    Ok(GetResponse::Ok(Json(record)))
}

/// `PATCH /api/service-records/{id}`
pub async fn update<R, A, D>(
    State(state): State<AppState<R, A, D>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ServiceRecordPatch>,
) -> Result<GetResponse, ApiError>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let id: ServiceRecordId = parse_id(&id)?;
    let record = state
        .service_records
        .update_service_record(&actor, id, patch)
        .await?;
    Ok(GetResponse::Ok(Json(record)))
}

/// `POST /api/service-records/{id}/complete`
///
/// The body is optional; without one the end time defaults to now.
pub async fn complete<R, A, D>(
    State(state): State<AppState<R, A, D>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: Option<JsonBody<CompleteServiceRecord>>,
) -> Result<GetResponse, ApiError>
where
    R: ServiceRecordRepository + Send + Sync + 'static,
    A: AppointmentRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let id: ServiceRecordId = parse_id(&id)?;
    let input = body.map(|JsonBody(input)| input).unwrap_or_default();
    let record = state
        .service_records
        .complete_service_record(&actor, id, input)
        .await?;
    Ok(GetResponse::Ok(Json(record)))
}

/// `DELETE /api/service-records/{id}`
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
    let id: ServiceRecordId = parse_id(&id)?;
    state
        .service_records
        .delete_service_record(&actor, id)
        .await?;
    Ok(DeleteResponse::NoContent)
}
