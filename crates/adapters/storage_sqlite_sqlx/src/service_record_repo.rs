//! `SQLite` implementation of [`ServiceRecordRepository`].

use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqlitePool};

use fieldhub_app::ports::ServiceRecordRepository;
use fieldhub_domain::error::{ConflictError, FieldHubError, NotFoundError};
use fieldhub_domain::id::{AppointmentId, ServiceRecordId};
use fieldhub_domain::query::{Page, PageRequest, ServiceRecordFilter};
use fieldhub_domain::service_record::{Part, ServiceRecord};

use crate::codec::{self, decode_error};
use crate::error::StorageError;

/// Stored shape of a part: the cost stays decimal text so it round-trips exactly.
#[derive(Serialize, Deserialize)]
struct PartRow {
    name: String,
    cost: String,
    quantity: u32,
}

fn encode_parts(parts: &[Part]) -> Result<String, serde_json::Error> {
    let rows: Vec<PartRow> = parts
        .iter()
        .map(|part| PartRow {
            name: part.name.clone(),
            cost: part.cost.to_string(),
            quantity: part.quantity,
        })
        .collect();
    serde_json::to_string(&rows)
}

fn decode_parts(json: &str) -> Result<Vec<Part>, sqlx::Error> {
    let rows: Vec<PartRow> = serde_json::from_str(json).map_err(decode_error)?;
    rows.into_iter()
        .map(|row| {
            Ok(Part {
                cost: codec::parse::<Decimal>(&row.cost)?,
                name: row.name,
                quantity: row.quantity,
            })
        })
        .collect()
}

/// Wrapper for converting database rows into domain [`ServiceRecord`].
struct Wrapper(ServiceRecord);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ServiceRecord> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let device_id: String = row.try_get("device_id")?;
        let service_type: String = row.try_get("service_type")?;
        let service_date: String = row.try_get("service_date")?;
        let parts_used: String = row.try_get("parts_used")?;
        let total_cost: String = row.try_get("total_cost")?;
        let photos: String = row.try_get("photos")?;
        let status: String = row.try_get("status")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(ServiceRecord {
            id: codec::parse(&id)?,
            device_id: codec::parse(&device_id)?,
            technician_id: codec::parse_opt(row.try_get("technician_id")?)?,
            appointment_id: codec::parse_opt(row.try_get("appointment_id")?)?,
            service_type: codec::parse(&service_type)?,
            service_date: codec::parse(&service_date)?,
            start_time: codec::parse_opt(row.try_get("start_time")?)?,
            end_time: codec::parse_opt(row.try_get("end_time")?)?,
            description: row.try_get("description")?,
            parts_used: decode_parts(&parts_used)?,
            labor_hours: codec::parse_opt(row.try_get("labor_hours")?)?,
            total_cost: codec::parse(&total_cost)?,
            client_signature: row.try_get("client_signature")?,
            photos: serde_json::from_str(&photos).map_err(decode_error)?,
            condition_before: codec::narrow_opt(row.try_get("condition_before")?)?,
            condition_after: codec::narrow_opt(row.try_get("condition_after")?)?,
            recommendations: row.try_get("recommendations")?,
            status: codec::parse(&status)?,
            warranty_work: row.try_get("warranty_work")?,
            follow_up_required: row.try_get("follow_up_required")?,
            follow_up_date: codec::parse_opt(row.try_get("follow_up_date")?)?,
            created_by: codec::parse_opt(row.try_get("created_by")?)?,
            version: codec::narrow(row.try_get("version")?)?,
            created_at: codec::timestamp(&created_at)?,
            updated_at: codec::timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO service_records (
        id, device_id, technician_id, appointment_id, service_type, service_date,
        start_time, end_time, description, parts_used, labor_hours, total_cost,
        client_signature, photos, condition_before, condition_after, recommendations,
        status, warranty_work, follow_up_required, follow_up_date, created_by,
        version, created_at, updated_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM service_records WHERE id = ?";
const SELECT_BY_APPOINTMENT: &str = "SELECT * FROM service_records WHERE appointment_id = ?";
const SELECT_VERSION: &str = "SELECT version FROM service_records WHERE id = ?";

const UPDATE: &str = r"
    UPDATE service_records
    SET technician_id = ?, service_type = ?, service_date = ?, start_time = ?, end_time = ?,
        description = ?, parts_used = ?, labor_hours = ?, total_cost = ?,
        client_signature = ?, photos = ?, condition_before = ?, condition_after = ?,
        recommendations = ?, status = ?, warranty_work = ?, follow_up_required = ?,
        follow_up_date = ?, version = ?, updated_at = ?
    WHERE id = ? AND version = ?
";

const DELETE_BY_ID: &str = "DELETE FROM service_records WHERE id = ?";

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ServiceRecordFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(device_id) = filter.device_id {
        builder.push(" AND device_id = ").push_bind(device_id.to_string());
    }
    if let Some(technician_id) = filter.technician_id {
        builder
            .push(" AND technician_id = ")
            .push_bind(technician_id.to_string());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(service_type) = filter.service_type {
        builder
            .push(" AND service_type = ")
            .push_bind(service_type.as_str());
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND service_date >= ").push_bind(from.to_string());
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND service_date <= ").push_bind(to.to_string());
    }
}

/// `SQLite`-backed service record repository.
pub struct SqliteServiceRecordRepository {
    pool: SqlitePool,
}

impl SqliteServiceRecordRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ServiceRecordRepository for SqliteServiceRecordRepository {
    fn create(
        &self,
        record: ServiceRecord,
    ) -> impl Future<Output = Result<ServiceRecord, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let parts_used = encode_parts(&record.parts_used).map_err(StorageError::from)?;
            let photos = serde_json::to_string(&record.photos).map_err(StorageError::from)?;

            sqlx::query(INSERT)
                .bind(record.id.to_string())
                .bind(record.device_id.to_string())
                .bind(record.technician_id.map(|id| id.to_string()))
                .bind(record.appointment_id.map(|id| id.to_string()))
                .bind(record.service_type.as_str())
                .bind(record.service_date.to_string())
                .bind(record.start_time.map(codec::time_text))
                .bind(record.end_time.map(codec::time_text))
                .bind(&record.description)
                .bind(parts_used)
                .bind(record.labor_hours.map(|hours| hours.to_string()))
                .bind(record.total_cost.to_string())
                .bind(record.client_signature)
                .bind(photos)
                .bind(record.condition_before.map(i64::from))
                .bind(record.condition_after.map(i64::from))
                .bind(&record.recommendations)
                .bind(record.status.as_str())
                .bind(record.warranty_work)
                .bind(record.follow_up_required)
                .bind(record.follow_up_date.map(|date| date.to_string()))
                .bind(record.created_by.map(|id| id.to_string()))
                .bind(i64::from(record.version))
                .bind(record.created_at.to_rfc3339())
                .bind(record.updated_at.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(record)
        }
    }

    fn get_by_id(
        &self,
        id: ServiceRecordId,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_APPOINTMENT)
                .bind(appointment_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn query(
        &self,
        filter: ServiceRecordFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<ServiceRecord>, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM service_records");
            push_filter(&mut count, &filter);
            let total: i64 = count
                .build_query_scalar()
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM service_records");
            push_filter(&mut select, &filter);
            select
                .push(" ORDER BY service_date DESC, created_at DESC LIMIT ")
                .push_bind(i64::from(page.limit()))
                .push(" OFFSET ")
                .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
            let rows: Vec<Wrapper> = select
                .build_query_as()
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Page::new(
                rows.into_iter().map(|w| w.0).collect(),
                u64::try_from(total).unwrap_or(0),
                page,
            ))
        }
    }

    fn update(
        &self,
        record: ServiceRecord,
    ) -> impl Future<Output = Result<ServiceRecord, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let parts_used = encode_parts(&record.parts_used).map_err(StorageError::from)?;
            let photos = serde_json::to_string(&record.photos).map_err(StorageError::from)?;
            let previous = record.version.saturating_sub(1);

            let result = sqlx::query(UPDATE)
                .bind(record.technician_id.map(|id| id.to_string()))
                .bind(record.service_type.as_str())
                .bind(record.service_date.to_string())
                .bind(record.start_time.map(codec::time_text))
                .bind(record.end_time.map(codec::time_text))
                .bind(&record.description)
                .bind(parts_used)
                .bind(record.labor_hours.map(|hours| hours.to_string()))
                .bind(record.total_cost.to_string())
                .bind(record.client_signature)
                .bind(photos)
                .bind(record.condition_before.map(i64::from))
                .bind(record.condition_after.map(i64::from))
                .bind(&record.recommendations)
                .bind(record.status.as_str())
                .bind(record.warranty_work)
                .bind(record.follow_up_required)
                .bind(record.follow_up_date.map(|date| date.to_string()))
                .bind(i64::from(record.version))
                .bind(record.updated_at.to_rfc3339())
                .bind(record.id.to_string())
                .bind(i64::from(previous))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                let found: Option<i64> = sqlx::query_scalar(SELECT_VERSION)
                    .bind(record.id.to_string())
                    .fetch_optional(&pool)
                    .await
                    .map_err(StorageError::from)?;
                return Err(match found {
                    None => NotFoundError {
                        entity: "ServiceRecord",
                        id: record.id.to_string(),
                    }
                    .into(),
                    Some(found) => ConflictError {
                        entity: "ServiceRecord",
                        id: record.id.to_string(),
                        expected: previous,
                        found: u32::try_from(found).unwrap_or(u32::MAX),
                    }
                    .into(),
                });
            }

            Ok(record)
        }
    }

    fn delete(
        &self,
        id: ServiceRecordId,
    ) -> impl Future<Output = Result<(), FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
