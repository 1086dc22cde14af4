//! `SQLite` implementation of [`AppointmentRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqlitePool};

use fieldhub_app::ports::AppointmentRepository;
use fieldhub_domain::appointment::Appointment;
use fieldhub_domain::error::{ConflictError, FieldHubError, NotFoundError};
use fieldhub_domain::id::AppointmentId;
use fieldhub_domain::query::{AppointmentFilter, Page, PageRequest};

use crate::codec;
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Appointment`].
struct Wrapper(Appointment);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Appointment> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let client_id: String = row.try_get("client_id")?;
        let technician_id: String = row.try_get("technician_id")?;
        let appointment_date: String = row.try_get("appointment_date")?;
        let start_time: String = row.try_get("start_time")?;
        let appointment_type: String = row.try_get("appointment_type")?;
        let priority: String = row.try_get("priority")?;
        let status: String = row.try_get("status")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(Appointment {
            id: codec::parse(&id)?,
            client_id: codec::parse(&client_id)?,
            technician_id: codec::parse(&technician_id)?,
            device_id: codec::parse_opt(row.try_get("device_id")?)?,
            appointment_date: codec::parse(&appointment_date)?,
            start_time: codec::parse(&start_time)?,
            appointment_type: codec::parse(&appointment_type)?,
            priority: codec::parse(&priority)?,
            estimated_duration: codec::narrow(row.try_get("estimated_duration")?)?,
            description: row.try_get("description")?,
            internal_notes: row.try_get("internal_notes")?,
            client_requirements: row.try_get("client_requirements")?,
            estimated_cost: codec::parse_opt(row.try_get("estimated_cost")?)?,
            status: codec::parse(&status)?,
            cancelled_reason: row.try_get("cancelled_reason")?,
            cancelled_by: codec::parse_opt(row.try_get("cancelled_by")?)?,
            created_by: codec::parse_opt(row.try_get("created_by")?)?,
            version: codec::narrow(row.try_get("version")?)?,
            created_at: codec::timestamp(&created_at)?,
            updated_at: codec::timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO appointments (
        id, client_id, technician_id, device_id, appointment_date, start_time,
        appointment_type, priority, estimated_duration, description, internal_notes,
        client_requirements, estimated_cost, status, cancelled_reason, cancelled_by,
        created_by, version, created_at, updated_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM appointments WHERE id = ?";
const SELECT_VERSION: &str = "SELECT version FROM appointments WHERE id = ?";

const UPDATE: &str = r"
    UPDATE appointments
    SET technician_id = ?, device_id = ?, appointment_date = ?, start_time = ?,
        appointment_type = ?, priority = ?, estimated_duration = ?, description = ?,
        internal_notes = ?, client_requirements = ?, estimated_cost = ?, status = ?,
        cancelled_reason = ?, cancelled_by = ?, version = ?, updated_at = ?
    WHERE id = ? AND version = ?
";

const DELETE_BY_ID: &str = "DELETE FROM appointments WHERE id = ?";

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &AppointmentFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(client_id) = filter.client_id {
        builder.push(" AND client_id = ").push_bind(client_id.to_string());
    }
    if let Some(technician_id) = filter.technician_id {
        builder
            .push(" AND technician_id = ")
            .push_bind(technician_id.to_string());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(from) = filter.date_from {
        builder
            .push(" AND appointment_date >= ")
            .push_bind(from.to_string());
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND appointment_date <= ").push_bind(to.to_string());
    }
}

/// `SQLite`-backed appointment repository.
pub struct SqliteAppointmentRepository {
    pool: SqlitePool,
}

impl SqliteAppointmentRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AppointmentRepository for SqliteAppointmentRepository {
    fn create(
        &self,
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(appointment.id.to_string())
                .bind(appointment.client_id.to_string())
                .bind(appointment.technician_id.to_string())
                .bind(appointment.device_id.map(|id| id.to_string()))
                .bind(appointment.appointment_date.to_string())
                .bind(codec::time_text(appointment.start_time))
                .bind(appointment.appointment_type.as_str())
                .bind(appointment.priority.as_str())
                .bind(i64::from(appointment.estimated_duration))
                .bind(&appointment.description)
                .bind(&appointment.internal_notes)
                .bind(&appointment.client_requirements)
                .bind(appointment.estimated_cost.map(|cost| cost.to_string()))
                .bind(appointment.status.as_str())
                .bind(&appointment.cancelled_reason)
                .bind(appointment.cancelled_by.map(|id| id.to_string()))
                .bind(appointment.created_by.map(|id| id.to_string()))
                .bind(i64::from(appointment.version))
                .bind(appointment.created_at.to_rfc3339())
                .bind(appointment.updated_at.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(appointment)
        }
    }

    fn get_by_id(
        &self,
        id: AppointmentId,
    ) -> impl Future<Output = Result<Option<Appointment>, FieldHubError>> + Send {
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

    fn query(
        &self,
        filter: AppointmentFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Appointment>, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM appointments");
            push_filter(&mut count, &filter);
            let total: i64 = count
                .build_query_scalar()
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM appointments");
            push_filter(&mut select, &filter);
            select
                .push(" ORDER BY appointment_date ASC, start_time ASC LIMIT ")
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
        appointment: Appointment,
    ) -> impl Future<Output = Result<Appointment, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let previous = appointment.version.saturating_sub(1);

            let result = sqlx::query(UPDATE)
                .bind(appointment.technician_id.to_string())
                .bind(appointment.device_id.map(|id| id.to_string()))
                .bind(appointment.appointment_date.to_string())
                .bind(codec::time_text(appointment.start_time))
                .bind(appointment.appointment_type.as_str())
                .bind(appointment.priority.as_str())
                .bind(i64::from(appointment.estimated_duration))
                .bind(&appointment.description)
                .bind(&appointment.internal_notes)
                .bind(&appointment.client_requirements)
                .bind(appointment.estimated_cost.map(|cost| cost.to_string()))
                .bind(appointment.status.as_str())
                .bind(&appointment.cancelled_reason)
                .bind(appointment.cancelled_by.map(|id| id.to_string()))
                .bind(i64::from(appointment.version))
                .bind(appointment.updated_at.to_rfc3339())
                .bind(appointment.id.to_string())
                .bind(i64::from(previous))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                let found: Option<i64> = sqlx::query_scalar(SELECT_VERSION)
                    .bind(appointment.id.to_string())
                    .fetch_optional(&pool)
                    .await
                    .map_err(StorageError::from)?;
                return Err(match found {
                    None => NotFoundError {
                        entity: "Appointment",
                        id: appointment.id.to_string(),
                    }
                    .into(),
                    Some(found) => ConflictError {
                        entity: "Appointment",
                        id: appointment.id.to_string(),
                        expected: previous,
                        found: u32::try_from(found).unwrap_or(u32::MAX),
                    }
                    .into(),
                });
            }

            Ok(appointment)
        }
    }

    fn delete(&self, id: AppointmentId) -> impl Future<Output = Result<(), FieldHubError>> + Send {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use chrono::{NaiveDate, NaiveTime};
    use fieldhub_domain::appointment::{AppointmentStatus, AppointmentType, Priority};
    use fieldhub_domain::id::{ClientId, DeviceId, TechnicianId, UserId};
    use fieldhub_domain::time::now;
    use rust_decimal_macros::dec;

    async fn setup() -> SqliteAppointmentRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteAppointmentRepository::new(db.pool().clone())
    }

    fn test_appointment(day: u32, hour: u32) -> Appointment {
        let ts = now();
        Appointment {
            id: AppointmentId::new(),
            client_id: ClientId::new(),
            technician_id: TechnicianId::new(),
            device_id: Some(DeviceId::new()),
            appointment_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
            appointment_type: AppointmentType::WarrantyClaim,
            priority: Priority::Urgent,
            estimated_duration: 90,
            description: Some("no hot water".to_string()),
            internal_notes: None,
            client_requirements: Some("call before arriving".to_string()),
            estimated_cost: Some(dec!(120.50)),
            status: AppointmentStatus::Scheduled,
            cancelled_reason: None,
            cancelled_by: None,
            created_by: Some(UserId::new()),
            version: 1,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[tokio::test]
    async fn should_preserve_every_field_through_storage() {
        let repo = setup().await;
        let appointment = test_appointment(3, 9);
        repo.create(appointment.clone()).await.unwrap();

        let fetched = repo.get_by_id(appointment.id).await.unwrap().unwrap();
        assert_eq!(fetched.start_time, appointment.start_time);
        assert_eq!(fetched.appointment_type, AppointmentType::WarrantyClaim);
        assert_eq!(fetched.priority, Priority::Urgent);
        assert_eq!(fetched.estimated_cost, Some(dec!(120.50)));
        assert_eq!(fetched.created_by, appointment.created_by);
        assert_eq!(fetched.device_id, appointment.device_id);
    }

    #[tokio::test]
    async fn should_record_cancellation_on_update() {
        let repo = setup().await;
        let mut appointment = test_appointment(3, 9);
        repo.create(appointment.clone()).await.unwrap();

        let dispatcher = UserId::new();
        appointment.status = AppointmentStatus::Cancelled;
        appointment.cancelled_reason = Some("client away".to_string());
        appointment.cancelled_by = Some(dispatcher);
        appointment.version = 2;
        repo.update(appointment.clone()).await.unwrap();

        let fetched = repo.get_by_id(appointment.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, AppointmentStatus::Cancelled);
        assert_eq!(fetched.cancelled_by, Some(dispatcher));
        assert_eq!(fetched.version, 2);
    }

    #[tokio::test]
    async fn should_report_conflict_when_version_is_stale() {
        let repo = setup().await;
        let mut appointment = test_appointment(3, 9);
        repo.create(appointment.clone()).await.unwrap();

        appointment.version = 3;
        let result = repo.update(appointment).await;
        assert!(matches!(
            result,
            Err(FieldHubError::Conflict(ConflictError {
                expected: 2,
                found: 1,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn should_list_by_technician_in_chronological_order() {
        let repo = setup().await;
        let technician_id = TechnicianId::new();
        for (day, hour) in [(4, 14), (3, 9), (4, 8)] {
            let mut appointment = test_appointment(day, hour);
            appointment.technician_id = technician_id;
            repo.create(appointment).await.unwrap();
        }
        repo.create(test_appointment(3, 10)).await.unwrap();

        let page = repo
            .query(
                AppointmentFilter {
                    technician_id: Some(technician_id),
                    ..AppointmentFilter::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        let slots: Vec<(u32, u32)> = page
            .items
            .iter()
            .map(|a| {
                use chrono::{Datelike, Timelike};
                (a.appointment_date.day(), a.start_time.hour())
            })
            .collect();
        assert_eq!(slots, vec![(3, 9), (4, 8), (4, 14)]);
    }

    #[tokio::test]
    async fn should_delete_appointment() {
        let repo = setup().await;
        let appointment = test_appointment(3, 9);
        repo.create(appointment.clone()).await.unwrap();

        repo.delete(appointment.id).await.unwrap();

        assert!(repo.get_by_id(appointment.id).await.unwrap().is_none());
    }
}
