//! `SQLite` implementation of [`DirectoryRepository`].
//!
//! The lifecycle engine only reads these tables. The `insert_*` methods exist
//! for provisioning and tests.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use fieldhub_app::ports::DirectoryRepository;
use fieldhub_domain::directory::{Client, Device, Technician};
use fieldhub_domain::error::FieldHubError;
use fieldhub_domain::id::{ClientId, DeviceId, TechnicianId};

use crate::codec;
use crate::error::StorageError;

struct ClientRow(Client);
struct DeviceRow(Device);
struct TechnicianRow(Technician);

impl<'r> FromRow<'r, SqliteRow> for ClientRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(Self(Client {
            id: codec::parse(&id)?,
            company_name: row.try_get("company_name")?,
            contact_person: row.try_get("contact_person")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for DeviceRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let client_id: String = row.try_get("client_id")?;
        Ok(Self(Device {
            id: codec::parse(&id)?,
            client_id: codec::parse(&client_id)?,
            brand: row.try_get("brand")?,
            model: row.try_get("model")?,
            device_type: row.try_get("device_type")?,
            serial_number: row.try_get("serial_number")?,
            last_service_date: codec::parse_opt(row.try_get("last_service_date")?)?,
            next_service_date: codec::parse_opt(row.try_get("next_service_date")?)?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for TechnicianRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        Ok(Self(Technician {
            id: codec::parse(&id)?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            phone: row.try_get("phone")?,
        }))
    }
}

const SELECT_CLIENT: &str = "SELECT * FROM clients WHERE id = ?";
const SELECT_DEVICE: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_TECHNICIAN: &str = "SELECT * FROM technicians WHERE id = ?";

const INSERT_CLIENT: &str =
    "INSERT INTO clients (id, company_name, contact_person, phone, email) VALUES (?, ?, ?, ?, ?)";
const INSERT_DEVICE: &str = r"
    INSERT INTO devices (
        id, client_id, brand, model, device_type, serial_number,
        last_service_date, next_service_date
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const INSERT_TECHNICIAN: &str =
    "INSERT INTO technicians (id, first_name, last_name, phone) VALUES (?, ?, ?, ?)";

/// `SQLite`-backed directory lookups.
pub struct SqliteDirectoryRepository {
    pool: SqlitePool,
}

impl SqliteDirectoryRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a client.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the insert fails.
    pub async fn insert_client(&self, client: &Client) -> Result<(), StorageError> {
        sqlx::query(INSERT_CLIENT)
            .bind(client.id.to_string())
            .bind(&client.company_name)
            .bind(&client.contact_person)
            .bind(&client.phone)
            .bind(&client.email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Store a device.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the insert fails.
    pub async fn insert_device(&self, device: &Device) -> Result<(), StorageError> {
        sqlx::query(INSERT_DEVICE)
            .bind(device.id.to_string())
            .bind(device.client_id.to_string())
            .bind(&device.brand)
            .bind(&device.model)
            .bind(&device.device_type)
            .bind(&device.serial_number)
            .bind(device.last_service_date.map(|date| date.to_string()))
            .bind(device.next_service_date.map(|date| date.to_string()))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Store a technician.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the insert fails.
    pub async fn insert_technician(&self, technician: &Technician) -> Result<(), StorageError> {
        sqlx::query(INSERT_TECHNICIAN)
            .bind(technician.id.to_string())
            .bind(&technician.first_name)
            .bind(&technician.last_name)
            .bind(&technician.phone)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

impl DirectoryRepository for SqliteDirectoryRepository {
    fn get_client(
        &self,
        id: ClientId,
    ) -> impl Future<Output = Result<Option<Client>, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<ClientRow> = sqlx::query_as(SELECT_CLIENT)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn get_device(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<DeviceRow> = sqlx::query_as(SELECT_DEVICE)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn get_technician(
        &self,
        id: TechnicianId,
    ) -> impl Future<Output = Result<Option<Technician>, FieldHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<TechnicianRow> = sqlx::query_as(SELECT_TECHNICIAN)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }
}
