//! # fieldhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `fieldhub-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Enforce optimistic concurrency with version-conditional updates
//!
//! ## Dependency rule
//! Depends on `fieldhub-app` (for port traits) and `fieldhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod appointment_repo;
mod codec;
mod directory_repo;
mod error;
mod pool;
mod service_record_repo;

pub use appointment_repo::SqliteAppointmentRepository;
pub use directory_repo::SqliteDirectoryRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use service_record_repo::SqliteServiceRecordRepository;
