//! # fieldhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ServiceRecordRepository` — conditional CRUD and listing for service records
//!   - `AppointmentRepository` — conditional CRUD and listing for appointments
//!   - `DirectoryRepository` — client, device and technician lookups
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ServiceRecordService` — create, read, list, update, complete, delete
//!   - `AppointmentService` — create, read, list, update, delete
//!   - `ConversionService` — turn an appointment into a service record
//! - Run every write through validation, the status guard and cost derivation
//!   before it reaches storage
//!
//! ## Dependency rule
//! Depends on `fieldhub-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
