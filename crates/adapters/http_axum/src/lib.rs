//! # fieldhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for service records and appointments
//!   (`/api/service-records`, `/api/appointments`, conversion and completion)
//! - Resolve the acting user from the `x-user-id` / `x-user-role` headers set
//!   by the upstream gateway
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map domain errors into status codes and a JSON `{ "error": … }` body
//!
//! ## Dependency rule
//! Depends on `fieldhub-app` (for port traits and services) and `fieldhub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod actor;
pub mod api;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;
