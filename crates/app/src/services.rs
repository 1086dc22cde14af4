//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! Every operation takes the acting [`Actor`](fieldhub_domain::actor::Actor)
//! and checks its capability before touching storage.

pub mod appointment_service;
pub mod conversion_service;
pub mod service_record_service;

mod enrich;
