//! # fieldhub-domain
//!
//! Pure domain model for the fieldhub field-service system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Service records** (work performed on a client's device)
//! - Define **Appointments** (promised future visits)
//! - Define the **directory** records the engine reads (clients, devices, technicians)
//! - Encode both status lifecycles and the guard that enforces them
//! - Validation rules, cost/time derivation and the enriched read model
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

#[macro_use]
mod label;

pub mod error;
pub mod id;
pub mod time;

pub mod actor;
pub mod appointment;
pub mod calculator;
pub mod directory;
pub mod query;
pub mod rules;
pub mod service_record;
pub mod transition;
pub mod validation;
pub mod view;
