//! Common error types used across the workspace.
//!
//! Each failure family is its own typed error and converts into
//! [`FieldHubError`] via `#[from]`, so callers can match on the variant
//! to decide how to surface it (client error, not found, server error).

use chrono::{NaiveDate, NaiveTime};

/// Top-level error returned by every domain and application operation.
#[derive(Debug, thiserror::Error)]
pub enum FieldHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("invalid status transition")]
    InvalidTransition(#[from] InvalidTransitionError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("cannot delete")]
    CannotDelete(#[from] CannotDeleteError),

    #[error("version conflict")]
    Conflict(#[from] ConflictError),

    #[error("forbidden")]
    Forbidden(#[from] ForbiddenError),

    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Malformed, missing, or out-of-range input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must not be negative")]
    NegativeValue { field: &'static str },

    #[error("{field} must be between 1 and 5, got {value}")]
    ConditionOutOfRange { field: &'static str, value: u8 },

    #[error("part quantity must be at least 1 (part {name:?})")]
    ZeroQuantity { name: String },

    #[error("estimated duration must be at least {min} minutes, got {minutes}")]
    DurationTooShort { minutes: u32, min: u32 },

    #[error("start time {start} must be before end time {end}")]
    StartNotBeforeEnd { start: NaiveTime, end: NaiveTime },

    #[error("follow-up date is required when a follow-up is required")]
    FollowUpDateMissing,

    #[error("follow-up date {follow_up} must be after service date {service_date}")]
    FollowUpNotAfterService {
        follow_up: NaiveDate,
        service_date: NaiveDate,
    },

    #[error("follow-up date {date} is in the past (today is {today})")]
    FollowUpInPast { date: NaiveDate, today: NaiveDate },

    #[error("service date {date} is more than a year ahead (limit {limit})")]
    ServiceDateTooFarAhead { date: NaiveDate, limit: NaiveDate },

    #[error("appointment date {date} is in the past (today is {today})")]
    AppointmentInPast { date: NaiveDate, today: NaiveDate },

    #[error("start time {start} is outside business hours {open}:00-{close}:00")]
    OutsideBusinessHours { start: NaiveTime, open: u32, close: u32 },

    #[error("cost exceeds the representable range")]
    CostOverflow,

    #[error("a cancellation reason is required")]
    CancelReasonMissing,

    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },
}

/// A status change that the lifecycle graph does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} cannot move from {from} to {to}")]
pub struct InvalidTransitionError {
    pub entity: &'static str,
    pub from: String,
    pub to: String,
}

/// The requested record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A business rule blocks deletion of the record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} cannot be deleted: {reason}")]
pub struct CannotDeleteError {
    pub entity: &'static str,
    pub id: String,
    pub reason: String,
}

/// The stored version no longer matches the one the caller read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} was modified concurrently (expected version {expected}, found {found})")]
pub struct ConflictError {
    pub entity: &'static str,
    pub id: String,
    pub expected: u32,
    pub found: u32,
}

/// The acting user lacks the capability for the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role {role} may not {action} {module}")]
pub struct ForbiddenError {
    pub role: String,
    pub module: String,
    pub action: String,
}
