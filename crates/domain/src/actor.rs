//! The acting user and the capabilities of each role.
//!
//! Identity is established upstream; the engine only records who acted and
//! asks [`Role::can`] before each operation.

use serde::{Deserialize, Serialize};

use crate::error::ForbiddenError;
use crate::id::UserId;

define_label! {
    /// Role of an authenticated user.
    Role for "role" {
        Admin => "admin",
        Manager => "manager",
        Dispatcher => "dispatcher",
        Technician => "technician",
    }
}

define_label! {
    /// Area of the system an operation belongs to.
    Module for "module" {
        ServiceRecords => "service_records",
        Appointments => "appointments",
    }
}

define_label! {
    /// What an operation does to its module.
    Action for "action" {
        Read => "read",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Complete => "complete",
        Convert => "convert",
    }
}

impl Role {
    /// Whether the role may perform `action` on `module`.
    #[must_use]
    pub fn can(self, module: Module, action: Action) -> bool {
        match (self, module, action) {
            (Self::Admin | Self::Manager, _, _)
            | (_, _, Action::Read)
            | (Self::Dispatcher, Module::Appointments, _) => true,
            (Self::Dispatcher, Module::ServiceRecords, action) => {
                !matches!(action, Action::Delete | Action::Complete)
            }
            (Self::Technician, Module::ServiceRecords, action) => {
                matches!(action, Action::Create | Action::Update | Action::Complete)
            }
            (Self::Technician, Module::Appointments, action) => {
                matches!(action, Action::Update | Action::Convert)
            }
        }
    }
}

/// Authenticated user performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Fail unless the actor's role grants `action` on `module`.
    ///
    /// # Errors
    ///
    /// Returns [`ForbiddenError`] when the capability is missing.
    pub fn require(&self, module: Module, action: Action) -> Result<(), ForbiddenError> {
        if self.role.can(module, action) {
            return Ok(());
        }
        Err(ForbiddenError {
            role: self.role.to_string(),
            module: module.to_string(),
            action: action.to_string(),
        })
    }
}
