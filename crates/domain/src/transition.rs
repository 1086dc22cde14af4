//! Status transition guard shared by both lifecycles.
//!
//! Each status enum describes its own outgoing edges through [`Lifecycle`];
//! [`guard`] is the single place that decides whether a requested status
//! change may be persisted.

use std::fmt;

use crate::error::InvalidTransitionError;

/// A finite-state lifecycle encoded on its status type.
pub trait Lifecycle: Copy + Eq + fmt::Display + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Statuses reachable in one step from `self`.
    fn allowed_targets(self) -> &'static [Self];

    /// Whether no transition leaves this status.
    fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }

    /// Whether `self -> to` is an edge of the graph.
    fn can_transition_to(self, to: Self) -> bool {
        self.allowed_targets().contains(&to)
    }
}

/// Outcome of a guarded status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S> {
    /// Requested status equals the current one; nothing to do.
    Unchanged(S),
    /// A legal edge of the graph.
    Changed { from: S, to: S },
}

impl<S: Copy> Transition<S> {
    /// The status to persist.
    #[must_use]
    pub fn target(self) -> S {
        match self {
            Self::Unchanged(status) => status,
            Self::Changed { to, .. } => to,
        }
    }
}

/// Check a requested status change against the lifecycle graph.
///
/// # Errors
///
/// Returns [`InvalidTransitionError`] naming both statuses when `to` is not
/// reachable from `from`.
pub fn guard<S: Lifecycle>(from: S, to: S) -> Result<Transition<S>, InvalidTransitionError> {
    if from == to {
        return Ok(Transition::Unchanged(from));
    }
    if from.can_transition_to(to) {
        Ok(Transition::Changed { from, to })
    } else {
        Err(InvalidTransitionError {
            entity: S::ENTITY,
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
