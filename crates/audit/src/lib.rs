// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use time::OffsetDateTime;

/// Errors raised while building or decoding audit records.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A snapshot could not be serialized.
    #[error("Failed to capture state snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    /// An unknown actor role was read back.
    #[error("Invalid actor role: {0}")]
    InvalidRole(String),
}

/// The capacity in which an actor performed an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    /// An employee acting on their own leave or as a cover.
    Employee,
    /// An administrator deciding leaves or resolving reassignments.
    Admin,
    /// The engine itself, e.g. the expiry sweeper.
    System,
}

impl ActorRole {
    /// Converts this role to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Admin => "ADMIN",
            Self::System => "SYSTEM",
        }
    }
}

impl FromStr for ActorRole {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMPLOYEE" => Ok(Self::Employee),
            "ADMIN" => Ok(Self::Admin),
            "SYSTEM" => Ok(Self::System),
            _ => Err(AuditError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the entity performing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting employee. `None` for system actions.
    pub employee_id: Option<i64>,
    /// The capacity the actor acted in.
    pub role: ActorRole,
}

impl Actor {
    /// Creates an actor for an employee acting on their own behalf.
    #[must_use]
    pub const fn employee(employee_id: i64) -> Self {
        Self {
            employee_id: Some(employee_id),
            role: ActorRole::Employee,
        }
    }

    /// Creates an actor for an administrator.
    #[must_use]
    pub const fn admin(employee_id: i64) -> Self {
        Self {
            employee_id: Some(employee_id),
            role: ActorRole::Admin,
        }
    }

    /// Creates the system actor used by automatic transitions.
    #[must_use]
    pub const fn system() -> Self {
        Self {
            employee_id: None,
            role: ActorRole::System,
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.employee_id {
            Some(id) => write!(f, "{}:{id}", self.role),
            None => write!(f, "{}", self.role),
        }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, event ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`ApplyForLeave`", "`ApproveLeave`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A JSON snapshot of the audited record at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// The serialized state. Empty when nothing existed.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a snapshot from already-serialized data.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Creates the snapshot used when no prior state existed.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: String::new(),
        }
    }

    /// Serializes `value` to JSON.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Snapshot` if `value` cannot be serialized.
    pub fn capture<T: Serialize>(value: &T) -> Result<Self, AuditError> {
        Ok(Self {
            data: serde_json::to_string(value)?,
        })
    }

    /// Returns whether this snapshot holds no state.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An immutable audit event representing a state transition of a leave.
///
/// Every successful transition produces exactly one audit event, recording
/// who acted, why, what was done, and the leave before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Database identifier. `None` until persisted.
    pub event_id: Option<i64>,
    /// The leave the event belongs to.
    pub leave_id: i64,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// When the transition happened.
    pub occurred_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates a new, unpersisted `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `leave_id` - The leave the event belongs to
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `occurred_at` - When the change happened
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        leave_id: i64,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        occurred_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            leave_id,
            actor,
            cause,
            action,
            before,
            after,
            occurred_at,
        }
    }

    /// Returns a copy of this event bound to a different leave.
    ///
    /// Used when the leave id is only known after insertion.
    #[must_use]
    pub const fn for_leave(mut self, leave_id: i64) -> Self {
        self.leave_id = leave_id;
        self
    }

    /// Returns a copy of this event carrying its persisted identifier.
    #[must_use]
    pub const fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}
