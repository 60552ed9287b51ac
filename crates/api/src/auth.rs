// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity and role-based authorization.

use leave_cover_audit::Actor;

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// The caller's identity is established upstream; the role only decides
/// which operations the caller may attempt. Ownership rules (only the cover
/// employee may answer a cover request, only the applicant may cancel) are
/// enforced by the state machine on top of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Administrators decide leaves, resolve reassignments and maintain
    /// employees and holidays.
    Admin,
    /// Regular employees apply for leave, answer cover requests and read
    /// their own records.
    Employee,
}

impl Role {
    /// Returns the display name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Employee => "Employee",
        }
    }
}

/// An authenticated caller with an associated role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's employee ID.
    pub employee_id: i64,
    /// The role the caller acts under.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `employee_id` - The caller's employee ID
    /// * `role` - The role the caller acts under
    #[must_use]
    pub const fn new(employee_id: i64, role: Role) -> Self {
        Self { employee_id, role }
    }

    /// Converts this actor into the audit actor recorded on events.
    #[must_use]
    pub const fn to_audit_actor(&self) -> Actor {
        match self.role {
            Role::Admin => Actor::admin(self.employee_id),
            Role::Employee => Actor::employee(self.employee_id),
        }
    }

    /// Returns whether the caller acts as an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Employee => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from(Role::Admin.as_str()),
            }),
        }
    }

    /// Checks that the caller is applying for their own leave.
    ///
    /// Admins apply for leave like everyone else; nobody applies on
    /// someone else's behalf.
    ///
    /// # Errors
    ///
    /// Returns an error if `employee_id` is not the caller.
    pub fn authorize_apply_for_leave(
        actor: &AuthenticatedActor,
        employee_id: i64,
    ) -> Result<(), AuthError> {
        if actor.employee_id == employee_id {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                action: String::from("apply_for_leave"),
                reason: String::from("Employees can only apply for their own leave"),
            })
        }
    }

    /// Checks if an actor may approve or decline leave.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_decide_leave(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "decide_leave")
    }

    /// Checks if an actor may trigger an explicit expiry sweep.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_sweep(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "sweep_expired_cover_requests")
    }

    /// Checks if an actor may list or resolve cover reassignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_reassignments(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_reassignments")
    }

    /// Checks if an actor may register employees or record holidays.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_employees(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_employees")
    }

    /// Checks if an actor may read records owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin or the owner.
    pub fn authorize_view_records(
        actor: &AuthenticatedActor,
        owner_id: i64,
    ) -> Result<(), AuthError> {
        if actor.is_admin() || actor.employee_id == owner_id {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                action: String::from("view_records"),
                reason: format!("Records of employee {owner_id} are not visible to you"),
            })
        }
    }
}

/// Stub authentication for callers whose identity is established upstream.
///
/// # Arguments
///
/// * `employee_id` - The caller's employee ID
/// * `role` - The role the caller acts under
///
/// # Errors
///
/// Returns an error if the employee ID is not positive.
pub fn authenticate_stub(employee_id: i64, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if employee_id <= 0 {
        return Err(AuthError::AuthenticationFailed {
            reason: format!("Invalid employee ID: {employee_id}"),
        });
    }
    Ok(AuthenticatedActor::new(employee_id, role))
}

/// Parses a role name such as `"admin"` or `"employee"`.
///
/// # Errors
///
/// Returns an error if the name is not a known role.
pub fn parse_role(value: &str) -> Result<Role, AuthError> {
    match value.to_ascii_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "employee" => Ok(Role::Employee),
        _ => Err(AuthError::AuthenticationFailed {
            reason: format!("Invalid role: '{value}'. Must be 'admin' or 'employee'"),
        }),
    }
}
