// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use leave_cover::CoreError;
use leave_cover_domain::DomainError;
use leave_cover_persistence::PersistenceError;
use thiserror::Error;
use tracing::error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role does not permit the action.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The actor's role permits the action, but not on this record.
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// Why the actor was refused.
        reason: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor does not have permission.
    #[error("Unauthorized to {action}: {reason}")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the actor was refused.
        reason: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A leave rule was violated.
    #[error("{message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The request conflicts with existing records.
    #[error("{message}")]
    Conflict {
        /// The rule the conflict violates.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A reassignment changed underneath the caller. Reload and retry.
    #[error("Reassignment {reassignment_id} is stale: {message}")]
    StaleAssignment {
        /// The reassignment being resolved.
        reassignment_id: i64,
        /// What changed.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                reason: format!("requires {required_role} role"),
            },
            AuthError::Forbidden { action, reason } => Self::Unauthorized { action, reason },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(what) => Self::ResourceNotFound {
                resource_type: String::from("Record"),
                message: what,
            },
            PersistenceError::Duplicate(message) => Self::Conflict {
                rule: String::from("unique_record"),
                message,
            },
            other => {
                error!(error = %other, "Persistence failure");
                Self::Internal {
                    message: String::from("A storage error occurred"),
                }
            }
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::Validation { reason } => ApiError::DomainRuleViolation {
            rule: String::from("leave_eligibility"),
            message: reason,
        },
        DomainError::OverlappingLeave(_) => ApiError::Conflict {
            rule: String::from("no_overlapping_leave"),
            message: err.to_string(),
        },
        DomainError::CoveringConflict { .. } => ApiError::Conflict {
            rule: String::from("covering_duty"),
            message: err.to_string(),
        },
        DomainError::InvalidTransition { .. } => ApiError::Conflict {
            rule: String::from("leave_lifecycle"),
            message: err.to_string(),
        },
        DomainError::InvalidDateRange { start, end } => ApiError::InvalidInput {
            field: String::from("end_date"),
            message: format!("End date {end} is before start date {start}"),
        },
        DomainError::InvalidDayCount(value) => ApiError::InvalidInput {
            field: String::from("total_days"),
            message: format!("'{value}' is not a multiple of half a day"),
        },
        DomainError::InvalidLeaveType(value) => ApiError::InvalidInput {
            field: String::from("leave_type"),
            message: format!(
                "Unknown leave type '{value}'. Must be ANNUAL, CASUAL, MEDICAL or OFFICIAL"
            ),
        },
        DomainError::InvalidLeaveStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown leave status '{value}'"),
        },
        DomainError::InvalidCoverRequestStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown cover request status '{value}'"),
        },
        DomainError::InvalidReassignmentStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown reassignment status '{value}'. Must be PENDING or ASSIGNED"),
        },
        DomainError::InvalidHalfDayType(value) => ApiError::InvalidInput {
            field: String::from("half_day_type"),
            message: format!(
                "Unknown half-day type '{value}'. Must be FIRST_HALF or SECOND_HALF"
            ),
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// # Arguments
///
/// * `err` - The core error
/// * `action` - The operation that failed, reported on authorization failures
#[must_use]
pub fn translate_core_error(err: CoreError, action: &str) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Forbidden { reason } => ApiError::Unauthorized {
            action: action.to_string(),
            reason,
        },
        CoreError::MissingCoverRequest { leave_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Cover request"),
            message: format!("Leave {leave_id} has no cover request"),
        },
        CoreError::CoverRequestClosed { .. } => ApiError::Conflict {
            rule: String::from("cover_request_open"),
            message: err.to_string(),
        },
        CoreError::StaleAssignment {
            reassignment_id,
            reason,
        } => ApiError::StaleAssignment {
            reassignment_id,
            message: reason,
        },
        CoreError::Audit(audit_err) => {
            error!(error = %audit_err, action, "Audit snapshot failure");
            ApiError::Internal {
                message: String::from("Failed to record the audit trail"),
            }
        }
    }
}
