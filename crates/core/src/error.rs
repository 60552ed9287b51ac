// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leave_cover_audit::AuditError;
use leave_cover_domain::{CoverRequestStatus, DomainError};
use thiserror::Error;

/// Errors that can occur during state transitions.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// The actor is not allowed to perform this transition.
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// Why the actor was refused.
        reason: String,
    },
    /// The leave has no cover request to act on.
    #[error("Leave {leave_id} has no cover request")]
    MissingCoverRequest {
        /// The leave that was acted on.
        leave_id: i64,
    },
    /// The cover request was already answered or closed.
    #[error("The cover request for leave {leave_id} is no longer pending (status {status})")]
    CoverRequestClosed {
        /// The leave that owns the request.
        leave_id: i64,
        /// The request's current status.
        status: CoverRequestStatus,
    },
    /// A reassignment could not be applied because its preconditions no
    /// longer hold. The caller may reload and retry.
    #[error("Reassignment {reassignment_id} is stale: {reason}")]
    StaleAssignment {
        /// The reassignment being resolved.
        reassignment_id: i64,
        /// What changed underneath the caller.
        reason: String,
    },
    /// An audit snapshot could not be captured.
    #[error("Audit failure: {0}")]
    Audit(#[from] AuditError),
}

impl CoreError {
    /// Builds a `Forbidden` error.
    #[must_use]
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Builds a `StaleAssignment` error.
    #[must_use]
    pub fn stale(reassignment_id: i64, reason: impl Into<String>) -> Self {
        Self::StaleAssignment {
            reassignment_id,
            reason: reason.into(),
        }
    }
}
