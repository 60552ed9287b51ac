// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::overlap::LeaveConflict;
use crate::types::LeaveStatus;
use thiserror::Error;
use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A rule of the eligibility table was violated.
    ///
    /// The reason is user-facing and safe to display as-is.
    #[error("{reason}")]
    Validation {
        /// Why the application was rejected.
        reason: String,
    },
    /// The requested dates overlap an existing non-terminal leave.
    #[error(
        "You already have a {} leave (#{}) from {} to {} with status {}",
        .0.leave_type, .0.leave_id, .0.start_date, .0.end_date, .0.status
    )]
    OverlappingLeave(LeaveConflict),
    /// The applicant is an approved cover for another employee during the
    /// requested dates and the leave type does not permit abandoning it.
    #[error(
        "You are covering approved leave {covered_leave_ids:?} during these dates; \
         only medical leave can be requested"
    )]
    CoveringConflict {
        /// The approved leaves the applicant is covering.
        covered_leave_ids: Vec<i64>,
    },
    /// A leave status transition is not permitted by the state machine.
    #[error("Cannot move leave from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: LeaveStatus,
        /// The requested status.
        to: LeaveStatus,
    },
    /// The start date falls after the end date.
    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange {
        /// The requested start date.
        start: Date,
        /// The requested end date.
        end: Date,
    },
    /// A day count is not a non-negative multiple of 0.5.
    #[error("Invalid day count: {0}")]
    InvalidDayCount(String),
    /// Unknown leave type.
    #[error("Invalid leave type: {0}")]
    InvalidLeaveType(String),
    /// Unknown leave status.
    #[error("Invalid leave status: {0}")]
    InvalidLeaveStatus(String),
    /// Unknown cover request status.
    #[error("Invalid cover request status: {0}")]
    InvalidCoverRequestStatus(String),
    /// Unknown reassignment status.
    #[error("Invalid reassignment status: {0}")]
    InvalidReassignmentStatus(String),
    /// Unknown half-day type.
    #[error("Invalid half-day type: {0}")]
    InvalidHalfDayType(String),
    /// Date arithmetic overflow.
    #[error("Date arithmetic overflow while {operation}")]
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse a date from a string.
    #[error("Failed to parse date '{date_string}': {error}")]
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl DomainError {
    /// Builds a validation error from a user-facing reason.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}
