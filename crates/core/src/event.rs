// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain events emitted by committed transitions.
//!
//! Events carry everything a notifier needs to address and word a message.
//! They are produced inside the transaction but must only be dispatched
//! after it commits.

use leave_cover_domain::{HalfDays, Leave, LeaveType};
use serde::{Deserialize, Serialize};
use time::Date;

/// The identifying facts of a leave, as used in notification text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSummary {
    /// The leave.
    pub leave_id: i64,
    /// Its owner.
    pub employee_id: i64,
    /// Its type.
    pub leave_type: LeaveType,
    /// First day.
    pub start_date: Date,
    /// Last day.
    pub end_date: Date,
    /// Working days requested.
    pub total_days: HalfDays,
}

impl From<&Leave> for LeaveSummary {
    fn from(leave: &Leave) -> Self {
        Self {
            leave_id: leave.leave_id,
            employee_id: leave.employee_id,
            leave_type: leave.leave_type,
            start_date: leave.start_date,
            end_date: leave.end_date,
            total_days: leave.total_days,
        }
    }
}

/// Something that happened to a leave which other people need to hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveEvent {
    /// A cover employee has been asked to cover a new leave.
    CoverRequested {
        /// The leave needing cover.
        leave: LeaveSummary,
        /// Who was asked.
        cover_employee_id: i64,
    },
    /// A leave entered admin review.
    AdminReviewRequested {
        /// The leave awaiting review.
        leave: LeaveSummary,
    },
    /// A new leave exceeds the applicant's balance.
    NoPayFlagged {
        /// The no-pay leave.
        leave: LeaveSummary,
    },
    /// The cover employee accepted.
    CoverAccepted {
        /// The covered leave.
        leave: LeaveSummary,
        /// Who accepted.
        cover_employee_id: i64,
    },
    /// The cover employee declined.
    CoverDeclined {
        /// The leave.
        leave: LeaveSummary,
        /// Who declined.
        cover_employee_id: i64,
        /// The reason they gave.
        reason: String,
    },
    /// The cover request went unanswered past its TTL.
    CoverExpired {
        /// The leave.
        leave: LeaveSummary,
        /// Who never answered.
        cover_employee_id: i64,
    },
    /// An admin approved the leave.
    LeaveApproved {
        /// The leave.
        leave: LeaveSummary,
        /// The cover employee, if any.
        cover_employee_id: Option<i64>,
        /// The admin's message.
        response: Option<String>,
    },
    /// An admin declined the leave.
    LeaveDeclined {
        /// The leave.
        leave: LeaveSummary,
        /// The cover employee, if one was assigned.
        cover_employee_id: Option<i64>,
        /// The admin's message.
        response: Option<String>,
    },
    /// The applicant withdrew the leave.
    LeaveCancelled {
        /// The leave.
        leave: LeaveSummary,
        /// The cover employee whose pending request was closed, if any.
        released_cover_employee_id: Option<i64>,
    },
    /// A cover employee applied for leave while covering an approved leave.
    CoveringConflictDetected {
        /// The reassignment created for the conflict.
        reassignment_id: i64,
        /// The approved leave that now needs a new cover.
        covered_leave: LeaveSummary,
        /// The cover employee's own new leave.
        cover_employee_leave: LeaveSummary,
    },
    /// An admin assigned a substitute cover.
    CoverReassigned {
        /// The reassignment that was resolved.
        reassignment_id: i64,
        /// The leave that received a new cover.
        covered_leave: LeaveSummary,
        /// The employee who could no longer cover.
        previous_cover_employee_id: i64,
        /// The substitute.
        new_cover_employee_id: i64,
    },
}

impl LeaveEvent {
    /// Returns the leave the event is primarily about.
    #[must_use]
    pub const fn leave(&self) -> &LeaveSummary {
        match self {
            Self::CoverRequested { leave, .. }
            | Self::AdminReviewRequested { leave }
            | Self::NoPayFlagged { leave }
            | Self::CoverAccepted { leave, .. }
            | Self::CoverDeclined { leave, .. }
            | Self::CoverExpired { leave, .. }
            | Self::LeaveApproved { leave, .. }
            | Self::LeaveDeclined { leave, .. }
            | Self::LeaveCancelled { leave, .. } => leave,
            Self::CoveringConflictDetected { covered_leave, .. }
            | Self::CoverReassigned { covered_leave, .. } => covered_leave,
        }
    }

    /// Returns a short machine-readable name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CoverRequested { .. } => "cover_requested",
            Self::AdminReviewRequested { .. } => "admin_review_requested",
            Self::NoPayFlagged { .. } => "no_pay_flagged",
            Self::CoverAccepted { .. } => "cover_accepted",
            Self::CoverDeclined { .. } => "cover_declined",
            Self::CoverExpired { .. } => "cover_expired",
            Self::LeaveApproved { .. } => "leave_approved",
            Self::LeaveDeclined { .. } => "leave_declined",
            Self::LeaveCancelled { .. } => "leave_cancelled",
            Self::CoveringConflictDetected { .. } => "covering_conflict_detected",
            Self::CoverReassigned { .. } => "cover_reassigned",
        }
    }
}
