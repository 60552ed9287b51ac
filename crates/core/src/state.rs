// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::event::{LeaveEvent, LeaveSummary};
use leave_cover_audit::AuditEvent;
use leave_cover_domain::{
    CoverDutyReassignment, CoverRequest, Employee, HalfDayType, HalfDays, Leave, LeaveBalance,
    LeaveStatus, LeaveType, PublicHoliday,
};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

/// How long a cover employee has to answer a cover request.
pub const COVER_REQUEST_TTL: Duration = Duration::hours(24);

/// The cover response recorded when a request expires unanswered.
pub const EXPIRED_COVER_RESPONSE: &str = "Cover request expired without a response";

/// Everything the application pipeline needs, loaded inside the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationContext {
    /// The applicant.
    pub applicant: Employee,
    /// The nominated cover employee, if one was named and exists.
    pub cover_employee: Option<Employee>,
    /// Public holidays within the requested range.
    pub holidays: Vec<PublicHoliday>,
    /// The applicant's active leaves.
    pub applicant_leaves: Vec<Leave>,
    /// Approved leaves the applicant is covering.
    pub covering_assignments: Vec<Leave>,
    /// The nominated cover employee's active leaves.
    pub cover_employee_leaves: Vec<Leave>,
    /// The applicant's stored balance row, if any.
    pub stored_balance: Option<LeaveBalance>,
    /// The caller's current date.
    pub today: Date,
}

/// A leave ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeave {
    /// The applicant.
    pub employee_id: i64,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day.
    pub start_date: Date,
    /// Last day (inclusive).
    pub end_date: Date,
    /// Working days requested.
    pub total_days: HalfDays,
    /// Free-text reason.
    pub reason: String,
    /// The cover employee. `None` only for official leave.
    pub cover_employee_id: Option<i64>,
    /// Medical certificate reference.
    pub medical_cert_path: Option<String>,
    /// Initial status.
    pub status: LeaveStatus,
    /// Whether the leave exceeds the balance.
    pub is_no_pay: bool,
    /// Set for half-day leaves.
    pub half_day_type: Option<HalfDayType>,
    /// Creation time.
    pub created_at: OffsetDateTime,
}

/// A cover request ready to be inserted alongside its leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCoverRequest {
    /// Who is asked to cover.
    pub cover_employee_id: i64,
    /// Creation time.
    pub created_at: OffsetDateTime,
    /// Always `created_at + COVER_REQUEST_TTL`.
    pub expires_at: OffsetDateTime,
}

impl NewCoverRequest {
    /// Creates a request that expires exactly one TTL after `created_at`.
    #[must_use]
    pub fn new(cover_employee_id: i64, created_at: OffsetDateTime) -> Self {
        Self {
            cover_employee_id,
            created_at,
            expires_at: created_at + COVER_REQUEST_TTL,
        }
    }
}

/// A reassignment ready to be inserted once the new leave has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReassignment {
    /// The approved leave that needs a new cover.
    pub covered_leave: LeaveSummary,
    /// The applicant, who can no longer cover it.
    pub original_cover_employee_id: i64,
    /// Creation time.
    pub created_at: OffsetDateTime,
}

/// The outcome of a successful application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationResult {
    /// The leave to insert.
    pub new_leave: NewLeave,
    /// The cover request to insert, for leave types that need cover.
    pub cover_request: Option<NewCoverRequest>,
    /// The balance row to write, when it was created or reset.
    pub balance_write: Option<LeaveBalance>,
    /// Reassignments to open, one per conflicting covering assignment.
    pub reassignments: Vec<NewReassignment>,
    /// The audit event. Its leave id is bound after insertion.
    pub audit_event: AuditEvent,
}

impl ApplicationResult {
    /// Builds the events for this application once ids are known.
    ///
    /// # Arguments
    ///
    /// * `leave` - The inserted leave
    /// * `reassignment_ids` - Ids of the inserted reassignments, in the
    ///   order of `self.reassignments`
    #[must_use]
    pub fn events_for(&self, leave: &Leave, reassignment_ids: &[i64]) -> Vec<LeaveEvent> {
        let summary: LeaveSummary = LeaveSummary::from(leave);
        let mut events: Vec<LeaveEvent> = Vec::new();

        match self.cover_request {
            Some(request) => events.push(LeaveEvent::CoverRequested {
                leave: summary.clone(),
                cover_employee_id: request.cover_employee_id,
            }),
            None => events.push(LeaveEvent::AdminReviewRequested {
                leave: summary.clone(),
            }),
        }

        if self.new_leave.is_no_pay {
            events.push(LeaveEvent::NoPayFlagged {
                leave: summary.clone(),
            });
        }

        for (reassignment, reassignment_id) in self.reassignments.iter().zip(reassignment_ids) {
            events.push(LeaveEvent::CoveringConflictDetected {
                reassignment_id: *reassignment_id,
                covered_leave: reassignment.covered_leave.clone(),
                cover_employee_leave: summary.clone(),
            });
        }

        events
    }
}

/// An existing leave and its related rows, loaded inside the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveState {
    /// The leave being acted on.
    pub leave: Leave,
    /// Its cover request, if one was created.
    pub cover_request: Option<CoverRequest>,
    /// The leave's owner.
    pub applicant: Employee,
    /// The owner's stored balance row, if any.
    pub stored_balance: Option<LeaveBalance>,
}

/// The result of a successful state transition on an existing leave.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The leave after the transition.
    pub leave: Leave,
    /// The cover request after the transition, when it changed.
    pub cover_request: Option<CoverRequest>,
    /// The balance row to write, when it changed.
    pub balance_write: Option<LeaveBalance>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// Events to dispatch after commit.
    pub events: Vec<LeaveEvent>,
}

/// A reassignment and the rows needed to resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentContext {
    /// The reassignment being resolved.
    pub reassignment: CoverDutyReassignment,
    /// The approved leave that needs a new cover.
    pub covered_leave: Leave,
}

/// The chosen substitute and the facts needed to re-validate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCheck {
    /// The substitute, if the id exists.
    pub candidate: Option<Employee>,
    /// The substitute's active leaves.
    pub candidate_leaves: Vec<Leave>,
}

/// The result of resolving a reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentResult {
    /// The reassignment, now assigned.
    pub reassignment: CoverDutyReassignment,
    /// The covered leave with its new cover employee.
    pub covered_leave: Leave,
    /// The audit event, keyed by the covered leave.
    pub audit_event: AuditEvent,
    /// Events to dispatch after commit.
    pub events: Vec<LeaveEvent>,
}
