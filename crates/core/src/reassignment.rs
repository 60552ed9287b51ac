// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Substitute cover selection for covering-duty conflicts.

use crate::error::CoreError;
use crate::event::{LeaveEvent, LeaveSummary};
use crate::state::{CandidateCheck, ReassignmentContext, ReassignmentResult};
use leave_cover_audit::{Action, Actor, ActorRole, AuditEvent, Cause, StateSnapshot};
use leave_cover_domain::{
    CandidateRanker, CoverCandidate, CoverDutyReassignment, Employee, Leave, LeaveStatus,
    RankedCandidate, ReassignmentStatus, find_overlapping_leave,
};
use time::OffsetDateTime;

/// Ranks the substitutes an admin may choose from.
///
/// The owner of the covered leave and the cover employee who can no longer
/// cover it are never offered.
#[must_use]
pub fn rank_candidates(
    context: &ReassignmentContext,
    candidates: Vec<CoverCandidate>,
    ranker: &dyn CandidateRanker,
) -> Vec<RankedCandidate> {
    let owner: i64 = context.covered_leave.employee_id;
    let original: i64 = context.reassignment.original_cover_employee_id;
    let pool: Vec<CoverCandidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.employee_id != owner && candidate.employee_id != original)
        .collect();
    ranker.rank(pool)
}

/// Re-validates a chosen substitute against the current rows.
fn check_candidate<'a>(
    context: &ReassignmentContext,
    check: &'a CandidateCheck,
    new_cover_employee_id: i64,
) -> Result<&'a Employee, CoreError> {
    let reassignment_id: i64 = context.reassignment.reassignment_id;
    let candidate: &Employee = check.candidate.as_ref().ok_or_else(|| {
        CoreError::stale(
            reassignment_id,
            format!("employee {new_cover_employee_id} does not exist"),
        )
    })?;
    if !candidate.is_active {
        return Err(CoreError::stale(
            reassignment_id,
            format!("{} is no longer active", candidate.name),
        ));
    }
    if candidate.employee_id == context.covered_leave.employee_id {
        return Err(CoreError::stale(
            reassignment_id,
            "an employee cannot cover their own leave",
        ));
    }
    if candidate.employee_id == context.reassignment.original_cover_employee_id {
        return Err(CoreError::stale(
            reassignment_id,
            "the original cover employee cannot be reassigned",
        ));
    }
    if let Some(conflict) = find_overlapping_leave(
        candidate.employee_id,
        context.covered_leave.range(),
        &check.candidate_leaves,
    ) {
        return Err(CoreError::stale(
            reassignment_id,
            format!(
                "{} now has {} leave from {} to {}",
                candidate.name, conflict.leave_type, conflict.start_date, conflict.end_date
            ),
        ));
    }
    Ok(candidate)
}

/// Assigns a substitute cover to the covered leave of a pending reassignment.
///
/// # Arguments
///
/// * `context` - The reassignment and its covered leave, loaded in the transaction
/// * `check` - The chosen substitute and their active leaves, loaded in the same transaction
/// * `new_cover_employee_id` - The substitute the admin picked
/// * `actor` - The admin performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The current time
///
/// # Errors
///
/// Returns `CoreError::Forbidden` if the actor is not an admin, and
/// `CoreError::StaleAssignment` if the reassignment was already resolved, the
/// covered leave is no longer approved, or the substitute is no longer eligible.
pub fn resolve_reassignment(
    context: &ReassignmentContext,
    check: &CandidateCheck,
    new_cover_employee_id: i64,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ReassignmentResult, CoreError> {
    if actor.role != ActorRole::Admin {
        return Err(CoreError::forbidden(
            "Only an admin can resolve a cover reassignment",
        ));
    }
    let reassignment_id: i64 = context.reassignment.reassignment_id;
    if context.reassignment.status != ReassignmentStatus::Pending {
        return Err(CoreError::stale(
            reassignment_id,
            "it has already been assigned",
        ));
    }
    if context.covered_leave.status != LeaveStatus::Approved {
        return Err(CoreError::stale(
            reassignment_id,
            format!(
                "leave {} is {}",
                context.covered_leave.leave_id, context.covered_leave.status
            ),
        ));
    }
    let candidate: &Employee = check_candidate(context, check, new_cover_employee_id)?;

    let before: StateSnapshot = StateSnapshot::capture(&context.covered_leave)?;
    let mut covered_leave: Leave = context.covered_leave.clone();
    covered_leave.cover_employee_id = Some(candidate.employee_id);
    covered_leave.updated_at = now;

    let reassignment: CoverDutyReassignment = CoverDutyReassignment {
        status: ReassignmentStatus::Assigned,
        new_cover_employee_id: Some(candidate.employee_id),
        resolved_at: Some(now),
        ..context.reassignment.clone()
    };

    let audit_event: AuditEvent = AuditEvent::new(
        covered_leave.leave_id,
        actor,
        cause,
        Action::new(
            String::from("ReassignCover"),
            Some(format!(
                "Reassignment {reassignment_id}: cover moved from employee {} to employee {}",
                reassignment.original_cover_employee_id, candidate.employee_id
            )),
        ),
        before,
        StateSnapshot::capture(&covered_leave)?,
        now,
    );

    let events: Vec<LeaveEvent> = vec![LeaveEvent::CoverReassigned {
        reassignment_id,
        covered_leave: LeaveSummary::from(&covered_leave),
        previous_cover_employee_id: reassignment.original_cover_employee_id,
        new_cover_employee_id: candidate.employee_id,
    }];

    Ok(ReassignmentResult {
        reassignment,
        covered_leave,
        audit_event,
        events,
    })
}
