// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{AdminDecision, Command, CoverDecision};
use crate::error::CoreError;
use crate::event::{LeaveEvent, LeaveSummary};
use crate::state::{EXPIRED_COVER_RESPONSE, LeaveState, TransitionResult};
use leave_cover_audit::{Action, Actor, ActorRole, AuditEvent, Cause, StateSnapshot};
use leave_cover_domain::{
    AllotmentInputs, AllotmentPolicy, CoverRequest, CoverRequestStatus, DomainError, Leave,
    LeaveBalance, LeaveStatus, resolve_balance,
};
use time::OffsetDateTime;

/// Returns the pending cover request of `state`, or why it cannot be acted on.
fn pending_cover_request(state: &LeaveState) -> Result<&CoverRequest, CoreError> {
    let request: &CoverRequest = state
        .cover_request
        .as_ref()
        .ok_or(CoreError::MissingCoverRequest {
            leave_id: state.leave.leave_id,
        })?;
    if request.status != CoverRequestStatus::Pending {
        return Err(CoreError::CoverRequestClosed {
            leave_id: state.leave.leave_id,
            status: request.status,
        });
    }
    Ok(request)
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Applies a command to an existing leave, producing its new state and audit event.
///
/// # Arguments
///
/// * `state` - The leave and related rows (immutable)
/// * `command` - The command to apply
/// * `policy` - The allotment policy used when an approval creates or resets the balance
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The current time
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the updated rows, audit event and events
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The actor may not perform the command on this leave
/// - The leave's status does not allow the transition
/// - The cover request is missing or no longer pending
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &LeaveState,
    command: Command,
    policy: &dyn AllotmentPolicy,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let before: StateSnapshot = StateSnapshot::capture(&state.leave)?;
    let action_name: &'static str = command.action_name();
    let mut leave: Leave = state.leave.clone();
    let mut cover_request: Option<CoverRequest> = None;
    let mut balance_write: Option<LeaveBalance> = None;
    let mut events: Vec<LeaveEvent> = Vec::new();
    let details: String;

    match command {
        Command::RespondToCover { decision } => {
            let request: &CoverRequest = pending_cover_request(state)?;
            if actor.employee_id != Some(request.cover_employee_id) {
                return Err(CoreError::forbidden(
                    "Only the requested cover employee can respond",
                ));
            }
            if request.is_stale_at(now) {
                return Err(CoreError::CoverRequestClosed {
                    leave_id: leave.leave_id,
                    status: CoverRequestStatus::Expired,
                });
            }

            let mut updated: CoverRequest = request.clone();
            updated.responded_at = Some(now);
            match decision {
                CoverDecision::Accept => {
                    leave.status.ensure_transition(LeaveStatus::PendingAdmin)?;
                    leave.status = LeaveStatus::PendingAdmin;
                    updated.status = CoverRequestStatus::Accepted;
                    details = format!("Cover accepted by employee {}", request.cover_employee_id);

                    let summary: LeaveSummary = LeaveSummary::from(&leave);
                    events.push(LeaveEvent::CoverAccepted {
                        leave: summary.clone(),
                        cover_employee_id: request.cover_employee_id,
                    });
                    events.push(LeaveEvent::AdminReviewRequested { leave: summary });
                }
                CoverDecision::Decline { reason } => {
                    let reason: String = non_empty(Some(reason)).ok_or_else(|| {
                        DomainError::validation("A reason is required to decline cover")
                    })?;
                    leave.status.ensure_transition(LeaveStatus::CoverDeclined)?;
                    leave.status = LeaveStatus::CoverDeclined;
                    leave.cover_response = Some(reason.clone());
                    updated.status = CoverRequestStatus::Declined;
                    details = format!(
                        "Cover declined by employee {}: {reason}",
                        request.cover_employee_id
                    );

                    events.push(LeaveEvent::CoverDeclined {
                        leave: LeaveSummary::from(&leave),
                        cover_employee_id: request.cover_employee_id,
                        reason,
                    });
                }
            }
            cover_request = Some(updated);
        }
        Command::DecideLeave { decision } => {
            if actor.role != ActorRole::Admin {
                return Err(CoreError::forbidden("Only an admin can decide leave"));
            }
            match decision {
                AdminDecision::Approve { response } => {
                    leave.status.ensure_transition(LeaveStatus::Approved)?;
                    leave.status = LeaveStatus::Approved;
                    leave.admin_response = non_empty(response);

                    let inputs: AllotmentInputs = AllotmentInputs {
                        employee_id: state.applicant.employee_id,
                        year: leave.start_date.year(),
                        is_probation: state.applicant.is_probation,
                        confirmed_at: state.applicant.confirmed_at,
                    };
                    let balance: LeaveBalance =
                        *resolve_balance(state.stored_balance, &inputs, policy).balance();
                    balance_write =
                        Some(balance.after_deduction(leave.leave_type, leave.total_days));
                    details =
                        format!("Approved {} days of {} leave", leave.total_days, leave.leave_type);

                    events.push(LeaveEvent::LeaveApproved {
                        leave: LeaveSummary::from(&leave),
                        cover_employee_id: leave.cover_employee_id,
                        response: leave.admin_response.clone(),
                    });
                }
                AdminDecision::Decline { response } => {
                    leave.status.ensure_transition(LeaveStatus::Declined)?;
                    leave.status = LeaveStatus::Declined;
                    leave.admin_response = non_empty(response);
                    details = String::from("Declined by admin");

                    events.push(LeaveEvent::LeaveDeclined {
                        leave: LeaveSummary::from(&leave),
                        cover_employee_id: leave.cover_employee_id,
                        response: leave.admin_response.clone(),
                    });
                }
            }
        }
        Command::CancelLeave => {
            if actor.employee_id != Some(leave.employee_id) {
                return Err(CoreError::forbidden(
                    "Only the applicant can cancel their leave",
                ));
            }
            leave.status.ensure_transition(LeaveStatus::Cancelled)?;
            leave.status = LeaveStatus::Cancelled;

            let released: Option<i64> = match &state.cover_request {
                Some(request) if request.status == CoverRequestStatus::Pending => {
                    let mut closed: CoverRequest = request.clone();
                    closed.status = CoverRequestStatus::Expired;
                    closed.responded_at = Some(now);
                    cover_request = Some(closed);
                    Some(request.cover_employee_id)
                }
                _ => None,
            };
            details = String::from("Cancelled by applicant");

            events.push(LeaveEvent::LeaveCancelled {
                leave: LeaveSummary::from(&leave),
                released_cover_employee_id: released,
            });
        }
        Command::ExpireCoverRequest => {
            let request: &CoverRequest = pending_cover_request(state)?;
            if !request.is_stale_at(now) {
                return Err(CoreError::CoverRequestClosed {
                    leave_id: leave.leave_id,
                    status: request.status,
                });
            }

            let mut expired: CoverRequest = request.clone();
            expired.status = CoverRequestStatus::Expired;
            expired.responded_at = Some(now);
            cover_request = Some(expired);

            // A leave that already moved on keeps its status; only the request closes.
            if leave.status == LeaveStatus::PendingCover {
                leave.status = LeaveStatus::CoverDeclined;
                leave.cover_response = Some(String::from(EXPIRED_COVER_RESPONSE));
                events.push(LeaveEvent::CoverExpired {
                    leave: LeaveSummary::from(&leave),
                    cover_employee_id: request.cover_employee_id,
                });
            }
            details = format!(
                "Cover request to employee {} expired at {}",
                request.cover_employee_id, request.expires_at
            );
        }
    }

    leave.updated_at = now;
    let after: StateSnapshot = StateSnapshot::capture(&leave)?;
    let audit_event: AuditEvent = AuditEvent::new(
        leave.leave_id,
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        before,
        after,
        now,
    );

    Ok(TransitionResult {
        leave,
        cover_request,
        balance_write,
        audit_event,
        events,
    })
}
