// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    ADMIN, APPLICANT, COVER, create_test_cause, create_test_now, create_test_state,
};
use crate::{
    AdminDecision, Command, CoreError, CoverDecision, EXPIRED_COVER_RESPONSE, LeaveEvent,
    LeaveState, TransitionResult, apply,
};
use leave_cover_audit::Actor;
use leave_cover_domain::{
    CoverRequestStatus, DomainError, HalfDays, LeaveStatus, LeaveType, StandardAllotment,
};
use time::{Duration, OffsetDateTime};

fn run(
    state: &LeaveState,
    command: Command,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    apply(state, command, &StandardAllotment, actor, create_test_cause(), now)
}

fn later(hours: i64) -> OffsetDateTime {
    create_test_now() + Duration::hours(hours)
}

#[test]
fn test_cover_accept_moves_leave_to_admin_review() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingCover, CoverRequestStatus::Pending);
    let result: TransitionResult = run(
        &state,
        Command::RespondToCover {
            decision: CoverDecision::Accept,
        },
        Actor::employee(COVER),
        later(2),
    )
    .unwrap();

    assert_eq!(result.leave.status, LeaveStatus::PendingAdmin);
    let request = result.cover_request.unwrap();
    assert_eq!(request.status, CoverRequestStatus::Accepted);
    assert_eq!(request.responded_at, Some(later(2)));
    assert_eq!(result.leave.updated_at, later(2));
    assert_eq!(result.audit_event.action.name, "AcceptCover");
    assert_eq!(result.audit_event.leave_id, state.leave.leave_id);
    assert!(matches!(result.events[0], LeaveEvent::CoverAccepted { .. }));
    assert!(matches!(result.events[1], LeaveEvent::AdminReviewRequested { .. }));
}

#[test]
fn test_cover_decline_requires_reason() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingCover, CoverRequestStatus::Pending);
    let result = run(
        &state,
        Command::RespondToCover {
            decision: CoverDecision::Decline {
                reason: String::from("   "),
            },
        },
        Actor::employee(COVER),
        later(1),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::Validation { .. }))
    ));
}

#[test]
fn test_cover_decline_records_reason() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingCover, CoverRequestStatus::Pending);
    let result: TransitionResult = run(
        &state,
        Command::RespondToCover {
            decision: CoverDecision::Decline {
                reason: String::from("Also travelling"),
            },
        },
        Actor::employee(COVER),
        later(1),
    )
    .unwrap();

    assert_eq!(result.leave.status, LeaveStatus::CoverDeclined);
    assert_eq!(result.leave.cover_response.as_deref(), Some("Also travelling"));
    assert_eq!(
        result.cover_request.unwrap().status,
        CoverRequestStatus::Declined
    );
}

#[test]
fn test_only_named_cover_can_respond() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingCover, CoverRequestStatus::Pending);
    let result = run(
        &state,
        Command::RespondToCover {
            decision: CoverDecision::Accept,
        },
        Actor::employee(APPLICANT),
        later(1),
    );
    assert!(matches!(result, Err(CoreError::Forbidden { .. })));
}

#[test]
fn test_responding_to_answered_request_fails() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingAdmin, CoverRequestStatus::Accepted);
    let result = run(
        &state,
        Command::RespondToCover {
            decision: CoverDecision::Accept,
        },
        Actor::employee(COVER),
        later(1),
    );
    assert!(matches!(
        result,
        Err(CoreError::CoverRequestClosed {
            status: CoverRequestStatus::Accepted,
            ..
        })
    ));
}

#[test]
fn test_responding_after_expiry_fails() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingCover, CoverRequestStatus::Pending);
    let result = run(
        &state,
        Command::RespondToCover {
            decision: CoverDecision::Accept,
        },
        Actor::employee(COVER),
        later(25),
    );
    assert!(matches!(
        result,
        Err(CoreError::CoverRequestClosed {
            status: CoverRequestStatus::Expired,
            ..
        })
    ));
}

#[test]
fn test_admin_approval_deducts_balance() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingAdmin, CoverRequestStatus::Accepted);
    let result: TransitionResult = run(
        &state,
        Command::DecideLeave {
            decision: AdminDecision::Approve {
                response: Some(String::from("Enjoy")),
            },
        },
        Actor::admin(ADMIN),
        later(3),
    )
    .unwrap();

    assert_eq!(result.leave.status, LeaveStatus::Approved);
    assert_eq!(result.leave.admin_response.as_deref(), Some("Enjoy"));
    assert_eq!(result.leave.leave_type, LeaveType::Annual);
    let balance = result.balance_write.unwrap();
    assert_eq!(balance.annual, HalfDays::whole_days(12));
    assert!(result.cover_request.is_none());
    assert!(matches!(
        result.events[0],
        LeaveEvent::LeaveApproved {
            cover_employee_id: Some(COVER),
            ..
        }
    ));
}

#[test]
fn test_admin_approval_with_missing_balance_allots_first() {
    let mut state: LeaveState =
        create_test_state(LeaveStatus::PendingAdmin, CoverRequestStatus::Accepted);
    state.stored_balance = None;
    let result: TransitionResult = run(
        &state,
        Command::DecideLeave {
            decision: AdminDecision::Approve { response: None },
        },
        Actor::admin(ADMIN),
        later(3),
    )
    .unwrap();
    assert_eq!(result.balance_write.unwrap().annual, HalfDays::whole_days(12));
}

#[test]
fn test_admin_decline_has_no_balance_effect() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingAdmin, CoverRequestStatus::Accepted);
    let result: TransitionResult = run(
        &state,
        Command::DecideLeave {
            decision: AdminDecision::Decline {
                response: Some(String::from("Peak season")),
            },
        },
        Actor::admin(ADMIN),
        later(3),
    )
    .unwrap();
    assert_eq!(result.leave.status, LeaveStatus::Declined);
    assert!(result.balance_write.is_none());
    assert!(matches!(result.events[0], LeaveEvent::LeaveDeclined { .. }));
}

#[test]
fn test_non_admin_cannot_decide() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingAdmin, CoverRequestStatus::Accepted);
    let result = run(
        &state,
        Command::DecideLeave {
            decision: AdminDecision::Approve { response: None },
        },
        Actor::employee(COVER),
        later(3),
    );
    assert!(matches!(result, Err(CoreError::Forbidden { .. })));
}

#[test]
fn test_cannot_approve_while_waiting_for_cover() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingCover, CoverRequestStatus::Pending);
    let result = run(
        &state,
        Command::DecideLeave {
            decision: AdminDecision::Approve { response: None },
        },
        Actor::admin(ADMIN),
        later(3),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTransition {
            from: LeaveStatus::PendingCover,
            to: LeaveStatus::Approved
        }))
    ));
}

#[test]
fn test_cancel_pending_cover_closes_request() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingCover, CoverRequestStatus::Pending);
    let result: TransitionResult =
        run(&state, Command::CancelLeave, Actor::employee(APPLICANT), later(1)).unwrap();

    assert_eq!(result.leave.status, LeaveStatus::Cancelled);
    assert_eq!(result.cover_request.unwrap().status, CoverRequestStatus::Expired);
    assert!(matches!(
        result.events[0],
        LeaveEvent::LeaveCancelled {
            released_cover_employee_id: Some(COVER),
            ..
        }
    ));
}

#[test]
fn test_cancel_approved_leave_rejected() {
    let state: LeaveState = create_test_state(LeaveStatus::Approved, CoverRequestStatus::Accepted);
    let result = run(&state, Command::CancelLeave, Actor::employee(APPLICANT), later(1));
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTransition { .. }))
    ));
}

#[test]
fn test_only_owner_can_cancel() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingAdmin, CoverRequestStatus::Accepted);
    let result = run(&state, Command::CancelLeave, Actor::employee(COVER), later(1));
    assert!(matches!(result, Err(CoreError::Forbidden { .. })));
}

#[test]
fn test_expire_moves_leave_to_cover_declined() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingCover, CoverRequestStatus::Pending);
    let result: TransitionResult = run(
        &state,
        Command::ExpireCoverRequest,
        Actor::system(),
        later(25),
    )
    .unwrap();

    assert_eq!(result.leave.status, LeaveStatus::CoverDeclined);
    assert!(!result.leave.status.is_active());
    assert_eq!(result.leave.cover_response.as_deref(), Some(EXPIRED_COVER_RESPONSE));
    assert_eq!(result.cover_request.unwrap().status, CoverRequestStatus::Expired);
    assert!(matches!(result.events[0], LeaveEvent::CoverExpired { .. }));
}

#[test]
fn test_expire_before_ttl_rejected() {
    let state: LeaveState =
        create_test_state(LeaveStatus::PendingCover, CoverRequestStatus::Pending);
    let result = run(&state, Command::ExpireCoverRequest, Actor::system(), later(23));
    assert!(matches!(result, Err(CoreError::CoverRequestClosed { .. })));
}

#[test]
fn test_expire_is_not_repeatable() {
    let state: LeaveState =
        create_test_state(LeaveStatus::CoverDeclined, CoverRequestStatus::Expired);
    let result = run(&state, Command::ExpireCoverRequest, Actor::system(), later(30));
    assert!(matches!(
        result,
        Err(CoreError::CoverRequestClosed {
            status: CoverRequestStatus::Expired,
            ..
        })
    ));
}
