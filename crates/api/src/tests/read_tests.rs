// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read handler and record maintenance tests.

use leave_cover_domain::HalfDays;
use leave_cover_persistence::Persistence;

use crate::{
    AddPublicHolidayRequest, ApiError, AuditTimelineResponse, AuthenticatedActor,
    ConfirmEmployeeRequest, EmployeeResponse, GetLeaveResponse, LeaveBalanceResponse,
    ListLeavesRequest, ListLeavesResponse, RegisterEmployeeRequest, Role, add_public_holiday,
    confirm_employee, get_audit_timeline, get_leave, get_leave_balance, list_leaves,
    register_employee,
};

use super::helpers::{TestFixture, create_test_today, setup_test_fixture};

fn create_register_request(name: &str, email: &str, is_admin: bool) -> RegisterEmployeeRequest {
    RegisterEmployeeRequest {
        name: name.to_string(),
        email: email.to_string(),
        is_admin,
        admin_type: None,
        is_probation: false,
        confirmed_at: Some(String::from("2024-06-01")),
    }
}

// ============================================================================
// Leaves
// ============================================================================

#[test]
fn test_leave_is_visible_to_owner_cover_and_admin() {
    let mut fixture: TestFixture = setup_test_fixture();
    let leave_id: i64 = fixture.alice_applies().leave.leave_id;

    for actor in [fixture.alice(), fixture.bob(), fixture.admin()] {
        let response: GetLeaveResponse =
            get_leave(&mut fixture.persistence, leave_id, &actor).unwrap();
        assert_eq!(response.leave.leave_id, leave_id);
        assert!(response.cover_request.is_some());
    }

    let carol: AuthenticatedActor = fixture.carol();
    let result = get_leave(&mut fixture.persistence, leave_id, &carol);
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_missing_leave_is_not_found() {
    let mut fixture: TestFixture = setup_test_fixture();
    let admin: AuthenticatedActor = fixture.admin();

    let result = get_leave(&mut fixture.persistence, 404, &admin);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_employees_only_list_their_own_leaves() {
    let mut fixture: TestFixture = setup_test_fixture();
    fixture.alice_applies();

    let bob: AuthenticatedActor = fixture.bob();
    let own: ListLeavesResponse =
        list_leaves(&mut fixture.persistence, &ListLeavesRequest::default(), &bob).unwrap();
    assert!(own.leaves.is_empty());

    let other = list_leaves(
        &mut fixture.persistence,
        &ListLeavesRequest {
            employee_id: Some(fixture.alice_id),
            ..ListLeavesRequest::default()
        },
        &bob,
    );
    assert!(matches!(other, Err(ApiError::Unauthorized { .. })));

    let admin: AuthenticatedActor = fixture.admin();
    let all: ListLeavesResponse =
        list_leaves(&mut fixture.persistence, &ListLeavesRequest::default(), &admin).unwrap();
    assert_eq!(all.leaves.len(), 1);
}

#[test]
fn test_list_leaves_filters_by_status() {
    let mut fixture: TestFixture = setup_test_fixture();
    fixture.create_approved_leave();
    let admin: AuthenticatedActor = fixture.admin();

    let approved: ListLeavesResponse = list_leaves(
        &mut fixture.persistence,
        &ListLeavesRequest {
            status: Some(String::from("approved")),
            ..ListLeavesRequest::default()
        },
        &admin,
    )
    .unwrap();
    assert_eq!(approved.leaves.len(), 1);

    let pending: ListLeavesResponse = list_leaves(
        &mut fixture.persistence,
        &ListLeavesRequest {
            status: Some(String::from("PENDING_COVER")),
            ..ListLeavesRequest::default()
        },
        &admin,
    )
    .unwrap();
    assert!(pending.leaves.is_empty());
}

// ============================================================================
// Balances and audit
// ============================================================================

#[test]
fn test_balance_preview_for_employee_without_row() {
    let mut fixture: TestFixture = setup_test_fixture();
    let carol: AuthenticatedActor = fixture.carol();

    let response: LeaveBalanceResponse = get_leave_balance(
        &mut fixture.persistence,
        &fixture.services,
        fixture.carol_id,
        &carol,
        create_test_today(),
    )
    .unwrap();

    assert!(!response.stored);
    assert_eq!(response.balance.year, 2026);
    assert_eq!(response.balance.annual, HalfDays::whole_days(14));
    assert_eq!(response.balance.casual, HalfDays::whole_days(7));
    assert_eq!(response.balance.medical, HalfDays::whole_days(21));
    assert!(fixture.persistence.get_balance(fixture.carol_id).unwrap().is_none());
}

#[test]
fn test_balance_after_approval_is_stored() {
    let mut fixture: TestFixture = setup_test_fixture();
    fixture.create_approved_leave();
    let admin: AuthenticatedActor = fixture.admin();

    let response: LeaveBalanceResponse = get_leave_balance(
        &mut fixture.persistence,
        &fixture.services,
        fixture.alice_id,
        &admin,
        create_test_today(),
    )
    .unwrap();

    assert!(response.stored);
    assert_eq!(response.balance.annual, HalfDays::whole_days(12));
}

#[test]
fn test_probationer_balance_preview() {
    let mut fixture: TestFixture = setup_test_fixture();
    let admin: AuthenticatedActor = fixture.admin();

    let response: LeaveBalanceResponse = get_leave_balance(
        &mut fixture.persistence,
        &fixture.services,
        fixture.dave_id,
        &admin,
        create_test_today(),
    )
    .unwrap();

    assert_eq!(response.balance.annual, HalfDays::ZERO);
    assert_eq!(response.balance.casual, HalfDays::whole_days(4));
    assert_eq!(response.balance.medical, HalfDays::whole_days(7));
}

#[test]
fn test_audit_timeline_follows_lifecycle() {
    let mut fixture: TestFixture = setup_test_fixture();
    let leave_id: i64 = fixture.create_approved_leave();
    let alice: AuthenticatedActor = fixture.alice();

    let timeline: AuditTimelineResponse =
        get_audit_timeline(&mut fixture.persistence, leave_id, &alice).unwrap();

    let actions: Vec<&str> = timeline
        .events
        .iter()
        .map(|e| e.action_name.as_str())
        .collect();
    assert_eq!(actions, vec!["ApplyForLeave", "AcceptCover", "ApproveLeave"]);
    assert_eq!(timeline.events[0].actor_role, "EMPLOYEE");
    assert_eq!(timeline.events[0].actor_employee_id, Some(fixture.alice_id));
    assert_eq!(timeline.events[2].actor_role, "ADMIN");
    assert!(timeline.events.iter().all(|e| e.leave_id == leave_id));

    let carol: AuthenticatedActor = fixture.carol();
    let hidden = get_audit_timeline(&mut fixture.persistence, leave_id, &carol);
    assert!(matches!(hidden, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_leave_info_serializes_days_as_number() {
    let mut fixture: TestFixture = setup_test_fixture();
    let response = fixture.alice_applies();

    let json: serde_json::Value = serde_json::to_value(&response.leave).unwrap();

    assert_eq!(json["total_days"], serde_json::json!(2.0));
    assert_eq!(json["start_date"], "2026-03-09");
    assert_eq!(json["status"], "PENDING_COVER");
}

// ============================================================================
// Employees and holidays
// ============================================================================

#[test]
fn test_first_employee_must_be_admin() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let anyone: AuthenticatedActor = AuthenticatedActor::new(1, Role::Employee);

    let refused = register_employee(
        &mut persistence,
        create_register_request("Ann", "ann@example.com", false),
        &anyone,
    );
    assert!(matches!(
        refused,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "first_employee_is_admin"
    ));

    let response: EmployeeResponse = register_employee(
        &mut persistence,
        create_register_request("Ann", "ann@example.com", true),
        &anyone,
    )
    .unwrap();
    assert!(response.employee.is_admin);
    assert_eq!(response.employee.confirmed_at.as_deref(), Some("2024-06-01"));

    let later = register_employee(
        &mut persistence,
        create_register_request("Ben", "ben@example.com", false),
        &anyone,
    );
    assert!(matches!(later, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_register_rejects_duplicate_and_malformed_email() {
    let mut fixture: TestFixture = setup_test_fixture();
    let admin: AuthenticatedActor = fixture.admin();

    let duplicate = register_employee(
        &mut fixture.persistence,
        create_register_request("Another Alice", "alice@example.com", false),
        &admin,
    );
    assert!(matches!(
        duplicate,
        Err(ApiError::Conflict { ref rule, .. }) if rule == "unique_email"
    ));

    let malformed = register_employee(
        &mut fixture.persistence,
        create_register_request("Eve", "eve.example.com", false),
        &admin,
    );
    assert!(matches!(
        malformed,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "email"
    ));
}

#[test]
fn test_probationer_cannot_have_confirmation_date() {
    let mut fixture: TestFixture = setup_test_fixture();
    let admin: AuthenticatedActor = fixture.admin();
    let request: RegisterEmployeeRequest = RegisterEmployeeRequest {
        is_probation: true,
        ..create_register_request("Finn", "finn@example.com", false)
    };

    let result = register_employee(&mut fixture.persistence, request, &admin);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "confirmed_at"
    ));
}

#[test]
fn test_confirming_employee_changes_allotment() {
    let mut fixture: TestFixture = setup_test_fixture();
    let admin: AuthenticatedActor = fixture.admin();

    let response: EmployeeResponse = confirm_employee(
        &mut fixture.persistence,
        fixture.dave_id,
        &ConfirmEmployeeRequest {
            confirmed_at: String::from("2026-05-15"),
        },
        &admin,
    )
    .unwrap();
    assert!(!response.employee.is_probation);

    let balance: LeaveBalanceResponse = get_leave_balance(
        &mut fixture.persistence,
        &fixture.services,
        fixture.dave_id,
        &admin,
        create_test_today(),
    )
    .unwrap();
    assert_eq!(balance.balance.annual, HalfDays::whole_days(10));
}

#[test]
fn test_confirming_unknown_employee_is_not_found() {
    let mut fixture: TestFixture = setup_test_fixture();
    let admin: AuthenticatedActor = fixture.admin();

    let result = confirm_employee(
        &mut fixture.persistence,
        999,
        &ConfirmEmployeeRequest {
            confirmed_at: String::from("2026-05-15"),
        },
        &admin,
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_holiday_category_is_reported() {
    let mut fixture: TestFixture = setup_test_fixture();
    let admin: AuthenticatedActor = fixture.admin();

    let poya = add_public_holiday(
        &mut fixture.persistence,
        &AddPublicHolidayRequest {
            date: String::from("2026-03-03"),
            name: String::from("Medin Poya"),
            description: String::from("Public, Bank, Poya"),
        },
        &admin,
    )
    .unwrap();
    let bank = add_public_holiday(
        &mut fixture.persistence,
        &AddPublicHolidayRequest {
            date: String::from("2026-03-05"),
            name: String::from("Bank Only"),
            description: String::from("Bank"),
        },
        &admin,
    )
    .unwrap();

    assert!(poya.holiday.is_non_working);
    assert!(!bank.holiday.is_non_working);
    assert_eq!(fixture.persistence.list_holidays().unwrap().len(), 2);
}
