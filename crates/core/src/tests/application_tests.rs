// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    APPLICANT, COVER, create_test_application, create_test_balance, create_test_cause,
    create_test_context, create_test_employee, create_test_leave, create_test_now, day,
};
use crate::{ApplicationContext, ApplicationResult, CoreError, LeaveEvent, apply_for_leave};
use leave_cover_audit::Actor;
use leave_cover_domain::{
    DomainError, HalfDayType, HalfDays, Leave, LeaveApplication, LeaveStatus, LeaveType,
    PublicHoliday, StandardAllotment,
};
use time::Duration;

fn run(
    context: &ApplicationContext,
    application: &LeaveApplication,
) -> Result<ApplicationResult, CoreError> {
    apply_for_leave(
        context,
        application,
        &StandardAllotment,
        Actor::employee(APPLICANT),
        create_test_cause(),
        create_test_now(),
    )
}

#[test]
fn test_annual_application_creates_pending_cover_leave_and_request() {
    let context: ApplicationContext = create_test_context();
    let application: LeaveApplication = create_test_application(LeaveType::Annual, 9, 11);

    let result: ApplicationResult = run(&context, &application).unwrap();

    assert_eq!(result.new_leave.status, LeaveStatus::PendingCover);
    assert_eq!(result.new_leave.total_days, HalfDays::whole_days(3));
    assert_eq!(result.new_leave.cover_employee_id, Some(COVER));
    assert_eq!(result.new_leave.reason, "Family event");
    assert!(!result.new_leave.is_no_pay);
    assert!(result.reassignments.is_empty());
    assert_eq!(result.balance_write, None);

    let request = result.cover_request.unwrap();
    assert_eq!(request.cover_employee_id, COVER);
    assert_eq!(request.expires_at - request.created_at, Duration::hours(24));
    assert_eq!(request.created_at, create_test_now());

    assert_eq!(result.audit_event.action.name, "ApplyForLeave");
    assert!(result.audit_event.before.is_empty());
}

#[test]
fn test_official_application_skips_cover() {
    let context: ApplicationContext = create_test_context();
    let application: LeaveApplication = create_test_application(LeaveType::Official, 4, 5);

    let result: ApplicationResult = run(&context, &application).unwrap();

    assert_eq!(result.new_leave.status, LeaveStatus::PendingAdmin);
    assert_eq!(result.new_leave.cover_employee_id, None);
    assert!(result.cover_request.is_none());
    assert!(!result.new_leave.is_no_pay);

    let leave: Leave = create_test_leave(30, APPLICANT, 4, 5, LeaveStatus::PendingAdmin, None);
    let events: Vec<LeaveEvent> = result.events_for(&leave, &[]);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], LeaveEvent::AdminReviewRequested { .. }));
}

#[test]
fn test_no_pay_flag_follows_balance() {
    let mut context: ApplicationContext = create_test_context();
    context.stored_balance = Some(create_test_balance(APPLICANT, 2));

    // Mon..Wed
    let three: ApplicationResult =
        run(&context, &create_test_application(LeaveType::Annual, 9, 11)).unwrap();
    assert!(three.new_leave.is_no_pay);

    let two: ApplicationResult =
        run(&context, &create_test_application(LeaveType::Annual, 9, 10)).unwrap();
    assert!(!two.new_leave.is_no_pay);

    let leave: Leave =
        create_test_leave(31, APPLICANT, 9, 11, LeaveStatus::PendingCover, Some(COVER));
    let events: Vec<LeaveEvent> = three.events_for(&leave, &[]);
    assert!(events.iter().any(|e| matches!(e, LeaveEvent::NoPayFlagged { .. })));
}

#[test]
fn test_missing_balance_is_created_for_leave_year() {
    let mut context: ApplicationContext = create_test_context();
    context.stored_balance = None;

    let result: ApplicationResult =
        run(&context, &create_test_application(LeaveType::Annual, 9, 9)).unwrap();

    let balance = result.balance_write.unwrap();
    assert_eq!(balance.year, 2026);
    assert_eq!(balance.annual, HalfDays::whole_days(14));
}

#[test]
fn test_stale_year_balance_is_reset() {
    let mut context: ApplicationContext = create_test_context();
    let mut old = create_test_balance(APPLICANT, 0);
    old.year = 2025;
    context.stored_balance = Some(old);

    let result: ApplicationResult =
        run(&context, &create_test_application(LeaveType::Annual, 9, 9)).unwrap();
    assert!(!result.new_leave.is_no_pay);
    assert_eq!(result.balance_write.unwrap().annual, HalfDays::whole_days(14));
}

#[test]
fn test_holidays_reduce_day_count() {
    let mut context: ApplicationContext = create_test_context();
    context.holidays = vec![
        PublicHoliday::new(day(10), "Poya", "Public, Bank, Poya"),
        PublicHoliday::new(day(11), "Bank Day", "Bank"),
    ];
    let result: ApplicationResult =
        run(&context, &create_test_application(LeaveType::Annual, 9, 11)).unwrap();
    assert_eq!(result.new_leave.total_days, HalfDays::whole_days(2));
}

#[test]
fn test_overlapping_application_rejected() {
    let mut context: ApplicationContext = create_test_context();
    context.applicant_leaves = vec![create_test_leave(
        40,
        APPLICANT,
        10,
        15,
        LeaveStatus::Approved,
        Some(COVER),
    )];

    let result = run(&context, &create_test_application(LeaveType::Annual, 12, 17));
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::OverlappingLeave(ref conflict)))
            if conflict.leave_id == 40
    ));

    let after: ApplicationResult =
        run(&context, &create_test_application(LeaveType::Annual, 16, 20)).unwrap();
    assert_eq!(after.new_leave.total_days, HalfDays::whole_days(5));
}

#[test]
fn test_inactive_cover_rejected() {
    let mut context: ApplicationContext = create_test_context();
    let mut cover = create_test_employee(COVER);
    cover.is_active = false;
    context.cover_employee = Some(cover);

    let result = run(&context, &create_test_application(LeaveType::Annual, 9, 9));
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::Validation { .. }))
    ));
}

#[test]
fn test_unknown_cover_rejected() {
    let mut context: ApplicationContext = create_test_context();
    context.cover_employee = None;

    let result = run(&context, &create_test_application(LeaveType::Annual, 9, 9));
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::Validation { ref reason }))
            if reason.contains("does not exist")
    ));
}

#[test]
fn test_cover_on_leave_rejected() {
    let mut context: ApplicationContext = create_test_context();
    context.cover_employee_leaves =
        vec![create_test_leave(41, COVER, 9, 9, LeaveStatus::PendingAdmin, Some(7))];

    let result = run(&context, &create_test_application(LeaveType::Annual, 9, 10));
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::Validation { ref reason }))
            if reason.contains("cannot cover")
    ));
}

#[test]
fn test_applying_for_someone_else_forbidden() {
    let context: ApplicationContext = create_test_context();
    let mut application: LeaveApplication = create_test_application(LeaveType::Annual, 9, 9);
    application.employee_id = 77;
    application.cover_employee_id = Some(COVER);

    let result = run(&context, &application);
    assert!(matches!(result, Err(CoreError::Forbidden { .. })));
}

/// B (the applicant here) is the approved cover for A's leave on days 5..10.
fn covering_context() -> ApplicationContext {
    let mut context: ApplicationContext = create_test_context();
    context.covering_assignments = vec![create_test_leave(
        50,
        70,
        5,
        10,
        LeaveStatus::Approved,
        Some(APPLICANT),
    )];
    context
}

#[test]
fn test_covering_employee_annual_leave_rejected() {
    let context: ApplicationContext = covering_context();
    let result = run(&context, &create_test_application(LeaveType::Annual, 7, 7));
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::CoveringConflict { .. }))
    ));
}

#[test]
fn test_covering_employee_medical_half_day_opens_one_reassignment() {
    let context: ApplicationContext = covering_context();
    let mut application: LeaveApplication = create_test_application(LeaveType::Medical, 7, 7);
    application.half_day_type = Some(HalfDayType::FirstHalf);

    let result: ApplicationResult = run(&context, &application).unwrap();

    assert_eq!(result.new_leave.status, LeaveStatus::PendingCover);
    assert_eq!(result.new_leave.total_days, HalfDays::HALF);
    assert_eq!(result.reassignments.len(), 1);
    assert_eq!(result.reassignments[0].covered_leave.leave_id, 50);
    assert_eq!(result.reassignments[0].original_cover_employee_id, APPLICANT);

    let leave: Leave =
        create_test_leave(60, APPLICANT, 7, 7, LeaveStatus::PendingCover, Some(COVER));
    let events: Vec<LeaveEvent> = result.events_for(&leave, &[900]);
    let conflicts: Vec<&LeaveEvent> = events
        .iter()
        .filter(|e| matches!(e, LeaveEvent::CoveringConflictDetected { .. }))
        .collect();
    assert_eq!(conflicts.len(), 1);
    match conflicts[0] {
        LeaveEvent::CoveringConflictDetected {
            reassignment_id,
            covered_leave,
            cover_employee_leave,
        } => {
            assert_eq!(*reassignment_id, 900);
            assert_eq!(covered_leave.employee_id, 70);
            assert_eq!(cover_employee_leave.leave_id, 60);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_covering_outside_new_leave_dates_is_ignored() {
    let context: ApplicationContext = covering_context();
    let result: ApplicationResult =
        run(&context, &create_test_application(LeaveType::Annual, 11, 12)).unwrap();
    assert!(result.reassignments.is_empty());
}
