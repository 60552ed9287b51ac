// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    TestError, apply_test_leave, create_test_application, create_test_employee, create_test_now,
    create_test_persistence, day, transition_test_leave,
};
use crate::{LeaveFilter, MAX_PAGE_SIZE, Persistence, PersistenceError};
use leave_cover::Command;
use leave_cover_audit::Actor;
use leave_cover_domain::{
    CoverCandidate, DateRange, Employee, Leave, LeaveStatus, LeaveType, PublicHoliday,
};

fn range(start: u8, end: u8) -> DateRange {
    DateRange::new(day(start), day(end)).unwrap()
}

#[test]
fn test_active_leaves_respect_inclusive_boundaries() {
    let mut persistence: Persistence = create_test_persistence();
    let alice: i64 = create_test_employee(&mut persistence, "Alice", false);
    let bob: i64 = create_test_employee(&mut persistence, "Bob", false);
    apply_test_leave(
        &mut persistence,
        &create_test_application(alice, Some(bob), LeaveType::Annual, 10, 13),
    )
    .unwrap();

    let counts: Result<(usize, usize, usize), PersistenceError> =
        persistence.in_transaction(|store| {
            Ok((
                store.active_leaves(alice, range(12, 20))?.len(),
                store.active_leaves(alice, range(13, 13))?.len(),
                store.active_leaves(alice, range(14, 20))?.len(),
            ))
        });
    assert_eq!(counts.unwrap(), (1, 1, 0));
}

#[test]
fn test_cancelled_leave_no_longer_counts_as_active() {
    let mut persistence: Persistence = create_test_persistence();
    let alice: i64 = create_test_employee(&mut persistence, "Alice", false);
    let bob: i64 = create_test_employee(&mut persistence, "Bob", false);
    let leave_id: i64 = apply_test_leave(
        &mut persistence,
        &create_test_application(alice, Some(bob), LeaveType::Annual, 10, 13),
    )
    .unwrap()
    .leave
    .leave_id;

    transition_test_leave(
        &mut persistence,
        leave_id,
        Command::CancelLeave,
        Actor::employee(alice),
        create_test_now(),
    )
    .unwrap();

    let active: Vec<Leave> = persistence
        .in_transaction(|store| store.active_leaves(alice, range(10, 13)))
        .unwrap();
    assert!(active.is_empty());
}

#[test]
fn test_candidate_workloads_count_pending_requests_and_absences() {
    let mut persistence: Persistence = create_test_persistence();
    let alice: i64 = create_test_employee(&mut persistence, "Alice", false);
    let bob: i64 = create_test_employee(&mut persistence, "Bob", false);
    let carol: i64 = create_test_employee(&mut persistence, "Carol", false);
    let inactive: i64 = create_test_employee(&mut persistence, "Ivan", false);
    persistence.set_employee_active(inactive, false).unwrap();

    apply_test_leave(
        &mut persistence,
        &create_test_application(alice, Some(bob), LeaveType::Annual, 9, 10),
    )
    .unwrap();

    let candidates: Vec<CoverCandidate> = persistence
        .in_transaction(|store| store.candidate_workloads(range(9, 9)))
        .unwrap();

    let ids: Vec<i64> = candidates.iter().map(|c| c.employee_id).collect();
    assert_eq!(ids, vec![alice, bob, carol]);

    let alice_row: &CoverCandidate = &candidates[0];
    assert!(alice_row.on_leave);
    assert_eq!(alice_row.pending_cover_requests, 0);

    let bob_row: &CoverCandidate = &candidates[1];
    assert!(!bob_row.on_leave);
    assert_eq!(bob_row.pending_cover_requests, 1);
    assert_eq!(bob_row.covering_duties, 0);

    let carol_row: &CoverCandidate = &candidates[2];
    assert_eq!(carol_row.workload(), 0);
}

#[test]
fn test_list_leaves_filters_and_paginates() {
    let mut persistence: Persistence = create_test_persistence();
    let alice: i64 = create_test_employee(&mut persistence, "Alice", false);
    let bob: i64 = create_test_employee(&mut persistence, "Bob", false);
    for (start, end) in [(9, 9), (11, 11), (13, 13)] {
        apply_test_leave(
            &mut persistence,
            &create_test_application(alice, Some(bob), LeaveType::Annual, start, end),
        )
        .unwrap();
    }
    apply_test_leave(
        &mut persistence,
        &create_test_application(bob, None, LeaveType::Official, 4, 4),
    )
    .unwrap();

    let alices: Vec<Leave> = persistence
        .list_leaves(LeaveFilter {
            employee_id: Some(alice),
            ..LeaveFilter::default()
        })
        .unwrap();
    assert_eq!(alices.len(), 3);
    assert_eq!(alices[0].start_date, day(13), "Newest first");

    let page: Vec<Leave> = persistence
        .list_leaves(LeaveFilter {
            employee_id: Some(alice),
            limit: 2,
            offset: 2,
            ..LeaveFilter::default()
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].start_date, day(9));

    let pending_admin: Vec<Leave> = persistence
        .list_leaves(LeaveFilter {
            status: Some(LeaveStatus::PendingAdmin),
            limit: MAX_PAGE_SIZE + 10,
            ..LeaveFilter::default()
        })
        .unwrap();
    assert_eq!(pending_admin.len(), 1);
    assert_eq!(pending_admin[0].employee_id, bob);
}

#[test]
fn test_holidays_in_range_include_every_category() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .create_public_holiday(&PublicHoliday::new(day(3), "Medin Poya", "Poya, Bank"))
        .unwrap();
    persistence
        .create_public_holiday(&PublicHoliday::new(day(20), "Ramazan", "Bank holiday"))
        .unwrap();

    let holidays: Vec<PublicHoliday> = persistence
        .in_transaction(|store| store.holidays_in(range(1, 10)))
        .unwrap();
    assert_eq!(holidays.len(), 1);
    assert_eq!(holidays[0].name, "Medin Poya");
    assert!(holidays[0].holiday_id.is_some());
    assert_eq!(persistence.list_holidays().unwrap().len(), 2);
}

#[test]
fn test_duplicate_holiday_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let holiday: PublicHoliday = PublicHoliday::new(day(3), "Medin Poya", "Poya");
    persistence.create_public_holiday(&holiday).unwrap();

    let result = persistence.create_public_holiday(&holiday);
    assert!(matches!(result, Err(PersistenceError::Duplicate(_))));
}

#[test]
fn test_active_admins_exclude_inactive_and_non_admins() {
    let mut persistence: Persistence = create_test_persistence();
    let hana: i64 = create_test_employee(&mut persistence, "Hana", true);
    let omar: i64 = create_test_employee(&mut persistence, "Omar", true);
    create_test_employee(&mut persistence, "Alice", false);
    persistence.set_employee_active(omar, false).unwrap();

    let admins: Vec<Employee> = persistence.list_active_admins().unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].employee_id, hana);
    assert_eq!(admins[0].admin_type.as_deref(), Some("HR"));
}

#[test]
fn test_confirming_unknown_employee_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let result = persistence.set_employee_confirmation(42, day(2));
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_confirmation_ends_probation() {
    let mut persistence: Persistence = create_test_persistence();
    let alice: i64 = create_test_employee(&mut persistence, "Alice", false);
    persistence.set_employee_confirmation(alice, day(2)).unwrap();

    let employee: Employee = persistence.get_employee(alice).unwrap().unwrap();
    assert!(!employee.is_probation);
    assert_eq!(employee.confirmed_at, Some(day(2)));
}

#[test]
fn test_store_errors_roll_back_as_caller_error() {
    let mut persistence: Persistence = create_test_persistence();
    let result: Result<(), TestError> = persistence.in_transaction(|store| {
        store.leave(1)?;
        Err(TestError::Persistence(PersistenceError::NotFound(
            String::from("Leave 1"),
        )))
    });
    assert!(matches!(
        result,
        Err(TestError::Persistence(PersistenceError::NotFound(_)))
    ));
}
