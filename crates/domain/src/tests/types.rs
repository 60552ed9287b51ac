// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::create_test_day;
use crate::{
    CoverRequest, CoverRequestStatus, DomainError, HalfDayType, HalfDays, HolidayCategory,
    LeaveStatus, LeaveType, ReassignmentStatus, parse_date,
};
use std::str::FromStr;
use time::Duration;
use time::macros::datetime;

#[test]
fn test_leave_type_round_trips_through_storage_string() {
    for leave_type in LeaveType::ALL {
        assert_eq!(LeaveType::from_str(leave_type.as_str()).unwrap(), leave_type);
    }
    assert_eq!(LeaveType::from_str("medical").unwrap(), LeaveType::Medical);
    assert!(matches!(
        LeaveType::from_str("SABBATICAL"),
        Err(DomainError::InvalidLeaveType(_))
    ));
}

#[test]
fn test_status_parsing_ignores_case() {
    assert_eq!(LeaveStatus::from_str("approved").unwrap(), LeaveStatus::Approved);
    assert_eq!(
        LeaveStatus::from_str("Pending_Cover").unwrap(),
        LeaveStatus::PendingCover
    );
    assert_eq!(
        CoverRequestStatus::from_str("expired").unwrap(),
        CoverRequestStatus::Expired
    );
    assert_eq!(
        ReassignmentStatus::from_str("pending").unwrap(),
        ReassignmentStatus::Pending
    );
    assert!(matches!(
        LeaveStatus::from_str("done"),
        Err(DomainError::InvalidLeaveStatus(ref s)) if s == "done"
    ));
    assert!(matches!(
        ReassignmentStatus::from_str("DONE"),
        Err(DomainError::InvalidReassignmentStatus(_))
    ));
}

#[test]
fn test_initial_status_depends_on_cover_requirement() {
    assert_eq!(LeaveType::Official.initial_status(), LeaveStatus::PendingAdmin);
    assert_eq!(LeaveType::Annual.initial_status(), LeaveStatus::PendingCover);
    assert!(!LeaveType::Official.requires_cover());
}

#[test]
fn test_state_machine_transitions() {
    use LeaveStatus::{Approved, Cancelled, CoverDeclined, Declined, PendingAdmin, PendingCover};

    assert!(PendingCover.can_transition_to(PendingAdmin));
    assert!(PendingCover.can_transition_to(CoverDeclined));
    assert!(PendingCover.can_transition_to(Cancelled));
    assert!(PendingAdmin.can_transition_to(Approved));
    assert!(PendingAdmin.can_transition_to(Declined));
    assert!(PendingAdmin.can_transition_to(Cancelled));

    assert!(!PendingCover.can_transition_to(Approved));
    assert!(!PendingAdmin.can_transition_to(CoverDeclined));
    for terminal in [Approved, Declined, CoverDeclined, Cancelled] {
        assert!(!terminal.is_pending());
        for target in [PendingCover, PendingAdmin, Approved, Declined, CoverDeclined, Cancelled] {
            assert!(!terminal.can_transition_to(target));
        }
    }

    assert!(matches!(
        Approved.ensure_transition(Cancelled),
        Err(DomainError::InvalidTransition {
            from: Approved,
            to: Cancelled
        })
    ));
}

#[test]
fn test_active_statuses() {
    for status in LeaveStatus::ACTIVE {
        assert!(status.is_active());
    }
    assert!(!LeaveStatus::CoverDeclined.is_active());
}

#[test]
fn test_holiday_category_from_description() {
    assert_eq!(
        HolidayCategory::from_description("Public, Bank, Mercantile"),
        HolidayCategory::Mercantile
    );
    assert_eq!(
        HolidayCategory::from_description("Public, Bank, Poya"),
        HolidayCategory::Poya
    );
    assert_eq!(HolidayCategory::from_description("Bank"), HolidayCategory::Bank);
    assert!(!HolidayCategory::Public.is_non_working());
    assert!(HolidayCategory::Poya.is_non_working());
}

#[test]
fn test_half_day_type_parsing() {
    assert_eq!(HalfDayType::from_str("first_half").unwrap(), HalfDayType::FirstHalf);
    assert_eq!(HalfDayType::from_str("AFTERNOON").unwrap(), HalfDayType::SecondHalf);
    assert!(HalfDayType::from_str("EVENING").is_err());
}

#[test]
fn test_half_days_parsing_and_display() {
    assert_eq!("1.5".parse::<HalfDays>().unwrap(), HalfDays::from_units(3));
    assert_eq!("2".parse::<HalfDays>().unwrap(), HalfDays::whole_days(2));
    assert_eq!("0.50".parse::<HalfDays>().unwrap(), HalfDays::HALF);
    assert!("-1".parse::<HalfDays>().is_err());
    assert!("1.25".parse::<HalfDays>().is_err());
    assert_eq!(HalfDays::from_units(5).to_string(), "2.5");
    assert_eq!(HalfDays::whole_days(3).to_string(), "3");
}

#[test]
fn test_half_days_json_is_decimal() {
    let json: String = serde_json::to_string(&HalfDays::from_units(3)).unwrap();
    assert_eq!(json, "1.5");
    let parsed: HalfDays = serde_json::from_str("0.5").unwrap();
    assert_eq!(parsed, HalfDays::HALF);
    assert!(serde_json::from_str::<HalfDays>("0.75").is_err());
}

#[test]
fn test_cover_request_staleness() {
    let created = datetime!(2026-03-10 09:00 UTC);
    let request: CoverRequest = CoverRequest {
        cover_request_id: 1,
        leave_id: 1,
        cover_employee_id: 2,
        status: CoverRequestStatus::Pending,
        created_at: created,
        expires_at: created + Duration::hours(24),
        responded_at: None,
    };
    assert!(!request.is_stale_at(created + Duration::hours(23)));
    assert!(request.is_stale_at(created + Duration::hours(25)));

    let answered: CoverRequest = CoverRequest {
        status: CoverRequestStatus::Accepted,
        ..request
    };
    assert!(!answered.is_stale_at(created + Duration::hours(25)));
}

#[test]
fn test_parse_date() {
    assert_eq!(parse_date("2026-03-10").unwrap(), create_test_day(10));
    assert!(matches!(
        parse_date("10/03/2026"),
        Err(DomainError::DateParseError { .. })
    ));
}
