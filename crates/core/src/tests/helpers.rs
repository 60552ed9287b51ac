// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApplicationContext, LeaveState};
use leave_cover_audit::Cause;
use leave_cover_domain::{
    CoverRequest, CoverRequestStatus, Employee, HalfDays, Leave, LeaveApplication, LeaveBalance,
    LeaveStatus, LeaveType,
};
use time::macros::datetime;
use time::{Date, Month, OffsetDateTime};

pub const APPLICANT: i64 = 1;
pub const COVER: i64 = 2;
pub const ADMIN: i64 = 9;

/// Returns a date in March 2026. Day 1 is a Sunday.
pub fn day(day: u8) -> Date {
    Date::from_calendar_date(2026, Month::March, day).unwrap()
}

/// Tuesday 2026-03-03, 09:00 UTC.
pub fn create_test_now() -> OffsetDateTime {
    datetime!(2026-03-03 09:00 UTC)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn create_test_employee(employee_id: i64) -> Employee {
    Employee {
        employee_id,
        name: format!("Employee {employee_id}"),
        email: format!("employee{employee_id}@example.com"),
        is_admin: employee_id == ADMIN,
        admin_type: None,
        is_active: true,
        is_probation: false,
        confirmed_at: Some(day(1).replace_year(2020).unwrap()),
    }
}

pub fn create_test_balance(employee_id: i64, annual: u32) -> LeaveBalance {
    LeaveBalance {
        employee_id,
        year: 2026,
        annual: HalfDays::whole_days(annual),
        casual: HalfDays::whole_days(7),
        medical: HalfDays::whole_days(21),
        official: HalfDays::ZERO,
    }
}

pub fn create_test_leave(
    leave_id: i64,
    employee_id: i64,
    start_day: u8,
    end_day: u8,
    status: LeaveStatus,
    cover_employee_id: Option<i64>,
) -> Leave {
    Leave {
        leave_id,
        employee_id,
        leave_type: LeaveType::Annual,
        start_date: day(start_day),
        end_date: day(end_day),
        total_days: HalfDays::whole_days(u32::from(end_day - start_day) + 1),
        reason: String::from("Holiday"),
        cover_employee_id,
        medical_cert_path: None,
        status,
        is_no_pay: false,
        half_day_type: None,
        admin_response: None,
        cover_response: None,
        created_at: create_test_now(),
        updated_at: create_test_now(),
    }
}

pub fn create_test_application(
    leave_type: LeaveType,
    start_day: u8,
    end_day: u8,
) -> LeaveApplication {
    LeaveApplication {
        employee_id: APPLICANT,
        leave_type,
        start_date: day(start_day),
        end_date: day(end_day),
        half_day_type: None,
        cover_employee_id: leave_type.requires_cover().then_some(COVER),
        medical_cert_path: None,
        reason: String::from("  Family event "),
    }
}

pub fn create_test_context() -> ApplicationContext {
    ApplicationContext {
        applicant: create_test_employee(APPLICANT),
        cover_employee: Some(create_test_employee(COVER)),
        holidays: Vec::new(),
        applicant_leaves: Vec::new(),
        covering_assignments: Vec::new(),
        cover_employee_leaves: Vec::new(),
        stored_balance: Some(create_test_balance(APPLICANT, 14)),
        today: create_test_now().date(),
    }
}

pub fn create_test_cover_request(leave_id: i64, status: CoverRequestStatus) -> CoverRequest {
    let created: OffsetDateTime = create_test_now();
    CoverRequest {
        cover_request_id: 100 + leave_id,
        leave_id,
        cover_employee_id: COVER,
        status,
        created_at: created,
        expires_at: created + crate::COVER_REQUEST_TTL,
        responded_at: None,
    }
}

/// A leave of APPLICANT for days 9..10 in the given status, with its cover request.
pub fn create_test_state(status: LeaveStatus, request_status: CoverRequestStatus) -> LeaveState {
    LeaveState {
        leave: create_test_leave(5, APPLICANT, 9, 10, status, Some(COVER)),
        cover_request: Some(create_test_cover_request(5, request_status)),
        applicant: create_test_employee(APPLICANT),
        stored_balance: Some(create_test_balance(APPLICANT, 14)),
    }
}
