// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{HalfDays, Leave, LeaveApplication, LeaveStatus, LeaveType};
use time::macros::datetime;
use time::{Date, Month};

/// Returns a date in March 2026. Day 1 is a Sunday.
pub fn create_test_day(day: u8) -> Date {
    Date::from_calendar_date(2026, Month::March, day).unwrap()
}

pub fn create_test_leave(
    leave_id: i64,
    employee_id: i64,
    start_day: u8,
    end_day: u8,
    status: LeaveStatus,
) -> Leave {
    Leave {
        leave_id,
        employee_id,
        leave_type: LeaveType::Annual,
        start_date: create_test_day(start_day),
        end_date: create_test_day(end_day),
        total_days: HalfDays::whole_days(u32::from(end_day - start_day) + 1),
        reason: String::from("Family trip"),
        cover_employee_id: Some(employee_id + 100),
        medical_cert_path: None,
        status,
        is_no_pay: false,
        half_day_type: None,
        admin_response: None,
        cover_response: None,
        created_at: datetime!(2026-02-20 09:00 UTC),
        updated_at: datetime!(2026-02-20 09:00 UTC),
    }
}

pub fn create_test_application(
    leave_type: LeaveType,
    start_day: u8,
    end_day: u8,
) -> LeaveApplication {
    LeaveApplication {
        employee_id: 1,
        leave_type,
        start_date: create_test_day(start_day),
        end_date: create_test_day(end_day),
        half_day_type: None,
        cover_employee_id: Some(2),
        medical_cert_path: None,
        reason: String::from("Personal"),
    }
}
