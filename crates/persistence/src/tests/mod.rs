// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod query_tests;

use crate::{LeaveStore, NewEmployee, Persistence, PersistedApplication, PersistenceError};
use leave_cover::{
    AdminDecision, ApplicationContext, Command, CoreError, CoverDecision, LeaveState,
    TransitionResult, apply, apply_for_leave,
};
use leave_cover_audit::{Actor, Cause};
use leave_cover_domain::{DateRange, LeaveApplication, LeaveType, StandardAllotment};
use time::macros::datetime;
use time::{Date, Month, OffsetDateTime};

/// Either failure a test transaction can roll back on.
#[derive(Debug)]
pub enum TestError {
    Persistence(PersistenceError),
    Core(CoreError),
}

impl From<PersistenceError> for TestError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

impl From<CoreError> for TestError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

/// Returns a date in March 2026. Day 1 is a Sunday.
pub fn day(day: u8) -> Date {
    Date::from_calendar_date(2026, Month::March, day).unwrap()
}

/// Tuesday 2026-03-03, 09:00 UTC.
pub fn create_test_now() -> OffsetDateTime {
    datetime!(2026-03-03 09:00 UTC)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Registers a confirmed employee and returns their ID.
pub fn create_test_employee(persistence: &mut Persistence, name: &str, is_admin: bool) -> i64 {
    persistence
        .create_employee(&NewEmployee {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            is_admin,
            admin_type: is_admin.then(|| String::from("HR")),
            is_probation: false,
            confirmed_at: Some(Date::from_calendar_date(2020, Month::January, 6).unwrap()),
        })
        .unwrap()
}

pub fn create_test_application(
    employee_id: i64,
    cover_employee_id: Option<i64>,
    leave_type: LeaveType,
    start_day: u8,
    end_day: u8,
) -> LeaveApplication {
    LeaveApplication {
        employee_id,
        leave_type,
        start_date: day(start_day),
        end_date: day(end_day),
        half_day_type: None,
        cover_employee_id,
        medical_cert_path: None,
        reason: String::from("  Family event "),
    }
}

fn load_test_context(
    store: &mut LeaveStore<'_>,
    application: &LeaveApplication,
) -> Result<ApplicationContext, PersistenceError> {
    let range: DateRange = DateRange::new(application.start_date, application.end_date).unwrap();
    let employee_id: i64 = application.employee_id;
    let (cover_employee, cover_employee_leaves) = match application.cover_employee_id {
        Some(cover_id) => (store.employee(cover_id)?, store.active_leaves(cover_id, range)?),
        None => (None, Vec::new()),
    };

    Ok(ApplicationContext {
        applicant: store.employee(employee_id)?.unwrap(),
        cover_employee,
        holidays: store.holidays_in(range)?,
        applicant_leaves: store.active_leaves(employee_id, range)?,
        covering_assignments: store.covering_assignments(employee_id, range)?,
        cover_employee_leaves,
        stored_balance: store.balance(employee_id)?,
        today: create_test_now().date(),
    })
}

/// Runs the application pipeline and persists the result in one transaction.
pub fn apply_test_leave(
    persistence: &mut Persistence,
    application: &LeaveApplication,
) -> Result<PersistedApplication, TestError> {
    persistence.in_transaction(|store| {
        let context: ApplicationContext = load_test_context(store, application)?;
        let result = apply_for_leave(
            &context,
            application,
            &StandardAllotment,
            Actor::employee(application.employee_id),
            create_test_cause(),
            create_test_now(),
        )?;
        Ok(store.persist_application(&result)?)
    })
}

/// Applies `command` to a stored leave and persists the result in one transaction.
pub fn transition_test_leave(
    persistence: &mut Persistence,
    leave_id: i64,
    command: Command,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, TestError> {
    persistence.in_transaction(|store| {
        let leave = store.leave(leave_id)?.unwrap();
        let state: LeaveState = LeaveState {
            cover_request: store.cover_request(leave_id)?,
            applicant: store.employee(leave.employee_id)?.unwrap(),
            stored_balance: store.balance(leave.employee_id)?,
            leave,
        };
        let result: TransitionResult = apply(
            &state,
            command,
            &StandardAllotment,
            actor,
            create_test_cause(),
            now,
        )?;
        store.persist_transition(&result)?;
        Ok(result)
    })
}

/// Takes a leave through cover acceptance and admin approval.
pub fn approve_test_leave(
    persistence: &mut Persistence,
    leave_id: i64,
    cover_id: i64,
    admin_id: i64,
) {
    transition_test_leave(
        persistence,
        leave_id,
        Command::RespondToCover {
            decision: CoverDecision::Accept,
        },
        Actor::employee(cover_id),
        create_test_now(),
    )
    .unwrap();
    transition_test_leave(
        persistence,
        leave_id,
        Command::DecideLeave {
            decision: AdminDecision::Approve { response: None },
        },
        Actor::admin(admin_id),
        create_test_now(),
    )
    .unwrap();
}
