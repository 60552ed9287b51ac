// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::{Arc, Mutex};

use leave_cover_audit::Cause;
use leave_cover_persistence::{NewEmployee, Persistence};
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

use crate::{
    ApplyForLeaveRequest, ApplyForLeaveResponse, AuthenticatedActor, DecideLeaveRequest,
    EmailSender, LeavePolicies, LeaveServices, Notification, NotificationDispatcher,
    NotificationError, NotificationSink, NotificationType, RespondToCoverRequest, Role,
    TemplatedEmail, apply_for_leave, decide_leave, respond_to_cover_request,
};

/// Records every delivery for later inspection.
#[derive(Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<Notification>>,
    emails: Mutex<Vec<TemplatedEmail>>,
}

impl RecordingSink {
    /// Drains the notifications recorded so far.
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock().unwrap())
    }

    /// Drains the emails recorded so far.
    pub fn take_emails(&self) -> Vec<TemplatedEmail> {
        std::mem::take(&mut *self.emails.lock().unwrap())
    }
}

impl NotificationSink for RecordingSink {
    fn create_notification(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

impl EmailSender for RecordingSink {
    fn send_templated_email(&self, email: &TemplatedEmail) -> Result<(), NotificationError> {
        self.emails.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Rejects every delivery.
pub struct FailingSink;

impl NotificationSink for FailingSink {
    fn create_notification(&self, _notification: &Notification) -> Result<(), NotificationError> {
        Err(NotificationError {
            channel: String::from("in-app"),
            reason: String::from("store unavailable"),
        })
    }
}

impl EmailSender for FailingSink {
    fn send_templated_email(&self, _email: &TemplatedEmail) -> Result<(), NotificationError> {
        Err(NotificationError {
            channel: String::from("email"),
            reason: String::from("relay unavailable"),
        })
    }
}

/// A populated database and the services handlers need.
pub struct TestFixture {
    pub persistence: Persistence,
    pub services: LeaveServices,
    pub sink: Arc<RecordingSink>,
    pub admin_id: i64,
    pub second_admin_id: i64,
    pub alice_id: i64,
    pub bob_id: i64,
    pub carol_id: i64,
    pub dave_id: i64,
}

impl TestFixture {
    pub const fn admin(&self) -> AuthenticatedActor {
        AuthenticatedActor::new(self.admin_id, Role::Admin)
    }

    pub const fn alice(&self) -> AuthenticatedActor {
        AuthenticatedActor::new(self.alice_id, Role::Employee)
    }

    pub const fn bob(&self) -> AuthenticatedActor {
        AuthenticatedActor::new(self.bob_id, Role::Employee)
    }

    pub const fn carol(&self) -> AuthenticatedActor {
        AuthenticatedActor::new(self.carol_id, Role::Employee)
    }

    /// Alice applies for annual leave on the Monday and Tuesday after
    /// [`create_test_now`], with Bob as cover.
    pub fn alice_applies(&mut self) -> ApplyForLeaveResponse {
        let request: ApplyForLeaveRequest =
            create_annual_request(self.alice_id, self.bob_id, "2026-03-09", "2026-03-10");
        let actor: AuthenticatedActor = self.alice();
        apply_for_leave(
            &mut self.persistence,
            &self.services,
            request,
            &actor,
            create_test_cause(),
            create_test_now(),
        )
        .expect("Alice's application should succeed")
    }

    /// Alice applies, Bob accepts and the admin approves.
    ///
    /// Returns the approved leave's id. Recorded deliveries are drained.
    pub fn create_approved_leave(&mut self) -> i64 {
        let leave_id: i64 = self.alice_applies().leave.leave_id;
        let bob: AuthenticatedActor = self.bob();
        respond_to_cover_request(
            &mut self.persistence,
            &self.services,
            leave_id,
            create_accept_request(),
            &bob,
            create_test_cause(),
            create_test_now(),
        )
        .expect("Bob should accept");
        let admin: AuthenticatedActor = self.admin();
        decide_leave(
            &mut self.persistence,
            &self.services,
            leave_id,
            create_approve_request(),
            &admin,
            create_test_cause(),
            create_test_now(),
        )
        .expect("Admin should approve");
        self.sink.take_notifications();
        self.sink.take_emails();
        leave_id
    }

    /// Returns the recorded notifications of one type, draining all of them.
    pub fn take_notifications_of(&self, kind: NotificationType) -> Vec<Notification> {
        self.sink
            .take_notifications()
            .into_iter()
            .filter(|n| n.notification_type == kind)
            .collect()
    }
}

fn create_test_employee(name: &str, email: &str, is_admin: bool) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        email: email.to_string(),
        is_admin,
        admin_type: is_admin.then(|| String::from("HR")),
        is_probation: false,
        confirmed_at: Some(date!(2020 - 01 - 01)),
    }
}

pub fn create_test_services(sink: Arc<RecordingSink>) -> LeaveServices {
    LeaveServices::new(
        LeavePolicies::default(),
        NotificationDispatcher::new(sink.clone(), sink),
    )
}

/// Two admins, three confirmed employees and one probationer.
pub fn setup_test_fixture() -> TestFixture {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create persistence");

    let admin_id: i64 = persistence
        .create_employee(&create_test_employee("Hana Admin", "hana@example.com", true))
        .unwrap();
    let second_admin_id: i64 = persistence
        .create_employee(&create_test_employee("Ravi Admin", "ravi@example.com", true))
        .unwrap();
    let alice_id: i64 = persistence
        .create_employee(&create_test_employee("Alice Perera", "alice@example.com", false))
        .unwrap();
    let bob_id: i64 = persistence
        .create_employee(&create_test_employee("Bob Silva", "bob@example.com", false))
        .unwrap();
    let carol_id: i64 = persistence
        .create_employee(&create_test_employee("Carol Fernando", "carol@example.com", false))
        .unwrap();
    let dave_id: i64 = persistence
        .create_employee(&NewEmployee {
            is_probation: true,
            confirmed_at: None,
            ..create_test_employee("Dave New", "dave@example.com", false)
        })
        .unwrap();

    let sink: Arc<RecordingSink> = Arc::new(RecordingSink::default());
    TestFixture {
        persistence,
        services: create_test_services(sink.clone()),
        sink,
        admin_id,
        second_admin_id,
        alice_id,
        bob_id,
        carol_id,
        dave_id,
    }
}

/// Monday 2026-03-02, 09:00 UTC.
pub const fn create_test_now() -> OffsetDateTime {
    datetime!(2026-03-02 09:00 UTC)
}

pub const fn create_test_today() -> Date {
    date!(2026 - 03 - 02)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-1"), String::from("API request"))
}

pub fn create_annual_request(
    employee_id: i64,
    cover_employee_id: i64,
    start_date: &str,
    end_date: &str,
) -> ApplyForLeaveRequest {
    ApplyForLeaveRequest {
        employee_id,
        leave_type: String::from("ANNUAL"),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        half_day_type: None,
        cover_employee_id: Some(cover_employee_id),
        medical_cert_path: None,
        reason: String::from("Family trip"),
    }
}

pub const fn create_accept_request() -> RespondToCoverRequest {
    RespondToCoverRequest {
        accept: true,
        reason: None,
    }
}

pub fn create_approve_request() -> DecideLeaveRequest {
    DecideLeaveRequest {
        approve: true,
        response: Some(String::from("Enjoy")),
    }
}
