// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the leave cover engine.
//!
//! Handlers authorize the caller, run each operation inside one persistence
//! transaction, translate core errors into [`ApiError`] and dispatch
//! notifications once the transaction has committed.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod notifications;
mod request_response;
mod services;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub, parse_role};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    add_public_holiday, apply_for_leave, cancel_leave, confirm_employee, decide_leave,
    get_audit_timeline, get_leave, get_leave_balance, list_leaves, list_reassignment_candidates,
    list_reassignments, register_employee, resolve_reassignment, respond_to_cover_request,
    sweep_expired_cover_requests,
};
pub use notifications::{
    DispatchReport, EmailSender, Notification, NotificationDispatcher, NotificationError,
    NotificationSink, NotificationType, TemplatedEmail,
};
pub use request_response::{
    AddPublicHolidayRequest, ApplyForLeaveRequest, ApplyForLeaveResponse, AuditEventInfo,
    AuditTimelineResponse, BalanceInfo, CandidateInfo, ConfirmEmployeeRequest, CoverRequestInfo,
    DecideLeaveRequest, EmployeeInfo, EmployeeResponse, GetLeaveResponse, HolidayInfo,
    HolidayResponse, LeaveBalanceResponse, LeaveInfo, LeaveTransitionResponse,
    ListCandidatesResponse, ListLeavesRequest, ListLeavesResponse, ListReassignmentsResponse,
    ReassignmentInfo, RegisterEmployeeRequest, ResolveReassignmentRequest,
    ResolveReassignmentResponse, RespondToCoverRequest, SweepResponse,
};
pub use services::{LeavePolicies, LeaveServices};
