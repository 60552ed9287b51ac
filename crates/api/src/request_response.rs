// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry dates and enum values as strings exactly as the caller
//! sent them; handlers parse and validate them. Responses render dates as
//! `YYYY-MM-DD` and timestamps as RFC 3339.

use leave_cover_audit::AuditEvent;
use leave_cover_domain::{
    CoverDutyReassignment, CoverRequest, Employee, HalfDays, Leave, LeaveBalance, PublicHoliday,
    RankedCandidate,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// Requests
// ============================================================================

/// API request to apply for leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyForLeaveRequest {
    /// The applicant.
    pub employee_id: i64,
    /// ANNUAL, CASUAL, MEDICAL or OFFICIAL.
    pub leave_type: String,
    /// First day (`YYYY-MM-DD`).
    pub start_date: String,
    /// Last day, inclusive (`YYYY-MM-DD`).
    pub end_date: String,
    /// FIRST_HALF or SECOND_HALF for half-day leave.
    pub half_day_type: Option<String>,
    /// The colleague asked to cover. Ignored for official leave.
    pub cover_employee_id: Option<i64>,
    /// Reference to an uploaded medical certificate.
    pub medical_cert_path: Option<String>,
    /// Free-text reason.
    pub reason: String,
}

/// API request answering a cover request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespondToCoverRequest {
    /// Whether the cover employee accepts.
    pub accept: bool,
    /// Why cover is declined. Required when `accept` is false.
    pub reason: Option<String>,
}

/// API request deciding a leave awaiting admin review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecideLeaveRequest {
    /// Whether the leave is approved.
    pub approve: bool,
    /// Optional message to the applicant.
    pub response: Option<String>,
}

/// API request listing leaves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListLeavesRequest {
    /// Restrict to one employee. Non-admins only ever see their own.
    pub employee_id: Option<i64>,
    /// Restrict to one status.
    pub status: Option<String>,
    /// Page size. Defaults to 50.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// API request resolving a cover reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveReassignmentRequest {
    /// The substitute cover employee.
    pub new_cover_employee_id: i64,
}

/// API request registering an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterEmployeeRequest {
    /// Full name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Whether the employee is an admin.
    pub is_admin: bool,
    /// Admin classification, e.g. "HR".
    pub admin_type: Option<String>,
    /// Whether the employee starts on probation.
    pub is_probation: bool,
    /// Confirmation date (`YYYY-MM-DD`) for employees already confirmed.
    pub confirmed_at: Option<String>,
}

/// API request confirming an employee in service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmEmployeeRequest {
    /// Confirmation date (`YYYY-MM-DD`).
    pub confirmed_at: String,
}

/// API request recording a public holiday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPublicHolidayRequest {
    /// The holiday (`YYYY-MM-DD`).
    pub date: String,
    /// Holiday name.
    pub name: String,
    /// Category description, e.g. "Public, Bank, Mercantile".
    pub description: String,
}

// ============================================================================
// Record views
// ============================================================================

/// A leave as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveInfo {
    /// The leave.
    pub leave_id: i64,
    /// The applicant.
    pub employee_id: i64,
    /// The leave type.
    pub leave_type: String,
    /// First day.
    pub start_date: String,
    /// Last day (inclusive).
    pub end_date: String,
    /// Working days requested.
    pub total_days: HalfDays,
    /// Free-text reason.
    pub reason: String,
    /// The cover employee.
    pub cover_employee_id: Option<i64>,
    /// Medical certificate reference.
    pub medical_cert_path: Option<String>,
    /// Current status.
    pub status: String,
    /// Whether the leave exceeded the balance when requested.
    pub is_no_pay: bool,
    /// Half-day type, if any.
    pub half_day_type: Option<String>,
    /// The deciding admin's message.
    pub admin_response: Option<String>,
    /// The cover employee's message, or the expiry notice.
    pub cover_response: Option<String>,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last change.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&Leave> for LeaveInfo {
    fn from(leave: &Leave) -> Self {
        Self {
            leave_id: leave.leave_id,
            employee_id: leave.employee_id,
            leave_type: leave.leave_type.as_str().to_string(),
            start_date: leave.start_date.to_string(),
            end_date: leave.end_date.to_string(),
            total_days: leave.total_days,
            reason: leave.reason.clone(),
            cover_employee_id: leave.cover_employee_id,
            medical_cert_path: leave.medical_cert_path.clone(),
            status: leave.status.as_str().to_string(),
            is_no_pay: leave.is_no_pay,
            half_day_type: leave.half_day_type.map(|h| h.as_str().to_string()),
            admin_response: leave.admin_response.clone(),
            cover_response: leave.cover_response.clone(),
            created_at: leave.created_at,
            updated_at: leave.updated_at,
        }
    }
}

/// A cover request as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverRequestInfo {
    /// The request.
    pub cover_request_id: i64,
    /// The leave it belongs to.
    pub leave_id: i64,
    /// Who is asked to cover.
    pub cover_employee_id: i64,
    /// Current status.
    pub status: String,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Expiry time, 24 hours after creation.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    /// When the request was answered or closed.
    #[serde(with = "time::serde::rfc3339::option")]
    pub responded_at: Option<OffsetDateTime>,
}

impl From<&CoverRequest> for CoverRequestInfo {
    fn from(request: &CoverRequest) -> Self {
        Self {
            cover_request_id: request.cover_request_id,
            leave_id: request.leave_id,
            cover_employee_id: request.cover_employee_id,
            status: request.status.as_str().to_string(),
            created_at: request.created_at,
            expires_at: request.expires_at,
            responded_at: request.responded_at,
        }
    }
}

/// A leave balance as returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceInfo {
    /// The employee.
    pub employee_id: i64,
    /// The year the buckets apply to.
    pub year: i32,
    /// Remaining annual leave.
    pub annual: HalfDays,
    /// Remaining casual leave.
    pub casual: HalfDays,
    /// Remaining medical leave.
    pub medical: HalfDays,
    /// Official leave taken.
    pub official: HalfDays,
}

impl From<&LeaveBalance> for BalanceInfo {
    fn from(balance: &LeaveBalance) -> Self {
        Self {
            employee_id: balance.employee_id,
            year: balance.year,
            annual: balance.annual,
            casual: balance.casual,
            medical: balance.medical,
            official: balance.official,
        }
    }
}

/// A cover reassignment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentInfo {
    /// The reassignment.
    pub reassignment_id: i64,
    /// The approved leave that needs a cover.
    pub original_leave_id: i64,
    /// The cover employee's own leave that caused the conflict.
    pub cover_employee_leave_id: i64,
    /// The employee who can no longer cover.
    pub original_cover_employee_id: i64,
    /// PENDING or ASSIGNED.
    pub status: String,
    /// The substitute, once assigned.
    pub new_cover_employee_id: Option<i64>,
    /// When the conflict was detected.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When it was resolved.
    #[serde(with = "time::serde::rfc3339::option")]
    pub resolved_at: Option<OffsetDateTime>,
}

impl From<&CoverDutyReassignment> for ReassignmentInfo {
    fn from(reassignment: &CoverDutyReassignment) -> Self {
        Self {
            reassignment_id: reassignment.reassignment_id,
            original_leave_id: reassignment.original_leave_id,
            cover_employee_leave_id: reassignment.cover_employee_leave_id,
            original_cover_employee_id: reassignment.original_cover_employee_id,
            status: reassignment.status.as_str().to_string(),
            new_cover_employee_id: reassignment.new_cover_employee_id,
            created_at: reassignment.created_at,
            resolved_at: reassignment.resolved_at,
        }
    }
}

/// A ranked substitute cover candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    /// The candidate.
    pub employee_id: i64,
    /// Display name.
    pub name: String,
    /// 1-based rank.
    pub rank: u32,
    /// Whether the candidate may be picked.
    pub selectable: bool,
    /// Whether the candidate is on leave during the window.
    pub on_leave: bool,
    /// Cover requests awaiting the candidate's answer.
    pub pending_cover_requests: u32,
    /// Approved leaves the candidate covers during the window.
    pub covering_duties: u32,
    /// Workload score. Lower is preferred.
    pub workload: u32,
}

impl From<&RankedCandidate> for CandidateInfo {
    fn from(ranked: &RankedCandidate) -> Self {
        Self {
            employee_id: ranked.candidate.employee_id,
            name: ranked.candidate.name.clone(),
            rank: ranked.rank,
            selectable: ranked.selectable,
            on_leave: ranked.candidate.on_leave,
            pending_cover_requests: ranked.candidate.pending_cover_requests,
            covering_duties: ranked.candidate.covering_duties,
            workload: ranked.candidate.workload(),
        }
    }
}

/// An audit event as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    /// The event.
    pub event_id: Option<i64>,
    /// The leave the event belongs to.
    pub leave_id: i64,
    /// EMPLOYEE, ADMIN or SYSTEM.
    pub actor_role: String,
    /// The acting employee, absent for the system.
    pub actor_employee_id: Option<i64>,
    /// The cause identifier.
    pub cause_id: String,
    /// The cause description.
    pub cause_description: String,
    /// The action name.
    pub action_name: String,
    /// The action details.
    pub action_details: Option<String>,
    /// Leave state before the action (JSON).
    pub before_snapshot: String,
    /// Leave state after the action (JSON).
    pub after_snapshot: String,
    /// When the action happened.
    #[serde(with = "time::serde::rfc3339")]
    pub occurred_at: OffsetDateTime,
}

impl From<&AuditEvent> for AuditEventInfo {
    fn from(event: &AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            leave_id: event.leave_id,
            actor_role: event.actor.role.as_str().to_string(),
            actor_employee_id: event.actor.employee_id,
            cause_id: event.cause.id.clone(),
            cause_description: event.cause.description.clone(),
            action_name: event.action.name.clone(),
            action_details: event.action.details.clone(),
            before_snapshot: event.before.data.clone(),
            after_snapshot: event.after.data.clone(),
            occurred_at: event.occurred_at,
        }
    }
}

/// An employee as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInfo {
    /// The employee.
    pub employee_id: i64,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Whether the employee is an admin.
    pub is_admin: bool,
    /// Admin classification.
    pub admin_type: Option<String>,
    /// Whether the employee is active.
    pub is_active: bool,
    /// Whether the employee is on probation.
    pub is_probation: bool,
    /// Confirmation date.
    pub confirmed_at: Option<String>,
}

impl From<&Employee> for EmployeeInfo {
    fn from(employee: &Employee) -> Self {
        Self {
            employee_id: employee.employee_id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            is_admin: employee.is_admin,
            admin_type: employee.admin_type.clone(),
            is_active: employee.is_active,
            is_probation: employee.is_probation,
            confirmed_at: employee.confirmed_at.map(|date| date.to_string()),
        }
    }
}

/// A public holiday as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayInfo {
    /// The holiday.
    pub holiday_id: i64,
    /// The date.
    pub date: String,
    /// Holiday name.
    pub name: String,
    /// Category description.
    pub description: String,
    /// Whether the holiday is excluded from working-day counts.
    pub is_non_working: bool,
}

impl HolidayInfo {
    /// Builds the view of a stored holiday.
    #[must_use]
    pub fn new(holiday_id: i64, holiday: &PublicHoliday) -> Self {
        Self {
            holiday_id,
            date: holiday.date.to_string(),
            name: holiday.name.clone(),
            description: holiday.description.clone(),
            is_non_working: holiday.category().is_non_working(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// API response for a successful leave application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyForLeaveResponse {
    /// The stored leave.
    pub leave: LeaveInfo,
    /// Its cover request, for leave types that need cover.
    pub cover_request: Option<CoverRequestInfo>,
    /// Reassignments opened because the applicant was covering someone.
    pub reassignment_ids: Vec<i64>,
    /// The audit event ID.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for a transition on an existing leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTransitionResponse {
    /// The leave after the transition.
    pub leave: LeaveInfo,
    /// The cover request, when the transition changed it.
    pub cover_request: Option<CoverRequestInfo>,
    /// The balance, when the transition changed it.
    pub balance: Option<BalanceInfo>,
    /// The audit event ID.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for an explicit expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResponse {
    /// Leaves whose cover requests were expired.
    pub expired_leave_ids: Vec<i64>,
    /// A summary message.
    pub message: String,
}

/// API response for a single leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLeaveResponse {
    /// The leave.
    pub leave: LeaveInfo,
    /// Its cover request, if any.
    pub cover_request: Option<CoverRequestInfo>,
}

/// API response listing leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLeavesResponse {
    /// The page of leaves, newest first.
    pub leaves: Vec<LeaveInfo>,
}

/// API response for an employee's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalanceResponse {
    /// The balance for the requested year.
    pub balance: BalanceInfo,
    /// False when the row does not exist yet or belongs to another year and
    /// the figures are the allotment it will be created with.
    pub stored: bool,
}

/// API response listing reassignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReassignmentsResponse {
    /// The reassignments, oldest first.
    pub reassignments: Vec<ReassignmentInfo>,
}

/// API response listing substitute candidates for a reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCandidatesResponse {
    /// The reassignment.
    pub reassignment: ReassignmentInfo,
    /// The leave that needs a new cover.
    pub covered_leave: LeaveInfo,
    /// Ranked candidates, best first.
    pub candidates: Vec<CandidateInfo>,
}

/// API response for a resolved reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveReassignmentResponse {
    /// The reassignment, now assigned.
    pub reassignment: ReassignmentInfo,
    /// The covered leave with its new cover.
    pub leave: LeaveInfo,
    /// The audit event ID.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for a leave's audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimelineResponse {
    /// The leave.
    pub leave_id: i64,
    /// Events in the order they happened.
    pub events: Vec<AuditEventInfo>,
}

/// API response for employee registration or confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResponse {
    /// The employee as stored.
    pub employee: EmployeeInfo,
    /// A success message.
    pub message: String,
}

/// API response for a recorded holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayResponse {
    /// The holiday as stored.
    pub holiday: HolidayInfo,
    /// A success message.
    pub message: String,
}
