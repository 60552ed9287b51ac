// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every mutating handler follows the same shape:
//! - authorize the caller by role
//! - open one `BEGIN IMMEDIATE` transaction
//! - expire stale cover requests
//! - load the rows the decision needs, decide in the core, persist
//! - commit, then dispatch the resulting events
//!
//! Any failure before commit rolls back every write, including the sweep.

use leave_cover::{
    AdminDecision, ApplicationContext, ApplicationResult, CandidateCheck, Command, CoverDecision,
    LeaveEvent, LeaveState, ReassignmentContext, ReassignmentResult, TransitionResult, apply,
    rank_candidates, select_stale_requests,
};
use leave_cover_audit::{Actor, AuditEvent, Cause};
use leave_cover_domain::{
    AllotmentInputs, BalanceResolution, CoverCandidate, CoverDutyReassignment, CoverRequest,
    DateRange, Employee, HalfDayType, Leave, LeaveApplication, LeaveStatus, LeaveType,
    PublicHoliday, RankedCandidate, ReassignmentStatus, parse_date, resolve_balance,
};
use leave_cover_persistence::{
    LeaveFilter, LeaveStore, NewEmployee, PersistedApplication, Persistence, PersistenceError,
};
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AddPublicHolidayRequest, ApplyForLeaveRequest, ApplyForLeaveResponse, AuditEventInfo,
    AuditTimelineResponse, BalanceInfo, CandidateInfo, ConfirmEmployeeRequest, CoverRequestInfo,
    DecideLeaveRequest, EmployeeInfo, EmployeeResponse, GetLeaveResponse, HolidayInfo,
    HolidayResponse, LeaveBalanceResponse, LeaveInfo, LeaveTransitionResponse,
    ListCandidatesResponse, ListLeavesRequest, ListLeavesResponse, ListReassignmentsResponse,
    ReassignmentInfo, RegisterEmployeeRequest, ResolveReassignmentRequest,
    ResolveReassignmentResponse, RespondToCoverRequest, SweepResponse,
};
use crate::services::{LeavePolicies, LeaveServices};

/// Rows committed by a mutating handler and the events to dispatch afterwards.
type Committed<T> = (T, Vec<LeaveEvent>);

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}

fn parse_date_field(value: &str, field: &str) -> Result<Date, ApiError> {
    parse_date(value.trim()).map_err(|err| ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    })
}

fn require_text(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: String::from("must not be empty"),
        });
    }
    Ok(trimmed.to_string())
}

fn sweep_cause() -> Cause {
    Cause::new(
        String::from("cover-request-sweep"),
        String::from("Expire cover requests past their 24 hour window"),
    )
}

// ============================================================================
// Transaction helpers
// ============================================================================

/// Loads a leave and everything a transition on it needs.
fn load_leave_state(store: &mut LeaveStore<'_>, leave_id: i64) -> Result<LeaveState, ApiError> {
    let leave: Leave = store
        .leave(leave_id)?
        .ok_or_else(|| not_found("Leave", format!("Leave {leave_id} does not exist")))?;
    let applicant: Employee = store.employee(leave.employee_id)?.ok_or_else(|| {
        not_found(
            "Employee",
            format!("Employee {} does not exist", leave.employee_id),
        )
    })?;
    Ok(LeaveState {
        cover_request: store.cover_request(leave_id)?,
        stored_balance: store.balance(leave.employee_id)?,
        applicant,
        leave,
    })
}

/// Loads the rows the application pipeline checks against.
fn load_application_context(
    store: &mut LeaveStore<'_>,
    application: &LeaveApplication,
    today: Date,
) -> Result<ApplicationContext, ApiError> {
    let range: DateRange = application.range().map_err(translate_domain_error)?;
    let employee_id: i64 = application.employee_id;
    let applicant: Employee = store
        .employee(employee_id)?
        .ok_or_else(|| not_found("Employee", format!("Employee {employee_id} does not exist")))?;

    let (cover_employee, cover_employee_leaves) = match application.cover_employee_id {
        Some(cover_id) if application.leave_type.requires_cover() => (
            store.employee(cover_id)?,
            store.active_leaves(cover_id, range)?,
        ),
        _ => (None, Vec::new()),
    };

    Ok(ApplicationContext {
        applicant,
        cover_employee,
        holidays: store.holidays_in(range)?,
        applicant_leaves: store.active_leaves(employee_id, range)?,
        covering_assignments: store.covering_assignments(employee_id, range)?,
        cover_employee_leaves,
        stored_balance: store.balance(employee_id)?,
        today,
    })
}

/// Expires every cover request still pending past its expiry at `now`.
///
/// Idempotent: a request is only pending once, so a second sweep at the same
/// instant selects nothing.
fn sweep_expired(
    store: &mut LeaveStore<'_>,
    policies: &LeavePolicies,
    actor: Actor,
    cause: &Cause,
    now: OffsetDateTime,
) -> Result<Committed<Vec<i64>>, ApiError> {
    let pending: Vec<CoverRequest> = store.pending_cover_requests()?;
    let stale: Vec<i64> = select_stale_requests(&pending, now);
    let mut events: Vec<LeaveEvent> = Vec::new();

    for leave_id in &stale {
        let state: LeaveState = load_leave_state(store, *leave_id)?;
        let result: TransitionResult = apply(
            &state,
            Command::ExpireCoverRequest,
            policies.allotment.as_ref(),
            actor,
            cause.clone(),
            now,
        )
        .map_err(|err| translate_core_error(err, "sweep_expired_cover_requests"))?;
        store.persist_transition(&result)?;
        events.extend(result.events);
    }

    if stale.is_empty() {
        debug!("No stale cover requests");
    } else {
        info!(count = stale.len(), leave_ids = ?stale, "Expired stale cover requests");
    }
    Ok((stale, events))
}

/// Runs a command against an existing leave and dispatches its events.
fn run_transition(
    persistence: &mut Persistence,
    services: &LeaveServices,
    leave_id: i64,
    command: Command,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<LeaveTransitionResponse, ApiError> {
    let action: &'static str = command.action_name();
    let actor: Actor = authenticated_actor.to_audit_actor();
    let policies: &LeavePolicies = &services.policies;

    let (response, events) = persistence.in_transaction(
        |store| -> Result<Committed<LeaveTransitionResponse>, ApiError> {
            let (_, mut events) =
                sweep_expired(store, policies, Actor::system(), &sweep_cause(), now)?;
            let state: LeaveState = load_leave_state(store, leave_id)?;
            let result: TransitionResult = apply(
                &state,
                command,
                policies.allotment.as_ref(),
                actor,
                cause,
                now,
            )
            .map_err(|err| translate_core_error(err, action))?;
            let event_id: i64 = store.persist_transition(&result)?;

            let response: LeaveTransitionResponse = LeaveTransitionResponse {
                leave: LeaveInfo::from(&result.leave),
                cover_request: result.cover_request.as_ref().map(CoverRequestInfo::from),
                balance: result.balance_write.as_ref().map(BalanceInfo::from),
                event_id,
                message: format!(
                    "Leave {leave_id} is now {}",
                    result.leave.status.as_str()
                ),
            };
            events.extend(result.events);
            Ok((response, events))
        },
    )?;

    services.dispatcher.dispatch(persistence, &events);
    info!(
        leave_id,
        action,
        actor = %actor,
        status = %response.leave.status,
        event_id = response.event_id,
        "Leave transition committed"
    );
    Ok(response)
}

// ============================================================================
// Leave lifecycle
// ============================================================================

/// Parses an application request into the domain application.
fn parse_application(request: ApplyForLeaveRequest) -> Result<LeaveApplication, ApiError> {
    let leave_type: LeaveType = request
        .leave_type
        .trim()
        .parse()
        .map_err(translate_domain_error)?;
    let half_day_type: Option<HalfDayType> = request
        .half_day_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(translate_domain_error)?;

    Ok(LeaveApplication {
        employee_id: request.employee_id,
        leave_type,
        start_date: parse_date_field(&request.start_date, "start_date")?,
        end_date: parse_date_field(&request.end_date, "end_date")?,
        half_day_type,
        // Official leave never takes a cover employee.
        cover_employee_id: request
            .cover_employee_id
            .filter(|_| leave_type.requires_cover()),
        medical_cert_path: request
            .medical_cert_path
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty()),
        reason: request.reason,
    })
}

/// Applies for leave.
///
/// Runs the full application pipeline: eligibility, working-day count,
/// cover employee checks, overlap, balance and no-pay, and covering-duty
/// conflicts. On success the leave, its cover request, any balance write,
/// any reassignments and the audit event are committed together.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `services` - Engine policies and the notification dispatcher
/// * `request` - The application
/// * `authenticated_actor` - The applicant
/// * `cause` - The cause or reason for this action
/// * `now` - The current time
///
/// # Errors
///
/// Returns an error if:
/// - The caller is applying on someone else's behalf
/// - A field cannot be parsed
/// - Any rule of the pipeline rejects the application
/// - The database fails, in which case nothing is written
pub fn apply_for_leave(
    persistence: &mut Persistence,
    services: &LeaveServices,
    request: ApplyForLeaveRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApplyForLeaveResponse, ApiError> {
    AuthorizationService::authorize_apply_for_leave(authenticated_actor, request.employee_id)?;
    let application: LeaveApplication = parse_application(request)?;
    let actor: Actor = authenticated_actor.to_audit_actor();
    let policies: &LeavePolicies = &services.policies;

    let (response, events) = persistence.in_transaction(
        |store| -> Result<Committed<ApplyForLeaveResponse>, ApiError> {
            let (_, mut events) =
                sweep_expired(store, policies, Actor::system(), &sweep_cause(), now)?;
            let context: ApplicationContext =
                load_application_context(store, &application, now.date())?;
            let result: ApplicationResult = leave_cover::apply_for_leave(
                &context,
                &application,
                policies.allotment.as_ref(),
                actor,
                cause,
                now,
            )
            .map_err(|err| translate_core_error(err, "apply_for_leave"))?;
            let persisted: PersistedApplication = store.persist_application(&result)?;
            let cover_request: Option<CoverRequest> =
                store.cover_request(persisted.leave.leave_id)?;

            events.extend(result.events_for(&persisted.leave, &persisted.reassignment_ids));
            let response: ApplyForLeaveResponse = ApplyForLeaveResponse {
                message: format!(
                    "{} leave {} submitted with status {}",
                    persisted.leave.leave_type,
                    persisted.leave.leave_id,
                    persisted.leave.status
                ),
                leave: LeaveInfo::from(&persisted.leave),
                cover_request: cover_request.as_ref().map(CoverRequestInfo::from),
                reassignment_ids: persisted.reassignment_ids,
                event_id: persisted.event_id,
            };
            Ok((response, events))
        },
    )?;

    services.dispatcher.dispatch(persistence, &events);
    info!(
        leave_id = response.leave.leave_id,
        employee_id = response.leave.employee_id,
        leave_type = %response.leave.leave_type,
        total_days = %response.leave.total_days,
        is_no_pay = response.leave.is_no_pay,
        reassignments = response.reassignment_ids.len(),
        "Leave application committed"
    );
    Ok(response)
}

/// Answers the cover request of a leave.
///
/// Only the employee the request was sent to may answer, and only while it
/// is pending and unexpired. Declining requires a reason.
///
/// # Errors
///
/// Returns an error if the caller is not the requested cover employee, the
/// request is closed or expired, the reason is missing when declining, or the
/// database fails.
pub fn respond_to_cover_request(
    persistence: &mut Persistence,
    services: &LeaveServices,
    leave_id: i64,
    request: RespondToCoverRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<LeaveTransitionResponse, ApiError> {
    let decision: CoverDecision = if request.accept {
        CoverDecision::Accept
    } else {
        CoverDecision::Decline {
            reason: request.reason.unwrap_or_default(),
        }
    };
    run_transition(
        persistence,
        services,
        leave_id,
        Command::RespondToCover { decision },
        authenticated_actor,
        cause,
        now,
    )
}

/// Approves or declines a leave awaiting admin review.
///
/// Approval deducts the leave from the applicant's balance, creating or
/// resetting the balance row for the leave's year first.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the leave is not awaiting
/// review, or the database fails.
pub fn decide_leave(
    persistence: &mut Persistence,
    services: &LeaveServices,
    leave_id: i64,
    request: DecideLeaveRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<LeaveTransitionResponse, ApiError> {
    AuthorizationService::authorize_decide_leave(authenticated_actor)?;
    let decision: AdminDecision = if request.approve {
        AdminDecision::Approve {
            response: request.response,
        }
    } else {
        AdminDecision::Decline {
            response: request.response,
        }
    };
    run_transition(
        persistence,
        services,
        leave_id,
        Command::DecideLeave { decision },
        authenticated_actor,
        cause,
        now,
    )
}

/// Cancels a pending leave on behalf of its owner.
///
/// A pending cover request is closed and the cover employee is told.
///
/// # Errors
///
/// Returns an error if the caller does not own the leave, the leave is no
/// longer pending, or the database fails.
pub fn cancel_leave(
    persistence: &mut Persistence,
    services: &LeaveServices,
    leave_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<LeaveTransitionResponse, ApiError> {
    run_transition(
        persistence,
        services,
        leave_id,
        Command::CancelLeave,
        authenticated_actor,
        cause,
        now,
    )
}

/// Expires stale cover requests on demand.
///
/// The same sweep runs at the start of every mutating handler; this entry
/// point exists for schedulers and admins.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the database fails.
pub fn sweep_expired_cover_requests(
    persistence: &mut Persistence,
    services: &LeaveServices,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<SweepResponse, ApiError> {
    AuthorizationService::authorize_sweep(authenticated_actor)?;
    let actor: Actor = authenticated_actor.to_audit_actor();
    let policies: &LeavePolicies = &services.policies;

    let (expired_leave_ids, events) = persistence.in_transaction(
        |store| -> Result<Committed<Vec<i64>>, ApiError> {
            sweep_expired(store, policies, actor, &cause, now)
        },
    )?;

    services.dispatcher.dispatch(persistence, &events);
    Ok(SweepResponse {
        message: format!("Expired {} cover request(s)", expired_leave_ids.len()),
        expired_leave_ids,
    })
}

// ============================================================================
// Reassignments
// ============================================================================

/// Loads a reassignment and the approved leave it needs a cover for.
fn load_reassignment_context(
    store: &mut LeaveStore<'_>,
    reassignment_id: i64,
) -> Result<ReassignmentContext, ApiError> {
    let reassignment: CoverDutyReassignment =
        store.reassignment(reassignment_id)?.ok_or_else(|| {
            not_found(
                "Reassignment",
                format!("Reassignment {reassignment_id} does not exist"),
            )
        })?;
    let covered_leave: Leave = store
        .leave(reassignment.original_leave_id)?
        .ok_or_else(|| {
            not_found(
                "Leave",
                format!("Leave {} does not exist", reassignment.original_leave_id),
            )
        })?;
    Ok(ReassignmentContext {
        reassignment,
        covered_leave,
    })
}

/// Lists the ranked substitutes for a reassignment.
///
/// Every active employee is listed except the owner of the covered leave and
/// the cover employee who can no longer cover it. Employees on leave during
/// the covered dates are listed but not selectable.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the reassignment does not
/// exist, or the database fails.
pub fn list_reassignment_candidates(
    persistence: &mut Persistence,
    services: &LeaveServices,
    reassignment_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListCandidatesResponse, ApiError> {
    AuthorizationService::authorize_manage_reassignments(authenticated_actor)?;

    persistence.in_transaction(|store| -> Result<ListCandidatesResponse, ApiError> {
        let context: ReassignmentContext = load_reassignment_context(store, reassignment_id)?;
        let candidates: Vec<CoverCandidate> =
            store.candidate_workloads(context.covered_leave.range())?;
        let ranked: Vec<RankedCandidate> =
            rank_candidates(&context, candidates, services.policies.ranker.as_ref());

        Ok(ListCandidatesResponse {
            reassignment: ReassignmentInfo::from(&context.reassignment),
            covered_leave: LeaveInfo::from(&context.covered_leave),
            candidates: ranked.iter().map(CandidateInfo::from).collect(),
        })
    })
}

/// Assigns a substitute cover to a pending reassignment.
///
/// The substitute is re-validated inside the assigning transaction. If the
/// reassignment was resolved concurrently, or the substitute went on leave,
/// the call fails with `StaleAssignment` and the caller may reload and retry.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the reassignment does not
/// exist or is stale, or the database fails.
pub fn resolve_reassignment(
    persistence: &mut Persistence,
    services: &LeaveServices,
    reassignment_id: i64,
    request: ResolveReassignmentRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ResolveReassignmentResponse, ApiError> {
    AuthorizationService::authorize_manage_reassignments(authenticated_actor)?;
    let actor: Actor = authenticated_actor.to_audit_actor();
    let policies: &LeavePolicies = &services.policies;
    let new_cover_id: i64 = request.new_cover_employee_id;

    let (response, events) = persistence.in_transaction(
        |store| -> Result<Committed<ResolveReassignmentResponse>, ApiError> {
            let (_, mut events) =
                sweep_expired(store, policies, Actor::system(), &sweep_cause(), now)?;
            let context: ReassignmentContext = load_reassignment_context(store, reassignment_id)?;
            let check: CandidateCheck = CandidateCheck {
                candidate: store.employee(new_cover_id)?,
                candidate_leaves: store.active_leaves(new_cover_id, context.covered_leave.range())?,
            };
            let result: ReassignmentResult = leave_cover::resolve_reassignment(
                &context,
                &check,
                new_cover_id,
                actor,
                cause,
                now,
            )
            .map_err(|err| translate_core_error(err, "resolve_reassignment"))?;

            let event_id: i64 = store.persist_reassignment(&result).map_err(|err| match err {
                PersistenceError::NotFound(_) => ApiError::StaleAssignment {
                    reassignment_id,
                    message: String::from("it was resolved by another request"),
                },
                other => ApiError::from(other),
            })?;

            let response: ResolveReassignmentResponse = ResolveReassignmentResponse {
                reassignment: ReassignmentInfo::from(&result.reassignment),
                leave: LeaveInfo::from(&result.covered_leave),
                event_id,
                message: format!(
                    "Employee {new_cover_id} now covers leave {}",
                    result.covered_leave.leave_id
                ),
            };
            events.extend(result.events);
            Ok((response, events))
        },
    )?;

    services.dispatcher.dispatch(persistence, &events);
    info!(
        reassignment_id,
        leave_id = response.leave.leave_id,
        new_cover_employee_id = new_cover_id,
        "Cover reassignment committed"
    );
    Ok(response)
}

/// Lists reassignments, optionally restricted to PENDING or ASSIGNED.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the status is unknown, or
/// the database fails.
pub fn list_reassignments(
    persistence: &mut Persistence,
    status: Option<&str>,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListReassignmentsResponse, ApiError> {
    AuthorizationService::authorize_manage_reassignments(authenticated_actor)?;
    let status: Option<ReassignmentStatus> = status
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(translate_domain_error)?;

    let reassignments: Vec<CoverDutyReassignment> = persistence.list_reassignments(status)?;
    Ok(ListReassignmentsResponse {
        reassignments: reassignments.iter().map(ReassignmentInfo::from).collect(),
    })
}

// ============================================================================
// Reads
// ============================================================================

/// Retrieves a leave and its cover request.
///
/// Visible to admins, the owner, and the employee asked to cover it.
///
/// # Errors
///
/// Returns an error if the leave does not exist, the caller may not see it,
/// or the database fails.
pub fn get_leave(
    persistence: &mut Persistence,
    leave_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<GetLeaveResponse, ApiError> {
    let leave: Leave = persistence
        .get_leave(leave_id)?
        .ok_or_else(|| not_found("Leave", format!("Leave {leave_id} does not exist")))?;
    if leave.cover_employee_id != Some(authenticated_actor.employee_id) {
        AuthorizationService::authorize_view_records(authenticated_actor, leave.employee_id)?;
    }
    let cover_request: Option<CoverRequest> = persistence.get_cover_request(leave_id)?;

    Ok(GetLeaveResponse {
        leave: LeaveInfo::from(&leave),
        cover_request: cover_request.as_ref().map(CoverRequestInfo::from),
    })
}

/// Lists leaves, newest first.
///
/// Admins may list anyone's leaves; employees only ever see their own.
///
/// # Errors
///
/// Returns an error if an employee asks for someone else's leaves, the status
/// is unknown, or the database fails.
pub fn list_leaves(
    persistence: &mut Persistence,
    request: &ListLeavesRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListLeavesResponse, ApiError> {
    let employee_id: Option<i64> = if authenticated_actor.is_admin() {
        request.employee_id
    } else {
        let owner: i64 = request
            .employee_id
            .unwrap_or(authenticated_actor.employee_id);
        AuthorizationService::authorize_view_records(authenticated_actor, owner)?;
        Some(owner)
    };
    let status: Option<LeaveStatus> = request
        .status
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(translate_domain_error)?;

    let defaults: LeaveFilter = LeaveFilter::default();
    let filter: LeaveFilter = LeaveFilter {
        employee_id,
        status,
        limit: request.limit.unwrap_or(defaults.limit),
        offset: request.offset.unwrap_or(defaults.offset),
    };
    let leaves: Vec<Leave> = persistence.list_leaves(filter)?;
    Ok(ListLeavesResponse {
        leaves: leaves.iter().map(LeaveInfo::from).collect(),
    })
}

/// Returns an employee's balance for the year of `today`.
///
/// Balances are created lazily, so an employee who has never had a leave
/// approved has no row yet. In that case, or when the row belongs to an
/// earlier year, the response carries the allotment the row will be created
/// with and `stored` is false. Nothing is written.
///
/// # Errors
///
/// Returns an error if the caller may not see the balance, the employee does
/// not exist, or the database fails.
pub fn get_leave_balance(
    persistence: &mut Persistence,
    services: &LeaveServices,
    employee_id: i64,
    authenticated_actor: &AuthenticatedActor,
    today: Date,
) -> Result<LeaveBalanceResponse, ApiError> {
    AuthorizationService::authorize_view_records(authenticated_actor, employee_id)?;
    let employee: Employee = persistence
        .get_employee(employee_id)?
        .ok_or_else(|| not_found("Employee", format!("Employee {employee_id} does not exist")))?;

    let inputs: AllotmentInputs = AllotmentInputs {
        employee_id,
        year: today.year(),
        is_probation: employee.is_probation,
        confirmed_at: employee.confirmed_at,
    };
    let resolution: BalanceResolution = resolve_balance(
        persistence.get_balance(employee_id)?,
        &inputs,
        services.policies.allotment.as_ref(),
    );

    Ok(LeaveBalanceResponse {
        balance: BalanceInfo::from(resolution.balance()),
        stored: !resolution.needs_write(),
    })
}

/// Returns the audit timeline of a leave.
///
/// # Errors
///
/// Returns an error if the leave does not exist, the caller is neither an
/// admin nor the owner, or the database fails.
pub fn get_audit_timeline(
    persistence: &mut Persistence,
    leave_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AuditTimelineResponse, ApiError> {
    let leave: Leave = persistence
        .get_leave(leave_id)?
        .ok_or_else(|| not_found("Leave", format!("Leave {leave_id} does not exist")))?;
    AuthorizationService::authorize_view_records(authenticated_actor, leave.employee_id)?;

    let events: Vec<AuditEvent> = persistence.get_audit_timeline(leave_id)?;
    Ok(AuditTimelineResponse {
        leave_id,
        events: events.iter().map(AuditEventInfo::from).collect(),
    })
}

// ============================================================================
// Employees and holidays
// ============================================================================

/// Registers an employee.
///
/// The very first employee of an empty database may be registered by anyone,
/// but must be an admin. Every later registration requires an admin.
///
/// # Errors
///
/// Returns an error if the caller is not allowed, a field is invalid, the
/// email is already registered, or the database fails.
pub fn register_employee(
    persistence: &mut Persistence,
    request: RegisterEmployeeRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<EmployeeResponse, ApiError> {
    let bootstrapping: bool = persistence.list_employees()?.is_empty();
    if bootstrapping {
        if !request.is_admin {
            return Err(ApiError::DomainRuleViolation {
                rule: String::from("first_employee_is_admin"),
                message: String::from("The first registered employee must be an admin"),
            });
        }
    } else {
        AuthorizationService::authorize_manage_employees(authenticated_actor)?;
    }

    let name: String = require_text(&request.name, "name")?;
    let email: String = require_text(&request.email, "email")?;
    if !email.contains('@') {
        return Err(ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("'{email}' is not an email address"),
        });
    }
    let confirmed_at: Option<Date> = request
        .confirmed_at
        .as_deref()
        .map(|value| parse_date_field(value, "confirmed_at"))
        .transpose()?;
    if request.is_probation && confirmed_at.is_some() {
        return Err(ApiError::InvalidInput {
            field: String::from("confirmed_at"),
            message: String::from("An employee on probation has no confirmation date"),
        });
    }

    let employee_id: i64 = persistence
        .create_employee(&NewEmployee {
            name,
            email,
            is_admin: request.is_admin,
            admin_type: request
                .admin_type
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            is_probation: request.is_probation,
            confirmed_at,
        })
        .map_err(|err| match err {
            PersistenceError::Duplicate(_) => ApiError::Conflict {
                rule: String::from("unique_email"),
                message: format!("{} is already registered", request.email.trim()),
            },
            other => ApiError::from(other),
        })?;
    let employee: Employee = persistence.get_employee(employee_id)?.ok_or_else(|| {
        not_found("Employee", format!("Employee {employee_id} does not exist"))
    })?;

    info!(
        employee_id,
        is_admin = employee.is_admin,
        bootstrapping,
        "Registered employee"
    );
    Ok(EmployeeResponse {
        message: format!("Registered {} as employee {employee_id}", employee.name),
        employee: EmployeeInfo::from(&employee),
    })
}

/// Confirms an employee in service, ending their probation.
///
/// The new allotment applies from the next time the balance is created or
/// reset.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the date is invalid, the
/// employee does not exist, or the database fails.
pub fn confirm_employee(
    persistence: &mut Persistence,
    employee_id: i64,
    request: &ConfirmEmployeeRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<EmployeeResponse, ApiError> {
    AuthorizationService::authorize_manage_employees(authenticated_actor)?;
    let confirmed_at: Date = parse_date_field(&request.confirmed_at, "confirmed_at")?;

    persistence
        .set_employee_confirmation(employee_id, confirmed_at)
        .map_err(|err| match err {
            PersistenceError::NotFound(_) => {
                not_found("Employee", format!("Employee {employee_id} does not exist"))
            }
            other => ApiError::from(other),
        })?;
    let employee: Employee = persistence.get_employee(employee_id)?.ok_or_else(|| {
        not_found("Employee", format!("Employee {employee_id} does not exist"))
    })?;

    info!(employee_id, %confirmed_at, "Confirmed employee");
    Ok(EmployeeResponse {
        message: format!("Confirmed {} on {confirmed_at}", employee.name),
        employee: EmployeeInfo::from(&employee),
    })
}

/// Records a public holiday.
///
/// Only holidays whose description names a Mercantile or Poya category are
/// excluded from working-day counts; others are recorded for reference.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a field is invalid, the
/// holiday is already recorded, or the database fails.
pub fn add_public_holiday(
    persistence: &mut Persistence,
    request: &AddPublicHolidayRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<HolidayResponse, ApiError> {
    AuthorizationService::authorize_manage_employees(authenticated_actor)?;
    let date: Date = parse_date_field(&request.date, "date")?;
    let name: String = require_text(&request.name, "name")?;
    let holiday: PublicHoliday = PublicHoliday::new(date, &name, request.description.trim());

    let holiday_id: i64 = persistence
        .create_public_holiday(&holiday)
        .map_err(|err| match err {
            PersistenceError::Duplicate(_) => ApiError::Conflict {
                rule: String::from("unique_holiday"),
                message: format!("{name} on {date} is already recorded"),
            },
            other => ApiError::from(other),
        })?;

    let info: HolidayInfo = HolidayInfo::new(holiday_id, &holiday);
    info!(
        holiday_id,
        %date,
        is_non_working = info.is_non_working,
        "Recorded public holiday"
    );
    Ok(HolidayResponse {
        message: format!("Recorded {name} on {date}"),
        holiday: info,
    })
}
