// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The leave application pipeline.
//!
//! Eligibility, day count, cover sanity, overlap, balance and covering-duty
//! checks all run against a context loaded inside the caller's transaction.
//! Nothing here writes; the result describes every row the caller must insert.

use crate::error::CoreError;
use crate::event::LeaveSummary;
use crate::state::{
    ApplicationContext, ApplicationResult, NewCoverRequest, NewLeave, NewReassignment,
};
use leave_cover_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use leave_cover_domain::{
    AllotmentInputs, AllotmentPolicy, BalanceResolution, DateRange, DomainError, Employee, HalfDays,
    HolidaySet, Leave, LeaveApplication, check_covering_conflict, check_no_pay, ensure_no_overlap,
    find_covering_assignments, find_overlapping_leave, requested_days, resolve_balance,
    validate_application,
};
use time::OffsetDateTime;

/// Checks that the nominated cover employee can take on the leave.
fn validate_cover_employee(
    cover: Option<&Employee>,
    range: DateRange,
    cover_leaves: &[Leave],
) -> Result<i64, DomainError> {
    let cover: &Employee =
        cover.ok_or_else(|| DomainError::validation("The selected cover employee does not exist"))?;
    if !cover.is_active {
        return Err(DomainError::validation(format!(
            "{} is not an active employee and cannot cover leave",
            cover.name
        )));
    }
    if let Some(conflict) = find_overlapping_leave(cover.employee_id, range, cover_leaves) {
        return Err(DomainError::validation(format!(
            "{} is on {} leave from {} to {} and cannot cover these dates",
            cover.name, conflict.leave_type, conflict.start_date, conflict.end_date
        )));
    }
    Ok(cover.employee_id)
}

/// Runs the application pipeline for a new leave.
///
/// # Arguments
///
/// * `context` - Rows loaded inside the transaction
/// * `application` - The applicant-supplied fields
/// * `policy` - The allotment policy used to create or reset the balance
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The current time
///
/// # Returns
///
/// The rows to insert and the audit event for the new leave.
///
/// # Errors
///
/// Returns an error if:
/// - The application breaks an eligibility rule
/// - The nominated cover employee is missing, inactive or on leave
/// - The dates overlap one of the applicant's active leaves
/// - The applicant is covering an approved leave and the type is not medical
pub fn apply_for_leave(
    context: &ApplicationContext,
    application: &LeaveApplication,
    policy: &dyn AllotmentPolicy,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApplicationResult, CoreError> {
    let applicant: &Employee = &context.applicant;
    if application.employee_id != applicant.employee_id {
        return Err(CoreError::forbidden(
            "Employees can only apply for their own leave",
        ));
    }
    if !applicant.is_active {
        return Err(CoreError::forbidden(
            "Inactive employees cannot apply for leave",
        ));
    }

    let range: DateRange = application.range()?;
    let holidays: HolidaySet = HolidaySet::from_holidays(&context.holidays);
    let total_days: HalfDays = requested_days(
        application.leave_type,
        range,
        application.half_day_type,
        &holidays,
    )?;
    validate_application(application, total_days, context.today)?;

    let cover_employee_id: Option<i64> = if application.leave_type.requires_cover() {
        Some(validate_cover_employee(
            context.cover_employee.as_ref(),
            range,
            &context.cover_employee_leaves,
        )?)
    } else {
        None
    };

    ensure_no_overlap(applicant.employee_id, range, &context.applicant_leaves)?;

    let inputs: AllotmentInputs = AllotmentInputs {
        employee_id: applicant.employee_id,
        year: range.start().year(),
        is_probation: applicant.is_probation,
        confirmed_at: applicant.confirmed_at,
    };
    let resolution: BalanceResolution = resolve_balance(context.stored_balance, &inputs, policy);
    let is_no_pay: bool = check_no_pay(resolution.balance(), application.leave_type, total_days);

    let assignments: Vec<&Leave> = check_covering_conflict(
        application.leave_type,
        find_covering_assignments(applicant.employee_id, range, &context.covering_assignments),
    )?;
    let reassignments: Vec<NewReassignment> = assignments
        .into_iter()
        .map(|covered| NewReassignment {
            covered_leave: LeaveSummary::from(covered),
            original_cover_employee_id: applicant.employee_id,
            created_at: now,
        })
        .collect();

    let new_leave: NewLeave = NewLeave {
        employee_id: applicant.employee_id,
        leave_type: application.leave_type,
        start_date: range.start(),
        end_date: range.end(),
        total_days,
        reason: application.reason.trim().to_string(),
        cover_employee_id,
        medical_cert_path: application.medical_cert_path.clone(),
        status: application.leave_type.initial_status(),
        is_no_pay,
        half_day_type: application.half_day_type,
        created_at: now,
    };
    let cover_request: Option<NewCoverRequest> =
        cover_employee_id.map(|cover| NewCoverRequest::new(cover, now));

    let action: Action = Action::new(
        String::from("ApplyForLeave"),
        Some(format!(
            "{} leave {range} ({total_days} days){}{}",
            application.leave_type,
            if is_no_pay { ", no-pay" } else { "" },
            if reassignments.is_empty() {
                String::new()
            } else {
                format!(", {} cover reassignment(s) opened", reassignments.len())
            }
        )),
    );
    // Leave id is bound once the row exists.
    let audit_event: AuditEvent = AuditEvent::new(
        0,
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        StateSnapshot::capture(&new_leave)?,
        now,
    );

    Ok(ApplicationResult {
        new_leave,
        cover_request,
        balance_write: resolution.needs_write().then(|| *resolution.balance()),
        reassignments,
        audit_event,
    })
}
