// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Overlap and covering-duty conflict detection.

use crate::date_range::DateRange;
use crate::error::DomainError;
use crate::types::{Leave, LeaveStatus, LeaveType};
use serde::{Deserialize, Serialize};
use time::Date;

/// The existing leave an application collided with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveConflict {
    /// The conflicting leave.
    pub leave_id: i64,
    /// Its type.
    pub leave_type: LeaveType,
    /// Its first day.
    pub start_date: Date,
    /// Its last day.
    pub end_date: Date,
    /// Its current status.
    pub status: LeaveStatus,
}

impl From<&Leave> for LeaveConflict {
    fn from(leave: &Leave) -> Self {
        Self {
            leave_id: leave.leave_id,
            leave_type: leave.leave_type,
            start_date: leave.start_date,
            end_date: leave.end_date,
            status: leave.status,
        }
    }
}

/// Finds the first active leave of `employee_id` overlapping `range`.
///
/// Leaves of other employees and leaves in terminal states other than
/// `Approved` are ignored, so callers may pass an unfiltered list.
#[must_use]
pub fn find_overlapping_leave(
    employee_id: i64,
    range: DateRange,
    existing: &[Leave],
) -> Option<LeaveConflict> {
    existing
        .iter()
        .filter(|leave| leave.employee_id == employee_id && leave.status.is_active())
        .find(|leave| leave.range().overlaps(&range))
        .map(LeaveConflict::from)
}

/// Fails with `DomainError::OverlappingLeave` if the employee already has an
/// active leave overlapping `range`.
///
/// # Errors
///
/// Returns the conflicting leave wrapped in `DomainError::OverlappingLeave`.
pub fn ensure_no_overlap(
    employee_id: i64,
    range: DateRange,
    existing: &[Leave],
) -> Result<(), DomainError> {
    find_overlapping_leave(employee_id, range, existing)
        .map_or(Ok(()), |conflict| Err(DomainError::OverlappingLeave(conflict)))
}

/// Returns the approved leaves that `cover_employee_id` is covering during `range`.
#[must_use]
pub fn find_covering_assignments<'a>(
    cover_employee_id: i64,
    range: DateRange,
    leaves: &'a [Leave],
) -> Vec<&'a Leave> {
    leaves
        .iter()
        .filter(|leave| {
            leave.cover_employee_id == Some(cover_employee_id)
                && leave.status == LeaveStatus::Approved
                && leave.range().overlaps(&range)
        })
        .collect()
}

/// Applies the covering-duty policy to the assignments found for an applicant.
///
/// An employee who is covering someone else's approved leave may only apply
/// for medical leave over the same dates. Medical leave proceeds and the
/// returned assignments each need a substitute cover.
///
/// # Errors
///
/// Returns `DomainError::CoveringConflict` if assignments exist and the
/// requested type is not medical.
pub fn check_covering_conflict<'a>(
    leave_type: LeaveType,
    assignments: Vec<&'a Leave>,
) -> Result<Vec<&'a Leave>, DomainError> {
    if assignments.is_empty() || leave_type == LeaveType::Medical {
        return Ok(assignments);
    }
    Err(DomainError::CoveringConflict {
        covered_leave_ids: assignments.iter().map(|leave| leave.leave_id).collect(),
    })
}
