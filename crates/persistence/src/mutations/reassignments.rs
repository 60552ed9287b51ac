// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover::NewReassignment;
use leave_cover_domain::{CoverDutyReassignment, ReassignmentStatus};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::cover_duty_reassignments;
use crate::error::PersistenceError;

/// Opens a pending reassignment for a covered leave.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `reassignment` - The covered leave and the cover employee who left
/// * `cover_employee_leave_id` - The new leave that caused the conflict
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_reassignment(
    conn: &mut SqliteConnection,
    reassignment: &NewReassignment,
    cover_employee_leave_id: i64,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(cover_duty_reassignments::table)
        .values((
            cover_duty_reassignments::original_leave_id.eq(reassignment.covered_leave.leave_id),
            cover_duty_reassignments::cover_employee_leave_id.eq(cover_employee_leave_id),
            cover_duty_reassignments::original_cover_employee_id
                .eq(reassignment.original_cover_employee_id),
            cover_duty_reassignments::status.eq(ReassignmentStatus::Pending.as_str()),
            cover_duty_reassignments::created_at.eq(encode_timestamp(reassignment.created_at)?),
        ))
        .execute(conn)?;

    let reassignment_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        reassignment_id,
        original_leave_id = reassignment.covered_leave.leave_id,
        cover_employee_leave_id,
        "Opened cover reassignment"
    );
    Ok(reassignment_id)
}

/// Records the substitute chosen for a reassignment.
///
/// Only a pending row is updated, so two admins racing on the same
/// reassignment cannot both succeed.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no pending reassignment has this ID.
pub fn resolve_reassignment(
    conn: &mut SqliteConnection,
    reassignment: &CoverDutyReassignment,
) -> Result<(), PersistenceError> {
    let resolved_at: Option<String> = reassignment.resolved_at.map(encode_timestamp).transpose()?;
    let rows: usize = diesel::update(cover_duty_reassignments::table)
        .filter(cover_duty_reassignments::reassignment_id.eq(reassignment.reassignment_id))
        .filter(cover_duty_reassignments::status.eq(ReassignmentStatus::Pending.as_str()))
        .set((
            cover_duty_reassignments::status.eq(reassignment.status.as_str()),
            cover_duty_reassignments::new_cover_employee_id.eq(reassignment.new_cover_employee_id),
            cover_duty_reassignments::resolved_at.eq(resolved_at),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Pending reassignment {}",
            reassignment.reassignment_id
        )));
    }
    debug!(
        reassignment_id = reassignment.reassignment_id,
        new_cover_employee_id = reassignment.new_cover_employee_id,
        "Resolved cover reassignment"
    );
    Ok(())
}
