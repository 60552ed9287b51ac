// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover_domain::{CoverDutyReassignment, ReassignmentStatus};

use crate::data_models::{decode_enum, decode_optional_timestamp, decode_timestamp};
use crate::diesel_schema::cover_duty_reassignments;
use crate::error::PersistenceError;

/// Diesel Queryable struct for reassignment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = cover_duty_reassignments)]
struct ReassignmentRow {
    reassignment_id: i64,
    original_leave_id: i64,
    cover_employee_leave_id: i64,
    original_cover_employee_id: i64,
    status: String,
    new_cover_employee_id: Option<i64>,
    created_at: String,
    resolved_at: Option<String>,
}

impl ReassignmentRow {
    fn into_reassignment(self) -> Result<CoverDutyReassignment, PersistenceError> {
        Ok(CoverDutyReassignment {
            reassignment_id: self.reassignment_id,
            original_leave_id: self.original_leave_id,
            cover_employee_leave_id: self.cover_employee_leave_id,
            original_cover_employee_id: self.original_cover_employee_id,
            status: decode_enum(&self.status)?,
            new_cover_employee_id: self.new_cover_employee_id,
            created_at: decode_timestamp(&self.created_at)?,
            resolved_at: decode_optional_timestamp(self.resolved_at.as_deref())?,
        })
    }
}

/// Retrieves a reassignment by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the reassignment is not found.
pub fn get_reassignment(
    conn: &mut SqliteConnection,
    reassignment_id: i64,
) -> Result<Option<CoverDutyReassignment>, PersistenceError> {
    let result: Result<ReassignmentRow, diesel::result::Error> = cover_duty_reassignments::table
        .filter(cover_duty_reassignments::reassignment_id.eq(reassignment_id))
        .select(ReassignmentRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_reassignment()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists reassignments, optionally restricted to one status, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_reassignments(
    conn: &mut SqliteConnection,
    status: Option<ReassignmentStatus>,
) -> Result<Vec<CoverDutyReassignment>, PersistenceError> {
    let mut query = cover_duty_reassignments::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(cover_duty_reassignments::status.eq(status.as_str()));
    }
    let rows: Vec<ReassignmentRow> = query
        .order(cover_duty_reassignments::reassignment_id.asc())
        .select(ReassignmentRow::as_select())
        .load(conn)?;
    rows.into_iter()
        .map(ReassignmentRow::into_reassignment)
        .collect()
}
