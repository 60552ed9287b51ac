// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave queries.
//!
//! Range predicates compare `YYYY-MM-DD` text, which orders the same way as
//! the dates themselves.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover_domain::{DateRange, Leave, LeaveStatus};
use tracing::debug;

use crate::data_models::{
    decode_date, decode_enum, decode_flag, decode_half_days, decode_timestamp, encode_date,
};
use crate::diesel_schema::leaves;
use crate::error::PersistenceError;
use crate::queries::active_status_values;

/// Largest page a listing may request.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Filter and pagination for leave listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveFilter {
    /// Only leaves owned by this employee.
    pub employee_id: Option<i64>,
    /// Only leaves in this status.
    pub status: Option<LeaveStatus>,
    /// Maximum number of rows, capped at `MAX_PAGE_SIZE`.
    pub limit: u32,
    /// Rows to skip.
    pub offset: u32,
}

impl Default for LeaveFilter {
    fn default() -> Self {
        Self {
            employee_id: None,
            status: None,
            limit: 50,
            offset: 0,
        }
    }
}

/// Diesel Queryable struct for leave rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = leaves)]
pub(crate) struct LeaveRow {
    leave_id: i64,
    employee_id: i64,
    leave_type: String,
    start_date: String,
    end_date: String,
    total_half_days: i32,
    reason: String,
    cover_employee_id: Option<i64>,
    medical_cert_path: Option<String>,
    status: String,
    is_no_pay: i32,
    half_day_type: Option<String>,
    admin_response: Option<String>,
    cover_response: Option<String>,
    created_at: String,
    updated_at: String,
}

impl LeaveRow {
    pub(crate) fn into_leave(self) -> Result<Leave, PersistenceError> {
        Ok(Leave {
            leave_id: self.leave_id,
            employee_id: self.employee_id,
            leave_type: decode_enum(&self.leave_type)?,
            start_date: decode_date(&self.start_date)?,
            end_date: decode_date(&self.end_date)?,
            total_days: decode_half_days(self.total_half_days)?,
            reason: self.reason,
            cover_employee_id: self.cover_employee_id,
            medical_cert_path: self.medical_cert_path,
            status: decode_enum(&self.status)?,
            is_no_pay: decode_flag(self.is_no_pay),
            half_day_type: self.half_day_type.as_deref().map(decode_enum).transpose()?,
            admin_response: self.admin_response,
            cover_response: self.cover_response,
            created_at: decode_timestamp(&self.created_at)?,
            updated_at: decode_timestamp(&self.updated_at)?,
        })
    }
}

fn into_leaves(rows: Vec<LeaveRow>) -> Result<Vec<Leave>, PersistenceError> {
    rows.into_iter().map(LeaveRow::into_leave).collect()
}

/// Retrieves a leave by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the leave is not found.
pub fn get_leave(
    conn: &mut SqliteConnection,
    leave_id: i64,
) -> Result<Option<Leave>, PersistenceError> {
    let result: Result<LeaveRow, diesel::result::Error> = leaves::table
        .filter(leaves::leave_id.eq(leave_id))
        .select(LeaveRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_leave()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists an employee's active leaves that overlap `range`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn active_leaves_overlapping(
    conn: &mut SqliteConnection,
    employee_id: i64,
    range: DateRange,
) -> Result<Vec<Leave>, PersistenceError> {
    let rows: Vec<LeaveRow> = leaves::table
        .filter(leaves::employee_id.eq(employee_id))
        .filter(leaves::status.eq_any(active_status_values()))
        .filter(leaves::start_date.le(encode_date(range.end())?))
        .filter(leaves::end_date.ge(encode_date(range.start())?))
        .order(leaves::start_date.asc())
        .select(LeaveRow::as_select())
        .load(conn)?;
    debug!(employee_id, count = rows.len(), "Loaded overlapping active leaves");
    into_leaves(rows)
}

/// Lists the approved leaves `cover_employee_id` is covering that overlap `range`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn approved_covering_leaves(
    conn: &mut SqliteConnection,
    cover_employee_id: i64,
    range: DateRange,
) -> Result<Vec<Leave>, PersistenceError> {
    let rows: Vec<LeaveRow> = leaves::table
        .filter(leaves::cover_employee_id.eq(cover_employee_id))
        .filter(leaves::status.eq(LeaveStatus::Approved.as_str()))
        .filter(leaves::start_date.le(encode_date(range.end())?))
        .filter(leaves::end_date.ge(encode_date(range.start())?))
        .order(leaves::leave_id.asc())
        .select(LeaveRow::as_select())
        .load(conn)?;
    debug!(
        cover_employee_id,
        count = rows.len(),
        "Loaded approved covering assignments"
    );
    into_leaves(rows)
}

/// Lists leaves matching `filter`, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_leaves(
    conn: &mut SqliteConnection,
    filter: LeaveFilter,
) -> Result<Vec<Leave>, PersistenceError> {
    let mut query = leaves::table.into_boxed();
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(leaves::employee_id.eq(employee_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(leaves::status.eq(status.as_str()));
    }

    let limit: i64 = i64::from(filter.limit.min(MAX_PAGE_SIZE));
    let offset: i64 = i64::from(filter.offset);

    let rows: Vec<LeaveRow> = query
        .order((leaves::start_date.desc(), leaves::leave_id.desc()))
        .limit(limit)
        .offset(offset)
        .select(LeaveRow::as_select())
        .load(conn)?;
    into_leaves(rows)
}
