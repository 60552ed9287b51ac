// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave and cover request mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover::{NewCoverRequest, NewLeave};
use leave_cover_domain::{CoverRequest, CoverRequestStatus, Leave};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{encode_date, encode_flag, encode_half_days, encode_timestamp};
use crate::diesel_schema::{cover_requests, leaves};
use crate::error::PersistenceError;

/// Inserts a new leave.
///
/// # Returns
///
/// The ID assigned to the leave.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_leave(
    conn: &mut SqliteConnection,
    leave: &NewLeave,
) -> Result<i64, PersistenceError> {
    let created_at: String = encode_timestamp(leave.created_at)?;

    diesel::insert_into(leaves::table)
        .values((
            leaves::employee_id.eq(leave.employee_id),
            leaves::leave_type.eq(leave.leave_type.as_str()),
            leaves::start_date.eq(encode_date(leave.start_date)?),
            leaves::end_date.eq(encode_date(leave.end_date)?),
            leaves::total_half_days.eq(encode_half_days(leave.total_days)?),
            leaves::reason.eq(&leave.reason),
            leaves::cover_employee_id.eq(leave.cover_employee_id),
            leaves::medical_cert_path.eq(&leave.medical_cert_path),
            leaves::status.eq(leave.status.as_str()),
            leaves::is_no_pay.eq(encode_flag(leave.is_no_pay)),
            leaves::half_day_type.eq(leave.half_day_type.map(|half| half.as_str())),
            leaves::created_at.eq(&created_at),
            leaves::updated_at.eq(&created_at),
        ))
        .execute(conn)?;

    let leave_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        leave_id,
        employee_id = leave.employee_id,
        leave_type = %leave.leave_type,
        status = %leave.status,
        "Inserted leave"
    );
    Ok(leave_id)
}

/// Writes the mutable columns of an existing leave.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the leave does not exist.
pub fn update_leave(conn: &mut SqliteConnection, leave: &Leave) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(leaves::table)
        .filter(leaves::leave_id.eq(leave.leave_id))
        .set((
            leaves::status.eq(leave.status.as_str()),
            leaves::cover_employee_id.eq(leave.cover_employee_id),
            leaves::admin_response.eq(&leave.admin_response),
            leaves::cover_response.eq(&leave.cover_response),
            leaves::updated_at.eq(encode_timestamp(leave.updated_at)?),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("Leave {}", leave.leave_id)));
    }
    debug!(leave_id = leave.leave_id, status = %leave.status, "Updated leave");
    Ok(())
}

/// Inserts the cover request of a newly created leave.
///
/// # Errors
///
/// Returns an error if the leave already has a cover request or the insert fails.
pub fn insert_cover_request(
    conn: &mut SqliteConnection,
    leave_id: i64,
    request: &NewCoverRequest,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(cover_requests::table)
        .values((
            cover_requests::leave_id.eq(leave_id),
            cover_requests::cover_employee_id.eq(request.cover_employee_id),
            cover_requests::status.eq(CoverRequestStatus::Pending.as_str()),
            cover_requests::created_at.eq(encode_timestamp(request.created_at)?),
            cover_requests::expires_at.eq(encode_timestamp(request.expires_at)?),
        ))
        .execute(conn)?;

    let cover_request_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        cover_request_id,
        leave_id,
        cover_employee_id = request.cover_employee_id,
        "Inserted cover request"
    );
    Ok(cover_request_id)
}

/// Writes the status and response time of an existing cover request.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the request does not exist.
pub fn update_cover_request(
    conn: &mut SqliteConnection,
    request: &CoverRequest,
) -> Result<(), PersistenceError> {
    let responded_at: Option<String> = request.responded_at.map(encode_timestamp).transpose()?;
    let rows: usize = diesel::update(cover_requests::table)
        .filter(cover_requests::cover_request_id.eq(request.cover_request_id))
        .set((
            cover_requests::status.eq(request.status.as_str()),
            cover_requests::responded_at.eq(responded_at),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Cover request {}",
            request.cover_request_id
        )));
    }
    debug!(
        cover_request_id = request.cover_request_id,
        status = %request.status,
        "Updated cover request"
    );
    Ok(())
}
