// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover_domain::{CoverRequest, CoverRequestStatus};
use tracing::debug;

use crate::data_models::{decode_enum, decode_optional_timestamp, decode_timestamp};
use crate::diesel_schema::cover_requests;
use crate::error::PersistenceError;

/// Diesel Queryable struct for cover request rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = cover_requests)]
struct CoverRequestRow {
    cover_request_id: i64,
    leave_id: i64,
    cover_employee_id: i64,
    status: String,
    created_at: String,
    expires_at: String,
    responded_at: Option<String>,
}

impl CoverRequestRow {
    fn into_cover_request(self) -> Result<CoverRequest, PersistenceError> {
        Ok(CoverRequest {
            cover_request_id: self.cover_request_id,
            leave_id: self.leave_id,
            cover_employee_id: self.cover_employee_id,
            status: decode_enum(&self.status)?,
            created_at: decode_timestamp(&self.created_at)?,
            expires_at: decode_timestamp(&self.expires_at)?,
            responded_at: decode_optional_timestamp(self.responded_at.as_deref())?,
        })
    }
}

/// Retrieves the cover request belonging to a leave.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the leave has no cover request.
pub fn get_cover_request_for_leave(
    conn: &mut SqliteConnection,
    leave_id: i64,
) -> Result<Option<CoverRequest>, PersistenceError> {
    let result: Result<CoverRequestRow, diesel::result::Error> = cover_requests::table
        .filter(cover_requests::leave_id.eq(leave_id))
        .select(CoverRequestRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_cover_request()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists every pending cover request, oldest expiry first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pending_cover_requests(
    conn: &mut SqliteConnection,
) -> Result<Vec<CoverRequest>, PersistenceError> {
    let rows: Vec<CoverRequestRow> = cover_requests::table
        .filter(cover_requests::status.eq(CoverRequestStatus::Pending.as_str()))
        .order(cover_requests::expires_at.asc())
        .select(CoverRequestRow::as_select())
        .load(conn)?;
    debug!(count = rows.len(), "Loaded pending cover requests");
    rows.into_iter()
        .map(CoverRequestRow::into_cover_request)
        .collect()
}
