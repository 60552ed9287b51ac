// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover_domain::LeaveBalance;

use crate::data_models::decode_half_days;
use crate::diesel_schema::leave_balances;
use crate::error::PersistenceError;

/// Diesel Queryable struct for balance rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = leave_balances)]
struct BalanceRow {
    employee_id: i64,
    year: i32,
    annual_half_days: i32,
    casual_half_days: i32,
    medical_half_days: i32,
    official_half_days: i32,
}

/// Retrieves the single balance row of an employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no balance has been created yet.
pub fn get_balance(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<LeaveBalance>, PersistenceError> {
    let result: Result<BalanceRow, diesel::result::Error> = leave_balances::table
        .filter(leave_balances::employee_id.eq(employee_id))
        .select(BalanceRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(LeaveBalance {
            employee_id: row.employee_id,
            year: row.year,
            annual: decode_half_days(row.annual_half_days)?,
            casual: decode_half_days(row.casual_half_days)?,
            medical: decode_half_days(row.medical_half_days)?,
            official: decode_half_days(row.official_half_days)?,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
