// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use leave_cover_domain::LeaveBalance;
use tracing::debug;

use crate::data_models::encode_half_days;
use crate::diesel_schema::leave_balances;
use crate::error::PersistenceError;

/// Writes the balance row of an employee, replacing any existing row.
///
/// There is at most one row per employee, so a year reset overwrites it.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_balance(
    conn: &mut SqliteConnection,
    balance: &LeaveBalance,
) -> Result<(), PersistenceError> {
    diesel::insert_into(leave_balances::table)
        .values((
            leave_balances::employee_id.eq(balance.employee_id),
            leave_balances::year.eq(balance.year),
            leave_balances::annual_half_days.eq(encode_half_days(balance.annual)?),
            leave_balances::casual_half_days.eq(encode_half_days(balance.casual)?),
            leave_balances::medical_half_days.eq(encode_half_days(balance.medical)?),
            leave_balances::official_half_days.eq(encode_half_days(balance.official)?),
        ))
        .on_conflict(leave_balances::employee_id)
        .do_update()
        .set((
            leave_balances::year.eq(excluded(leave_balances::year)),
            leave_balances::annual_half_days.eq(excluded(leave_balances::annual_half_days)),
            leave_balances::casual_half_days.eq(excluded(leave_balances::casual_half_days)),
            leave_balances::medical_half_days.eq(excluded(leave_balances::medical_half_days)),
            leave_balances::official_half_days.eq(excluded(leave_balances::official_half_days)),
        ))
        .execute(conn)?;

    debug!(
        employee_id = balance.employee_id,
        year = balance.year,
        annual = %balance.annual,
        casual = %balance.casual,
        medical = %balance.medical,
        "Wrote leave balance"
    );
    Ok(())
}
