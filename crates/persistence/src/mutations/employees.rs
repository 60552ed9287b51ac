// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee and public holiday seeding.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover_domain::PublicHoliday;
use time::Date;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{encode_date, encode_flag};
use crate::diesel_schema::{employees, public_holidays};
use crate::error::PersistenceError;

/// The fields needed to register an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    /// Full name.
    pub name: String,
    /// Email address. Must be unique.
    pub email: String,
    /// Whether the employee is an admin.
    pub is_admin: bool,
    /// Free-form admin classification.
    pub admin_type: Option<String>,
    /// Whether the employee is still on probation.
    pub is_probation: bool,
    /// The confirmation date, if already confirmed.
    pub confirmed_at: Option<Date>,
}

/// Creates a new active employee.
///
/// # Errors
///
/// Returns an error if the email is already registered or the insert fails.
pub fn create_employee(
    conn: &mut SqliteConnection,
    employee: &NewEmployee,
) -> Result<i64, PersistenceError> {
    let confirmed_at: Option<String> = employee.confirmed_at.map(encode_date).transpose()?;

    diesel::insert_into(employees::table)
        .values((
            employees::name.eq(&employee.name),
            employees::email.eq(&employee.email),
            employees::is_admin.eq(encode_flag(employee.is_admin)),
            employees::admin_type.eq(&employee.admin_type),
            employees::is_active.eq(1),
            employees::is_probation.eq(encode_flag(employee.is_probation)),
            employees::confirmed_at.eq(confirmed_at),
        ))
        .execute(conn)?;

    let employee_id: i64 = conn.get_last_insert_rowid()?;
    info!(employee_id, is_admin = employee.is_admin, "Employee created");
    Ok(employee_id)
}

/// Marks an employee as confirmed in service, ending probation.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the employee does not exist.
pub fn set_employee_confirmation(
    conn: &mut SqliteConnection,
    employee_id: i64,
    confirmed_at: Date,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(employees::table)
        .filter(employees::employee_id.eq(employee_id))
        .set((
            employees::is_probation.eq(0),
            employees::confirmed_at.eq(encode_date(confirmed_at)?),
        ))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Employee {employee_id}"
        )));
    }
    info!(employee_id, %confirmed_at, "Employee confirmed");
    Ok(())
}

/// Sets whether an employee is active.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the employee does not exist.
pub fn set_employee_active(
    conn: &mut SqliteConnection,
    employee_id: i64,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(employees::table)
        .filter(employees::employee_id.eq(employee_id))
        .set(employees::is_active.eq(encode_flag(is_active)))
        .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Employee {employee_id}"
        )));
    }
    info!(employee_id, is_active, "Employee activity changed");
    Ok(())
}

/// Records a public holiday.
///
/// # Errors
///
/// Returns an error if the same holiday is already recorded or the insert fails.
pub fn create_public_holiday(
    conn: &mut SqliteConnection,
    holiday: &PublicHoliday,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(public_holidays::table)
        .values((
            public_holidays::holiday_date.eq(encode_date(holiday.date)?),
            public_holidays::name.eq(&holiday.name),
            public_holidays::description.eq(&holiday.description),
        ))
        .execute(conn)?;

    let holiday_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        holiday_id,
        date = %holiday.date,
        category = ?holiday.category(),
        "Public holiday created"
    );
    Ok(holiday_id)
}
