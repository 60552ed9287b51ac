// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee queries, including the workload figures used to rank substitutes.

use std::collections::{HashMap, HashSet};

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::SqliteConnection;
use leave_cover_domain::{CoverCandidate, CoverRequestStatus, DateRange, Employee, LeaveStatus};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::data_models::{decode_date, decode_flag, encode_date};
use crate::diesel_schema::{cover_requests, employees, leaves};
use crate::error::PersistenceError;
use crate::queries::active_status_values;

/// Diesel Queryable struct for employee rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
struct EmployeeRow {
    employee_id: i64,
    name: String,
    email: String,
    is_admin: i32,
    admin_type: Option<String>,
    is_active: i32,
    is_probation: i32,
    confirmed_at: Option<String>,
}

impl EmployeeRow {
    fn into_employee(self) -> Result<Employee, PersistenceError> {
        Ok(Employee {
            employee_id: self.employee_id,
            name: self.name,
            email: self.email,
            is_admin: decode_flag(self.is_admin),
            admin_type: self.admin_type,
            is_active: decode_flag(self.is_active),
            is_probation: decode_flag(self.is_probation),
            confirmed_at: self.confirmed_at.as_deref().map(decode_date).transpose()?,
        })
    }
}

fn into_employees(rows: Vec<EmployeeRow>) -> Result<Vec<Employee>, PersistenceError> {
    rows.into_iter().map(EmployeeRow::into_employee).collect()
}

/// Retrieves an employee by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the employee is not found.
pub fn get_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<Employee>, PersistenceError> {
    debug!(employee_id, "Looking up employee");

    let result: Result<EmployeeRow, diesel::result::Error> = employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_employee()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists all employees ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employees(conn: &mut SqliteConnection) -> Result<Vec<Employee>, PersistenceError> {
    let rows: Vec<EmployeeRow> = employees::table
        .order(employees::employee_id.asc())
        .select(EmployeeRow::as_select())
        .load(conn)?;
    into_employees(rows)
}

/// Lists active admins, the recipients of admin fan-out notifications.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_active_admins(conn: &mut SqliteConnection) -> Result<Vec<Employee>, PersistenceError> {
    let rows: Vec<EmployeeRow> = employees::table
        .filter(employees::is_admin.eq(1))
        .filter(employees::is_active.eq(1))
        .order(employees::employee_id.asc())
        .select(EmployeeRow::as_select())
        .load(conn)?;
    debug!(count = rows.len(), "Loaded active admins");
    into_employees(rows)
}

fn count_to_u32(count: i64) -> Result<u32, PersistenceError> {
    count
        .to_u32()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("Count {count} out of range")))
}

/// Loads every active employee with their workload during `range`.
///
/// Workload counts the pending cover requests addressed to the employee and
/// the approved leaves they are covering within the range. `on_leave` is set
/// when the employee has an active leave overlapping the range.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn candidate_workloads(
    conn: &mut SqliteConnection,
    range: DateRange,
) -> Result<Vec<CoverCandidate>, PersistenceError> {
    let start: String = encode_date(range.start())?;
    let end: String = encode_date(range.end())?;

    let people: Vec<(i64, String)> = employees::table
        .filter(employees::is_active.eq(1))
        .order(employees::employee_id.asc())
        .select((employees::employee_id, employees::name))
        .load(conn)?;

    let pending: HashMap<i64, i64> = cover_requests::table
        .filter(cover_requests::status.eq(CoverRequestStatus::Pending.as_str()))
        .group_by(cover_requests::cover_employee_id)
        .select((cover_requests::cover_employee_id, count_star()))
        .load::<(i64, i64)>(conn)?
        .into_iter()
        .collect();

    let covering: HashMap<i64, i64> = leaves::table
        .filter(leaves::status.eq(LeaveStatus::Approved.as_str()))
        .filter(leaves::start_date.le(&end))
        .filter(leaves::end_date.ge(&start))
        .filter(leaves::cover_employee_id.is_not_null())
        .group_by(leaves::cover_employee_id)
        .select((leaves::cover_employee_id, count_star()))
        .load::<(Option<i64>, i64)>(conn)?
        .into_iter()
        .filter_map(|(cover, count)| cover.map(|id| (id, count)))
        .collect();

    let away: HashSet<i64> = leaves::table
        .filter(leaves::status.eq_any(active_status_values()))
        .filter(leaves::start_date.le(&end))
        .filter(leaves::end_date.ge(&start))
        .select(leaves::employee_id)
        .distinct()
        .load::<i64>(conn)?
        .into_iter()
        .collect();

    debug!(
        candidates = people.len(),
        on_leave = away.len(),
        "Loaded candidate workloads"
    );

    people
        .into_iter()
        .map(|(employee_id, name)| {
            Ok(CoverCandidate {
                employee_id,
                name,
                pending_cover_requests: count_to_u32(
                    pending.get(&employee_id).copied().unwrap_or_default(),
                )?,
                covering_duties: count_to_u32(
                    covering.get(&employee_id).copied().unwrap_or_default(),
                )?,
                on_leave: away.contains(&employee_id),
            })
        })
        .collect()
}
