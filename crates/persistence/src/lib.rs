// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the leave cover engine.
//!
//! This crate stores employees, holidays, leaves, balances, cover requests,
//! reassignments and audit events in `SQLite` through Diesel. Migrations are
//! embedded and applied whenever a database is opened.
//!
//! ## Transactions
//!
//! Every read-decide-write path runs through [`Persistence::in_transaction`],
//! which opens a `BEGIN IMMEDIATE` transaction and hands the closure a
//! [`LeaveStore`]. The write lock is taken before the first read, so two
//! writers never decide on the same stale rows. Any error returned by the
//! closure rolls the whole transaction back.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] opens a fresh shared-cache in-memory
//! database per call, so tests are isolated without temp files.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use leave_cover::{ApplicationResult, ReassignmentResult, TransitionResult};
use leave_cover_audit::AuditEvent;
use leave_cover_domain::{
    CoverCandidate, CoverDutyReassignment, CoverRequest, DateRange, Employee, Leave, LeaveBalance,
    PublicHoliday, ReassignmentStatus,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;
use tracing::{debug, info};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::sqlite::MIGRATIONS;
pub use error::PersistenceError;
pub use mutations::NewEmployee;
pub use queries::{LeaveFilter, MAX_PAGE_SIZE};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Carries either a database failure or the caller's own error out of a transaction.
enum TxError<E> {
    Persistence(PersistenceError),
    Caller(E),
}

impl<E> From<diesel::result::Error> for TxError<E> {
    fn from(err: diesel::result::Error) -> Self {
        Self::Persistence(PersistenceError::from(err))
    }
}

/// The rows written for a new leave application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedApplication {
    /// The leave as stored.
    pub leave: Leave,
    /// The ID of its cover request, if one was created.
    pub cover_request_id: Option<i64>,
    /// IDs of the reassignments opened, in the order of the application result.
    pub reassignment_ids: Vec<i64>,
    /// The ID of the audit event.
    pub event_id: i64,
}

/// Transaction-scoped access to the store.
///
/// Only obtainable through [`Persistence::in_transaction`].
pub struct LeaveStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl LeaveStore<'_> {
    // ========================================================================
    // Queries
    // ========================================================================

    /// Retrieves an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn employee(&mut self, employee_id: i64) -> Result<Option<Employee>, PersistenceError> {
        queries::employees::get_employee(self.conn, employee_id)
    }

    /// Lists active admins.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn active_admins(&mut self) -> Result<Vec<Employee>, PersistenceError> {
        queries::employees::list_active_admins(self.conn)
    }

    /// Lists the public holidays within `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn holidays_in(
        &mut self,
        range: DateRange,
    ) -> Result<Vec<PublicHoliday>, PersistenceError> {
        queries::holidays::list_holidays_in_range(self.conn, range)
    }

    /// Lists an employee's active leaves overlapping `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn active_leaves(
        &mut self,
        employee_id: i64,
        range: DateRange,
    ) -> Result<Vec<Leave>, PersistenceError> {
        queries::leaves::active_leaves_overlapping(self.conn, employee_id, range)
    }

    /// Lists the approved leaves an employee is covering within `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn covering_assignments(
        &mut self,
        cover_employee_id: i64,
        range: DateRange,
    ) -> Result<Vec<Leave>, PersistenceError> {
        queries::leaves::approved_covering_leaves(self.conn, cover_employee_id, range)
    }

    /// Retrieves a leave by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn leave(&mut self, leave_id: i64) -> Result<Option<Leave>, PersistenceError> {
        queries::leaves::get_leave(self.conn, leave_id)
    }

    /// Retrieves the cover request of a leave.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn cover_request(
        &mut self,
        leave_id: i64,
    ) -> Result<Option<CoverRequest>, PersistenceError> {
        queries::cover_requests::get_cover_request_for_leave(self.conn, leave_id)
    }

    /// Lists every pending cover request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn pending_cover_requests(&mut self) -> Result<Vec<CoverRequest>, PersistenceError> {
        queries::cover_requests::list_pending_cover_requests(self.conn)
    }

    /// Retrieves an employee's balance row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn balance(&mut self, employee_id: i64) -> Result<Option<LeaveBalance>, PersistenceError> {
        queries::balances::get_balance(self.conn, employee_id)
    }

    /// Retrieves a reassignment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn reassignment(
        &mut self,
        reassignment_id: i64,
    ) -> Result<Option<CoverDutyReassignment>, PersistenceError> {
        queries::reassignments::get_reassignment(self.conn, reassignment_id)
    }

    /// Loads every active employee with their workload during `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn candidate_workloads(
        &mut self,
        range: DateRange,
    ) -> Result<Vec<CoverCandidate>, PersistenceError> {
        queries::employees::candidate_workloads(self.conn, range)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Writes every row produced by a successful application.
    ///
    /// The leave is inserted first so that its cover request, reassignments
    /// and audit event can reference it.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails. The caller's transaction then
    /// rolls back all of them.
    pub fn persist_application(
        &mut self,
        result: &ApplicationResult,
    ) -> Result<PersistedApplication, PersistenceError> {
        let leave_id: i64 = mutations::leaves::insert_leave(self.conn, &result.new_leave)?;

        let cover_request_id: Option<i64> = result
            .cover_request
            .as_ref()
            .map(|request| mutations::leaves::insert_cover_request(self.conn, leave_id, request))
            .transpose()?;

        if let Some(balance) = &result.balance_write {
            mutations::balances::upsert_balance(self.conn, balance)?;
        }

        let reassignment_ids: Vec<i64> = result
            .reassignments
            .iter()
            .map(|reassignment| {
                mutations::reassignments::insert_reassignment(self.conn, reassignment, leave_id)
            })
            .collect::<Result<_, _>>()?;

        let event: AuditEvent = result.audit_event.clone().for_leave(leave_id);
        let event_id: i64 = mutations::audit::persist_audit_event(self.conn, &event)?;

        let leave: Leave = queries::leaves::get_leave(self.conn, leave_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("Leave {leave_id}")))?;

        info!(
            leave_id,
            event_id,
            reassignments = reassignment_ids.len(),
            "Persisted leave application"
        );

        Ok(PersistedApplication {
            leave,
            cover_request_id,
            reassignment_ids,
            event_id,
        })
    }

    /// Writes the rows changed by a transition on an existing leave.
    ///
    /// # Returns
    ///
    /// The ID of the audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<i64, PersistenceError> {
        mutations::leaves::update_leave(self.conn, &result.leave)?;
        if let Some(request) = &result.cover_request {
            mutations::leaves::update_cover_request(self.conn, request)?;
        }
        if let Some(balance) = &result.balance_write {
            mutations::balances::upsert_balance(self.conn, balance)?;
        }
        let event_id: i64 = mutations::audit::persist_audit_event(self.conn, &result.audit_event)?;
        info!(
            leave_id = result.leave.leave_id,
            event_id,
            action = %result.audit_event.action.name,
            "Persisted transition"
        );
        Ok(event_id)
    }

    /// Writes a resolved reassignment and the covered leave's new cover.
    ///
    /// # Returns
    ///
    /// The ID of the audit event.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the reassignment is no longer
    /// pending, or an error if any write fails.
    pub fn persist_reassignment(
        &mut self,
        result: &ReassignmentResult,
    ) -> Result<i64, PersistenceError> {
        mutations::reassignments::resolve_reassignment(self.conn, &result.reassignment)?;
        mutations::leaves::update_leave(self.conn, &result.covered_leave)?;
        let event_id: i64 = mutations::audit::persist_audit_event(self.conn, &result.audit_event)?;
        info!(
            reassignment_id = result.reassignment.reassignment_id,
            leave_id = result.covered_leave.leave_id,
            event_id,
            "Persisted reassignment"
        );
        Ok(event_id)
    }
}

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_leave_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open(&shared_memory_url, backend::sqlite::StorageMode::Memory)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection =
            backend::sqlite::open(path_str, backend::sqlite::StorageMode::File)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Runs `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The transaction commits only if `f` returns `Ok`. Any error, from the
    /// store or from the caller's own logic, rolls back every write made
    /// through the store.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a `PersistenceError` converted into `E`
    /// if the transaction cannot begin or commit.
    pub fn in_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut LeaveStore<'_>) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        let result: Result<T, TxError<E>> = self.conn.immediate_transaction(|conn| {
            let mut store: LeaveStore<'_> = LeaveStore { conn };
            f(&mut store).map_err(TxError::Caller)
        });

        match result {
            Ok(value) => Ok(value),
            Err(TxError::Caller(err)) => {
                debug!("Transaction rolled back");
                Err(err)
            }
            Err(TxError::Persistence(err)) => Err(E::from(err)),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Retrieves a leave by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_leave(&mut self, leave_id: i64) -> Result<Option<Leave>, PersistenceError> {
        queries::leaves::get_leave(&mut self.conn, leave_id)
    }

    /// Lists leaves matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_leaves(&mut self, filter: LeaveFilter) -> Result<Vec<Leave>, PersistenceError> {
        queries::leaves::list_leaves(&mut self.conn, filter)
    }

    /// Retrieves the cover request of a leave.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_cover_request(
        &mut self,
        leave_id: i64,
    ) -> Result<Option<CoverRequest>, PersistenceError> {
        queries::cover_requests::get_cover_request_for_leave(&mut self.conn, leave_id)
    }

    /// Lists reassignments, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_reassignments(
        &mut self,
        status: Option<ReassignmentStatus>,
    ) -> Result<Vec<CoverDutyReassignment>, PersistenceError> {
        queries::reassignments::list_reassignments(&mut self.conn, status)
    }

    /// Retrieves an employee's balance row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_balance(
        &mut self,
        employee_id: i64,
    ) -> Result<Option<LeaveBalance>, PersistenceError> {
        queries::balances::get_balance(&mut self.conn, employee_id)
    }

    /// Retrieves the audit timeline of a leave.
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_timeline(
        &mut self,
        leave_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_timeline(&mut self.conn, leave_id)
    }

    /// Retrieves an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_employee(&mut self, employee_id: i64) -> Result<Option<Employee>, PersistenceError> {
        queries::employees::get_employee(&mut self.conn, employee_id)
    }

    /// Lists active admins.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_active_admins(&mut self) -> Result<Vec<Employee>, PersistenceError> {
        queries::employees::list_active_admins(&mut self.conn)
    }

    /// Lists all employees.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_employees(&mut self) -> Result<Vec<Employee>, PersistenceError> {
        queries::employees::list_employees(&mut self.conn)
    }

    /// Lists all public holidays.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_holidays(&mut self) -> Result<Vec<PublicHoliday>, PersistenceError> {
        queries::holidays::list_holidays(&mut self.conn)
    }

    // ========================================================================
    // Seeding
    // ========================================================================

    /// Registers an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered or the insert fails.
    pub fn create_employee(&mut self, employee: &NewEmployee) -> Result<i64, PersistenceError> {
        mutations::employees::create_employee(&mut self.conn, employee)
    }

    /// Confirms an employee in service, ending probation.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee does not exist.
    pub fn set_employee_confirmation(
        &mut self,
        employee_id: i64,
        confirmed_at: Date,
    ) -> Result<(), PersistenceError> {
        mutations::employees::set_employee_confirmation(&mut self.conn, employee_id, confirmed_at)
    }

    /// Activates or deactivates an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee does not exist.
    pub fn set_employee_active(
        &mut self,
        employee_id: i64,
        is_active: bool,
    ) -> Result<(), PersistenceError> {
        mutations::employees::set_employee_active(&mut self.conn, employee_id, is_active)
    }

    /// Records a public holiday.
    ///
    /// # Errors
    ///
    /// Returns an error if the holiday is already recorded or the insert fails.
    pub fn create_public_holiday(
        &mut self,
        holiday: &PublicHoliday,
    ) -> Result<i64, PersistenceError> {
        mutations::employees::create_public_holiday(&mut self.conn, holiday)
    }
}
