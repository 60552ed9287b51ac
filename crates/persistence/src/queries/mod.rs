// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `audit`: Audit timelines
//! - `balances`: The per-employee balance row
//! - `cover_requests`: Cover requests by leave and pending requests
//! - `employees`: Employees, admins and substitute workloads
//! - `holidays`: Public holidays
//! - `leaves`: Leaves by ID, overlap and covering lookups, listings
//! - `reassignments`: Cover-duty reassignments

pub mod audit;
pub mod balances;
pub mod cover_requests;
pub mod employees;
pub mod holidays;
pub mod leaves;
pub mod reassignments;

use leave_cover_domain::LeaveStatus;

pub use leaves::{LeaveFilter, MAX_PAGE_SIZE};

/// Stored values of the statuses that count toward overlap.
pub(crate) fn active_status_values() -> Vec<&'static str> {
    LeaveStatus::ACTIVE.iter().map(LeaveStatus::as_str).collect()
}
