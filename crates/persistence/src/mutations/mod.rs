// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `balances`: Balance upsert
//! - `employees`: Employee and holiday seeding
//! - `leaves`: Leave and cover request writes
//! - `reassignments`: Reassignment creation and resolution

pub mod audit;
pub mod balances;
pub mod employees;
pub mod leaves;
pub mod reassignments;

pub use employees::NewEmployee;
