// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod balance;
mod calendar;
mod date_range;
mod eligibility;
mod error;
mod half_days;
mod overlap;
mod ranking;
mod types;

#[cfg(test)]
mod tests;

pub use balance::{
    Allotment, AllotmentInputs, AllotmentPolicy, BalanceResolution, LeaveBalance, StandardAllotment,
    check_no_pay, resolve_balance,
};
pub use calendar::{HolidaySet, count_working_days, is_working_day};
pub use date_range::{DATE_FORMAT, DateRange, parse_date};
pub use eligibility::{LeaveApplication, LeaveRule, requested_days, rule_for, validate_application};
pub use error::DomainError;
pub use half_days::HalfDays;
pub use overlap::{
    LeaveConflict, check_covering_conflict, ensure_no_overlap, find_covering_assignments,
    find_overlapping_leave,
};
pub use ranking::{CandidateRanker, CoverCandidate, RankedCandidate, WorkloadRanker};
pub use types::{
    CoverDutyReassignment, CoverRequest, CoverRequestStatus, Employee, HalfDayType, HolidayCategory,
    Leave, LeaveStatus, LeaveType, PublicHoliday, ReassignmentStatus,
};
