// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-employee yearly leave balances.
//!
//! A balance row holds the remaining days for one employee in one year.
//! When a leave falls in a different year than the stored row, the row is
//! replaced by a fresh allotment for that year. Balances are flagged for
//! no-pay at application time and only deducted when a leave is approved.

use crate::half_days::HalfDays;
use crate::types::LeaveType;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// Remaining leave days for one employee in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The employee this balance belongs to.
    pub employee_id: i64,
    /// The calendar year the buckets apply to.
    pub year: i32,
    /// Remaining annual leave.
    pub annual: HalfDays,
    /// Remaining casual leave.
    pub casual: HalfDays,
    /// Remaining medical leave.
    pub medical: HalfDays,
    /// Official leave taken. Official leave has no allotment.
    pub official: HalfDays,
}

impl LeaveBalance {
    /// Returns the bucket a leave type draws from, if any.
    #[must_use]
    pub const fn bucket(&self, leave_type: LeaveType) -> Option<HalfDays> {
        match leave_type {
            LeaveType::Annual => Some(self.annual),
            LeaveType::Casual => Some(self.casual),
            LeaveType::Medical => Some(self.medical),
            LeaveType::Official => None,
        }
    }

    /// Returns the balance after an approved leave of `days` is taken.
    ///
    /// Buckets floor at zero; the shortfall is the unpaid portion. Official
    /// leave is tallied upward instead.
    #[must_use]
    pub fn after_deduction(self, leave_type: LeaveType, days: HalfDays) -> Self {
        let mut next: Self = self;
        match leave_type {
            LeaveType::Annual => next.annual = self.annual.saturating_sub(days),
            LeaveType::Casual => next.casual = self.casual.saturating_sub(days),
            LeaveType::Medical => next.medical = self.medical.saturating_sub(days),
            LeaveType::Official => next.official = self.official + days,
        }
        next
    }
}

/// A yearly allotment, before it is attached to an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allotment {
    /// Annual leave days.
    pub annual: HalfDays,
    /// Casual leave days.
    pub casual: HalfDays,
    /// Medical leave days.
    pub medical: HalfDays,
}

impl Allotment {
    /// Attaches this allotment to an employee and year.
    #[must_use]
    pub const fn into_balance(self, employee_id: i64, year: i32) -> LeaveBalance {
        LeaveBalance {
            employee_id,
            year,
            annual: self.annual,
            casual: self.casual,
            medical: self.medical,
            official: HalfDays::ZERO,
        }
    }
}

/// The employee facts an allotment depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllotmentInputs {
    /// The employee.
    pub employee_id: i64,
    /// The year being allotted.
    pub year: i32,
    /// Whether the employee is on probation.
    pub is_probation: bool,
    /// When the employee was confirmed, if ever.
    pub confirmed_at: Option<Date>,
}

/// Computes yearly allotments and decides what happens at a year change.
pub trait AllotmentPolicy: Send + Sync {
    /// Returns the fresh allotment for an employee and year.
    fn allotment(&self, inputs: &AllotmentInputs) -> Allotment;

    /// Returns the balance to use for `inputs.year` given the stored row from
    /// an earlier year.
    ///
    /// The default discards the previous year entirely.
    fn rollover(&self, _previous: &LeaveBalance, inputs: &AllotmentInputs) -> LeaveBalance {
        self.allotment(inputs)
            .into_balance(inputs.employee_id, inputs.year)
    }
}

/// The standard allotment table.
///
/// | Status | Annual | Casual | Medical |
/// |---|---|---|---|
/// | Probation | 0 | 4 | 7 |
/// | Confirmed before the year | 14 | 7 | 21 |
/// | Confirmed during the year, Q1..Q4 | 14 / 10 / 7 / 4 | 7 | 21 |
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAllotment;

impl StandardAllotment {
    const PROBATION: Allotment = Allotment {
        annual: HalfDays::ZERO,
        casual: HalfDays::whole_days(4),
        medical: HalfDays::whole_days(7),
    };

    /// Annual days for staff confirmed during the allotted year, by quarter.
    const fn annual_for_confirmation_month(month: Month) -> HalfDays {
        match month {
            Month::January | Month::February | Month::March => HalfDays::whole_days(14),
            Month::April | Month::May | Month::June => HalfDays::whole_days(10),
            Month::July | Month::August | Month::September => HalfDays::whole_days(7),
            Month::October | Month::November | Month::December => HalfDays::whole_days(4),
        }
    }
}

impl AllotmentPolicy for StandardAllotment {
    fn allotment(&self, inputs: &AllotmentInputs) -> Allotment {
        if inputs.is_probation {
            return Self::PROBATION;
        }
        let annual: HalfDays = match inputs.confirmed_at {
            Some(confirmed) if confirmed.year() == inputs.year => {
                Self::annual_for_confirmation_month(confirmed.month())
            }
            // Confirmed in a later year than the one being allotted.
            Some(confirmed) if confirmed.year() > inputs.year => return Self::PROBATION,
            _ => HalfDays::whole_days(14),
        };
        Allotment {
            annual,
            casual: HalfDays::whole_days(7),
            medical: HalfDays::whole_days(21),
        }
    }
}

/// How [`resolve_balance`] arrived at its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceResolution {
    /// The stored row already matched the year.
    Existing(LeaveBalance),
    /// No row existed; a fresh one must be inserted.
    Created(LeaveBalance),
    /// The stored row was for another year and must be overwritten.
    Reset(LeaveBalance),
}

impl BalanceResolution {
    /// Returns the resolved balance.
    #[must_use]
    pub const fn balance(&self) -> &LeaveBalance {
        match self {
            Self::Existing(balance) | Self::Created(balance) | Self::Reset(balance) => balance,
        }
    }

    /// Returns whether the resolved balance must be written back.
    #[must_use]
    pub const fn needs_write(&self) -> bool {
        !matches!(self, Self::Existing(_))
    }
}

/// Ensures a balance exists for the requested year.
#[must_use]
pub fn resolve_balance(
    stored: Option<LeaveBalance>,
    inputs: &AllotmentInputs,
    policy: &dyn AllotmentPolicy,
) -> BalanceResolution {
    match stored {
        None => BalanceResolution::Created(
            policy
                .allotment(inputs)
                .into_balance(inputs.employee_id, inputs.year),
        ),
        Some(balance) if balance.year == inputs.year => BalanceResolution::Existing(balance),
        Some(previous) => BalanceResolution::Reset(policy.rollover(&previous, inputs)),
    }
}

/// Returns whether taking `total_days` of `leave_type` would exceed the balance.
///
/// Official leave has no bucket and is never no-pay.
#[must_use]
pub fn check_no_pay(balance: &LeaveBalance, leave_type: LeaveType, total_days: HalfDays) -> bool {
    balance
        .bucket(leave_type)
        .is_some_and(|remaining| remaining < total_days)
}
