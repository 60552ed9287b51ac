// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-leave-type eligibility rules.
//!
//! Rules are evaluated in a fixed order and the first violation wins. All
//! violations are reported as `DomainError::Validation` with a reason that can
//! be shown to the applicant unchanged.

use crate::calendar::{HolidaySet, count_working_days, is_working_day};
use crate::date_range::DateRange;
use crate::error::DomainError;
use crate::half_days::HalfDays;
use crate::types::{HalfDayType, LeaveType};
use time::{Date, Duration};

/// The constraints that apply to one leave type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveRule {
    /// The leave type these constraints apply to.
    pub leave_type: LeaveType,
    /// Longest request allowed.
    pub max_days: HalfDays,
    /// Whether totals may end in a half day.
    pub allows_half_days: bool,
    /// How many days before today the leave may start.
    pub lookback_days: i64,
    /// How many days after today the leave may end, if bounded.
    pub lookahead_days: Option<i64>,
    /// Totals strictly above this need a medical certificate.
    pub certificate_above: Option<HalfDays>,
}

/// Returns the rule for a leave type.
#[must_use]
pub const fn rule_for(leave_type: LeaveType) -> LeaveRule {
    match leave_type {
        LeaveType::Annual => LeaveRule {
            leave_type,
            max_days: HalfDays::whole_days(7),
            allows_half_days: false,
            lookback_days: 7,
            lookahead_days: None,
            certificate_above: None,
        },
        LeaveType::Casual => LeaveRule {
            leave_type,
            max_days: HalfDays::whole_days(1),
            allows_half_days: true,
            lookback_days: 2,
            lookahead_days: None,
            certificate_above: None,
        },
        LeaveType::Medical => LeaveRule {
            leave_type,
            max_days: HalfDays::whole_days(3),
            allows_half_days: true,
            lookback_days: 4,
            lookahead_days: None,
            certificate_above: Some(HalfDays::whole_days(1)),
        },
        LeaveType::Official => LeaveRule {
            leave_type,
            max_days: HalfDays::whole_days(3),
            allows_half_days: false,
            lookback_days: 3,
            lookahead_days: Some(3),
            certificate_above: None,
        },
    }
}

/// The applicant-supplied fields that eligibility depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveApplication {
    /// The applicant.
    pub employee_id: i64,
    /// Requested leave type.
    pub leave_type: LeaveType,
    /// First day requested.
    pub start_date: Date,
    /// Last day requested (inclusive).
    pub end_date: Date,
    /// Set when applying for half a day.
    pub half_day_type: Option<HalfDayType>,
    /// The colleague asked to cover.
    pub cover_employee_id: Option<i64>,
    /// Reference to an uploaded medical certificate.
    pub medical_cert_path: Option<String>,
    /// Free-text reason.
    pub reason: String,
}

impl LeaveApplication {
    /// Returns the requested range, validating its ordering.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the start date is after the end date.
    pub fn range(&self) -> Result<DateRange, DomainError> {
        DateRange::new(self.start_date, self.end_date)
            .map_err(|_| DomainError::validation("Start date cannot be after end date"))
    }
}

/// Computes the number of days an application requests.
///
/// Half-day applications must be a single working day and are fixed at 0.5;
/// everything else is the working-day count of the range.
///
/// # Errors
///
/// Returns `DomainError::Validation` if a half-day application spans more than
/// one day, falls on a weekend or public holiday, or is made for a type that
/// does not allow half days.
pub fn requested_days(
    leave_type: LeaveType,
    range: DateRange,
    half_day_type: Option<HalfDayType>,
    holidays: &HolidaySet,
) -> Result<HalfDays, DomainError> {
    if half_day_type.is_some() {
        if !matches!(leave_type, LeaveType::Casual | LeaveType::Medical) {
            return Err(DomainError::validation(format!(
                "Half-day leave is not available for {leave_type} leave"
            )));
        }
        if !range.is_single_day() {
            return Err(DomainError::validation(
                "Half-day leave must start and end on the same day",
            ));
        }
        if !is_working_day(range.start(), holidays) {
            return Err(DomainError::validation(
                "Half-day leave must fall on a working day",
            ));
        }
        return Ok(HalfDays::HALF);
    }
    Ok(HalfDays::whole_days(count_working_days(range, holidays)))
}

fn offset_date(today: Date, days: i64, operation: &str) -> Result<Date, DomainError> {
    today
        .checked_add(Duration::days(days))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: operation.to_string(),
        })
}

/// Validates an application against the rule table.
///
/// # Arguments
///
/// * `application` - The applicant-supplied fields
/// * `total_days` - The requested day count from [`requested_days`]
/// * `today` - The caller's current date
///
/// # Errors
///
/// Returns `DomainError::Validation` naming the first rule violated, in this
/// order: date ordering, non-zero total, granularity, maximum length, date
/// window, certificate, cover presence, cover identity.
pub fn validate_application(
    application: &LeaveApplication,
    total_days: HalfDays,
    today: Date,
) -> Result<(), DomainError> {
    let rule: LeaveRule = rule_for(application.leave_type);
    let range: DateRange = application.range()?;
    let leave_type: LeaveType = application.leave_type;

    if total_days.is_zero() {
        return Err(DomainError::validation(
            "The selected dates contain no working days",
        ));
    }

    if !rule.allows_half_days && !total_days.is_whole_days() {
        return Err(DomainError::validation(format!(
            "{leave_type} leave must be taken in whole days"
        )));
    }

    if total_days > rule.max_days {
        return Err(DomainError::validation(format!(
            "{leave_type} leave cannot exceed {} days per request (requested {total_days})",
            rule.max_days
        )));
    }

    let earliest: Date = offset_date(today, -rule.lookback_days, "computing earliest start")?;
    if range.start() < earliest {
        return Err(DomainError::validation(format!(
            "{leave_type} leave cannot start more than {} days in the past",
            rule.lookback_days
        )));
    }
    if let Some(lookahead) = rule.lookahead_days {
        let latest: Date = offset_date(today, lookahead, "computing latest end")?;
        if range.end() > latest {
            return Err(DomainError::validation(format!(
                "{leave_type} leave cannot end more than {lookahead} days in the future"
            )));
        }
    }

    if let Some(threshold) = rule.certificate_above {
        let has_certificate: bool = application
            .medical_cert_path
            .as_deref()
            .is_some_and(|path| !path.trim().is_empty());
        if total_days > threshold && !has_certificate {
            return Err(DomainError::validation(format!(
                "A medical certificate is required for {leave_type} leave \
                 longer than {threshold} day"
            )));
        }
    }

    if leave_type.requires_cover() {
        match application.cover_employee_id {
            None => {
                return Err(DomainError::validation(format!(
                    "A cover employee is required for {leave_type} leave"
                )));
            }
            Some(cover) if cover == application.employee_id => {
                return Err(DomainError::validation(
                    "You cannot nominate yourself as cover",
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}
