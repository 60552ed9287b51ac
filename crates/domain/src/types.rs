// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::date_range::DateRange;
use crate::error::DomainError;
use crate::half_days::HalfDays;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// The kind of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveType {
    /// Annual (vacation) leave.
    Annual,
    /// Casual leave, at most a day at a time.
    Casual,
    /// Medical (sick) leave.
    Medical,
    /// Official duty leave. Needs no cover and has no balance bucket.
    Official,
}

impl LeaveType {
    /// All leave types, in rule-table order.
    pub const ALL: [Self; 4] = [Self::Annual, Self::Casual, Self::Medical, Self::Official];

    /// Converts this leave type to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "ANNUAL",
            Self::Casual => "CASUAL",
            Self::Medical => "MEDICAL",
            Self::Official => "OFFICIAL",
        }
    }

    /// Returns whether an application of this type must name a cover employee.
    #[must_use]
    pub const fn requires_cover(&self) -> bool {
        !matches!(self, Self::Official)
    }

    /// Returns the status a freshly created leave of this type starts in.
    #[must_use]
    pub const fn initial_status(&self) -> LeaveStatus {
        if self.requires_cover() {
            LeaveStatus::PendingCover
        } else {
            LeaveStatus::PendingAdmin
        }
    }
}

impl FromStr for LeaveType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ANNUAL" => Ok(Self::Annual),
            "CASUAL" => Ok(Self::Casual),
            "MEDICAL" => Ok(Self::Medical),
            "OFFICIAL" => Ok(Self::Official),
            _ => Err(DomainError::InvalidLeaveType(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The lifecycle state of a leave.
///
/// Valid transitions are:
/// - `PendingCover` → `PendingAdmin` (cover accepted)
/// - `PendingCover` → `CoverDeclined` (cover declined or request expired)
/// - `PendingAdmin` → `Approved` | `Declined`
/// - `PendingCover` | `PendingAdmin` → `Cancelled`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Waiting for the named cover employee to respond.
    PendingCover,
    /// Waiting for an admin decision.
    PendingAdmin,
    /// Approved by an admin.
    Approved,
    /// Declined by an admin.
    Declined,
    /// The cover employee declined, or never answered in time.
    CoverDeclined,
    /// Withdrawn by the employee while still pending.
    Cancelled,
}

impl LeaveStatus {
    /// Statuses that still occupy the employee's calendar.
    pub const ACTIVE: [Self; 3] = [Self::PendingCover, Self::PendingAdmin, Self::Approved];

    /// Converts this status to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingCover => "PENDING_COVER",
            Self::PendingAdmin => "PENDING_ADMIN",
            Self::Approved => "APPROVED",
            Self::Declined => "DECLINED",
            Self::CoverDeclined => "COVER_DECLINED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns whether a leave in this status counts toward overlap detection.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::PendingCover | Self::PendingAdmin | Self::Approved)
    }

    /// Returns whether the leave is still awaiting a response.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::PendingCover | Self::PendingAdmin)
    }

    /// Checks if a transition from this status to another is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::PendingCover,
                Self::PendingAdmin | Self::CoverDeclined | Self::Cancelled
            ) | (
                Self::PendingAdmin,
                Self::Approved | Self::Declined | Self::Cancelled
            )
        )
    }

    /// Returns an error unless the transition to `target` is valid.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` when the state machine does
    /// not define the transition.
    pub const fn ensure_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for LeaveStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING_COVER" => Ok(Self::PendingCover),
            "PENDING_ADMIN" => Ok(Self::PendingAdmin),
            "APPROVED" => Ok(Self::Approved),
            "DECLINED" => Ok(Self::Declined),
            "COVER_DECLINED" => Ok(Self::CoverDeclined),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidLeaveStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a request asking a colleague to cover a leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverRequestStatus {
    /// Awaiting a response.
    Pending,
    /// The cover employee agreed.
    Accepted,
    /// The cover employee refused.
    Declined,
    /// Closed without a response.
    Expired,
}

impl CoverRequestStatus {
    /// Converts this status to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl FromStr for CoverRequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "DECLINED" => Ok(Self::Declined),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidCoverRequestStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for CoverRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a cover-duty reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReassignmentStatus {
    /// Waiting for an admin to pick a new cover employee.
    Pending,
    /// A new cover employee has been assigned.
    Assigned,
}

impl ReassignmentStatus {
    /// Converts this status to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Assigned => "ASSIGNED",
        }
    }
}

impl FromStr for ReassignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ASSIGNED" => Ok(Self::Assigned),
            _ => Err(DomainError::InvalidReassignmentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReassignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which half of the working day a half-day leave covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HalfDayType {
    /// Morning.
    FirstHalf,
    /// Afternoon.
    SecondHalf,
}

impl HalfDayType {
    /// Converts this half-day type to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstHalf => "FIRST_HALF",
            Self::SecondHalf => "SECOND_HALF",
        }
    }
}

impl FromStr for HalfDayType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FIRST_HALF" | "MORNING" => Ok(Self::FirstHalf),
            "SECOND_HALF" | "AFTERNOON" => Ok(Self::SecondHalf),
            _ => Err(DomainError::InvalidHalfDayType(s.to_string())),
        }
    }
}

impl std::fmt::Display for HalfDayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of a public holiday, derived from its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolidayCategory {
    /// Mercantile holiday: private-sector offices close.
    Mercantile,
    /// Full-moon Poya day.
    Poya,
    /// Bank holiday only.
    Bank,
    /// Public holiday that is not a mercantile holiday.
    Public,
    /// Anything else.
    Other,
}

impl HolidayCategory {
    /// Classifies a holiday description such as `"Public, Bank, Mercantile"`.
    ///
    /// Descriptions often list several categories; the one that closes the
    /// office wins.
    #[must_use]
    pub fn from_description(description: &str) -> Self {
        let lower: String = description.to_ascii_lowercase();
        if lower.contains("mercantile") {
            Self::Mercantile
        } else if lower.contains("poya") {
            Self::Poya
        } else if lower.contains("bank") {
            Self::Bank
        } else if lower.contains("public") {
            Self::Public
        } else {
            Self::Other
        }
    }

    /// Returns whether holidays of this category are excluded from working days.
    #[must_use]
    pub const fn is_non_working(&self) -> bool {
        matches!(self, Self::Mercantile | Self::Poya)
    }
}

/// A dated public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// Database identifier, `None` before persistence.
    pub holiday_id: Option<i64>,
    /// The holiday date.
    pub date: Date,
    /// Display name, e.g. "Vesak Full Moon Poya Day".
    pub name: String,
    /// Category text, e.g. "Public, Bank, Mercantile".
    pub description: String,
}

impl PublicHoliday {
    /// Creates a holiday that has not been persisted yet.
    #[must_use]
    pub fn new(date: Date, name: &str, description: &str) -> Self {
        Self {
            holiday_id: None,
            date,
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// Returns the category this holiday belongs to.
    #[must_use]
    pub fn category(&self) -> HolidayCategory {
        HolidayCategory::from_description(&self.description)
    }
}

/// An employee as seen by the leave engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Database identifier.
    pub employee_id: i64,
    /// Full name.
    pub name: String,
    /// Address used for templated emails.
    pub email: String,
    /// Whether this employee receives admin notifications and may decide leaves.
    pub is_admin: bool,
    /// Free-form admin classification (e.g. "HR", "SUPER_ADMIN").
    pub admin_type: Option<String>,
    /// Inactive employees cannot apply, cover, or be notified.
    pub is_active: bool,
    /// Whether the employee is still on probation.
    pub is_probation: bool,
    /// The date the employee was confirmed in service, if ever.
    pub confirmed_at: Option<Date>,
}

/// A persisted leave application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    /// Database identifier.
    pub leave_id: i64,
    /// The applicant.
    pub employee_id: i64,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: Date,
    /// Last day of leave (inclusive).
    pub end_date: Date,
    /// Working days requested.
    pub total_days: HalfDays,
    /// Free-text reason given by the applicant.
    pub reason: String,
    /// The colleague covering this leave. `None` only for official leave.
    pub cover_employee_id: Option<i64>,
    /// Reference to an uploaded medical certificate.
    pub medical_cert_path: Option<String>,
    /// Current lifecycle state.
    pub status: LeaveStatus,
    /// Whether the leave exceeded the balance when it was requested.
    pub is_no_pay: bool,
    /// Set for half-day leaves.
    pub half_day_type: Option<HalfDayType>,
    /// Message left by the deciding admin.
    pub admin_response: Option<String>,
    /// Message left by the cover employee, or by the sweeper on expiry.
    pub cover_response: Option<String>,
    /// When the leave was created.
    pub created_at: OffsetDateTime,
    /// When the leave was last changed.
    pub updated_at: OffsetDateTime,
}

impl Leave {
    /// Returns the inclusive date range of this leave.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        // start <= end is enforced on insert.
        DateRange::from_bounds_unchecked(self.start_date, self.end_date)
    }
}

/// A request asking a colleague to cover a leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverRequest {
    /// Database identifier.
    pub cover_request_id: i64,
    /// The leave this request belongs to (one request per leave).
    pub leave_id: i64,
    /// The employee asked to cover.
    pub cover_employee_id: i64,
    /// Current status.
    pub status: CoverRequestStatus,
    /// When the request was created.
    pub created_at: OffsetDateTime,
    /// Always exactly 24 hours after `created_at`.
    pub expires_at: OffsetDateTime,
    /// When the cover employee answered, or the request was closed.
    pub responded_at: Option<OffsetDateTime>,
}

impl CoverRequest {
    /// Returns whether the request is still pending past its expiry at `now`.
    #[must_use]
    pub fn is_stale_at(&self, now: OffsetDateTime) -> bool {
        self.status == CoverRequestStatus::Pending && self.expires_at < now
    }
}

/// A pending or resolved substitution of a cover employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverDutyReassignment {
    /// Database identifier.
    pub reassignment_id: i64,
    /// The approved leave that still needs a cover.
    pub original_leave_id: i64,
    /// The new leave of the cover employee that caused the conflict.
    pub cover_employee_leave_id: i64,
    /// The employee who can no longer cover.
    pub original_cover_employee_id: i64,
    /// Current status.
    pub status: ReassignmentStatus,
    /// The substitute chosen by an admin.
    pub new_cover_employee_id: Option<i64>,
    /// When the conflict was detected.
    pub created_at: OffsetDateTime,
    /// When an admin resolved it.
    pub resolved_at: Option<OffsetDateTime>,
}
