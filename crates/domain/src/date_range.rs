// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// ISO calendar date format used in storage and on the wire.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// An inclusive range of calendar dates.
///
/// Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a new inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from bounds already known to be ordered.
    pub(crate) const fn from_bounds_unchecked(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Creates a range covering a single day.
    #[must_use]
    pub const fn single(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns the first day of the range.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day of the range.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns whether the two ranges share at least one day.
    ///
    /// This single comparison is equivalent to checking whether either range
    /// starts inside, ends inside, or spans the other.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Returns whether the range spans a single day.
    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Iterates every calendar day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end: Date = self.end;
        std::iter::successors(Some(self.start), move |day| {
            day.next_day().filter(|next| *next <= end)
        })
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
