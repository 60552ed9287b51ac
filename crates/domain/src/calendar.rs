// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Working-day arithmetic.
//!
//! A working day is any calendar day that is not a Sunday and not a
//! non-working public holiday (Mercantile or Poya). Saturdays count.

use crate::date_range::DateRange;
use crate::types::PublicHoliday;
use std::collections::BTreeSet;
use time::{Date, Weekday};

/// The set of dates excluded from working-day counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<Date>,
}

impl HolidaySet {
    /// Creates an empty holiday set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dates: BTreeSet::new(),
        }
    }

    /// Builds the set from public holidays, keeping only non-working categories.
    #[must_use]
    pub fn from_holidays<'a, I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = &'a PublicHoliday>,
    {
        let dates: BTreeSet<Date> = holidays
            .into_iter()
            .filter(|holiday| holiday.category().is_non_working())
            .map(|holiday| holiday.date)
            .collect();
        Self { dates }
    }

    /// Builds the set from raw dates, all treated as non-working.
    #[must_use]
    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = Date>,
    {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Returns whether `date` is a non-working holiday.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.dates.contains(&date)
    }

    /// Returns the number of holidays in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Returns whether `date` is a working day.
#[must_use]
pub fn is_working_day(date: Date, holidays: &HolidaySet) -> bool {
    date.weekday() != Weekday::Sunday && !holidays.contains(date)
}

/// Counts the working days in an inclusive date range.
///
/// Half-day leaves do not go through this function; their total is fixed
/// at 0.5 by the caller.
///
/// # Arguments
///
/// * `range` - The inclusive range to count
/// * `holidays` - Non-working holidays to exclude
///
/// # Returns
///
/// The number of days in `range` that are neither Sundays nor holidays.
#[must_use]
pub fn count_working_days(range: DateRange, holidays: &HolidaySet) -> u32 {
    let count: usize = range
        .days()
        .filter(|day| is_working_day(*day, holidays))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
