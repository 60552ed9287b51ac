// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixed-point day counts in half-day units.
//!
//! Every day quantity in the leave engine (requested days, balance buckets,
//! allotments) is a non-negative multiple of 0.5. Storing the count as an
//! integer number of half days keeps comparisons exact at the 0.5 boundaries
//! used throughout validation.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// A non-negative day count stored as half-day units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HalfDays(u32);

impl HalfDays {
    /// Zero days.
    pub const ZERO: Self = Self(0);

    /// Exactly half a day.
    pub const HALF: Self = Self(1);

    /// Creates a count from raw half-day units.
    #[must_use]
    pub const fn from_units(units: u32) -> Self {
        Self(units)
    }

    /// Creates a count of whole days.
    #[must_use]
    pub const fn whole_days(days: u32) -> Self {
        Self(days * 2)
    }

    /// Returns the raw half-day units.
    #[must_use]
    pub const fn units(self) -> u32 {
        self.0
    }

    /// Returns whether the count is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns whether the count is a whole number of days.
    #[must_use]
    pub const fn is_whole_days(self) -> bool {
        self.0 % 2 == 0
    }

    /// Subtracts `other`, flooring the result at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Converts to a floating-point day value for display on the wire.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl Add for HalfDays {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for HalfDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole: u32 = self.0 / 2;
        if self.is_whole_days() {
            write!(f, "{whole}")
        } else {
            write!(f, "{whole}.5")
        }
    }
}

impl FromStr for HalfDays {
    type Err = DomainError;

    /// Parses decimal day strings such as `"2"`, `"1.5"` or `"0.50"`.
    ///
    /// Any fractional part other than `.0` or `.5` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidDayCount(s.to_string());
        let trimmed: &str = s.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole_days: u32 = whole.parse().map_err(|_| invalid())?;
        let fraction: &str = fraction.trim_end_matches('0');
        let half: u32 = match fraction {
            "" => 0,
            "5" => 1,
            _ => return Err(invalid()),
        };

        whole_days
            .checked_mul(2)
            .and_then(|units| units.checked_add(half))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Serialize for HalfDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for HalfDays {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: f64 = f64::deserialize(deserializer)?;
        let doubled: f64 = value * 2.0;
        if value < 0.0 || doubled.fract() != 0.0 || doubled > f64::from(u32::MAX) {
            return Err(serde::de::Error::custom(format!(
                "{value} is not a non-negative multiple of 0.5"
            )));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(doubled as u32))
    }
}
