// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Column encodings shared by queries and mutations.
//!
//! Dates are stored as `YYYY-MM-DD` text so that range predicates compare
//! lexicographically, timestamps as RFC 3339 text in UTC, day counts as
//! integer half-day units, and booleans as `0`/`1`.

use leave_cover_domain::{DATE_FORMAT, HalfDays, parse_date};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::error::PersistenceError;

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Encodes a date column.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn encode_date(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Decodes a date column.
///
/// # Errors
///
/// Returns an error if the stored text is not a valid date.
pub fn decode_date(value: &str) -> Result<Date, PersistenceError> {
    parse_date(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Encodes a timestamp column, normalized to UTC.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn encode_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Decodes a timestamp column.
///
/// # Errors
///
/// Returns an error if the stored text is not RFC 3339.
pub fn decode_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Invalid timestamp '{value}': {e}"))
    })
}

/// Decodes a nullable timestamp column.
///
/// # Errors
///
/// Returns an error if the stored text is present but not RFC 3339.
pub fn decode_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(decode_timestamp).transpose()
}

/// Encodes a day count as half-day units.
///
/// # Errors
///
/// Returns an error if the count does not fit the column.
pub fn encode_half_days(days: HalfDays) -> Result<i32, PersistenceError> {
    days.units()
        .to_i32()
        .ok_or_else(|| {
            PersistenceError::SerializationError(format!("Day count {days} out of range"))
        })
}

/// Decodes half-day units into a day count.
///
/// # Errors
///
/// Returns an error if the stored value is negative.
pub fn decode_half_days(units: i32) -> Result<HalfDays, PersistenceError> {
    units.to_u32().map(HalfDays::from_units).ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("Negative half-day count {units}"))
    })
}

/// Encodes a boolean column.
#[must_use]
pub fn encode_flag(value: bool) -> i32 {
    i32::from(value)
}

/// Decodes a boolean column.
#[must_use]
pub const fn decode_flag(value: i32) -> bool {
    value != 0
}

/// Parses an enum column through its `FromStr` implementation.
///
/// # Errors
///
/// Returns an error if the stored text is not a known variant.
pub fn decode_enum<T>(value: &str) -> Result<T, PersistenceError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}
