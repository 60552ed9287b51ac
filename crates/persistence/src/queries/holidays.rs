// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover_domain::{DateRange, PublicHoliday};
use tracing::debug;

use crate::data_models::{decode_date, encode_date};
use crate::diesel_schema::public_holidays;
use crate::error::PersistenceError;

/// Diesel Queryable struct for public holiday rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = public_holidays)]
struct HolidayRow {
    holiday_id: i64,
    holiday_date: String,
    name: String,
    description: String,
}

impl HolidayRow {
    fn into_holiday(self) -> Result<PublicHoliday, PersistenceError> {
        Ok(PublicHoliday {
            holiday_id: Some(self.holiday_id),
            date: decode_date(&self.holiday_date)?,
            name: self.name,
            description: self.description,
        })
    }
}

/// Lists the public holidays falling within `range`, of every category.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_holidays_in_range(
    conn: &mut SqliteConnection,
    range: DateRange,
) -> Result<Vec<PublicHoliday>, PersistenceError> {
    let rows: Vec<HolidayRow> = public_holidays::table
        .filter(public_holidays::holiday_date.ge(encode_date(range.start())?))
        .filter(public_holidays::holiday_date.le(encode_date(range.end())?))
        .order(public_holidays::holiday_date.asc())
        .select(HolidayRow::as_select())
        .load(conn)?;
    debug!(count = rows.len(), %range, "Loaded holidays in range");
    rows.into_iter().map(HolidayRow::into_holiday).collect()
}

/// Lists every public holiday ordered by date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_holidays(conn: &mut SqliteConnection) -> Result<Vec<PublicHoliday>, PersistenceError> {
    let rows: Vec<HolidayRow> = public_holidays::table
        .order((public_holidays::holiday_date.asc(), public_holidays::holiday_id.asc()))
        .select(HolidayRow::as_select())
        .load(conn)?;
    rows.into_iter().map(HolidayRow::into_holiday).collect()
}
