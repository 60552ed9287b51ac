// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! Opening a database applies the connection PRAGMAs, runs the embedded
//! migrations and confirms foreign keys are enforced.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Embedded schema migrations, applied on every open.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a writer waits for a competing `BEGIN IMMEDIATE` to finish.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Where the database lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// A shared-cache in-memory database, gone when the last connection closes.
    Memory,
    /// A file on disk, journaled with WAL.
    File,
}

impl StorageMode {
    /// PRAGMAs applied right after connecting, in order.
    fn pragmas(self) -> Vec<String> {
        let mut pragmas: Vec<String> = vec![
            String::from("PRAGMA foreign_keys = ON"),
            format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"),
        ];
        if self == Self::File {
            pragmas.push(String::from("PRAGMA journal_mode = WAL"));
        }
        pragmas
    }
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Connects to `database_url`, configures the connection and migrates it.
///
/// # Arguments
///
/// * `database_url` - A shared-memory URI or a file path
/// * `mode` - Whether `database_url` names memory or a file
///
/// # Errors
///
/// Returns an error if the connection, a PRAGMA, a migration or the foreign
/// key check fails.
pub fn open(database_url: &str, mode: StorageMode) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?mode, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    for pragma in mode.pragmas() {
        diesel::sql_query(&pragma)
            .execute(&mut conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("{pragma}: {e}")))?;
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    debug!(count = applied.len(), "Applied migrations");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}

/// Returns the row ID of the most recent insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless `PRAGMA foreign_keys` reports enforcement is on.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if it is off, or a query error.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysPragma = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;

    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    debug!("SQLite foreign key enforcement is enabled");
    Ok(())
}
