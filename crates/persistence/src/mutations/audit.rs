// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover_audit::AuditEvent;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{ActionData, CauseData, StateSnapshotData, encode_timestamp};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Persists an audit event.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist; its leave ID must already be bound
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let cause_json: String = serde_json::to_string(&CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    })?;
    let action_json: String = serde_json::to_string(&ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    })?;
    let before_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.before.data.clone(),
    })?;
    let after_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.after.data.clone(),
    })?;

    diesel::insert_into(audit_events::table)
        .values((
            audit_events::leave_id.eq(event.leave_id),
            audit_events::actor_employee_id.eq(event.actor.employee_id),
            audit_events::actor_role.eq(event.actor.role.as_str()),
            audit_events::cause_json.eq(&cause_json),
            audit_events::action_json.eq(&action_json),
            audit_events::before_snapshot_json.eq(&before_json),
            audit_events::after_snapshot_json.eq(&after_json),
            audit_events::occurred_at.eq(encode_timestamp(event.occurred_at)?),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        event_id,
        leave_id = event.leave_id,
        action = %event.action.name,
        actor = %event.actor,
        "Persisted audit event"
    );
    Ok(event_id)
}
