// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use leave_cover_audit::{Action, Actor, ActorRole, AuditEvent, Cause, StateSnapshot};
use tracing::debug;

use crate::data_models::{ActionData, CauseData, StateSnapshotData, decode_enum, decode_timestamp};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    leave_id: i64,
    actor_employee_id: Option<i64>,
    actor_role: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    occurred_at: String,
}

impl AuditEventRow {
    fn into_audit_event(self) -> Result<AuditEvent, PersistenceError> {
        let role: ActorRole = decode_enum(&self.actor_role)?;
        let cause_data: CauseData = serde_json::from_str(&self.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        let actor: Actor = Actor {
            employee_id: self.actor_employee_id,
            role,
        };

        Ok(AuditEvent::new(
            self.leave_id,
            actor,
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(before_data.data),
            StateSnapshot::new(after_data.data),
            decode_timestamp(&self.occurred_at)?,
        )
        .with_event_id(self.event_id))
    }
}

/// Retrieves the audit timeline of a leave in the order events were recorded.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `leave_id` - The leave whose history to load
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
    leave_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::leave_id.eq(leave_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;
    debug!(leave_id, count = rows.len(), "Loaded audit timeline");
    rows.into_iter().map(AuditEventRow::into_audit_event).collect()
}
