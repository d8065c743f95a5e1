// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log appends.
//!
//! This is the only write path for audit records. There is no update or
//! delete; the log is append-only by construction.

use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;
use wash_track_audit::{AuditAction, TargetKind};

use crate::backend::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::audit_logs;
use crate::error::PersistenceError;

/// Appends one audit record describing a mutation.
///
/// The timestamp is set here, at write time; it is never
/// client-supplied.
///
/// # Arguments
///
/// * `conn` - The database connection (inside the mutation transaction)
/// * `user_id` - The acting user
/// * `action` - The kind of mutation
/// * `target_kind` - The kind of entity mutated
/// * `target_id` - The mutated entity's id
/// * `details` - Submitted fields for create/update, prior record for delete
///
/// # Errors
///
/// Returns an error if the insert fails; the enclosing transaction is
/// expected to roll the primary mutation back in that case.
pub fn append_entry(
    conn: &mut SqliteConnection,
    user_id: i64,
    action: AuditAction,
    target_kind: TargetKind,
    target_id: i64,
    details: &serde_json::Value,
) -> Result<i64, PersistenceError> {
    let timestamp: String = format_timestamp(OffsetDateTime::now_utc())?;
    let details_json: String = serde_json::to_string(details)?;

    diesel::insert_into(audit_logs::table)
        .values((
            audit_logs::user_id.eq(user_id),
            audit_logs::action.eq(action.as_str()),
            audit_logs::target_kind.eq(target_kind.as_str()),
            audit_logs::target_id.eq(target_id),
            audit_logs::timestamp.eq(&timestamp),
            audit_logs::details_json.eq(&details_json),
        ))
        .execute(conn)?;

    let log_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        log_id,
        user_id,
        action = action.as_str(),
        target_kind = target_kind.as_str(),
        target_id,
        "Appended audit record"
    );

    Ok(log_id)
}
