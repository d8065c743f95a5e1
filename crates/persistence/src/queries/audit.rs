// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log queries.
//!
//! The read side expands the acting user where it still resolves; audit
//! records outlive the users they reference, so the actor expansion is
//! optional.

use diesel::prelude::*;
use wash_track_audit::{AuditAction, AuditRecord};
use wash_track_domain::User;

use crate::data_models::AuditRow;
use crate::diesel_schema::audit_logs;
use crate::error::PersistenceError;
use crate::queries::users::user_by_id;

/// Lists audit records, newest first, optionally filtered by action.
///
/// Each record is paired with its actor's current user record, or
/// `None` if the actor has since been deleted.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn list_entries(
    conn: &mut SqliteConnection,
    action: Option<AuditAction>,
) -> Result<Vec<(AuditRecord, Option<User>)>, PersistenceError> {
    let mut query = audit_logs::table.into_boxed();

    if let Some(action) = action {
        query = query.filter(audit_logs::action.eq(action.as_str()));
    }

    let rows: Vec<AuditRow> = query
        .order((audit_logs::timestamp.desc(), audit_logs::log_id.desc()))
        .load::<AuditRow>(conn)?;

    let mut entries: Vec<(AuditRecord, Option<User>)> = Vec::with_capacity(rows.len());
    for row in rows {
        let record: AuditRecord = row.into_record()?;
        let actor: Option<User> = user_by_id(conn, record.user_id)?;
        entries.push((record, actor));
    }
    Ok(entries)
}

/// Counts audit records for a specific target.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_for_target(
    conn: &mut SqliteConnection,
    target_kind: &str,
    target_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(audit_logs::table
        .filter(audit_logs::target_kind.eq(target_kind))
        .filter(audit_logs::target_id.eq(target_id))
        .count()
        .get_result(conn)?)
}
