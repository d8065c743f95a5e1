// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log reads. Admin-only; the log itself is append-only and has
//! no mutation operations anywhere in the API.

use std::str::FromStr;
use wash_track_audit::AuditAction;
use wash_track_domain::Role;
use wash_track_persistence::SqliteStore;

use crate::auth::{Caller, authorize};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::AuditLogInfo;

/// Lists audit log entries, newest first, actor expanded.
///
/// # Arguments
///
/// * `action` - Optional action wire string to filter by
///
/// # Errors
///
/// Returns an error if the caller is not admin, the action filter is
/// unknown, or the query fails.
pub fn list_audit_logs(
    store: &mut SqliteStore,
    caller: &Caller,
    action: Option<&str>,
) -> Result<Vec<AuditLogInfo>, ApiError> {
    authorize(caller, &[Role::Admin], "list_audit_logs")?;

    let action_filter: Option<AuditAction> = action
        .map(AuditAction::from_str)
        .transpose()
        .map_err(|e| translate_domain_error(&e))?;

    store
        .list_audit_entries(action_filter)?
        .iter()
        .map(|(record, actor)| AuditLogInfo::from_record(record, actor.as_ref()))
        .collect()
}
