// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session mutations.

use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::format_timestamp;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;

/// Creates a session row for an issued bearer token.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    token: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<(), PersistenceError> {
    let now: String = format_timestamp(OffsetDateTime::now_utc())?;

    diesel::insert_into(sessions::table)
        .values((
            sessions::token.eq(token),
            sessions::user_id.eq(user_id),
            sessions::expires_at.eq(expires_at),
            sessions::created_at.eq(&now),
        ))
        .execute(conn)?;

    debug!(user_id, "Session created");
    Ok(())
}

/// Deletes a session by token (logout).
///
/// # Errors
///
/// Returns an error if the delete fails.
///
/// # Returns
///
/// `false` if no session with that token existed.
pub fn delete_session(conn: &mut SqliteConnection, token: &str) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table)
        .filter(sessions::token.eq(token))
        .execute(conn)?;

    Ok(deleted > 0)
}
