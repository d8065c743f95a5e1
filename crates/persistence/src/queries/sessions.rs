// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session queries.

use diesel::prelude::*;

use crate::data_models::SessionRow;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;

/// Looks up a session by its bearer token.
///
/// Expiry is checked by the authentication service, not here; this
/// returns whatever row is stored.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn session_by_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<Option<SessionRow>, PersistenceError> {
    Ok(sessions::table
        .filter(sessions::token.eq(token))
        .first::<SessionRow>(conn)
        .optional()?)
}
