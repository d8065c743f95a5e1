// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User queries.

use diesel::prelude::*;
use wash_track_domain::{Role, User};

use crate::data_models::UserRow;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Looks up a user by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<User>, PersistenceError> {
    user_row_by_id(conn, user_id)?
        .map(UserRow::into_user)
        .transpose()
}

/// Looks up a raw user row by id (includes the password hash).
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn user_row_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserRow>, PersistenceError> {
    Ok(users::table
        .filter(users::user_id.eq(user_id))
        .first::<UserRow>(conn)
        .optional()?)
}

/// Looks up a raw user row by email (includes the password hash).
///
/// The email is normalized to lowercase before lookup, matching the
/// normalization applied at creation.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn user_row_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserRow>, PersistenceError> {
    let normalized_email: String = email.to_lowercase();
    Ok(users::table
        .filter(users::email.eq(&normalized_email))
        .first::<UserRow>(conn)
        .optional()?)
}

/// Lists all users.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn list_all_users(conn: &mut SqliteConnection) -> Result<Vec<User>, PersistenceError> {
    let rows: Vec<UserRow> = users::table.order(users::user_id.asc()).load(conn)?;
    rows.into_iter().map(UserRow::into_user).collect()
}

/// Lists users holding a specific role.
///
/// Used for the manager-facing listing, which is restricted to staff
/// server-side; that filter is a security boundary, not a UI nicety.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn list_users_with_role(
    conn: &mut SqliteConnection,
    role: Role,
) -> Result<Vec<User>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .filter(users::role.eq(role.as_str()))
        .order(users::user_id.asc())
        .load(conn)?;
    rows.into_iter().map(UserRow::into_user).collect()
}

/// Whether any admin user exists.
///
/// Used at startup to decide whether to seed the bootstrap admin.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn admin_exists(conn: &mut SqliteConnection) -> Result<bool, PersistenceError> {
    let count: i64 = users::table
        .filter(users::role.eq(Role::Admin.as_str()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Verifies a plain-text password against a stored hash.
///
/// # Arguments
///
/// * `password` - The plain-text password to check
/// * `password_hash` - The stored bcrypt hash
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    Ok(bcrypt::verify(password, password_hash)?)
}
