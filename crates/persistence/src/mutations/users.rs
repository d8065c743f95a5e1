// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User mutations.
//!
//! The `email` is normalized to lowercase for case-insensitive
//! uniqueness. Passwords are hashed with bcrypt before storage; the
//! plain text never leaves this module's arguments.

use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;
use wash_track_domain::{Role, User};

use crate::backend::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::queries;

/// Creates a new user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The display name
/// * `email` - The email address (will be normalized)
/// * `phone` - Optional contact number
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The initial role
///
/// # Errors
///
/// Returns an error if hashing fails or the email already exists.
pub fn create_user(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    phone: Option<&str>,
    password: &str,
    role: Role,
) -> Result<User, PersistenceError> {
    let normalized_email: String = email.to_lowercase();
    let now: String = format_timestamp(OffsetDateTime::now_utc())?;

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

    diesel::insert_into(users::table)
        .values((
            users::name.eq(name),
            users::email.eq(&normalized_email),
            users::password_hash.eq(&password_hash),
            users::role.eq(role.as_str()),
            users::phone.eq(phone),
            users::suspended.eq(0),
            users::created_at.eq(&now),
        ))
        .execute(conn)?;

    let user_id: i64 = get_last_insert_rowid(conn)?;
    info!(user_id, email = %normalized_email, role = role.as_str(), "User created");

    queries::users::user_by_id(conn, user_id)?
        .ok_or_else(|| PersistenceError::Other(String::from("Created user not readable")))
}

/// Changes a user's role.
///
/// # Errors
///
/// Returns an error if the write fails.
///
/// # Returns
///
/// `Ok(None)` if no user with that id exists.
pub fn set_user_role(
    conn: &mut SqliteConnection,
    user_id: i64,
    role: Role,
) -> Result<Option<User>, PersistenceError> {
    let updated: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::role.eq(role.as_str()))
        .execute(conn)?;

    if updated == 0 {
        return Ok(None);
    }

    info!(user_id, role = role.as_str(), "User role changed");
    queries::users::user_by_id(conn, user_id)
}

/// Sets or clears a user's suspended flag.
///
/// # Errors
///
/// Returns an error if the write fails.
///
/// # Returns
///
/// `Ok(None)` if no user with that id exists.
pub fn set_user_suspended(
    conn: &mut SqliteConnection,
    user_id: i64,
    suspended: bool,
) -> Result<Option<User>, PersistenceError> {
    let updated: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::suspended.eq(i32::from(suspended)))
        .execute(conn)?;

    if updated == 0 {
        return Ok(None);
    }

    info!(user_id, suspended, "User suspension changed");
    queries::users::user_by_id(conn, user_id)
}

/// Hard-deletes a user.
///
/// Sessions cascade via the foreign key. Reports and audit records
/// referencing the user are left in place; readers expand the dangling
/// reference to "unknown".
///
/// # Errors
///
/// Returns an error if the delete fails.
///
/// # Returns
///
/// `false` if no user with that id existed.
pub fn delete_user(conn: &mut SqliteConnection, user_id: i64) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(users::table)
        .filter(users::user_id.eq(user_id))
        .execute(conn)?;

    if deleted > 0 {
        info!(user_id, "User deleted");
    }
    Ok(deleted > 0)
}
