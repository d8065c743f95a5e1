// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User administration operations.
//!
//! Listing is scoped by role: admins see every user, managers see only
//! staff. Role changes, suspension, and deletion are admin-only, and an
//! admin may not change their own role.

use std::str::FromStr;
use wash_track_domain::{Role, User};
use wash_track_persistence::SqliteStore;

use crate::auth::{Caller, authorize};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::UserInfo;

/// Lists users visible to the caller.
///
/// # Errors
///
/// Returns an error if the caller is staff or the query fails.
pub fn list_users(store: &mut SqliteStore, caller: &Caller) -> Result<Vec<UserInfo>, ApiError> {
    authorize(caller, &[Role::Admin, Role::Manager], "list_users")?;

    let users: Vec<User> = match caller.role {
        Role::Admin => store.list_all_users()?,
        _ => store.list_users_with_role(Role::Staff)?,
    };
    users.iter().map(UserInfo::from_user).collect()
}

/// Changes a user's role.
///
/// A caller may not change their own role, so a site always keeps at
/// least the acting admin.
///
/// # Errors
///
/// Returns an error if the caller is not admin, the role is unknown,
/// the target is the caller, or the user does not exist.
pub fn change_role(
    store: &mut SqliteStore,
    caller: &Caller,
    user_id: i64,
    role_value: &str,
) -> Result<UserInfo, ApiError> {
    authorize(caller, &[Role::Admin], "change_role")?;

    let role: Role = Role::from_str(role_value).map_err(|e| translate_domain_error(&e))?;
    if user_id == caller.user_id {
        return Err(ApiError::InvalidInput {
            field: String::from("role"),
            message: String::from("Cannot change your own role"),
        });
    }

    let user: User = store
        .set_user_role(user_id, role)?
        .ok_or_else(|| not_found(user_id))?;
    tracing::info!(user_id, role = role.as_str(), admin = caller.user_id, "role changed");
    UserInfo::from_user(&user)
}

/// Suspends or reinstates a user.
///
/// # Errors
///
/// Returns an error if the caller is not admin or the user does not
/// exist.
pub fn set_suspended(
    store: &mut SqliteStore,
    caller: &Caller,
    user_id: i64,
    suspended: bool,
) -> Result<UserInfo, ApiError> {
    authorize(caller, &[Role::Admin], "set_suspended")?;

    let user: User = store
        .set_user_suspended(user_id, suspended)?
        .ok_or_else(|| not_found(user_id))?;
    tracing::info!(user_id, suspended, admin = caller.user_id, "suspension changed");
    UserInfo::from_user(&user)
}

/// Hard-deletes a user.
///
/// Sessions cascade. Reports and audit records keep their references,
/// which readers then expand to `null`.
///
/// # Errors
///
/// Returns an error if the caller is not admin or the user does not
/// exist.
pub fn delete_user(store: &mut SqliteStore, caller: &Caller, user_id: i64) -> Result<(), ApiError> {
    authorize(caller, &[Role::Admin], "delete_user")?;

    if !store.delete_user(user_id)? {
        return Err(not_found(user_id));
    }
    tracing::info!(user_id, admin = caller.user_id, "user deleted");
    Ok(())
}

fn not_found(user_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("User"),
        message: format!("No user with id {user_id}"),
    }
}
