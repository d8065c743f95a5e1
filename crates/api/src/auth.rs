// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization.
//!
//! Bearer tokens are opaque session tokens stored server-side. The gate
//! always runs in the same order before any mutating handler body:
//! authenticate the token to a [`Caller`], then authorize the caller's
//! role against the operation's allowed set.

use time::{Duration, OffsetDateTime};
use wash_track_domain::{DomainError, Role, User};
use wash_track_persistence::{SqliteStore, UserRow, parse_timestamp, verify_password};

use crate::error::AuthError;

/// An authenticated caller resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// The caller's user id.
    pub user_id: i64,
    /// The caller's display name.
    pub name: String,
    /// The caller's email.
    pub email: String,
    /// The caller's role.
    pub role: Role,
}

impl Caller {
    /// Builds a caller from a user record.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Checks that a caller's role is in the allowed set for an action.
///
/// # Arguments
///
/// * `caller` - The authenticated caller
/// * `allowed` - The non-empty set of roles permitted to perform the action
/// * `action` - The action name, used in the rejection message
///
/// # Errors
///
/// Returns an error if the caller's role is not in the allowed set.
pub fn authorize(caller: &Caller, allowed: &[Role], action: &str) -> Result<(), AuthError> {
    if allowed.contains(&caller.role) {
        return Ok(());
    }
    let required_roles: String = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<&str>>()
        .join(" or ");
    Err(AuthError::Unauthorized {
        action: action.to_string(),
        required_roles,
    })
}

/// Session-based authentication service.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime (30 days).
    const SESSION_LIFETIME: Duration = Duration::days(30);

    /// Minimum accepted password length.
    const MIN_PASSWORD_LENGTH: usize = 8;

    /// Registers a new user.
    ///
    /// Registration always creates a staff account; role changes are a
    /// separate admin operation. No audit record is written: the audit
    /// trail covers facility and report mutations only.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is invalid or the email is taken.
    pub fn register(
        store: &mut SqliteStore,
        name: &str,
        email: &str,
        phone: Option<&str>,
        password: &str,
    ) -> Result<User, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::AuthenticationFailed {
                reason: DomainError::MissingField { field: "name" }.to_string(),
            });
        }
        if !email.contains('@') {
            return Err(AuthError::AuthenticationFailed {
                reason: DomainError::InvalidEmail(email.to_string()).to_string(),
            });
        }
        if password.len() < Self::MIN_PASSWORD_LENGTH {
            return Err(AuthError::AuthenticationFailed {
                reason: format!(
                    "Password must be at least {} characters",
                    Self::MIN_PASSWORD_LENGTH
                ),
            });
        }

        store
            .create_user(name, email, phone, password, Role::Staff)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Registration failed: {e}"),
            })
    }

    /// Verifies credentials, rejects suspended accounts, and issues a
    /// session token.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `user`).
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are invalid or the account
    /// is suspended.
    pub fn login(
        store: &mut SqliteStore,
        email: &str,
        password: &str,
    ) -> Result<(String, User), AuthError> {
        let row: UserRow = store
            .user_row_by_email(email)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            })?;

        let matches: bool = verify_password(password, &row.password_hash).map_err(|e| {
            AuthError::AuthenticationFailed {
                reason: format!("Password verification failed: {e}"),
            }
        })?;
        if !matches {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            });
        }

        let user: User = row.into_user().map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Database error: {e}"),
        })?;
        if user.suspended {
            return Err(AuthError::AccountSuspended);
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime = OffsetDateTime::now_utc() + Self::SESSION_LIFETIME;
        store
            .create_session(&session_token, user.user_id, expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        tracing::info!(user_id = user.user_id, "user logged in");
        Ok((session_token, user))
    }

    /// Resolves a session token to an authenticated caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown or expired, the user no
    /// longer exists, or the account is suspended.
    pub fn validate_session(
        store: &mut SqliteStore,
        session_token: &str,
    ) -> Result<Caller, AuthError> {
        let session = store
            .session_by_token(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            parse_timestamp(&session.expires_at).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;
        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: User = store
            .user_by_id(session.user_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        if user.suspended {
            return Err(AuthError::AccountSuspended);
        }

        Ok(Caller::from_user(&user))
    }

    /// Logs out by deleting the session.
    ///
    /// Deleting an unknown token is not an error; logout is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn logout(store: &mut SqliteStore, session_token: &str) -> Result<(), AuthError> {
        store
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;
        Ok(())
    }

    /// Generates a session token from the current time and a random
    /// component.
    fn generate_session_token() -> String {
        let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!("session_{timestamp}_{:016x}", rand::random::<u64>())
    }
}
