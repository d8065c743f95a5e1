// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for authenticated routes.
//!
//! The extractor validates the `Authorization: Bearer <token>` header
//! against the session store and yields the authenticated [`Caller`].
//! Missing or invalid tokens reject with 401; a valid token on a
//! suspended account rejects with 403.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use wash_track_api::{AuthError, AuthenticationService, Caller};

use crate::{AppState, ErrorResponse};

/// Extractor for the authenticated caller on bearer-auth routes.
pub struct SessionCaller(pub Caller);

impl FromRequestParts<AppState> for SessionCaller {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token: &str = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        let mut store = state.store.lock().await;
        let caller: Caller =
            AuthenticationService::validate_session(&mut store, token).map_err(|e| {
                warn!(error = %e, "Session validation failed");
                match e {
                    AuthError::AccountSuspended => SessionError::Suspended,
                    _ => SessionError::InvalidSession(e.to_string()),
                }
            })?;

        debug!(user_id = caller.user_id, role = ?caller.role, "Session validated");
        Ok(Self(caller))
    }
}

/// Session extraction errors, converted directly to HTTP responses.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
    /// The account behind the session is suspended.
    Suspended,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Missing Authorization header"),
            ),
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Invalid Authorization header"),
            ),
            Self::InvalidSession(message) => (StatusCode::UNAUTHORIZED, message),
            Self::Suspended => (StatusCode::FORBIDDEN, String::from("Account suspended")),
        };
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message,
        });
        (status, body).into_response()
    }
}
