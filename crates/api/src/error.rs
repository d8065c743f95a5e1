// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use wash_track_domain::DomainError;
use wash_track_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed: missing, invalid, or expired credentials.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The account is suspended and may not act.
    AccountSuspended,
    /// Authorization failed: the caller's role does not permit the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The roles permitted to perform this action.
        required_roles: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::AccountSuspended => write!(f, "Account suspended"),
            Self::Unauthorized {
                action,
                required_roles,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_roles}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent
/// the API contract: the server layer maps each variant to exactly one
/// HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed (HTTP 401).
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed (HTTP 403).
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The roles permitted to perform this action.
        required_roles: String,
    },
    /// Invalid input was provided (HTTP 400).
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found (HTTP 404).
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred (HTTP 500).
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_roles,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_roles}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::AccountSuspended => Self::Unauthorized {
                action: String::from("authenticate"),
                required_roles: String::from("an active account"),
            },
            AuthError::Unauthorized {
                action,
                required_roles,
            } => Self::Unauthorized {
                action,
                required_roles,
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(message) => Self::ResourceNotFound {
                resource_type: String::from("Record"),
                message,
            },
            _ => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// Domain errors are always the caller's fault, so every variant maps
/// to `InvalidInput`.
#[must_use]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    let field: &'static str = match err {
        DomainError::InvalidRole(_) => "role",
        DomainError::InvalidFacilityType(_) => "type",
        DomainError::InvalidFacilityStatus(_) | DomainError::InvalidReportStatus(_) => "status",
        DomainError::InvalidIssueType(_) => "issueType",
        DomainError::InvalidAuditAction(_) => "action",
        DomainError::InvalidTargetKind(_) => "targetKind",
        DomainError::MissingField { field } => field,
        DomainError::InvalidDate { .. } => "date",
        DomainError::InvalidEmail(_) => "email",
    };
    ApiError::InvalidInput {
        field: String::from(field),
        message: err.to_string(),
    }
}
