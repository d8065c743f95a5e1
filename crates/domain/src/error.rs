// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Role value is not one of the recognized roles.
    InvalidRole(String),
    /// Facility type is not one of the recognized types.
    InvalidFacilityType(String),
    /// Facility status is not one of the recognized statuses.
    InvalidFacilityStatus(String),
    /// Issue type is not one of the recognized issue types.
    InvalidIssueType(String),
    /// Report status is not one of the recognized statuses.
    InvalidReportStatus(String),
    /// Audit action is not one of the recognized actions.
    InvalidAuditAction(String),
    /// Audit target kind is not one of the recognized kinds.
    InvalidTargetKind(String),
    /// A required field is missing or empty.
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },
    /// A date value could not be parsed.
    InvalidDate {
        /// The raw value that failed to parse.
        value: String,
    },
    /// An email address is syntactically unacceptable.
    InvalidEmail(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(value) => write!(f, "Invalid role: '{value}'"),
            Self::InvalidFacilityType(value) => write!(f, "Invalid facility type: '{value}'"),
            Self::InvalidFacilityStatus(value) => {
                write!(f, "Invalid facility status: '{value}'")
            }
            Self::InvalidIssueType(value) => write!(f, "Invalid issue type: '{value}'"),
            Self::InvalidReportStatus(value) => write!(f, "Invalid report status: '{value}'"),
            Self::InvalidAuditAction(value) => write!(f, "Invalid audit action: '{value}'"),
            Self::InvalidTargetKind(value) => write!(f, "Invalid audit target kind: '{value}'"),
            Self::MissingField { field } => write!(f, "Missing required field: '{field}'"),
            Self::InvalidDate { value } => write!(f, "Invalid date value: '{value}'"),
            Self::InvalidEmail(value) => write!(f, "Invalid email address: '{value}'"),
        }
    }
}

impl std::error::Error for DomainError {}
