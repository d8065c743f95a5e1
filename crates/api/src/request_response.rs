// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These types are the wire contract: camelCase field names, enum
//! values as their wire strings, timestamps as ISO-8601 text. They are
//! distinct from domain types; the handler functions translate between
//! the two and reject unknown enum values at the boundary.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;
use wash_track_audit::AuditRecord;
use wash_track_domain::{Facility, Report, User};

use crate::error::ApiError;

/// Formats a timestamp for the wire.
///
/// # Errors
///
/// Returns an internal error if formatting fails.
pub fn format_wire_timestamp(ts: OffsetDateTime) -> Result<String, ApiError> {
    ts.format(&Iso8601::DEFAULT).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn format_optional(ts: Option<OffsetDateTime>) -> Result<Option<String>, ApiError> {
    ts.map(format_wire_timestamp).transpose()
}

/// API request to register a new user. Registration always creates a
/// staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// The user's display name.
    pub name: String,
    /// The user's email. Unique, case-insensitive.
    pub email: String,
    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// The plaintext password; hashed before storage.
    pub password: String,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The account email.
    pub email: String,
    /// The plaintext password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer session token.
    pub token: String,
    /// The authenticated user.
    pub user: UserInfo,
}

/// A user as exposed on the wire. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// The user id.
    pub id: i64,
    /// The display name.
    pub name: String,
    /// The email.
    pub email: String,
    /// The role's wire string.
    pub role: String,
    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Whether the account is suspended.
    pub suspended: bool,
    /// Creation timestamp, ISO-8601.
    pub created_at: String,
}

impl UserInfo {
    /// Builds the wire view of a user record.
    ///
    /// # Errors
    ///
    /// Returns an internal error if timestamp formatting fails.
    pub fn from_user(user: &User) -> Result<Self, ApiError> {
        Ok(Self {
            id: user.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            phone: user.phone.clone(),
            suspended: user.suspended,
            created_at: format_wire_timestamp(user.created_at)?,
        })
    }
}

/// API request to create a facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityRequest {
    /// The facility name.
    pub name: String,
    /// The facility type's wire string.
    #[serde(rename = "type")]
    pub facility_type: String,
    /// Free-text location.
    pub location: String,
    /// Optional status wire string; defaults to Working.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Optional last-inspection timestamp, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_inspected: Option<String>,
}

/// API request to partially update a facility. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFacilityRequest {
    /// New name, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New facility type wire string, if supplied.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub facility_type: Option<String>,
    /// New location, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New status wire string, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// New last-inspection timestamp, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_inspected: Option<String>,
}

/// A facility as exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityInfo {
    /// The facility id.
    pub id: i64,
    /// The facility name.
    pub name: String,
    /// The facility type's wire string.
    #[serde(rename = "type")]
    pub facility_type: String,
    /// Free-text location.
    pub location: String,
    /// The status's wire string.
    pub status: String,
    /// Last-inspection timestamp, ISO-8601, if recorded.
    pub last_inspected: Option<String>,
    /// Creation timestamp, ISO-8601.
    pub created_at: String,
    /// Last-update timestamp, ISO-8601.
    pub updated_at: String,
}

impl FacilityInfo {
    /// Builds the wire view of a facility record.
    ///
    /// # Errors
    ///
    /// Returns an internal error if timestamp formatting fails.
    pub fn from_facility(facility: &Facility) -> Result<Self, ApiError> {
        Ok(Self {
            id: facility.facility_id,
            name: facility.name.clone(),
            facility_type: facility.facility_type.as_str().to_string(),
            location: facility.location.clone(),
            status: facility.status.as_str().to_string(),
            last_inspected: format_optional(facility.last_inspected)?,
            created_at: format_wire_timestamp(facility.created_at)?,
            updated_at: format_wire_timestamp(facility.updated_at)?,
        })
    }
}

/// Fields submitted when creating a report.
///
/// Arrives as multipart text fields alongside optional image parts; the
/// server layer assembles this struct before calling the handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    /// The reported facility's id. Required but deliberately not
    /// verified to resolve.
    pub facility_id: i64,
    /// Optional observation timestamp, ISO-8601; defaults to now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// The issue type's wire string.
    pub issue_type: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// API request to partially update a report's descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    /// New facility reference, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<i64>,
    /// New observation timestamp, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// New issue type wire string, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    /// New description, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// API request to transition a report's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReportStatusRequest {
    /// The new status's wire string.
    pub status: String,
}

/// A report as exposed on the wire, with references expanded.
///
/// `facility`, `reported_by`, and `resolved_by` expand to full records
/// when they still resolve and `null` when they dangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    /// The report id.
    pub id: i64,
    /// The referenced facility, or `null` if it was deleted.
    pub facility: Option<FacilityInfo>,
    /// The reporting user, or `null` if they were deleted.
    pub reported_by: Option<UserInfo>,
    /// Observation timestamp, ISO-8601.
    pub date: String,
    /// The issue type's wire string.
    pub issue_type: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// The status's wire string.
    pub status: String,
    /// Stored image path references, in submission order.
    pub images: Vec<String>,
    /// The resolving user, set iff status is resolved.
    pub resolved_by: Option<UserInfo>,
    /// Resolution timestamp, set iff status is resolved.
    pub resolved_at: Option<String>,
    /// Creation timestamp, ISO-8601.
    pub created_at: String,
    /// Last-update timestamp, ISO-8601.
    pub updated_at: String,
}

/// API request to change a user's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    /// The new role's wire string.
    pub role: String,
}

/// API request to suspend or reinstate a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSuspendedRequest {
    /// The new suspended flag.
    pub suspended: bool,
}

/// An audit log entry as exposed on the wire, actor expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogInfo {
    /// The log entry id.
    pub id: i64,
    /// The acting user, or `null` if they were deleted.
    pub user: Option<ActorInfo>,
    /// The action's wire string.
    pub action: String,
    /// The target kind's wire string.
    pub target_kind: String,
    /// The mutated entity's id.
    pub target_id: i64,
    /// Write-time timestamp, ISO-8601.
    pub timestamp: String,
    /// The structured details payload.
    pub details: serde_json::Value,
}

/// The actor snapshot embedded in an audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInfo {
    /// The actor's user id.
    pub id: i64,
    /// The actor's display name.
    pub name: String,
    /// The actor's email.
    pub email: String,
    /// The actor's role wire string.
    pub role: String,
}

impl AuditLogInfo {
    /// Builds the wire view of an audit record and its expanded actor.
    ///
    /// # Errors
    ///
    /// Returns an internal error if timestamp formatting fails.
    pub fn from_record(record: &AuditRecord, actor: Option<&User>) -> Result<Self, ApiError> {
        Ok(Self {
            id: record.log_id,
            user: actor.map(|u| ActorInfo {
                id: u.user_id,
                name: u.name.clone(),
                email: u.email.clone(),
                role: u.role.as_str().to_string(),
            }),
            action: record.action.as_str().to_string(),
            target_kind: record.target_kind.as_str().to_string(),
            target_id: record.target_id,
            timestamp: format_wire_timestamp(record.timestamp)?,
            details: record.details.clone(),
        })
    }
}

/// A bare confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The confirmation text.
    pub message: String,
}

/// Expands a report's references for the wire.
///
/// Lookups that fail to resolve become `null`, never errors: reports
/// outlive the facilities and users they reference.
pub(crate) fn report_info(
    report: &Report,
    facility: Option<&Facility>,
    reporter: Option<&User>,
    resolver: Option<&User>,
) -> Result<ReportInfo, ApiError> {
    Ok(ReportInfo {
        id: report.report_id,
        facility: facility.map(FacilityInfo::from_facility).transpose()?,
        reported_by: reporter.map(UserInfo::from_user).transpose()?,
        date: format_wire_timestamp(report.date)?,
        issue_type: report.issue_type.as_str().to_string(),
        description: report.description.clone(),
        status: report.status.as_str().to_string(),
        images: report.images.clone(),
        resolved_by: resolver.map(UserInfo::from_user).transpose()?,
        resolved_at: format_optional(report.resolved_at)?,
        created_at: format_wire_timestamp(report.created_at)?,
        updated_at: format_wire_timestamp(report.updated_at)?,
    })
}
