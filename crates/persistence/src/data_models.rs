// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and conversions between stored rows and domain types.
//!
//! Timestamps are stored as ISO 8601 text; enumerations as their wire
//! strings. A row that fails to convert indicates a corrupt record, not
//! caller error.

use diesel::prelude::*;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;
use wash_track_audit::{AuditAction, AuditRecord, TargetKind};
use wash_track_domain::{Facility, FacilityStatus, FacilityType, IssueType, Report, ReportStatus, Role, User};

use crate::error::PersistenceError;

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if formatting fails (should not occur for UTC
/// timestamps).
pub fn format_timestamp(ts: OffsetDateTime) -> Result<String, PersistenceError> {
    ts.format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns a `CorruptRecord` error if the stored value does not parse.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(raw, &Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::CorruptRecord(format!("bad timestamp '{raw}': {e}")))
}

fn parse_enum<T: FromStr>(raw: &str, what: &str) -> Result<T, PersistenceError> {
    T::from_str(raw).map_err(|_| PersistenceError::CorruptRecord(format!("bad {what}: '{raw}'")))
}

/// A user row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct UserRow {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
    pub suspended: i32,
    pub created_at: String,
}

impl UserRow {
    /// Converts this row to a domain user, dropping the password hash.
    ///
    /// # Errors
    ///
    /// Returns a `CorruptRecord` error if a stored value is invalid.
    pub fn into_user(self) -> Result<User, PersistenceError> {
        Ok(User {
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            role: parse_enum::<Role>(&self.role, "role")?,
            phone: self.phone,
            suspended: self.suspended != 0,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// A session row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct SessionRow {
    pub session_id: i64,
    pub token: String,
    pub user_id: i64,
    pub expires_at: String,
    pub created_at: String,
}

/// A facility row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct FacilityRow {
    pub facility_id: i64,
    pub name: String,
    pub facility_type: String,
    pub location: String,
    pub status: String,
    pub last_inspected: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl FacilityRow {
    /// Converts this row to a domain facility.
    ///
    /// # Errors
    ///
    /// Returns a `CorruptRecord` error if a stored value is invalid.
    pub fn into_facility(self) -> Result<Facility, PersistenceError> {
        Ok(Facility {
            facility_id: self.facility_id,
            name: self.name,
            facility_type: parse_enum::<FacilityType>(&self.facility_type, "facility type")?,
            location: self.location,
            status: parse_enum::<FacilityStatus>(&self.status, "facility status")?,
            last_inspected: self
                .last_inspected
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// A report row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct ReportRow {
    pub report_id: i64,
    pub facility_id: i64,
    pub reported_by: i64,
    pub date: String,
    pub issue_type: String,
    pub description: Option<String>,
    pub status: String,
    pub images_json: String,
    pub resolved_by: Option<i64>,
    pub resolved_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ReportRow {
    /// Converts this row to a domain report.
    ///
    /// # Errors
    ///
    /// Returns a `CorruptRecord` error if a stored value is invalid.
    pub fn into_report(self) -> Result<Report, PersistenceError> {
        let images: Vec<String> = serde_json::from_str(&self.images_json)?;
        Ok(Report {
            report_id: self.report_id,
            facility_id: self.facility_id,
            reported_by: self.reported_by,
            date: parse_timestamp(&self.date)?,
            issue_type: parse_enum::<IssueType>(&self.issue_type, "issue type")?,
            description: self.description,
            status: parse_enum::<ReportStatus>(&self.status, "report status")?,
            images,
            resolved_by: self.resolved_by,
            resolved_at: self
                .resolved_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// An audit log row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct AuditRow {
    pub log_id: i64,
    pub user_id: i64,
    pub action: String,
    pub target_kind: String,
    pub target_id: i64,
    pub timestamp: String,
    pub details_json: String,
}

impl AuditRow {
    /// Converts this row to an audit record.
    ///
    /// # Errors
    ///
    /// Returns a `CorruptRecord` error if a stored value is invalid.
    pub fn into_record(self) -> Result<AuditRecord, PersistenceError> {
        Ok(AuditRecord {
            log_id: self.log_id,
            user_id: self.user_id,
            action: parse_enum::<AuditAction>(&self.action, "audit action")?,
            target_kind: parse_enum::<TargetKind>(&self.target_kind, "target kind")?,
            target_id: self.target_id,
            timestamp: parse_timestamp(&self.timestamp)?,
            details: serde_json::from_str(&self.details_json)?,
        })
    }
}
