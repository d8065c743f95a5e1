// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Record types for the three core entities.
//!
//! These are the in-memory representations used by the API layer.
//! Persistence row mapping lives in the persistence crate.

use crate::types::{FacilityStatus, FacilityType, IssueType, ReportStatus, Role};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A registered user of the system.
///
/// The password credential is opaque to the domain and never present
/// here; only the persistence layer sees the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The canonical numeric identifier assigned by the database.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Email address, unique case-insensitively.
    pub email: String,
    /// The role gating this user's permitted operations.
    pub role: Role,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Suspended users authenticate but are refused all operations.
    pub suspended: bool,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
}

/// A physical WASH facility tracked for operational status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    /// The canonical numeric identifier assigned by the database.
    pub facility_id: i64,
    /// Facility name.
    pub name: String,
    /// The physical kind of facility.
    pub facility_type: FacilityType,
    /// Free-text location.
    pub location: String,
    /// Operational status.
    pub status: FacilityStatus,
    /// When the facility was last inspected, if ever.
    pub last_inspected: Option<OffsetDateTime>,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
    /// Last modification timestamp.
    pub updated_at: OffsetDateTime,
}

/// Fields for creating a facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFacility {
    /// Facility name. Required.
    pub name: String,
    /// The physical kind of facility. Required.
    pub facility_type: FacilityType,
    /// Free-text location. Required.
    pub location: String,
    /// Operational status. Defaults to `Working`.
    pub status: FacilityStatus,
    /// Optional last-inspection date.
    pub last_inspected: Option<OffsetDateTime>,
}

/// A partial update to a facility.
///
/// `None` fields are left untouched by the merge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacilityPatch {
    /// New name, if supplied.
    pub name: Option<String>,
    /// New facility type, if supplied.
    pub facility_type: Option<FacilityType>,
    /// New location, if supplied.
    pub location: Option<String>,
    /// New status, if supplied.
    pub status: Option<FacilityStatus>,
    /// New last-inspection date, if supplied.
    pub last_inspected: Option<OffsetDateTime>,
}

impl FacilityPatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.facility_type.is_none()
            && self.location.is_none()
            && self.status.is_none()
            && self.last_inspected.is_none()
    }
}

/// A user-submitted issue record tied to one facility.
///
/// `facility_id` is referential, not enforced: deleting a facility does
/// not cascade here, and readers treat an unresolvable reference as an
/// unknown facility rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// The canonical numeric identifier assigned by the database.
    pub report_id: i64,
    /// The facility this report is about. May dangle.
    pub facility_id: i64,
    /// The user who submitted the report. Always the authenticated
    /// caller, never client-supplied.
    pub reported_by: i64,
    /// When the issue was observed. Defaults to creation time.
    pub date: OffsetDateTime,
    /// The category of issue.
    pub issue_type: IssueType,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: ReportStatus,
    /// Ordered stored-file path references for uploaded images.
    pub images: Vec<String>,
    /// The user who resolved the report. Set iff status is resolved.
    pub resolved_by: Option<i64>,
    /// When the report was resolved. Set iff status is resolved.
    pub resolved_at: Option<OffsetDateTime>,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
    /// Last modification timestamp.
    pub updated_at: OffsetDateTime,
}

/// Fields for creating a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    /// The facility the report is about. Required but unverified.
    pub facility_id: i64,
    /// When the issue was observed; `None` means creation time.
    pub date: Option<OffsetDateTime>,
    /// The category of issue. Required.
    pub issue_type: IssueType,
    /// Optional description.
    pub description: Option<String>,
    /// Stored-file path references for uploaded images.
    pub images: Vec<String>,
}

/// A partial update to a report's descriptive fields.
///
/// Status transitions do not go through here; they use the dedicated
/// status operation so resolver bookkeeping stays enforced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportPatch {
    /// New facility reference, if supplied.
    pub facility_id: Option<i64>,
    /// New observation date, if supplied.
    pub date: Option<OffsetDateTime>,
    /// New issue type, if supplied.
    pub issue_type: Option<IssueType>,
    /// New description, if supplied.
    pub description: Option<String>,
}

impl ReportPatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.facility_id.is_none()
            && self.date.is_none()
            && self.issue_type.is_none()
            && self.description.is_none()
    }
}
