// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Roles for authorization.
///
/// The role gates which operations a caller may invoke. Reads of
/// facilities and reports are public; every mutation is role-gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Full administrative authority: facility and report management,
    /// user administration, and audit log access.
    Admin,
    /// Facility and report management, plus a staff-only view of users.
    Manager,
    /// May submit reports for their own site. The default role at
    /// registration.
    #[default]
    Staff,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Converts this role to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

/// The physical kind of a WASH facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityType {
    /// A drinking or general-purpose water point.
    WaterPoint,
    /// A toilet block.
    Toilet,
    /// A handwashing station.
    HandwashingStation,
    /// A shower block.
    Shower,
}

impl FromStr for FacilityType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Water Point" => Ok(Self::WaterPoint),
            "Toilet" => Ok(Self::Toilet),
            "Handwashing Station" => Ok(Self::HandwashingStation),
            "Shower" => Ok(Self::Shower),
            _ => Err(DomainError::InvalidFacilityType(s.to_string())),
        }
    }
}

impl std::fmt::Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FacilityType {
    /// Converts this facility type to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WaterPoint => "Water Point",
            Self::Toilet => "Toilet",
            Self::HandwashingStation => "Handwashing Station",
            Self::Shower => "Shower",
        }
    }
}

/// Operational status of a facility.
///
/// Unknown values are rejected at the boundary, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FacilityStatus {
    /// The facility is operational.
    #[default]
    Working,
    /// The facility is operational but requires maintenance.
    NeedsMaintenance,
    /// The facility is not usable.
    OutOfService,
}

impl FromStr for FacilityStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Working" => Ok(Self::Working),
            "Needs Maintenance" => Ok(Self::NeedsMaintenance),
            "Out of Service" => Ok(Self::OutOfService),
            _ => Err(DomainError::InvalidFacilityStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for FacilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FacilityStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "Working",
            Self::NeedsMaintenance => "Needs Maintenance",
            Self::OutOfService => "Out of Service",
        }
    }
}

/// The category of issue a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    /// The facility is dirty or unhygienic.
    Cleanliness,
    /// The facility is physically broken.
    Broken,
    /// Consumables (soap, water, paper) have run out.
    OutOfSupplies,
    /// Anything else.
    Other,
}

impl FromStr for IssueType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cleanliness" => Ok(Self::Cleanliness),
            "broken" => Ok(Self::Broken),
            "out of supplies" => Ok(Self::OutOfSupplies),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidIssueType(s.to_string())),
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl IssueType {
    /// Converts this issue type to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cleanliness => "cleanliness",
            Self::Broken => "broken",
            Self::OutOfSupplies => "out of supplies",
            Self::Other => "other",
        }
    }
}

/// Lifecycle status of a report.
///
/// The lifecycle runs open → in progress → resolved, although the
/// transition set does not forbid moving back out of resolved. Resolver
/// bookkeeping (`resolved_by`/`resolved_at`) is enforced on every status
/// write: both set iff the new status is resolved, both cleared otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReportStatus {
    /// Newly submitted, not yet triaged.
    #[default]
    Open,
    /// Triaged and being worked.
    InProgress,
    /// Work complete.
    Resolved,
}

impl FromStr for ReportStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(DomainError::InvalidReportStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ReportStatus {
    /// Converts this status to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in progress",
            Self::Resolved => "resolved",
        }
    }

    /// Whether a status write with this value must carry resolver
    /// bookkeeping.
    #[must_use]
    pub const fn requires_resolver(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}
