// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Audit trail vocabulary.
//!
//! Every successful mutation of a facility or report produces exactly
//! one audit record. Records are immutable once written: this crate and
//! the persistence layer expose creation and reads, never updates or
//! deletes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use wash_track_domain::DomainError;

/// The kind of mutation an audit record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// A record was created.
    Create,
    /// A record was updated (including report status transitions).
    Update,
    /// A record was deleted.
    Delete,
}

impl FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(DomainError::InvalidAuditAction(s.to_string())),
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AuditAction {
    /// Converts this action to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// The entity kind an audit record targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// A facility record.
    Facility,
    /// A report record.
    Report,
}

impl FromStr for TargetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Facility" => Ok(Self::Facility),
            "Report" => Ok(Self::Report),
            _ => Err(DomainError::InvalidTargetKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TargetKind {
    /// Converts this target kind to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Facility => "Facility",
            Self::Report => "Report",
        }
    }
}

/// An immutable audit record describing one mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The record id assigned by the database.
    pub log_id: i64,
    /// The acting user's id. May reference a since-deleted user.
    pub user_id: i64,
    /// What kind of mutation happened.
    pub action: AuditAction,
    /// What kind of entity was mutated.
    pub target_kind: TargetKind,
    /// The mutated entity's id. May reference a since-deleted entity.
    pub target_id: i64,
    /// Set by the persistence layer at write time, never client-supplied.
    pub timestamp: OffsetDateTime,
    /// Opaque structured payload: the submitted fields for create and
    /// update, or the full prior record for delete.
    pub details: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_action_round_trip() {
        for raw in ["create", "update", "delete"] {
            let action: AuditAction = AuditAction::from_str(raw).unwrap();
            assert_eq!(action.as_str(), raw);
        }
    }

    #[test]
    fn test_audit_action_rejects_unknown_value() {
        assert!(AuditAction::from_str("upsert").is_err());
    }

    #[test]
    fn test_target_kind_round_trip() {
        for raw in ["Facility", "Report"] {
            let kind: TargetKind = TargetKind::from_str(raw).unwrap();
            assert_eq!(kind.as_str(), raw);
        }
    }

    #[test]
    fn test_target_kind_rejects_user() {
        // Users are mutated through admin operations but are not an
        // audit target kind; only Facility and Report are recorded.
        assert!(TargetKind::from_str("User").is_err());
    }
}
