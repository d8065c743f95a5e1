// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, FacilityStatus, FacilityType, IssueType, ReportStatus, Role};
use std::str::FromStr;

#[test]
fn test_role_round_trip() {
    for raw in ["admin", "manager", "staff"] {
        let role: Role = Role::from_str(raw).unwrap();
        assert_eq!(role.as_str(), raw);
    }
}

#[test]
fn test_role_rejects_unknown_value() {
    let err = Role::from_str("superuser").unwrap_err();
    assert_eq!(err, DomainError::InvalidRole(String::from("superuser")));
}

#[test]
fn test_role_default_is_staff() {
    assert_eq!(Role::default(), Role::Staff);
}

#[test]
fn test_facility_type_round_trip() {
    for raw in ["Water Point", "Toilet", "Handwashing Station", "Shower"] {
        let facility_type: FacilityType = FacilityType::from_str(raw).unwrap();
        assert_eq!(facility_type.as_str(), raw);
    }
}

#[test]
fn test_facility_type_rejects_unknown_value() {
    assert!(FacilityType::from_str("Well").is_err());
    // No coercion: case matters
    assert!(FacilityType::from_str("toilet").is_err());
}

#[test]
fn test_facility_status_round_trip() {
    for raw in ["Working", "Needs Maintenance", "Out of Service"] {
        let status: FacilityStatus = FacilityStatus::from_str(raw).unwrap();
        assert_eq!(status.as_str(), raw);
    }
}

#[test]
fn test_facility_status_default_is_working() {
    assert_eq!(FacilityStatus::default(), FacilityStatus::Working);
}

#[test]
fn test_facility_status_rejects_unknown_value() {
    let err = FacilityStatus::from_str("Broken").unwrap_err();
    assert_eq!(
        err,
        DomainError::InvalidFacilityStatus(String::from("Broken"))
    );
}

#[test]
fn test_issue_type_round_trip() {
    for raw in ["cleanliness", "broken", "out of supplies", "other"] {
        let issue_type: IssueType = IssueType::from_str(raw).unwrap();
        assert_eq!(issue_type.as_str(), raw);
    }
}

#[test]
fn test_report_status_round_trip() {
    for raw in ["open", "in progress", "resolved"] {
        let status: ReportStatus = ReportStatus::from_str(raw).unwrap();
        assert_eq!(status.as_str(), raw);
    }
}

#[test]
fn test_report_status_default_is_open() {
    assert_eq!(ReportStatus::default(), ReportStatus::Open);
}

#[test]
fn test_only_resolved_requires_resolver() {
    assert!(ReportStatus::Resolved.requires_resolver());
    assert!(!ReportStatus::Open.requires_resolver());
    assert!(!ReportStatus::InProgress.requires_resolver());
}
