// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod audit_tests;

use crate::SqliteStore;
use wash_track_domain::{FacilityStatus, FacilityType, IssueType, NewFacility, NewReport, Role, User};

pub fn create_test_store() -> SqliteStore {
    SqliteStore::new_in_memory().unwrap()
}

/// Creates a staff user to act as the mutating actor in tests.
pub fn create_test_actor(store: &mut SqliteStore) -> User {
    store
        .create_user(
            "Test Actor",
            "actor@example.com",
            None,
            "secret-password",
            Role::Staff,
        )
        .unwrap()
}

pub fn sample_facility() -> NewFacility {
    NewFacility {
        name: String::from("Borehole A"),
        facility_type: FacilityType::WaterPoint,
        location: String::from("Ward 3, Kisumu"),
        status: FacilityStatus::Working,
        last_inspected: None,
    }
}

pub fn sample_report(facility_id: i64) -> NewReport {
    NewReport {
        facility_id,
        date: None,
        issue_type: IssueType::Broken,
        description: Some(String::from("Standpipe leaking at the base")),
        images: Vec::new(),
    }
}
