// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod facility_api_tests;
mod user_admin_tests;

use crate::auth::Caller;
use crate::request_response::{CreateFacilityRequest, CreateReportRequest};
use wash_track_domain::{Role, User};
use wash_track_persistence::SqliteStore;

pub fn create_test_store() -> SqliteStore {
    SqliteStore::new_in_memory().unwrap()
}

/// Creates a user with the given role and returns them as a caller.
pub fn create_caller(store: &mut SqliteStore, role: Role) -> Caller {
    let email: String = format!("{}@example.com", role.as_str());
    let user: User = store
        .create_user(role.as_str(), &email, None, "correct-horse-battery", role)
        .unwrap();
    Caller::from_user(&user)
}

pub fn sample_facility_request() -> CreateFacilityRequest {
    CreateFacilityRequest {
        name: String::from("Borehole A"),
        facility_type: String::from("Water Point"),
        location: String::from("Ward 3, Kisumu"),
        status: None,
        last_inspected: None,
    }
}

pub fn sample_report_request(facility_id: i64) -> CreateReportRequest {
    CreateReportRequest {
        facility_id,
        date: None,
        issue_type: String::from("broken"),
        description: Some(String::from("Pump handle snapped")),
    }
}
