// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::Caller;
use crate::error::ApiError;
use crate::facilities::FacilityListQuery;
use crate::request_response::{CreateFacilityRequest, FacilityInfo, UpdateFacilityRequest};
use crate::tests::{create_caller, create_test_store, sample_facility_request};
use crate::{create_facility, delete_facility, get_facility, list_facilities, update_facility};
use wash_track_audit::TargetKind;
use wash_track_domain::Role;
use wash_track_persistence::SqliteStore;

#[test]
fn test_create_facility_defaults_status_working() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);

    let facility: FacilityInfo =
        create_facility(&mut store, &admin, &sample_facility_request()).unwrap();

    assert_eq!(facility.status, "Working");
    assert_eq!(facility.facility_type, "Water Point");
}

#[test]
fn test_unknown_facility_type_writes_nothing() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);

    let mut request: CreateFacilityRequest = sample_facility_request();
    request.facility_type = String::from("Fountain");
    let result = create_facility(&mut store, &admin, &request);

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    assert!(list_facilities(&mut store, &FacilityListQuery::default())
        .unwrap()
        .is_empty());
    assert!(store.list_audit_entries(None).unwrap().is_empty());
}

#[test]
fn test_update_with_no_fields_writes_nothing() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);
    let facility: FacilityInfo =
        create_facility(&mut store, &admin, &sample_facility_request()).unwrap();

    let result = update_facility(
        &mut store,
        &admin,
        facility.id,
        &UpdateFacilityRequest::default(),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    // Only the create was audited.
    assert_eq!(store.list_audit_entries(None).unwrap().len(), 1);
}

#[test]
fn test_unknown_status_on_update_writes_nothing() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);
    let facility: FacilityInfo =
        create_facility(&mut store, &admin, &sample_facility_request()).unwrap();

    let request: UpdateFacilityRequest = UpdateFacilityRequest {
        status: Some(String::from("Broken")),
        ..UpdateFacilityRequest::default()
    };
    let result = update_facility(&mut store, &admin, facility.id, &request);

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    let unchanged: FacilityInfo = get_facility(&mut store, facility.id).unwrap();
    assert_eq!(unchanged.status, "Working");
    // Only the create was audited.
    assert_eq!(
        store
            .count_audit_entries_for(TargetKind::Facility, facility.id)
            .unwrap(),
        1
    );
}

#[test]
fn test_empty_name_is_rejected() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);

    let mut request: CreateFacilityRequest = sample_facility_request();
    request.name = String::from("   ");
    let result = create_facility(&mut store, &admin, &request);

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_each_mutation_audits_once() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);

    let facility: FacilityInfo =
        create_facility(&mut store, &admin, &sample_facility_request()).unwrap();
    let request: UpdateFacilityRequest = UpdateFacilityRequest {
        status: Some(String::from("Out of Service")),
        ..UpdateFacilityRequest::default()
    };
    update_facility(&mut store, &admin, facility.id, &request).unwrap();
    delete_facility(&mut store, &admin, facility.id).unwrap();

    assert_eq!(
        store
            .count_audit_entries_for(TargetKind::Facility, facility.id)
            .unwrap(),
        3
    );
}

#[test]
fn test_get_missing_facility_is_not_found() {
    let mut store: SqliteStore = create_test_store();

    let result = get_facility(&mut store, 9999);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_list_facilities_filter_round_trips_wire_strings() {
    let mut store: SqliteStore = create_test_store();
    let admin: Caller = create_caller(&mut store, Role::Admin);
    create_facility(&mut store, &admin, &sample_facility_request()).unwrap();

    let query: FacilityListQuery = FacilityListQuery {
        facility_type: Some(String::from("Water Point")),
        status: Some(String::from("Working")),
        location: Some(String::from("Kisumu")),
    };
    let facilities: Vec<FacilityInfo> = list_facilities(&mut store, &query).unwrap();

    assert_eq!(facilities.len(), 1);
}

#[test]
fn test_list_facilities_rejects_unknown_filter_value() {
    let mut store: SqliteStore = create_test_store();

    let query: FacilityListQuery = FacilityListQuery {
        status: Some(String::from("Haunted")),
        ..FacilityListQuery::default()
    };
    let result = list_facilities(&mut store, &query);

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}
