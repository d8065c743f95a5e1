// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::SqliteStore;
use crate::tests::{create_test_actor, create_test_store, sample_facility, sample_report};
use serde_json::json;
use wash_track_audit::{AuditAction, TargetKind};
use wash_track_domain::{Facility, FacilityPatch, Report, ReportStatus, User};

#[test]
fn test_every_facility_mutation_appends_one_entry() {
    let mut store: SqliteStore = create_test_store();
    let actor: User = create_test_actor(&mut store);

    let facility: Facility = store
        .create_facility(actor.user_id, &sample_facility(), &json!({"name": "Borehole A"}))
        .unwrap();
    let patch: FacilityPatch = FacilityPatch {
        name: Some(String::from("Borehole A2")),
        ..FacilityPatch::default()
    };
    store
        .update_facility(actor.user_id, facility.facility_id, &patch, &json!({}))
        .unwrap()
        .unwrap();
    store
        .delete_facility(actor.user_id, facility.facility_id)
        .unwrap()
        .unwrap();

    let count: i64 = store
        .count_audit_entries_for(TargetKind::Facility, facility.facility_id)
        .unwrap();
    assert_eq!(count, 3);
}

#[test]
fn test_entries_carry_actor_action_target_and_details() {
    let mut store: SqliteStore = create_test_store();
    let actor: User = create_test_actor(&mut store);

    let details = json!({"name": "Borehole A", "type": "Water Point"});
    let facility: Facility = store
        .create_facility(actor.user_id, &sample_facility(), &details)
        .unwrap();

    let entries = store.list_audit_entries(None).unwrap();
    assert_eq!(entries.len(), 1);

    let (record, expanded_actor) = &entries[0];
    assert_eq!(record.user_id, actor.user_id);
    assert_eq!(record.action, AuditAction::Create);
    assert_eq!(record.target_kind, TargetKind::Facility);
    assert_eq!(record.target_id, facility.facility_id);
    assert_eq!(record.details, details);
    assert_eq!(
        expanded_actor.as_ref().map(|u| u.email.as_str()),
        Some("actor@example.com")
    );
}

#[test]
fn test_delete_details_carry_prior_record() {
    let mut store: SqliteStore = create_test_store();
    let actor: User = create_test_actor(&mut store);

    let facility: Facility = store
        .create_facility(actor.user_id, &sample_facility(), &json!({}))
        .unwrap();
    store
        .delete_facility(actor.user_id, facility.facility_id)
        .unwrap()
        .unwrap();

    let entries = store.list_audit_entries(Some(AuditAction::Delete)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0.details["name"], "Borehole A");
}

#[test]
fn test_status_change_details_carry_both_statuses() {
    let mut store: SqliteStore = create_test_store();
    let actor: User = create_test_actor(&mut store);

    let report: Report = store
        .create_report(actor.user_id, &sample_report(1), &json!({}))
        .unwrap();
    store
        .update_report_status(actor.user_id, report.report_id, ReportStatus::InProgress)
        .unwrap()
        .unwrap();

    let entries = store.list_audit_entries(Some(AuditAction::Update)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0.details["status"], "in progress");
    assert_eq!(entries[0].0.details["previousStatus"], "open");
}

#[test]
fn test_entries_list_newest_first() {
    let mut store: SqliteStore = create_test_store();
    let actor: User = create_test_actor(&mut store);

    let first: Facility = store
        .create_facility(actor.user_id, &sample_facility(), &json!({}))
        .unwrap();
    let second: Report = store
        .create_report(actor.user_id, &sample_report(first.facility_id), &json!({}))
        .unwrap();

    let entries = store.list_audit_entries(None).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0.target_kind, TargetKind::Report);
    assert_eq!(entries[0].0.target_id, second.report_id);
    assert_eq!(entries[1].0.target_kind, TargetKind::Facility);
}

#[test]
fn test_action_filter_narrows_listing() {
    let mut store: SqliteStore = create_test_store();
    let actor: User = create_test_actor(&mut store);

    let facility: Facility = store
        .create_facility(actor.user_id, &sample_facility(), &json!({}))
        .unwrap();
    store
        .delete_facility(actor.user_id, facility.facility_id)
        .unwrap()
        .unwrap();

    let creates = store.list_audit_entries(Some(AuditAction::Create)).unwrap();
    let deletes = store.list_audit_entries(Some(AuditAction::Delete)).unwrap();
    assert_eq!(creates.len(), 1);
    assert_eq!(deletes.len(), 1);
    assert_eq!(creates[0].0.action, AuditAction::Create);
    assert_eq!(deletes[0].0.action, AuditAction::Delete);
}

#[test]
fn test_deleting_actor_leaves_entries_with_unresolved_actor() {
    let mut store: SqliteStore = create_test_store();
    let actor: User = create_test_actor(&mut store);

    store
        .create_facility(actor.user_id, &sample_facility(), &json!({}))
        .unwrap();
    store.delete_user(actor.user_id).unwrap();

    let entries = store.list_audit_entries(None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0.user_id, actor.user_id);
    assert!(entries[0].1.is_none());
}
