// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the WASH facility tracker.
//!
//! This crate provides SQLite persistence, built on Diesel with
//! embedded migrations, for the three core entities (users, facilities,
//! reports), bearer-token sessions, and the append-only audit log.
//!
//! ## The audit pipeline
//!
//! Every audited mutation runs as a single transaction: the primary
//! write and the audit append commit or roll back together, so a
//! successful mutation always carries exactly one audit record and an
//! audit failure aborts the mutation. The composites on
//! [`SqliteStore`] are the only write paths the API layer uses.
//!
//! ## Testing
//!
//! Standard tests run against in-memory SQLite. Each in-memory store
//! gets a unique shared-cache database name from an atomic counter so
//! tests stay isolated and deterministic.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use wash_track_audit::{AuditAction, AuditRecord, TargetKind};
use wash_track_domain::{
    Facility, FacilityFilter, FacilityPatch, NewFacility, NewReport, Report, ReportFilter,
    ReportPatch, ReportStatus, Role, User,
};

mod backend;
mod data_models;
mod error;
mod mutations;
mod queries;

#[rustfmt::skip]
mod diesel_schema;

#[cfg(test)]
mod tests;

pub use data_models::{SessionRow, UserRow, format_timestamp, parse_timestamp};
pub use error::PersistenceError;
pub use queries::users::verify_password;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID so
/// concurrently running tests never share a database.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// SQLite-backed store for all persisted state.
///
/// The connection is owned exclusively; callers wanting concurrent
/// access wrap the store in a mutex (the server holds it behind
/// `Arc<Mutex<_>>`), which gives single-writer document-level
/// atomicity.
pub struct SqliteStore {
    conn: SqliteConnection,
}

impl SqliteStore {
    /// Creates a store backed by a unique in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization or migration fails.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("wash_track_mem_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a store backed by a file database, enabling WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization or migration fails.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ----- Facilities -----

    /// Creates a facility and its audit record in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither is committed.
    pub fn create_facility(
        &mut self,
        actor_id: i64,
        new: &NewFacility,
        details: &serde_json::Value,
    ) -> Result<Facility, PersistenceError> {
        self.conn
            .transaction::<Facility, PersistenceError, _>(|conn| {
                let facility: Facility = mutations::facilities::insert_facility(conn, new)?;
                mutations::audit::append_entry(
                    conn,
                    actor_id,
                    AuditAction::Create,
                    TargetKind::Facility,
                    facility.facility_id,
                    details,
                )?;
                Ok(facility)
            })
    }

    /// Applies a partial facility update and its audit record in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither is committed.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no facility with that id exists (no audit record
    /// is written).
    pub fn update_facility(
        &mut self,
        actor_id: i64,
        facility_id: i64,
        patch: &FacilityPatch,
        details: &serde_json::Value,
    ) -> Result<Option<Facility>, PersistenceError> {
        self.conn
            .transaction::<Option<Facility>, PersistenceError, _>(|conn| {
                let Some(facility) =
                    mutations::facilities::apply_facility_patch(conn, facility_id, patch)?
                else {
                    return Ok(None);
                };
                mutations::audit::append_entry(
                    conn,
                    actor_id,
                    AuditAction::Update,
                    TargetKind::Facility,
                    facility_id,
                    details,
                )?;
                Ok(Some(facility))
            })
    }

    /// Deletes a facility and writes its audit record (carrying the
    /// full deleted record) in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither is committed.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no facility with that id exists.
    pub fn delete_facility(
        &mut self,
        actor_id: i64,
        facility_id: i64,
    ) -> Result<Option<Facility>, PersistenceError> {
        self.conn
            .transaction::<Option<Facility>, PersistenceError, _>(|conn| {
                let Some(deleted) = mutations::facilities::delete_facility(conn, facility_id)?
                else {
                    return Ok(None);
                };
                let details: serde_json::Value = serde_json::to_value(&deleted)?;
                mutations::audit::append_entry(
                    conn,
                    actor_id,
                    AuditAction::Delete,
                    TargetKind::Facility,
                    facility_id,
                    &details,
                )?;
                Ok(Some(deleted))
            })
    }

    /// Looks up a facility by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn facility_by_id(
        &mut self,
        facility_id: i64,
    ) -> Result<Option<Facility>, PersistenceError> {
        queries::facilities::facility_by_id(&mut self.conn, facility_id)
    }

    /// Lists facilities matching a filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_facilities(
        &mut self,
        filter: &FacilityFilter,
    ) -> Result<Vec<Facility>, PersistenceError> {
        queries::facilities::list_facilities(&mut self.conn, filter)
    }

    // ----- Reports -----

    /// Creates a report and its audit record in one transaction.
    ///
    /// `reported_by` is the authenticated caller's id, resolved at the
    /// boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither is committed.
    pub fn create_report(
        &mut self,
        actor_id: i64,
        new: &NewReport,
        details: &serde_json::Value,
    ) -> Result<Report, PersistenceError> {
        self.conn
            .transaction::<Report, PersistenceError, _>(|conn| {
                let report: Report = mutations::reports::insert_report(conn, actor_id, new)?;
                mutations::audit::append_entry(
                    conn,
                    actor_id,
                    AuditAction::Create,
                    TargetKind::Report,
                    report.report_id,
                    details,
                )?;
                Ok(report)
            })
    }

    /// Applies a partial report update and its audit record in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither is committed.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no report with that id exists.
    pub fn update_report(
        &mut self,
        actor_id: i64,
        report_id: i64,
        patch: &ReportPatch,
        details: &serde_json::Value,
    ) -> Result<Option<Report>, PersistenceError> {
        self.conn
            .transaction::<Option<Report>, PersistenceError, _>(|conn| {
                let Some(report) = mutations::reports::apply_report_patch(conn, report_id, patch)?
                else {
                    return Ok(None);
                };
                mutations::audit::append_entry(
                    conn,
                    actor_id,
                    AuditAction::Update,
                    TargetKind::Report,
                    report_id,
                    details,
                )?;
                Ok(Some(report))
            })
    }

    /// Writes a status transition and its audit record in one
    /// transaction.
    ///
    /// The audit details carry the submitted status together with the
    /// prior status.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither is committed.
    ///
    /// # Returns
    ///
    /// The prior status and updated report, or `Ok(None)` if no report
    /// with that id exists.
    pub fn update_report_status(
        &mut self,
        actor_id: i64,
        report_id: i64,
        new_status: ReportStatus,
    ) -> Result<Option<(ReportStatus, Report)>, PersistenceError> {
        self.conn
            .transaction::<Option<(ReportStatus, Report)>, PersistenceError, _>(|conn| {
                let Some((prior_status, report)) =
                    mutations::reports::set_report_status(conn, report_id, new_status, actor_id)?
                else {
                    return Ok(None);
                };
                let details: serde_json::Value = serde_json::json!({
                    "status": new_status.as_str(),
                    "previousStatus": prior_status.as_str(),
                });
                mutations::audit::append_entry(
                    conn,
                    actor_id,
                    AuditAction::Update,
                    TargetKind::Report,
                    report_id,
                    &details,
                )?;
                Ok(Some((prior_status, report)))
            })
    }

    /// Deletes a report and writes its audit record (carrying the full
    /// deleted record) in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither is committed.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no report with that id exists.
    pub fn delete_report(
        &mut self,
        actor_id: i64,
        report_id: i64,
    ) -> Result<Option<Report>, PersistenceError> {
        self.conn
            .transaction::<Option<Report>, PersistenceError, _>(|conn| {
                let Some(deleted) = mutations::reports::delete_report(conn, report_id)? else {
                    return Ok(None);
                };
                let details: serde_json::Value = serde_json::to_value(&deleted)?;
                mutations::audit::append_entry(
                    conn,
                    actor_id,
                    AuditAction::Delete,
                    TargetKind::Report,
                    report_id,
                    &details,
                )?;
                Ok(Some(deleted))
            })
    }

    /// Looks up a report by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn report_by_id(&mut self, report_id: i64) -> Result<Option<Report>, PersistenceError> {
        queries::reports::report_by_id(&mut self.conn, report_id)
    }

    /// Lists reports matching a filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reports(
        &mut self,
        filter: &ReportFilter,
    ) -> Result<Vec<Report>, PersistenceError> {
        queries::reports::list_reports(&mut self.conn, filter)
    }

    // ----- Users -----

    /// Creates a user. Not audited: the audit log covers facility and
    /// report mutations only.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails or the email already exists.
    pub fn create_user(
        &mut self,
        name: &str,
        email: &str,
        phone: Option<&str>,
        password: &str,
        role: Role,
    ) -> Result<User, PersistenceError> {
        mutations::users::create_user(&mut self.conn, name, email, phone, password, role)
    }

    /// Changes a user's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_user_role(
        &mut self,
        user_id: i64,
        role: Role,
    ) -> Result<Option<User>, PersistenceError> {
        mutations::users::set_user_role(&mut self.conn, user_id, role)
    }

    /// Sets or clears a user's suspended flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_user_suspended(
        &mut self,
        user_id: i64,
        suspended: bool,
    ) -> Result<Option<User>, PersistenceError> {
        mutations::users::set_user_suspended(&mut self.conn, user_id, suspended)
    }

    /// Hard-deletes a user. Sessions cascade; reports and audit
    /// records keep their (now dangling) references.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_user(&mut self, user_id: i64) -> Result<bool, PersistenceError> {
        mutations::users::delete_user(&mut self.conn, user_id)
    }

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn user_by_id(&mut self, user_id: i64) -> Result<Option<User>, PersistenceError> {
        queries::users::user_by_id(&mut self.conn, user_id)
    }

    /// Looks up a raw user row by email (includes the password hash).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn user_row_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<UserRow>, PersistenceError> {
        queries::users::user_row_by_email(&mut self.conn, email)
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_users(&mut self) -> Result<Vec<User>, PersistenceError> {
        queries::users::list_all_users(&mut self.conn)
    }

    /// Lists users holding a specific role.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users_with_role(&mut self, role: Role) -> Result<Vec<User>, PersistenceError> {
        queries::users::list_users_with_role(&mut self.conn, role)
    }

    /// Whether any admin user exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn admin_exists(&mut self) -> Result<bool, PersistenceError> {
        queries::users::admin_exists(&mut self.conn)
    }

    // ----- Sessions -----

    /// Creates a session row for an issued bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        token: &str,
        user_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let expires_at_str: String = format_timestamp(expires_at)?;
        mutations::sessions::create_session(&mut self.conn, token, user_id, &expires_at_str)
    }

    /// Looks up a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn session_by_token(
        &mut self,
        token: &str,
    ) -> Result<Option<SessionRow>, PersistenceError> {
        queries::sessions::session_by_token(&mut self.conn, token)
    }

    /// Deletes a session by token (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, token: &str) -> Result<bool, PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, token)
    }

    // ----- Audit log -----

    /// Lists audit records, newest first, optionally filtered by
    /// action, each paired with its actor when still resolvable.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_entries(
        &mut self,
        action: Option<AuditAction>,
    ) -> Result<Vec<(AuditRecord, Option<User>)>, PersistenceError> {
        queries::audit::list_entries(&mut self.conn, action)
    }

    /// Counts audit records for a specific target.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_audit_entries_for(
        &mut self,
        target_kind: TargetKind,
        target_id: i64,
    ) -> Result<i64, PersistenceError> {
        queries::audit::count_for_target(&mut self.conn, target_kind.as_str(), target_id)
    }
}
