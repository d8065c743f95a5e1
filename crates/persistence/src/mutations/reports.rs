// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report mutations, including the status-transition write.

use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;
use wash_track_domain::{NewReport, Report, ReportPatch, ReportStatus};

use crate::backend::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::reports;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a new report.
///
/// `reported_by` is the authenticated caller, resolved at the boundary;
/// it is never taken from request input. A missing `date` defaults to
/// creation time.
///
/// # Errors
///
/// Returns an error if the insert fails or the created row cannot be
/// read back.
pub fn insert_report(
    conn: &mut SqliteConnection,
    reported_by: i64,
    new: &NewReport,
) -> Result<Report, PersistenceError> {
    let now_ts: OffsetDateTime = OffsetDateTime::now_utc();
    let now: String = format_timestamp(now_ts)?;
    let date: String = format_timestamp(new.date.unwrap_or(now_ts))?;
    let images_json: String = serde_json::to_string(&new.images)?;

    diesel::insert_into(reports::table)
        .values((
            reports::facility_id.eq(new.facility_id),
            reports::reported_by.eq(reported_by),
            reports::date.eq(&date),
            reports::issue_type.eq(new.issue_type.as_str()),
            reports::description.eq(new.description.as_deref()),
            reports::status.eq(ReportStatus::Open.as_str()),
            reports::images_json.eq(&images_json),
            reports::created_at.eq(&now),
            reports::updated_at.eq(&now),
        ))
        .execute(conn)?;

    let report_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        report_id,
        facility_id = new.facility_id,
        reported_by,
        issue_type = new.issue_type.as_str(),
        "Report created"
    );

    queries::reports::report_by_id(conn, report_id)?
        .ok_or_else(|| PersistenceError::Other(String::from("Created report not readable")))
}

/// Applies a partial update to a report's descriptive fields.
///
/// Status is not touched here; transitions go through
/// [`set_report_status`] so resolver bookkeeping stays enforced.
///
/// # Errors
///
/// Returns an error if the read or write fails.
///
/// # Returns
///
/// `Ok(None)` if no report with that id exists.
pub fn apply_report_patch(
    conn: &mut SqliteConnection,
    report_id: i64,
    patch: &ReportPatch,
) -> Result<Option<Report>, PersistenceError> {
    let Some(current) = queries::reports::report_by_id(conn, report_id)? else {
        return Ok(None);
    };

    let now: String = format_timestamp(OffsetDateTime::now_utc())?;
    let facility_id: i64 = patch.facility_id.unwrap_or(current.facility_id);
    let date: String = format_timestamp(patch.date.unwrap_or(current.date))?;
    let issue_type = patch.issue_type.unwrap_or(current.issue_type);
    let description: Option<String> = patch.description.clone().or(current.description);

    diesel::update(reports::table)
        .filter(reports::report_id.eq(report_id))
        .set((
            reports::facility_id.eq(facility_id),
            reports::date.eq(&date),
            reports::issue_type.eq(issue_type.as_str()),
            reports::description.eq(description.as_deref()),
            reports::updated_at.eq(&now),
        ))
        .execute(conn)?;

    info!(report_id, "Report updated");
    queries::reports::report_by_id(conn, report_id)
}

/// Writes a status transition.
///
/// The resolver invariant is enforced unconditionally on every status
/// write, not only on first resolution: a resolved status sets
/// `resolved_by` to the actor and `resolved_at` to now; any other
/// status clears both.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `report_id` - The report to transition
/// * `new_status` - The already-validated target status
/// * `actor_id` - The caller performing the transition
///
/// # Errors
///
/// Returns an error if the read or write fails.
///
/// # Returns
///
/// The prior status together with the updated report, or `Ok(None)` if
/// no report with that id exists.
pub fn set_report_status(
    conn: &mut SqliteConnection,
    report_id: i64,
    new_status: ReportStatus,
    actor_id: i64,
) -> Result<Option<(ReportStatus, Report)>, PersistenceError> {
    let Some(current) = queries::reports::report_by_id(conn, report_id)? else {
        return Ok(None);
    };
    let prior_status: ReportStatus = current.status;

    let now_ts: OffsetDateTime = OffsetDateTime::now_utc();
    let now: String = format_timestamp(now_ts)?;
    let (resolved_by, resolved_at): (Option<i64>, Option<String>) =
        if new_status.requires_resolver() {
            (Some(actor_id), Some(now.clone()))
        } else {
            (None, None)
        };

    diesel::update(reports::table)
        .filter(reports::report_id.eq(report_id))
        .set((
            reports::status.eq(new_status.as_str()),
            reports::resolved_by.eq(resolved_by),
            reports::resolved_at.eq(resolved_at.as_deref()),
            reports::updated_at.eq(&now),
        ))
        .execute(conn)?;

    info!(
        report_id,
        from = prior_status.as_str(),
        to = new_status.as_str(),
        actor_id,
        "Report status transition"
    );

    let updated: Report = queries::reports::report_by_id(conn, report_id)?
        .ok_or_else(|| PersistenceError::Other(String::from("Updated report not readable")))?;
    Ok(Some((prior_status, updated)))
}

/// Hard-deletes a report, returning the deleted record.
///
/// # Errors
///
/// Returns an error if the read or delete fails.
///
/// # Returns
///
/// `Ok(None)` if no report with that id exists.
pub fn delete_report(
    conn: &mut SqliteConnection,
    report_id: i64,
) -> Result<Option<Report>, PersistenceError> {
    let Some(current) = queries::reports::report_by_id(conn, report_id)? else {
        return Ok(None);
    };

    diesel::delete(reports::table)
        .filter(reports::report_id.eq(report_id))
        .execute(conn)?;

    info!(report_id, "Report deleted");
    Ok(Some(current))
}
