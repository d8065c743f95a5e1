// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report store and lifecycle operations.
//!
//! Reads are public and expand facility/reporter/resolver references,
//! with dangling references expanding to `null`. Creation is open to
//! any authenticated caller; updates, status transitions, and deletion
//! require admin or manager. Status transitions unconditionally enforce
//! resolver bookkeeping: resolved sets `resolved_by`/`resolved_at`, any
//! other status clears both.

use std::str::FromStr;
use time::OffsetDateTime;
use wash_track_domain::{
    Facility, IssueType, NewReport, Report, ReportFilter, ReportPatch, ReportStatus, Role, User,
    parse_date_bound, validate_new_report,
};
use wash_track_persistence::SqliteStore;

use crate::auth::{Caller, authorize};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    CreateReportRequest, ReportInfo, UpdateReportRequest, UpdateReportStatusRequest, report_info,
};

/// Roles permitted to triage reports.
const REPORT_TRIAGERS: &[Role] = &[Role::Admin, Role::Manager];

/// Raw query parameters for the report listing.
#[derive(Debug, Clone, Default)]
pub struct ReportListQuery {
    /// Issue type wire string.
    pub issue_type: Option<String>,
    /// Status wire string.
    pub status: Option<String>,
    /// Facility reference.
    pub facility_id: Option<i64>,
    /// Inclusive lower date bound, ISO-8601 or `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Inclusive upper date bound, ISO-8601 or `YYYY-MM-DD`.
    pub to: Option<String>,
}

fn parse_filter(query: &ReportListQuery) -> Result<ReportFilter, ApiError> {
    Ok(ReportFilter {
        issue_type: query
            .issue_type
            .as_deref()
            .map(IssueType::from_str)
            .transpose()
            .map_err(|e| translate_domain_error(&e))?,
        status: query
            .status
            .as_deref()
            .map(ReportStatus::from_str)
            .transpose()
            .map_err(|e| translate_domain_error(&e))?,
        facility_id: query.facility_id,
        date_from: query
            .from
            .as_deref()
            .map(parse_date_bound)
            .transpose()
            .map_err(|e| translate_domain_error(&e))?,
        date_to: query
            .to
            .as_deref()
            .map(parse_date_bound)
            .transpose()
            .map_err(|e| translate_domain_error(&e))?,
    })
}

fn parse_report_date(raw: Option<&str>) -> Result<Option<OffsetDateTime>, ApiError> {
    raw.map(parse_date_bound)
        .transpose()
        .map_err(|e| translate_domain_error(&e))
}

/// Expands a report's references against the store.
fn expand(store: &mut SqliteStore, report: &Report) -> Result<ReportInfo, ApiError> {
    let facility: Option<Facility> = store.facility_by_id(report.facility_id)?;
    let reporter: Option<User> = store.user_by_id(report.reported_by)?;
    let resolver: Option<User> = match report.resolved_by {
        Some(id) => store.user_by_id(id)?,
        None => None,
    };
    report_info(report, facility.as_ref(), reporter.as_ref(), resolver.as_ref())
}

/// Creates a report for the authenticated caller.
///
/// `reported_by` is always the caller, never client-supplied. `images`
/// are stored-file path references the server layer produced from the
/// uploaded parts. On success the caller is expected to fire the
/// notification relay; its outcome never affects this result.
///
/// # Errors
///
/// Returns an error if a field is invalid or the write fails.
pub fn create_report(
    store: &mut SqliteStore,
    caller: &Caller,
    request: &CreateReportRequest,
    images: Vec<String>,
) -> Result<ReportInfo, ApiError> {
    let issue_type: IssueType =
        IssueType::from_str(&request.issue_type).map_err(|e| translate_domain_error(&e))?;

    let new: NewReport = NewReport {
        facility_id: request.facility_id,
        date: parse_report_date(request.date.as_deref())?,
        issue_type,
        description: request.description.clone(),
        images,
    };
    validate_new_report(&new).map_err(|e| translate_domain_error(&e))?;

    let details: serde_json::Value =
        serde_json::to_value(request).map_err(|e| ApiError::Internal {
            message: format!("Failed to serialize audit details: {e}"),
        })?;

    let report: Report = store.create_report(caller.user_id, &new, &details)?;
    tracing::info!(
        report_id = report.report_id,
        facility_id = report.facility_id,
        user_id = caller.user_id,
        "report created"
    );
    expand(store, &report)
}

/// Lists reports matching the query, references expanded. Public.
///
/// # Errors
///
/// Returns an error if a filter value is invalid or the query fails.
pub fn list_reports(
    store: &mut SqliteStore,
    query: &ReportListQuery,
) -> Result<Vec<ReportInfo>, ApiError> {
    let filter: ReportFilter = parse_filter(query)?;
    let reports: Vec<Report> = store.list_reports(&filter)?;
    reports
        .iter()
        .map(|report| expand(store, report))
        .collect()
}

/// Fetches a single report, references expanded. Public.
///
/// # Errors
///
/// Returns `ResourceNotFound` if no report with that id exists.
pub fn get_report(store: &mut SqliteStore, report_id: i64) -> Result<ReportInfo, ApiError> {
    let report: Report = store
        .report_by_id(report_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Report"),
            message: format!("No report with id {report_id}"),
        })?;
    expand(store, &report)
}

/// Partially updates a report's descriptive fields.
///
/// # Errors
///
/// Returns an error if the caller is not admin or manager, a supplied
/// field is invalid, no field is supplied at all, or the report does
/// not exist.
pub fn update_report(
    store: &mut SqliteStore,
    caller: &Caller,
    report_id: i64,
    request: &UpdateReportRequest,
) -> Result<ReportInfo, ApiError> {
    authorize(caller, REPORT_TRIAGERS, "update_report")?;

    let patch: ReportPatch = ReportPatch {
        facility_id: request.facility_id,
        date: parse_report_date(request.date.as_deref())?,
        issue_type: request
            .issue_type
            .as_deref()
            .map(IssueType::from_str)
            .transpose()
            .map_err(|e| translate_domain_error(&e))?,
        description: request.description.clone(),
    };
    if patch.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("body"),
            message: String::from("Update must supply at least one field"),
        });
    }

    let details: serde_json::Value =
        serde_json::to_value(request).map_err(|e| ApiError::Internal {
            message: format!("Failed to serialize audit details: {e}"),
        })?;

    let report: Report = store
        .update_report(caller.user_id, report_id, &patch, &details)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Report"),
            message: format!("No report with id {report_id}"),
        })?;
    expand(store, &report)
}

/// Transitions a report's status.
///
/// The audit details carry both the submitted and the prior status.
///
/// # Errors
///
/// Returns an error if the caller is not admin or manager, the status
/// is unknown, or the report does not exist.
pub fn update_report_status(
    store: &mut SqliteStore,
    caller: &Caller,
    report_id: i64,
    request: &UpdateReportStatusRequest,
) -> Result<ReportInfo, ApiError> {
    authorize(caller, REPORT_TRIAGERS, "update_report_status")?;

    let new_status: ReportStatus =
        ReportStatus::from_str(&request.status).map_err(|e| translate_domain_error(&e))?;

    let (prior_status, report) = store
        .update_report_status(caller.user_id, report_id, new_status)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Report"),
            message: format!("No report with id {report_id}"),
        })?;
    tracing::info!(
        report_id,
        from = prior_status.as_str(),
        to = new_status.as_str(),
        user_id = caller.user_id,
        "report status changed"
    );
    expand(store, &report)
}

/// Deletes a report.
///
/// # Errors
///
/// Returns an error if the caller is not admin or manager or the
/// report does not exist.
pub fn delete_report(
    store: &mut SqliteStore,
    caller: &Caller,
    report_id: i64,
) -> Result<(), ApiError> {
    authorize(caller, REPORT_TRIAGERS, "delete_report")?;

    store
        .delete_report(caller.user_id, report_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Report"),
            message: format!("No report with id {report_id}"),
        })?;
    tracing::info!(report_id, user_id = caller.user_id, "report deleted");
    Ok(())
}
