// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report queries.

use diesel::prelude::*;
use wash_track_domain::{Report, ReportFilter};

use crate::data_models::ReportRow;
use crate::diesel_schema::reports;
use crate::error::PersistenceError;

/// Looks up a report by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn report_by_id(
    conn: &mut SqliteConnection,
    report_id: i64,
) -> Result<Option<Report>, PersistenceError> {
    reports::table
        .filter(reports::report_id.eq(report_id))
        .first::<ReportRow>(conn)
        .optional()?
        .map(ReportRow::into_report)
        .transpose()
}

/// Lists reports matching a filter.
///
/// Enumerated fields and the facility reference match exactly in SQL;
/// the date-range bounds are applied after row conversion so the
/// comparison happens on parsed timestamps, not on stored text.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn list_reports(
    conn: &mut SqliteConnection,
    filter: &ReportFilter,
) -> Result<Vec<Report>, PersistenceError> {
    let mut query = reports::table.into_boxed();

    if let Some(issue_type) = filter.issue_type {
        query = query.filter(reports::issue_type.eq(issue_type.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(reports::status.eq(status.as_str()));
    }
    if let Some(facility_id) = filter.facility_id {
        query = query.filter(reports::facility_id.eq(facility_id));
    }

    let rows: Vec<ReportRow> = query
        .order(reports::report_id.asc())
        .load::<ReportRow>(conn)?;

    let reports: Vec<Report> = rows
        .into_iter()
        .map(ReportRow::into_report)
        .collect::<Result<Vec<Report>, PersistenceError>>()?;

    Ok(reports
        .into_iter()
        .filter(|report| filter.date_in_range(report.date))
        .collect())
}
