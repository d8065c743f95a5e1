// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed query filters for list operations.
//!
//! Filters replace stringly-typed query objects with a fixed set of
//! recognized options. Matching is exact for enumerated and id fields;
//! `location` matches as a case-insensitive substring; date bounds are
//! inclusive.

use crate::error::DomainError;
use crate::types::{FacilityStatus, FacilityType, IssueType, ReportStatus};
use time::format_description::well_known::Iso8601;
use time::{Date, OffsetDateTime, Time};

/// Filter options for listing facilities.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacilityFilter {
    /// Exact facility type match.
    pub facility_type: Option<FacilityType>,
    /// Exact status match.
    pub status: Option<FacilityStatus>,
    /// Case-insensitive substring match on location.
    pub location: Option<String>,
}

/// Filter options for listing reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportFilter {
    /// Exact issue type match.
    pub issue_type: Option<IssueType>,
    /// Exact status match.
    pub status: Option<ReportStatus>,
    /// Exact facility reference match.
    pub facility_id: Option<i64>,
    /// Inclusive lower bound on the report date.
    pub date_from: Option<OffsetDateTime>,
    /// Inclusive upper bound on the report date.
    pub date_to: Option<OffsetDateTime>,
}

impl ReportFilter {
    /// Whether a report date falls within the configured bounds.
    #[must_use]
    pub fn date_in_range(&self, date: OffsetDateTime) -> bool {
        if self.date_from.is_some_and(|from| date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| date > to) {
            return false;
        }
        true
    }
}

/// Parses a date-range bound from a query parameter.
///
/// Accepts a full ISO-8601 timestamp or a bare `YYYY-MM-DD` date, which
/// is taken as midnight UTC. This matches how callers pass the `from`
/// and `to` parameters on the report listing endpoint.
///
/// # Errors
///
/// Returns an error if the value parses as neither form.
pub fn parse_date_bound(value: &str) -> Result<OffsetDateTime, DomainError> {
    if let Ok(ts) = OffsetDateTime::parse(value, &Iso8601::DEFAULT) {
        return Ok(ts);
    }
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(value, &format)
        .map(|d| d.with_time(Time::MIDNIGHT).assume_utc())
        .map_err(|_| DomainError::InvalidDate {
            value: value.to_string(),
        })
}
