// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Facility queries.

use diesel::prelude::*;
use wash_track_domain::{Facility, FacilityFilter};

use crate::data_models::FacilityRow;
use crate::diesel_schema::facilities;
use crate::error::PersistenceError;

/// Looks up a facility by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is corrupt.
pub fn facility_by_id(
    conn: &mut SqliteConnection,
    facility_id: i64,
) -> Result<Option<Facility>, PersistenceError> {
    facilities::table
        .filter(facilities::facility_id.eq(facility_id))
        .first::<FacilityRow>(conn)
        .optional()?
        .map(FacilityRow::into_facility)
        .transpose()
}

/// Lists facilities matching a filter.
///
/// Type and status match exactly; `location` matches as a
/// case-insensitive substring (SQLite `LIKE` semantics).
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn list_facilities(
    conn: &mut SqliteConnection,
    filter: &FacilityFilter,
) -> Result<Vec<Facility>, PersistenceError> {
    let mut query = facilities::table.into_boxed();

    if let Some(facility_type) = filter.facility_type {
        query = query.filter(facilities::facility_type.eq(facility_type.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(facilities::status.eq(status.as_str()));
    }
    if let Some(location) = &filter.location {
        query = query.filter(facilities::location.like(format!("%{location}%")));
    }

    let rows: Vec<FacilityRow> = query
        .order(facilities::facility_id.asc())
        .load::<FacilityRow>(conn)?;

    rows.into_iter().map(FacilityRow::into_facility).collect()
}
