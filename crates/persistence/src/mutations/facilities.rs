// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Facility mutations.

use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;
use wash_track_domain::{Facility, FacilityPatch, NewFacility};

use crate::backend::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::facilities;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a new facility.
///
/// # Errors
///
/// Returns an error if the insert fails or the created row cannot be
/// read back.
pub fn insert_facility(
    conn: &mut SqliteConnection,
    new: &NewFacility,
) -> Result<Facility, PersistenceError> {
    let now: String = format_timestamp(OffsetDateTime::now_utc())?;
    let last_inspected: Option<String> =
        new.last_inspected.map(format_timestamp).transpose()?;

    diesel::insert_into(facilities::table)
        .values((
            facilities::name.eq(&new.name),
            facilities::facility_type.eq(new.facility_type.as_str()),
            facilities::location.eq(&new.location),
            facilities::status.eq(new.status.as_str()),
            facilities::last_inspected.eq(last_inspected),
            facilities::created_at.eq(&now),
            facilities::updated_at.eq(&now),
        ))
        .execute(conn)?;

    let facility_id: i64 = get_last_insert_rowid(conn)?;
    info!(facility_id, name = %new.name, "Facility created");

    queries::facilities::facility_by_id(conn, facility_id)?
        .ok_or_else(|| PersistenceError::Other(String::from("Created facility not readable")))
}

/// Applies a partial update to a facility.
///
/// Only supplied fields change; unspecified fields are untouched. The
/// merge is read-modify-write under the caller's transaction, so the
/// row updates as one document (last write wins).
///
/// # Errors
///
/// Returns an error if the read or write fails.
///
/// # Returns
///
/// `Ok(None)` if no facility with that id exists.
pub fn apply_facility_patch(
    conn: &mut SqliteConnection,
    facility_id: i64,
    patch: &FacilityPatch,
) -> Result<Option<Facility>, PersistenceError> {
    let Some(current) = queries::facilities::facility_by_id(conn, facility_id)? else {
        return Ok(None);
    };

    let now: String = format_timestamp(OffsetDateTime::now_utc())?;
    let name: String = patch.name.clone().unwrap_or(current.name);
    let facility_type = patch.facility_type.unwrap_or(current.facility_type);
    let location: String = patch.location.clone().unwrap_or(current.location);
    let status = patch.status.unwrap_or(current.status);
    let last_inspected: Option<String> = patch
        .last_inspected
        .or(current.last_inspected)
        .map(format_timestamp)
        .transpose()?;

    diesel::update(facilities::table)
        .filter(facilities::facility_id.eq(facility_id))
        .set((
            facilities::name.eq(&name),
            facilities::facility_type.eq(facility_type.as_str()),
            facilities::location.eq(&location),
            facilities::status.eq(status.as_str()),
            facilities::last_inspected.eq(last_inspected),
            facilities::updated_at.eq(&now),
        ))
        .execute(conn)?;

    info!(facility_id, "Facility updated");
    queries::facilities::facility_by_id(conn, facility_id)
}

/// Hard-deletes a facility, returning the deleted record.
///
/// Reports referencing the facility are deliberately left in place;
/// their reference dangles and readers expand it to "unknown".
///
/// # Errors
///
/// Returns an error if the read or delete fails.
///
/// # Returns
///
/// `Ok(None)` if no facility with that id exists.
pub fn delete_facility(
    conn: &mut SqliteConnection,
    facility_id: i64,
) -> Result<Option<Facility>, PersistenceError> {
    let Some(current) = queries::facilities::facility_by_id(conn, facility_id)? else {
        return Ok(None);
    };

    diesel::delete(facilities::table)
        .filter(facilities::facility_id.eq(facility_id))
        .execute(conn)?;

    info!(facility_id, "Facility deleted");
    Ok(Some(current))
}
