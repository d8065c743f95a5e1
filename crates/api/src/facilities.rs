// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Facility registry operations.
//!
//! Reads are public; mutations require admin or manager and each one
//! appends exactly one audit record inside the mutation transaction.

use std::str::FromStr;
use time::OffsetDateTime;
use wash_track_domain::{
    Facility, FacilityFilter, FacilityPatch, FacilityStatus, FacilityType, NewFacility, Role,
    parse_date_bound, validate_new_facility,
};
use wash_track_persistence::SqliteStore;

use crate::auth::{Caller, authorize};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    CreateFacilityRequest, FacilityInfo, UpdateFacilityRequest,
};

/// Roles permitted to mutate facilities.
const FACILITY_WRITERS: &[Role] = &[Role::Admin, Role::Manager];

/// Raw query parameters for the facility listing.
#[derive(Debug, Clone, Default)]
pub struct FacilityListQuery {
    /// Facility type wire string.
    pub facility_type: Option<String>,
    /// Status wire string.
    pub status: Option<String>,
    /// Location substring.
    pub location: Option<String>,
}

fn parse_filter(query: &FacilityListQuery) -> Result<FacilityFilter, ApiError> {
    let facility_type: Option<FacilityType> = query
        .facility_type
        .as_deref()
        .map(FacilityType::from_str)
        .transpose()
        .map_err(|e| translate_domain_error(&e))?;
    let status: Option<FacilityStatus> = query
        .status
        .as_deref()
        .map(FacilityStatus::from_str)
        .transpose()
        .map_err(|e| translate_domain_error(&e))?;
    Ok(FacilityFilter {
        facility_type,
        status,
        location: query.location.clone(),
    })
}

fn parse_last_inspected(raw: Option<&str>) -> Result<Option<OffsetDateTime>, ApiError> {
    raw.map(parse_date_bound)
        .transpose()
        .map_err(|e| translate_domain_error(&e))
}

/// Creates a facility.
///
/// # Errors
///
/// Returns an error if the caller is not admin or manager, a field is
/// invalid, or the write fails.
pub fn create_facility(
    store: &mut SqliteStore,
    caller: &Caller,
    request: &CreateFacilityRequest,
) -> Result<FacilityInfo, ApiError> {
    authorize(caller, FACILITY_WRITERS, "create_facility")?;

    let facility_type: FacilityType = FacilityType::from_str(&request.facility_type)
        .map_err(|e| translate_domain_error(&e))?;
    let status: FacilityStatus = request
        .status
        .as_deref()
        .map(FacilityStatus::from_str)
        .transpose()
        .map_err(|e| translate_domain_error(&e))?
        .unwrap_or_default();

    let new: NewFacility = NewFacility {
        name: request.name.clone(),
        facility_type,
        location: request.location.clone(),
        status,
        last_inspected: parse_last_inspected(request.last_inspected.as_deref())?,
    };
    validate_new_facility(&new).map_err(|e| translate_domain_error(&e))?;

    let details: serde_json::Value =
        serde_json::to_value(request).map_err(|e| ApiError::Internal {
            message: format!("Failed to serialize audit details: {e}"),
        })?;

    let facility: Facility = store.create_facility(caller.user_id, &new, &details)?;
    tracing::info!(
        facility_id = facility.facility_id,
        user_id = caller.user_id,
        "facility created"
    );
    FacilityInfo::from_facility(&facility)
}

/// Lists facilities matching the query. Public.
///
/// # Errors
///
/// Returns an error if a filter value is invalid or the query fails.
pub fn list_facilities(
    store: &mut SqliteStore,
    query: &FacilityListQuery,
) -> Result<Vec<FacilityInfo>, ApiError> {
    let filter: FacilityFilter = parse_filter(query)?;
    store
        .list_facilities(&filter)?
        .iter()
        .map(FacilityInfo::from_facility)
        .collect()
}

/// Fetches a single facility. Public.
///
/// # Errors
///
/// Returns `ResourceNotFound` if no facility with that id exists.
pub fn get_facility(store: &mut SqliteStore, facility_id: i64) -> Result<FacilityInfo, ApiError> {
    let facility: Facility =
        store
            .facility_by_id(facility_id)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Facility"),
                message: format!("No facility with id {facility_id}"),
            })?;
    FacilityInfo::from_facility(&facility)
}

/// Partially updates a facility.
///
/// # Errors
///
/// Returns an error if the caller is not admin or manager, a supplied
/// field is invalid, no field is supplied at all, or the facility does
/// not exist.
pub fn update_facility(
    store: &mut SqliteStore,
    caller: &Caller,
    facility_id: i64,
    request: &UpdateFacilityRequest,
) -> Result<FacilityInfo, ApiError> {
    authorize(caller, FACILITY_WRITERS, "update_facility")?;

    let patch: FacilityPatch = FacilityPatch {
        name: request.name.clone(),
        facility_type: request
            .facility_type
            .as_deref()
            .map(FacilityType::from_str)
            .transpose()
            .map_err(|e| translate_domain_error(&e))?,
        location: request.location.clone(),
        status: request
            .status
            .as_deref()
            .map(FacilityStatus::from_str)
            .transpose()
            .map_err(|e| translate_domain_error(&e))?,
        last_inspected: parse_last_inspected(request.last_inspected.as_deref())?,
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

    let facility: Facility = store
        .update_facility(caller.user_id, facility_id, &patch, &details)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Facility"),
            message: format!("No facility with id {facility_id}"),
        })?;
    FacilityInfo::from_facility(&facility)
}

/// Deletes a facility.
///
/// Reports referencing the facility are left in place; their facility
/// reference dangles and readers expand it to `null`.
///
/// # Errors
///
/// Returns an error if the caller is not admin or manager or the
/// facility does not exist.
pub fn delete_facility(
    store: &mut SqliteStore,
    caller: &Caller,
    facility_id: i64,
) -> Result<(), ApiError> {
    authorize(caller, FACILITY_WRITERS, "delete_facility")?;

    store
        .delete_facility(caller.user_id, facility_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Facility"),
            message: format!("No facility with id {facility_id}"),
        })?;
    tracing::info!(facility_id, user_id = caller.user_id, "facility deleted");
    Ok(())
}
