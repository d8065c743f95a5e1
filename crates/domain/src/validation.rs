// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::records::{NewFacility, NewReport};

/// Validates that a new facility's required fields are present.
///
/// Enumeration validity is enforced by the type system; the boundary
/// parses raw strings into `FacilityType`/`FacilityStatus` before this
/// struct exists. This check covers the free-text required fields.
///
/// # Errors
///
/// Returns an error if `name` or `location` is empty.
pub fn validate_new_facility(facility: &NewFacility) -> Result<(), DomainError> {
    if facility.name.trim().is_empty() {
        return Err(DomainError::MissingField { field: "name" });
    }
    if facility.location.trim().is_empty() {
        return Err(DomainError::MissingField { field: "location" });
    }
    Ok(())
}

/// Validates that a new report's required fields are present.
///
/// The facility reference is required but not verified to resolve;
/// reports may outlive the facility they were filed against.
///
/// # Errors
///
/// Returns an error if `facility_id` is not a plausible identifier.
pub fn validate_new_report(report: &NewReport) -> Result<(), DomainError> {
    if report.facility_id <= 0 {
        return Err(DomainError::MissingField {
            field: "facilityId",
        });
    }
    Ok(())
}
