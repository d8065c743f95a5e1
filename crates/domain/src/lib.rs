// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod filters;
mod records;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use filters::{FacilityFilter, ReportFilter, parse_date_bound};
pub use records::{
    Facility, FacilityPatch, NewFacility, NewReport, Report, ReportPatch, User,
};
pub use types::{FacilityStatus, FacilityType, IssueType, ReportStatus, Role};
pub use validation::{validate_new_facility, validate_new_report};
