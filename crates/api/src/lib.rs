// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the WASH facility tracker.
//!
//! Handler functions here take an exclusive store reference plus the
//! authenticated [`Caller`] and wire DTOs; the server layer owns HTTP
//! concerns (routing, extraction, status codes). Every mutating
//! operation runs the gate in the same order: authenticate, authorize,
//! validate, then mutate-with-audit.

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

mod audit_logs;
mod auth;
mod error;
mod facilities;
mod reports;
mod request_response;
mod users;

#[cfg(test)]
mod tests;

pub use audit_logs::list_audit_logs;
pub use auth::{AuthenticationService, Caller, authorize};
pub use error::{ApiError, AuthError, translate_domain_error};
pub use facilities::{
    FacilityListQuery, create_facility, delete_facility, get_facility, list_facilities,
    update_facility,
};
pub use reports::{
    ReportListQuery, create_report, delete_report, get_report, list_reports, update_report,
    update_report_status,
};
pub use request_response::{
    ActorInfo, AuditLogInfo, CreateFacilityRequest, CreateReportRequest, FacilityInfo,
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, ReportInfo,
    UpdateFacilityRequest, UpdateReportRequest, UpdateReportStatusRequest, UpdateRoleRequest,
    UpdateSuspendedRequest, UserInfo, format_wire_timestamp,
};
pub use users::{change_role, delete_user, list_users, set_suspended};
