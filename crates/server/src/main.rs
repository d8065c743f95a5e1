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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tracing::{error, info};
use wash_track_api::{
    ApiError, AuditLogInfo, AuthError, AuthenticationService, CreateFacilityRequest,
    CreateReportRequest, FacilityInfo, FacilityListQuery, LoginRequest, LoginResponse,
    MessageResponse, RegisterRequest, ReportInfo, ReportListQuery, UpdateFacilityRequest,
    UpdateReportRequest, UpdateReportStatusRequest, UpdateRoleRequest, UpdateSuspendedRequest,
    UserInfo,
};
use wash_track_domain::Role;
use wash_track_persistence::SqliteStore;

mod notify;
mod session;
mod uploads;

use notify::{AnyNotifier, LogNotifier, ReportNotification, SmtpNotifier, SmtpSettings};
use session::SessionCaller;

/// WASH facility tracker - HTTP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Directory for uploaded report images
    #[arg(long, default_value = "uploads")]
    uploads_dir: String,

    /// SMTP relay host; notifications are logged instead when unset
    #[arg(long)]
    smtp_host: Option<String>,

    /// SMTP relay port
    #[arg(long, default_value_t = 587)]
    smtp_port: u16,

    /// SMTP username
    #[arg(long)]
    smtp_username: Option<String>,

    /// SMTP password
    #[arg(long)]
    smtp_password: Option<String>,

    /// Sender address for notification email
    #[arg(long)]
    smtp_from: Option<String>,

    /// Admin address that receives report notifications
    #[arg(long)]
    notify_email: Option<String>,

    /// Display name for the seeded admin account
    #[arg(long, default_value = "Administrator")]
    admin_name: String,

    /// Email for the seeded admin account; seeding is skipped when
    /// unset or when an admin already exists
    #[arg(long)]
    admin_email: Option<String>,

    /// Password for the seeded admin account
    #[arg(long)]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The store behind a mutex; per-request mutations serialize here.
    store: Arc<Mutex<SqliteStore>>,
    /// The notification relay.
    notifier: Arc<AnyNotifier>,
    /// Where uploaded images are written.
    uploads_dir: Arc<PathBuf>,
}

/// Error response body shared by every failing route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        Self::from(ApiError::from(err))
    }
}

fn bad_request(message: impl Into<String>) -> HttpError {
    HttpError {
        status: StatusCode::BAD_REQUEST,
        message: message.into(),
    }
}

// ----- Auth routes -----

/// Handler for POST `/api/auth/register`.
async fn handle_register(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserInfo>), HttpError> {
    let mut store = state.store.lock().await;
    let user = AuthenticationService::register(
        &mut store,
        &request.name,
        &request.email,
        request.phone.as_deref(),
        &request.password,
    )
    .map_err(|e| bad_request(e.to_string()))?;
    let info: UserInfo = UserInfo::from_user(&user).map_err(HttpError::from)?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// Handler for POST `/api/auth/login`.
async fn handle_login(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut store = state.store.lock().await;
    let (token, user) = AuthenticationService::login(&mut store, &request.email, &request.password)
        .map_err(HttpError::from)?;
    let user: UserInfo = UserInfo::from_user(&user).map_err(HttpError::from)?;
    Ok(Json(LoginResponse { token, user }))
}

/// Handler for POST `/api/auth/logout`.
///
/// Logout is idempotent: an unknown or already-deleted token still
/// yields a confirmation.
async fn handle_logout(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, HttpError> {
    let token: &str = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing Authorization header"),
        })?;
    let mut store = state.store.lock().await;
    AuthenticationService::logout(&mut store, token).map_err(HttpError::from)?;
    Ok(Json(MessageResponse {
        message: String::from("Logged out"),
    }))
}

// ----- Facility routes -----

/// Query parameters for the facility listing.
#[derive(Debug, Clone, Default, Deserialize)]
struct FacilityQueryParams {
    /// Facility type wire string.
    #[serde(rename = "type")]
    facility_type: Option<String>,
    /// Status wire string.
    status: Option<String>,
    /// Location substring.
    location: Option<String>,
}

/// Handler for GET `/api/facilities`. Public.
async fn handle_list_facilities(
    AxumState(state): AxumState<AppState>,
    Query(params): Query<FacilityQueryParams>,
) -> Result<Json<Vec<FacilityInfo>>, HttpError> {
    let query: FacilityListQuery = FacilityListQuery {
        facility_type: params.facility_type,
        status: params.status,
        location: params.location,
    };
    let mut store = state.store.lock().await;
    let facilities: Vec<FacilityInfo> =
        wash_track_api::list_facilities(&mut store, &query).map_err(HttpError::from)?;
    Ok(Json(facilities))
}

/// Handler for GET `/api/facilities/{id}`. Public.
async fn handle_get_facility(
    AxumState(state): AxumState<AppState>,
    Path(facility_id): Path<i64>,
) -> Result<Json<FacilityInfo>, HttpError> {
    let mut store = state.store.lock().await;
    let facility: FacilityInfo =
        wash_track_api::get_facility(&mut store, facility_id).map_err(HttpError::from)?;
    Ok(Json(facility))
}

/// Handler for POST `/api/facilities`.
async fn handle_create_facility(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Json(request): Json<CreateFacilityRequest>,
) -> Result<(StatusCode, Json<FacilityInfo>), HttpError> {
    let mut store = state.store.lock().await;
    let facility: FacilityInfo =
        wash_track_api::create_facility(&mut store, &caller, &request).map_err(HttpError::from)?;
    Ok((StatusCode::CREATED, Json(facility)))
}

/// Handler for PUT `/api/facilities/{id}`.
async fn handle_update_facility(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Path(facility_id): Path<i64>,
    Json(request): Json<UpdateFacilityRequest>,
) -> Result<Json<FacilityInfo>, HttpError> {
    let mut store = state.store.lock().await;
    let facility: FacilityInfo =
        wash_track_api::update_facility(&mut store, &caller, facility_id, &request)
            .map_err(HttpError::from)?;
    Ok(Json(facility))
}

/// Handler for DELETE `/api/facilities/{id}`.
async fn handle_delete_facility(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Path(facility_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut store = state.store.lock().await;
    wash_track_api::delete_facility(&mut store, &caller, facility_id).map_err(HttpError::from)?;
    Ok(Json(MessageResponse {
        message: String::from("Facility deleted"),
    }))
}

// ----- Report routes -----

/// Query parameters for the report listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportQueryParams {
    /// Issue type wire string.
    issue_type: Option<String>,
    /// Status wire string.
    status: Option<String>,
    /// Facility reference.
    facility_id: Option<i64>,
    /// Inclusive lower date bound.
    from: Option<String>,
    /// Inclusive upper date bound.
    to: Option<String>,
}

/// Handler for GET `/api/reports`. Public.
async fn handle_list_reports(
    AxumState(state): AxumState<AppState>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<Vec<ReportInfo>>, HttpError> {
    let query: ReportListQuery = ReportListQuery {
        issue_type: params.issue_type,
        status: params.status,
        facility_id: params.facility_id,
        from: params.from,
        to: params.to,
    };
    let mut store = state.store.lock().await;
    let reports: Vec<ReportInfo> =
        wash_track_api::list_reports(&mut store, &query).map_err(HttpError::from)?;
    Ok(Json(reports))
}

/// Handler for GET `/api/reports/{id}`. Public.
async fn handle_get_report(
    AxumState(state): AxumState<AppState>,
    Path(report_id): Path<i64>,
) -> Result<Json<ReportInfo>, HttpError> {
    let mut store = state.store.lock().await;
    let report: ReportInfo =
        wash_track_api::get_report(&mut store, report_id).map_err(HttpError::from)?;
    Ok(Json(report))
}

/// Handler for POST `/api/reports`.
///
/// Accepts multipart form data: text fields `facilityId`, `issueType`,
/// `description`, `date`, plus any number of `images` file parts. On
/// success a notification is fired and forgotten; its outcome never
/// changes the response.
async fn handle_create_report(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ReportInfo>), HttpError> {
    let mut facility_id: Option<i64> = None;
    let mut issue_type: Option<String> = None;
    let mut description: Option<String> = None;
    let mut date: Option<String> = None;
    let mut images: Vec<String> = Vec::new();
    let mut sequence: usize = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "facilityId" => {
                let raw: String = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Invalid facilityId: {e}")))?;
                facility_id = Some(
                    raw.parse::<i64>()
                        .map_err(|_| bad_request(format!("Invalid facilityId: '{raw}'")))?,
                );
            }
            "issueType" => {
                issue_type = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| bad_request(format!("Invalid issueType: {e}")))?,
                );
            }
            "description" => {
                description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| bad_request(format!("Invalid description: {e}")))?,
                );
            }
            "date" => {
                date = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| bad_request(format!("Invalid date: {e}")))?,
                );
            }
            "images" => {
                let original: String = field.file_name().unwrap_or("image").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Invalid image upload: {e}")))?;
                let filename: String = uploads::stored_filename(&original, sequence);
                sequence += 1;
                let reference: String =
                    uploads::store_image(&state.uploads_dir, &filename, &data)
                        .await
                        .map_err(|e| HttpError {
                            status: StatusCode::INTERNAL_SERVER_ERROR,
                            message: format!("Failed to store image: {e}"),
                        })?;
                images.push(reference);
            }
            _ => {}
        }
    }

    let request: CreateReportRequest = CreateReportRequest {
        facility_id: facility_id.ok_or_else(|| bad_request("Missing field 'facilityId'"))?,
        date,
        issue_type: issue_type.ok_or_else(|| bad_request("Missing field 'issueType'"))?,
        description,
    };

    let report: ReportInfo = {
        let mut store = state.store.lock().await;
        wash_track_api::create_report(&mut store, &caller, &request, images)
            .map_err(HttpError::from)?
    };

    notify::dispatch(
        Arc::clone(&state.notifier),
        ReportNotification {
            facility_id: request.facility_id,
            issue_type: request.issue_type.clone(),
            description: request.description.clone(),
        },
    );

    Ok((StatusCode::CREATED, Json(report)))
}

/// Handler for PUT `/api/reports/{id}`.
async fn handle_update_report(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Path(report_id): Path<i64>,
    Json(request): Json<UpdateReportRequest>,
) -> Result<Json<ReportInfo>, HttpError> {
    let mut store = state.store.lock().await;
    let report: ReportInfo =
        wash_track_api::update_report(&mut store, &caller, report_id, &request)
            .map_err(HttpError::from)?;
    Ok(Json(report))
}

/// Handler for PUT `/api/reports/{id}/status`.
async fn handle_update_report_status(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Path(report_id): Path<i64>,
    Json(request): Json<UpdateReportStatusRequest>,
) -> Result<Json<ReportInfo>, HttpError> {
    let mut store = state.store.lock().await;
    let report: ReportInfo =
        wash_track_api::update_report_status(&mut store, &caller, report_id, &request)
            .map_err(HttpError::from)?;
    Ok(Json(report))
}

/// Handler for DELETE `/api/reports/{id}`.
async fn handle_delete_report(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Path(report_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut store = state.store.lock().await;
    wash_track_api::delete_report(&mut store, &caller, report_id).map_err(HttpError::from)?;
    Ok(Json(MessageResponse {
        message: String::from("Report deleted"),
    }))
}

// ----- User administration routes -----

/// Handler for GET `/api/users`.
async fn handle_list_users(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
) -> Result<Json<Vec<UserInfo>>, HttpError> {
    let mut store = state.store.lock().await;
    let users: Vec<UserInfo> =
        wash_track_api::list_users(&mut store, &caller).map_err(HttpError::from)?;
    Ok(Json(users))
}

/// Handler for PUT `/api/users/{id}/role`.
async fn handle_change_role(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserInfo>, HttpError> {
    let mut store = state.store.lock().await;
    let user: UserInfo =
        wash_track_api::change_role(&mut store, &caller, user_id, &request.role)
            .map_err(HttpError::from)?;
    Ok(Json(user))
}

/// Handler for PUT `/api/users/{id}/suspend`.
async fn handle_set_suspended(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateSuspendedRequest>,
) -> Result<Json<UserInfo>, HttpError> {
    let mut store = state.store.lock().await;
    let user: UserInfo =
        wash_track_api::set_suspended(&mut store, &caller, user_id, request.suspended)
            .map_err(HttpError::from)?;
    Ok(Json(user))
}

/// Handler for DELETE `/api/users/{id}`.
async fn handle_delete_user(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut store = state.store.lock().await;
    wash_track_api::delete_user(&mut store, &caller, user_id).map_err(HttpError::from)?;
    Ok(Json(MessageResponse {
        message: String::from("User deleted"),
    }))
}

// ----- Audit log routes -----

/// Query parameters for the audit log listing.
#[derive(Debug, Clone, Default, Deserialize)]
struct AuditQueryParams {
    /// Action wire string to filter by.
    action: Option<String>,
}

/// Handler for GET `/api/audit-logs`.
async fn handle_list_audit_logs(
    AxumState(state): AxumState<AppState>,
    SessionCaller(caller): SessionCaller,
    Query(params): Query<AuditQueryParams>,
) -> Result<Json<Vec<AuditLogInfo>>, HttpError> {
    let mut store = state.store.lock().await;
    let logs: Vec<AuditLogInfo> =
        wash_track_api::list_audit_logs(&mut store, &caller, params.action.as_deref())
            .map_err(HttpError::from)?;
    Ok(Json(logs))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    let uploads_service: ServeDir = ServeDir::new(app_state.uploads_dir.as_ref());
    Router::new()
        .route("/api/auth/register", post(handle_register))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/logout", post(handle_logout))
        .route(
            "/api/facilities",
            get(handle_list_facilities).post(handle_create_facility),
        )
        .route(
            "/api/facilities/{id}",
            get(handle_get_facility)
                .put(handle_update_facility)
                .delete(handle_delete_facility),
        )
        .route(
            "/api/reports",
            get(handle_list_reports).post(handle_create_report),
        )
        .route(
            "/api/reports/{id}",
            get(handle_get_report)
                .put(handle_update_report)
                .delete(handle_delete_report),
        )
        .route("/api/reports/{id}/status", put(handle_update_report_status))
        .route("/api/users", get(handle_list_users))
        .route("/api/users/{id}/role", put(handle_change_role))
        .route("/api/users/{id}/suspend", put(handle_set_suspended))
        .route("/api/users/{id}", delete(handle_delete_user))
        .route("/api/audit-logs", get(handle_list_audit_logs))
        .nest_service("/uploads", uploads_service)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(app_state)
}

/// Seeds the admin account from CLI arguments if none exists yet.
fn seed_admin(store: &mut SqliteStore, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(email), Some(password)) = (&args.admin_email, &args.admin_password) else {
        return Ok(());
    };
    if store.admin_exists()? {
        info!("Admin account already present; skipping seed");
        return Ok(());
    }
    let admin = store.create_user(&args.admin_name, email, None, password, Role::Admin)?;
    info!(user_id = admin.user_id, "Seeded admin account");
    Ok(())
}

fn build_notifier(args: &Args) -> Result<AnyNotifier, Box<dyn std::error::Error>> {
    let (Some(host), Some(from), Some(admin)) =
        (&args.smtp_host, &args.smtp_from, &args.notify_email)
    else {
        info!("SMTP unconfigured; report notifications will be logged only");
        return Ok(AnyNotifier::Log(LogNotifier));
    };
    let settings: SmtpSettings = SmtpSettings {
        host: host.clone(),
        port: args.smtp_port,
        username: args.smtp_username.clone(),
        password: args.smtp_password.clone(),
        from_address: from.clone(),
        admin_address: admin.clone(),
    };
    Ok(AnyNotifier::Smtp(SmtpNotifier::new(&settings)?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Args = Args::parse();

    let mut store: SqliteStore = match &args.database {
        Some(path) => {
            info!(path = %path, "Opening database");
            SqliteStore::new_with_file(path)?
        }
        None => {
            info!("Using in-memory database");
            SqliteStore::new_in_memory()?
        }
    };
    seed_admin(&mut store, &args)?;

    let uploads_dir: PathBuf = PathBuf::from(&args.uploads_dir);
    tokio::fs::create_dir_all(&uploads_dir).await?;

    let notifier: AnyNotifier = build_notifier(&args)?;

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(store)),
        notifier: Arc::new(notifier),
        uploads_dir: Arc::new(uploads_dir),
    };
    let app: Router = build_router(app_state);

    let addr: String = format!("0.0.0.0:{}", args.port);
    info!(addr = %addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const TEST_PASSWORD: &str = "correct-horse-battery";

    async fn create_test_state() -> AppState {
        let store: SqliteStore = SqliteStore::new_in_memory().unwrap();
        let nanos: i128 = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
        let uploads_dir: PathBuf = std::env::temp_dir().join(format!("wash_track_test_{nanos}"));
        tokio::fs::create_dir_all(&uploads_dir).await.unwrap();
        AppState {
            store: Arc::new(Mutex::new(store)),
            notifier: Arc::new(AnyNotifier::Log(LogNotifier)),
            uploads_dir: Arc::new(uploads_dir),
        }
    }

    async fn seed_user(state: &AppState, email: &str, role: Role) -> i64 {
        let mut store = state.store.lock().await;
        let user = store
            .create_user("Test User", email, None, TEST_PASSWORD, role)
            .unwrap();
        user.user_id
    }

    fn json_request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        match body {
            Some(value) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login_token(app: &Router, email: &str) -> String {
        let request = json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": TEST_PASSWORD })),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_facility_over_http(app: &Router, token: &str) -> i64 {
        let request = json_request(
            "POST",
            "/api/facilities",
            Some(token),
            Some(serde_json::json!({
                "name": "Borehole A",
                "type": "Water Point",
                "location": "Ward 3, Kisumu"
            })),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        body["id"].as_i64().unwrap()
    }

    fn multipart_report_request(
        token: &str,
        facility_id: i64,
        image: Option<(&str, &[u8])>,
    ) -> Request<Body> {
        let boundary: &str = "wash-track-test-boundary";
        let mut body: Vec<u8> = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; \
                 name=\"facilityId\"\r\n\r\n{facility_id}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; \
                 name=\"issueType\"\r\n\r\nbroken\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; \
                 name=\"description\"\r\n\r\nHandle snapped off\r\n"
            )
            .as_bytes(),
        );
        if let Some((filename, data)) = image {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; \
                     name=\"images\"; filename=\"{filename}\"\r\n\
                     Content-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri("/api/reports")
            .header("Authorization", format!("Bearer {token}"))
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_creates_staff_account() {
        let state = create_test_state().await;
        let app: Router = build_router(state);

        let request = json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "name": "Amina",
                "email": "amina@example.com",
                "password": TEST_PASSWORD
            })),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["role"], "staff");
        assert_eq!(body["email"], "amina@example.com");
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn test_short_password_rejected_with_error_body() {
        let state = create_test_state().await;
        let app: Router = build_router(state);

        let request = json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "name": "Amina",
                "email": "amina@example.com",
                "password": "short"
            })),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["error"], true);
        assert!(body["message"].as_str().unwrap().contains("8"));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let state = create_test_state().await;
        seed_user(&state, "staff@example.com", Role::Staff).await;
        let app: Router = build_router(state);

        let request = json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({
                "email": "staff@example.com",
                "password": "not-the-password"
            })),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = response_json(response).await;
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_public_reads_require_no_token() {
        let state = create_test_state().await;
        let app: Router = build_router(state);

        let response = app
            .clone()
            .oneshot(json_request("GET", "/api/facilities", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, serde_json::json!([]));

        let response = app
            .oneshot(json_request("GET", "/api/reports", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unauthenticated_write_rejected() {
        let state = create_test_state().await;
        let app: Router = build_router(state);

        let request = json_request(
            "POST",
            "/api/facilities",
            None,
            Some(serde_json::json!({
                "name": "Borehole A",
                "type": "Water Point",
                "location": "Ward 3"
            })),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = response_json(response).await;
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_staff_cannot_create_facility() {
        let state = create_test_state().await;
        seed_user(&state, "staff@example.com", Role::Staff).await;
        let app: Router = build_router(state);
        let token: String = login_token(&app, "staff@example.com").await;

        let request = json_request(
            "POST",
            "/api/facilities",
            Some(&token),
            Some(serde_json::json!({
                "name": "Borehole A",
                "type": "Water Point",
                "location": "Ward 3"
            })),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_manager_facility_crud() {
        let state = create_test_state().await;
        seed_user(&state, "manager@example.com", Role::Manager).await;
        let app: Router = build_router(state);
        let token: String = login_token(&app, "manager@example.com").await;
        let facility_id: i64 = create_facility_over_http(&app, &token).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "GET",
                &format!("/api/facilities/{facility_id}"),
                None,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "Working");

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/facilities/{facility_id}"),
                Some(&token),
                Some(serde_json::json!({ "status": "Out of Service" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "Out of Service");
        assert_eq!(body["name"], "Borehole A");

        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                &format!("/api/facilities/{facility_id}"),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                "GET",
                &format!("/api/facilities/{facility_id}"),
                None,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_report_multipart_create_stamps_reporter() {
        let state = create_test_state().await;
        seed_user(&state, "manager@example.com", Role::Manager).await;
        let staff_id: i64 = seed_user(&state, "staff@example.com", Role::Staff).await;
        let app: Router = build_router(state);
        let manager_token: String = login_token(&app, "manager@example.com").await;
        let facility_id: i64 = create_facility_over_http(&app, &manager_token).await;
        let staff_token: String = login_token(&app, "staff@example.com").await;

        let response = app
            .oneshot(multipart_report_request(&staff_token, facility_id, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["status"], "open");
        assert_eq!(body["issueType"], "broken");
        assert_eq!(body["reportedBy"]["id"].as_i64().unwrap(), staff_id);
        assert_eq!(body["facility"]["id"].as_i64().unwrap(), facility_id);
        assert!(body["resolvedBy"].is_null());
    }

    #[tokio::test]
    async fn test_report_image_upload_served_back() {
        let state = create_test_state().await;
        seed_user(&state, "manager@example.com", Role::Manager).await;
        let app: Router = build_router(state);
        let token: String = login_token(&app, "manager@example.com").await;
        let facility_id: i64 = create_facility_over_http(&app, &token).await;

        let image_bytes: &[u8] = b"\xff\xd8\xff\xe0 not a real jpeg";
        let response = app
            .clone()
            .oneshot(multipart_report_request(
                &token,
                facility_id,
                Some(("leak photo.jpg", image_bytes)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        let images = body["images"].as_array().unwrap();
        assert_eq!(images.len(), 1);
        let reference: &str = images[0].as_str().unwrap();
        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with("leak_photo.jpg"));

        let response = app
            .oneshot(json_request("GET", reference, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], image_bytes);
    }

    #[tokio::test]
    async fn test_report_status_route_gated_and_bookkept() {
        let state = create_test_state().await;
        let manager_id: i64 = seed_user(&state, "manager@example.com", Role::Manager).await;
        seed_user(&state, "staff@example.com", Role::Staff).await;
        let app: Router = build_router(state);
        let manager_token: String = login_token(&app, "manager@example.com").await;
        let staff_token: String = login_token(&app, "staff@example.com").await;
        let facility_id: i64 = create_facility_over_http(&app, &manager_token).await;

        let response = app
            .clone()
            .oneshot(multipart_report_request(&staff_token, facility_id, None))
            .await
            .unwrap();
        let report_id: i64 = response_json(response).await["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/reports/{report_id}/status"),
                Some(&staff_token),
                Some(serde_json::json!({ "status": "resolved" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/reports/{report_id}/status"),
                Some(&manager_token),
                Some(serde_json::json!({ "status": "resolved" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "resolved");
        assert_eq!(body["resolvedBy"]["id"].as_i64().unwrap(), manager_id);
        assert!(!body["resolvedAt"].is_null());
    }

    #[tokio::test]
    async fn test_audit_logs_admin_only() {
        let state = create_test_state().await;
        seed_user(&state, "admin@example.com", Role::Admin).await;
        seed_user(&state, "manager@example.com", Role::Manager).await;
        let app: Router = build_router(state);
        let admin_token: String = login_token(&app, "admin@example.com").await;
        let manager_token: String = login_token(&app, "manager@example.com").await;
        create_facility_over_http(&app, &manager_token).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "GET",
                "/api/audit-logs",
                Some(&manager_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(json_request(
                "GET",
                "/api/audit-logs",
                Some(&admin_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["action"], "create");
        assert_eq!(entries[0]["targetKind"], "Facility");
        assert_eq!(
            entries[0]["user"]["email"].as_str().unwrap(),
            "manager@example.com"
        );
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let state = create_test_state().await;
        seed_user(&state, "admin@example.com", Role::Admin).await;
        let app: Router = build_router(state);
        let token: String = login_token(&app, "admin@example.com").await;

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/logout", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request("GET", "/api/users", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_user_administration_routes() {
        let state = create_test_state().await;
        let admin_id: i64 = seed_user(&state, "admin@example.com", Role::Admin).await;
        let staff_id: i64 = seed_user(&state, "staff@example.com", Role::Staff).await;
        let app: Router = build_router(state);
        let admin_token: String = login_token(&app, "admin@example.com").await;

        let response = app
            .clone()
            .oneshot(json_request("GET", "/api/users", Some(&admin_token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await.as_array().unwrap().len(), 2);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/users/{staff_id}/role"),
                Some(&admin_token),
                Some(serde_json::json!({ "role": "manager" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await["role"], "manager");

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/users/{admin_id}/role"),
                Some(&admin_token),
                Some(serde_json::json!({ "role": "staff" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/users/{staff_id}/suspend"),
                Some(&admin_token),
                Some(serde_json::json!({ "suspended": true })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await["suspended"], true);

        let response = app
            .oneshot(json_request(
                "DELETE",
                &format!("/api/users/{staff_id}"),
                Some(&admin_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
