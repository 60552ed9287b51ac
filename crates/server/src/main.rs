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
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use leave_cover_api::{
    AddPublicHolidayRequest, ApiError, ApplyForLeaveRequest, ApplyForLeaveResponse,
    AuditTimelineResponse, AuthenticatedActor, ConfirmEmployeeRequest, DecideLeaveRequest,
    EmailSender, EmployeeResponse, GetLeaveResponse, HolidayResponse, LeaveBalanceResponse,
    LeavePolicies, LeaveServices, LeaveTransitionResponse, ListCandidatesResponse,
    ListLeavesRequest, ListLeavesResponse, ListReassignmentsResponse, Notification,
    NotificationDispatcher, NotificationError, NotificationSink, RegisterEmployeeRequest,
    ResolveReassignmentRequest, ResolveReassignmentResponse, RespondToCoverRequest, Role,
    SweepResponse, TemplatedEmail, add_public_holiday, apply_for_leave, authenticate_stub,
    cancel_leave, confirm_employee, decide_leave, get_audit_timeline, get_leave, get_leave_balance,
    list_leaves, list_reassignment_candidates, list_reassignments, parse_role, register_employee,
    resolve_reassignment, respond_to_cover_request, sweep_expired_cover_requests,
};
use leave_cover_audit::Cause;
use leave_cover_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::info;

/// Leave Cover Server - HTTP server for the leave cover engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Log filter directive, e.g. `info` or `leave_cover_api=debug`.
    /// Falls back to `RUST_LOG`, then `info`.
    #[arg(long, env = "LEAVE_COVER_LOG")]
    log_filter: Option<String>,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Engine policies and the notification dispatcher.
    services: Arc<LeaveServices>,
}

/// Delivers notifications and emails to the log.
struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn create_notification(&self, notification: &Notification) -> Result<(), NotificationError> {
        info!(
            recipient_id = notification.recipient_id,
            notification_type = %notification.notification_type,
            related_id = ?notification.related_id,
            is_pinned = notification.is_pinned,
            title = %notification.title,
            "Notification"
        );
        Ok(())
    }
}

impl EmailSender for TracingNotifier {
    fn send_templated_email(&self, email: &TemplatedEmail) -> Result<(), NotificationError> {
        info!(
            to = %email.to,
            template_id = %email.template_id,
            fields = email.data.len(),
            "Email"
        );
        Ok(())
    }
}

// ============================================================================
// HTTP request types
// ============================================================================

/// Caller identity and cause, carried by every mutating request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorContext {
    /// The employee ID of the caller.
    actor_id: i64,
    /// The role of the caller.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// Caller identity for read requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorQuery {
    /// The employee ID of the caller.
    actor_id: i64,
    /// The role of the caller.
    actor_role: String,
}

/// API request for applying for leave.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ApplyForLeaveApiRequest {
    #[serde(flatten)]
    actor: ActorContext,
    /// The applicant. Defaults to the caller.
    #[serde(default)]
    employee_id: Option<i64>,
    /// ANNUAL, CASUAL, MEDICAL or OFFICIAL.
    leave_type: String,
    /// First day (`YYYY-MM-DD`).
    start_date: String,
    /// Last day, inclusive (`YYYY-MM-DD`).
    end_date: String,
    /// FIRST_HALF or SECOND_HALF for half-day leave.
    #[serde(default)]
    half_day_type: Option<String>,
    /// The colleague asked to cover.
    #[serde(default)]
    cover_employee_id: Option<i64>,
    /// Reference to an uploaded medical certificate.
    #[serde(default)]
    medical_cert_path: Option<String>,
    /// Free-text reason.
    #[serde(default)]
    reason: String,
}

/// API request answering a cover request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CoverResponseApiRequest {
    #[serde(flatten)]
    actor: ActorContext,
    /// Whether cover is accepted.
    accept: bool,
    /// Why cover is declined.
    #[serde(default)]
    reason: Option<String>,
}

/// API request deciding a leave.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct DecisionApiRequest {
    #[serde(flatten)]
    actor: ActorContext,
    /// Whether the leave is approved.
    approve: bool,
    /// Optional message to the applicant.
    #[serde(default)]
    response: Option<String>,
}

/// API request for actions with no payload beyond the caller.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActionApiRequest {
    #[serde(flatten)]
    actor: ActorContext,
}

/// API request resolving a reassignment.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ResolveReassignmentApiRequest {
    #[serde(flatten)]
    actor: ActorContext,
    /// The substitute cover employee.
    new_cover_employee_id: i64,
}

/// API request registering an employee.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RegisterEmployeeApiRequest {
    #[serde(flatten)]
    actor: ActorContext,
    /// Full name.
    name: String,
    /// Unique email address.
    email: String,
    /// Whether the employee is an admin.
    #[serde(default)]
    is_admin: bool,
    /// Admin classification.
    #[serde(default)]
    admin_type: Option<String>,
    /// Whether the employee starts on probation.
    #[serde(default)]
    is_probation: bool,
    /// Confirmation date (`YYYY-MM-DD`).
    #[serde(default)]
    confirmed_at: Option<String>,
}

/// API request confirming an employee.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ConfirmEmployeeApiRequest {
    #[serde(flatten)]
    actor: ActorContext,
    /// Confirmation date (`YYYY-MM-DD`).
    confirmed_at: String,
}

/// API request recording a public holiday.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AddHolidayApiRequest {
    #[serde(flatten)]
    actor: ActorContext,
    /// The holiday (`YYYY-MM-DD`).
    date: String,
    /// Holiday name.
    name: String,
    /// Category description, e.g. "Public, Bank, Poya".
    #[serde(default)]
    description: String,
}

/// Query parameters for listing leaves.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ListLeavesQuery {
    /// The employee ID of the caller.
    actor_id: i64,
    /// The role of the caller.
    actor_role: String,
    /// Restrict to one employee.
    employee_id: Option<i64>,
    /// Restrict to one status.
    status: Option<String>,
    /// Page size.
    limit: Option<u32>,
    /// Rows to skip.
    offset: Option<u32>,
}

/// Query parameters for listing reassignments.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ListReassignmentsQuery {
    /// The employee ID of the caller.
    actor_id: i64,
    /// The role of the caller.
    actor_role: String,
    /// PENDING or ASSIGNED.
    status: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
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
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict { .. } | ApiError::StaleAssignment { .. } => StatusCode::CONFLICT,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Authenticates the caller named in a request.
fn authenticate(actor_id: i64, actor_role: &str) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = parse_role(actor_role).map_err(ApiError::from)?;
    Ok(authenticate_stub(actor_id, role).map_err(ApiError::from)?)
}

/// Authenticates the caller and builds the cause of a mutating request.
fn authenticate_action(actor: ActorContext) -> Result<(AuthenticatedActor, Cause), HttpError> {
    let authenticated: AuthenticatedActor = authenticate(actor.actor_id, &actor.actor_role)?;
    Ok((
        authenticated,
        Cause::new(actor.cause_id, actor.cause_description),
    ))
}

// ============================================================================
// Leave handlers
// ============================================================================

/// Handler for POST `/leaves` endpoint.
///
/// Applies for leave.
async fn handle_apply_for_leave(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ApplyForLeaveApiRequest>,
) -> Result<Json<ApplyForLeaveResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        leave_type = %req.leave_type,
        start_date = %req.start_date,
        end_date = %req.end_date,
        "Handling apply_for_leave request"
    );
    let (actor, cause) = authenticate_action(req.actor)?;
    let request: ApplyForLeaveRequest = ApplyForLeaveRequest {
        employee_id: req.employee_id.unwrap_or(actor.employee_id),
        leave_type: req.leave_type,
        start_date: req.start_date,
        end_date: req.end_date,
        half_day_type: req.half_day_type,
        cover_employee_id: req.cover_employee_id,
        medical_cert_path: req.medical_cert_path,
        reason: req.reason,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ApplyForLeaveResponse = apply_for_leave(
        &mut persistence,
        &app_state.services,
        request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/leaves` endpoint.
async fn handle_list_leaves(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListLeavesQuery>,
) -> Result<Json<ListLeavesResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(query.actor_id, &query.actor_role)?;
    let request: ListLeavesRequest = ListLeavesRequest {
        employee_id: query.employee_id,
        status: query.status,
        limit: query.limit,
        offset: query.offset,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ListLeavesResponse = list_leaves(&mut persistence, &request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/leaves/{leave_id}` endpoint.
async fn handle_get_leave(
    AxumState(app_state): AxumState<AppState>,
    Path(leave_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<GetLeaveResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(query.actor_id, &query.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: GetLeaveResponse = get_leave(&mut persistence, leave_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/leaves/{leave_id}/cover_response` endpoint.
///
/// The named cover employee accepts or declines.
async fn handle_cover_response(
    AxumState(app_state): AxumState<AppState>,
    Path(leave_id): Path<i64>,
    Json(req): Json<CoverResponseApiRequest>,
) -> Result<Json<LeaveTransitionResponse>, HttpError> {
    info!(
        leave_id,
        actor_id = req.actor.actor_id,
        accept = req.accept,
        "Handling cover response"
    );
    let (actor, cause) = authenticate_action(req.actor)?;
    let request: RespondToCoverRequest = RespondToCoverRequest {
        accept: req.accept,
        reason: req.reason,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: LeaveTransitionResponse = respond_to_cover_request(
        &mut persistence,
        &app_state.services,
        leave_id,
        request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/leaves/{leave_id}/decision` endpoint.
async fn handle_decide_leave(
    AxumState(app_state): AxumState<AppState>,
    Path(leave_id): Path<i64>,
    Json(req): Json<DecisionApiRequest>,
) -> Result<Json<LeaveTransitionResponse>, HttpError> {
    info!(
        leave_id,
        actor_id = req.actor.actor_id,
        approve = req.approve,
        "Handling leave decision"
    );
    let (actor, cause) = authenticate_action(req.actor)?;
    let request: DecideLeaveRequest = DecideLeaveRequest {
        approve: req.approve,
        response: req.response,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: LeaveTransitionResponse = decide_leave(
        &mut persistence,
        &app_state.services,
        leave_id,
        request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/leaves/{leave_id}/cancel` endpoint.
async fn handle_cancel_leave(
    AxumState(app_state): AxumState<AppState>,
    Path(leave_id): Path<i64>,
    Json(req): Json<ActionApiRequest>,
) -> Result<Json<LeaveTransitionResponse>, HttpError> {
    info!(leave_id, actor_id = req.actor.actor_id, "Handling cancel_leave");
    let (actor, cause) = authenticate_action(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: LeaveTransitionResponse = cancel_leave(
        &mut persistence,
        &app_state.services,
        leave_id,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/leaves/{leave_id}/audit` endpoint.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Path(leave_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(query.actor_id, &query.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: AuditTimelineResponse = get_audit_timeline(&mut persistence, leave_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/balances/{employee_id}` endpoint.
async fn handle_get_balance(
    AxumState(app_state): AxumState<AppState>,
    Path(employee_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<LeaveBalanceResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(query.actor_id, &query.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: LeaveBalanceResponse = get_leave_balance(
        &mut persistence,
        &app_state.services,
        employee_id,
        &actor,
        OffsetDateTime::now_utc().date(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/cover_requests/sweep` endpoint.
///
/// Expires stale cover requests on demand.
async fn handle_sweep(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActionApiRequest>,
) -> Result<Json<SweepResponse>, HttpError> {
    let (actor, cause) = authenticate_action(req.actor)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: SweepResponse = sweep_expired_cover_requests(
        &mut persistence,
        &app_state.services,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        expired = response.expired_leave_ids.len(),
        "Cover request sweep complete"
    );
    Ok(Json(response))
}

// ============================================================================
// Reassignment handlers
// ============================================================================

/// Handler for GET `/reassignments` endpoint.
async fn handle_list_reassignments(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListReassignmentsQuery>,
) -> Result<Json<ListReassignmentsResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(query.actor_id, &query.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ListReassignmentsResponse =
        list_reassignments(&mut persistence, query.status.as_deref(), &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/reassignments/{reassignment_id}/candidates` endpoint.
async fn handle_list_candidates(
    AxumState(app_state): AxumState<AppState>,
    Path(reassignment_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<ListCandidatesResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(query.actor_id, &query.actor_role)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: ListCandidatesResponse = list_reassignment_candidates(
        &mut persistence,
        &app_state.services,
        reassignment_id,
        &actor,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/reassignments/{reassignment_id}/resolve` endpoint.
async fn handle_resolve_reassignment(
    AxumState(app_state): AxumState<AppState>,
    Path(reassignment_id): Path<i64>,
    Json(req): Json<ResolveReassignmentApiRequest>,
) -> Result<Json<ResolveReassignmentResponse>, HttpError> {
    info!(
        reassignment_id,
        actor_id = req.actor.actor_id,
        new_cover_employee_id = req.new_cover_employee_id,
        "Handling resolve_reassignment"
    );
    let (actor, cause) = authenticate_action(req.actor)?;
    let request: ResolveReassignmentRequest = ResolveReassignmentRequest {
        new_cover_employee_id: req.new_cover_employee_id,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ResolveReassignmentResponse = resolve_reassignment(
        &mut persistence,
        &app_state.services,
        reassignment_id,
        request,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Employee and holiday handlers
// ============================================================================

/// Handler for POST `/employees` endpoint.
async fn handle_register_employee(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterEmployeeApiRequest>,
) -> Result<Json<EmployeeResponse>, HttpError> {
    info!(
        actor_id = req.actor.actor_id,
        is_admin = req.is_admin,
        "Handling register_employee"
    );
    let (actor, _cause) = authenticate_action(req.actor)?;
    let request: RegisterEmployeeRequest = RegisterEmployeeRequest {
        name: req.name,
        email: req.email,
        is_admin: req.is_admin,
        admin_type: req.admin_type,
        is_probation: req.is_probation,
        confirmed_at: req.confirmed_at,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: EmployeeResponse = register_employee(&mut persistence, request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/employees/{employee_id}/confirm` endpoint.
async fn handle_confirm_employee(
    AxumState(app_state): AxumState<AppState>,
    Path(employee_id): Path<i64>,
    Json(req): Json<ConfirmEmployeeApiRequest>,
) -> Result<Json<EmployeeResponse>, HttpError> {
    let (actor, _cause) = authenticate_action(req.actor)?;
    let request: ConfirmEmployeeRequest = ConfirmEmployeeRequest {
        confirmed_at: req.confirmed_at,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: EmployeeResponse =
        confirm_employee(&mut persistence, employee_id, &request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/holidays` endpoint.
async fn handle_add_holiday(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddHolidayApiRequest>,
) -> Result<Json<HolidayResponse>, HttpError> {
    let (actor, _cause) = authenticate_action(req.actor)?;
    let request: AddPublicHolidayRequest = AddPublicHolidayRequest {
        date: req.date,
        name: req.name,
        description: req.description,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: HolidayResponse = add_public_holiday(&mut persistence, &request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/leaves", post(handle_apply_for_leave).get(handle_list_leaves))
        .route("/leaves/{leave_id}", get(handle_get_leave))
        .route(
            "/leaves/{leave_id}/cover_response",
            post(handle_cover_response),
        )
        .route("/leaves/{leave_id}/decision", post(handle_decide_leave))
        .route("/leaves/{leave_id}/cancel", post(handle_cancel_leave))
        .route("/leaves/{leave_id}/audit", get(handle_get_audit_timeline))
        .route("/balances/{employee_id}", get(handle_get_balance))
        .route("/cover_requests/sweep", post(handle_sweep))
        .route("/reassignments", get(handle_list_reassignments))
        .route(
            "/reassignments/{reassignment_id}/candidates",
            get(handle_list_candidates),
        )
        .route(
            "/reassignments/{reassignment_id}/resolve",
            post(handle_resolve_reassignment),
        )
        .route("/employees", post(handle_register_employee))
        .route(
            "/employees/{employee_id}/confirm",
            post(handle_confirm_employee),
        )
        .route("/holidays", post(handle_add_holiday))
        .with_state(app_state)
}

/// Builds the shared state over an opened database.
fn create_app_state(persistence: Persistence) -> AppState {
    let notifier: Arc<TracingNotifier> = Arc::new(TracingNotifier);
    let dispatcher: NotificationDispatcher =
        NotificationDispatcher::new(notifier.clone(), notifier);
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        services: Arc::new(LeaveServices::new(LeavePolicies::default(), dispatcher)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    let filter: tracing_subscriber::EnvFilter = match &args.log_filter {
        Some(directive) => tracing_subscriber::EnvFilter::try_new(directive)?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Initializing Leave Cover Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app: Router = build_router(create_app_state(persistence));

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
