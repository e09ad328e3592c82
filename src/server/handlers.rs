//! HTTP request handlers for the job portal API.
//!
//! Each handler performs one portal operation and serializes the raw result.
//!
//! # Endpoints
//!
//! - `GET /` - Plain-text liveness string
//! - `GET /health` - Health check with database ping
//! - `POST /jwt` - Issue a session cookie
//! - `POST /logout` - Clear the session cookie
//! - `POST /jobs`, `GET /jobs`, `GET /jobs/{id}` - Jobs
//! - `POST /jobApplications`, `GET /jobApplications?email=`,
//!   `DELETE /jobApplications/{id}` - Job applications

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::error::{PortalError, StoreError};
use crate::portal::PortalService;
use crate::store::{DeleteAck, DocumentStore, InsertAck};

use super::auth::{AuthError, CookiePolicy, SessionAuth, SessionClaims};

/// Body returned by `GET /`.
pub const ROOT_MESSAGE: &str = "Job Portal Backend";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState<S: DocumentStore> {
    /// Jobs and applications over the document store
    pub portal: PortalService<S>,

    /// Session token issuer/verifier
    pub session: SessionAuth,

    /// Attributes for the session cookie
    pub cookie_policy: CookiePolicy,
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(portal: PortalService<S>, session: SessionAuth) -> Self {
        Self {
            portal,
            session,
            cookie_policy: CookiePolicy::default(),
        }
    }

    pub fn with_cookie_policy(mut self, cookie_policy: CookiePolicy) -> Self {
        self.cookie_policy = cookie_policy;
        self
    }
}

impl<S: DocumentStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            portal: self.portal.clone(),
            session: self.session.clone(),
            cookie_policy: self.cookie_policy,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for the applications listing.
#[derive(Debug, Deserialize)]
pub struct ApplicationsQueryParams {
    /// Applicant email; must match the session email
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "forbidden", "invalid_id")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code, repeated from the response line
    pub status: u16,
}

impl ErrorResponse {
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: status.as_u16(),
        }
    }
}

/// `{"success": true}` acknowledgment for session endpoints.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Self {
        Self { success: true }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,

    /// Service version
    pub version: String,

    /// Database failure, when unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert PortalError to HTTP response.
///
/// - 403 for ownership mismatches (logged at WARN)
/// - 400 for malformed identifiers (logged at WARN)
/// - 500 for database and conversion failures (logged at ERROR)
impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            PortalError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            PortalError::Store(StoreError::InvalidId(_)) => (StatusCode::BAD_REQUEST, "invalid_id"),
            PortalError::Store(StoreError::Database(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
            }
            PortalError::Store(StoreError::Serialization(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "serialization_error")
            }
        };
        let message = self.to_string();

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        PortalError::Store(self).into_response()
    }
}

// =============================================================================
// Health
// =============================================================================

/// Handle `GET /`.
pub async fn root_handler() -> &'static str {
    ROOT_MESSAGE
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` when the database answers a ping:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
///
/// `503 Service Unavailable` with `"status": "unhealthy"` and an `error`
/// field otherwise.
pub async fn health_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> (StatusCode, Json<HealthResponse>) {
    let version = env!("CARGO_PKG_VERSION").to_string();

    match state.portal.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                version,
                error: None,
            }),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    version,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Issue a session cookie.
///
/// # Endpoint
///
/// `POST /jwt`
///
/// # Body
///
/// Any JSON object; it becomes the token's claims. `email` is the claim used
/// by ownership checks.
///
/// # Response
///
/// `200 OK` with `{"success": true}` and a `Set-Cookie: token=...; HttpOnly`
/// header.
pub async fn issue_session_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
    Json(claims): Json<Map<String, Value>>,
) -> Result<(CookieJar, Json<SuccessResponse>), AuthError> {
    let email = claims
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or("<none>")
        .to_string();

    let (token, expiry) = state.session.issue(claims)?;
    info!(email = %email, expiry, "Issued session");

    let jar = jar.add(state.cookie_policy.session_cookie(token));
    Ok((jar, Json(SuccessResponse::ok())))
}

/// Clear the session cookie.
///
/// # Endpoint
///
/// `POST /logout`
pub async fn logout_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    debug!("Clearing session cookie");
    let jar = jar.add(state.cookie_policy.removal_cookie());
    (jar, Json(SuccessResponse::ok()))
}

// =============================================================================
// Jobs
// =============================================================================

/// Create a job.
///
/// # Endpoint
///
/// `POST /jobs`
///
/// # Response
///
/// ```json
/// { "acknowledged": true, "insertedId": "6565c0ffee0000000000beef" }
/// ```
pub async fn create_job_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Json(job): Json<Map<String, Value>>,
) -> Result<Json<InsertAck>, PortalError> {
    let ack = state.portal.create_job(job).await?;
    Ok(Json(ack))
}

/// List every job.
///
/// # Endpoint
///
/// `GET /jobs`
pub async fn jobs_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Value>>, PortalError> {
    Ok(Json(state.portal.list_jobs().await?))
}

/// Fetch a single job.
///
/// # Endpoint
///
/// `GET /jobs/{id}`
///
/// # Response
///
/// - `200 OK` with the job document, or `null` when no job has this id
/// - `400 Bad Request` when `id` is not a valid ObjectId
pub async fn job_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Value>>, PortalError> {
    Ok(Json(state.portal.get_job(&id).await?))
}

// =============================================================================
// Job Applications
// =============================================================================

/// Submit a job application.
///
/// # Endpoint
///
/// `POST /jobApplications`
pub async fn create_application_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Json(application): Json<Map<String, Value>>,
) -> Result<Json<InsertAck>, PortalError> {
    let ack = state.portal.create_application(application).await?;
    Ok(Json(ack))
}

/// List the caller's applications, enriched with job details.
///
/// # Endpoint
///
/// `GET /jobApplications?email=<email>` (requires session middleware)
///
/// # Response
///
/// - `200 OK` with an array of applications; those whose job still exists
///   carry its `title`, `company`, `location` and `company_logo`
/// - `401 Unauthorized` without a valid session cookie (from the middleware)
/// - `403 Forbidden` when `email` differs from the session email
pub async fn applications_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<ApplicationsQueryParams>,
) -> Result<Json<Vec<Value>>, PortalError> {
    let applications = state
        .portal
        .applications_for(claims.email.as_deref(), query.email.as_deref())
        .await?;
    Ok(Json(applications))
}

/// Delete a job application.
///
/// # Endpoint
///
/// `DELETE /jobApplications/{id}`
///
/// # Response
///
/// ```json
/// { "acknowledged": true, "deletedCount": 1 }
/// ```
pub async fn delete_application_handler<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, PortalError> {
    Ok(Json(state.portal.delete_application(&id).await?))
}
