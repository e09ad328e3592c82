//! Router configuration for the job portal.
//!
//! This module defines the HTTP routes and applies middleware for session
//! authentication, CORS, and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /                              - Liveness string (public)
//! /health                        - Health check (public)
//! /jwt                 POST      - Issue session cookie (public)
//! /logout              POST      - Clear session cookie (public)
//! /jobs                GET, POST - List / create jobs (public)
//! /jobs/{id}           GET       - Fetch a job (public)
//! /jobApplications     POST      - Submit application (public)
//! /jobApplications     GET       - List own applications (session)
//! /jobApplications/{id} DELETE   - Delete application (public)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use job_portal::server::routes::{create_router, RouterConfig};
//! use job_portal::portal::PortalService;
//! use job_portal::store::MongoStore;
//!
//! let store = MongoStore::connect(&uri, "jobPortal").await?;
//! let portal = PortalService::new(store);
//!
//! let config = RouterConfig::new("my-secret-key")
//!     .with_cors_origins(vec!["https://jobs.example.com".to_string()]);
//!
//! let router = create_router(portal, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::auth::{session_middleware, CookiePolicy, SessionAuth};
use super::handlers::{
    applications_handler, create_application_handler, create_job_handler,
    delete_application_handler, health_handler, issue_session_handler, job_handler, jobs_handler,
    logout_handler, root_handler, AppState,
};
use crate::config::{DeployMode, DEFAULT_CORS_ORIGIN};
use crate::portal::PortalService;
use crate::store::DocumentStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Secret key for signing session tokens
    pub session_secret: String,

    /// Deployment mode; selects the session cookie policy
    pub mode: DeployMode,

    /// Origins allowed to make credentialed cross-origin requests
    pub cors_origins: Vec<String>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration with the given session secret.
    ///
    /// By default:
    /// - Development cookie policy (`SameSite=Strict`, not `Secure`)
    /// - CORS allows `http://localhost:5173`
    /// - Tracing is enabled
    pub fn new(session_secret: impl Into<String>) -> Self {
        Self {
            session_secret: session_secret.into(),
            mode: DeployMode::Development,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            enable_tracing: true,
        }
    }

    pub fn with_mode(mut self, mode: DeployMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Builds the complete Axum router with:
/// - Public routes (health, session, jobs, application create/delete)
/// - The session-protected applications listing
/// - CORS configuration with credentials
/// - Request tracing (optional)
pub fn create_router<S>(portal: PortalService<S>, config: RouterConfig) -> Router
where
    S: DocumentStore + 'static,
{
    let session = SessionAuth::new(&config.session_secret);
    let app_state =
        AppState::new(portal, session.clone()).with_cookie_policy(CookiePolicy::from(config.mode));

    let cors = build_cors_layer(&config);

    // The session layer wraps only the GET endpoint; the POST added after it
    // stays public.
    let applications = get(applications_handler::<S>)
        .route_layer(middleware::from_fn_with_state(session, session_middleware))
        .post(create_application_handler::<S>);

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler::<S>))
        .route("/jwt", post(issue_session_handler::<S>))
        .route("/logout", post(logout_handler::<S>))
        .route(
            "/jobs",
            get(jobs_handler::<S>).post(create_job_handler::<S>),
        )
        .route("/jobs/{id}", get(job_handler::<S>))
        .route("/jobApplications", applications)
        .route(
            "/jobApplications/{id}",
            delete(delete_application_handler::<S>),
        )
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
///
/// Credentials are always allowed so browsers send the session cookie, which
/// rules out wildcard origins.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)) // 24 hours
}

// =============================================================================
// Tests
// =============================================================================
