//! HTTP server layer for the job portal.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        /jwt  /logout  /jobs[/{id}]  /jobApplications[/{id}]     │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │  (session)  │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{
    session_middleware, AuthError, CookiePolicy, SessionAuth, SessionClaims, SESSION_COOKIE,
    SESSION_TTL,
};
pub use handlers::{
    applications_handler, create_application_handler, create_job_handler,
    delete_application_handler, health_handler, issue_session_handler, job_handler, jobs_handler,
    logout_handler, root_handler, AppState, ApplicationsQueryParams, ErrorResponse,
    HealthResponse, SuccessResponse, ROOT_MESSAGE,
};
pub use routes::{create_router, RouterConfig};
