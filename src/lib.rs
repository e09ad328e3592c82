//! # Job Portal
//!
//! A minimal HTTP backend for a job portal: posting and browsing jobs,
//! submitting job applications, and listing one's own applications behind a
//! cookie-held session token.
//!
//! ## Features
//!
//! - **Schemaless storage**: Jobs and applications are stored as client-supplied
//!   JSON documents in MongoDB
//! - **Read-time enrichment**: Listed applications carry the title, company,
//!   location and logo of the job they reference
//! - **Cookie sessions**: HS256 tokens issued into an `HttpOnly` cookie, with a
//!   cookie policy chosen by deployment mode
//! - **Credentialed CORS**: Explicit origin list for a browser frontend
//!
//! ## Architecture
//!
//! - [`store`] - Document store trait and MongoDB implementation
//! - [`portal`] - Job and application operations, enrichment
//! - [`server`] - Axum-based HTTP server, session auth and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use job_portal::{create_router, MongoStore, PortalService, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MongoStore::connect("mongodb://localhost:27017", "jobPortal")
//!         .await
//!         .unwrap();
//!     let portal = PortalService::new(store);
//!     let router = create_router(portal, RouterConfig::new("my-secret-key"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod portal;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{
    CheckConfig, Cli, Command, DatabaseArgs, DeployMode, ServeConfig, TokenConfig,
    TokenOutputFormat,
};
pub use error::{PortalError, StoreError};
pub use portal::{PortalService, APPLICANT_EMAIL_FIELD, ENRICHED_FIELDS};
pub use server::{
    create_router, session_middleware, AppState, AuthError, CookiePolicy, ErrorResponse,
    HealthResponse, RouterConfig, SessionAuth, SessionClaims, SuccessResponse, SESSION_COOKIE,
};
pub use store::{
    Collection, DeleteAck, DocumentStore, InsertAck, MongoStore, DEFAULT_DATABASE,
};
