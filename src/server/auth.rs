//! Cookie-based session authentication.
//!
//! Sessions are stateless: `POST /jwt` signs the client-supplied claims into
//! a JWT (HS256) and stores it in an HTTP-only cookie named `token`. Protected
//! routes run [`session_middleware`], which verifies the cookie and makes the
//! decoded [`SessionClaims`] available to handlers as a request extension.
//!
//! ```text
//! token = HS256(secret, { ...client claims, iat, exp = iat + 5h })
//! ```
//!
//! There is no server-side session store. Logging out only clears the
//! cookie; a copied token stays valid until it expires.
//!
//! # Example
//!
//! ```rust
//! use job_portal::server::auth::SessionAuth;
//! use serde_json::{json, Map, Value};
//!
//! let auth = SessionAuth::new("my-secret-key");
//!
//! let mut claims = Map::new();
//! claims.insert("email".to_string(), json!("a@x.com"));
//!
//! let (token, _expiry) = auth.issue(claims).unwrap();
//! let session = auth.verify(&token).unwrap();
//! assert_eq!(session.email.as_deref(), Some("a@x.com"));
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use super::handlers::ErrorResponse;
use crate::config::DeployMode;

// =============================================================================
// Constants
// =============================================================================

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Lifetime of an issued session token (5 hours).
pub const SESSION_TTL: Duration = Duration::from_secs(5 * 60 * 60);

// =============================================================================
// Errors
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No session cookie on the request
    MissingToken,

    /// Token signature is valid but `exp` has passed
    Expired,

    /// Token is malformed, tampered with, or signed with another key
    InvalidToken(String),

    /// Token could not be signed
    Signing(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Access denied: missing session cookie"),
            AuthError::Expired => write!(f, "Access denied: session expired"),
            AuthError::InvalidToken(_) => write!(f, "Access denied: invalid session token"),
            AuthError::Signing(reason) => write!(f, "Failed to sign session token: {}", reason),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "missing_token"),
            AuthError::Expired => (StatusCode::UNAUTHORIZED, "token_expired"),
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AuthError::Signing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "signing_error"),
        };
        let message = self.to_string();

        // A bad token may be an attack, so it gets warn. Missing and expired
        // cookies are routine.
        match &self {
            AuthError::InvalidToken(reason) => {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    reason = %reason,
                    "Authentication failed"
                );
            }
            AuthError::Signing(_) => {
                error!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Server error: {}",
                    message
                );
            }
            _ => {
                debug!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Authentication failed: {}",
                    message
                );
            }
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Claims
// =============================================================================

/// Decoded claims of a verified session token.
///
/// `email` is the identity used for ownership checks. Any other claims the
/// client supplied at issuance are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// `None` when the claim is absent or not a string
    #[serde(
        default,
        deserialize_with = "deserialize_email",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,

    /// Issued-at (Unix epoch seconds)
    #[serde(default)]
    pub iat: u64,

    /// Expiry (Unix epoch seconds)
    pub exp: u64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept any JSON value for `email`; only strings identify an owner.
fn deserialize_email<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(email) => Ok(Some(email)),
        _ => Ok(None),
    }
}

// =============================================================================
// Session Authenticator
// =============================================================================

/// Issues and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct SessionAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionAuth {
    /// Create an authenticator with the default 5 hour token lifetime.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: SESSION_TTL,
        }
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `claims` into a token expiring one TTL from now.
    ///
    /// Returns the token and its expiry timestamp. Client-supplied `iat` and
    /// `exp` claims are overwritten.
    pub fn issue(&self, claims: Map<String, Value>) -> Result<(String, u64), AuthError> {
        let expiry = unix_now() + self.ttl.as_secs();
        let token = self.issue_with_expiry(claims, expiry)?;
        Ok((token, expiry))
    }

    /// Sign `claims` into a token with a specific expiry timestamp.
    pub fn issue_with_expiry(
        &self,
        mut claims: Map<String, Value>,
        expiry: u64,
    ) -> Result<String, AuthError> {
        claims.insert("iat".to_string(), Value::from(unix_now()));
        claims.insert("exp".to_string(), Value::from(expiry));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a token's signature and expiry and decode its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// =============================================================================
// Cookie Policy
// =============================================================================

/// Attributes applied to the session cookie.
///
/// Browsers only send `SameSite=None` cookies cross-site when they are also
/// `Secure`, so production (separate frontend origin, HTTPS) uses that pair
/// while development stays on `Strict` over plain HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    pub fn development() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Strict,
        }
    }

    pub fn production() -> Self {
        Self {
            secure: true,
            same_site: SameSite::None,
        }
    }

    /// Build the cookie that carries a freshly issued token.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/")
            .build()
    }

    /// Build an already-expired cookie that clears the session on logout.
    ///
    /// Added to the jar rather than passed to `CookieJar::remove`, which only
    /// emits a removal when the request carried the cookie.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((SESSION_COOKIE, ""))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/")
            .build();
        cookie.make_removal();
        cookie
    }
}

impl From<DeployMode> for CookiePolicy {
    fn from(mode: DeployMode) -> Self {
        match mode {
            DeployMode::Development => CookiePolicy::development(),
            DeployMode::Production => CookiePolicy::production(),
        }
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::development()
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware requiring a valid session cookie.
///
/// Rejects with 401 when the cookie is missing, empty, expired, or fails
/// verification. On success the decoded [`SessionClaims`] are inserted into
/// the request extensions for `Extension<SessionClaims>` extraction.
///
/// # Example
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
/// use job_portal::server::auth::{session_middleware, SessionAuth};
///
/// let auth = SessionAuth::new("secret-key");
/// let app = Router::new()
///     .route("/jobApplications", get(applications_handler))
///     .layer(middleware::from_fn_with_state(auth, session_middleware));
/// ```
pub async fn session_middleware(
    State(auth): State<SessionAuth>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = auth.verify(token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
