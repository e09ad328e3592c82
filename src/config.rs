//! Configuration management for the job portal.
//!
//! This module provides the command-line interface and configuration types:
//! - Command-line arguments via clap
//! - Environment variables (optionally loaded from a `.env` file by the binary)
//! - Defaults for everything except secrets and database credentials
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 5000)
//! - `MONGODB_URI` - Full MongoDB connection string
//! - `DB_USER`, `DB_PASS`, `DB_HOST` - Credentials and cluster host, used
//!   when `MONGODB_URI` is not set
//! - `DB_NAME` - Database name (default: jobPortal)
//! - `JWT_ACCESS_SECRET` - HMAC secret for session tokens (required)
//! - `APP_ENV` - `development` or `production` (default: development)
//! - `CORS_ORIGINS` - Comma-separated allowed origins (default: http://localhost:5173)

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};

use crate::store::DEFAULT_DATABASE;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default allowed CORS origin (local frontend dev server).
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Query options appended to connection strings built from credentials.
const CLUSTER_URI_OPTIONS: &str = "retryWrites=true&w=majority";

// =============================================================================
// CLI Structure
// =============================================================================

/// Job Portal - backend for jobs and job applications.
///
/// Runs the HTTP API when invoked without a subcommand.
#[derive(Parser, Debug)]
#[command(name = "job-portal")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeConfig,
}

impl Cli {
    /// Resolve the command to run, defaulting to `serve`.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve(self.serve))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve(ServeConfig),

    /// Issue a session token without running the server
    Token(TokenConfig),

    /// Check database connectivity
    Check(CheckConfig),
}

/// Deployment mode; controls the session cookie policy.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployMode {
    /// `SameSite=Strict`, cookie sent over plain HTTP
    #[default]
    Development,

    /// `SameSite=None; Secure`, for a frontend on another origin over HTTPS
    Production,
}

// =============================================================================
// Database Arguments
// =============================================================================

/// Database connection settings shared by `serve` and `check`.
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Full MongoDB connection string. Takes precedence over the credential flags.
    #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    /// Database user.
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password.
    #[arg(long, env = "DB_PASS", hide_env_values = true)]
    pub db_pass: Option<String>,

    /// Cluster host for `mongodb+srv://` connections (e.g. cluster0.abcde.mongodb.net).
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    /// Database name.
    #[arg(long, default_value = DEFAULT_DATABASE, env = "DB_NAME")]
    pub db_name: String,
}

impl DatabaseArgs {
    /// Resolve the connection string.
    ///
    /// Uses `mongodb_uri` when set, otherwise builds an SRV URI from the
    /// user, password and host, percent-encoding the credentials.
    pub fn connection_uri(&self) -> Result<String, String> {
        if let Some(uri) = self.mongodb_uri.as_deref().filter(|u| !u.is_empty()) {
            return Ok(uri.to_string());
        }

        match (&self.db_user, &self.db_pass, &self.db_host) {
            (Some(user), Some(pass), Some(host)) if !host.is_empty() => Ok(format!(
                "mongodb+srv://{}:{}@{}/?{}",
                urlencoding::encode(user),
                urlencoding::encode(pass),
                host,
                CLUSTER_URI_OPTIONS
            )),
            _ => Err("Database connection is not configured. \
                 Set --mongodb-uri or MONGODB_URI, or all of DB_USER, DB_PASS and DB_HOST"
                .to_string()),
        }
    }

    /// Where the server connects, without credentials. For log output.
    pub fn target(&self) -> String {
        let uri = self.mongodb_uri.as_deref().filter(|u| !u.is_empty());
        match (uri, &self.db_host) {
            (Some(_), _) => format!("<MONGODB_URI>/{}", self.db_name),
            (None, Some(host)) => format!("{}/{}", host, self.db_name),
            (None, None) => format!("<unconfigured>/{}", self.db_name),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.db_name.is_empty() {
            return Err("Database name must not be empty. Set --db-name or DB_NAME".to_string());
        }
        self.connection_uri().map(|_| ())
    }
}

// =============================================================================
// Serve Command
// =============================================================================

/// Configuration for the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Secret key for signing session tokens (HS256).
    #[arg(long, env = "JWT_ACCESS_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Deployment mode; production issues `Secure; SameSite=None` cookies.
    #[arg(long, value_enum, default_value = "development", env = "APP_ENV")]
    pub mode: DeployMode,

    /// Allowed CORS origins (comma-separated).
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_value = DEFAULT_CORS_ORIGIN
    )]
    pub cors_origins: Vec<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.as_deref().map_or(true, str::is_empty) {
            return Err(
                "No session secret provided. Set --jwt-secret or JWT_ACCESS_SECRET".to_string(),
            );
        }

        self.database.validate()
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the session secret, or "" if not set (call validate() first).
    pub fn jwt_secret_or_empty(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Token Command
// =============================================================================

/// Output format for the `token` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenOutputFormat {
    /// The bare token
    #[default]
    Token,

    /// JSON with token, expiry and claims
    Json,

    /// A `Cookie:` header value usable with curl -H
    Cookie,
}

/// Configuration for the `token` command.
#[derive(Args, Debug, Clone)]
pub struct TokenConfig {
    /// Secret key for signing session tokens.
    #[arg(long, env = "JWT_ACCESS_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Claims as a JSON object.
    #[arg(long, default_value = "{}")]
    pub claims: String,

    /// Email claim; overrides any `email` in --claims.
    #[arg(long)]
    pub email: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "token")]
    pub format: TokenOutputFormat,
}

impl TokenConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.is_empty() {
            return Err("Session secret must not be empty".to_string());
        }
        Ok(())
    }

    /// Parse `--claims` and merge `--email` into it.
    pub fn parse_claims(&self) -> Result<Map<String, Value>, String> {
        let value: Value = serde_json::from_str(&self.claims)
            .map_err(|e| format!("Invalid --claims JSON: {}", e))?;

        let Value::Object(mut claims) = value else {
            return Err("--claims must be a JSON object".to_string());
        };

        if let Some(ref email) = self.email {
            claims.insert("email".to_string(), Value::String(email.clone()));
        }

        Ok(claims)
    }
}

// =============================================================================
// Check Command
// =============================================================================

/// Configuration for the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Print document counts for both collections.
    #[arg(long, default_value_t = false)]
    pub counts: bool,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
