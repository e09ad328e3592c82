//! Job Portal - HTTP backend for jobs and job applications.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use job_portal::{
    config::{CheckConfig, Cli, Command, DeployMode, ServeConfig, TokenConfig, TokenOutputFormat},
    create_router,
    server::{auth::SessionAuth, RouterConfig, SESSION_COOKIE},
    store::{Collection, DocumentStore, MongoStore},
    PortalService,
};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Token(config) => run_token(config),
        Command::Check(config) => run_check(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let uri = match config.database.connection_uri() {
        Ok(uri) => uri,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Job Portal v{}", env!("CARGO_PKG_VERSION"));
    info!("");
    info!("Configuration:");
    info!("  Database: {}", config.database.target());
    match config.mode {
        DeployMode::Development => info!("  Mode: development (SameSite=Strict cookies)"),
        DeployMode::Production => info!("  Mode: production (Secure; SameSite=None cookies)"),
    }
    info!("  CORS origins: {}", config.cors_origins.join(", "));

    let store = match MongoStore::connect(&uri, &config.database.db_name).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to create database client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // The driver connects lazily; a failed ping is not fatal since the
    // cluster may come up after the server.
    info!("");
    info!("Connecting to MongoDB...");
    match store.ping().await {
        Ok(()) => info!("  Connected successfully"),
        Err(e) => {
            warn!("  Ping failed: {}", e);
            warn!("  Requests will fail until the database is reachable");
        }
    }

    let portal = PortalService::new(store.clone());
    let router = create_router(portal, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/jobs", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.shutdown().await;

    if let Err(e) = result {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "job_portal=debug,tower_http=debug"
    } else {
        "job_portal=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    RouterConfig::new(config.jwt_secret_or_empty())
        .with_mode(config.mode)
        .with_cors_origins(config.cors_origins.clone())
        .with_tracing(!config.no_tracing)
}

/// Resolve when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// =============================================================================
// Token Command
// =============================================================================

fn run_token(config: TokenConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let claims = match config.parse_claims() {
        Ok(claims) => claims,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let auth = SessionAuth::new(&config.jwt_secret);
    let (token, expiry) = match auth.issue(claims.clone()) {
        Ok(issued) => issued,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        TokenOutputFormat::Token => {
            println!("{}", token);
        }
        TokenOutputFormat::Json => {
            let json = serde_json::json!({
                "token": token,
                "expiresAt": expiry,
                "ttl": auth.ttl().as_secs(),
                "claims": claims,
            });
            match serde_json::to_string_pretty(&json) {
                Ok(output) => println!("{}", output),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        TokenOutputFormat::Cookie => {
            println!("Cookie: {}={}", SESSION_COOKIE, token);
        }
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("Job Portal Configuration Check");
    println!("═══════════════════════════════");
    println!();

    let uri = match config.database.connection_uri() {
        Ok(uri) => {
            println!("✓ Database: {}", config.database.target());
            uri
        }
        Err(e) => {
            println!("✗ Database: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!();

    print!("Testing MongoDB connection... ");

    let store = match MongoStore::connect(&uri, &config.database.db_name).await {
        Ok(store) => store,
        Err(e) => {
            println!("✗ failed");
            println!();
            println!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = store.ping().await {
        println!("✗ failed");
        println!();
        println!("Error: {}", e);
        println!();
        println!("Please check:");
        println!("  - The connection string or DB_HOST is correct");
        println!("  - The credentials are valid");
        println!("  - This machine's address is allowed by the cluster");
        store.shutdown().await;
        return ExitCode::FAILURE;
    }
    println!("✓ success");

    if config.counts {
        println!();
        println!("Collections in '{}':", store.database_name());
        println!("─────────────────────");

        for collection in Collection::all() {
            match store.count(collection).await {
                Ok(count) => println!("  {}: {} document(s)", collection, count),
                Err(e) => println!("  {}: error: {}", collection, e),
            }
        }
    }

    store.shutdown().await;

    println!();
    println!("═══════════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}
