//! JurisMatch Server
//!
//! Web front end for auditing Brazilian residential lease contracts
//! (Lei 8.245/91). A user uploads a PDF or pastes the contract text, supplies
//! their own OpenAI API key, and gets back:
//!
//! - a summary of the contract (rent, adjustment index, guarantees, tenant)
//! - the model's findings grouped by severity
//! - the auditor's final opinion
//!
//! ## Architecture
//!
//! The analysis itself is delegated to a structured-output LLM call in
//! `audit-engine`; this binary only serves the page, collects the inputs and
//! renders the result. Each form submission is one audit run with its own
//! session state; nothing is stored between requests and the API key is
//! never persisted.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audit_engine::openai::DEFAULT_API_BASE;
use audit_engine::prompt::DEFAULT_MODEL;
use audit_engine::{AuditRequestor, OpenAiRequestor};

mod api;
mod error;
mod page;

use api::{handle_audit_form, handle_audit_json, handle_health, handle_index};

/// Command-line arguments for the JurisMatch server
#[derive(Parser, Debug)]
#[command(name = "jurismatch-server")]
#[command(about = "JurisMatch lease audit server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Chat model used for the audit (must support strict structured output)
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Timeout for the audit request in seconds (client default if unset)
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Maximum upload size in megabytes
    #[arg(long, default_value = "20")]
    max_upload_mb: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub requestor: Arc<dyn AuditRequestor>,
}

/// Build the router with all routes and middleware
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/", get(handle_index))
        .route("/audit", post(handle_audit_form))
        .route("/api/audit", post(handle_audit_json))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JurisMatch server on {}:{}", args.host, args.port);

    let requestor = OpenAiRequestor::new(
        args.api_base.clone(),
        args.model.clone(),
        args.request_timeout_secs.map(Duration::from_secs),
    )?;
    info!("Model: {} via {}", requestor.model(), args.api_base);

    let state = AppState {
        requestor: Arc::new(requestor),
    };

    let app = build_router(state, args.max_upload_mb * 1024 * 1024);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    match args.request_timeout_secs {
        Some(secs) => info!("Audit request timeout: {}s", secs),
        None => info!("Audit request timeout: client default"),
    }

    axum::serve(listener, app).await?;

    Ok(())
}
