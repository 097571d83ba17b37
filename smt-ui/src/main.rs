//! smt-ui - Suspended Member Tracker web service
//!
//! Staff upload per-location CSV exports of suspended members; the service
//! reconciles each upload against the stored roster and serves the
//! annotated result back to the table UI.

use anyhow::Result;
use clap::Parser;
use smt_common::{config, db};
use smt_ui::{build_router, AppState};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "smt-ui", about = "Suspended-member tracker web service")]
struct Args {
    /// Data root folder (overrides SMT_ROOT and the config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Address to bind
    #[arg(long, env = "SMT_BIND", default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "SMT_PORT", default_value_t = 5730)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Suspended Member Tracker (smt-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder)?;

    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path).await?;
    info!("✓ Database ready");

    // Create application state and router
    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("smt-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
