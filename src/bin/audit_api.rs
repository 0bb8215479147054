//! SmartAudit API Server
//!
//! REST API for contract probing, verified source retrieval, and
//! AI-assisted security audits.
//!
//! Usage:
//!   cargo run --bin audit_api
//!
//! Environment:
//!   AUDIT_PORT - Server port (default: 8080)
//!   AUDIT_HOST - Server host (default: 0.0.0.0)
//!   RUST_LOG   - Log level (default: info)

use smart_audit::api::{create_router, handlers::AppState};
use smart_audit::utils::constants::{APP_NAME, APP_VERSION};
use smart_audit::ChainRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let registry = Arc::new(ChainRegistry::from_env());
    info!("🔗 {} chain(s) configured", registry.chains().len());

    let state = Arc::new(AppState::new(registry));
    let app = create_router(state);

    // PORT takes priority for hosted deployments
    let host = std::env::var("AUDIT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("AUDIT_PORT"))
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("🚀 {} API v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("");
    info!("Endpoints:");
    info!("  GET  /api/probe?address=0x..             - Probe across all chains");
    info!("  GET  /api/source?chain=..&address=0x..   - Fetch verified source");
    info!("  POST /api/analyze                        - Run AI security audit");
    info!("  GET  /health                             - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("👋 SmartAudit API shutdown complete");

    Ok(())
}
