//! AdmitFlow API - Enrollment Intake Platform
//!
//! A tenant (school) opens a time-boxed public intake window ("Mission"),
//! collects prospective-student records from an unauthenticated form,
//! triages them, and transactionally promotes an approved batch into the
//! authoritative student roster.
//!
//! INTAKE PIPELINE:
//! - Stage 1 (Intake): anonymous submissions through signed public links
//! - Stage 2 (Triage): per-record approve/reject by tenant staff
//! - Stage 3 (Legalization): director signs off, freezing the batch
//! - Stage 4 (Injection): operator homologates and atomically commits the
//!   batch into the canonical roster

mod candidate;
mod config;
mod error;
mod injection;
mod intake;
mod legalization;
mod mission;
mod models;
mod notify;
mod roster;
mod routes;
mod state;
mod store;
mod triage;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting AdmitFlow - Enrollment Intake Platform...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    if settings.intake.link_secret == config::IntakeConfig::default().link_secret {
        warn!("⚠️  LINK_SECRET not set, using default (INSECURE - set in production!)");
    }

    let state = Arc::new(AppState::new(&settings));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Mission Registry ───");
    info!("   POST /api/missions               - Open an intake window");
    info!("   GET  /api/missions?tenantId=     - List a tenant's missions");
    info!("   GET  /api/missions/active        - Tenant's active mission");
    info!("   GET  /api/missions/:id           - Fetch a mission");
    info!("   GET  /api/missions/:id/records   - Staff triage listing");
    info!("   GET  /api/missions/:id/link      - Issue signed intake link");
    info!("");
    info!("   ─── Intake Pipeline ───");
    info!("   POST /api/public/intake/:token   - Public submission (anonymous)");
    info!("   POST /api/records/:id/state      - Triage decision");
    info!("   POST /api/missions/:id/legalize  - Director batch freeze");
    info!("   POST /api/missions/:id/inject    - Homologate + inject batch");
    info!("");
    info!("   ─── Observability ───");
    info!("   GET  /api/audit                  - Audit log");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,admitflow_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
