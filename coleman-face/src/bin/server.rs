//! # Coleman Server
//!
//! Runs the reference Coleman host with the face plugin installed.
//!
//! ## Usage
//!
//! ```bash
//! # Serve on the configured (or default 127.0.0.1:3000) address
//! cargo run --bin coleman-server
//!
//! # Override the bind address
//! COLEMAN_BIND_ADDRESS=0.0.0.0:8080 cargo run --bin coleman-server
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use coleman_face::config::load_server_config;
use coleman_face::{ColemanFace, FaceOptions, FACE_ID, WS_ROUTE};
use coleman_shared::{logging, ColemanApp, ColemanHost};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_error) = load_server_config();
    logging::init_tracing_with(config.log_filter.as_deref());
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load server config, using defaults");
    }

    info!("Starting Coleman...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "   Build Mode: {}",
        if cfg!(debug_assertions) {
            "Debug"
        } else {
            "Release"
        }
    );

    let app = Arc::new(ColemanApp::new());
    let host: Arc<dyn ColemanHost> = app.clone();

    let options = FaceOptions::default().with_assets(config.face.assets());
    let face = ColemanFace::with_options(Some(host), options)
        .map_err(|e| format!("Failed to construct {FACE_ID}: {e}"))?;
    app.install(face)
        .map_err(|e| format!("Failed to install {FACE_ID}: {e}"))?;

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("   Listening: http://{}", listener.local_addr()?);
    info!("   Page: http://{}{}", listener.local_addr()?, WS_ROUTE);
    info!("   Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, app.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Coleman shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
