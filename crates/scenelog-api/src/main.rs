//! scenelog server binary.
//!
//! Runs the HTTP query surface and, unless disabled, the periodic
//! capture→describe→persist scheduler in the same process. The two paths
//! share only the persistence backend.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scenelog_api::{create_router, AppConfig, AppState, IngestJob, Scheduler};
use scenelog_capture::Camera;
use scenelog_describer::{default_prompt, GeminiClient};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("scenelog=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting scenelog-api");

    // Load configuration
    let config = AppConfig::from_env();
    info!(
        "config: host={}, port={}, device={}, collection={}, tick={:?}",
        config.host, config.port, config.device, config.collection, config.tick_interval
    );

    // Create application state
    let state = match AppState::new(config.clone()).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create application state: {}", e);
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Ingest pipeline: camera and describer are constructed here, owned by
    // the scheduler task for the process lifetime.
    let scheduler_handle = if config.ingest_enabled {
        if config.gemini_api_key.is_empty() {
            error!("GEMINI_API_KEY not configured; cannot start ingest");
            std::process::exit(1);
        }

        let camera = match Camera::open(&config.device) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to open capture device {}: {}", config.device, e);
                std::process::exit(1);
            }
        };

        let describer = GeminiClient::new(config.gemini_api_key.clone(), config.model.clone());
        let job = IngestJob::new(
            camera,
            describer,
            Arc::clone(&state.store),
            default_prompt(),
        );
        let scheduler = Scheduler::new(job, config.tick_interval, shutdown_rx.clone());
        Some(tokio::spawn(scheduler.run()))
    } else {
        warn!("Ingest disabled; serving queries only");
        None
    };

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid bind address");

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // Stop the timer; an in-flight tick finishes before the task exits.
    shutdown_tx.send(true).ok();
    if let Some(handle) = scheduler_handle {
        handle.await.ok();
    }

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Received shutdown signal");
}
