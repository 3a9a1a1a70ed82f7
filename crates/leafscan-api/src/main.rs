//! Axum API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use leafscan_api::{create_router, ApiConfig, AppState};
use leafscan_infer::ModelRegistry;
use leafscan_models::builtin_profiles;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("leafscan_api=info".parse().unwrap())
        .add_directive("leafscan_infer=info".parse().unwrap());

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

    info!("Starting leafscan-api");

    // Load configuration
    let config = ApiConfig::from_env();
    info!(
        "API config: host={}, port={}, model_dir={}",
        config.host,
        config.port,
        config.model_dir.display()
    );

    // Load every configured crop model before accepting requests. A missing
    // artifact skips that crop; it must not prevent startup.
    let registry = ModelRegistry::load(&config.model_dir, builtin_profiles());
    for profile in registry.available() {
        info!(
            crop = %profile.crop_key,
            classes = profile.num_classes(),
            input = profile.input_resolution,
            "crop model available"
        );
    }
    for skipped in registry.skipped() {
        warn!(
            crop = %skipped.crop_key,
            path = %skipped.attempted_path.display(),
            reason = %skipped.reason,
            "crop model skipped"
        );
    }
    if registry.is_empty() {
        warn!("no crop models loaded; every prediction will be rejected");
    }

    // Create application state and router
    let state = AppState::new(config.clone(), Arc::new(registry));
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

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Received shutdown signal");
}
