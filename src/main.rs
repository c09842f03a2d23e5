//! Jetski booking engine
//!
//! Runs the reservation engine with its expiration sweeper until SIGTERM or
//! SIGINT. Reads configuration from TOML
//! (`~/.config/jetski-booking/config.toml`, or `JETSKI_BOOKING_CONFIG`).

use tracing::{error, info};

use jetski_booking::config::{config_path_from_env, AppConfig};
use jetski_booking::server::{init_tracing, ServerHandle, ServerOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = config_path_from_env();
    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    config.apply_env_overrides();
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => error!(
            "Failed to load config from {}: {}. Using defaults.",
            config_path.display(),
            e
        ),
    }

    // ── Start engine ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        ..Default::default()
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.wait_for_shutdown().await;
    Ok(())
}
