//! Jetski booking engine - CLI runner
//!
//! Headless engine suitable for a systemd service or container.
//!
//! ```sh
//! # Run with default config (~/.config/jetski-booking/config.toml)
//! jetski-booking-cli
//!
//! # Custom config path, faster sweeps
//! jetski-booking-cli --config /etc/jetski-booking/config.toml --sweep-interval 30
//!
//! # Validate config without starting
//! jetski-booking-cli --check
//!
//! # Expire overdue reservations once and exit (e.g. from cron)
//! jetski-booking-cli --sweep-once
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use jetski_booking::config::AppConfig;
use jetski_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Jetski booking engine: reservations, capacity and expiry.
#[derive(Parser, Debug)]
#[command(
    name = "jetski-booking-cli",
    version,
    about = "Reservation and capacity engine for jetski rentals",
    long_about = "Runs the jetski booking engine and its expiration sweeper.\n\n\
                  Default config: ~/.config/jetski-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "JETSKI_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the expiration sweep interval in seconds.
    #[arg(long)]
    sweep_interval: Option<u64>,

    /// Validate the configuration file and exit without starting.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Run a single expiration pass and exit.
    #[arg(long)]
    sweep_once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(jetski_booking::default_config_path);

    let loaded = AppConfig::load(&config_path);
    if cli.check {
        return match loaded {
            Ok(mut config) => {
                apply_overrides(&mut config, &cli.log_level, cli.sweep_interval);
                println!("Configuration is valid");
                println!("   Config file    : {}", config_path.display());
                println!("{}", config.to_toml_string()?);
                Ok(())
            }
            Err(e) => {
                eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
                Err(e.into())
            }
        };
    }

    let (mut config, load_error) = match loaded {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    config.apply_env_overrides();
    apply_overrides(&mut config, &cli.log_level, cli.sweep_interval);
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Start engine ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        start_sweeper: !cli.sweep_once,
    })
    .await?;

    if cli.sweep_once {
        let expired = handle.sweep_once().await?;
        info!(expired, "Single expiration pass complete");
        handle.shutdown().await;
        return Ok(());
    }

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.wait_for_shutdown().await;
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, log_level: &Option<String>, sweep_interval: Option<u64>) {
    if let Some(level) = log_level {
        config.logging.level = level.clone();
    }
    if let Some(secs) = sweep_interval {
        config.booking.sweep_interval_secs = secs.max(1);
    }
}
