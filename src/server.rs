//! Reusable booking engine runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the engine lifecycle:
//! metrics, database init, migrations, services, the expiration sweeper,
//! and graceful shutdown. Both binaries start the engine through it.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{
    start_expiration_task, CheckoutService, ExpirationSweeper, ReservationService,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{
    init_database, run_migrations, DatabaseConfig, InMemoryRepositoryProvider,
    SeaOrmRepositoryProvider,
};
use crate::support::errors::{AppError, InfraError};
use crate::support::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::support::time::{Clock, SystemClock};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the booking engine.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Spawn the periodic expiration sweeper (default: true).
    pub start_sweeper: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            start_sweeper: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking engine.
///
/// ```rust,no_run
/// use jetski_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait_for_shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// Reservation lifecycle operations.
    pub reservations: Arc<ReservationService>,
    /// Checkout pricing.
    pub checkout: Arc<CheckoutService>,
    /// Expiration sweeper, also usable for one-off passes.
    pub sweeper: Arc<ExpirationSweeper>,
    /// The configuration the engine was started with.
    pub config: AppConfig,

    clock: Arc<dyn Clock>,
    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    sweeper_task: Option<tokio::task::JoinHandle<()>>,
}

impl ServerHandle {
    /// Start the engine.
    ///
    /// This will:
    /// 1. Install the Prometheus exporter (when a metrics port is configured)
    /// 2. Connect to the database and run migrations
    /// 3. Build the repository provider and services
    /// 4. Spawn the expiration sweeper
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;

        info!("Starting jetski booking engine...");

        // ── Prometheus exporter ────────────────────────────────
        if let Some(port) = app_cfg.metrics.port {
            install_metrics_exporter(port)?;
        }

        // ── Repositories ───────────────────────────────────────
        let (repos, db) = if app_cfg.database.in_memory {
            warn!("Using in-memory storage; data is lost on shutdown");
            let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
            (repos, None)
        } else {
            let db_config = DatabaseConfig {
                url: app_cfg.database.url.clone(),
            };
            info!("Database: {}", db_config.url);
            let db = init_database(&db_config).await.map_err(InfraError::from)?;
            if opts.auto_migrate {
                run_migrations(&db).await.map_err(InfraError::from)?;
            }
            let repos: Arc<dyn RepositoryProvider> =
                Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
            (repos, Some(db))
        };

        // ── Services ───────────────────────────────────────────
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let reservations = Arc::new(ReservationService::new(
            repos.clone(),
            clock.clone(),
            app_cfg.booking_settings(),
        ));
        let checkout = Arc::new(CheckoutService::new(repos.clone()));
        let sweeper = Arc::new(ExpirationSweeper::new(repos.clone(), reservations.clone()));

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);

        // ── Background tasks ───────────────────────────────────
        let sweeper_task = opts.start_sweeper.then(|| {
            start_expiration_task(
                sweeper.clone(),
                clock.clone(),
                shutdown.signal(),
                app_cfg.booking.sweep_interval_secs,
            )
        });

        info!(
            enforce_overbooking_cap_on_create = app_cfg.booking.enforce_overbooking_cap_on_create,
            sweep_interval_secs = app_cfg.booking.sweep_interval_secs,
            "Booking engine started"
        );

        Ok(Self {
            repos,
            reservations,
            checkout,
            sweeper,
            config: app_cfg,
            clock,
            db,
            shutdown,
            sweeper_task,
        })
    }

    /// Run a single expiration pass at the current time.
    pub async fn sweep_once(&self) -> Result<usize, AppError> {
        Ok(self.sweeper.process_expirations(self.clock.now()).await?)
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Block until shutdown is triggered, then stop.
    pub async fn wait_for_shutdown(self) {
        self.shutdown.signal().wait().await;
        self.stop().await;
    }

    /// Wait for background tasks and close the database.
    async fn stop(self) {
        let Self {
            sweeper_task,
            db,
            shutdown,
            ..
        } = self;

        let completed = shutdown
            .shutdown_with_cleanup(|| async move {
                if let Some(task) = sweeper_task {
                    match task.await {
                        Ok(()) => info!("Expiration sweeper joined"),
                        Err(e) => error!("Expiration sweeper task panicked: {}", e),
                    }
                }
                if let Some(db) = db {
                    if let Err(e) = db.close().await {
                        warn!("Error closing database connection: {}", e);
                    } else {
                        info!("Database connection closed");
                    }
                }
            })
            .await;

        if !completed {
            warn!("Shutdown did not finish within the configured timeout");
        }
        info!("Jetski booking engine shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down booking engine...");
        self.trigger_shutdown();
        self.stop().await;
    }

    /// Check if the sweeper is still running.
    pub fn is_running(&self) -> bool {
        self.sweeper_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Install the global Prometheus recorder with an HTTP scrape listener.
fn install_metrics_exporter(port: u16) -> Result<(), InfraError> {
    use std::sync::OnceLock;

    // The global recorder can only be installed once per process.
    static INSTALLED: OnceLock<()> = OnceLock::new();
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|e| InfraError::Metrics(e.to_string()))?;
    let _ = INSTALLED.set(());
    info!(port, "Prometheus exporter listening");
    Ok(())
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
