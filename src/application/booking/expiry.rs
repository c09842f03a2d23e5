//! Expiration sweeper
//!
//! Periodically expires unpaid reservations whose grace period has elapsed.
//! Each candidate goes through the lifecycle service, so the usual lock and
//! re-check apply and a reservation paid in the meantime is skipped.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use super::service::ReservationService;
use crate::domain::{DomainResult, RepositoryProvider};
use crate::support::metrics;
use crate::support::shutdown::ShutdownSignal;
use crate::support::time::Clock;

pub struct ExpirationSweeper {
    repos: Arc<dyn RepositoryProvider>,
    reservations: Arc<ReservationService>,
}

impl ExpirationSweeper {
    pub fn new(repos: Arc<dyn RepositoryProvider>, reservations: Arc<ReservationService>) -> Self {
        Self {
            repos,
            reservations,
        }
    }

    /// Expire every candidate overdue at `now`. Returns how many were expired.
    pub async fn process_expirations(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let started = Instant::now();
        let candidates = self.repos.reservations().find_expirable(now).await?;
        if candidates.is_empty() {
            metrics::sweep_finished(started.elapsed());
            return Ok(0);
        }

        info!(count = candidates.len(), "Expiring overdue reservations");

        let mut expired = 0;
        for candidate in candidates {
            match self
                .reservations
                .expire_at(candidate.tenant_id, candidate.id, now)
                .await
            {
                Ok(_) => expired += 1,
                Err(e) => warn!(
                    reservation_id = %candidate.id,
                    tenant_id = %candidate.tenant_id,
                    error = %e,
                    "Failed to expire reservation"
                ),
            }
        }

        metrics::sweep_finished(started.elapsed());
        info!(expired, "Expiration pass finished");
        Ok(expired)
    }
}

/// Spawn the sweeper loop. It runs every `interval_secs` until `shutdown` fires.
pub fn start_expiration_task(
    sweeper: Arc<ExpirationSweeper>,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownSignal,
    interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs, "Expiration sweeper started");

        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = sweeper.process_expirations(clock.now()).await {
                        warn!(error = %e, "Expiration pass failed");
                    }
                }
                _ = shutdown.wait() => {
                    info!("Expiration sweeper shutting down");
                    break;
                }
            }
        }

        info!("Expiration sweeper stopped");
    })
}
