//! Expiry sweeper
//!
//! Background task that runs `RoomService::sweep_expired` on a fixed period
//! until its handle is shut down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::room::RoomService;

/// Periodic eviction of users whose heartbeat went stale
pub struct ExpirySweeper {
    service: Arc<RoomService>,
    interval: Duration,
}

impl ExpirySweeper {
    /// Sweeper running at the service policy's sweep interval
    pub fn new(service: Arc<RoomService>) -> Self {
        let interval = service.policy().sweep_interval();
        Self { service, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the background task
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        SweeperHandle { shutdown, task }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Expiry sweeper started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.sweep_once().await,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Expiry sweeper stopped");
    }

    async fn sweep_once(&self) {
        match self.service.sweep_expired().await {
            Ok(report) if !report.is_clean() => {
                warn!(
                    users_evicted = report.users_evicted,
                    failed_rooms = ?report.failed_rooms,
                    "Sweep left rooms unswept"
                );
            }
            Ok(report) if report.users_evicted > 0 => {
                info!(
                    rooms_updated = report.rooms_updated,
                    users_evicted = report.users_evicted,
                    "Sweep evicted expired users"
                );
            }
            Ok(_) => debug!("Sweep found nothing to evict"),
            Err(e) => warn!(error = %e, "Sweep could not enumerate rooms"),
        }
    }
}

/// Handle to a running sweeper
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the task to stop and wait for it to finish.
    ///
    /// A sweep already in progress completes first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Expiry sweeper task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
