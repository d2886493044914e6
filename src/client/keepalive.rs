// ABOUTME: UCP keep-alive task sending periodic alert operations to hold the SMSC session open
// ABOUTME: Tracks ping statistics so long-running applications can watch connection health

use super::default::Shared;
use crate::datatypes::{Alert, Operation};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Snapshot of the keep-alive task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveStatus {
    /// Whether the task is still sending pings
    pub running: bool,

    /// Number of consecutive pings that could not be written
    pub consecutive_failures: u32,

    /// Total pings written
    pub total_pings: u32,
}

/// Counters updated by the keep-alive task
#[derive(Debug, Default)]
pub(crate) struct KeepAliveStats {
    running: AtomicBool,
    consecutive_failures: AtomicU32,
    total_pings: AtomicU32,
}

impl KeepAliveStats {
    fn on_ping_sent(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
        let total = self.total_pings.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Alert sent (total: {})", total);
    }

    fn on_ping_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        warn!("Alert failed (consecutive failures: {})", failures);
    }

    pub(crate) fn status(&self) -> KeepAliveStatus {
        KeepAliveStatus {
            running: self.running.load(Ordering::Relaxed),
            consecutive_failures: self.consecutive_failures.load(Ordering::Relaxed),
            total_pings: self.total_pings.load(Ordering::Relaxed),
        }
    }
}

/// Send an alert every `period` until `token` is cancelled.
///
/// The first ping goes out one full period after the task starts.
pub(crate) async fn run(shared: Arc<Shared>, period: Duration, token: CancellationToken) {
    let stats = &shared.keep_alive;
    stats.running.store(true, Ordering::Relaxed);

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ping = Operation::Alert(Alert::ping(&shared.user));

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let reference = shared.references.next().to_string();
                match shared.write_operation(&reference, &ping).await {
                    Ok(()) => stats.on_ping_sent(),
                    Err(e) => {
                        debug!("error writing alert: {}", e);
                        stats.on_ping_failure();
                    }
                }
            }
        }
    }

    stats.running.store(false, Ordering::Relaxed);
    debug!("keep-alive terminated");
}
