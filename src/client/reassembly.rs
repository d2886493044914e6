// ABOUTME: Reassembly of multi-part mobile originated messages keyed by sender, receiver and reference
// ABOUTME: Incomplete messages expire after a configurable lifetime instead of being held forever

use super::types::{DeliverMsgPart, ReassemblyKey};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Counters kept by a [`Reassembler`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReassemblyStats {
    /// Messages completed and handed on
    pub completed: u64,
    /// Incomplete messages dropped after their lifetime ran out
    pub evicted: u64,
}

#[derive(Debug)]
struct Pending {
    first_seen: Instant,
    // Ordered by part number; a repeated part replaces the earlier copy.
    parts: BTreeMap<u8, DeliverMsgPart>,
}

/// Collects fragments until every part of a message has arrived
#[derive(Debug)]
pub struct Reassembler {
    pending: HashMap<ReassemblyKey, Pending>,
    ttl: Option<Duration>,
    stats: ReassemblyStats,
}

impl Reassembler {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            pending: HashMap::new(),
            ttl,
            stats: ReassemblyStats::default(),
        }
    }

    /// Add a fragment received at `now`.
    ///
    /// Returns the merged message once all parts are present. The merged
    /// message carries the metadata of the fragment that completed it and
    /// the payloads of all parts in ascending part order.
    pub fn push(&mut self, part: DeliverMsgPart, now: Instant) -> Option<DeliverMsgPart> {
        self.evict_expired(now);

        let key = part.key();
        let total = usize::from(part.total_parts);
        let pending = self.pending.entry(key.clone()).or_insert_with(|| Pending {
            first_seen: now,
            parts: BTreeMap::new(),
        });
        let completing = part.clone();
        pending.parts.insert(part.current_part, part);

        if pending.parts.len() < total {
            debug!(
                "holding fragments of {:?} ({}/{} received)",
                key,
                pending.parts.len(),
                total
            );
            return None;
        }

        let Pending { parts, .. } = self.pending.remove(&key)?;
        let message = parts.into_values().map(|part| part.message).collect();

        self.stats.completed += 1;
        Some(DeliverMsgPart {
            message,
            ..completing
        })
    }

    /// Drop every incomplete message older than the configured lifetime
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };

        let before = self.pending.len();
        self.pending.retain(|key, pending| {
            let expired = now.saturating_duration_since(pending.first_seen) >= ttl;
            if expired {
                warn!(
                    sender = %key.sender,
                    receiver = %key.receiver,
                    concat_ref = key.concat_ref,
                    fragments = pending.parts.len(),
                    "stale reassembly dropped"
                );
            }
            !expired
        });

        let evicted = before - self.pending.len();
        self.stats.evicted += evicted as u64;
        evicted
    }

    /// Number of incomplete messages currently held
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> ReassemblyStats {
        self.stats
    }
}

/// Feed fragments from `parts` through a [`Reassembler`] and forward
/// completed messages to `complete` until `token` is cancelled.
pub(crate) async fn run(
    mut parts: mpsc::Receiver<DeliverMsgPart>,
    complete: mpsc::Sender<DeliverMsgPart>,
    ttl: Option<Duration>,
    sweep_interval: Duration,
    token: CancellationToken,
) {
    let mut reassembler = Reassembler::new(ttl);
    let mut sweep = interval_at(Instant::now() + sweep_interval, sweep_interval);
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            part = parts.recv() => {
                let Some(part) = part else { break };
                let Some(message) = reassembler.push(part, Instant::now()) else {
                    continue;
                };
                tokio::select! {
                    _ = token.cancelled() => break,
                    sent = complete.send(message) => if sent.is_err() { break },
                }
            }
            _ = sweep.tick(), if ttl.is_some() => {
                reassembler.evict_expired(Instant::now());
            }
        }
    }

    let stats = reassembler.stats();
    debug!(
        "reassembly terminated (completed: {}, evicted: {}, pending: {})",
        stats.completed,
        stats.evicted,
        reassembler.pending()
    );
}
