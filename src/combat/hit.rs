//! Hit reaction status and the receiver that routes incoming hits.

use super::health::Health;
use crate::events::EventSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Tracks whether the agent is playing a hit reaction.
#[derive(Debug, Default)]
pub struct HitReactStatus {
    hitting: AtomicBool,
    hit_start: EventSource<()>,
    hit_end: EventSource<()>,
}

impl HitReactStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a hit reaction: emits `hit_start`, then marks the agent as hitting.
    pub fn react_to_hit(&self) {
        self.hit_start.notify();
        self.hitting.store(true, Ordering::SeqCst);
    }

    /// End of the hit reaction animation. Emits `hit_end` once per reaction.
    pub fn finish_hit(&self) {
        if self.hitting.swap(false, Ordering::SeqCst) {
            self.hit_end.notify();
        }
    }

    pub fn is_hitting(&self) -> bool {
        self.hitting.load(Ordering::SeqCst)
    }

    pub fn hit_start(&self) -> &EventSource<()> {
        &self.hit_start
    }

    pub fn hit_end(&self) -> &EventSource<()> {
        &self.hit_end
    }
}

/// Entry point for hits landing on an agent.
///
/// Applies damage to health, then starts the hit reaction.
#[derive(Debug, Clone)]
pub struct HitReceiver {
    health: Arc<Health>,
    status: Arc<HitReactStatus>,
}

impl HitReceiver {
    pub fn new(health: Arc<Health>, status: Arc<HitReactStatus>) -> Self {
        Self { health, status }
    }

    pub fn can_be_hit(&self) -> bool {
        self.health.can_be_hit()
    }

    /// Process a hit. Returns `false` if the agent could not be hit.
    pub fn hit(&self) -> bool {
        if !self.can_be_hit() {
            warn!("hit ignored; target cannot be hit");
            return false;
        }
        self.health.damage();
        self.status.react_to_hit();
        true
    }

    pub fn health(&self) -> &Arc<Health> {
        &self.health
    }

    pub fn status(&self) -> &Arc<HitReactStatus> {
        &self.status
    }
}
