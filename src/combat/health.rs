//! Hit-count health with delayed, tick-driven regeneration.

use crate::config::HealthConfig;
use crate::events::EventSource;
use parking_lot::Mutex;
use tracing::{debug, info};

#[derive(Debug)]
struct Vitals {
    current: u32,
    dead: bool,
    /// Seconds left before regeneration starts.
    pending_delay: Option<f32>,
    /// Seconds left until the next regenerated hit.
    regeneration: Option<f32>,
}

/// Health counted in hits.
///
/// Taking damage below full health restarts a delay after which one hit is
/// regenerated per interval until full. Time only advances through
/// [`tick`](Self::tick). Events are emitted after the internal lock is
/// released, so listeners may query the component.
#[derive(Debug)]
pub struct Health {
    config: HealthConfig,
    vitals: Mutex<Vitals>,
    damaged: EventSource<()>,
    death: EventSource<()>,
    full_health: EventSource<()>,
}

impl Health {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            vitals: Mutex::new(Vitals {
                current: config.max_hits,
                dead: false,
                pending_delay: None,
                regeneration: None,
            }),
            config,
            damaged: EventSource::new(),
            death: EventSource::new(),
            full_health: EventSource::new(),
        }
    }

    /// Take one hit. Ignored once dead.
    pub fn damage(&self) {
        let died = {
            let mut vitals = self.vitals.lock();
            if vitals.dead {
                return;
            }

            vitals.current = vitals.current.saturating_sub(1);
            vitals.regeneration = None;
            if vitals.current == 0 {
                vitals.dead = true;
                vitals.pending_delay = None;
                true
            } else {
                if vitals.current < self.config.max_hits {
                    vitals.pending_delay = Some(self.config.wait_before_regeneration);
                }
                false
            }
        };

        debug!(hits = self.current_hits(), "damaged");
        self.damaged.notify();
        if died {
            info!("died");
            self.death.notify();
        }
    }

    /// Restore up to `amount` hits, clamped to the maximum. Ignored once dead.
    pub fn heal(&self, amount: u32) {
        let full = {
            let mut vitals = self.vitals.lock();
            if vitals.dead {
                return;
            }
            vitals.current = vitals.current.saturating_add(amount).min(self.config.max_hits);
            let full = vitals.current == self.config.max_hits;
            if full {
                vitals.regeneration = None;
            }
            full
        };

        if full {
            self.full_health.notify();
        }
    }

    /// Advance regeneration timers by `dt` seconds.
    pub fn tick(&self, dt: f32) {
        let became_full = {
            let mut vitals = self.vitals.lock();
            if vitals.dead {
                return;
            }

            let mut elapsed = dt;
            if let Some(remaining) = vitals.pending_delay {
                if remaining > elapsed {
                    vitals.pending_delay = Some(remaining - elapsed);
                    return;
                }
                vitals.pending_delay = None;
                elapsed -= remaining;
                if vitals.current < self.config.max_hits && vitals.regeneration.is_none() {
                    vitals.regeneration = Some(self.config.regeneration_interval);
                }
            }

            // Time left over after the delay counts toward regeneration.
            let regeneration = vitals.regeneration;
            match regeneration {
                Some(next) => {
                    let mut next = next - elapsed;
                    while next <= 0.0 && vitals.current < self.config.max_hits {
                        vitals.current += 1;
                        next += self.config.regeneration_interval;
                    }

                    if vitals.current >= self.config.max_hits {
                        vitals.regeneration = None;
                        true
                    } else {
                        vitals.regeneration = Some(next);
                        false
                    }
                }
                None => false,
            }
        };

        if became_full {
            debug!("regenerated to full health");
            self.full_health.notify();
        }
    }

    pub fn current_hits(&self) -> u32 {
        self.vitals.lock().current
    }

    pub fn max_hits(&self) -> u32 {
        self.config.max_hits
    }

    pub fn is_dead(&self) -> bool {
        self.vitals.lock().dead
    }

    pub fn is_regenerating(&self) -> bool {
        self.vitals.lock().regeneration.is_some()
    }

    pub fn can_be_hit(&self) -> bool {
        !self.is_dead()
    }

    pub fn damaged(&self) -> &EventSource<()> {
        &self.damaged
    }

    pub fn death(&self) -> &EventSource<()> {
        &self.death
    }

    pub fn full_health(&self) -> &EventSource<()> {
        &self.full_health
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(HealthConfig::default())
    }
}
