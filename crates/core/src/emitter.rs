//! Fixed-capacity ring-buffer emitter with rewind-aware spawn cadence.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::particle::{Particle, RenderableParticle};
use crate::TimeMs;

/// Spawn cadence, lifetime, and gravity settings for one emitter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Spawn cadence; the enforced cooldown between spawns is
    /// `1000 / particles_per_second` ms.
    pub particles_per_second: u32,
    /// Lifetime of every spawned particle, in ms.
    pub max_lifetime_ms: TimeMs,
    /// Downward acceleration applied at snapshot time (units/s²).
    #[serde(default)]
    pub gravity: f32,
}

/// Errors surfaced by emitter construction.
#[derive(Debug, Error)]
pub enum EmitterError {
    /// The configuration cannot produce a valid ring buffer.
    #[error("invalid emitter config: {0}")]
    InvalidConfig(String),
}

/// Fixed-capacity timed-particle emitter.
///
/// The emitter owns its buffer exclusively. It is mutated by exactly one
/// simulation stream through [`Emitter::advance`]; render passes consume
/// value-copy [`Snapshot`]s instead of reading live slots. Slots are never
/// destroyed individually, only overwritten in ring order.
#[derive(Debug, Clone)]
pub struct Emitter {
    buffer: Box<[Particle]>,
    write_index: usize,
    /// Clock value of the most recent spawn; `None` before the first spawn
    /// and after a rewind reset.
    last_spawn: Option<TimeMs>,
    cooldown_ms: TimeMs,
    max_lifetime_ms: TimeMs,
    gravity: f32,
    active: bool,
}

impl Emitter {
    /// Build an emitter sized so every particle that can still be alive at
    /// the configured cadence and lifetime has its own slot.
    ///
    /// Spawning starts disabled; hosts opt in with [`Emitter::set_active`].
    pub fn new(config: EmitterConfig) -> Result<Self, EmitterError> {
        if config.particles_per_second == 0 {
            return Err(EmitterError::InvalidConfig(
                "particles_per_second must be positive".into(),
            ));
        }
        if !(config.max_lifetime_ms > 0.0) {
            return Err(EmitterError::InvalidConfig(format!(
                "max_lifetime_ms must be positive, got {}",
                config.max_lifetime_ms
            )));
        }

        let lifetime_seconds = (config.max_lifetime_ms / 1000.0).ceil() as usize;
        let capacity = config.particles_per_second as usize * lifetime_seconds;
        let cooldown_ms = 1000.0 / TimeMs::from(config.particles_per_second);
        debug!(capacity, cooldown_ms, "emitter created");

        Ok(Self {
            buffer: vec![Particle::default(); capacity].into_boxed_slice(),
            write_index: 0,
            last_spawn: None,
            cooldown_ms,
            max_lifetime_ms: config.max_lifetime_ms,
            gravity: config.gravity,
            active: false,
        })
    }

    /// Number of ring slots. Constant for the emitter's lifetime.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Minimum spacing between spawns, in ms.
    pub fn cooldown_ms(&self) -> TimeMs {
        self.cooldown_ms
    }

    /// Enable or disable spawning.
    ///
    /// Disabling never clears the buffer; in-flight particles decay
    /// naturally, and [`Emitter::is_active`] stays true until the last one
    /// has expired.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether spawning is currently enabled.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Advance the simulation clock to `now`, spawning at most one particle.
    ///
    /// `factory` runs only when a spawn is due; the emitter stamps the
    /// returned particle's `start_time` itself. Hosts call this once per
    /// frame; calling more often than the cooldown is harmless — cadence is
    /// enforced by time difference, not a counter.
    ///
    /// A backward clock jump (replay seek) resets cadence tracking so the
    /// fresh timeline spawns normally instead of being suppressed by a stale
    /// spawn timestamp from the abandoned one.
    ///
    /// Returns whether a particle was spawned.
    ///
    /// # Panics
    ///
    /// If the factory returns a particle with a non-positive duration. That
    /// is a contract violation in the calling effect, rejected here before
    /// the value can reach the interpolation math as a divisor.
    pub fn advance(
        &mut self,
        now: TimeMs,
        spawn_allowed: bool,
        factory: impl FnOnce() -> Particle,
    ) -> bool {
        if self.last_spawn.is_some_and(|last| now < last) {
            self.last_spawn = None;
        }

        let due = self
            .last_spawn
            .map_or(true, |last| now > last + self.cooldown_ms);
        if !(self.active && spawn_allowed && due) {
            return false;
        }

        let mut particle = factory();
        assert!(
            particle.duration > 0.0,
            "particle factories must produce a positive duration"
        );
        particle.start_time = now;
        self.buffer[self.write_index] = particle;
        self.write_index = (self.write_index + 1) % self.buffer.len();
        self.last_spawn = Some(now);
        true
    }

    /// Whether the emitter still needs per-frame updates: spawning is
    /// enabled, or an already-spawned particle may still be visible.
    ///
    /// Hosts keep updating/rendering while this holds so that turning the
    /// emitter off never truncates in-flight particles.
    pub fn is_active(&self, now: TimeMs) -> bool {
        self.active
            || self
                .last_spawn
                .is_some_and(|last| last + self.max_lifetime_ms > now)
    }

    /// Copy the particle state for consumption by an independent render pass.
    ///
    /// The copy is O(capacity) and has no ties back to the emitter: the
    /// simulation stream may keep advancing while the snapshot is iterated.
    pub fn snapshot(&self, now: TimeMs) -> Snapshot {
        Snapshot {
            time: now,
            gravity: self.gravity,
            particles: self.buffer.clone(),
        }
    }
}

/// Immutable copy of an emitter's particle slots at a point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    time: TimeMs,
    gravity: f32,
    particles: Box<[Particle]>,
}

impl Snapshot {
    /// Clock value recorded at capture.
    pub fn time(&self) -> TimeMs {
        self.time
    }

    /// Gravity recorded at capture.
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Raw slot access, in buffer order.
    pub fn slots(&self) -> &[Particle] {
        &self.particles
    }

    /// Resolve every live particle against the captured clock.
    ///
    /// The sequence is finite (bounded by capacity), restartable (recomputed
    /// fresh from the immutable copy on every call), and yielded in
    /// buffer-slot order rather than spawn order — additive-blended
    /// renderers do not depend on draw order.
    pub fn renderables(&self) -> impl Iterator<Item = RenderableParticle> + '_ {
        self.particles
            .iter()
            .filter_map(|p| p.renderable_at(self.time, self.gravity))
    }
}
