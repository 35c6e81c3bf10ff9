#![warn(missing_docs)]
//! Deterministic timed-particle emission core.
//!
//! An [`Emitter`] owns a fixed-capacity ring buffer of [`Particle`] slots and
//! is advanced by a host clock that may rewind (replay seeking). Renderers
//! never touch the live buffer: each render pass takes a value-copy
//! [`Snapshot`] and resolves per-particle transform/alpha/scale values from
//! that copy, so simulation and rendering never race on shared state.

pub mod effects;
mod emitter;
mod particle;
mod shared;

use rand::{rngs::StdRng, SeedableRng};

pub use emitter::{Emitter, EmitterConfig, EmitterError, Snapshot};
pub use particle::{Particle, RenderableParticle};
pub use shared::SharedEmitter;

/// Milliseconds on the host simulation clock.
pub type TimeMs = f64;

/// Helper to derive a reproducible RNG seeded by host + effect domains.
pub fn effect_rng(host_seed: u64, effect_salt: u64) -> StdRng {
    StdRng::seed_from_u64(host_seed ^ effect_salt)
}
