//! Cross-thread handle pairing one simulation writer with render-side readers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::emitter::{Emitter, Snapshot};
use crate::particle::Particle;
use crate::TimeMs;

/// Cloneable handle around an [`Emitter`] for hosts that run simulation and
/// rendering on separate threads.
///
/// The inner lock is held only while the buffer is mutated or copied, never
/// while a snapshot is iterated — the render side works entirely on its
/// private copy. Single-threaded hosts can keep using a bare [`Emitter`] in
/// strict alternation instead.
#[derive(Debug, Clone)]
pub struct SharedEmitter {
    inner: Arc<Mutex<Emitter>>,
}

impl SharedEmitter {
    /// Wrap an emitter for shared use.
    pub fn new(emitter: Emitter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(emitter)),
        }
    }

    /// See [`Emitter::advance`].
    pub fn advance(
        &self,
        now: TimeMs,
        spawn_allowed: bool,
        factory: impl FnOnce() -> Particle,
    ) -> bool {
        self.lock().advance(now, spawn_allowed, factory)
    }

    /// See [`Emitter::set_active`].
    pub fn set_active(&self, active: bool) {
        self.lock().set_active(active);
    }

    /// See [`Emitter::is_active`].
    pub fn is_active(&self, now: TimeMs) -> bool {
        self.lock().is_active(now)
    }

    /// Capture a [`Snapshot`] under the lock, releasing it before iteration.
    pub fn snapshot(&self, now: TimeMs) -> Snapshot {
        self.lock().snapshot(now)
    }

    fn lock(&self) -> MutexGuard<'_, Emitter> {
        // A poisoned lock only means a panic elsewhere mid-update; the buffer
        // itself is always structurally valid, so keep going.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::EmitterConfig;
    use glam::Vec2;

    fn test_particle() -> Particle {
        Particle {
            start_time: 0.0,
            start_position: Vec2::ZERO,
            velocity: Vec2::new(5.0, -20.0),
            duration: 400.0,
            start_angle: 0.0,
            end_angle: 0.0,
            end_scale: 1.0,
        }
    }

    #[test]
    fn render_thread_sees_consistent_copies_while_simulation_advances() {
        use std::sync::atomic::{AtomicU64, Ordering};

        let emitter = Emitter::new(EmitterConfig {
            particles_per_second: 50,
            max_lifetime_ms: 400.0,
            gravity: 0.0,
        })
        .expect("valid config");
        let capacity = emitter.capacity();

        let shared = SharedEmitter::new(emitter);
        shared.set_active(true);

        // The sim thread publishes its clock; the render thread snapshots at
        // whatever value it last observed, exactly like a host's shared
        // frame clock.
        let clock = Arc::new(AtomicU64::new(0));

        let sim = {
            let shared = shared.clone();
            let clock = Arc::clone(&clock);
            std::thread::spawn(move || {
                for frame in 0..500u64 {
                    let now = frame * 4;
                    shared.advance(now as TimeMs, true, test_particle);
                    clock.store(now, Ordering::Release);
                }
            })
        };

        let render = {
            let shared = shared.clone();
            let clock = Arc::clone(&clock);
            std::thread::spawn(move || {
                for _ in 0..500 {
                    let now = clock.load(Ordering::Acquire) as TimeMs;
                    let snapshot = shared.snapshot(now);
                    assert!(snapshot.renderables().count() <= capacity);
                    for particle in snapshot.renderables() {
                        assert!(particle.alpha > 0.0 && particle.alpha <= 1.0);
                        assert!(particle.scale > 0.0);
                    }
                }
            })
        };

        sim.join().expect("simulation thread");
        render.join().expect("render thread");
    }
}
