//! Particle records and their lifetime kinematics.

use glam::Vec2;

use crate::TimeMs;

/// A single timed particle occupying one ring-buffer slot.
///
/// Particles carry no identity beyond their slot: the emitter overwrites
/// slots in ring order and never destroys them individually. A zeroed slot
/// has never been spawned and is skipped by every query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    /// Simulation clock (ms) at spawn. Stamped by the emitter, not factories.
    pub start_time: TimeMs,
    /// Spawn position in the host's coordinate space.
    pub start_position: Vec2,
    /// Initial velocity in units per second.
    pub velocity: Vec2,
    /// Lifetime in ms. Positive for every spawned particle.
    pub duration: TimeMs,
    /// Rotation (radians) at spawn.
    pub start_angle: f32,
    /// Rotation (radians) reached at end of life.
    pub end_angle: f32,
    /// Scale reached at end of life; the start scale is implicitly 1.
    pub end_scale: f32,
}

impl Particle {
    /// Whether this slot has ever held a spawned particle.
    ///
    /// Every spawned particle carries a positive duration (enforced at the
    /// factory boundary), so a zeroed slot is recognizable by `duration`
    /// alone. Spawn time cannot serve as the sentinel: a particle legally
    /// spawns at clock value 0.
    pub fn is_empty(&self) -> bool {
        self.duration <= 0.0
    }

    /// Normalized lifetime progress at `dt` ms after spawn, clamped to [0, 1].
    fn progress_at(&self, dt: TimeMs) -> f32 {
        (dt / self.duration).clamp(0.0, 1.0) as f32
    }

    /// Resolve this particle against a snapshot clock.
    ///
    /// Returns `None` for empty slots, for particles spawned after `time`
    /// (the clock was rewound past them), and for fully decayed particles.
    /// Strictly-future particles are skipped rather than clamped: after a
    /// rewind they must vanish, not render frozen at zero progress. Stale
    /// `dt` far beyond the duration is instead handled by the progress clamp.
    pub fn renderable_at(&self, time: TimeMs, gravity: f32) -> Option<RenderableParticle> {
        if self.is_empty() {
            return None;
        }
        let dt = time - self.start_time;
        if dt < 0.0 {
            return None;
        }
        let progress = self.progress_at(dt);
        let alpha = 1.0 - progress;
        if alpha <= 0.0 {
            return None;
        }
        let drift = Vec2::new(0.0, gravity * (self.duration / 1000.0) as f32 * progress);
        let position = self.start_position + (self.velocity + drift) * (dt / 1000.0) as f32;
        Some(RenderableParticle {
            position,
            alpha,
            scale: 1.0 + (self.end_scale - 1.0) * progress,
            angle: self.start_angle + (self.end_angle - self.start_angle) * progress,
        })
    }
}

/// Per-particle values handed to the renderer for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableParticle {
    /// Center position after velocity and gravity drift.
    pub position: Vec2,
    /// Opacity in (0, 1]; fades linearly over the particle's lifetime.
    pub alpha: f32,
    /// Scale multiplier, interpolated from 1 toward `end_scale`.
    pub scale: f32,
    /// Rotation in radians, interpolated between the spawn angles.
    pub angle: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_particle() -> Particle {
        Particle {
            start_time: 1000.0,
            start_position: Vec2::new(10.0, 20.0),
            velocity: Vec2::new(100.0, -50.0),
            duration: 1000.0,
            start_angle: 0.0,
            end_angle: std::f32::consts::PI,
            end_scale: 3.0,
        }
    }

    #[test]
    fn zeroed_slot_is_empty_and_never_renders() {
        let slot = Particle::default();
        assert!(slot.is_empty());
        assert!(slot.renderable_at(5000.0, 0.0).is_none());
    }

    #[test]
    fn alpha_fades_linearly_with_progress() {
        let p = sample_particle();
        let halfway = p.renderable_at(1500.0, 0.0).expect("alive at half life");
        assert!((halfway.alpha - 0.5).abs() < 1e-6);

        assert!(p.renderable_at(2000.0, 0.0).is_none(), "expired at end of life");
        assert!(p.renderable_at(9000.0, 0.0).is_none(), "stays expired long after");
    }

    #[test]
    fn future_particles_are_skipped_not_clamped() {
        let p = sample_particle();
        assert!(p.renderable_at(999.9, 0.0).is_none());
        assert!(p.renderable_at(1000.0, 0.0).is_some(), "dt == 0 is alive");
    }

    #[test]
    fn scale_and_angle_interpolate_with_progress() {
        let p = sample_particle();
        let halfway = p.renderable_at(1500.0, 0.0).expect("alive at half life");
        assert!((halfway.scale - 2.0).abs() < 1e-6);
        assert!((halfway.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn position_integrates_velocity_over_elapsed_seconds() {
        let p = sample_particle();
        let halfway = p.renderable_at(1500.0, 0.0).expect("alive at half life");
        // 0.5 s at (100, -50) units/s from (10, 20).
        assert!((halfway.position.x - 60.0).abs() < 1e-4);
        assert!((halfway.position.y - -5.0).abs() < 1e-4);
    }

    #[test]
    fn gravity_adds_progress_scaled_downward_drift() {
        let p = sample_particle();
        let no_gravity = p.renderable_at(1500.0, 0.0).expect("alive");
        let with_gravity = p.renderable_at(1500.0, 240.0).expect("alive");
        // drift = gravity * (duration / 1000) * progress, integrated over dt seconds:
        // 240 * 1.0 * 0.5 * 0.5 = 60 units downward.
        assert!((with_gravity.position.y - (no_gravity.position.y + 60.0)).abs() < 1e-3);
        assert_eq!(with_gravity.position.x, no_gravity.position.x);
    }
}
