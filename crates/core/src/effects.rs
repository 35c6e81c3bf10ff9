//! Stock particle sources: parameterized factories for common effect shapes.
//!
//! An [`Emitter`](crate::Emitter) does not know what its particles look like;
//! concrete effects do. Each source here owns its tuning ranges plus a seeded
//! RNG, so two runs with the same seed produce identical particle streams.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::Vec2;
use rand::{rngs::StdRng, Rng};

use crate::particle::Particle;

/// Floor applied to sampled lifetimes so no factory can emit a zero-duration
/// particle, which the emitter rejects as a contract violation.
const MIN_DURATION_MS: f32 = 1.0;

/// A concrete effect that can fill emitter slots.
///
/// The emitter calls [`ParticleSource::next_particle`] at most once per
/// `advance`; `start_time` on the returned particle is ignored and stamped by
/// the emitter itself.
pub trait ParticleSource {
    /// Produce the next particle, fully parameterized except `start_time`.
    fn next_particle(&mut self) -> Particle;
}

/// Build a velocity vector from polar components (radians, units/second).
pub fn polar_velocity(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Sample a half-open range, tolerating degenerate `a..a` tuning.
fn sample(rng: &mut StdRng, range: &Range<f32>) -> f32 {
    if range.start >= range.end {
        range.start
    } else {
        rng.gen_range(range.clone())
    }
}

/// Directional cone spray, the fountain shape: particles leave `origin`
/// around `angle` within a configurable spread, spinning as they fly.
#[derive(Debug)]
pub struct Jet {
    /// Spawn position.
    pub origin: Vec2,
    /// Center direction of the cone, radians.
    pub angle: f32,
    /// Total angular width of the cone, radians.
    pub spread: f32,
    /// Launch speed range, units per second.
    pub speed: Range<f32>,
    /// Particle lifetime range, ms.
    pub duration_ms: Range<f32>,
    /// Rotation added over a particle's lifetime, radians.
    pub spin: Range<f32>,
    /// End-of-life scale range.
    pub end_scale: Range<f32>,
    rng: StdRng,
}

impl Jet {
    /// Create a jet with fountain-like default tuning.
    pub fn new(origin: Vec2, angle: f32, rng: StdRng) -> Self {
        Self {
            origin,
            angle,
            spread: 0.5,
            speed: 350.0..600.0,
            duration_ms: 800.0..1400.0,
            spin: -2.0..2.0,
            end_scale: 0.3..0.7,
            rng,
        }
    }
}

impl ParticleSource for Jet {
    fn next_particle(&mut self) -> Particle {
        let direction = self.angle + (self.rng.gen::<f32>() - 0.5) * self.spread;
        let start_angle = self.rng.gen::<f32>() * TAU;
        Particle {
            start_time: 0.0,
            start_position: self.origin,
            velocity: polar_velocity(direction, sample(&mut self.rng, &self.speed)),
            duration: f64::from(sample(&mut self.rng, &self.duration_ms).max(MIN_DURATION_MS)),
            start_angle,
            end_angle: start_angle + sample(&mut self.rng, &self.spin),
            end_scale: sample(&mut self.rng, &self.end_scale),
        }
    }
}

/// Celebration scatter: particles launch upward across a wide arc from a
/// horizontal band, tumbling and growing as they fall back under gravity.
#[derive(Debug)]
pub struct Confetti {
    /// Center of the spawn band.
    pub origin: Vec2,
    /// Half-width of the horizontal band particles spawn across.
    pub band_half_width: f32,
    /// Launch speed range, units per second.
    pub speed: Range<f32>,
    /// Particle lifetime range, ms.
    pub duration_ms: Range<f32>,
    /// Tumble added over a particle's lifetime, radians.
    pub tumble: Range<f32>,
    /// End-of-life scale range (growing past 1 reads as fluttering closer).
    pub end_scale: Range<f32>,
    rng: StdRng,
}

impl Confetti {
    /// Create a confetti scatter centered on `origin`.
    pub fn new(origin: Vec2, rng: StdRng) -> Self {
        Self {
            origin,
            band_half_width: 80.0,
            speed: 150.0..450.0,
            duration_ms: 1200.0..2000.0,
            tumble: -6.0..6.0,
            end_scale: 1.2..2.4,
            rng,
        }
    }
}

impl ParticleSource for Confetti {
    fn next_particle(&mut self) -> Particle {
        // Upward arc: straight up +/- a little over a quarter turn. Screen
        // space points y-down, so "up" is -y.
        let direction = -std::f32::consts::FRAC_PI_2
            + (self.rng.gen::<f32>() - 0.5) * 1.6;
        let offset = (self.rng.gen::<f32>() - 0.5) * 2.0 * self.band_half_width;
        let start_angle = self.rng.gen::<f32>() * TAU;
        Particle {
            start_time: 0.0,
            start_position: self.origin + Vec2::new(offset, 0.0),
            velocity: polar_velocity(direction, sample(&mut self.rng, &self.speed)),
            duration: f64::from(sample(&mut self.rng, &self.duration_ms).max(MIN_DURATION_MS)),
            start_angle,
            end_angle: start_angle + sample(&mut self.rng, &self.tumble),
            end_scale: sample(&mut self.rng, &self.end_scale),
        }
    }
}

/// Radial twinkle around a point: short-lived, slow drift in every direction,
/// shrinking to nothing.
#[derive(Debug)]
pub struct Sparkle {
    /// Twinkle center.
    pub origin: Vec2,
    /// Radius of the disc particles spawn within.
    pub radius: f32,
    /// Drift speed range, units per second.
    pub speed: Range<f32>,
    /// Particle lifetime range, ms.
    pub duration_ms: Range<f32>,
    rng: StdRng,
}

impl Sparkle {
    /// Create a sparkle cloud centered on `origin`.
    pub fn new(origin: Vec2, rng: StdRng) -> Self {
        Self {
            origin,
            radius: 24.0,
            speed: 10.0..40.0,
            duration_ms: 300.0..700.0,
            rng,
        }
    }
}

impl ParticleSource for Sparkle {
    fn next_particle(&mut self) -> Particle {
        let around = self.rng.gen::<f32>() * TAU;
        let out = self.rng.gen::<f32>() * TAU;
        let distance = self.rng.gen::<f32>().sqrt() * self.radius;
        Particle {
            start_time: 0.0,
            start_position: self.origin + polar_velocity(around, distance),
            velocity: polar_velocity(out, sample(&mut self.rng, &self.speed)),
            duration: f64::from(sample(&mut self.rng, &self.duration_ms).max(MIN_DURATION_MS)),
            start_angle: 0.0,
            end_angle: 0.0,
            end_scale: 0.0,
        }
    }
}
