#![warn(missing_docs)]
//! Quad-batch construction for particle snapshots.
//!
//! Turns each live particle of a [`starspew_core::Snapshot`] into a rotated,
//! scaled, alpha-faded textured quad. Rasterization stays with the host: the
//! batch exposes plain vertices (and their raw bytes) for upload to whatever
//! renderer consumes them.

mod batch;

pub use batch::{ParticleVertex, QuadBatch, SpriteRegion};
