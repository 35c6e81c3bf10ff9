//! Builds renderer-ready quad vertices from particle snapshots.

use glam::Vec2;
use starspew_core::{RenderableParticle, Snapshot};

/// Vertex for one corner of a particle quad.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    /// Position of the corner in the host's coordinate space.
    pub position: [f32; 2],
    /// Texture coordinate.
    pub uv: [f32; 2],
    /// RGBA color; alpha carries the particle fade.
    pub color: [f32; 4],
}

/// Sprite-sheet subregion mapped over each quad, plus the quad's base size.
#[derive(Debug, Clone, Copy)]
pub struct SpriteRegion {
    /// Top-left UV.
    pub uv_min: [f32; 2],
    /// Bottom-right UV.
    pub uv_max: [f32; 2],
    /// Half-extent of the quad at scale 1, in world units.
    pub half_size: Vec2,
}

impl SpriteRegion {
    /// Full-texture region with the given half extents.
    pub fn full(half_size: Vec2) -> Self {
        Self {
            uv_min: [0.0, 0.0],
            uv_max: [1.0, 1.0],
            half_size,
        }
    }
}

/// CPU-side quad batch rebuilt once per render pass.
///
/// Six vertices (two triangles) per particle. The byte view is ready for a
/// vertex-buffer upload by whatever rasterizer the host uses; particles are
/// drawn additively, so emission order carries no meaning.
#[derive(Debug, Default)]
pub struct QuadBatch {
    vertices: Vec<ParticleVertex>,
}

impl QuadBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all quads, keeping the allocation for the next pass.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Append one rotated, scaled, faded quad.
    pub fn push(&mut self, particle: &RenderableParticle, region: &SpriteRegion, tint: [f32; 3]) {
        let half = region.half_size * particle.scale;
        let (sin, cos) = particle.angle.sin_cos();
        let corner = |x: f32, y: f32| -> [f32; 2] {
            let local = Vec2::new(x, y) * half;
            let rotated = Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
            (particle.position + rotated).to_array()
        };
        let color = [tint[0], tint[1], tint[2], particle.alpha];
        let [u0, v0] = region.uv_min;
        let [u1, v1] = region.uv_max;

        let top_left = (corner(-1.0, -1.0), [u0, v0]);
        let top_right = (corner(1.0, -1.0), [u1, v0]);
        let bottom_right = (corner(1.0, 1.0), [u1, v1]);
        let bottom_left = (corner(-1.0, 1.0), [u0, v1]);
        for (position, uv) in [
            top_left,
            top_right,
            bottom_right,
            top_left,
            bottom_right,
            bottom_left,
        ] {
            self.vertices.push(ParticleVertex {
                position,
                uv,
                color,
            });
        }
    }

    /// Append a quad for every live particle in `snapshot`.
    pub fn push_snapshot(&mut self, snapshot: &Snapshot, region: &SpriteRegion, tint: [f32; 3]) {
        for particle in snapshot.renderables() {
            self.push(&particle, region, tint);
        }
    }

    /// Vertices in draw order.
    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    /// Number of quads currently batched.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 6
    }

    /// Raw bytes for vertex-buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
