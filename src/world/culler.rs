//! Per-chunk frustum-cull cache.
//!
//! Thousands of block-level queries can hit one chunk in a frame; once the
//! chunk-level sphere test fails, every further query that frame returns
//! false without touching the frustum again.
use crate::utils::math::{CameraFrustum, Sphere};
use crate::world::chunk_coord::ChunkCoord;
use crate::world::chunk_data::{BLOCK_RADIUS, BLOCK_SIZE, CHUNK_HEIGHT, CHUNK_SIZE};
use glam::Vec3;

#[derive(Debug, Clone)]
pub struct ChunkCuller {
    origin: Vec3,
    sphere: Sphere,
    /// Optimistically true after `flush`; driven false for the rest of the
    /// frame by the first failing chunk-level test.
    chunk_visible: bool,
}

impl ChunkCuller {
    pub fn new(coord: ChunkCoord) -> Self {
        let origin = coord.origin();
        let extents = Vec3::new(CHUNK_SIZE as f32, CHUNK_HEIGHT as f32, CHUNK_SIZE as f32)
            * BLOCK_SIZE;
        Self {
            origin,
            // Conservative bound: radius is the magnitude of the full
            // extents vector, not the half-diagonal.
            sphere: Sphere::new(origin + extents * 0.5, extents.length()),
            chunk_visible: true,
        }
    }

    /// Resets the per-frame cache. Must run once per chunk per frame before
    /// any `in_frustum` query.
    pub fn flush(&mut self) {
        self.chunk_visible = true;
    }

    pub fn chunk_sphere(&self) -> &Sphere {
        &self.sphere
    }

    /// Whether the block at local `(x, y, z)` is inside the frustum. The
    /// cached chunk-level result short-circuits the whole chunk once it has
    /// failed this frame.
    pub fn in_frustum(&mut self, x: u32, y: u32, z: u32, camera: &CameraFrustum) -> bool {
        if !self.chunk_visible {
            return false;
        }

        self.chunk_visible = camera.contains_sphere(&self.sphere);
        if !self.chunk_visible {
            return false;
        }

        let center = self.origin
            + (Vec3::new(x as f32, y as f32, z as f32) + Vec3::splat(0.5)) * BLOCK_SIZE;
        camera.contains_sphere(&Sphere::new(center, BLOCK_RADIUS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::{Frustum, Plane};

    /// Axis-aligned frustum spanning [-range, range] on every axis.
    fn cube_frustum(range: f32) -> CameraFrustum {
        CameraFrustum::new(Frustum::new([
            Plane::new(Vec3::X, -range),
            Plane::new(Vec3::NEG_X, -range),
            Plane::new(Vec3::Y, -range),
            Plane::new(Vec3::NEG_Y, -range),
            Plane::new(Vec3::Z, -range),
            Plane::new(Vec3::NEG_Z, -range),
        ]))
    }

    #[test]
    fn blocks_in_a_visible_chunk_pass() {
        let mut culler = ChunkCuller::new(ChunkCoord::new(0, 0, 0));
        let camera = cube_frustum(1000.0);
        culler.flush();
        assert!(culler.in_frustum(0, 0, 0, &camera));
        assert!(culler.in_frustum(31, 47, 31, &camera));
    }

    #[test]
    fn per_block_test_still_applies_in_a_visible_chunk() {
        let mut culler = ChunkCuller::new(ChunkCoord::new(0, 0, 0));
        // Large enough to intersect the chunk's conservative sphere but not
        // reach the chunk's far corner blocks.
        let camera = cube_frustum(5.0);
        culler.flush();
        assert!(culler.in_frustum(0, 0, 0, &camera));
        assert!(!culler.in_frustum(31, 47, 31, &camera));
    }

    #[test]
    fn failed_chunk_test_short_circuits_for_the_frame() {
        // A chunk far away from a small frustum.
        let mut culler = ChunkCuller::new(ChunkCoord::new(100, 0, 0));
        culler.flush();
        assert!(!culler.in_frustum(0, 0, 0, &cube_frustum(5.0)));

        // Even a frustum that would contain the chunk is rejected: the
        // cached result holds until the next flush.
        let containing = cube_frustum(1.0e6);
        assert!(!culler.in_frustum(0, 0, 0, &containing));

        culler.flush();
        assert!(culler.in_frustum(0, 0, 0, &containing));
    }
}
