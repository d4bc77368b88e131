//! Chunk and block addressing. Local block coordinates are always in
//! range; any out-of-range local coordinate is folded into the adjacent
//! chunk at construction time.
use crate::world::chunk_data::{BLOCK_SIZE, CHUNK_HEIGHT, CHUNK_SIZE};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl ChunkCoord {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// World-space position of the chunk's minimum corner.
    pub fn origin(&self) -> Vec3 {
        Vec3::new(
            self.x as f32 * CHUNK_SIZE as f32 * BLOCK_SIZE,
            self.y as f32 * CHUNK_HEIGHT as f32 * BLOCK_SIZE,
            self.z as f32 * CHUNK_SIZE as f32 * BLOCK_SIZE,
        )
    }

    pub fn from_world(pos: Vec3) -> Self {
        Self::new(
            (pos.x / (CHUNK_SIZE as f32 * BLOCK_SIZE)).floor() as i64,
            (pos.y / (CHUNK_HEIGHT as f32 * BLOCK_SIZE)).floor() as i64,
            (pos.z / (CHUNK_SIZE as f32 * BLOCK_SIZE)).floor() as i64,
        )
    }

    pub fn manhattan_distance(&self, other: &Self) -> i64 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

impl PartialOrd for ChunkCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChunkCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.x.cmp(&other.x) {
            Ordering::Equal => match self.y.cmp(&other.y) {
                Ordering::Equal => self.z.cmp(&other.z),
                ord => ord,
            },
            ord => ord,
        }
    }
}

/// Absolute block address: owning chunk plus in-range local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockCoord {
    pub chunk: ChunkCoord,
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl BlockCoord {
    /// Builds a block coordinate from possibly out-of-range locals,
    /// wrapping overflow into the neighboring chunks.
    pub fn new(chunk: ChunkCoord, x: i64, y: i64, z: i64) -> Self {
        let sx = CHUNK_SIZE as i64;
        let sy = CHUNK_HEIGHT as i64;
        Self {
            chunk: ChunkCoord::new(
                chunk.x + x.div_euclid(sx),
                chunk.y + y.div_euclid(sy),
                chunk.z + z.div_euclid(sx),
            ),
            x: x.rem_euclid(sx) as u32,
            y: y.rem_euclid(sy) as u32,
            z: z.rem_euclid(sx) as u32,
        }
    }

    pub fn local(chunk: ChunkCoord, x: u32, y: u32, z: u32) -> Self {
        debug_assert!(x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE);
        Self { chunk, x, y, z }
    }

    /// Steps one or more cells in `dir`, crossing chunk boundaries.
    pub fn offset(&self, dir: IVec3) -> Self {
        Self::new(
            self.chunk,
            self.x as i64 + dir.x as i64,
            self.y as i64 + dir.y as i64,
            self.z as i64 + dir.z as i64,
        )
    }

    /// World-space center of the block.
    pub fn world_center(&self) -> Vec3 {
        self.chunk.origin()
            + (Vec3::new(self.x as f32, self.y as f32, self.z as f32) + Vec3::splat(0.5))
                * BLOCK_SIZE
    }

    pub fn from_world(pos: Vec3) -> Self {
        let cell = (pos / BLOCK_SIZE).floor();
        Self::new(
            ChunkCoord::new(0, 0, 0),
            cell.x as i64,
            cell.y as i64,
            cell.z as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_locals_are_kept() {
        let c = BlockCoord::new(ChunkCoord::new(1, 2, 3), 5, 40, 31);
        assert_eq!(c.chunk, ChunkCoord::new(1, 2, 3));
        assert_eq!((c.x, c.y, c.z), (5, 40, 31));
    }

    #[test]
    fn overflow_wraps_into_the_next_chunk() {
        let c = BlockCoord::new(ChunkCoord::new(0, 0, 0), 32, 48, -1);
        assert_eq!(c.chunk, ChunkCoord::new(1, 1, -1));
        assert_eq!((c.x, c.y, c.z), (0, 0, 31));
    }

    #[test]
    fn offset_steps_across_boundaries() {
        let edge = BlockCoord::local(ChunkCoord::new(0, 0, 0), 31, 0, 0);
        let next = edge.offset(IVec3::X);
        assert_eq!(next.chunk, ChunkCoord::new(1, 0, 0));
        assert_eq!(next.x, 0);

        let back = next.offset(IVec3::NEG_X);
        assert_eq!(back, edge);
    }

    #[test]
    fn negative_world_positions_floor_correctly() {
        let c = BlockCoord::from_world(Vec3::new(-0.5, 0.5, 0.5));
        assert_eq!(c.chunk, ChunkCoord::new(-1, 0, 0));
        assert_eq!(c.x, CHUNK_SIZE - 1);
    }

    #[test]
    fn chunk_origin_and_from_world_agree() {
        let coord = ChunkCoord::new(-2, 1, 4);
        assert_eq!(ChunkCoord::from_world(coord.origin()), coord);
    }
}
