//! Fixed-size per-chunk block storage.
use crate::world::block::SerializedBlock;
use serde::{Deserialize, Serialize};
use std::io;

pub const CHUNK_SIZE: u32 = 32;
pub const CHUNK_HEIGHT: u32 = 48;
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_HEIGHT * CHUNK_SIZE) as usize;

/// World-space edge length of one block.
pub const BLOCK_SIZE: f32 = 1.0;
/// Bounding-sphere radius of one block, approximating the half-diagonal.
pub const BLOCK_RADIUS: f32 = 0.87 * BLOCK_SIZE;

/// A 32x48x32 grid of serialized block state. Cells are mutated only
/// through the owning `Chunk`'s set/take operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkData {
    blocks: Vec<SerializedBlock>,
}

impl ChunkData {
    pub fn new() -> Self {
        Self {
            blocks: vec![SerializedBlock::empty(); CHUNK_VOLUME],
        }
    }

    fn index(x: u32, y: u32, z: u32) -> usize {
        debug_assert!(x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE);
        (x + z * CHUNK_SIZE + y * CHUNK_SIZE * CHUNK_SIZE) as usize
    }

    pub fn get(&self, x: u32, y: u32, z: u32) -> SerializedBlock {
        self.blocks[Self::index(x, y, z)]
    }

    pub fn set(&mut self, x: u32, y: u32, z: u32, block: SerializedBlock) {
        self.blocks[Self::index(x, y, z)] = block;
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }

    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }

    pub fn save_to_writer(&self, mut writer: impl io::Write) -> io::Result<()> {
        bincode::serialize_into(&mut writer, self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    pub fn load_from_reader(mut reader: impl io::Read) -> io::Result<Self> {
        let data: Self = bincode::deserialize_from(&mut reader)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if data.blocks.len() != CHUNK_VOLUME {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "chunk data has wrong cell count",
            ));
        }
        Ok(data)
    }
}

impl Default for ChunkData {
    fn default() -> Self {
        Self::new()
    }
}
