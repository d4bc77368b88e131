//! The voxel world: the set of loaded chunks, block addressing across
//! chunk boundaries and the per-frame remesh/cull driving.
use crate::physics::collision::CollisionWorld;
use crate::render::mesh::DrawSubmitter;
use crate::utils::math::CameraFrustum;
use crate::world::block::SerializedBlock;
use crate::world::block_registry::BlockRegistry;
use crate::world::chunk::Chunk;
use crate::world::chunk_coord::{BlockCoord, ChunkCoord};
use crate::world::chunk_data::{ChunkData, CHUNK_HEIGHT, CHUNK_SIZE};
use crate::world::mesh_gen::{generate_chunk_mesh, ChunkMeshData};
use crate::world::update_block::UpdateBlock;
use glam::IVec3;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("chunk {0:?} is already loaded")]
    ChunkAlreadyLoaded(ChunkCoord),
    #[error("chunk {0:?} is not loaded")]
    ChunkNotLoaded(ChunkCoord),
}

pub struct VoxelWorld {
    chunks: HashMap<ChunkCoord, Chunk>,
    registry: Arc<BlockRegistry>,
}

impl VoxelWorld {
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self {
            chunks: HashMap::new(),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Brings a chunk into the world with data from storage or generation.
    /// The chunk starts dirty and gets meshed before its first draw.
    pub fn load_chunk(&mut self, coord: ChunkCoord, data: ChunkData) -> Result<(), WorldError> {
        if self.chunks.contains_key(&coord) {
            return Err(WorldError::ChunkAlreadyLoaded(coord));
        }
        self.chunks
            .insert(coord, Chunk::new(coord, data, &self.registry));
        // Neighboring chunks may have culled faces against our boundary.
        for neighbor in Self::adjacent(coord) {
            if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                chunk.mark_dirty();
            }
        }
        Ok(())
    }

    /// Removes a chunk: live objects are notified and the physics body and
    /// draw call retired before the chunk is dropped.
    pub fn unload_chunk(
        &mut self,
        coord: ChunkCoord,
        physics: &mut CollisionWorld,
        draw: &mut dyn DrawSubmitter,
    ) -> Result<(), WorldError> {
        let mut chunk = self
            .chunks
            .remove(&coord)
            .ok_or(WorldError::ChunkNotLoaded(coord))?;
        chunk.unload(physics, draw);
        for neighbor in Self::adjacent(coord) {
            if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                chunk.mark_dirty();
            }
        }
        Ok(())
    }

    /// Unloads every chunk further than `radius` (Chebyshev distance in
    /// chunk units) from `center`.
    pub fn retain_radius(
        &mut self,
        center: ChunkCoord,
        radius: i64,
        physics: &mut CollisionWorld,
        draw: &mut dyn DrawSubmitter,
    ) {
        let distant: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|c| {
                (c.x - center.x)
                    .abs()
                    .max((c.y - center.y).abs())
                    .max((c.z - center.z).abs())
                    > radius
            })
            .copied()
            .collect();
        for coord in distant {
            // Listed coords came from the map; unload cannot fail.
            let _ = self.unload_chunk(coord, physics, draw);
        }
    }

    /// Block state at an absolute coordinate. Unloaded chunks read as air,
    /// which keeps mesh generation conservative at the edge of loaded
    /// terrain: boundary faces are emitted instead of leaving holes.
    pub fn cube_data_at(&self, coord: BlockCoord) -> SerializedBlock {
        self.chunks
            .get(&coord.chunk)
            .map(|chunk| chunk.data().get(coord.x, coord.y, coord.z))
            .unwrap_or_default()
    }

    /// Writes a block through the owning chunk, creating any update object
    /// the block's description asks for.
    pub fn set_cube(&mut self, coord: BlockCoord, block: SerializedBlock) -> Result<(), WorldError> {
        let registry = self.registry.clone();
        let chunk = self
            .chunks
            .get_mut(&coord.chunk)
            .ok_or(WorldError::ChunkNotLoaded(coord.chunk))?;
        chunk.set_block(coord.x, coord.y, coord.z, block, &registry);
        self.dirty_boundary_neighbors(coord);
        Ok(())
    }

    /// Clears a block, returning ownership of its live object if any.
    pub fn take_cube(
        &mut self,
        coord: BlockCoord,
    ) -> Result<Option<Box<dyn UpdateBlock>>, WorldError> {
        let chunk = self
            .chunks
            .get_mut(&coord.chunk)
            .ok_or(WorldError::ChunkNotLoaded(coord.chunk))?;
        let object = chunk.take_block(coord.x, coord.y, coord.z);
        self.dirty_boundary_neighbors(coord);
        Ok(object)
    }

    pub fn update_block_at(&self, coord: BlockCoord) -> Option<&dyn UpdateBlock> {
        self.chunks
            .get(&coord.chunk)?
            .update_block(coord.x, coord.y, coord.z)
    }

    /// Resets every chunk's cull cache. Must run once per frame before any
    /// block-level frustum query.
    pub fn flush_cullers(&mut self) {
        for chunk in self.chunks.values_mut() {
            chunk.culler_mut().flush();
        }
    }

    /// Block-level frustum test through the owning chunk's cull cache.
    /// Blocks in unloaded chunks are never visible.
    pub fn block_in_frustum(&mut self, coord: BlockCoord, camera: &CameraFrustum) -> bool {
        match self.chunks.get_mut(&coord.chunk) {
            Some(chunk) => chunk
                .culler_mut()
                .in_frustum(coord.x, coord.y, coord.z, camera),
            None => false,
        }
    }

    /// Remeshes every dirty chunk, then drives the live objects' pre-draw
    /// hooks. Generation is a pure function of immutable chunk data, so
    /// dirty chunks are generated in parallel before a sequential apply
    /// phase touches physics and the draw queue.
    pub fn before_draw(&mut self, physics: &mut CollisionWorld, draw: &mut dyn DrawSubmitter) {
        let outputs = self.generate_dirty();
        for (coord, output) in outputs {
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                chunk.apply_remesh(output, physics, draw);
            }
        }
        for chunk in self.chunks.values_mut() {
            chunk.notify_before_draw();
        }
    }

    pub fn after_draw(&mut self) {
        for chunk in self.chunks.values_mut() {
            chunk.after_draw();
        }
    }

    fn generate_dirty(&self) -> Vec<(ChunkCoord, ChunkMeshData)> {
        // Chunks own non-Sync update objects, so the parallel phase works
        // on bare data references instead of the chunks themselves.
        let datas: HashMap<ChunkCoord, &ChunkData> = self
            .chunks
            .iter()
            .map(|(coord, chunk)| (*coord, chunk.data()))
            .collect();
        let dirty: Vec<(ChunkCoord, &ChunkData)> = self
            .chunks
            .iter()
            .filter(|(_, chunk)| chunk.is_dirty())
            .map(|(coord, chunk)| (*coord, chunk.data()))
            .collect();
        let registry = &self.registry;

        dirty
            .par_iter()
            .map(|(coord, data)| {
                let lookup = |bc: BlockCoord| {
                    datas
                        .get(&bc.chunk)
                        .map(|d| d.get(bc.x, bc.y, bc.z))
                        .unwrap_or_default()
                };
                (*coord, generate_chunk_mesh(data, *coord, registry, &lookup))
            })
            .collect()
    }

    /// A boundary-cell mutation exposes or hides faces in the adjacent
    /// chunk, which must remesh as well.
    fn dirty_boundary_neighbors(&mut self, coord: BlockCoord) {
        let mut dirs = Vec::new();
        if coord.x == 0 {
            dirs.push(IVec3::NEG_X);
        }
        if coord.x == CHUNK_SIZE - 1 {
            dirs.push(IVec3::X);
        }
        if coord.y == 0 {
            dirs.push(IVec3::NEG_Y);
        }
        if coord.y == CHUNK_HEIGHT - 1 {
            dirs.push(IVec3::Y);
        }
        if coord.z == 0 {
            dirs.push(IVec3::NEG_Z);
        }
        if coord.z == CHUNK_SIZE - 1 {
            dirs.push(IVec3::Z);
        }
        for dir in dirs {
            let neighbor = coord.offset(dir).chunk;
            if let Some(chunk) = self.chunks.get_mut(&neighbor) {
                chunk.mark_dirty();
            }
        }
    }

    fn adjacent(coord: ChunkCoord) -> [ChunkCoord; 6] {
        [
            ChunkCoord::new(coord.x + 1, coord.y, coord.z),
            ChunkCoord::new(coord.x - 1, coord.y, coord.z),
            ChunkCoord::new(coord.x, coord.y + 1, coord.z),
            ChunkCoord::new(coord.x, coord.y - 1, coord.z),
            ChunkCoord::new(coord.x, coord.y, coord.z + 1),
            ChunkCoord::new(coord.x, coord.y, coord.z - 1),
        ]
    }
}
