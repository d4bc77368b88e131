//! The chunk aggregate: block data, live update-block objects, the
//! generated mesh, the physics collider and the frustum-cull cache, with
//! dirty tracking so several same-frame mutations cost one remesh.
use crate::physics::collision::{CollisionLayers, CollisionWorld};
use crate::render::mesh::{ChunkMesh, DrawCallId, DrawSubmitter};
use crate::world::block::SerializedBlock;
use crate::world::block_registry::BlockRegistry;
use crate::world::chunk_coord::{BlockCoord, ChunkCoord};
use crate::world::chunk_data::{ChunkData, CHUNK_HEIGHT, CHUNK_SIZE};
use crate::world::culler::ChunkCuller;
use crate::world::mesh_gen::{generate_chunk_mesh, ChunkMeshData, NeighborLookup};
use crate::world::update_block::UpdateBlock;
use glam::Mat4;
use rapier3d::prelude::ColliderHandle;
use std::collections::HashMap;

pub struct Chunk {
    coord: ChunkCoord,
    data: ChunkData,
    update_blocks: HashMap<(u32, u32, u32), Box<dyn UpdateBlock>>,
    mesh: ChunkMesh,
    collider: Option<ColliderHandle>,
    draw_call: Option<DrawCallId>,
    culler: ChunkCuller,
    dirty: bool,
}

impl Chunk {
    /// Builds a chunk from stored or generated data. Cells whose block type
    /// wants an update object get one from the registry factory, notified
    /// `on_loaded` (placement notifications are for fresh placements only).
    pub fn new(coord: ChunkCoord, data: ChunkData, registry: &BlockRegistry) -> Self {
        let mut update_blocks: HashMap<(u32, u32, u32), Box<dyn UpdateBlock>> = HashMap::new();
        for y in 0..CHUNK_HEIGHT {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let block = data.get(x, y, z);
                    if block.is_air() {
                        continue;
                    }
                    let desc = registry.get_desc_or_empty(block.id);
                    if let Some(factory) = desc.update_factory.filter(|_| desc.wants_update) {
                        let mut object = factory();
                        object.on_loaded();
                        update_blocks.insert((x, y, z), object);
                    }
                }
            }
        }

        Self {
            coord,
            data,
            update_blocks,
            mesh: ChunkMesh::default(),
            collider: None,
            draw_call: None,
            culler: ChunkCuller::new(coord),
            dirty: true,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn data(&self) -> &ChunkData {
        &self.data
    }

    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.coord.origin())
    }

    pub fn culler_mut(&mut self) -> &mut ChunkCuller {
        &mut self.culler
    }

    /// Writes a cell. Any live object previously there is destroyed and
    /// unloaded first; if the new block's description wants an update
    /// object, one is created and notified `on_loaded` then `on_placed`.
    pub fn set_block(
        &mut self,
        x: u32,
        y: u32,
        z: u32,
        block: SerializedBlock,
        registry: &BlockRegistry,
    ) {
        self.retire_update_block(x, y, z, true);
        self.data.set(x, y, z, block);

        let desc = registry.get_desc_or_empty(block.id);
        if let Some(factory) = desc.update_factory.filter(|_| desc.wants_update) {
            let mut object = factory();
            object.on_loaded();
            object.on_placed();
            self.update_blocks.insert((x, y, z), object);
        }
        self.dirty = true;
    }

    /// Writes a cell with an explicitly supplied live object.
    pub fn set_update_block(
        &mut self,
        x: u32,
        y: u32,
        z: u32,
        block: SerializedBlock,
        mut object: Box<dyn UpdateBlock>,
    ) {
        self.retire_update_block(x, y, z, true);
        self.data.set(x, y, z, block);
        object.on_loaded();
        object.on_placed();
        self.update_blocks.insert((x, y, z), object);
        self.dirty = true;
    }

    /// Clears a cell back to air, returning ownership of any live object
    /// (notified `on_unloaded`).
    pub fn take_block(&mut self, x: u32, y: u32, z: u32) -> Option<Box<dyn UpdateBlock>> {
        self.data.set(x, y, z, SerializedBlock::empty());
        self.dirty = true;

        let mut object = self.update_blocks.remove(&(x, y, z))?;
        object.on_unloaded();
        Some(object)
    }

    /// Non-owning lookup of the live object at a cell.
    pub fn update_block(&self, x: u32, y: u32, z: u32) -> Option<&dyn UpdateBlock> {
        self.update_blocks.get(&(x, y, z)).map(|b| b.as_ref())
    }

    pub fn update_block_mut(&mut self, x: u32, y: u32, z: u32) -> Option<&mut (dyn UpdateBlock + 'static)> {
        self.update_blocks.get_mut(&(x, y, z)).map(|b| b.as_mut())
    }

    fn retire_update_block(&mut self, x: u32, y: u32, z: u32, destroyed: bool) {
        if let Some(mut old) = self.update_blocks.remove(&(x, y, z)) {
            if destroyed {
                old.on_destroyed();
            }
            old.on_unloaded();
        }
    }

    /// Regenerates mesh, collider and draw call if the chunk is dirty, then
    /// drives the live objects' frame hooks. `neighbor` resolves block data
    /// in *other* chunks; lookups into this chunk are answered locally.
    pub fn before_draw(
        &mut self,
        registry: &BlockRegistry,
        neighbor: &NeighborLookup,
        physics: &mut CollisionWorld,
        draw: &mut dyn DrawSubmitter,
    ) {
        if self.dirty {
            let output = {
                let data = &self.data;
                let coord = self.coord;
                let lookup = |bc: BlockCoord| {
                    if bc.chunk == coord {
                        data.get(bc.x, bc.y, bc.z)
                    } else {
                        neighbor(bc)
                    }
                };
                generate_chunk_mesh(data, coord, registry, &lookup)
            };
            self.apply_remesh(output, physics, draw);
        }

        self.notify_before_draw();
    }

    /// Drives the live objects' pre-draw hooks without remeshing.
    pub fn notify_before_draw(&mut self) {
        for object in self.update_blocks.values_mut() {
            object.before_draw();
        }
    }

    /// Forces a remesh before the next draw, e.g. when a neighboring
    /// chunk's boundary blocks changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn after_draw(&mut self) {
        for object in self.update_blocks.values_mut() {
            object.after_draw();
        }
    }

    /// Installs freshly generated mesh output: the previous draw call and
    /// collider are retired, new ones registered, and the chunk is clean.
    pub fn apply_remesh(
        &mut self,
        output: ChunkMeshData,
        physics: &mut CollisionWorld,
        draw: &mut dyn DrawSubmitter,
    ) {
        if let Some(id) = self.draw_call.take() {
            draw.remove(id);
        }
        if let Some(handle) = self.collider.take() {
            physics.remove(handle);
        }

        self.mesh = output.mesh;
        if !self.mesh.is_empty() {
            self.draw_call = Some(draw.submit(self.coord, &self.mesh, self.transform()));
            self.collider = physics.add_static_trimesh(
                self.coord.origin(),
                &output.collision_positions,
                &output.collision_indices,
                CollisionLayers::ENVIRONMENT,
                CollisionLayers::all(),
            );
        }
        self.dirty = false;
    }

    /// Tears the chunk down: every live object is notified before the
    /// physics body and draw call are removed. Must run before drop.
    pub fn unload(&mut self, physics: &mut CollisionWorld, draw: &mut dyn DrawSubmitter) {
        for (_, mut object) in self.update_blocks.drain() {
            object.on_unloaded();
        }
        if let Some(handle) = self.collider.take() {
            physics.remove(handle);
        }
        if let Some(id) = self.draw_call.take() {
            draw.remove(id);
        }
    }
}
