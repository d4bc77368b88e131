//! Chunk mesh generation: derives the minimal visible-surface mesh for one
//! chunk and the collision buffers for its physics shape.
//!
//! This is a pure function of the chunk's data, its coordinate and the
//! neighbor-lookup callback. It holds no state and never fails: unknown
//! block IDs are skipped, unloaded neighbors read as air (so boundary faces
//! are emitted rather than leaving holes at the edge of loaded terrain),
//! and an all-air or fully sealed chunk yields an empty result.
use crate::render::mesh::{ChunkMesh, MeshBuilder};
use crate::world::block::{face_toward, Face, FaceOpacity, SerializedBlock};
use crate::world::block_registry::BlockRegistry;
use crate::world::chunk_coord::{BlockCoord, ChunkCoord};
use crate::world::chunk_data::{ChunkData, BLOCK_SIZE, CHUNK_HEIGHT, CHUNK_SIZE};
use glam::Vec3;

/// Resolves an absolute block coordinate, crossing chunk boundaries.
/// Must return the empty block for unloaded chunks, never fail.
pub type NeighborLookup<'a> = dyn Fn(BlockCoord) -> SerializedBlock + 'a;

/// Everything meshing produces for one chunk: the renderable buffers plus
/// the position/index buffers the collision shape is built from.
#[derive(Debug, Clone, Default)]
pub struct ChunkMeshData {
    pub mesh: ChunkMesh,
    pub collision_positions: Vec<Vec3>,
    pub collision_indices: Vec<[u32; 3]>,
}

impl ChunkMeshData {
    pub fn has_collision(&self) -> bool {
        !self.collision_positions.is_empty()
    }
}

/// Walks every cell of the chunk and emits the faces exposed to a
/// non-closed neighbor, with geometry rotated per block and faces matched
/// across both blocks' rotations.
pub fn generate_chunk_mesh(
    data: &ChunkData,
    coord: ChunkCoord,
    registry: &BlockRegistry,
    neighbor: &NeighborLookup,
) -> ChunkMeshData {
    let mut builder = MeshBuilder::new();

    for y in 0..CHUNK_HEIGHT {
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let block = data.get(x, y, z);
                if block.is_air() {
                    continue;
                }
                let Some(desc) = registry.try_get_description(block.id) else {
                    log::debug!("skipping unknown block id {} at ({x},{y},{z})", block.id);
                    continue;
                };

                let translation = Vec3::new(x as f32, y as f32, z as f32) * BLOCK_SIZE
                    + Vec3::splat(0.5 * BLOCK_SIZE);

                for face in Face::ALL {
                    if face_is_visible(registry, &block, &desc.opacity, face, || {
                        let dir = face.rotated_dir(block.rotation);
                        neighbor(BlockCoord::local(coord, x, y, z).offset(dir))
                    }) {
                        builder.append_face(desc.face_mesh(face), block.rotation, translation);
                    }
                }
            }
        }
    }

    let mesh = builder.build();
    let collision_positions: Vec<Vec3> = mesh.vertices.iter().map(|v| v.position).collect();
    let collision_indices = mesh
        .indices
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect();

    ChunkMeshData {
        mesh,
        collision_positions,
        collision_indices,
    }
}

/// Face-culling decision for one face of one block. Open faces are always
/// emitted; otherwise the face survives unless the neighbor face touching
/// it is closed.
fn face_is_visible(
    registry: &BlockRegistry,
    block: &SerializedBlock,
    opacity: &[FaceOpacity; 6],
    face: Face,
    lookup: impl FnOnce() -> SerializedBlock,
) -> bool {
    if opacity[face.index()] == FaceOpacity::Open {
        return true;
    }

    let neighbor = lookup();
    if neighbor.is_air() {
        return true;
    }
    let Some(neighbor_desc) = registry.try_get_description(neighbor.id) else {
        return true;
    };

    // The neighbor face touching ours: the one whose rotated normal points
    // back along our rotated face normal.
    let world_dir = face.rotated_dir(block.rotation);
    let touching = face_toward(-world_dir, neighbor.rotation);
    neighbor_desc.opacity_of(touching) != FaceOpacity::Closed
}
