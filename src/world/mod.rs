pub mod block;
pub mod block_registry;
pub mod chunk;
pub mod chunk_coord;
pub mod chunk_data;
pub mod core;
pub mod culler;
pub mod mesh_gen;
pub mod update_block;

// Re-export commonly used types
pub use block::{Face, FaceOpacity, SerializedBlock};
pub use block_registry::{BlockDescription, BlockRegistry, RegistryError};
pub use chunk::Chunk;
pub use chunk_coord::{BlockCoord, ChunkCoord};
pub use chunk_data::{ChunkData, BLOCK_RADIUS, BLOCK_SIZE, CHUNK_HEIGHT, CHUNK_SIZE};
pub use self::core::{VoxelWorld, WorldError};
pub use culler::ChunkCuller;
pub use mesh_gen::{generate_chunk_mesh, ChunkMeshData};
pub use update_block::UpdateBlock;
