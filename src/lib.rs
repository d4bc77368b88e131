pub mod config;
pub mod physics;
pub mod render;
pub mod utils;
pub mod world;

// Re-export commonly used types
pub use config::chunksys::ChunkSysConfig;
pub use physics::collision::{CollisionLayers, CollisionWorld};
pub use render::mesh::{ChunkMesh, DrawCallId, DrawSubmitter, MeshBuilder, Vertex};
pub use utils::math::{CameraFrustum, Frustum, Plane, Sphere};
pub use world::block::{Face, FaceOpacity, SerializedBlock};
pub use world::block_registry::{BlockDescription, BlockRegistry};
pub use world::chunk::Chunk;
pub use world::chunk_coord::{BlockCoord, ChunkCoord};
pub use world::chunk_data::ChunkData;
pub use world::core::{VoxelWorld, WorldError};
pub use world::update_block::UpdateBlock;
