pub mod mesh;

pub use mesh::{ChunkMesh, DrawCallId, DrawSubmitter, FaceMesh, MeshBuilder, Vertex};
