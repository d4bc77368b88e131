//! Mesh data produced by chunk meshing, plus the narrow draw-call
//! submission surface the renderer implements.
use crate::world::block::Face;
use crate::world::chunk_coord::ChunkCoord;
use glam::{Mat4, Quat, Vec2, Vec3};
use std::collections::HashMap;

/// One render vertex. Attributes rotate with the owning block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    /// Bit-exact key over every attribute. All positions come from discrete
    /// grid arithmetic, so equal vertices are equal to the bit.
    fn bit_key(&self) -> [u32; 14] {
        [
            self.position.x.to_bits(),
            self.position.y.to_bits(),
            self.position.z.to_bits(),
            self.normal.x.to_bits(),
            self.normal.y.to_bits(),
            self.normal.z.to_bits(),
            self.tangent.x.to_bits(),
            self.tangent.y.to_bits(),
            self.tangent.z.to_bits(),
            self.bitangent.x.to_bits(),
            self.bitangent.y.to_bits(),
            self.bitangent.z.to_bits(),
            self.uv.x.to_bits(),
            self.uv.y.to_bits(),
        ]
    }
}

/// Pre-authored geometry for a single face of a block type, in block-local
/// space (block centered at the origin, one unit across).
#[derive(Debug, Clone, Default)]
pub struct FaceMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl FaceMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The canonical unit quad for one cube face: 4 vertices, 2 triangles,
    /// counter-clockwise seen from outside.
    pub fn unit_quad(face: Face) -> Self {
        let (right, up) = match face {
            Face::PosX => (Vec3::NEG_Z, Vec3::Y),
            Face::NegX => (Vec3::Z, Vec3::Y),
            Face::PosY => (Vec3::X, Vec3::NEG_Z),
            Face::NegY => (Vec3::X, Vec3::Z),
            Face::PosZ => (Vec3::X, Vec3::Y),
            Face::NegZ => (Vec3::NEG_X, Vec3::Y),
        };
        let normal = face.normal();
        let center = normal * 0.5;

        let corner = |u: f32, v: f32| Vertex {
            position: center + right * (u - 0.5) + up * (v - 0.5),
            normal,
            tangent: right,
            bitangent: up,
            uv: Vec2::new(u, v),
        };

        Self {
            vertices: vec![
                corner(0.0, 0.0),
                corner(1.0, 0.0),
                corner(1.0, 1.0),
                corner(0.0, 1.0),
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }
}

/// Flat vertex/index buffers for one chunk, ready for upload.
#[derive(Debug, Clone, Default)]
pub struct ChunkMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Accumulates rotated, translated face geometry. Index rebasing against
/// the running vertex count happens inside `append_face` so callers cannot
/// forget it.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_face(&mut self, face: &FaceMesh, rotation: Quat, translation: Vec3) {
        let base = self.vertices.len() as u32;
        for v in &face.vertices {
            self.vertices.push(Vertex {
                position: rotation * v.position + translation,
                normal: rotation * v.normal,
                tangent: rotation * v.tangent,
                bitangent: rotation * v.bitangent,
                uv: v.uv,
            });
        }
        self.indices.extend(face.indices.iter().map(|i| i + base));
    }

    /// Merges bit-identical vertices and remaps indices. First occurrence
    /// order is kept, so output is deterministic for identical input.
    pub fn build(self) -> ChunkMesh {
        let mut seen: HashMap<[u32; 14], u32> = HashMap::with_capacity(self.vertices.len());
        let mut vertices = Vec::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());

        for v in &self.vertices {
            let next = vertices.len() as u32;
            let slot = *seen.entry(v.bit_key()).or_insert(next);
            if slot == next {
                vertices.push(*v);
            }
            remap.push(slot);
        }

        let indices = self.indices.iter().map(|i| remap[*i as usize]).collect();
        ChunkMesh { vertices, indices }
    }
}

/// Handle for a submitted chunk draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawCallId(pub u64);

/// Narrow surface of the rendering backend: submit an uploaded mesh with a
/// transform, remove it by handle. The chunk system never reaches deeper
/// into the renderer.
pub trait DrawSubmitter {
    fn submit(&mut self, coord: ChunkCoord, mesh: &ChunkMesh, transform: Mat4) -> DrawCallId;
    fn remove(&mut self, id: DrawCallId);
}
