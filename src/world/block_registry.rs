//! Process-wide registry of block descriptions: per-face opacity classes
//! and pre-authored per-face meshes, read-only at mesh-generation time.
//! Shared via `Arc` into every component that resolves block IDs.
use crate::render::mesh::FaceMesh;
use crate::world::block::{Face, FaceOpacity};
use crate::world::update_block::UpdateBlock;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read block file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse block definition {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("duplicate block ID: {0}")]
    DuplicateId(u32),
    #[error("block ID 0 is reserved for air")]
    ReservedId,
    #[error("unknown face name: {0}")]
    UnknownFace(String),
}

pub type UpdateFactory = fn() -> Box<dyn UpdateBlock>;

/// Static per-type block data.
pub struct BlockDescription {
    pub name: String,
    pub opacity: [FaceOpacity; 6],
    pub face_meshes: [FaceMesh; 6],
    /// Whether placing this block instantiates a live `UpdateBlock`.
    pub wants_update: bool,
    pub update_factory: Option<UpdateFactory>,
}

impl BlockDescription {
    /// The description returned for air and unknown IDs: all faces open,
    /// no geometry, no update object.
    pub fn empty() -> Self {
        Self {
            name: "air".to_string(),
            opacity: [FaceOpacity::Open; 6],
            face_meshes: Default::default(),
            wants_update: false,
            update_factory: None,
        }
    }

    /// A full unit cube with the same opacity on every face.
    pub fn unit_cube(name: impl Into<String>, opacity: FaceOpacity) -> Self {
        Self::with_opacity(name, [opacity; 6])
    }

    pub fn with_opacity(name: impl Into<String>, opacity: [FaceOpacity; 6]) -> Self {
        Self {
            name: name.into(),
            opacity,
            face_meshes: Face::ALL.map(FaceMesh::unit_quad),
            wants_update: false,
            update_factory: None,
        }
    }

    pub fn with_update(mut self, factory: UpdateFactory) -> Self {
        self.wants_update = true;
        self.update_factory = Some(factory);
        self
    }

    pub fn opacity_of(&self, face: Face) -> FaceOpacity {
        self.opacity[face.index()]
    }

    pub fn face_mesh(&self, face: Face) -> &FaceMesh {
        &self.face_meshes[face.index()]
    }
}

/// On-disk block definition. Face meshes are generated as unit-cube quads;
/// authored meshes and update factories come in through `register`.
#[derive(Debug, Deserialize)]
struct RawBlockDefinition {
    id: u32,
    name: String,
    #[serde(default = "default_opacity")]
    opacity: FaceOpacity,
    #[serde(default)]
    faces: HashMap<String, FaceOpacity>,
    #[serde(default)]
    wants_update: bool,
}

fn default_opacity() -> FaceOpacity {
    FaceOpacity::Closed
}

fn face_by_name(name: &str) -> Result<Face, RegistryError> {
    match name {
        "pos_x" => Ok(Face::PosX),
        "neg_x" => Ok(Face::NegX),
        "pos_y" => Ok(Face::PosY),
        "neg_y" => Ok(Face::NegY),
        "pos_z" => Ok(Face::PosZ),
        "neg_z" => Ok(Face::NegZ),
        other => Err(RegistryError::UnknownFace(other.to_string())),
    }
}

pub struct BlockRegistry {
    entries: RwLock<HashMap<u32, Arc<BlockDescription>>>,
    empty: Arc<BlockDescription>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            empty: Arc::new(BlockDescription::empty()),
        }
    }

    pub fn register(&self, id: u32, desc: BlockDescription) -> Result<(), RegistryError> {
        if id == 0 {
            return Err(RegistryError::ReservedId);
        }
        let mut entries = self.entries.write();
        if entries.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        entries.insert(id, Arc::new(desc));
        Ok(())
    }

    /// Never fails: ID 0 and unknown IDs resolve to the empty description.
    pub fn get_desc_or_empty(&self, id: u32) -> Arc<BlockDescription> {
        if id == 0 {
            return self.empty.clone();
        }
        self.entries
            .read()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| self.empty.clone())
    }

    pub fn try_get_description(&self, id: u32) -> Option<Arc<BlockDescription>> {
        self.entries.read().get(&id).cloned()
    }

    /// Loads every `*.json` block definition in a directory. Returns the
    /// number of definitions registered.
    pub fn load_from_dir(&self, dir: &Path) -> Result<usize, RegistryError> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                self.load_block_file(&path)?;
                loaded += 1;
            }
        }
        log::info!("registered {loaded} block definitions from {}", dir.display());
        Ok(loaded)
    }

    fn load_block_file(&self, path: &Path) -> Result<(), RegistryError> {
        let contents = fs::read_to_string(path)?;
        let raw: RawBlockDefinition =
            serde_json::from_str(&contents).map_err(|source| RegistryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut opacity = [raw.opacity; 6];
        for (face_name, class) in &raw.faces {
            opacity[face_by_name(face_name)?.index()] = *class;
        }

        let mut desc = BlockDescription::with_opacity(raw.name, opacity);
        desc.wants_update = raw.wants_update;
        self.register(raw.id, desc)
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
