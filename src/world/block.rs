//! Block-level types: face enumeration, per-face opacity classes and the
//! serialized per-cell state stored in chunk data.
//!
//! Block rotations are always multiples of 90 degrees, so rotating a
//! canonical face normal and snapping it back to the nearest axis is exact.
use glam::{IVec3, Quat, Vec3};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The six canonical block faces, in +X, -X, +Y, -Y, +Z, -Z order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn normal(self) -> Vec3 {
        match self {
            Face::PosX => Vec3::X,
            Face::NegX => Vec3::NEG_X,
            Face::PosY => Vec3::Y,
            Face::NegY => Vec3::NEG_Y,
            Face::PosZ => Vec3::Z,
            Face::NegZ => Vec3::NEG_Z,
        }
    }

    pub fn dir(self) -> IVec3 {
        match self {
            Face::PosX => IVec3::X,
            Face::NegX => IVec3::NEG_X,
            Face::PosY => IVec3::Y,
            Face::NegY => IVec3::NEG_Y,
            Face::PosZ => IVec3::Z,
            Face::NegZ => IVec3::NEG_Z,
        }
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
            Face::PosZ => Face::NegZ,
            Face::NegZ => Face::PosZ,
        }
    }

    pub fn from_dir(dir: IVec3) -> Option<Face> {
        match (dir.x, dir.y, dir.z) {
            (1, 0, 0) => Some(Face::PosX),
            (-1, 0, 0) => Some(Face::NegX),
            (0, 1, 0) => Some(Face::PosY),
            (0, -1, 0) => Some(Face::NegY),
            (0, 0, 1) => Some(Face::PosZ),
            (0, 0, -1) => Some(Face::NegZ),
            _ => None,
        }
    }

    /// The direction this face points once the block's rotation is applied.
    pub fn rotated_dir(self, rotation: Quat) -> IVec3 {
        snap_to_axis(rotation * self.normal())
    }
}

/// Snaps a rotated unit axis back to the axis-aligned direction with the
/// largest magnitude component. Exact for 90-degree rotations.
pub fn snap_to_axis(v: Vec3) -> IVec3 {
    let a = v.abs();
    if a.x >= a.y && a.x >= a.z {
        IVec3::new(v.x.signum() as i32, 0, 0)
    } else if a.y >= a.z {
        IVec3::new(0, v.y.signum() as i32, 0)
    } else {
        IVec3::new(0, 0, v.z.signum() as i32)
    }
}

/// The canonical face of a block with `rotation` that points along
/// `world_dir` once rotated. Used to find which neighbor face touches one
/// of ours: pass the opposed world direction and the neighbor's rotation.
pub fn face_toward(world_dir: IVec3, rotation: Quat) -> Face {
    let local = rotation.inverse() * world_dir.as_vec3();
    // snap_to_axis never yields a zero vector for unit input.
    Face::from_dir(snap_to_axis(local)).unwrap_or(Face::PosX)
}

/// Per-face visibility classification.
///
/// `Open` faces never block the neighbor's face and are always emitted
/// themselves; only `Closed` faces hide the neighbor's touching face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceOpacity {
    Open,
    SemiClosed,
    Closed,
}

/// Per-cell block state: type ID plus orientation. ID 0 is air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerializedBlock {
    pub id: u32,
    pub rotation: Quat,
}

impl SerializedBlock {
    pub fn new(id: u32, rotation: Quat) -> Self {
        Self { id, rotation }
    }

    pub fn unrotated(id: u32) -> Self {
        Self {
            id,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn empty() -> Self {
        Self::unrotated(0)
    }

    pub fn is_air(&self) -> bool {
        self.id == 0
    }
}

impl Default for SerializedBlock {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for SerializedBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let q = self.rotation;
        (self.id, q.x, q.y, q.z, q.w).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SerializedBlock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (id, x, y, z, w) = <(u32, f32, f32, f32, f32)>::deserialize(deserializer)?;
        Ok(SerializedBlock {
            id,
            rotation: Quat::from_xyzw(x, y, z, w),
        })
    }
}
