//! Static collision shapes for chunk geometry.
//!
//! Chunk meshing hands its de-duplicated position/index buffers here; the
//! physics engine turns them into a BVH-accelerated static triangle mesh.
//! The rest of the engine only sees opaque collider handles and layer
//! bitmasks.
use bitflags::bitflags;
use glam::Vec3;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision group/mask bits, passed through to the physics engine
    /// unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        const ENVIRONMENT    = 0b0001;
        const PLAYER         = 0b0010;
        const ENTITY_GENERAL = 0b0100;
        const TRIGGER        = 0b1000;
    }
}

impl CollisionLayers {
    fn to_group(self) -> Group {
        Group::from_bits_truncate(self.bits())
    }
}

/// Owns the physics engine's collider storage for the chunk world.
pub struct CollisionWorld {
    colliders: ColliderSet,
    bodies: RigidBodySet,
    islands: IslandManager,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self {
            colliders: ColliderSet::new(),
            bodies: RigidBodySet::new(),
            islands: IslandManager::new(),
        }
    }

    /// Registers a static triangle-mesh collider at `origin`. Empty
    /// geometry yields `None`: a chunk of pure air or sealed interior has
    /// no collision shape. The empty check also keeps the trimesh
    /// constructor away from the zero-triangle case it cannot handle.
    pub fn add_static_trimesh(
        &mut self,
        origin: Vec3,
        positions: &[Vec3],
        indices: &[[u32; 3]],
        memberships: CollisionLayers,
        filter: CollisionLayers,
    ) -> Option<ColliderHandle> {
        if positions.is_empty() || indices.is_empty() {
            return None;
        }

        let vertices: Vec<Point<Real>> =
            positions.iter().map(|p| point![p.x, p.y, p.z]).collect();
        let shape = SharedShape::trimesh(vertices, indices.to_vec());

        let collider = ColliderBuilder::new(shape)
            .translation(vector![origin.x, origin.y, origin.z])
            .collision_groups(InteractionGroups::new(
                memberships.to_group(),
                filter.to_group(),
            ))
            .build();
        Some(self.colliders.insert(collider))
    }

    pub fn remove(&mut self, handle: ColliderHandle) {
        self.colliders
            .remove(handle, &mut self.islands, &mut self.bodies, false);
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> (Vec<Vec3>, Vec<[u32; 3]>) {
        (
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn empty_geometry_produces_no_collider() {
        let mut world = CollisionWorld::new();
        let handle = world.add_static_trimesh(
            Vec3::ZERO,
            &[],
            &[],
            CollisionLayers::ENVIRONMENT,
            CollisionLayers::all(),
        );
        assert!(handle.is_none());
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn trimesh_collider_round_trip() {
        let mut world = CollisionWorld::new();
        let (positions, indices) = unit_triangle();
        let handle = world
            .add_static_trimesh(
                Vec3::new(10.0, 0.0, 0.0),
                &positions,
                &indices,
                CollisionLayers::ENVIRONMENT,
                CollisionLayers::PLAYER | CollisionLayers::ENTITY_GENERAL,
            )
            .unwrap();
        assert_eq!(world.collider_count(), 1);

        world.remove(handle);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn cube_buffers_build_a_collider() {
        // Eight corners and twelve triangles, the shape a meshed single
        // block hands over.
        let positions: Vec<Vec3> = (0..8)
            .map(|i| {
                Vec3::new(
                    (i & 1) as f32,
                    ((i >> 1) & 1) as f32,
                    ((i >> 2) & 1) as f32,
                )
            })
            .collect();
        let indices = vec![
            [0, 2, 3],
            [0, 3, 1],
            [4, 5, 7],
            [4, 7, 6],
            [0, 1, 5],
            [0, 5, 4],
            [2, 6, 7],
            [2, 7, 3],
            [0, 4, 6],
            [0, 6, 2],
            [1, 3, 7],
            [1, 7, 5],
        ];

        let mut world = CollisionWorld::new();
        let handle = world
            .add_static_trimesh(
                Vec3::ZERO,
                &positions,
                &indices,
                CollisionLayers::ENVIRONMENT,
                CollisionLayers::all(),
            )
            .unwrap();
        assert!(world.colliders().get(handle).is_some());
        assert_eq!(world.collider_count(), 1);
    }

    #[test]
    fn layer_bits_survive_the_group_conversion() {
        let layers = CollisionLayers::PLAYER | CollisionLayers::TRIGGER;
        assert_eq!(layers.to_group().bits(), layers.bits());
    }
}
