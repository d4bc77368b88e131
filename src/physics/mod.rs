pub mod collision;

pub use collision::{CollisionLayers, CollisionWorld};
