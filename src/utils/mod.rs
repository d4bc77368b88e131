pub mod math;

pub use math::{Aabb, CameraFrustum, Frustum, Plane, Sphere};
