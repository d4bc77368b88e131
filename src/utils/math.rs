//! Geometric primitives backing frustum culling.
use glam::{Mat4, Vec3};

/// Geometric plane in normal/distance form. Signed distance of a point is
/// `normal.dot(p) - distance`; negative means behind the plane.
///
/// Planes are assumed unit-normal; `Frustum::from_view_proj` normalizes
/// during extraction.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    pub fn behind_point(&self, point: Vec3) -> bool {
        self.signed_distance(point) < 0.0
    }

    /// The sphere is behind the plane only if its furthest extent toward the
    /// plane is still behind it.
    pub fn behind_sphere(&self, sphere: &Sphere) -> bool {
        self.signed_distance(sphere.center) < -sphere.radius
    }

    /// Conservative: a box is only rejected when all 8 corners are behind.
    pub fn behind_box(&self, corners: &[Vec3; 8]) -> bool {
        corners.iter().all(|c| self.behind_point(*c))
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::ZERO,
            distance: 0.0,
        }
    }
}

/// Bounding sphere.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn intersects(&self, other: &Sphere) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// View frustum: Left, Right, Bottom, Top, Near, Far planes, inside when
/// not behind any of them.
#[derive(Debug, Clone)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extracts the 6 frustum planes from a view-projection matrix
    /// (Gribb-Hartmann). Returns `None` for a non-invertible matrix; the
    /// caller keeps its previous frustum for the frame.
    pub fn from_view_proj(vp: &Mat4) -> Option<Self> {
        if vp.determinant().abs() < f32::EPSILON {
            log::warn!("refusing frustum extraction from a degenerate view-projection matrix");
            return None;
        }

        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];
        // Gribb-Hartmann for glam's 0..1 clip depth: inside is 0 <= z_clip,
        // so the near plane is row 2 alone rather than the -1..1 form
        // w + z.
        let raw = [
            rows[3] + rows[0], // left
            rows[3] - rows[0], // right
            rows[3] + rows[1], // bottom
            rows[3] - rows[1], // top
            rows[2],           // near
            rows[3] - rows[2], // far
        ];

        let mut planes = [Plane::default(); 6];
        for (plane, r) in planes.iter_mut().zip(raw) {
            let normal = Vec3::new(r.x, r.y, r.z);
            let length = normal.length();
            if length < f32::EPSILON {
                return None;
            }
            // Row form is n.p + w >= 0 inside; our convention is
            // n.p - distance >= 0, so distance = -w.
            plane.normal = normal / length;
            plane.distance = -r.w / length;
        }
        Some(Self { planes })
    }

    pub fn contains_sphere(&self, sphere: &Sphere) -> bool {
        !self.planes.iter().any(|plane| plane.behind_sphere(sphere))
    }

    pub fn contains_box(&self, corners: &[Vec3; 8]) -> bool {
        !self.planes.iter().any(|plane| plane.behind_box(corners))
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        !self.planes.iter().any(|plane| plane.behind_point(point))
    }
}

/// A frustum bundled with an encasing bounding sphere used as a cheap
/// early reject before the 6-plane test. A non-positive radius means the
/// sphere was never computed and the full test runs directly.
#[derive(Debug, Clone)]
pub struct CameraFrustum {
    pub frustum: Frustum,
    pub bounding_sphere: Sphere,
}

impl CameraFrustum {
    pub fn new(frustum: Frustum) -> Self {
        Self {
            frustum,
            bounding_sphere: Sphere::new(Vec3::ZERO, 0.0),
        }
    }

    pub fn with_bounding_sphere(frustum: Frustum, bounding_sphere: Sphere) -> Self {
        Self {
            frustum,
            bounding_sphere,
        }
    }

    pub fn contains_sphere(&self, sphere: &Sphere) -> bool {
        if self.bounding_sphere.radius > 0.0 && !self.bounding_sphere.intersects(sphere) {
            return false;
        }
        self.frustum.contains_sphere(sphere)
    }

    pub fn contains_box(&self, corners: &[Vec3; 8]) -> bool {
        self.frustum.contains_box(corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Axis-aligned box frustum spanning [-10,10] on every axis.
    fn box_frustum() -> Frustum {
        Frustum::new([
            Plane::new(Vec3::X, -10.0),
            Plane::new(Vec3::NEG_X, -10.0),
            Plane::new(Vec3::Y, -10.0),
            Plane::new(Vec3::NEG_Y, -10.0),
            Plane::new(Vec3::Z, -10.0),
            Plane::new(Vec3::NEG_Z, -10.0),
        ])
    }

    #[test]
    fn sphere_inside_all_planes_is_contained() {
        let frustum = box_frustum();
        assert!(frustum.contains_sphere(&Sphere::new(Vec3::ZERO, 1.0)));
        assert!(frustum.contains_sphere(&Sphere::new(Vec3::new(8.0, 8.0, 8.0), 1.0)));
    }

    #[test]
    fn sphere_fully_behind_one_plane_is_rejected() {
        let frustum = box_frustum();
        // 15 units past the +X plane with radius 2: distance -25 < -2.
        assert!(!frustum.contains_sphere(&Sphere::new(Vec3::new(25.0, 0.0, 0.0), 2.0)));
    }

    #[test]
    fn straddling_sphere_is_kept() {
        let frustum = box_frustum();
        assert!(frustum.contains_sphere(&Sphere::new(Vec3::new(10.5, 0.0, 0.0), 2.0)));
    }

    #[test]
    fn box_rejected_only_when_all_corners_behind() {
        let frustum = box_frustum();
        let outside = Aabb::new(Vec3::splat(20.0), Vec3::splat(30.0));
        assert!(!frustum.contains_box(&outside.corners()));

        let straddling = Aabb::new(Vec3::splat(5.0), Vec3::splat(15.0));
        assert!(frustum.contains_box(&straddling.corners()));
    }

    #[test]
    fn camera_sphere_early_reject() {
        let camera =
            CameraFrustum::with_bounding_sphere(box_frustum(), Sphere::new(Vec3::ZERO, 20.0));
        // Far outside the encasing sphere: rejected before any plane test.
        assert!(!camera.contains_sphere(&Sphere::new(Vec3::new(100.0, 0.0, 0.0), 1.0)));
        assert!(camera.contains_sphere(&Sphere::new(Vec3::ZERO, 1.0)));
    }

    #[test]
    fn camera_without_sphere_falls_through_to_plane_test() {
        let camera = CameraFrustum::new(box_frustum());
        assert!(camera.contains_sphere(&Sphere::new(Vec3::ZERO, 1.0)));
        assert!(!camera.contains_sphere(&Sphere::new(Vec3::new(100.0, 0.0, 0.0), 1.0)));
    }

    #[test]
    fn degenerate_view_proj_is_refused() {
        assert!(Frustum::from_view_proj(&Mat4::ZERO).is_none());
    }

    #[test]
    fn perspective_view_proj_extraction() {
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let frustum = Frustum::from_view_proj(&(proj * view)).unwrap();

        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -10.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 10.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -200.0)));
    }

    #[test]
    fn near_plane_sits_at_the_near_distance() {
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let frustum = Frustum::from_view_proj(&(proj * view)).unwrap();

        // Between the camera and the near distance: outside.
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -0.06)));
        // Just beyond the near distance: inside.
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -0.15)));
    }
}
