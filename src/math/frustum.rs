//! View frustum for culling

use crate::core::types::{Vec3, Vec4, Mat4};
use super::aabb::Aabb;

/// A plane defined by normal and distance from origin
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Signed distance from point to plane (positive = in front)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// View frustum with 6 planes (Left, Right, Bottom, Top, Near, Far)
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from view-projection matrix (Gribb/Hartmann).
    ///
    /// The near plane uses row3 + row2, which is exact for [-1, 1] depth and
    /// slightly generous for glam's [0, 1] depth. Either way the test stays
    /// conservative.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let raw = [
            rows[3] + rows[0], // left
            rows[3] - rows[0], // right
            rows[3] + rows[1], // bottom
            rows[3] - rows[1], // top
            rows[3] + rows[2], // near
            rows[3] - rows[2], // far
        ];

        Self {
            planes: raw.map(Self::normalize_plane),
        }
    }

    fn normalize_plane(plane: Vec4) -> Plane {
        let normal = plane.truncate();
        let len = normal.length();
        if len <= f32::EPSILON {
            // Degenerate row: accept everything rather than cull on garbage
            return Plane::new(Vec3::ZERO, 1.0);
        }
        Plane {
            normal: normal / len,
            distance: plane.w / len,
        }
    }

    /// Check if AABB intersects frustum (conservative test)
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            // Find the corner most aligned with plane normal (p-vertex)
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            // If p-vertex is outside, AABB is completely outside
            if plane.distance_to_point(p) < 0.0 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Orthographic camera 500m up, looking straight down, seeing x/z in [-100, 100]
    fn top_down_frustum() -> Frustum {
        let proj = Mat4::orthographic_rh(-100.0, 100.0, -100.0, 100.0, 1.0, 1000.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 500.0, 0.0), Vec3::ZERO, Vec3::Z);
        Frustum::from_view_projection(&(proj * view))
    }

    fn point(p: Vec3) -> Aabb {
        Aabb::new(p, p)
    }

    #[test]
    fn test_plane_distance() {
        let plane = Plane::new(Vec3::Y, 0.0); // XZ plane
        assert_eq!(plane.distance_to_point(Vec3::new(0.0, 5.0, 0.0)), 5.0);
        assert_eq!(plane.distance_to_point(Vec3::new(0.0, -3.0, 0.0)), -3.0);
    }

    #[test]
    fn test_frustum_point_test() {
        let proj = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let frustum = Frustum::from_view_projection(&(proj * view));

        assert!(frustum.intersects_aabb(&point(Vec3::ZERO)));
        assert!(!frustum.intersects_aabb(&point(Vec3::new(5.0, 0.0, 0.0))));
    }

    #[test]
    fn test_aabb_fully_inside() {
        let frustum = top_down_frustum();
        let aabb = Aabb::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 50.0, 10.0));
        assert!(frustum.intersects_aabb(&aabb));
    }

    #[test]
    fn test_aabb_fully_outside() {
        let frustum = top_down_frustum();
        let aabb = Aabb::new(Vec3::new(500.0, 0.0, 500.0), Vec3::new(600.0, 50.0, 600.0));
        assert!(!frustum.intersects_aabb(&aabb));

        let beyond_far = Aabb::new(Vec3::new(-10.0, -900.0, -10.0), Vec3::new(10.0, -800.0, 10.0));
        assert!(!frustum.intersects_aabb(&beyond_far));
    }

    #[test]
    fn test_aabb_partial_overlap_is_kept() {
        let frustum = top_down_frustum();
        let aabb = Aabb::new(Vec3::new(80.0, 0.0, -10.0), Vec3::new(150.0, 50.0, 10.0));
        assert!(frustum.intersects_aabb(&aabb));
    }

    #[test]
    fn test_explicit_planes_box() {
        // Axis-aligned box [-1, 1]^3 expressed as six inward planes
        let frustum = Frustum { planes: [
            Plane::new(Vec3::X, 1.0),
            Plane::new(-Vec3::X, 1.0),
            Plane::new(Vec3::Y, 1.0),
            Plane::new(-Vec3::Y, 1.0),
            Plane::new(Vec3::Z, 1.0),
            Plane::new(-Vec3::Z, 1.0),
        ] };
        assert!(frustum.intersects_aabb(&point(Vec3::splat(0.5))));
        assert!(!frustum.intersects_aabb(&point(Vec3::new(0.0, 2.0, 0.0))));
    }
}
