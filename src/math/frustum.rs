//! View frustum for culling

use crate::core::types::{Vec3, Vec4, Mat4};
use super::aabb::Aabb;

/// A plane in Hessian normal form (positive side = in front)
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Signed distance from point to plane (positive = in front)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}

/// 6-plane view frustum (left, right, bottom, top, near, far)
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    /// Uses the Gribb/Hartmann method; planes are normalized.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [
            Vec4::new(vp.col(0).x, vp.col(1).x, vp.col(2).x, vp.col(3).x),
            Vec4::new(vp.col(0).y, vp.col(1).y, vp.col(2).y, vp.col(3).y),
            Vec4::new(vp.col(0).z, vp.col(1).z, vp.col(2).z, vp.col(3).z),
            Vec4::new(vp.col(0).w, vp.col(1).w, vp.col(2).w, vp.col(3).w),
        ];

        let raw = [
            rows[3] + rows[0], // left
            rows[3] - rows[0], // right
            rows[3] + rows[1], // bottom
            rows[3] - rows[1], // top
            rows[3] + rows[2], // near
            rows[3] - rows[2], // far
        ];

        let mut planes = [Plane::new(Vec3::ZERO, 0.0); 6];

        for (i, r) in raw.iter().enumerate() {
            let normal = Vec3::new(r.x, r.y, r.z);
            let len = normal.length();
            if len > 0.0 {
                planes[i] = Plane::new(normal / len, r.w / len);
            }
        }

        Self { planes }
    }

    /// Check if point is inside the frustum
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.distance_to_point(point) >= 0.0)
    }

    /// Test if an AABB intersects the frustum (conservative).
    /// Returns true if the AABB is at least partially inside.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            // Positive vertex: the corner most aligned with the plane normal
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            // Positive vertex behind the plane means the box is fully outside
            if plane.distance_to_point(p) < 0.0 {
                return false;
            }
        }
        true
    }
}
