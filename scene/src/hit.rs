#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use glam::DVec3;

use crate::model::{Aabb, PlacedObject};

/// Ray directions closer than this to horizontal never reach the ground.
const PARALLEL_EPSILON: f64 = 1e-12;

/// A half-line in the local scene frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub dir: DVec3,
}

impl Ray {
    #[must_use]
    pub fn new(origin: DVec3, dir: DVec3) -> Self {
        Self { origin, dir }
    }

    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.dir * t
    }

    /// Intersection with the `y = 0` ground plane, in front of the origin.
    ///
    /// The returned point has `y` exactly 0.
    #[must_use]
    pub fn ground_hit(&self) -> Option<DVec3> {
        if self.dir.y.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = -self.origin.y / self.dir.y;
        if t < 0.0 {
            return None;
        }
        let p = self.at(t);
        Some(DVec3::new(p.x, 0.0, p.z))
    }
}

/// Which part of the placed object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    RotateRing,
}

/// Test the pointer ray against the placed object, ring first when selected.
#[must_use]
pub fn hit_test(ray: &Ray, object: &PlacedObject) -> Option<HitPart> {
    if object.selected && ring_hit(ray, object) {
        return Some(HitPart::RotateRing);
    }
    if body_hit(ray, object).is_some() {
        return Some(HitPart::Body);
    }
    None
}

/// Whether the ray's ground intersection falls on the object's ring.
#[must_use]
pub fn ring_hit(ray: &Ray, object: &PlacedObject) -> bool {
    let Some(ground) = ray.ground_hit() else {
        return false;
    };
    let ring = object.ring();
    let r = (ground - object.position).length();
    r >= ring.inner && r <= ring.outer
}

/// Distance along the ray to the object's yaw-rotated bounding box.
#[must_use]
pub fn body_hit(ray: &Ray, object: &PlacedObject) -> Option<f64> {
    let inverse = object.rotation().inverse();
    let local = Ray::new(object.to_model(ray.origin), inverse * ray.dir);
    ray_aabb(&local, &object.pick_bounds())
}

/// Slab test. Returns the entry distance, or 0 when the origin is inside.
#[must_use]
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let origin = ray.origin.to_array();
    let dir = ray.dir.to_array();
    let min = aabb.min.to_array();
    let max = aabb.max.to_array();

    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;
    for axis in 0..3 {
        if dir[axis].abs() < PARALLEL_EPSILON {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let t1 = (min[axis] - origin[axis]) / dir[axis];
        let t2 = (max[axis] - origin[axis]) / dir[axis];
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
        if t_near > t_far {
            return None;
        }
    }
    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Heading from `center` to `point` on the ground, as `atan2(dx, dz)`.
#[must_use]
pub fn ground_angle(center: DVec3, point: DVec3) -> f64 {
    (point.x - center.x).atan2(point.z - center.z)
}
