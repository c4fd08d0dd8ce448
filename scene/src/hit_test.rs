use std::cell::Cell;
use std::f64::consts::{FRAC_PI_2, PI};
use std::rc::Rc;

use super::*;
use crate::model::{AssetResource, ScopedAsset};

struct Noop(Rc<Cell<bool>>);

impl AssetResource for Noop {
    fn release(&mut self) {
        self.0.set(true);
    }
}

fn object(bounds: Aabb) -> PlacedObject {
    let asset = ScopedAsset::new(Box::new(Noop(Rc::new(Cell::new(false)))));
    PlacedObject::new(DVec3::ZERO, Some(bounds), asset)
}

fn two_meter_box() -> Aabb {
    Aabb::new(DVec3::new(-1.0, 0.0, -1.0), DVec3::new(1.0, 2.0, 1.0))
}

fn down_at(x: f64, z: f64) -> Ray {
    Ray::new(DVec3::new(x, 50.0, z), DVec3::NEG_Y)
}

// =============================================================
// Ground plane
// =============================================================

#[test]
fn ground_hit_straight_down() {
    let hit = down_at(3.0, -4.0).ground_hit().unwrap();
    assert_eq!(hit, DVec3::new(3.0, 0.0, -4.0));
}

#[test]
fn ground_hit_result_is_exactly_on_plane() {
    let ray = Ray::new(DVec3::new(0.1, 17.3, 0.7), DVec3::new(0.31, -0.123, 0.942).normalize());
    assert_eq!(ray.ground_hit().unwrap().y, 0.0);
}

#[test]
fn ground_hit_parallel_misses() {
    let ray = Ray::new(DVec3::new(0.0, 5.0, 0.0), DVec3::X);
    assert!(ray.ground_hit().is_none());
}

#[test]
fn ground_hit_behind_origin_misses() {
    let ray = Ray::new(DVec3::new(0.0, 5.0, 0.0), DVec3::Y);
    assert!(ray.ground_hit().is_none());
}

// =============================================================
// Slab test
// =============================================================

#[test]
fn ray_aabb_entry_distance() {
    let t = ray_aabb(&down_at(0.0, 0.0), &two_meter_box()).unwrap();
    assert!((t - 48.0).abs() < 1e-12);
}

#[test]
fn ray_aabb_miss_beside_box() {
    assert!(ray_aabb(&down_at(1.5, 0.0), &two_meter_box()).is_none());
}

#[test]
fn ray_aabb_from_inside_is_zero() {
    let ray = Ray::new(DVec3::new(0.0, 1.0, 0.0), DVec3::X);
    assert_eq!(ray_aabb(&ray, &two_meter_box()), Some(0.0));
}

#[test]
fn ray_aabb_box_behind_misses() {
    let ray = Ray::new(DVec3::new(0.0, 1.0, 5.0), DVec3::Z);
    assert!(ray_aabb(&ray, &two_meter_box()).is_none());
}

// =============================================================
// Object picking
// =============================================================

#[test]
fn body_hit_accounts_for_yaw() {
    let mut o = object(Aabb::new(DVec3::new(-3.0, 0.0, -0.5), DVec3::new(3.0, 1.0, 0.5)));
    assert!(body_hit(&down_at(2.5, 0.0), &o).is_some());
    assert!(body_hit(&down_at(0.0, 2.5), &o).is_none());

    o.yaw = FRAC_PI_2;
    assert!(body_hit(&down_at(2.5, 0.0), &o).is_none());
    assert!(body_hit(&down_at(0.0, 2.5), &o).is_some());
}

#[test]
fn body_hit_follows_position() {
    let mut o = object(two_meter_box());
    o.set_ground_position(20.0, 0.0);
    assert!(body_hit(&down_at(0.0, 0.0), &o).is_none());
    assert!(body_hit(&down_at(20.5, 0.0), &o).is_some());
}

#[test]
fn ring_hit_between_radii() {
    let o = object(two_meter_box());
    // Footprint 2: ring spans 2.8 to 3.64.
    assert!(!ring_hit(&down_at(2.5, 0.0), &o));
    assert!(ring_hit(&down_at(0.0, 3.0), &o));
    assert!(ring_hit(&down_at(-2.4, -2.4), &o));
    assert!(!ring_hit(&down_at(4.0, 0.0), &o));
}

#[test]
fn hit_test_ignores_ring_until_selected() {
    let mut o = object(two_meter_box());
    assert_eq!(hit_test(&down_at(3.0, 0.0), &o), None);
    o.selected = true;
    assert_eq!(hit_test(&down_at(3.0, 0.0), &o), Some(HitPart::RotateRing));
}

#[test]
fn hit_test_body() {
    let o = object(two_meter_box());
    assert_eq!(hit_test(&down_at(0.2, 0.2), &o), Some(HitPart::Body));
    assert_eq!(hit_test(&down_at(9.0, 9.0), &o), None);
}

#[test]
fn hit_test_prefers_ring_over_body() {
    // A tall thin box whose top overhangs the ring when seen at a slant.
    let mut o = object(Aabb::new(DVec3::new(-1.0, 0.0, -1.0), DVec3::new(1.0, 40.0, 1.0)));
    o.selected = true;
    let origin = DVec3::new(-20.0, 60.0, 0.0);
    let target = DVec3::new(3.0, 0.0, 0.0);
    let ray = Ray::new(origin, (target - origin).normalize());
    assert!(body_hit(&ray, &o).is_some());
    assert_eq!(hit_test(&ray, &o), Some(HitPart::RotateRing));
}

// =============================================================
// Ground angle
// =============================================================

#[test]
fn ground_angle_quadrants() {
    let c = DVec3::ZERO;
    assert!((ground_angle(c, DVec3::new(0.0, 0.0, 1.0)) - 0.0).abs() < 1e-12);
    assert!((ground_angle(c, DVec3::new(1.0, 0.0, 0.0)) - FRAC_PI_2).abs() < 1e-12);
    assert!((ground_angle(c, DVec3::new(0.0, 0.0, -1.0)).abs() - PI).abs() < 1e-12);
}

#[test]
fn ground_angle_ignores_height() {
    let a = ground_angle(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0));
    let b = ground_angle(DVec3::new(0.0, 9.0, 0.0), DVec3::new(1.0, -3.0, 1.0));
    assert!((a - b).abs() < 1e-12);
}
