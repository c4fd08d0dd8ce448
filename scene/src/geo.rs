//! Geographic coordinates and the local scene frame.
//!
//! The scene is a flat, meter-scaled frame centered on an anchor coordinate:
//! x points east, y points up, z points south (the direction Web Mercator y
//! grows). Conversions go through normalized Mercator coordinates, scaled by
//! the anchor's meters-per-unit, so `lnglat_to_local` and `local_to_lnglat`
//! are exact inverses for a fixed anchor.

#[cfg(test)]
#[path = "geo_test.rs"]
mod geo_test;

use std::f64::consts::{FRAC_PI_4, PI};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::consts::{EARTH_CIRCUMFERENCE_M, MAX_MERCATOR_LAT};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// A point in normalized Web Mercator space: `(0, 0)` is the north-west
/// corner of the world, `(1, 1)` the south-east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorCoordinate {
    pub x: f64,
    pub y: f64,
}

impl MercatorCoordinate {
    #[must_use]
    pub fn from_lnglat(geo: LngLat) -> Self {
        let lat = geo.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        Self {
            x: (geo.lng + 180.0) / 360.0,
            y: (1.0 - (FRAC_PI_4 + lat / 2.0).tan().ln() / PI) / 2.0,
        }
    }

    #[must_use]
    pub fn to_lnglat(self) -> LngLat {
        let lat = (2.0 * (PI * (1.0 - 2.0 * self.y)).exp().atan() - PI / 2.0).to_degrees();
        LngLat { lng: self.x * 360.0 - 180.0, lat }
    }
}

/// Meters covered by one normalized Mercator unit at `lat` degrees.
#[must_use]
pub fn meters_per_mercator_unit(lat: f64) -> f64 {
    EARTH_CIRCUMFERENCE_M * lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians().cos()
}

/// Convert a geographic coordinate to a ground-plane offset from `anchor`.
///
/// The result always has `y == 0`.
#[must_use]
pub fn lnglat_to_local(geo: LngLat, anchor: LngLat) -> DVec3 {
    let scale = meters_per_mercator_unit(anchor.lat);
    let point = MercatorCoordinate::from_lnglat(geo);
    let origin = MercatorCoordinate::from_lnglat(anchor);
    DVec3::new((point.x - origin.x) * scale, 0.0, (point.y - origin.y) * scale)
}

/// Convert a ground-plane offset from `anchor` back to a geographic coordinate.
#[must_use]
pub fn local_to_lnglat(local: DVec3, anchor: LngLat) -> LngLat {
    let scale = meters_per_mercator_unit(anchor.lat);
    let origin = MercatorCoordinate::from_lnglat(anchor);
    MercatorCoordinate { x: origin.x + local.x / scale, y: origin.y + local.z / scale }.to_lnglat()
}
