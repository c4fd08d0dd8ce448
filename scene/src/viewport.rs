//! Viewport state and the map camera model.
//!
//! The map library owns the real camera; this module mirrors it closely
//! enough to cast pick rays into the local scene frame. The camera looks at
//! the ground point under the viewport center (the local origin) from
//! `CAMERA_DISTANCE_RATIO` viewport heights away, tilted by `pitch` and turned
//! by `bearing`, with the vertical field of view that distance implies.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CAMERA_DISTANCE_RATIO, EARTH_CIRCUMFERENCE_M, INITIAL_BEARING_DEG, INITIAL_LAT, INITIAL_LNG, INITIAL_PITCH_DEG,
    INITIAL_ZOOM, TILE_SIZE_PX,
};
use crate::geo::{LngLat, local_to_lnglat};
use crate::hit::Ray;

/// Steepest pitch the map allows, in degrees.
pub const MAX_PITCH_DEG: f64 = 85.0;

/// A point in screen space (CSS pixels, origin at the canvas top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Camera parameters of the map viewport.
///
/// `pitch` is degrees away from straight down, `bearing` degrees clockwise
/// from north. `center` doubles as the anchor of the local scene frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: LngLat::new(INITIAL_LNG, INITIAL_LAT),
            zoom: INITIAL_ZOOM,
            pitch: INITIAL_PITCH_DEG,
            bearing: INITIAL_BEARING_DEG,
        }
    }
}

impl Viewport {
    /// Ground meters covered by one CSS pixel at the viewport center.
    #[must_use]
    pub fn meters_per_pixel(&self) -> f64 {
        EARTH_CIRCUMFERENCE_M * self.center.lat.to_radians().cos() / (TILE_SIZE_PX * self.zoom.exp2())
    }
}

/// Canvas dimensions in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

/// Perspective camera in the local scene frame.
#[derive(Debug, Clone, Copy)]
pub struct MapCamera {
    pub eye: DVec3,
    pub forward: DVec3,
    pub right: DVec3,
    pub up: DVec3,
    tan_half_fov: f64,
    width: f64,
    height: f64,
}

impl MapCamera {
    /// Build the camera for `viewport` drawn into a canvas of `size`.
    ///
    /// Returns `None` while the canvas has no area.
    #[must_use]
    pub fn new(viewport: &Viewport, size: ViewportSize) -> Option<Self> {
        if size.width <= 0.0 || size.height <= 0.0 {
            return None;
        }
        let distance = CAMERA_DISTANCE_RATIO * size.height * viewport.meters_per_pixel();
        let pitch = viewport.pitch.clamp(0.0, MAX_PITCH_DEG).to_radians();
        let bearing = viewport.bearing.to_radians();

        // Ground direction that points toward the top of the screen.
        let heading = DVec3::new(bearing.sin(), 0.0, -bearing.cos());
        let eye = -heading * (distance * pitch.sin()) + DVec3::Y * (distance * pitch.cos());
        let forward = heading * pitch.sin() - DVec3::Y * pitch.cos();
        let up = heading * pitch.cos() + DVec3::Y * pitch.sin();
        let right = forward.cross(up);

        Some(Self {
            eye,
            forward,
            right,
            up,
            tan_half_fov: 0.5 / CAMERA_DISTANCE_RATIO,
            width: size.width,
            height: size.height,
        })
    }

    /// Pick ray through a screen point.
    #[must_use]
    pub fn ray(&self, screen: Point) -> Ray {
        let ndc_x = 2.0 * screen.x / self.width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / self.height;
        let aspect = self.width / self.height;
        let dir = self.forward
            + self.right * (ndc_x * self.tan_half_fov * aspect)
            + self.up * (ndc_y * self.tan_half_fov);
        Ray::new(self.eye, dir.normalize())
    }
}

/// Screen-to-map projection supplied by the map surface.
pub trait MapProjection {
    /// Geographic origin of the local scene frame.
    fn anchor(&self) -> LngLat;

    /// Pick ray through a screen point, in the local scene frame.
    fn ray(&self, screen: Point) -> Option<Ray>;

    /// Geographic coordinate of the ground under a screen point, or `None`
    /// when the point is above the horizon.
    fn unproject(&self, screen: Point) -> Option<LngLat> {
        let ground = self.ray(screen)?.ground_hit()?;
        Some(local_to_lnglat(ground, self.anchor()))
    }
}

/// The engine's own projection: the mirrored viewport and canvas size.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapView {
    pub viewport: Viewport,
    pub size: ViewportSize,
}

impl MapView {
    #[must_use]
    pub fn camera(&self) -> Option<MapCamera> {
        MapCamera::new(&self.viewport, self.size)
    }
}

impl MapProjection for MapView {
    fn anchor(&self) -> LngLat {
        self.viewport.center
    }

    fn ray(&self, screen: Point) -> Option<Ray> {
        self.camera().map(|camera| camera.ray(screen))
    }
}
