//! Shared numeric constants for the scene crate.

// ── Earth / map model ───────────────────────────────────────────

/// Equatorial circumference of the Web Mercator sphere, in meters.
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// Tile edge length the map's zoom levels are defined against, in pixels.
pub const TILE_SIZE_PX: f64 = 512.0;

/// Latitude clamp of the Web Mercator projection, in degrees.
pub const MAX_MERCATOR_LAT: f64 = 85.051_129;

/// Camera distance from the center ground point, in viewport heights.
pub const CAMERA_DISTANCE_RATIO: f64 = 1.5;

// ── Initial viewport ────────────────────────────────────────────

pub const INITIAL_LNG: f64 = -122.4194;
pub const INITIAL_LAT: f64 = 37.7749;
pub const INITIAL_ZOOM: f64 = 18.0;
pub const INITIAL_PITCH_DEG: f64 = 60.0;
pub const INITIAL_BEARING_DEG: f64 = 0.0;

// ── Models ──────────────────────────────────────────────────────

/// File extension accepted by the drop target, lowercase with the dot.
pub const MODEL_EXTENSION: &str = ".glb";

/// Footprint edge used when a model has no bounding box yet, in meters.
pub const DEFAULT_FOOTPRINT_M: f64 = 1.0;

// ── Selection ring ──────────────────────────────────────────────

/// Ring inner radius as a multiple of the largest horizontal dimension.
pub const RING_INNER_RATIO: f64 = 1.4;

/// Ring outer radius as a multiple of the largest horizontal dimension.
pub const RING_OUTER_RATIO: f64 = 1.82;

// ── Capture ─────────────────────────────────────────────────────

/// MIME type requested when reading back the composite canvas.
pub const CAPTURE_MIME: &str = "image/png";
