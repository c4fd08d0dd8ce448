//! Placed model: the single 3D object standing on the map.
//!
//! This module defines the object the user manipulates (`PlacedObject`), its
//! local-space bounding box (`Aabb`), the selection visuals derived from it
//! (`SelectionGizmo`), and the scoped handle (`ScopedAsset`) that keeps the
//! browser resource backing a loaded model alive exactly as long as the
//! object (or its pending load) exists.
//!
//! Bounding boxes normally come from the host's 3D loader. `gltf_bounds`
//! computes the same box from the raw `.glb` bytes for hosts that do not.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use glam::{DMat4, DQuat, DVec3};
use uuid::Uuid;

use crate::consts::{DEFAULT_FOOTPRINT_M, MODEL_EXTENSION, RING_INNER_RATIO, RING_OUTER_RATIO};

/// Unique identifier for a placed object.
pub type ObjectId = Uuid;

/// Sequence number correlating a drop with its asynchronous load.
pub type LoadTicket = u64;

// =============================================================
// Bounds
// =============================================================

/// Axis-aligned bounding box in model-local meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    #[must_use]
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }

    /// A `DEFAULT_FOOTPRINT_M` cube standing on the ground at the origin.
    #[must_use]
    pub fn fallback() -> Self {
        let half = DEFAULT_FOOTPRINT_M / 2.0;
        Self::new(DVec3::new(-half, 0.0, -half), DVec3::new(half, DEFAULT_FOOTPRINT_M, half))
    }

    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Largest horizontal dimension (x or z).
    #[must_use]
    pub fn footprint(&self) -> f64 {
        let size = self.size();
        size.x.max(size.z)
    }

    pub fn extend(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(b.x, b.y, b.z),
            DVec3::new(a.x, b.y, b.z),
        ]
    }
}

// =============================================================
// Scoped asset handle
// =============================================================

/// A transient browser resource backing a loaded model (an object URL).
pub trait AssetResource {
    /// Free the resource. Called exactly once.
    fn release(&mut self);
}

/// Owns one `AssetResource` and releases it on replacement or drop.
pub struct ScopedAsset {
    inner: Option<Box<dyn AssetResource>>,
}

impl ScopedAsset {
    #[must_use]
    pub fn new(resource: Box<dyn AssetResource>) -> Self {
        Self { inner: Some(resource) }
    }

    /// Release now. Later calls (and the eventual drop) are no-ops.
    pub fn release(&mut self) {
        if let Some(mut resource) = self.inner.take() {
            resource.release();
        }
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.inner.is_some()
    }
}

impl Drop for ScopedAsset {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ScopedAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedAsset").field("held", &self.is_held()).finish()
    }
}

/// Whether a dropped file name is a loadable model (`.glb`, any case).
#[must_use]
pub fn is_model_file(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(MODEL_EXTENSION)
}

// =============================================================
// Placed object
// =============================================================

/// Inner and outer radius of the rotate ring, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub inner: f64,
    pub outer: f64,
}

/// Selection visuals: wireframe box corners and the ground ring, in the
/// local scene frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionGizmo {
    pub box_corners: [DVec3; 8],
    pub ring_center: DVec3,
    pub ring: Ring,
}

/// The model currently standing on the map.
#[derive(Debug)]
pub struct PlacedObject {
    pub id: ObjectId,
    /// Position of the model origin in the local scene frame. `y` is always 0.
    pub position: DVec3,
    /// Rotation about the vertical axis, in radians.
    pub yaw: f64,
    pub selected: bool,
    /// Model-local bounding box, once the loader has computed one.
    pub bounds: Option<Aabb>,
    asset: ScopedAsset,
}

impl PlacedObject {
    #[must_use]
    pub fn new(position: DVec3, bounds: Option<Aabb>, asset: ScopedAsset) -> Self {
        Self { id: Uuid::new_v4(), position: DVec3::new(position.x, 0.0, position.z), yaw: 0.0, selected: false, bounds, asset }
    }

    /// Move the model origin, pinning it to the ground plane.
    pub fn set_ground_position(&mut self, x: f64, z: f64) {
        self.position = DVec3::new(x, 0.0, z);
    }

    /// Bounding box used for picking: the loaded one, or the fallback cube.
    #[must_use]
    pub fn pick_bounds(&self) -> Aabb {
        self.bounds.unwrap_or_else(Aabb::fallback)
    }

    /// Largest horizontal dimension, or the default footprint when unknown.
    #[must_use]
    pub fn footprint(&self) -> f64 {
        self.bounds
            .map(|b| b.footprint())
            .filter(|f| *f > 0.0)
            .unwrap_or(DEFAULT_FOOTPRINT_M)
    }

    #[must_use]
    pub fn ring(&self) -> Ring {
        let footprint = self.footprint();
        Ring { inner: footprint * RING_INNER_RATIO, outer: footprint * RING_OUTER_RATIO }
    }

    #[must_use]
    pub fn rotation(&self) -> DQuat {
        DQuat::from_rotation_y(self.yaw)
    }

    /// Model-local point to the local scene frame.
    #[must_use]
    pub fn to_scene(&self, local: DVec3) -> DVec3 {
        self.position + self.rotation() * local
    }

    /// Local scene frame point to model-local coordinates.
    #[must_use]
    pub fn to_model(&self, scene: DVec3) -> DVec3 {
        self.rotation().inverse() * (scene - self.position)
    }

    /// Selection visuals, present only while selected.
    #[must_use]
    pub fn gizmo(&self) -> Option<SelectionGizmo> {
        if !self.selected {
            return None;
        }
        let box_corners = self.pick_bounds().corners().map(|c| self.to_scene(c));
        Some(SelectionGizmo { box_corners, ring_center: self.position, ring: self.ring() })
    }

    #[must_use]
    pub fn holds_asset(&self) -> bool {
        self.asset.is_held()
    }
}

/// A dropped model whose asset is still loading.
#[derive(Debug)]
pub struct PendingModel {
    pub ticket: LoadTicket,
    pub file_name: String,
    pub position: DVec3,
    pub asset: ScopedAsset,
}

impl PendingModel {
    /// Finish loading: the pending handle moves into the placed object.
    #[must_use]
    pub fn into_placed(self, bounds: Option<Aabb>) -> PlacedObject {
        PlacedObject::new(self.position, bounds, self.asset)
    }
}

// =============================================================
// glTF bounds
// =============================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("glTF parse failed: {0}")]
    Parse(String),
    #[error("glTF document has no scene")]
    NoScene,
    #[error("glTF scene has no positioned geometry")]
    NoGeometry,
}

/// Scene bounding box of a glTF / GLB document, in model meters.
///
/// Uses the `POSITION` accessor min/max of every primitive, carried through
/// the node hierarchy's transforms. Buffers are not read.
///
/// # Errors
///
/// Returns [`ModelError`] if the document does not parse or contains no
/// positioned geometry.
pub fn gltf_bounds(bytes: &[u8]) -> Result<Aabb, ModelError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| ModelError::Parse(e.to_string()))?;
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or(ModelError::NoScene)?;

    let mut bounds = None;
    for node in scene.nodes() {
        accumulate_node(&node, DMat4::IDENTITY, &mut bounds);
    }
    bounds.ok_or(ModelError::NoGeometry)
}

fn accumulate_node(node: &gltf::Node<'_>, parent: DMat4, bounds: &mut Option<Aabb>) {
    let matrix = node.transform().matrix().map(|col| col.map(f64::from));
    let world = parent * DMat4::from_cols_array_2d(&matrix);

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let Some(local) = primitive_bounds(&primitive) else {
                continue;
            };
            for corner in local.corners() {
                let point = world.transform_point3(corner);
                match bounds {
                    Some(b) => b.extend(point),
                    None => *bounds = Some(Aabb::new(point, point)),
                }
            }
        }
    }

    for child in node.children() {
        accumulate_node(&child, world, bounds);
    }
}

fn primitive_bounds(primitive: &gltf::Primitive<'_>) -> Option<Aabb> {
    let accessor = primitive.get(&gltf::Semantic::Positions)?;
    let min = json_vec3(&accessor.min()?)?;
    let max = json_vec3(&accessor.max()?)?;
    Some(Aabb::new(min, max))
}

fn json_vec3(value: &serde_json::Value) -> Option<DVec3> {
    let items = value.as_array()?;
    Some(DVec3::new(items.first()?.as_f64()?, items.get(1)?.as_f64()?, items.get(2)?.as_f64()?))
}
