use glam::DVec3;
use wasm_bindgen::JsValue;
use web_sys::HtmlCanvasElement;

use crate::consts::CAPTURE_MIME;
use crate::hit::{HitPart, ground_angle, hit_test};
use crate::input::{Button, Interaction, rotated_yaw};
use crate::model::{Aabb, AssetResource, LoadTicket, ObjectId, PendingModel, PlacedObject, ScopedAsset, SelectionGizmo, is_model_file};
use crate::overlay::{OverlayState, QuotaStatus, RenderFailure, RenderReply, parse_render_reply};
use crate::viewport::{MapProjection, MapView, Point, Viewport, ViewportSize};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from event handlers for the host to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start loading the dropped asset; report back with the same ticket.
    LoadModel { ticket: LoadTicket, file_name: String },
    ObjectPlaced { id: ObjectId, position: DVec3 },
    ObjectRemoved { id: ObjectId },
    ObjectMoved { id: ObjectId, position: DVec3 },
    ObjectRotated { id: ObjectId, yaw: f64 },
    SelectionChanged { id: Option<ObjectId> },
    /// Enable or disable the map's pan / rotate / zoom handlers.
    CameraControls { enabled: bool },
    /// POST the captured composite to the render proxy.
    SubmitRender { image_data: String },
    OverlayChanged { image_url: Option<String> },
    QuotaChanged(QuotaStatus),
    RenderNeeded,
}

// =============================================================
// Composite capture
// =============================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("drawing surface unavailable")]
    Unavailable,
    #[error("capture produced no image")]
    Empty,
    #[error("capture failed: {0}")]
    Failed(String),
}

/// The drawable shared by the map and the 3D layer, read back as an image.
pub trait CompositeSurface {
    /// Encode the currently presented pixels as a data URI.
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureError`] if the surface is gone or the read-back fails.
    fn capture_data_url(&self) -> Result<String, CaptureError>;
}

// =============================================================
// Engine core
// =============================================================

/// Engine state and logic with no dependency on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub view: MapView,
    pub object: Option<PlacedObject>,
    pub interaction: Interaction,
    pub overlay: OverlayState,
    pending: Option<PendingModel>,
    next_ticket: LoadTicket,
}

/// Local ground position under a drop point, or `None` above the horizon.
#[must_use]
pub fn drop_position(projection: &dyn MapProjection, screen_pt: Point) -> Option<DVec3> {
    let geo = projection.unproject(screen_pt)?;
    Some(crate::geo::lnglat_to_local(geo, projection.anchor()))
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Viewport ---

    /// Update canvas dimensions and device pixel ratio.
    pub fn set_viewport_size(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.view.size = ViewportSize { width: width_css, height: height_css, dpr };
        vec![Action::RenderNeeded]
    }

    /// Mirror a map move (pan, zoom, rotate, pitch). Always clears the overlay.
    pub fn on_viewport_move(&mut self, viewport: Viewport) -> Vec<Action> {
        self.view.viewport = viewport;
        let mut actions = Vec::new();
        if self.overlay.clear() {
            actions.push(Action::OverlayChanged { image_url: None });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Model drop / load ---

    /// Handle a file dropped on the map at `screen_pt`.
    ///
    /// `asset` is the transient handle backing the file. It is released at
    /// once when the file is not a model or the point is off the ground;
    /// otherwise it is held by the pending load and then by the placed object.
    pub fn on_file_drop(&mut self, file_name: &str, screen_pt: Point, asset: Box<dyn AssetResource>) -> Vec<Action> {
        let asset = ScopedAsset::new(asset);
        if !is_model_file(file_name) {
            return Vec::new();
        }
        let Some(position) = drop_position(&self.view, screen_pt) else {
            log::debug!("drop at ({}, {}) is above the horizon", screen_pt.x, screen_pt.y);
            return Vec::new();
        };

        let mut actions = self.end_interaction();
        self.pending = None;
        if let Some(old) = self.object.take() {
            if old.selected {
                actions.push(Action::SelectionChanged { id: None });
            }
            actions.push(Action::ObjectRemoved { id: old.id });
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending = Some(PendingModel { ticket, file_name: file_name.to_owned(), position, asset });
        actions.push(Action::LoadModel { ticket, file_name: file_name.to_owned() });
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The host finished loading the asset for `ticket`.
    pub fn on_model_loaded(&mut self, ticket: LoadTicket, bounds: Option<Aabb>) -> Vec<Action> {
        let Some(pending) = self.take_pending(ticket) else {
            log::debug!("ignoring stale model load, ticket {ticket}");
            return Vec::new();
        };
        let object = pending.into_placed(bounds);
        let actions = vec![Action::ObjectPlaced { id: object.id, position: object.position }, Action::RenderNeeded];
        self.object = Some(object);
        actions
    }

    /// The host could not load the asset for `ticket`.
    pub fn on_model_failed(&mut self, ticket: LoadTicket, reason: &str) -> Vec<Action> {
        if let Some(pending) = self.take_pending(ticket) {
            log::warn!("model load failed for {}: {reason}", pending.file_name);
        }
        Vec::new()
    }

    fn take_pending(&mut self, ticket: LoadTicket) -> Option<PendingModel> {
        if self.pending.as_ref().is_some_and(|p| p.ticket == ticket) {
            return self.pending.take();
        }
        None
    }

    // --- Pointer ---

    /// Start a drag or rotate, select, or clear the selection.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || !self.interaction.is_idle() {
            return Vec::new();
        }
        let Some(ray) = self.view.ray(screen_pt) else {
            return Vec::new();
        };
        let Some(object) = self.object.as_mut() else {
            return Vec::new();
        };

        let mut actions = Vec::new();
        let Some(part) = hit_test(&ray, object) else {
            if object.selected {
                object.selected = false;
                actions.push(Action::SelectionChanged { id: None });
                actions.push(Action::RenderNeeded);
            }
            return actions;
        };

        if !object.selected {
            object.selected = true;
            actions.push(Action::SelectionChanged { id: Some(object.id) });
        }
        if let Some(ground) = ray.ground_hit() {
            self.interaction = match part {
                HitPart::Body => Interaction::Dragging { offset: object.position - ground },
                HitPart::RotateRing => {
                    Interaction::Rotating { start_angle: ground_angle(object.position, ground), start_yaw: object.yaw }
                }
            };
            actions.push(Action::CameraControls { enabled: false });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Continue the active gesture.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        if self.interaction.is_idle() {
            return Vec::new();
        }
        let Some(object) = self.object.as_mut() else {
            return self.end_interaction();
        };
        let Some(ground) = self.view.ray(screen_pt).and_then(|ray| ray.ground_hit()) else {
            return Vec::new();
        };

        match self.interaction {
            Interaction::Idle => Vec::new(),
            Interaction::Dragging { offset } => {
                object.set_ground_position(ground.x + offset.x, ground.z + offset.z);
                vec![Action::ObjectMoved { id: object.id, position: object.position }, Action::RenderNeeded]
            }
            Interaction::Rotating { start_angle, start_yaw } => {
                object.yaw = rotated_yaw(start_angle, start_yaw, ground_angle(object.position, ground));
                vec![Action::ObjectRotated { id: object.id, yaw: object.yaw }, Action::RenderNeeded]
            }
        }
    }

    /// End any gesture. The host captures the pointer on pointer-down, so
    /// this runs wherever the pointer is released.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.end_interaction()
    }

    /// The browser cancelled the pointer stream.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.end_interaction()
    }

    fn end_interaction(&mut self) -> Vec<Action> {
        if self.interaction.is_idle() {
            return Vec::new();
        }
        self.interaction = Interaction::Idle;
        vec![Action::CameraControls { enabled: true }, Action::RenderNeeded]
    }

    // --- Render ---

    /// Capture the composite and ask the host to submit it.
    ///
    /// A no-op while a render is in flight.
    pub fn trigger_render(&mut self, surface: &dyn CompositeSurface) -> Vec<Action> {
        if !self.overlay.begin() {
            return Vec::new();
        }
        match surface.capture_data_url() {
            Ok(image_data) => vec![Action::SubmitRender { image_data }],
            Err(e) => {
                self.overlay.abort();
                log::warn!("composite capture failed: {e}");
                Vec::new()
            }
        }
    }

    /// Apply the proxy's HTTP reply to the outstanding render.
    pub fn finish_render_response(&mut self, status: u16, body: &str) -> Vec<Action> {
        self.finish_render(parse_render_reply(status, body))
    }

    /// Apply a render outcome. Failures leave the overlay as it was.
    pub fn finish_render(&mut self, outcome: Result<RenderReply, RenderFailure>) -> Vec<Action> {
        let quota_before = self.overlay.quota();
        let changed = self.overlay.finish(&outcome);
        if let Err(e) = &outcome {
            log::warn!("{e}");
        }

        let mut actions = Vec::new();
        if changed {
            actions.push(Action::OverlayChanged { image_url: self.overlay.image_url().map(str::to_owned) });
        }
        if let Some(quota) = self.overlay.quota().filter(|q| Some(*q) != quota_before) {
            actions.push(Action::QuotaChanged(quota));
        }
        actions
    }

    /// Record a quota reading from `GET /quota`.
    pub fn set_quota(&mut self, quota: QuotaStatus) -> Vec<Action> {
        self.overlay.set_quota(quota);
        vec![Action::QuotaChanged(quota)]
    }

    // --- Queries ---

    /// The selected object, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.object.as_ref().filter(|o| o.selected).map(|o| o.id)
    }

    #[must_use]
    pub fn camera_controls_enabled(&self) -> bool {
        self.interaction.camera_controls_enabled()
    }

    /// Selection box and ring to draw, if the object is selected.
    #[must_use]
    pub fn gizmo(&self) -> Option<SelectionGizmo> {
        self.object.as_ref().and_then(PlacedObject::gizmo)
    }

    /// Whether a dropped model is still loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

// =============================================================
// Browser bindings
// =============================================================

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl CompositeSurface for HtmlCanvasElement {
    fn capture_data_url(&self) -> Result<String, CaptureError> {
        if self.width() == 0 || self.height() == 0 {
            return Err(CaptureError::Unavailable);
        }
        let url = self
            .to_data_url_with_type(CAPTURE_MIME)
            .map_err(|e| CaptureError::Failed(js_error(&e)))?;
        if url.len() <= "data:,".len() {
            return Err(CaptureError::Empty);
        }
        Ok(url)
    }
}

/// An object URL created by the host for a dropped file.
pub struct ObjectUrl {
    url: String,
}

impl ObjectUrl {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

impl AssetResource for ObjectUrl {
    fn release(&mut self) {
        if let Err(e) = web_sys::Url::revoke_object_url(&self.url) {
            log::warn!("failed to revoke {}: {}", self.url, js_error(&e));
        }
    }
}

/// The full scene engine. Wraps `EngineCore` and owns the map's canvas.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the map's canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    pub fn set_viewport_size(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.core.set_viewport_size(width_css, height_css, dpr)
    }

    pub fn on_viewport_move(&mut self, viewport: Viewport) -> Vec<Action> {
        self.core.on_viewport_move(viewport)
    }

    /// Handle a drop; `object_url` is the URL the host created for the file.
    pub fn on_file_drop(&mut self, file_name: &str, screen_pt: Point, object_url: String) -> Vec<Action> {
        self.core.on_file_drop(file_name, screen_pt, Box::new(ObjectUrl::new(object_url)))
    }

    pub fn on_model_loaded(&mut self, ticket: LoadTicket, bounds: Option<Aabb>) -> Vec<Action> {
        self.core.on_model_loaded(ticket, bounds)
    }

    pub fn on_model_failed(&mut self, ticket: LoadTicket, reason: &str) -> Vec<Action> {
        self.core.on_model_failed(ticket, reason)
    }

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up()
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.core.on_pointer_cancel()
    }

    /// Capture this engine's canvas and submit it for rendering.
    pub fn trigger_render(&mut self) -> Vec<Action> {
        self.core.trigger_render(&self.canvas)
    }

    pub fn finish_render_response(&mut self, status: u16, body: &str) -> Vec<Action> {
        self.core.finish_render_response(status, body)
    }

    /// The proxy call itself failed (network error, aborted fetch).
    pub fn finish_render_transport_error(&mut self, message: &str) -> Vec<Action> {
        self.core.finish_render(Err(RenderFailure::Transport(message.to_owned())))
    }

    pub fn set_quota(&mut self, quota: QuotaStatus) -> Vec<Action> {
        self.core.set_quota(quota)
    }

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.core.selection()
    }

    #[must_use]
    pub fn gizmo(&self) -> Option<SelectionGizmo> {
        self.core.gizmo()
    }
}
