//! Scene controller for the map staging view.
//!
//! This crate is compiled to WebAssembly and runs in the browser next to the
//! map. It owns the viewport mirror, the placement of a dropped 3D model onto
//! the map's ground plane, the drag/rotate gesture state machine, and the
//! render round trip (capture, submit, overlay). The host JavaScript layer
//! wires DOM and map events into the engine and performs the
//! [`engine::Action`]s it returns (loading the model, posting the capture to
//! the render proxy, toggling the map's camera controls).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`viewport`] | Viewport state, the map camera model, and screen-to-ground projection |
//! | [`geo`] | Longitude/latitude and Web Mercator to local-meter conversions |
//! | [`model`] | Placed object, bounding boxes, scoped asset handles, glTF bounds |
//! | [`input`] | Pointer event types and the interaction state machine |
//! | [`hit`] | Ray casting against the ground plane, the object and its ring |
//! | [`overlay`] | Render gate, overlay image, and the proxy reply types |
//! | [`consts`] | Shared numeric constants (ring ratios, camera model, defaults) |

pub mod consts;
pub mod engine;
pub mod geo;
pub mod hit;
pub mod input;
pub mod model;
pub mod overlay;
pub mod viewport;
