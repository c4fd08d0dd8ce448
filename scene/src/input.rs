//! Input model: pointer buttons and the interaction state machine.
//!
//! `Interaction` is the active gesture between pointer-down and pointer-up.
//! Dragging and rotating are variants of one enum, so they can never be
//! active together, and the map's camera controls are enabled exactly when
//! the machine is idle.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use glam::DVec3;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Gesture in progress on the placed object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    /// No gesture; the map owns the pointer stream.
    #[default]
    Idle,
    /// Moving the object across the ground plane.
    Dragging {
        /// Object position minus the ground hit at pointer-down.
        offset: DVec3,
    },
    /// Turning the object about its vertical axis via the ring.
    Rotating {
        /// Ground heading from object center to the pointer at pointer-down.
        start_angle: f64,
        /// Object yaw at pointer-down.
        start_yaw: f64,
    },
}

impl Interaction {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether the map may pan, rotate and zoom.
    #[must_use]
    pub fn camera_controls_enabled(&self) -> bool {
        self.is_idle()
    }
}

/// Yaw for the current pointer heading while rotating.
#[must_use]
pub fn rotated_yaw(start_angle: f64, start_yaw: f64, angle: f64) -> f64 {
    start_yaw + (angle - start_angle)
}
