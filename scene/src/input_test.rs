use super::*;

#[test]
fn default_is_idle() {
    assert!(Interaction::default().is_idle());
    assert!(Interaction::default().camera_controls_enabled());
}

#[test]
fn gestures_disable_camera_controls() {
    let dragging = Interaction::Dragging { offset: DVec3::ZERO };
    let rotating = Interaction::Rotating { start_angle: 0.0, start_yaw: 0.0 };
    assert!(!dragging.camera_controls_enabled());
    assert!(!rotating.camera_controls_enabled());
}

#[test]
fn rotated_yaw_adds_pointer_delta() {
    let yaw = rotated_yaw(0.5, 1.0, 1.25);
    assert!((yaw - 1.75).abs() < 1e-12);
}

#[test]
fn rotated_yaw_at_start_angle_is_start_yaw() {
    assert!((rotated_yaw(2.0, -0.4, 2.0) + 0.4).abs() < 1e-12);
}
