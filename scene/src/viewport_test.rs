use super::*;

fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

fn view(pitch: f64, bearing: f64) -> MapView {
    MapView {
        viewport: Viewport { center: LngLat::new(0.0, 0.0), zoom: 18.0, pitch, bearing },
        size: ViewportSize { width: 800.0, height: 600.0, dpr: 1.0 },
    }
}

#[test]
fn meters_per_pixel_at_equator() {
    let vp = Viewport { center: LngLat::new(0.0, 0.0), zoom: 0.0, pitch: 0.0, bearing: 0.0 };
    assert!(approx_eq(vp.meters_per_pixel(), EARTH_CIRCUMFERENCE_M / 512.0, 1e-6));
}

#[test]
fn meters_per_pixel_halves_per_zoom_level() {
    let a = Viewport { zoom: 17.0, ..Viewport::default() };
    let b = Viewport { zoom: 18.0, ..Viewport::default() };
    assert!(approx_eq(a.meters_per_pixel() / b.meters_per_pixel(), 2.0, 1e-12));
}

#[test]
fn meters_per_pixel_shrinks_with_latitude() {
    let equator = Viewport { center: LngLat::new(0.0, 0.0), ..Viewport::default() };
    let sixty = Viewport { center: LngLat::new(0.0, 60.0), ..Viewport::default() };
    assert!(approx_eq(sixty.meters_per_pixel() / equator.meters_per_pixel(), 0.5, 1e-9));
}

#[test]
fn zero_size_has_no_camera() {
    let mut v = view(0.0, 0.0);
    v.size = ViewportSize::default();
    assert!(v.camera().is_none());
    assert!(v.unproject(Point::new(0.0, 0.0)).is_none());
}

#[test]
fn center_pixel_unprojects_to_center() {
    for (pitch, bearing) in [(0.0, 0.0), (45.0, 30.0), (70.0, -120.0)] {
        let v = view(pitch, bearing);
        let geo = v.unproject(Point::new(400.0, 300.0)).unwrap();
        assert!(approx_eq(geo.lng, 0.0, 1e-9), "pitch {pitch} bearing {bearing}");
        assert!(approx_eq(geo.lat, 0.0, 1e-9), "pitch {pitch} bearing {bearing}");
    }
}

#[test]
fn top_down_offsets_scale_by_meters_per_pixel() {
    let v = view(0.0, 0.0);
    let mpp = v.viewport.meters_per_pixel();
    let camera = v.camera().unwrap();

    let east = camera.ray(Point::new(500.0, 300.0)).ground_hit().unwrap();
    assert!(approx_eq(east.x, 100.0 * mpp, 1e-9));
    assert!(approx_eq(east.z, 0.0, 1e-9));

    let south = camera.ray(Point::new(400.0, 350.0)).ground_hit().unwrap();
    assert!(approx_eq(south.x, 0.0, 1e-9));
    assert!(approx_eq(south.z, 50.0 * mpp, 1e-9));
}

#[test]
fn bearing_turns_screen_up_away_from_north() {
    // Bearing 90: the top of the screen faces east.
    let v = view(0.0, 90.0);
    let ground = v.ray(Point::new(400.0, 200.0)).unwrap().ground_hit().unwrap();
    assert!(ground.x > 0.0);
    assert!(approx_eq(ground.z, 0.0, 1e-9));
}

#[test]
fn camera_basis_is_orthonormal() {
    let camera = view(60.0, 25.0).camera().unwrap();
    for v in [camera.forward, camera.right, camera.up] {
        assert!(approx_eq(v.length(), 1.0, 1e-12));
    }
    assert!(approx_eq(camera.forward.dot(camera.up), 0.0, 1e-12));
    assert!(approx_eq(camera.forward.dot(camera.right), 0.0, 1e-12));
    assert!(camera.eye.y > 0.0);
}

#[test]
fn pitched_top_edge_is_above_horizon() {
    let v = view(MAX_PITCH_DEG, 0.0);
    assert!(v.unproject(Point::new(400.0, 0.0)).is_none());
    assert!(v.unproject(Point::new(400.0, 599.0)).is_some());
}

#[test]
fn pitch_beyond_limit_is_clamped() {
    let a = view(MAX_PITCH_DEG, 0.0).camera().unwrap();
    let b = view(120.0, 0.0).camera().unwrap();
    assert!((a.eye - b.eye).length() < 1e-9);
}

#[test]
fn default_view_starts_at_initial_camera() {
    let vp = Viewport::default();
    assert!(approx_eq(vp.center.lng, INITIAL_LNG, 1e-12));
    assert!(approx_eq(vp.zoom, INITIAL_ZOOM, 1e-12));
    assert!(approx_eq(vp.pitch, INITIAL_PITCH_DEG, 1e-12));
}
