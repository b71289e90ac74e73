//! Tests for the composite Albers USA projection at the batch canvas size.

use projection::{AlbersUsa, Region};
use test_utils::{assert_approx_eq, assert_coords_approx_eq, canvas, coords};

fn canvas_projection() -> AlbersUsa {
    AlbersUsa::for_canvas(canvas::WIDTH, canvas::HEIGHT, canvas::SCALE)
}

#[test]
fn test_center_lands_mid_canvas() {
    let proj = canvas_projection();
    let (lon, lat) = coords::LOWER48_CENTER;

    let (x, y) = proj.project(lon, lat).unwrap();
    assert_coords_approx_eq!((x, y), (227.5, 142.5), 1e-9);
}

#[test]
fn test_center_follows_canvas_size() {
    let (lon, lat) = coords::LOWER48_CENTER;

    for (width, height) in [(455, 285), (960, 500), (100, 100)] {
        let proj = AlbersUsa::for_canvas(width, height, 1.0);
        let (x, y) = proj.project(lon, lat).unwrap();
        assert_approx_eq!(x, width as f64 / 2.0, 1e-9);
        assert_approx_eq!(y, height as f64 / 2.0, 1e-9);
    }
}

#[test]
fn test_inset_points_stay_inside_their_clips() {
    let proj = canvas_projection();

    for (point, region) in [
        (coords::ANCHORAGE, Region::Alaska),
        (coords::HONOLULU, Region::Hawaii),
        (coords::DENVER, Region::Lower48),
    ] {
        let (x, y) = proj.project(point.0, point.1).unwrap();
        assert!(
            proj.inset(region).clip.contains_point(x, y),
            "{:?} projected to ({}, {}) outside the {} clip",
            point,
            x,
            y,
            region.name()
        );
        assert_eq!(proj.region_of(point.0, point.1), Some(region));
    }
}

#[test]
fn test_points_outside_the_us_are_dropped() {
    let proj = canvas_projection();
    let (lon, lat) = coords::PARIS;
    assert!(proj.project(lon, lat).is_none());
    assert!(proj.region_of(lon, lat).is_none());
}

#[test]
fn test_lower48_fills_the_canvas() {
    // The lower 48 clip is wider than the canvas at scale 1.3
    let proj = canvas_projection();
    let clip = &proj.inset(Region::Lower48).clip;

    assert!(clip.min_x < 0.0);
    assert!(clip.max_x > canvas::WIDTH as f64);
    assert_approx_eq!(clip.height(), 0.476 * proj.scale(), 1e-9);
}

#[test]
fn test_invert_roundtrip_on_canvas() {
    let proj = canvas_projection();

    for (lon, lat) in [coords::DENVER, coords::NEW_YORK, coords::ANCHORAGE, coords::HONOLULU] {
        let (x, y) = proj.project(lon, lat).unwrap();
        let (lon2, lat2) = proj.invert(x, y).unwrap();
        assert_coords_approx_eq!((lon2, lat2), (lon, lat), 1e-6);
    }
}

#[test]
fn test_scale_is_linear_about_translate() {
    let small = AlbersUsa::new(500.0, (0.0, 0.0));
    let large = AlbersUsa::new(1000.0, (0.0, 0.0));
    let (lon, lat) = coords::NEW_YORK;

    let (x1, y1) = small.project(lon, lat).unwrap();
    let (x2, y2) = large.project(lon, lat).unwrap();
    assert_approx_eq!(x2, 2.0 * x1, 1e-9);
    assert_approx_eq!(y2, 2.0 * y1, 1e-9);
}
