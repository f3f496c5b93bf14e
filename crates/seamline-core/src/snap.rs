//! Grid snapping for placement points.

use kurbo::Point;

/// Grid cell size in world units (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Snap a placement point when grid snapping is enabled.
///
/// Only placement points go through here; raw drag deltas for free
/// transforms are never snapped.
pub fn snap_point(point: Point, enabled: bool) -> Point {
    if enabled {
        snap_to_grid(point, GRID_SIZE)
    } else {
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        let snapped = snap_to_grid(Point::new(23.0, 47.0), 20.0);
        assert_eq!(snapped, Point::new(20.0, 40.0));
    }

    #[test]
    fn test_snap_to_grid_exact() {
        let snapped = snap_to_grid(Point::new(40.0, 60.0), 20.0);
        assert_eq!(snapped, Point::new(40.0, 60.0));
    }

    #[test]
    fn test_snap_to_grid_round_up() {
        let snapped = snap_to_grid(Point::new(31.0, 51.0), 20.0);
        assert_eq!(snapped, Point::new(40.0, 60.0));
    }

    #[test]
    fn test_snap_point_disabled_is_identity() {
        let p = Point::new(13.0, 7.0);
        assert_eq!(snap_point(p, false), p);
        assert_eq!(snap_point(p, true), Point::new(20.0, 0.0));
    }
}
