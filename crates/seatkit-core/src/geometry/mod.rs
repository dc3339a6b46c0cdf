//! Immutable 2D geometry kernel.
//!
//! Value types only: every operation returns a new instance, nothing here
//! touches a rendering surface. Coordinates are rounded to two decimals on
//! construction so repeated transforms do not accumulate drift.

mod bbox;
mod curve;
mod point;
mod ray;

pub use bbox::Bbox;
pub use curve::CurvePath;
pub use point::{Point, Vector};
pub use ray::Ray;

use crate::constants::COORD_DECIMALS;

/// Rounds a coordinate to the editor's fixed precision.
pub(crate) fn round_coord(v: f64) -> f64 {
    let factor = 10f64.powi(COORD_DECIMALS as i32);
    (v * factor).round() / factor
}

/// Snaps an angle (degrees) to the nearest multiple of `step`.
///
/// Used both for shift-constrained drawing (45 degree steps) and rotation
/// handles (2 degree steps).
pub fn snap_angle(angle: f64, step: f64) -> f64 {
    if step == 0.0 {
        return angle;
    }
    (angle / step).round() * step
}

/// Distance from a point to the segment `a`..`b`.
///
/// The projection parameter is clamped to `[0, 1]` before falling back to
/// endpoint distance, so the result is a true segment distance rather than
/// a line distance. A degenerate segment (`a == b`) degrades to point
/// distance.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = Vector::between(a, b);
    let len_sq = ab.dx * ab.dx + ab.dy * ab.dy;
    if len_sq == 0.0 {
        return p.distance_to(a);
    }
    let ap = Vector::between(a, p);
    let t = ((ap.dx * ab.dx + ap.dy * ab.dy) / len_sq).clamp(0.0, 1.0);
    let foot = Point::new(a.x + ab.dx * t, a.y + ab.dy * t);
    p.distance_to(foot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_angle_rounds_to_nearest_step() {
        assert_eq!(snap_angle(44.0, 45.0), 45.0);
        assert_eq!(snap_angle(22.4, 45.0), 0.0);
        assert_eq!(snap_angle(91.0, 2.0), 90.0);
        assert_eq!(snap_angle(-44.0, 45.0), -45.0);
    }

    #[test]
    fn snap_angle_zero_step_is_identity() {
        assert_eq!(snap_angle(17.3, 0.0), 17.3);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        // Beyond the far endpoint: distance to b, not to the infinite line.
        assert!((point_segment_distance(Point::new(14.0, 3.0), a, b) - 5.0).abs() < 1e-9);
        // Perpendicular foot inside the segment.
        assert!((point_segment_distance(Point::new(5.0, 4.0), a, b) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn segment_distance_degenerate_segment() {
        let a = Point::new(2.0, 2.0);
        assert!((point_segment_distance(Point::new(5.0, 6.0), a, a) - 5.0).abs() < 1e-9);
    }
}
