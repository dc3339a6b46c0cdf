use serde::{Deserialize, Serialize};

use super::{snap_angle, Point, Vector};
use crate::error::{ChartError, Result};

/// A directed segment from `origin` to `end`.
///
/// Despite the name this is a segment with a direction, not an infinite
/// ray; `intersection` treats both operands as infinite lines. Operations
/// that need a direction (`angle_deg`, `enlarge`, `snap_to_angle`,
/// `with_length`) fail on zero-length rays — guarding that is the caller's
/// responsibility, surfaced as `ChartError::DegenerateRay`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point,
    pub end: Point,
}

impl Ray {
    pub fn new(origin: Point, end: Point) -> Self {
        Self { origin, end }
    }

    /// Builds a ray from an origin, an angle in degrees and a length.
    pub fn from_angle(origin: Point, degrees: f64, length: f64) -> Self {
        let rad = degrees.to_radians();
        Self {
            origin,
            end: Point::new(
                origin.x + rad.cos() * length,
                origin.y + rad.sin() * length,
            ),
        }
    }

    pub fn length(&self) -> f64 {
        self.origin.distance_to(self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.origin == self.end
    }

    /// Direction angle in degrees, normalized to `[0, 360)`.
    pub fn angle_deg(&self) -> Result<f64> {
        if self.is_degenerate() {
            return Err(ChartError::DegenerateRay);
        }
        let deg = (self.end.y - self.origin.y)
            .atan2(self.end.x - self.origin.x)
            .to_degrees();
        Ok(deg.rem_euclid(360.0))
    }

    /// Rotates the ray around its origin so its angle is a multiple of
    /// `step` degrees, keeping the length.
    pub fn snap_to_angle(&self, step: f64) -> Result<Ray> {
        let snapped = snap_angle(self.angle_deg()?, step);
        Ok(Ray::from_angle(self.origin, snapped, self.length()))
    }

    /// Extends (or shrinks, for negative `delta`) the ray along its
    /// direction.
    pub fn enlarge(&self, delta: f64) -> Result<Ray> {
        let len = self.length();
        if len == 0.0 {
            return Err(ChartError::DegenerateRay);
        }
        self.with_length(len + delta)
    }

    /// Returns a ray with the same origin and direction but the given
    /// length.
    pub fn with_length(&self, length: f64) -> Result<Ray> {
        if self.is_degenerate() {
            return Err(ChartError::DegenerateRay);
        }
        let dir = Vector::between(self.origin, self.end).normalize();
        Ok(Ray::new(self.origin, self.origin.translate(dir.scale(length))))
    }

    /// Point at parameter `t` along the ray (`t = 0` is the origin,
    /// `t = 1` the end).
    pub fn point_at(&self, t: f64) -> Point {
        Point::new(
            self.origin.x + (self.end.x - self.origin.x) * t,
            self.origin.y + (self.end.y - self.origin.y) * t,
        )
    }

    /// Perpendicular projection of `p` onto the ray's line (unclamped).
    pub fn project(&self, p: Point) -> Result<Point> {
        if self.is_degenerate() {
            return Err(ChartError::DegenerateRay);
        }
        let d = Vector::between(self.origin, self.end);
        let ap = Vector::between(self.origin, p);
        let t = (ap.dx * d.dx + ap.dy * d.dy) / (d.dx * d.dx + d.dy * d.dy);
        Ok(self.point_at(t))
    }

    /// Mirrors `p` across the ray's line.
    pub fn mirror(&self, p: Point) -> Result<Point> {
        let foot = self.project(p)?;
        Ok(Point::new(2.0 * foot.x - p.x, 2.0 * foot.y - p.y))
    }

    /// Intersection of the two rays' infinite lines. `None` when parallel.
    pub fn intersection(&self, other: &Ray) -> Option<Point> {
        let d1 = Vector::between(self.origin, self.end);
        let d2 = Vector::between(other.origin, other.end);
        let denom = d1.dx * d2.dy - d1.dy * d2.dx;
        if denom.abs() < 1e-9 {
            return None;
        }
        let dox = other.origin.x - self.origin.x;
        let doy = other.origin.y - self.origin.y;
        let t = (dox * d2.dy - doy * d2.dx) / denom;
        Some(self.point_at(t))
    }

    /// Midpoint of the ray.
    pub fn midpoint(&self) -> Point {
        self.origin.midpoint(self.end)
    }

    /// Ray with origin and end swapped.
    pub fn reversed(&self) -> Ray {
        Ray::new(self.end, self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(ox: f64, oy: f64, ex: f64, ey: f64) -> Ray {
        Ray::new(Point::new(ox, oy), Point::new(ex, ey))
    }

    #[test]
    fn angle_normalized_to_full_circle() {
        assert_eq!(ray(0.0, 0.0, 1.0, 0.0).angle_deg().unwrap(), 0.0);
        assert_eq!(ray(0.0, 0.0, 0.0, 1.0).angle_deg().unwrap(), 90.0);
        assert_eq!(ray(0.0, 0.0, -1.0, 0.0).angle_deg().unwrap(), 180.0);
        assert_eq!(ray(0.0, 0.0, 0.0, -1.0).angle_deg().unwrap(), 270.0);
    }

    #[test]
    fn degenerate_ray_is_a_hard_error() {
        let r = ray(3.0, 3.0, 3.0, 3.0);
        assert!(matches!(r.angle_deg(), Err(ChartError::DegenerateRay)));
        assert!(matches!(r.enlarge(5.0), Err(ChartError::DegenerateRay)));
        assert!(matches!(r.snap_to_angle(45.0), Err(ChartError::DegenerateRay)));
    }

    #[test]
    fn snap_to_angle_keeps_length() {
        let r = ray(0.0, 0.0, 10.0, 1.0).snap_to_angle(45.0).unwrap();
        assert!((r.length() - ray(0.0, 0.0, 10.0, 1.0).length()).abs() < 0.02);
        assert_eq!(r.angle_deg().unwrap(), 0.0);
    }

    #[test]
    fn enlarge_extends_along_direction() {
        let r = ray(0.0, 0.0, 10.0, 0.0).enlarge(5.0).unwrap();
        assert_eq!(r.end, Point::new(15.0, 0.0));
        let shrunk = ray(0.0, 0.0, 10.0, 0.0).enlarge(-4.0).unwrap();
        assert_eq!(shrunk.end, Point::new(6.0, 0.0));
    }

    #[test]
    fn projection_foot_on_line() {
        let r = ray(0.0, 0.0, 10.0, 0.0);
        assert_eq!(r.project(Point::new(4.0, 7.0)).unwrap(), Point::new(4.0, 0.0));
        // Unclamped: projections may fall beyond the end point.
        assert_eq!(r.project(Point::new(14.0, 2.0)).unwrap(), Point::new(14.0, 0.0));
    }

    #[test]
    fn mirror_reflects_across_line() {
        let r = ray(0.0, 0.0, 10.0, 0.0);
        assert_eq!(r.mirror(Point::new(3.0, 4.0)).unwrap(), Point::new(3.0, -4.0));
    }

    #[test]
    fn intersection_of_crossing_lines() {
        let a = ray(0.0, 0.0, 10.0, 10.0);
        let b = ray(0.0, 10.0, 10.0, 0.0);
        assert_eq!(a.intersection(&b), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let a = ray(0.0, 0.0, 10.0, 0.0);
        let b = ray(0.0, 5.0, 10.0, 5.0);
        assert_eq!(a.intersection(&b), None);
    }
}
