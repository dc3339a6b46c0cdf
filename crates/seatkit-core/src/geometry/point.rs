use serde::{Deserialize, Serialize};

use super::round_coord;

/// A 2D point in chart coordinates, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point, rounding both coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: round_coord(x),
            y: round_coord(y),
        }
    }

    /// Returns this point translated by a vector.
    pub fn translate(&self, v: Vector) -> Point {
        Point::new(self.x + v.dx, self.y + v.dy)
    }

    /// Rotates this point around `center` by `degrees` (counterclockwise).
    pub fn rotate_around(&self, center: Point, degrees: f64) -> Point {
        let rad = degrees.to_radians();
        let (s, c) = rad.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point::new(center.x + dx * c - dy * s, center.y + dx * s + dy * c)
    }

    /// Midpoint between this point and `other`.
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Snaps both coordinates to the nearest multiple of `step`.
    pub fn snap_to_grid(&self, step: f64) -> Point {
        if step <= 0.0 {
            return *self;
        }
        Point::new((self.x / step).round() * step, (self.y / step).round() * step)
    }

    /// Tests containment in a polygon via ray casting.
    ///
    /// The polygon is taken as closed regardless of whether the last vertex
    /// repeats the first. Points exactly on an edge may land on either side.
    pub fn in_polygon(&self, polygon: &[Point]) -> bool {
        if polygon.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = polygon.len() - 1;
        for i in 0..polygon.len() {
            let (pi, pj) = (polygon[i], polygon[j]);
            if (pi.y > self.y) != (pj.y > self.y) {
                let x_cross = (pj.x - pi.x) * (self.y - pi.y) / (pj.y - pi.y) + pi.x;
                if self.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Vector from `a` to `b`.
    pub fn between(a: Point, b: Point) -> Self {
        Self {
            dx: b.x - a.x,
            dy: b.y - a.y,
        }
    }

    pub fn length(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    pub fn scale(&self, factor: f64) -> Vector {
        Vector::new(self.dx * factor, self.dy * factor)
    }

    /// Unit vector in the same direction. Callers guard zero length.
    pub fn normalize(&self) -> Vector {
        let len = self.length();
        debug_assert!(len > 0.0, "normalize called on zero-length vector");
        Vector::new(self.dx / len, self.dy / len)
    }

    /// Perpendicular vector (90 degrees counterclockwise).
    pub fn perpendicular(&self) -> Vector {
        Vector::new(-self.dy, self.dx)
    }

    pub fn negate(&self) -> Vector {
        Vector::new(-self.dx, -self.dy)
    }
}

impl std::ops::Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}
