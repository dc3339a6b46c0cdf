use serde::{Deserialize, Serialize};

use super::Point;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub min: Point,
    pub max: Point,
}

impl Bbox {
    pub fn new(min: Point, max: Point) -> Self {
        Self {
            min: Point::new(min.x.min(max.x), min.y.min(max.y)),
            max: Point::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Bbox> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min_x = first.x;
        let mut min_y = first.y;
        let mut max_x = first.x;
        let mut max_y = first.y;
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Bbox {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        })
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Bbox) -> Bbox {
        Bbox {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Corners in order: top-left, top-right, bottom-right, bottom-left
    /// (y grows downward in chart coordinates).
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// Midpoints of the four edges: top, right, bottom, left.
    pub fn edge_midpoints(&self) -> [Point; 4] {
        let c = self.center();
        [
            Point::new(c.x, self.min.y),
            Point::new(self.max.x, c.y),
            Point::new(c.x, self.max.y),
            Point::new(self.min.x, c.y),
        ]
    }

    /// Expands every edge outward by `amount` (stroke padding). Negative
    /// amounts shrink; a box never inverts.
    pub fn pad(&self, amount: f64) -> Bbox {
        let half_w = (self.width() / 2.0 + amount).max(0.0);
        let half_h = (self.height() / 2.0 + amount).max(0.0);
        let c = self.center();
        Bbox {
            min: Point::new(c.x - half_w, c.y - half_h),
            max: Point::new(c.x + half_w, c.y + half_h),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Bbox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}
