use serde::{Deserialize, Serialize};

use seatkit_core::{Bbox, Point, Vector};

/// Parametrized geometry for a free-form annotation shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle { center: Point, radius: f64 },
    Rect { center: Point, width: f64, height: f64 },
}

/// A free-form annotation shape: not sellable, purely decorative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapedObject {
    pub uuid: u64,
    pub kind: ShapeKind,
    pub rotation: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub fill_color: String,
}

impl ShapedObject {
    pub fn new(uuid: u64, kind: ShapeKind) -> Self {
        Self {
            uuid,
            kind,
            rotation: 0.0,
            stroke_color: "#000000".to_string(),
            stroke_width: 1.0,
            fill_color: "none".to_string(),
        }
    }

    pub fn center(&self) -> Point {
        match &self.kind {
            ShapeKind::Circle { center, .. } | ShapeKind::Rect { center, .. } => *center,
        }
    }

    pub fn translate(&mut self, v: Vector) {
        match &mut self.kind {
            ShapeKind::Circle { center, .. } | ShapeKind::Rect { center, .. } => {
                *center = center.translate(v);
            }
        }
    }

    pub fn rotate_around(&mut self, around: Point, degrees: f64) {
        match &mut self.kind {
            ShapeKind::Circle { center, .. } | ShapeKind::Rect { center, .. } => {
                *center = center.rotate_around(around, degrees);
            }
        }
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
    }

    /// Geometry box padded by the stroke width.
    pub fn bounding_box(&self) -> Bbox {
        let raw = match &self.kind {
            ShapeKind::Circle { center, radius } => Bbox::new(
                Point::new(center.x - radius, center.y - radius),
                Point::new(center.x + radius, center.y + radius),
            ),
            ShapeKind::Rect {
                center,
                width,
                height,
            } => {
                let hw = width / 2.0;
                let hh = height / 2.0;
                let corners = [
                    Point::new(center.x - hw, center.y - hh),
                    Point::new(center.x + hw, center.y - hh),
                    Point::new(center.x + hw, center.y + hh),
                    Point::new(center.x - hw, center.y + hh),
                ];
                Bbox::from_points(corners.iter().map(|c| c.rotate_around(*center, self.rotation)))
                    .expect("four corners always yield a box")
            }
        };
        raw.pad(self.stroke_width / 2.0)
    }

    pub fn duplicate(&self, mut next_uuid: impl FnMut() -> u64) -> ShapedObject {
        let mut copy = self.clone();
        copy.uuid = next_uuid();
        copy
    }
}
