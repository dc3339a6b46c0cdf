use serde::{Deserialize, Serialize};

use seatkit_core::{Bbox, Point, Vector};

use crate::category::CategoryId;
use crate::model::{extend_polygon, PolygonEvent};

/// Geometric footprint of a general-admission area.
///
/// Polygon is the legacy shape (same drawing flow as sections); newer
/// charts use the parametrized circle/rectangle forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GaShape {
    Polygon { points: Vec<Point>, closed: bool },
    Circle { center: Point, radius: f64 },
    Rect { center: Point, width: f64, height: f64, rotation: f64 },
}

/// An uncounted-seat zone sold by capacity instead of individual seats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaArea {
    pub uuid: u64,
    pub label: Option<String>,
    pub category: Option<CategoryId>,
    pub capacity: u32,
    pub booked: u32,
    pub shape: GaShape,
}

impl GaArea {
    pub fn polygon(uuid: u64) -> Self {
        Self {
            uuid,
            label: None,
            category: None,
            capacity: 0,
            booked: 0,
            shape: GaShape::Polygon {
                points: Vec::new(),
                closed: false,
            },
        }
    }

    pub fn circle(uuid: u64, center: Point, radius: f64) -> Self {
        Self {
            uuid,
            label: None,
            category: None,
            capacity: 0,
            booked: 0,
            shape: GaShape::Circle { center, radius },
        }
    }

    pub fn rect(uuid: u64, center: Point, width: f64, height: f64) -> Self {
        Self {
            uuid,
            label: None,
            category: None,
            capacity: 0,
            booked: 0,
            shape: GaShape::Rect {
                center,
                width,
                height,
                rotation: 0.0,
            },
        }
    }

    /// Feeds a drawing click into a polygon-shaped area. No-op (`Ignored`)
    /// for parametrized shapes.
    pub fn add_point(&mut self, p: Point, neighbor_corners: &[Point]) -> PolygonEvent {
        match &mut self.shape {
            GaShape::Polygon { points, closed } => {
                extend_polygon(points, closed, p, neighbor_corners)
            }
            _ => PolygonEvent::Ignored,
        }
    }

    /// A polygon area is persistable only once closed; parametrized
    /// shapes always are.
    pub fn is_complete(&self) -> bool {
        match &self.shape {
            GaShape::Polygon { closed, .. } => *closed,
            _ => true,
        }
    }

    pub fn remaining_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.booked)
    }

    pub fn translate(&mut self, v: Vector) {
        match &mut self.shape {
            GaShape::Polygon { points, .. } => {
                for p in points {
                    *p = p.translate(v);
                }
            }
            GaShape::Circle { center, .. } | GaShape::Rect { center, .. } => {
                *center = center.translate(v);
            }
        }
    }

    pub fn rotate_around(&mut self, around: Point, degrees: f64) {
        match &mut self.shape {
            GaShape::Polygon { points, .. } => {
                for p in points {
                    *p = p.rotate_around(around, degrees);
                }
            }
            GaShape::Circle { center, .. } => *center = center.rotate_around(around, degrees),
            GaShape::Rect { center, rotation, .. } => {
                *center = center.rotate_around(around, degrees);
                *rotation = (*rotation + degrees).rem_euclid(360.0);
            }
        }
    }

    pub fn bounding_box(&self) -> Option<Bbox> {
        match &self.shape {
            GaShape::Polygon { points, .. } => Bbox::from_points(points.iter().copied()),
            GaShape::Circle { center, radius } => Some(Bbox::new(
                Point::new(center.x - radius, center.y - radius),
                Point::new(center.x + radius, center.y + radius),
            )),
            GaShape::Rect {
                center,
                width,
                height,
                rotation,
            } => {
                let hw = width / 2.0;
                let hh = height / 2.0;
                let corners = [
                    Point::new(center.x - hw, center.y - hh),
                    Point::new(center.x + hw, center.y - hh),
                    Point::new(center.x + hw, center.y + hh),
                    Point::new(center.x - hw, center.y + hh),
                ];
                Bbox::from_points(corners.iter().map(|c| c.rotate_around(*center, *rotation)))
            }
        }
    }

    pub fn duplicate(&self, mut next_uuid: impl FnMut() -> u64) -> GaArea {
        let mut copy = self.clone();
        copy.uuid = next_uuid();
        copy.booked = 0;
        copy
    }

    pub fn is_labeled(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_area_completes_on_close() {
        let mut area = GaArea::polygon(1);
        area.add_point(Point::new(0.0, 0.0), &[]);
        area.add_point(Point::new(50.0, 0.0), &[]);
        area.add_point(Point::new(25.0, 50.0), &[]);
        assert!(!area.is_complete());
        area.add_point(Point::new(1.0, 1.0), &[]);
        assert!(area.is_complete());
    }

    #[test]
    fn parametrized_shapes_are_always_complete() {
        assert!(GaArea::circle(1, Point::new(0.0, 0.0), 40.0).is_complete());
        assert!(GaArea::rect(2, Point::new(0.0, 0.0), 80.0, 40.0).is_complete());
    }

    #[test]
    fn remaining_capacity_saturates() {
        let mut area = GaArea::circle(1, Point::new(0.0, 0.0), 40.0);
        area.capacity = 10;
        area.booked = 12;
        assert_eq!(area.remaining_capacity(), 0);
    }

    #[test]
    fn duplicate_resets_bookings() {
        let mut area = GaArea::circle(1, Point::new(0.0, 0.0), 40.0);
        area.capacity = 100;
        area.booked = 40;
        let mut next = 10;
        let copy = area.duplicate(|| {
            next += 1;
            next
        });
        assert_eq!(copy.booked, 0);
        assert_eq!(copy.capacity, 100);
        assert_ne!(copy.uuid, area.uuid);
    }
}
