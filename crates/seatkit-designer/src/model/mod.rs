//! Scene object model.
//!
//! One file per concrete variant, a kind/handle pair for arena-style
//! addressing, and the shared polygon-building helper used by sections
//! and general-admission areas. Cross-object dispatch lives on
//! `SubChart`, matched exhaustively on `ObjectKind` so a new variant is a
//! compile-time exercise.

mod booth;
mod chair;
mod focal_point;
mod ga_area;
mod rect_table;
mod round_table;
mod row;
mod section;
mod shaped;
mod text_label;

pub use booth::Booth;
pub use chair::{Chair, UNSET_LABEL};
pub use focal_point::FocalPoint;
pub use ga_area::{GaArea, GaShape};
pub use rect_table::{RectTable, RectTableLayout};
pub use round_table::RoundTable;
pub use row::{Row, RowAnchor};
pub use section::Section;
pub use shaped::{ShapeKind, ShapedObject};
pub use text_label::TextLabel;

use seatkit_core::constants::POLYGON_SNAP_THRESHOLD;
use seatkit_core::Point;
use serde::{Deserialize, Serialize};

/// Scene object variants, used for handle addressing and capability
/// checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Row,
    RoundTable,
    RectTable,
    Booth,
    Section,
    GaArea,
    Shape,
    Text,
    FocalPoint,
}

/// Opaque handle to an object inside one `SubChart`.
///
/// Handles are positional and only valid until the owning collection is
/// mutated; holders (the selection, an in-flight drag) refresh or drop
/// them on removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub index: usize,
}

impl ObjectRef {
    pub fn new(kind: ObjectKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// Outcome of feeding one click into an open polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonEvent {
    /// Point appended (possibly snapped onto an existing corner).
    Added,
    /// The click landed on the first corner: the polygon is now closed.
    Closed,
    /// The click was ignored (polygon already closed).
    Ignored,
}

/// Feeds one candidate corner into an open polygon.
///
/// The point snaps onto any existing corner within the pixel threshold —
/// snapping onto the *first* corner closes the polygon instead of adding
/// a duplicate point. `extra_corners` lets callers offer corners of other
/// polygons (neighboring sections) as snap targets.
pub fn extend_polygon(
    points: &mut Vec<Point>,
    closed: &mut bool,
    candidate: Point,
    extra_corners: &[Point],
) -> PolygonEvent {
    if *closed {
        return PolygonEvent::Ignored;
    }
    if let Some(first) = points.first() {
        if points.len() >= 3 && candidate.distance_to(*first) <= POLYGON_SNAP_THRESHOLD {
            *closed = true;
            return PolygonEvent::Closed;
        }
    }
    let snapped = points
        .iter()
        .chain(extra_corners.iter())
        .find(|corner| candidate.distance_to(**corner) <= POLYGON_SNAP_THRESHOLD)
        .copied()
        .unwrap_or(candidate);
    points.push(snapped);
    PolygonEvent::Added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicking_near_first_point_closes() {
        let mut points = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ];
        let mut closed = false;
        let ev = extend_polygon(&mut points, &mut closed, Point::new(3.0, 4.0), &[]);
        assert_eq!(ev, PolygonEvent::Closed);
        assert!(closed);
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn clicking_elsewhere_never_closes() {
        let mut points = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let mut closed = false;
        let ev = extend_polygon(&mut points, &mut closed, Point::new(50.0, 80.0), &[]);
        assert_eq!(ev, PolygonEvent::Added);
        assert!(!closed);
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn snaps_to_nearby_foreign_corner() {
        let mut points = vec![Point::new(0.0, 0.0)];
        let mut closed = false;
        let neighbor = Point::new(200.0, 200.0);
        extend_polygon(&mut points, &mut closed, Point::new(204.0, 203.0), &[neighbor]);
        assert_eq!(points[1], neighbor);
    }

    #[test]
    fn too_few_points_cannot_close() {
        let mut points = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let mut closed = false;
        // Clicking back on the first point with only two corners snaps
        // onto it instead of closing a degenerate polygon.
        let ev = extend_polygon(&mut points, &mut closed, Point::new(1.0, 1.0), &[]);
        assert_eq!(ev, PolygonEvent::Added);
        assert!(!closed);
        assert_eq!(points[2], Point::new(0.0, 0.0));
    }

    #[test]
    fn closed_polygon_ignores_further_points() {
        let mut points = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 80.0),
        ];
        let mut closed = true;
        assert_eq!(
            extend_polygon(&mut points, &mut closed, Point::new(7.0, 7.0), &[]),
            PolygonEvent::Ignored
        );
        assert_eq!(points.len(), 3);
    }
}
