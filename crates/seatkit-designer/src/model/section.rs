use serde::{Deserialize, Serialize};

use seatkit_core::constants::DEFAULT_SECTION_LABEL_SIZE;
use seatkit_core::{Bbox, Point, Vector};

use crate::category::CategoryId;
use crate::model::{extend_polygon, PolygonEvent};
use crate::subchart::{SubChart, SubChartKind};

/// A polygonal venue section on the master chart, carrying its own
/// interior subchart that is edited independently.
///
/// The polygon stays open while it is being drawn; an unclosed section is
/// never persisted and is discarded when the drawing mode exits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub uuid: u64,
    pub label: Option<String>,
    pub label_size: f64,
    pub label_rotation: f64,
    pub category: Option<CategoryId>,
    pub points: Vec<Point>,
    pub closed: bool,
    /// The section's interior; owned here, edited as the active subchart
    /// when the operator enters the section.
    pub interior: SubChart,
}

impl Section {
    pub fn new(uuid: u64) -> Self {
        Self {
            uuid,
            label: None,
            label_size: DEFAULT_SECTION_LABEL_SIZE,
            label_rotation: 0.0,
            category: None,
            points: Vec::new(),
            closed: false,
            interior: SubChart::new(SubChartKind::Section),
        }
    }

    /// Feeds one drawing click into the outline. `neighbor_corners` are
    /// corner points of other sections offered as snap targets.
    pub fn add_point(&mut self, p: Point, neighbor_corners: &[Point]) -> PolygonEvent {
        extend_polygon(&mut self.points, &mut self.closed, p, neighbor_corners)
    }

    /// Anchor for the section label: the polygon centroid.
    pub fn label_anchor(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        let n = self.points.len() as f64;
        Some(Point::new(sx / n, sy / n))
    }

    pub fn contains(&self, p: Point) -> bool {
        self.closed && p.in_polygon(&self.points)
    }

    /// Moves the outline. The interior is stored relative to its own
    /// bounding box, so it does not move with the master-chart outline.
    pub fn translate(&mut self, v: Vector) {
        for p in &mut self.points {
            *p = p.translate(v);
        }
    }

    pub fn rotate_around(&mut self, center: Point, degrees: f64) {
        for p in &mut self.points {
            *p = p.rotate_around(center, degrees);
        }
        self.label_rotation = (self.label_rotation + degrees).rem_euclid(360.0);
    }

    pub fn bounding_box(&self) -> Option<Bbox> {
        Bbox::from_points(self.points.iter().copied())
    }

    pub fn duplicate(&self, mut next_uuid: impl FnMut() -> u64) -> Section {
        let mut copy = self.clone();
        copy.uuid = next_uuid();
        copy.interior.regenerate_identity(&mut next_uuid);
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
    fn open_section_contains_nothing() {
        let mut section = Section::new(1);
        section.add_point(Point::new(0.0, 0.0), &[]);
        section.add_point(Point::new(100.0, 0.0), &[]);
        section.add_point(Point::new(50.0, 100.0), &[]);
        assert!(!section.contains(Point::new(50.0, 30.0)));
        section.add_point(Point::new(2.0, 1.0), &[]);
        assert!(section.closed);
        assert!(section.contains(Point::new(50.0, 30.0)));
    }

    #[test]
    fn centroid_label_anchor() {
        let mut section = Section::new(1);
        for p in [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ] {
            section.add_point(p, &[]);
        }
        assert_eq!(section.label_anchor(), Some(Point::new(5.0, 5.0)));
    }
}
