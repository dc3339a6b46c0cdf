use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use seatkit_core::constants::{CHAIR_RADIUS, CHAIR_SPACING};
use seatkit_core::{Bbox, ChartError, CurvePath, Point, Ray, Result, Vector};

use crate::category::CategoryId;
use crate::model::chair::Chair;

/// Which end of a row anchors a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAnchor {
    First,
    Last,
}

/// An ordered run of chairs. Order is significant: it defines first/last,
/// the numbering direction and the positional identity used when the row
/// is re-stretched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub uuid: u64,
    pub label: Option<String>,
    pub chairs: SmallVec<[Chair; 16]>,
    /// Signed bulge amount; 0 is a straight row.
    pub curve: f64,
    /// Whether the auto-labeler may touch this row.
    pub auto_labelable: bool,
}

impl Row {
    pub fn new(uuid: u64) -> Self {
        Self {
            uuid,
            label: None,
            chairs: SmallVec::new(),
            curve: 0.0,
            auto_labelable: true,
        }
    }

    /// Lays out a fresh row along `ray` at fixed spacing. The chair count
    /// is however many spacings fit, endpoints inclusive.
    pub fn along_ray(uuid: u64, ray: Ray, mut next_uuid: impl FnMut() -> u64) -> Result<Self> {
        let mut row = Row::new(uuid);
        let count = (ray.length() / CHAIR_SPACING).floor() as usize + 1;
        let dir = ray.with_length(CHAIR_SPACING)?;
        let step = Vector::between(dir.origin, dir.end);
        for i in 0..count {
            let center = ray.origin.translate(step.scale(i as f64));
            row.chairs.push(Chair::new(center, next_uuid()));
        }
        Ok(row)
    }

    fn row_label_for_error(&self) -> String {
        self.label.clone().unwrap_or_else(|| "unset".to_string())
    }

    /// First chair in order. Caller precondition: the row is non-empty.
    pub fn first_chair(&self) -> Result<&Chair> {
        self.chairs.first().ok_or_else(|| ChartError::EmptyRow {
            label: self.row_label_for_error(),
        })
    }

    /// Last chair in order. Caller precondition: the row is non-empty.
    pub fn last_chair(&self) -> Result<&Chair> {
        self.chairs.last().ok_or_else(|| ChartError::EmptyRow {
            label: self.row_label_for_error(),
        })
    }

    /// Direction ray from the first chair to the last. `None` when the
    /// row has fewer than two chairs (no direction to speak of).
    pub fn direction(&self) -> Option<Ray> {
        if self.chairs.len() < 2 {
            return None;
        }
        let ray = Ray::new(self.chairs[0].center, self.chairs[self.chairs.len() - 1].center);
        (!ray.is_degenerate()).then_some(ray)
    }

    /// The single category used across the row's chairs, when exactly one
    /// distinct category is in use. This is what freshly grown chairs
    /// inherit.
    pub fn sole_category(&self) -> Option<CategoryId> {
        let mut found: Option<CategoryId> = None;
        for chair in &self.chairs {
            match (chair.category, found) {
                (Some(c), None) => found = Some(c),
                (Some(c), Some(f)) if c != f => return None,
                _ => {}
            }
        }
        found
    }

    /// Recomputes the full chair list along a ray from an anchor chair to
    /// `endpoint` at fixed spacing.
    ///
    /// Surviving positions keep their chair's label, category and uuid by
    /// positional index (counted from the far end when `reversed`); grown
    /// positions get fresh uuids and inherit the row's sole category.
    /// Idempotent: the same anchor/endpoint yields the same centers.
    pub fn transform_to(
        &mut self,
        anchor: RowAnchor,
        reversed: bool,
        endpoint: Point,
        mut next_uuid: impl FnMut() -> u64,
    ) -> Result<()> {
        let anchor_center = match anchor {
            RowAnchor::First => self.first_chair()?.center,
            RowAnchor::Last => self.last_chair()?.center,
        };
        let ray = Ray::new(anchor_center, endpoint);
        if ray.is_degenerate() {
            return Err(ChartError::DegenerateRay);
        }
        let count = (ray.length() / CHAIR_SPACING).floor() as usize + 1;
        let step_ray = ray.with_length(CHAIR_SPACING)?;
        let step = Vector::between(step_ray.origin, step_ray.end);

        let old_len = self.chairs.len();
        let mut new_chairs: SmallVec<[Chair; 16]> = SmallVec::with_capacity(count);
        let inherited = self.sole_category();

        for i in 0..count {
            let center = anchor_center.translate(step.scale(i as f64));
            let source_index = if reversed {
                old_len.checked_sub(1 + i)
            } else {
                (i < old_len).then_some(i)
            };
            let chair = match source_index.and_then(|idx| self.chairs.get(idx)) {
                Some(old) => {
                    let mut c = old.clone();
                    c.center = center;
                    c
                }
                None => {
                    let mut c = Chair::new(center, next_uuid());
                    c.category = inherited;
                    c
                }
            };
            new_chairs.push(chair);
        }
        if reversed {
            new_chairs.reverse();
        }
        self.chairs = new_chairs;
        Ok(())
    }

    /// Re-bulges the row: walks the chairs along a quadratic helper path
    /// between the current first and last chair centers, spaced by equal
    /// arc length. A row with fewer than two chairs is left untouched.
    pub fn do_curve(&mut self, amount: f64) {
        let n = self.chairs.len();
        if n < 2 {
            self.curve = amount;
            return;
        }
        // The chord never moves: endpoints stay put while the interior
        // chairs bow out, so repeated curving does not drift.
        let chord_start = self.chairs[0].center;
        let chord_end = self.chairs[n - 1].center;
        let path = CurvePath::for_chord(chord_start, chord_end, amount);
        let centers = path.equally_spaced(n);
        for (chair, center) in self.chairs.iter_mut().zip(centers) {
            chair.center = center;
        }
        self.curve = amount;
    }

    pub fn translate(&mut self, v: Vector) {
        for chair in &mut self.chairs {
            chair.translate(v);
        }
    }

    /// Rotates all chairs around `center`.
    ///
    /// The curvature sign flips when the rotation carries the row's
    /// direction across the first/fourth ↔ second/third quadrant boundary,
    /// which keeps the visual bulge direction stable under rotation.
    pub fn rotate_around(&mut self, center: Point, degrees: f64) {
        let faced_right = self.faces_right();
        for chair in &mut self.chairs {
            chair.rotate_around(center, degrees);
        }
        if let (Some(before), Some(after)) = (faced_right, self.faces_right()) {
            if before != after {
                self.curve = -self.curve;
            }
        }
    }

    /// True when the row direction points into the first or fourth
    /// quadrant (positive x component). `None` for directionless rows.
    fn faces_right(&self) -> Option<bool> {
        let angle = self.direction()?.angle_deg().ok()?;
        Some(!(90.0..=270.0).contains(&angle))
    }

    pub fn bounding_box(&self) -> Option<Bbox> {
        Bbox::from_points(self.chairs.iter().map(|c| c.center)).map(|b| b.pad(CHAIR_RADIUS))
    }

    /// Deep clone with regenerated uuids and cleared ids.
    pub fn duplicate(&self, mut next_uuid: impl FnMut() -> u64) -> Row {
        let mut copy = self.clone();
        copy.uuid = next_uuid();
        for chair in &mut copy.chairs {
            chair.uuid = next_uuid();
            chair.id = None;
            chair.id_key = None;
        }
        copy
    }

    pub fn is_labeled(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid_gen() -> impl FnMut() -> u64 {
        let mut next = 100;
        move || {
            next += 1;
            next
        }
    }

    fn straight_row(n: usize) -> Row {
        let mut row = Row::new(1);
        let mut gen = uuid_gen();
        for i in 0..n {
            row.chairs
                .push(Chair::new(Point::new(i as f64 * CHAIR_SPACING, 0.0), gen()));
        }
        row
    }

    #[test]
    fn empty_row_accessors_fail_fast() {
        let row = Row::new(1);
        assert!(matches!(row.first_chair(), Err(ChartError::EmptyRow { .. })));
        assert!(matches!(row.last_chair(), Err(ChartError::EmptyRow { .. })));
    }

    #[test]
    fn along_ray_fills_with_fixed_spacing() {
        let ray = Ray::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let row = Row::along_ray(1, ray, uuid_gen()).unwrap();
        assert_eq!(row.chairs.len(), 5);
        assert_eq!(row.chairs[4].center, Point::new(100.0, 0.0));
    }

    #[test]
    fn transform_to_preserves_identity_by_index() {
        let mut row = straight_row(3);
        row.chairs[0].label = Some("1".into());
        row.chairs[1].label = Some("2".into());
        let kept_uuid = row.chairs[1].uuid;

        row.transform_to(RowAnchor::First, false, Point::new(100.0, 0.0), uuid_gen())
            .unwrap();
        assert_eq!(row.chairs.len(), 5);
        assert_eq!(row.chairs[0].label.as_deref(), Some("1"));
        assert_eq!(row.chairs[1].label.as_deref(), Some("2"));
        assert_eq!(row.chairs[1].uuid, kept_uuid);
        assert!(row.chairs[4].label.is_none());
    }

    #[test]
    fn transform_to_grown_chairs_inherit_sole_category() {
        let mut row = straight_row(2);
        row.chairs[0].category = Some(7);
        row.chairs[1].category = Some(7);
        row.transform_to(RowAnchor::First, false, Point::new(100.0, 0.0), uuid_gen())
            .unwrap();
        assert!(row.chairs.iter().all(|c| c.category == Some(7)));

        let mut mixed = straight_row(2);
        mixed.chairs[0].category = Some(1);
        mixed.chairs[1].category = Some(2);
        mixed
            .transform_to(RowAnchor::First, false, Point::new(100.0, 0.0), uuid_gen())
            .unwrap();
        assert!(mixed.chairs[4].category.is_none());
    }

    #[test]
    fn transform_to_is_idempotent_within_rounding() {
        let mut row = straight_row(4);
        let endpoint = Point::new(87.0, 43.0);
        row.transform_to(RowAnchor::First, false, endpoint, uuid_gen()).unwrap();
        let centers: Vec<Point> = row.chairs.iter().map(|c| c.center).collect();
        row.transform_to(RowAnchor::First, false, endpoint, uuid_gen()).unwrap();
        for (a, b) in centers.iter().zip(row.chairs.iter().map(|c| c.center)) {
            assert!(a.distance_to(b) <= 0.02);
        }
    }

    #[test]
    fn curve_keeps_endpoints_and_spreads_evenly() {
        let mut row = straight_row(5);
        let first = row.chairs[0].center;
        let last = row.chairs[4].center;
        row.do_curve(10.0);
        assert_eq!(row.curve, 10.0);
        assert_eq!(row.chairs[0].center, first);
        assert!(row.chairs[4].center.distance_to(last) < 0.5);
        // Interior chairs bow away from the chord.
        assert!(row.chairs[2].center.y.abs() > 1.0);
    }

    #[test]
    fn rotation_across_quadrant_boundary_flips_curve() {
        let mut row = straight_row(5);
        row.curve = 5.0;
        let center = row.bounding_box().unwrap().center();
        row.rotate_around(center, 190.0);
        assert_eq!(row.curve, -5.0);
        row.rotate_around(center, 190.0);
        assert_eq!(row.curve, 5.0);
    }

    #[test]
    fn small_rotation_keeps_curve_sign() {
        let mut row = straight_row(5);
        row.curve = 5.0;
        let center = row.bounding_box().unwrap().center();
        row.rotate_around(center, 30.0);
        assert_eq!(row.curve, 5.0);
    }

    #[test]
    fn duplicate_regenerates_identity() {
        let mut row = straight_row(3);
        row.chairs[0].id = Some(42);
        row.chairs[0].id_key = Some("k".into());
        let copy = row.duplicate(uuid_gen());
        assert_ne!(copy.uuid, row.uuid);
        assert_ne!(copy.chairs[0].uuid, row.chairs[0].uuid);
        assert_eq!(copy.chairs[0].id, None);
        assert_eq!(copy.chairs[0].id_key, None);
        assert_eq!(copy.chairs.len(), row.chairs.len());
    }
}
