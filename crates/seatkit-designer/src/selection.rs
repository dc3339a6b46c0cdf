//! Multi-object selection and the transforms that act on it.
//!
//! The selection holds positional handles into one subchart. Every
//! operation takes the chart explicitly; the selection never stores
//! object data of its own, so it can never go stale silently, only
//! visibly (handles past the end simply stop matching).

use std::collections::HashMap;

use tracing::debug;

use seatkit_core::constants::{CHAIR_SPACING, ROTATION_SNAP_STEP, SHIFT_ANGLE_STEP};
use seatkit_core::{snap_angle, Bbox, Point, Vector};

use crate::model::{ObjectKind, ObjectRef};
use crate::subchart::SubChart;

/// Edge or axis objects are lined up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    HCenter,
    Right,
    Top,
    VCenter,
    Bottom,
}

/// Mirror axis for a positional flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    refs: Vec<ObjectRef>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refs(&self) -> &[ObjectRef] {
        &self.refs
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn contains(&self, r: ObjectRef) -> bool {
        self.refs.contains(&r)
    }

    pub fn clear(&mut self) {
        self.refs.clear();
    }

    pub fn set(&mut self, refs: Vec<ObjectRef>) {
        self.refs = refs;
        self.refs.dedup();
    }

    pub fn select_only(&mut self, r: ObjectRef) {
        self.refs.clear();
        self.refs.push(r);
    }

    /// Shift-click behavior: present handles leave, absent ones join.
    pub fn toggle(&mut self, r: ObjectRef) {
        if let Some(pos) = self.refs.iter().position(|&x| x == r) {
            self.refs.remove(pos);
        } else {
            self.refs.push(r);
        }
    }

    /// The only selected handle, if exactly one object is selected.
    pub fn single(&self) -> Option<ObjectRef> {
        match self.refs.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Curvature only applies to a lone row.
    pub fn can_curve(&self) -> bool {
        matches!(self.single(), Some(r) if r.kind == ObjectKind::Row)
    }

    pub fn only_rows_selected(&self) -> bool {
        !self.refs.is_empty() && self.refs.iter().all(|r| r.kind == ObjectKind::Row)
    }

    pub fn only_shapes_selected(&self) -> bool {
        !self.refs.is_empty() && self.refs.iter().all(|r| r.kind == ObjectKind::Shape)
    }

    /// Whether everything selected can carry a category of its own.
    pub fn categorizable_only(&self) -> bool {
        !self.refs.is_empty()
            && self.refs.iter().all(|r| {
                matches!(
                    r.kind,
                    ObjectKind::RoundTable
                        | ObjectKind::RectTable
                        | ObjectKind::Booth
                        | ObjectKind::GaArea
                        | ObjectKind::Section
                )
            })
    }

    /// A positional flip needs at least two objects to rearrange.
    pub fn can_be_flipped(&self) -> bool {
        self.refs.len() >= 2
    }

    pub fn can_rotate(&self) -> bool {
        !self.refs.is_empty() && self.refs.iter().all(|r| r.kind != ObjectKind::FocalPoint)
    }

    pub fn can_duplicate(&self) -> bool {
        !self.refs.is_empty() && self.refs.iter().all(|r| r.kind != ObjectKind::FocalPoint)
    }

    pub fn can_align(&self) -> bool {
        self.refs.len() >= 2
    }

    /// Combined box of everything selected.
    pub fn bounding_box(&self, chart: &SubChart) -> Option<Bbox> {
        self.refs
            .iter()
            .filter_map(|&r| chart.bbox_of(r))
            .reduce(|a, b| a.union(&b))
    }

    pub fn translate(&self, chart: &mut SubChart, v: Vector) {
        for &r in &self.refs {
            chart.translate_object(r, v);
        }
    }

    /// Rotates the whole selection around its combined center. With
    /// `coarse` the angle snaps to 45 degree steps, otherwise to the
    /// fine step used by the rotation handle.
    pub fn rotate(&self, chart: &mut SubChart, degrees: f64, coarse: bool) {
        let Some(center) = self.bounding_box(chart).map(|b| b.center()) else {
            return;
        };
        let step = if coarse { SHIFT_ANGLE_STEP } else { ROTATION_SNAP_STEP };
        let snapped = snap_angle(degrees, step);
        for &r in &self.refs {
            chart.rotate_object(r, center, snapped);
        }
    }

    pub fn rotate_around(&self, chart: &mut SubChart, center: Point, degrees: f64) {
        for &r in &self.refs {
            chart.rotate_object(r, center, degrees);
        }
    }

    /// Lines the selected objects up on a shared edge or axis of the
    /// combined box.
    pub fn align(&self, chart: &mut SubChart, alignment: Alignment) {
        let Some(total) = self.bounding_box(chart) else {
            return;
        };
        for &r in &self.refs {
            let Some(b) = chart.bbox_of(r) else { continue };
            let v = match alignment {
                Alignment::Left => Vector::new(total.min.x - b.min.x, 0.0),
                Alignment::Right => Vector::new(total.max.x - b.max.x, 0.0),
                Alignment::HCenter => Vector::new(total.center().x - b.center().x, 0.0),
                Alignment::Top => Vector::new(0.0, total.min.y - b.min.y),
                Alignment::Bottom => Vector::new(0.0, total.max.y - b.max.y),
                Alignment::VCenter => Vector::new(0.0, total.center().y - b.center().y),
            };
            chart.translate_object(r, v);
        }
        debug!(?alignment, count = self.refs.len(), "selection aligned");
    }

    /// Mirrors object positions across the selection's center axis.
    /// Positional only: each object keeps its own orientation.
    pub fn flip(&self, chart: &mut SubChart, axis: FlipAxis) {
        let Some(total) = self.bounding_box(chart) else {
            return;
        };
        let center = total.center();
        for &r in &self.refs {
            let Some(b) = chart.bbox_of(r) else { continue };
            let c = b.center();
            let v = match axis {
                FlipAxis::Horizontal => Vector::new(2.0 * (center.x - c.x), 0.0),
                FlipAxis::Vertical => Vector::new(0.0, 2.0 * (center.y - c.y)),
            };
            chart.translate_object(r, v);
        }
    }

    /// Deep-clones everything selected, offset one chair spacing down and
    /// right, and moves the selection onto the copies.
    pub fn duplicate(&mut self, chart: &mut SubChart, next_uuid: &mut impl FnMut() -> u64) {
        let offset = Vector::new(CHAIR_SPACING, CHAIR_SPACING);
        let mut copies = Vec::with_capacity(self.refs.len());
        for &r in &self.refs {
            if let Some(copy) = chart.duplicate_object(r, offset, next_uuid) {
                copies.push(copy);
            }
        }
        debug!(count = copies.len(), "selection duplicated");
        self.refs = copies;
    }

    /// Removes everything selected and clears the selection. Removal runs
    /// highest index first per kind so earlier handles stay valid while
    /// the batch drains.
    pub fn delete(&mut self, chart: &mut SubChart) -> usize {
        let mut by_kind: HashMap<ObjectKind, Vec<usize>> = HashMap::new();
        for &r in &self.refs {
            by_kind.entry(r.kind).or_default().push(r.index);
        }
        let mut removed = 0;
        for (kind, mut indices) in by_kind {
            indices.sort_unstable_by(|a, b| b.cmp(a));
            indices.dedup();
            for index in indices {
                if chart.remove_object(ObjectRef::new(kind, index)) {
                    removed += 1;
                }
            }
        }
        self.refs.clear();
        debug!(removed, "selection deleted");
        removed
    }

    /// Shared rotation of every selected object that has one, for the
    /// rotation slider. Mixed values (or none) yield the default.
    pub fn uniform_rotation_or(&self, chart: &SubChart, default: f64) -> f64 {
        uniform(self.refs.iter().filter_map(|&r| rotation_of(chart, r))).unwrap_or(default)
    }

    /// Curves the selected row. No-op unless exactly one row is selected.
    pub fn apply_curve(&self, chart: &mut SubChart, amount: f64) {
        if !self.can_curve() {
            return;
        }
        if let Some(r) = self.single() {
            if let Some(row) = chart.rows.get_mut(r.index) {
                row.do_curve(amount);
            }
        }
    }

    /// Chair-count slider: applies to every selected table.
    pub fn set_chair_count(
        &self,
        chart: &mut SubChart,
        count: u32,
        next_uuid: &mut impl FnMut() -> u64,
    ) {
        for &r in &self.refs {
            match r.kind {
                ObjectKind::RoundTable => {
                    if let Some(t) = chart.round_tables.get_mut(r.index) {
                        t.set_chair_count(count, &mut *next_uuid);
                    }
                }
                ObjectKind::RectTable => {
                    if let Some(t) = chart.rect_tables.get_mut(r.index) {
                        t.set_chair_count(count, &mut *next_uuid);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn uniform_chair_count_or(&self, chart: &SubChart, default: u32) -> u32 {
        uniform(self.refs.iter().filter_map(|&r| match r.kind {
            ObjectKind::RoundTable => Some(chart.round_tables.get(r.index)?.chairs.len() as u32),
            ObjectKind::RectTable => Some(chart.rect_tables.get(r.index)?.chairs.len() as u32),
            _ => None,
        }))
        .unwrap_or(default)
    }

    /// Radius slider: round tables (chairs ride along) and circle shapes.
    pub fn set_radius(&self, chart: &mut SubChart, radius: f64) {
        for &r in &self.refs {
            match r.kind {
                ObjectKind::RoundTable => {
                    if let Some(t) = chart.round_tables.get_mut(r.index) {
                        t.radius = radius;
                        t.reposition_chairs();
                    }
                }
                ObjectKind::Shape => {
                    if let Some(s) = chart.shapes.get_mut(r.index) {
                        if let crate::model::ShapeKind::Circle { radius: ref mut rr, .. } = s.kind {
                            *rr = radius;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    pub fn uniform_radius_or(&self, chart: &SubChart, default: f64) -> f64 {
        uniform(self.refs.iter().filter_map(|&r| match r.kind {
            ObjectKind::RoundTable => Some(chart.round_tables.get(r.index)?.radius),
            ObjectKind::Shape => match chart.shapes.get(r.index)?.kind {
                crate::model::ShapeKind::Circle { radius, .. } => Some(radius),
                _ => None,
            },
            _ => None,
        }))
        .unwrap_or(default)
    }

    /// Stroke-width slider over annotation shapes.
    pub fn set_stroke_width(&self, chart: &mut SubChart, width: f64) {
        for &r in &self.refs {
            if r.kind == ObjectKind::Shape {
                if let Some(s) = chart.shapes.get_mut(r.index) {
                    s.stroke_width = width;
                }
            }
        }
    }

    pub fn uniform_stroke_width_or(&self, chart: &SubChart, default: f64) -> f64 {
        uniform(self.refs.iter().filter_map(|&r| match r.kind {
            ObjectKind::Shape => Some(chart.shapes.get(r.index)?.stroke_width),
            _ => None,
        }))
        .unwrap_or(default)
    }

    /// Font-size slider over text labels.
    pub fn set_font_size(&self, chart: &mut SubChart, size: f64) {
        for &r in &self.refs {
            if r.kind == ObjectKind::Text {
                if let Some(t) = chart.texts.get_mut(r.index) {
                    t.font_size = size;
                }
            }
        }
    }

    pub fn uniform_font_size_or(&self, chart: &SubChart, default: f64) -> f64 {
        uniform(self.refs.iter().filter_map(|&r| match r.kind {
            ObjectKind::Text => Some(chart.texts.get(r.index)?.font_size),
            _ => None,
        }))
        .unwrap_or(default)
    }

    /// Label-size slider over sections.
    pub fn set_label_size(&self, chart: &mut SubChart, size: f64) {
        for &r in &self.refs {
            if r.kind == ObjectKind::Section {
                if let Some(s) = chart.sections.get_mut(r.index) {
                    s.label_size = size;
                }
            }
        }
    }
}

/// `Some(v)` when every item equals `v`, else `None`.
fn uniform<T: PartialEq>(mut it: impl Iterator<Item = T>) -> Option<T> {
    let first = it.next()?;
    for item in it {
        if item != first {
            return None;
        }
    }
    Some(first)
}

fn rotation_of(chart: &SubChart, r: ObjectRef) -> Option<f64> {
    match r.kind {
        ObjectKind::RoundTable => Some(chart.round_tables.get(r.index)?.rotation),
        ObjectKind::RectTable => Some(chart.rect_tables.get(r.index)?.rotation),
        ObjectKind::Booth => Some(chart.booths.get(r.index)?.rotation),
        ObjectKind::Shape => Some(chart.shapes.get(r.index)?.rotation),
        ObjectKind::Text => Some(chart.texts.get(r.index)?.rotation),
        _ => None,
    }
}
