//! The editable surface owning scene objects.
//!
//! A `SubChart` is either the master (whole-venue) chart or the interior
//! of one section. Objects live in typed collections; `ObjectRef` handles
//! address them positionally and every cross-variant operation is an
//! exhaustive match on `ObjectKind`, so adding a variant is a
//! compile-time-checked exercise.

use serde::{Deserialize, Serialize};

use seatkit_core::{Bbox, Point, Vector};

use crate::category::CategoryId;
use crate::model::{
    Booth, Chair, FocalPoint, GaArea, ObjectKind, ObjectRef, RectTable, RoundTable, Row, Section,
    ShapedObject, TextLabel,
};

/// Master chart vs. one section's interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubChartKind {
    Master,
    Section,
}

/// Load state of the optional background image. Loading is the only
/// asynchronous boundary in the editor; a failure is a recoverable notice,
/// never a mutation rollback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackgroundStatus {
    Pending,
    Ready { width: f64, height: f64 },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub href: String,
    pub status: BackgroundStatus,
}

impl BackgroundImage {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            status: BackgroundStatus::Pending,
        }
    }

    /// Host callback once the image bytes decoded.
    pub fn resolve_loaded(&mut self, width: f64, height: f64) {
        self.status = BackgroundStatus::Ready { width, height };
    }

    /// Host callback on a failed fetch or decode. The chart keeps
    /// editing; the background simply stays absent.
    pub fn resolve_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(href = %self.href, %reason, "background image failed to load");
        self.status = BackgroundStatus::Failed { reason };
    }
}

/// One editable surface and its objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubChart {
    pub kind: SubChartKind,
    pub rows: Vec<Row>,
    pub round_tables: Vec<RoundTable>,
    pub rect_tables: Vec<RectTable>,
    pub booths: Vec<Booth>,
    /// Master only; a section's interior never nests further sections.
    pub sections: Vec<Section>,
    pub ga_areas: Vec<GaArea>,
    pub shapes: Vec<ShapedObject>,
    pub texts: Vec<TextLabel>,
    /// Master only.
    pub focal_point: Option<FocalPoint>,
    /// Master only.
    pub background: Option<BackgroundImage>,
    pub size: (f64, f64),
    /// Offset the stored coordinates were shifted by on the last save;
    /// coordinates in a persisted document are relative to the subchart's
    /// own bounding box so a section interior is portable.
    pub snap_offset: Vector,
}

impl SubChart {
    pub fn new(kind: SubChartKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            round_tables: Vec::new(),
            rect_tables: Vec::new(),
            booths: Vec::new(),
            sections: Vec::new(),
            ga_areas: Vec::new(),
            shapes: Vec::new(),
            texts: Vec::new(),
            focal_point: None,
            background: None,
            size: (0.0, 0.0),
            snap_offset: Vector::new(0.0, 0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
            && self.round_tables.is_empty()
            && self.rect_tables.is_empty()
            && self.booths.is_empty()
            && self.sections.is_empty()
            && self.ga_areas.is_empty()
            && self.shapes.is_empty()
            && self.texts.is_empty()
            && self.focal_point.is_none()
    }

    /// Handles for every object currently on the chart.
    pub fn object_refs(&self) -> Vec<ObjectRef> {
        let mut refs = Vec::new();
        let mut push = |kind: ObjectKind, len: usize| {
            refs.extend((0..len).map(|i| ObjectRef::new(kind, i)));
        };
        push(ObjectKind::Row, self.rows.len());
        push(ObjectKind::RoundTable, self.round_tables.len());
        push(ObjectKind::RectTable, self.rect_tables.len());
        push(ObjectKind::Booth, self.booths.len());
        push(ObjectKind::Section, self.sections.len());
        push(ObjectKind::GaArea, self.ga_areas.len());
        push(ObjectKind::Shape, self.shapes.len());
        push(ObjectKind::Text, self.texts.len());
        if self.focal_point.is_some() {
            refs.push(ObjectRef::new(ObjectKind::FocalPoint, 0));
        }
        refs
    }

    pub fn bbox_of(&self, r: ObjectRef) -> Option<Bbox> {
        match r.kind {
            ObjectKind::Row => self.rows.get(r.index)?.bounding_box(),
            ObjectKind::RoundTable => Some(self.round_tables.get(r.index)?.bounding_box()),
            ObjectKind::RectTable => Some(self.rect_tables.get(r.index)?.bounding_box()),
            ObjectKind::Booth => Some(self.booths.get(r.index)?.bounding_box()),
            ObjectKind::Section => self.sections.get(r.index)?.bounding_box(),
            ObjectKind::GaArea => self.ga_areas.get(r.index)?.bounding_box(),
            ObjectKind::Shape => Some(self.shapes.get(r.index)?.bounding_box()),
            ObjectKind::Text => Some(self.texts.get(r.index)?.bounding_box()),
            ObjectKind::FocalPoint => {
                let fp = self.focal_point.as_ref()?;
                Some(Bbox::new(fp.point, fp.point).pad(8.0))
            }
        }
    }

    pub fn translate_object(&mut self, r: ObjectRef, v: Vector) {
        match r.kind {
            ObjectKind::Row => {
                if let Some(o) = self.rows.get_mut(r.index) {
                    o.translate(v);
                }
            }
            ObjectKind::RoundTable => {
                if let Some(o) = self.round_tables.get_mut(r.index) {
                    o.translate(v);
                }
            }
            ObjectKind::RectTable => {
                if let Some(o) = self.rect_tables.get_mut(r.index) {
                    o.translate(v);
                }
            }
            ObjectKind::Booth => {
                if let Some(o) = self.booths.get_mut(r.index) {
                    o.translate(v);
                }
            }
            ObjectKind::Section => {
                if let Some(o) = self.sections.get_mut(r.index) {
                    o.translate(v);
                }
            }
            ObjectKind::GaArea => {
                if let Some(o) = self.ga_areas.get_mut(r.index) {
                    o.translate(v);
                }
            }
            ObjectKind::Shape => {
                if let Some(o) = self.shapes.get_mut(r.index) {
                    o.translate(v);
                }
            }
            ObjectKind::Text => {
                if let Some(o) = self.texts.get_mut(r.index) {
                    o.translate(v);
                }
            }
            ObjectKind::FocalPoint => {
                if let Some(fp) = self.focal_point.as_mut() {
                    fp.translate(v);
                }
            }
        }
    }

    pub fn rotate_object(&mut self, r: ObjectRef, center: Point, degrees: f64) {
        match r.kind {
            ObjectKind::Row => {
                if let Some(o) = self.rows.get_mut(r.index) {
                    o.rotate_around(center, degrees);
                }
            }
            ObjectKind::RoundTable => {
                if let Some(o) = self.round_tables.get_mut(r.index) {
                    o.rotate_around(center, degrees);
                }
            }
            ObjectKind::RectTable => {
                if let Some(o) = self.rect_tables.get_mut(r.index) {
                    o.rotate_around(center, degrees);
                }
            }
            ObjectKind::Booth => {
                if let Some(o) = self.booths.get_mut(r.index) {
                    o.rotate_around(center, degrees);
                }
            }
            ObjectKind::Section => {
                if let Some(o) = self.sections.get_mut(r.index) {
                    o.rotate_around(center, degrees);
                }
            }
            ObjectKind::GaArea => {
                if let Some(o) = self.ga_areas.get_mut(r.index) {
                    o.rotate_around(center, degrees);
                }
            }
            ObjectKind::Shape => {
                if let Some(o) = self.shapes.get_mut(r.index) {
                    o.rotate_around(center, degrees);
                }
            }
            ObjectKind::Text => {
                if let Some(o) = self.texts.get_mut(r.index) {
                    o.rotate_around(center, degrees);
                }
            }
            // The focal point is a single marker; rotation is meaningless.
            ObjectKind::FocalPoint => {}
        }
    }

    /// Removes an object. Positional handles above the removed index are
    /// invalidated; callers drop or refresh their selections.
    pub fn remove_object(&mut self, r: ObjectRef) -> bool {
        match r.kind {
            ObjectKind::Row => {
                (r.index < self.rows.len()).then(|| self.rows.remove(r.index)).is_some()
            }
            ObjectKind::RoundTable => (r.index < self.round_tables.len())
                .then(|| self.round_tables.remove(r.index))
                .is_some(),
            ObjectKind::RectTable => (r.index < self.rect_tables.len())
                .then(|| self.rect_tables.remove(r.index))
                .is_some(),
            ObjectKind::Booth => {
                (r.index < self.booths.len()).then(|| self.booths.remove(r.index)).is_some()
            }
            ObjectKind::Section => (r.index < self.sections.len())
                .then(|| self.sections.remove(r.index))
                .is_some(),
            ObjectKind::GaArea => (r.index < self.ga_areas.len())
                .then(|| self.ga_areas.remove(r.index))
                .is_some(),
            ObjectKind::Shape => {
                (r.index < self.shapes.len()).then(|| self.shapes.remove(r.index)).is_some()
            }
            ObjectKind::Text => {
                (r.index < self.texts.len()).then(|| self.texts.remove(r.index)).is_some()
            }
            ObjectKind::FocalPoint => self.focal_point.take().is_some(),
        }
    }

    /// Deep-clones an object with fresh uuids and cleared ids, offset so
    /// the copy does not sit exactly on the original. Returns the handle
    /// of the copy.
    pub fn duplicate_object(
        &mut self,
        r: ObjectRef,
        offset: Vector,
        next_uuid: &mut impl FnMut() -> u64,
    ) -> Option<ObjectRef> {
        match r.kind {
            ObjectKind::Row => {
                let mut copy = self.rows.get(r.index)?.duplicate(&mut *next_uuid);
                copy.translate(offset);
                self.rows.push(copy);
                Some(ObjectRef::new(ObjectKind::Row, self.rows.len() - 1))
            }
            ObjectKind::RoundTable => {
                let mut copy = self.round_tables.get(r.index)?.duplicate(&mut *next_uuid);
                copy.translate(offset);
                self.round_tables.push(copy);
                Some(ObjectRef::new(ObjectKind::RoundTable, self.round_tables.len() - 1))
            }
            ObjectKind::RectTable => {
                let mut copy = self.rect_tables.get(r.index)?.duplicate(&mut *next_uuid);
                copy.translate(offset);
                self.rect_tables.push(copy);
                Some(ObjectRef::new(ObjectKind::RectTable, self.rect_tables.len() - 1))
            }
            ObjectKind::Booth => {
                let mut copy = self.booths.get(r.index)?.duplicate(&mut *next_uuid);
                copy.translate(offset);
                self.booths.push(copy);
                Some(ObjectRef::new(ObjectKind::Booth, self.booths.len() - 1))
            }
            ObjectKind::Section => {
                let mut copy = self.sections.get(r.index)?.duplicate(&mut *next_uuid);
                copy.translate(offset);
                self.sections.push(copy);
                Some(ObjectRef::new(ObjectKind::Section, self.sections.len() - 1))
            }
            ObjectKind::GaArea => {
                let mut copy = self.ga_areas.get(r.index)?.duplicate(&mut *next_uuid);
                copy.translate(offset);
                self.ga_areas.push(copy);
                Some(ObjectRef::new(ObjectKind::GaArea, self.ga_areas.len() - 1))
            }
            ObjectKind::Shape => {
                let mut copy = self.shapes.get(r.index)?.duplicate(&mut *next_uuid);
                copy.translate(offset);
                self.shapes.push(copy);
                Some(ObjectRef::new(ObjectKind::Shape, self.shapes.len() - 1))
            }
            ObjectKind::Text => {
                let mut copy = self.texts.get(r.index)?.duplicate(&mut *next_uuid);
                copy.translate(offset);
                self.texts.push(copy);
                Some(ObjectRef::new(ObjectKind::Text, self.texts.len() - 1))
            }
            // There is only ever one focal point.
            ObjectKind::FocalPoint => None,
        }
    }

    pub fn label_of(&self, r: ObjectRef) -> Option<String> {
        match r.kind {
            ObjectKind::Row => self.rows.get(r.index)?.label.clone(),
            ObjectKind::RoundTable => self.round_tables.get(r.index)?.label.clone(),
            ObjectKind::RectTable => self.rect_tables.get(r.index)?.label.clone(),
            ObjectKind::Booth => self.booths.get(r.index)?.label.clone(),
            ObjectKind::Section => self.sections.get(r.index)?.label.clone(),
            ObjectKind::GaArea => self.ga_areas.get(r.index)?.label.clone(),
            ObjectKind::Text => Some(self.texts.get(r.index)?.text.clone()),
            ObjectKind::Shape | ObjectKind::FocalPoint => None,
        }
    }

    pub fn set_label(&mut self, r: ObjectRef, label: Option<String>) {
        match r.kind {
            ObjectKind::Row => {
                if let Some(o) = self.rows.get_mut(r.index) {
                    o.label = label;
                }
            }
            ObjectKind::RoundTable => {
                if let Some(o) = self.round_tables.get_mut(r.index) {
                    o.label = label;
                }
            }
            ObjectKind::RectTable => {
                if let Some(o) = self.rect_tables.get_mut(r.index) {
                    o.label = label;
                }
            }
            ObjectKind::Booth => {
                if let Some(o) = self.booths.get_mut(r.index) {
                    o.label = label;
                }
            }
            ObjectKind::Section => {
                if let Some(o) = self.sections.get_mut(r.index) {
                    o.label = label;
                }
            }
            ObjectKind::GaArea => {
                if let Some(o) = self.ga_areas.get_mut(r.index) {
                    o.label = label;
                }
            }
            ObjectKind::Text => {
                if let Some(o) = self.texts.get_mut(r.index) {
                    o.text = label.unwrap_or_default();
                }
            }
            ObjectKind::Shape | ObjectKind::FocalPoint => {}
        }
    }

    /// Visits every seat with its parent label ("unset" for unlabeled
    /// parents). Covers rows and both table kinds.
    pub fn for_each_seat(&self, mut f: impl FnMut(&str, &Chair)) {
        for row in &self.rows {
            let parent = row.label.as_deref().unwrap_or(crate::model::UNSET_LABEL);
            for chair in &row.chairs {
                f(parent, chair);
            }
        }
        for table in &self.round_tables {
            let parent = table.label.as_deref().unwrap_or(crate::model::UNSET_LABEL);
            for chair in &table.chairs {
                f(parent, chair);
            }
        }
        for table in &self.rect_tables {
            let parent = table.label.as_deref().unwrap_or(crate::model::UNSET_LABEL);
            for chair in &table.chairs {
                f(parent, chair);
            }
        }
    }

    pub fn for_each_seat_mut(&mut self, mut f: impl FnMut(&mut Chair)) {
        for row in &mut self.rows {
            for chair in &mut row.chairs {
                f(chair);
            }
        }
        for table in &mut self.round_tables {
            for chair in &mut table.chairs {
                f(chair);
            }
        }
        for table in &mut self.rect_tables {
            for chair in &mut table.chairs {
                f(chair);
            }
        }
    }

    pub fn chair_mut(&mut self, uuid: u64) -> Option<&mut Chair> {
        for row in &mut self.rows {
            if let Some(c) = row.chairs.iter_mut().find(|c| c.uuid == uuid) {
                return Some(c);
            }
        }
        for table in &mut self.round_tables {
            if let Some(c) = table.chairs.iter_mut().find(|c| c.uuid == uuid) {
                return Some(c);
            }
        }
        for table in &mut self.rect_tables {
            if let Some(c) = table.chairs.iter_mut().find(|c| c.uuid == uuid) {
                return Some(c);
            }
        }
        None
    }

    pub fn seat_count(&self) -> usize {
        let mut n = 0;
        self.for_each_seat(|_, _| n += 1);
        n
    }

    /// Assigns a category to a seat by uuid. When the seat belongs to a
    /// table the category propagates to the table itself, so the table's
    /// derived color follows its seats. Returns whether a seat matched.
    pub fn apply_category_to_seat(&mut self, seat_uuid: u64, category: CategoryId) -> bool {
        for row in &mut self.rows {
            for chair in &mut row.chairs {
                if chair.uuid == seat_uuid {
                    chair.category = Some(category);
                    return true;
                }
            }
        }
        for table in &mut self.round_tables {
            if table.chairs.iter().any(|c| c.uuid == seat_uuid) {
                for chair in &mut table.chairs {
                    if chair.uuid == seat_uuid {
                        chair.category = Some(category);
                    }
                }
                table.category = Some(category);
                return true;
            }
        }
        for table in &mut self.rect_tables {
            if table.chairs.iter().any(|c| c.uuid == seat_uuid) {
                for chair in &mut table.chairs {
                    if chair.uuid == seat_uuid {
                        chair.category = Some(category);
                    }
                }
                table.category = Some(category);
                return true;
            }
        }
        false
    }

    /// Bounding box of the whole chart content.
    pub fn bounding_box(&self) -> Option<Bbox> {
        self.object_refs()
            .into_iter()
            .filter_map(|r| self.bbox_of(r))
            .reduce(|a, b| a.union(&b))
    }

    /// Handles of every object whose box intersects the rubber-band
    /// rectangle.
    pub fn refs_intersecting(&self, rect: &Bbox) -> Vec<ObjectRef> {
        self.object_refs()
            .into_iter()
            .filter(|r| self.bbox_of(*r).is_some_and(|b| b.intersects(rect)))
            .collect()
    }

    /// Topmost object whose box contains the point. Text sits above
    /// shapes, objects above sections, matching the render layer order.
    pub fn ref_at(&self, p: Point) -> Option<ObjectRef> {
        let layered: Vec<ObjectKind> = vec![
            ObjectKind::FocalPoint,
            ObjectKind::Text,
            ObjectKind::Shape,
            ObjectKind::Row,
            ObjectKind::RoundTable,
            ObjectKind::RectTable,
            ObjectKind::Booth,
            ObjectKind::GaArea,
            ObjectKind::Section,
        ];
        for kind in layered {
            let hit = self
                .object_refs()
                .into_iter()
                .filter(|r| r.kind == kind)
                .rev()
                .find(|r| self.bbox_of(*r).is_some_and(|b| b.contains(p)));
            if hit.is_some() {
                return hit;
            }
        }
        None
    }

    /// The seat under the pointer, if any (hit radius is the chair
    /// radius).
    pub fn seat_at(&self, p: Point) -> Option<u64> {
        let mut hit = None;
        self.for_each_seat(|_, chair| {
            if hit.is_none()
                && chair.center.distance_to(p) <= seatkit_core::constants::CHAIR_RADIUS
            {
                hit = Some(chair.uuid);
            }
        });
        hit
    }

    /// Shifts every object (used to re-anchor relative coordinates after
    /// a load).
    pub fn translate_all(&mut self, v: Vector) {
        for r in self.object_refs() {
            self.translate_object(r, v);
        }
    }

    /// Refreshes every uuid and clears every stable id, recursively.
    /// Used when a whole subtree is deep-cloned.
    pub fn regenerate_identity(&mut self, next_uuid: &mut impl FnMut() -> u64) {
        for row in &mut self.rows {
            row.uuid = next_uuid();
            for chair in &mut row.chairs {
                chair.uuid = next_uuid();
                chair.id = None;
                chair.id_key = None;
            }
        }
        for table in &mut self.round_tables {
            table.uuid = next_uuid();
            table.id = None;
            table.id_key = None;
            for chair in &mut table.chairs {
                chair.uuid = next_uuid();
                chair.id = None;
                chair.id_key = None;
            }
        }
        for table in &mut self.rect_tables {
            table.uuid = next_uuid();
            table.id = None;
            table.id_key = None;
            for chair in &mut table.chairs {
                chair.uuid = next_uuid();
                chair.id = None;
                chair.id_key = None;
            }
        }
        for booth in &mut self.booths {
            booth.uuid = next_uuid();
            booth.id = None;
            booth.id_key = None;
        }
        for area in &mut self.ga_areas {
            area.uuid = next_uuid();
        }
        for shape in &mut self.shapes {
            shape.uuid = next_uuid();
        }
        for text in &mut self.texts {
            text.uuid = next_uuid();
        }
        for section in &mut self.sections {
            section.uuid = next_uuid();
            section.interior.regenerate_identity(next_uuid);
        }
    }

    /// Corner points of every closed section outline, offered as snap
    /// targets while drawing a neighboring polygon.
    pub fn section_corners(&self) -> Vec<Point> {
        self.sections.iter().flat_map(|s| s.points.iter().copied()).collect()
    }
}
