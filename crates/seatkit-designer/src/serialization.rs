//! Chart persistence.
//!
//! Documents are JSON with every scene object flattened into one tagged
//! record type (`ObjectData`, discriminated by `shape_type`), so old
//! readers skip fields they do not know and new readers default fields
//! an old writer never wrote.
//!
//! Saving also runs identity reconciliation: every seat, table and booth
//! gets a stable ticketing id that survives geometry edits but is
//! invalidated when the identity-bearing fields (category, parent label,
//! own label) change.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use seatkit_core::{ChartError, Point, Result, Vector};

use crate::category::{CategoryId, CategoryRegistry};
use crate::chart::{ChartSession, ChartSettings};
use crate::model::{
    Booth, Chair, FocalPoint, GaArea, GaShape, RectTable, RectTableLayout, RoundTable, Row,
    Section, ShapeKind, ShapedObject, TextLabel, UNSET_LABEL,
};
use crate::subchart::{SubChart, SubChartKind};

/// Bumped when the document layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 3;

const TAG_ROW: &str = "row";
const TAG_ROUND_TABLE: &str = "roundTable";
const TAG_RECT_TABLE: &str = "rectTable";
const TAG_BOOTH: &str = "booth";
const TAG_SECTION: &str = "section";
const TAG_GA_AREA: &str = "gaArea";
const TAG_SHAPE: &str = "shape";
const TAG_TEXT: &str = "text";
const TAG_FOCAL_POINT: &str = "focalPoint";

fn default_true() -> bool {
    true
}

fn default_unset() -> String {
    UNSET_LABEL.to_string()
}

fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

/// A persisted chart document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDocument {
    pub metadata: DocMetadata,
    pub settings: ChartSettings,
    pub categories: CategoryRegistry,
    pub chart: SubChartData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMetadata {
    pub chart_id: uuid::Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub version: u32,
}

/// One subchart, recursively (section interiors nest).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubChartData {
    #[serde(default)]
    pub objects: Vec<ObjectData>,
    #[serde(default)]
    pub size: (f64, f64),
    /// The offset subtracted from every coordinate when this subchart was
    /// written; coordinates in the file are relative to the content's own
    /// top-left corner.
    #[serde(default)]
    pub snap_offset: (f64, f64),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_href: Option<String>,
}

/// One persisted seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChairData {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_unset")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_key: Option<String>,
}

/// One persisted scene object. `shape_type` selects the variant; every
/// other field is defaulted so records only carry what their variant
/// uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectData {
    pub shape_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub closed: bool,
    #[serde(default, skip_serializing_if = "is_default")]
    pub width: f64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub height: f64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub radius: f64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chairs: Vec<ChairData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<RectTableLayout>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub curve: f64,
    #[serde(default = "default_true")]
    pub auto_labelable: bool,
    #[serde(default, skip_serializing_if = "is_default")]
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "is_default")]
    pub booked: u32,
    /// Sub-variant for `gaArea` and `shape` records: "polygon",
    /// "circle" or "rect".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub above_everything: bool,
    #[serde(default, skip_serializing_if = "is_default")]
    pub label_size: f64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub label_rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interior: Option<Box<SubChartData>>,
}

impl ObjectData {
    fn tagged(shape_type: &str) -> Self {
        Self {
            shape_type: shape_type.to_string(),
            auto_labelable: true,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// identity reconciliation

fn identity_key(category: Option<CategoryId>, parent_label: &str, own_label: &str) -> String {
    let cat = category.map_or_else(|| UNSET_LABEL.to_string(), |c| c.to_string());
    format!("{cat}-{parent_label}-{own_label}")
}

struct Reconciler<'a> {
    loaded: &'a HashMap<String, u64>,
    claimed_keys: HashSet<String>,
    next_ids: HashMap<String, u64>,
    fresh: Box<dyn FnMut() -> u64 + 'a>,
    reused: usize,
    issued: usize,
}

impl<'a> Reconciler<'a> {
    fn new(loaded: &'a HashMap<String, u64>, fresh: impl FnMut() -> u64 + 'a) -> Self {
        Self {
            loaded,
            claimed_keys: HashSet::new(),
            next_ids: HashMap::new(),
            fresh: Box::new(fresh),
            reused: 0,
            issued: 0,
        }
    }

    /// Settles one object's stable id. Reuses the current id while the
    /// key is unchanged, resurrects the loaded id when the key matches a
    /// loaded entry, and mints a fresh one otherwise. A key can only be
    /// claimed once per save; collisions get fresh ids.
    fn settle(&mut self, key: String, id: &mut Option<u64>, id_key: &mut Option<String>) {
        let first_claim = self.claimed_keys.insert(key.clone());
        let keep_current = first_claim && id.is_some() && id_key.as_deref() == Some(key.as_str());
        let resolved = if keep_current {
            self.reused += 1;
            id.take().unwrap_or_default()
        } else if first_claim && self.loaded.contains_key(&key) {
            self.reused += 1;
            self.loaded[&key]
        } else {
            self.issued += 1;
            (self.fresh)()
        };
        *id = Some(resolved);
        *id_key = Some(key.clone());
        self.next_ids.insert(key, resolved);
    }

    fn settle_chart(&mut self, chart: &mut SubChart) {
        for row in &mut chart.rows {
            let parent = row.label.clone().unwrap_or_else(|| UNSET_LABEL.to_string());
            for chair in &mut row.chairs {
                let key = identity_key(chair.category, &parent, chair.label_or_unset());
                self.settle(key, &mut chair.id, &mut chair.id_key);
            }
        }
        for table in &mut chart.round_tables {
            let label = table.label.clone().unwrap_or_else(|| UNSET_LABEL.to_string());
            let key = identity_key(table.category, UNSET_LABEL, &label);
            self.settle(key, &mut table.id, &mut table.id_key);
            for chair in &mut table.chairs {
                let key = identity_key(chair.category, &label, chair.label_or_unset());
                self.settle(key, &mut chair.id, &mut chair.id_key);
            }
        }
        for table in &mut chart.rect_tables {
            let label = table.label.clone().unwrap_or_else(|| UNSET_LABEL.to_string());
            let key = identity_key(table.category, UNSET_LABEL, &label);
            self.settle(key, &mut table.id, &mut table.id_key);
            for chair in &mut table.chairs {
                let key = identity_key(chair.category, &label, chair.label_or_unset());
                self.settle(key, &mut chair.id, &mut chair.id_key);
            }
        }
        for booth in &mut chart.booths {
            let label = booth.label.clone().unwrap_or_else(|| UNSET_LABEL.to_string());
            let key = identity_key(booth.category, UNSET_LABEL, &label);
            self.settle(key, &mut booth.id, &mut booth.id_key);
        }
        for section in &mut chart.sections {
            self.settle_chart(&mut section.interior);
        }
    }
}

/// Assigns stable ids across the whole session. Runs exactly once per
/// save, before the document snapshot is taken.
pub fn reconcile_identities(session: &mut ChartSession) {
    let ChartSession {
        master,
        identity,
        loaded_ids,
        ..
    } = session;
    let mut reconciler = Reconciler::new(loaded_ids, || identity.fresh_id());
    reconciler.settle_chart(master);
    let (reused, issued, next) =
        (reconciler.reused, reconciler.issued, std::mem::take(&mut reconciler.next_ids));
    drop(reconciler);
    session.loaded_ids = next;
    debug!(reused, issued, "identities reconciled");
}

// ---------------------------------------------------------------------------
// save

/// Snapshots the session into a document, reconciling identities first.
/// Every subchart's coordinates are written relative to that subchart's
/// own top-left corner; the subtracted offsets are stored so the load
/// path can restore absolute positions.
pub fn save_session(session: &mut ChartSession) -> ChartDocument {
    reconcile_identities(session);
    session.touch();

    let mut master = session.master.clone();
    relativize_coordinates(&mut master);

    let doc = ChartDocument {
        metadata: DocMetadata {
            chart_id: session.chart_id,
            name: session.name.clone(),
            created_at: session.created_at,
            modified_at: session.modified_at,
            version: FORMAT_VERSION,
        },
        settings: session.settings.clone(),
        categories: session.categories.clone(),
        chart: write_subchart(&master),
    };
    info!(chart = %session.name, objects = doc.chart.objects.len(), "chart saved");
    doc
}

pub fn to_json(doc: &ChartDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Shifts a subchart so its content's bounding box starts at the origin,
/// recording the subtracted offset in `snap_offset`, then does the same
/// for every section interior. Interiors are anchored to their own box
/// rather than the parent outline, so the recursion order does not feed
/// one shift into another.
fn relativize_coordinates(chart: &mut SubChart) {
    let offset = chart
        .bounding_box()
        .map(|b| Vector::between(b.min, Point::new(0.0, 0.0)))
        .unwrap_or(Vector::new(0.0, 0.0));
    chart.translate_all(offset);
    chart.snap_offset = Vector::new(-offset.dx, -offset.dy);
    for section in &mut chart.sections {
        relativize_coordinates(&mut section.interior);
    }
}

fn chair_data(chair: &Chair) -> ChairData {
    ChairData {
        x: chair.center.x,
        y: chair.center.y,
        label: chair.label_or_unset().to_string(),
        category: chair.category,
        id: chair.id,
        id_key: chair.id_key.clone(),
    }
}

fn write_subchart(chart: &SubChart) -> SubChartData {
    let mut objects = Vec::new();

    for row in &chart.rows {
        let mut o = ObjectData::tagged(TAG_ROW);
        o.label = row.label.clone();
        o.curve = row.curve;
        o.auto_labelable = row.auto_labelable;
        o.chairs = row.chairs.iter().map(chair_data).collect();
        objects.push(o);
    }
    for table in &chart.round_tables {
        let mut o = ObjectData::tagged(TAG_ROUND_TABLE);
        o.label = table.label.clone();
        o.category = table.category;
        o.id = table.id;
        o.id_key = table.id_key.clone();
        o.center = Some(table.center);
        o.radius = table.radius;
        o.rotation = table.rotation;
        o.chairs = table.chairs.iter().map(chair_data).collect();
        objects.push(o);
    }
    for table in &chart.rect_tables {
        let mut o = ObjectData::tagged(TAG_RECT_TABLE);
        o.label = table.label.clone();
        o.category = table.category;
        o.id = table.id;
        o.id_key = table.id_key.clone();
        o.center = Some(table.center);
        o.width = table.width;
        o.height = table.height;
        o.rotation = table.rotation;
        o.layout = Some(table.layout);
        o.chairs = table.chairs.iter().map(chair_data).collect();
        objects.push(o);
    }
    for booth in &chart.booths {
        let mut o = ObjectData::tagged(TAG_BOOTH);
        o.label = booth.label.clone();
        o.category = booth.category;
        o.id = booth.id;
        o.id_key = booth.id_key.clone();
        o.center = Some(booth.center);
        o.width = booth.width;
        o.height = booth.height;
        o.rotation = booth.rotation;
        objects.push(o);
    }
    for section in &chart.sections {
        let mut o = ObjectData::tagged(TAG_SECTION);
        o.label = section.label.clone();
        o.category = section.category;
        o.points = section.points.clone();
        o.closed = section.closed;
        o.label_size = section.label_size;
        o.label_rotation = section.label_rotation;
        o.interior = Some(Box::new(write_subchart(&section.interior)));
        objects.push(o);
    }
    for area in &chart.ga_areas {
        let mut o = ObjectData::tagged(TAG_GA_AREA);
        o.label = area.label.clone();
        o.category = area.category;
        o.capacity = area.capacity;
        o.booked = area.booked;
        match &area.shape {
            GaShape::Polygon { points, closed } => {
                o.variant = Some("polygon".to_string());
                o.points = points.clone();
                o.closed = *closed;
            }
            GaShape::Circle { center, radius } => {
                o.variant = Some("circle".to_string());
                o.center = Some(*center);
                o.radius = *radius;
            }
            GaShape::Rect { center, width, height, rotation } => {
                o.variant = Some("rect".to_string());
                o.center = Some(*center);
                o.width = *width;
                o.height = *height;
                o.rotation = *rotation;
            }
        }
        objects.push(o);
    }
    for shape in &chart.shapes {
        let mut o = ObjectData::tagged(TAG_SHAPE);
        o.rotation = shape.rotation;
        o.stroke_color = Some(shape.stroke_color.clone());
        o.stroke_width = shape.stroke_width;
        o.fill_color = Some(shape.fill_color.clone());
        match &shape.kind {
            ShapeKind::Circle { center, radius } => {
                o.variant = Some("circle".to_string());
                o.center = Some(*center);
                o.radius = *radius;
            }
            ShapeKind::Rect { center, width, height } => {
                o.variant = Some("rect".to_string());
                o.center = Some(*center);
                o.width = *width;
                o.height = *height;
            }
        }
        objects.push(o);
    }
    for text in &chart.texts {
        let mut o = ObjectData::tagged(TAG_TEXT);
        o.center = Some(text.origin);
        o.text = Some(text.text.clone());
        o.font_size = text.font_size;
        o.color = Some(text.color.clone());
        o.rotation = text.rotation;
        o.above_everything = text.above_everything;
        objects.push(o);
    }
    if let Some(fp) = &chart.focal_point {
        let mut o = ObjectData::tagged(TAG_FOCAL_POINT);
        o.center = Some(fp.point);
        objects.push(o);
    }

    SubChartData {
        objects,
        size: chart.size,
        snap_offset: (chart.snap_offset.dx, chart.snap_offset.dy),
        background_href: chart.background.as_ref().map(|b| b.href.clone()),
    }
}

// ---------------------------------------------------------------------------
// load

/// Rebuilds a session from a document. Runtime uuids are freshly
/// allocated; stable ids come from the file and seed both the
/// `loaded_ids` map and the id allocator (above the highest loaded id,
/// so fresh ids never collide).
pub fn load_session(doc: &ChartDocument) -> Result<ChartSession> {
    if doc.metadata.version > FORMAT_VERSION {
        return Err(ChartError::document(format!(
            "document version {} is newer than supported version {FORMAT_VERSION}",
            doc.metadata.version
        )));
    }

    let mut session = ChartSession::new(doc.metadata.name.clone());
    session.chart_id = doc.metadata.chart_id;
    session.created_at = doc.metadata.created_at;
    session.modified_at = doc.metadata.modified_at;
    session.settings = doc.settings.clone();
    session.categories = doc.categories.clone();

    let mut loaded_ids = HashMap::new();
    let mut max_id = 0;
    session.master = read_subchart(
        &doc.chart,
        SubChartKind::Master,
        &mut session.identity,
        &mut loaded_ids,
        &mut max_id,
    )?;
    session.identity.seed_above(max_id);
    session.loaded_ids = loaded_ids;
    let cleared = scrub_unknown_categories(&mut session.master, &session.categories);
    if cleared > 0 {
        warn!(cleared, "dropped references to categories missing from the document");
    }
    info!(chart = %session.name, ids = session.loaded_ids.len(), "chart loaded");
    Ok(session)
}

pub fn from_json(json: &str) -> Result<ChartSession> {
    let doc: ChartDocument = serde_json::from_str(json)?;
    load_session(&doc)
}

/// Clears category references that point at no registered category, so a
/// hand-edited or truncated document cannot smuggle dangling ids into the
/// session.
fn scrub_unknown_categories(chart: &mut SubChart, categories: &CategoryRegistry) -> usize {
    let mut cleared = 0;
    let mut check = |slot: &mut Option<CategoryId>| {
        if let Some(id) = *slot {
            if !categories.contains(id) {
                *slot = None;
                cleared += 1;
            }
        }
    };

    for row in &mut chart.rows {
        for chair in &mut row.chairs {
            check(&mut chair.category);
        }
    }
    for table in &mut chart.round_tables {
        check(&mut table.category);
        for chair in &mut table.chairs {
            check(&mut chair.category);
        }
    }
    for table in &mut chart.rect_tables {
        check(&mut table.category);
        for chair in &mut table.chairs {
            check(&mut chair.category);
        }
    }
    for booth in &mut chart.booths {
        check(&mut booth.category);
    }
    for area in &mut chart.ga_areas {
        check(&mut area.category);
    }
    for section in &mut chart.sections {
        check(&mut section.category);
    }
    drop(check);
    for section in &mut chart.sections {
        cleared += scrub_unknown_categories(&mut section.interior, categories);
    }
    cleared
}

fn read_chair(
    data: &ChairData,
    parent_label: &str,
    identity: &mut seatkit_core::IdentityAllocator,
    loaded_ids: &mut HashMap<String, u64>,
    max_id: &mut u64,
) -> Chair {
    let mut chair = Chair::new(Point::new(data.x, data.y), identity.fresh_uuid());
    if data.label != UNSET_LABEL {
        chair.label = Some(data.label.clone());
    }
    chair.category = data.category;
    chair.id = data.id;
    chair.id_key = data.id_key.clone();
    if let Some(id) = data.id {
        *max_id = (*max_id).max(id);
        let key = data
            .id_key
            .clone()
            .unwrap_or_else(|| identity_key(data.category, parent_label, &data.label));
        loaded_ids.insert(key, id);
    }
    chair
}

fn record_object_id(
    data: &ObjectData,
    loaded_ids: &mut HashMap<String, u64>,
    max_id: &mut u64,
) {
    if let Some(id) = data.id {
        *max_id = (*max_id).max(id);
        let label = data.label.as_deref().unwrap_or(UNSET_LABEL);
        let key = data
            .id_key
            .clone()
            .unwrap_or_else(|| identity_key(data.category, UNSET_LABEL, label));
        loaded_ids.insert(key, id);
    }
}

fn read_subchart(
    data: &SubChartData,
    kind: SubChartKind,
    identity: &mut seatkit_core::IdentityAllocator,
    loaded_ids: &mut HashMap<String, u64>,
    max_id: &mut u64,
) -> Result<SubChart> {
    let mut chart = SubChart::new(kind);
    chart.size = data.size;
    chart.snap_offset = Vector::new(data.snap_offset.0, data.snap_offset.1);
    chart.background = data.background_href.as_deref().map(crate::subchart::BackgroundImage::new);

    for o in &data.objects {
        match o.shape_type.as_str() {
            TAG_ROW => {
                let mut row = Row::new(identity.fresh_uuid());
                row.label = o.label.clone();
                row.curve = o.curve;
                row.auto_labelable = o.auto_labelable;
                let parent = o.label.as_deref().unwrap_or(UNSET_LABEL);
                for c in &o.chairs {
                    row.chairs.push(read_chair(c, parent, identity, loaded_ids, max_id));
                }
                chart.rows.push(row);
            }
            TAG_ROUND_TABLE => {
                let center = o.center.unwrap_or(Point::new(0.0, 0.0));
                let mut table = RoundTable::new(identity.fresh_uuid(), center, o.radius);
                table.label = o.label.clone();
                table.category = o.category;
                table.id = o.id;
                table.id_key = o.id_key.clone();
                table.rotation = o.rotation;
                record_object_id(o, loaded_ids, max_id);
                let parent = o.label.as_deref().unwrap_or(UNSET_LABEL);
                for c in &o.chairs {
                    table.chairs.push(read_chair(c, parent, identity, loaded_ids, max_id));
                }
                chart.round_tables.push(table);
            }
            TAG_RECT_TABLE => {
                let center = o.center.unwrap_or(Point::new(0.0, 0.0));
                let mut table =
                    RectTable::new(identity.fresh_uuid(), center, o.width, o.height);
                table.label = o.label.clone();
                table.category = o.category;
                table.id = o.id;
                table.id_key = o.id_key.clone();
                table.rotation = o.rotation;
                table.layout = o.layout.unwrap_or_default();
                record_object_id(o, loaded_ids, max_id);
                let parent = o.label.as_deref().unwrap_or(UNSET_LABEL);
                for c in &o.chairs {
                    table.chairs.push(read_chair(c, parent, identity, loaded_ids, max_id));
                }
                chart.rect_tables.push(table);
            }
            TAG_BOOTH => {
                let center = o.center.unwrap_or(Point::new(0.0, 0.0));
                let mut booth = Booth::new(identity.fresh_uuid(), center, o.width, o.height);
                booth.label = o.label.clone();
                booth.category = o.category;
                booth.id = o.id;
                booth.id_key = o.id_key.clone();
                booth.rotation = o.rotation;
                record_object_id(o, loaded_ids, max_id);
                chart.booths.push(booth);
            }
            TAG_SECTION => {
                let mut section = Section::new(identity.fresh_uuid());
                section.label = o.label.clone();
                section.category = o.category;
                section.points = o.points.clone();
                section.closed = o.closed;
                if o.label_size > 0.0 {
                    section.label_size = o.label_size;
                }
                section.label_rotation = o.label_rotation;
                if let Some(interior) = &o.interior {
                    section.interior =
                        read_subchart(interior, SubChartKind::Section, identity, loaded_ids, max_id)?;
                }
                chart.sections.push(section);
            }
            TAG_GA_AREA => {
                let mut area = match o.variant.as_deref() {
                    Some("circle") => GaArea::circle(
                        identity.fresh_uuid(),
                        o.center.unwrap_or(Point::new(0.0, 0.0)),
                        o.radius,
                    ),
                    Some("rect") => {
                        let mut a = GaArea::rect(
                            identity.fresh_uuid(),
                            o.center.unwrap_or(Point::new(0.0, 0.0)),
                            o.width,
                            o.height,
                        );
                        if let GaShape::Rect { rotation, .. } = &mut a.shape {
                            *rotation = o.rotation;
                        }
                        a
                    }
                    _ => {
                        let mut a = GaArea::polygon(identity.fresh_uuid());
                        a.shape = GaShape::Polygon {
                            points: o.points.clone(),
                            closed: o.closed,
                        };
                        a
                    }
                };
                area.label = o.label.clone();
                area.category = o.category;
                area.capacity = o.capacity;
                area.booked = o.booked;
                chart.ga_areas.push(area);
            }
            TAG_SHAPE => {
                let center = o.center.unwrap_or(Point::new(0.0, 0.0));
                let kind = match o.variant.as_deref() {
                    Some("circle") => ShapeKind::Circle { center, radius: o.radius },
                    _ => ShapeKind::Rect { center, width: o.width, height: o.height },
                };
                let mut shape = ShapedObject::new(identity.fresh_uuid(), kind);
                shape.rotation = o.rotation;
                if let Some(c) = &o.stroke_color {
                    shape.stroke_color = c.clone();
                }
                if o.stroke_width > 0.0 {
                    shape.stroke_width = o.stroke_width;
                }
                if let Some(c) = &o.fill_color {
                    shape.fill_color = c.clone();
                }
                chart.shapes.push(shape);
            }
            TAG_TEXT => {
                let origin = o.center.unwrap_or(Point::new(0.0, 0.0));
                let mut text = TextLabel::new(
                    identity.fresh_uuid(),
                    origin,
                    o.text.clone().unwrap_or_default(),
                );
                if o.font_size > 0.0 {
                    text.font_size = o.font_size;
                }
                if let Some(c) = &o.color {
                    text.color = c.clone();
                }
                text.rotation = o.rotation;
                text.above_everything = o.above_everything;
                chart.texts.push(text);
            }
            TAG_FOCAL_POINT => {
                if kind == SubChartKind::Master {
                    chart.focal_point =
                        Some(FocalPoint::new(o.center.unwrap_or(Point::new(0.0, 0.0))));
                } else {
                    warn!("focal point inside a section interior ignored");
                }
            }
            other => {
                return Err(ChartError::UnknownShapeType { tag: other.to_string() });
            }
        }
    }
    // stored coordinates are relative; shift back to absolute. Interiors
    // were already restored by their own recursive read.
    let offset = chart.snap_offset;
    chart.translate_all(offset);
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_labeled_row() -> ChartSession {
        let mut session = ChartSession::new("Main Hall");
        session.categories.add_seated(crate::category::Category::new(1, "Floor", "#f00"));
        let mut row = Row::new(session.identity.fresh_uuid());
        row.label = Some("A".into());
        for i in 0..3 {
            let mut chair =
                Chair::new(Point::new(100.0 + i as f64 * 25.0, 50.0), session.identity.fresh_uuid());
            chair.label = Some((i + 1).to_string());
            chair.category = Some(1);
            row.chairs.push(chair);
        }
        session.master.rows.push(row);
        session
    }

    #[test]
    fn reconcile_assigns_ids_once() {
        let mut session = session_with_labeled_row();
        reconcile_identities(&mut session);
        let first: Vec<_> = session.master.rows[0].chairs.iter().map(|c| c.id).collect();
        assert!(first.iter().all(|id| id.is_some()));

        reconcile_identities(&mut session);
        let second: Vec<_> = session.master.rows[0].chairs.iter().map(|c| c.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn label_edit_invalidates_the_id() {
        let mut session = session_with_labeled_row();
        reconcile_identities(&mut session);
        let old = session.master.rows[0].chairs[0].id;

        session.master.rows[0].chairs[0].label = Some("99".into());
        reconcile_identities(&mut session);
        let new = session.master.rows[0].chairs[0].id;
        assert_ne!(old, new);
    }

    #[test]
    fn geometry_edit_keeps_the_id() {
        let mut session = session_with_labeled_row();
        reconcile_identities(&mut session);
        let old = session.master.rows[0].chairs[0].id;

        session.master.rows[0].translate(Vector::new(500.0, 500.0));
        reconcile_identities(&mut session);
        assert_eq!(session.master.rows[0].chairs[0].id, old);
    }

    #[test]
    fn duplicate_keys_never_share_an_id() {
        let mut session = session_with_labeled_row();
        // force two chairs onto the same identity key
        session.master.rows[0].chairs[1].label = Some("1".into());
        reconcile_identities(&mut session);
        let a = session.master.rows[0].chairs[0].id;
        let b = session.master.rows[0].chairs[1].id;
        assert_ne!(a, b);
    }

    #[test]
    fn round_trip_preserves_ids_and_structure() {
        let mut session = session_with_labeled_row();
        let doc = save_session(&mut session);
        let ids: Vec<_> = session.master.rows[0].chairs.iter().map(|c| c.id).collect();

        let json = to_json(&doc).unwrap();
        let mut reloaded = from_json(&json).unwrap();
        assert_eq!(reloaded.master.rows.len(), 1);
        assert_eq!(reloaded.master.rows[0].chairs.len(), 3);
        assert_eq!(reloaded.categories.seated.len(), 1);

        // absolute positions are restored despite relative storage
        assert_eq!(reloaded.master.rows[0].chairs[0].center.x, 100.0);

        // a second save keeps the loaded ids
        let _ = save_session(&mut reloaded);
        let reloaded_ids: Vec<_> = reloaded.master.rows[0].chairs.iter().map(|c| c.id).collect();
        assert_eq!(ids, reloaded_ids);
    }

    #[test]
    fn fresh_ids_after_load_never_collide() {
        let mut session = session_with_labeled_row();
        let doc = save_session(&mut session);
        let json = to_json(&doc).unwrap();
        let mut reloaded = from_json(&json).unwrap();

        let max_loaded = reloaded.master.rows[0]
            .chairs
            .iter()
            .filter_map(|c| c.id)
            .max()
            .unwrap();
        assert!(reloaded.identity.fresh_id() > max_loaded);
    }

    #[test]
    fn unknown_shape_type_is_rejected() {
        let mut session = ChartSession::new("x");
        let mut doc = save_session(&mut session);
        doc.chart.objects.push(ObjectData::tagged("hologram"));
        let err = load_session(&doc).unwrap_err();
        assert!(matches!(err, ChartError::UnknownShapeType { tag } if tag == "hologram"));
    }

    #[test]
    fn dangling_category_references_are_cleared_on_load() {
        let mut session = session_with_labeled_row();
        let mut doc = save_session(&mut session);
        doc.categories = CategoryRegistry::new();

        let reloaded = load_session(&doc).unwrap();
        assert!(reloaded.master.rows[0].chairs.iter().all(|c| c.category.is_none()));
    }

    #[test]
    fn newer_format_version_is_rejected() {
        let mut session = ChartSession::new("x");
        let mut doc = save_session(&mut session);
        doc.metadata.version = FORMAT_VERSION + 1;
        assert!(load_session(&doc).is_err());
    }

    #[test]
    fn saved_coordinates_are_relative() {
        let mut session = session_with_labeled_row();
        let doc = save_session(&mut session);
        let row = &doc.chart.objects[0];
        assert_eq!(row.shape_type, TAG_ROW);
        // leftmost chair edge lands at x = 0 after the shift
        let min_x = row.chairs.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
        assert_eq!(min_x, seatkit_core::constants::CHAIR_RADIUS);
        assert_ne!(doc.chart.snap_offset, (0.0, 0.0));
    }

    #[test]
    fn section_interiors_are_stored_relative_and_restored() {
        let mut session = ChartSession::new("x");
        let mut section = Section::new(session.identity.fresh_uuid());
        section.points = vec![
            Point::new(0.0, 0.0),
            Point::new(200.0, 0.0),
            Point::new(200.0, 200.0),
            Point::new(0.0, 200.0),
        ];
        section.closed = true;
        let mut row = Row::new(session.identity.fresh_uuid());
        for i in 0..3 {
            row.chairs.push(Chair::new(
                Point::new(500.0 + i as f64 * 25.0, 400.0),
                session.identity.fresh_uuid(),
            ));
        }
        section.interior.rows.push(row);
        session.master.sections.push(section);

        let doc = save_session(&mut session);
        let interior = doc.chart.objects[0].interior.as_deref().unwrap();
        // interior chairs are relative to the interior's own box
        let min_x = interior.objects[0].chairs.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
        assert_eq!(min_x, seatkit_core::constants::CHAIR_RADIUS);
        assert_ne!(interior.snap_offset, (0.0, 0.0));

        let reloaded = from_json(&to_json(&doc).unwrap()).unwrap();
        let chair = &reloaded.master.sections[0].interior.rows[0].chairs[0];
        assert_eq!(chair.center, Point::new(500.0, 400.0));
    }
}
