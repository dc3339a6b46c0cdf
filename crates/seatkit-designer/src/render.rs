//! Rendering seam.
//!
//! The model never draws. A host hands `sync_chart` a `RenderSurface`
//! and the whole visible scene is re-issued as primitives, layer by
//! layer; the surface decides how (and whether) to batch, cache, or
//! diff. `RecordingSurface` captures the primitive stream for tests.

use serde::{Deserialize, Serialize};

use seatkit_core::constants::CHAIR_RADIUS;
use seatkit_core::{Bbox, Point};

use crate::category::CategoryRegistry;
use crate::chart::ChartSettings;
use crate::model::{GaShape, ShapeKind};
use crate::selection::Selection;
use crate::subchart::{BackgroundStatus, SubChart};

const UNCATEGORIZED_FILL: &str = "#d9d9d9";
const SELECTION_STROKE: &str = "#1a73e8";
const HANDLE_SIZE: f64 = 8.0;

/// Paint order, back to front. The derived `Ord` matches the stacking
/// order so surfaces can sort primitives by layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    Sections,
    Objects,
    Texts,
    SelectionRects,
    Handles,
}

/// Stroke and fill for one primitive. `None` means "do not paint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paint {
    pub stroke: Option<String>,
    pub fill: Option<String>,
    pub stroke_width: f64,
}

impl Paint {
    pub fn stroked(color: &str) -> Self {
        Self {
            stroke: Some(color.to_string()),
            fill: None,
            stroke_width: 1.0,
        }
    }

    pub fn filled(color: &str) -> Self {
        Self {
            stroke: None,
            fill: Some(color.to_string()),
            stroke_width: 0.0,
        }
    }
}

/// Where primitives go. Implementations draw immediately or record;
/// the editor core never cares which.
pub trait RenderSurface {
    fn clear(&mut self);
    fn circle(&mut self, layer: Layer, center: Point, radius: f64, paint: &Paint);
    fn rect(&mut self, layer: Layer, center: Point, width: f64, height: f64, rotation: f64, paint: &Paint);
    fn polygon(&mut self, layer: Layer, points: &[Point], closed: bool, paint: &Paint);
    fn line(&mut self, layer: Layer, from: Point, to: Point, paint: &Paint);
    fn text(&mut self, layer: Layer, origin: Point, text: &str, size: f64, rotation: f64, color: &str);
    fn image(&mut self, layer: Layer, href: &str, origin: Point, size: (f64, f64));
}

/// Re-issues the full scene onto the surface.
pub fn sync_chart(
    chart: &SubChart,
    categories: &CategoryRegistry,
    settings: &ChartSettings,
    selection: &Selection,
    surface: &mut dyn RenderSurface,
) {
    surface.clear();

    if let Some(bg) = &chart.background {
        if let BackgroundStatus::Ready { width, height } = bg.status {
            surface.image(Layer::Background, &bg.href, Point::new(0.0, 0.0), (width, height));
        }
    }

    for section in &chart.sections {
        let paint = Paint {
            stroke: Some("#555555".to_string()),
            fill: category_fill(categories, section.category).map(str::to_string),
            stroke_width: 1.5,
        };
        surface.polygon(Layer::Sections, &section.points, section.closed, &paint);
        if let (Some(label), Some(anchor)) = (&section.label, section.label_anchor()) {
            surface.text(
                Layer::Texts,
                anchor,
                label,
                section.label_size,
                section.label_rotation,
                "#333333",
            );
        }
    }

    for row in &chart.rows {
        if settings.show_row_lines && row.chairs.len() >= 2 {
            if let (Ok(first), Ok(last)) = (row.first_chair(), row.last_chair()) {
                surface.line(
                    Layer::Objects,
                    first.center,
                    last.center,
                    &Paint::stroked("#bbbbbb"),
                );
            }
        }
        for chair in &row.chairs {
            surface.circle(Layer::Objects, chair.center, CHAIR_RADIUS, &seat_paint(categories, chair.category));
        }
        if settings.show_row_labels {
            if let (Some(label), Ok(first)) = (&row.label, row.first_chair()) {
                surface.text(Layer::Texts, first.center, label, 12.0, 0.0, "#333333");
            }
        }
    }

    for table in &chart.round_tables {
        surface.circle(
            Layer::Objects,
            table.center,
            table.radius,
            &table_paint(categories, table.category),
        );
        for chair in &table.chairs {
            surface.circle(Layer::Objects, chair.center, CHAIR_RADIUS, &seat_paint(categories, chair.category));
        }
        if let Some(label) = &table.label {
            surface.text(Layer::Texts, table.center, label, 12.0, 0.0, "#333333");
        }
    }

    for table in &chart.rect_tables {
        surface.rect(
            Layer::Objects,
            table.center,
            table.width,
            table.height,
            table.rotation,
            &table_paint(categories, table.category),
        );
        for chair in &table.chairs {
            surface.circle(Layer::Objects, chair.center, CHAIR_RADIUS, &seat_paint(categories, chair.category));
        }
        if let Some(label) = &table.label {
            surface.text(Layer::Texts, table.center, label, 12.0, 0.0, "#333333");
        }
    }

    for booth in &chart.booths {
        surface.rect(
            Layer::Objects,
            booth.center,
            booth.width,
            booth.height,
            booth.rotation,
            &table_paint(categories, booth.category),
        );
        if let Some(label) = &booth.label {
            surface.text(Layer::Texts, booth.center, label, 12.0, 0.0, "#333333");
        }
    }

    for area in &chart.ga_areas {
        let paint = Paint {
            stroke: Some("#555555".to_string()),
            fill: category_fill(categories, area.category).map(str::to_string),
            stroke_width: 1.0,
        };
        match &area.shape {
            GaShape::Polygon { points, closed } => {
                surface.polygon(Layer::Objects, points, *closed, &paint)
            }
            GaShape::Circle { center, radius } => {
                surface.circle(Layer::Objects, *center, *radius, &paint)
            }
            GaShape::Rect { center, width, height, rotation } => {
                surface.rect(Layer::Objects, *center, *width, *height, *rotation, &paint)
            }
        }
    }

    for shape in &chart.shapes {
        let paint = Paint {
            stroke: Some(shape.stroke_color.clone()),
            fill: (shape.fill_color != "none").then(|| shape.fill_color.clone()),
            stroke_width: shape.stroke_width,
        };
        match &shape.kind {
            ShapeKind::Circle { center, radius } => {
                surface.circle(Layer::Objects, *center, *radius, &paint)
            }
            ShapeKind::Rect { center, width, height } => {
                surface.rect(Layer::Objects, *center, *width, *height, shape.rotation, &paint)
            }
        }
    }

    for text in &chart.texts {
        let layer = if text.above_everything { Layer::Handles } else { Layer::Texts };
        surface.text(layer, text.origin, &text.text, text.font_size, text.rotation, &text.color);
    }

    if let Some(fp) = &chart.focal_point {
        surface.circle(Layer::Objects, fp.point, 6.0, &Paint::filled("#e8710a"));
    }

    if let Some(bbox) = selection.bounding_box(chart) {
        draw_selection_frame(surface, &bbox);
    }
}

fn draw_selection_frame(surface: &mut dyn RenderSurface, bbox: &Bbox) {
    surface.rect(
        Layer::SelectionRects,
        bbox.center(),
        bbox.width(),
        bbox.height(),
        0.0,
        &Paint::stroked(SELECTION_STROKE),
    );
    for handle in bbox.corners().into_iter().chain(bbox.edge_midpoints()) {
        surface.rect(
            Layer::Handles,
            handle,
            HANDLE_SIZE,
            HANDLE_SIZE,
            0.0,
            &Paint::filled(SELECTION_STROKE),
        );
    }
}

fn category_fill(categories: &CategoryRegistry, id: Option<u32>) -> Option<&str> {
    id.and_then(|id| categories.get_category(id)).map(|c| c.color.as_str())
}

fn seat_paint(categories: &CategoryRegistry, id: Option<u32>) -> Paint {
    Paint::filled(category_fill(categories, id).unwrap_or(UNCATEGORIZED_FILL))
}

fn table_paint(categories: &CategoryRegistry, id: Option<u32>) -> Paint {
    Paint {
        stroke: Some("#777777".to_string()),
        fill: category_fill(categories, id).map(str::to_string),
        stroke_width: 1.0,
    }
}

/// Captures the primitive stream instead of drawing it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<(Layer, String)>,
    pub clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_on(&self, layer: Layer) -> usize {
        self.ops.iter().filter(|(l, _)| *l == layer).count()
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.ops.iter().filter(|(_, op)| op.starts_with(kind)).count()
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn circle(&mut self, layer: Layer, center: Point, radius: f64, _paint: &Paint) {
        self.ops.push((layer, format!("circle {:.1},{:.1} r{radius:.1}", center.x, center.y)));
    }

    fn rect(&mut self, layer: Layer, center: Point, width: f64, height: f64, rotation: f64, _paint: &Paint) {
        self.ops.push((
            layer,
            format!("rect {:.1},{:.1} {width:.1}x{height:.1} rot{rotation:.1}", center.x, center.y),
        ));
    }

    fn polygon(&mut self, layer: Layer, points: &[Point], closed: bool, _paint: &Paint) {
        self.ops.push((layer, format!("polygon n{} closed={closed}", points.len())));
    }

    fn line(&mut self, layer: Layer, from: Point, to: Point, _paint: &Paint) {
        self.ops.push((
            layer,
            format!("line {:.1},{:.1}-{:.1},{:.1}", from.x, from.y, to.x, to.y),
        ));
    }

    fn text(&mut self, layer: Layer, _origin: Point, text: &str, _size: f64, _rotation: f64, _color: &str) {
        self.ops.push((layer, format!("text {text:?}")));
    }

    fn image(&mut self, layer: Layer, href: &str, _origin: Point, _size: (f64, f64)) {
        self.ops.push((layer, format!("image {href}")));
    }
}
