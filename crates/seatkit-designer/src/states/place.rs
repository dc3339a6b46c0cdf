//! Click-to-place tools: tables, booths, annotation shapes, text, GA
//! circles and rectangles, and the focal point.

use tracing::debug;

use seatkit_core::constants::{
    DEFAULT_BOOTH_HEIGHT, DEFAULT_BOOTH_WIDTH, DEFAULT_RECT_TABLE_HEIGHT,
    DEFAULT_RECT_TABLE_WIDTH, DEFAULT_ROUND_TABLE_RADIUS, DEFAULT_TABLE_CHAIRS,
};
use seatkit_core::Point;

use crate::input::GestureEvent;
use crate::model::{
    Booth, FocalPoint, GaArea, ObjectKind, ObjectRef, RectTable, RoundTable, ShapeKind,
    ShapedObject, TextLabel,
};
use crate::states::{EditorCtx, EditorState, StateKind, Transition};

/// What a click drops onto the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceKind {
    RoundTable,
    RectTable,
    Booth,
    GaCircle,
    GaRect,
    ShapeCircle,
    ShapeRect,
    Text,
    FocalPoint,
}

/// Places one object per click, at defaults, and selects it. The state
/// stays active so repeated clicks keep placing.
#[derive(Debug)]
pub struct Placing {
    kind: PlaceKind,
}

impl Placing {
    pub fn new(kind: PlaceKind) -> Self {
        Self { kind }
    }

    fn place(&self, ctx: &mut EditorCtx, at: Point) {
        let at = ctx.snap(at);
        let uuid = ctx.next_uuid();
        debug!(kind = ?self.kind, x = at.x, y = at.y, "object placed");
        let placed = match self.kind {
            PlaceKind::RoundTable => {
                let mut table = RoundTable::new(uuid, at, DEFAULT_ROUND_TABLE_RADIUS);
                let session = &mut *ctx.session;
                table.set_chair_count(DEFAULT_TABLE_CHAIRS, || session.identity.fresh_uuid());
                let chart = ctx.session.active_chart_mut();
                chart.round_tables.push(table);
                ObjectRef::new(ObjectKind::RoundTable, chart.round_tables.len() - 1)
            }
            PlaceKind::RectTable => {
                let mut table =
                    RectTable::new(uuid, at, DEFAULT_RECT_TABLE_WIDTH, DEFAULT_RECT_TABLE_HEIGHT);
                let session = &mut *ctx.session;
                table.set_chair_count(DEFAULT_TABLE_CHAIRS, || session.identity.fresh_uuid());
                let chart = ctx.session.active_chart_mut();
                chart.rect_tables.push(table);
                ObjectRef::new(ObjectKind::RectTable, chart.rect_tables.len() - 1)
            }
            PlaceKind::Booth => {
                let booth = Booth::new(uuid, at, DEFAULT_BOOTH_WIDTH, DEFAULT_BOOTH_HEIGHT);
                let chart = ctx.session.active_chart_mut();
                chart.booths.push(booth);
                ObjectRef::new(ObjectKind::Booth, chart.booths.len() - 1)
            }
            PlaceKind::GaCircle => {
                let area = GaArea::circle(uuid, at, DEFAULT_ROUND_TABLE_RADIUS);
                let chart = ctx.session.active_chart_mut();
                chart.ga_areas.push(area);
                ObjectRef::new(ObjectKind::GaArea, chart.ga_areas.len() - 1)
            }
            PlaceKind::GaRect => {
                let area = GaArea::rect(uuid, at, DEFAULT_BOOTH_WIDTH, DEFAULT_BOOTH_HEIGHT);
                let chart = ctx.session.active_chart_mut();
                chart.ga_areas.push(area);
                ObjectRef::new(ObjectKind::GaArea, chart.ga_areas.len() - 1)
            }
            PlaceKind::ShapeCircle => {
                let shape = ShapedObject::new(
                    uuid,
                    ShapeKind::Circle { center: at, radius: DEFAULT_ROUND_TABLE_RADIUS },
                );
                let chart = ctx.session.active_chart_mut();
                chart.shapes.push(shape);
                ObjectRef::new(ObjectKind::Shape, chart.shapes.len() - 1)
            }
            PlaceKind::ShapeRect => {
                let shape = ShapedObject::new(
                    uuid,
                    ShapeKind::Rect {
                        center: at,
                        width: DEFAULT_BOOTH_WIDTH,
                        height: DEFAULT_BOOTH_HEIGHT,
                    },
                );
                let chart = ctx.session.active_chart_mut();
                chart.shapes.push(shape);
                ObjectRef::new(ObjectKind::Shape, chart.shapes.len() - 1)
            }
            PlaceKind::Text => {
                let text = TextLabel::new(uuid, at, "Text");
                let chart = ctx.session.active_chart_mut();
                chart.texts.push(text);
                ObjectRef::new(ObjectKind::Text, chart.texts.len() - 1)
            }
            PlaceKind::FocalPoint => {
                // there is exactly one, and it lives on the master chart
                ctx.session.master.focal_point = Some(FocalPoint::new(at));
                ObjectRef::new(ObjectKind::FocalPoint, 0)
            }
        };
        ctx.selection.select_only(placed);
    }
}

impl EditorState for Placing {
    fn kind(&self) -> StateKind {
        StateKind::Placing
    }

    fn on_gesture(&mut self, ctx: &mut EditorCtx, event: GestureEvent) -> Transition {
        if let GestureEvent::Click { at, .. } = event {
            self.place(ctx, at);
        }
        Transition::Stay
    }
}
