//! Row drawing tools: a single row along a dragged ray, or a block of
//! parallel rows filling a dragged rectangle.

use tracing::debug;

use seatkit_core::constants::{CHAIR_SPACING, SHIFT_ANGLE_STEP};
use seatkit_core::{Bbox, Point, Ray};

use crate::input::GestureEvent;
use crate::model::{Chair, ObjectKind, ObjectRef, Row};
use crate::states::{EditorCtx, EditorState, StateKind, Transition};

/// Drag to lay out a row of chairs along the dragged line. Holding
/// shift snaps the line to 45 degree directions. A plain click drops a
/// single chair.
#[derive(Debug, Default)]
pub struct RowDrawing {
    anchor: Option<Point>,
}

impl RowDrawing {
    pub fn new() -> Self {
        Self::default()
    }

    fn commit(&mut self, ctx: &mut EditorCtx, to: Point, shift: bool) {
        let Some(anchor) = self.anchor.take() else {
            return;
        };
        let mut ray = Ray::new(anchor, ctx.snap(to));
        if shift {
            if let Ok(snapped) = ray.snap_to_angle(SHIFT_ANGLE_STEP) {
                ray = snapped;
            }
        }
        let uuid = ctx.next_uuid();
        let row = if ray.is_degenerate() {
            let mut row = Row::new(uuid);
            row.chairs.push(Chair::new(ray.origin, ctx.next_uuid()));
            row
        } else {
            let session = &mut *ctx.session;
            match Row::along_ray(uuid, ray, || session.identity.fresh_uuid()) {
                Ok(row) => row,
                Err(_) => return,
            }
        };
        debug!(chairs = row.chairs.len(), "row drawn");
        let chart = ctx.session.active_chart_mut();
        chart.rows.push(row);
        ctx.selection.select_only(ObjectRef::new(ObjectKind::Row, chart.rows.len() - 1));
    }
}

impl EditorState for RowDrawing {
    fn kind(&self) -> StateKind {
        StateKind::RowDrawing
    }

    fn on_exit(&mut self, _ctx: &mut EditorCtx) {
        self.anchor = None;
    }

    fn on_gesture(&mut self, ctx: &mut EditorCtx, event: GestureEvent) -> Transition {
        match event {
            GestureEvent::Click { at, modifiers, .. } => {
                self.anchor = Some(ctx.snap(at));
                self.commit(ctx, at, modifiers.shift);
            }
            GestureEvent::DragStart { from, .. } => {
                self.anchor = Some(ctx.snap(from));
            }
            GestureEvent::DragEnd { to, modifiers, .. } => {
                self.commit(ctx, to, modifiers.shift);
            }
            GestureEvent::DragMove { .. } | GestureEvent::Hover { .. } => {}
        }
        Transition::Stay
    }
}

/// Drag a rectangle to fill it with parallel horizontal rows. Each row
/// is an independent object afterward; the block is only a creation
/// convenience.
#[derive(Debug, Default)]
pub struct RowBlockDrawing {
    anchor: Option<Point>,
}

impl RowBlockDrawing {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditorState for RowBlockDrawing {
    fn kind(&self) -> StateKind {
        StateKind::RowBlockDrawing
    }

    fn on_exit(&mut self, _ctx: &mut EditorCtx) {
        self.anchor = None;
    }

    fn on_gesture(&mut self, ctx: &mut EditorCtx, event: GestureEvent) -> Transition {
        match event {
            GestureEvent::DragStart { from, .. } => {
                self.anchor = Some(ctx.snap(from));
            }
            GestureEvent::DragEnd { to, .. } => {
                let Some(anchor) = self.anchor.take() else {
                    return Transition::Stay;
                };
                let rect = Bbox::new(anchor, ctx.snap(to));
                let row_count = (rect.height() / CHAIR_SPACING).floor() as usize + 1;
                let mut created = Vec::with_capacity(row_count);
                for i in 0..row_count {
                    let y = rect.min.y + i as f64 * CHAIR_SPACING;
                    let ray = Ray::new(Point::new(rect.min.x, y), Point::new(rect.max.x, y));
                    if ray.is_degenerate() {
                        continue;
                    }
                    let uuid = ctx.next_uuid();
                    let session = &mut *ctx.session;
                    if let Ok(row) = Row::along_ray(uuid, ray, || session.identity.fresh_uuid()) {
                        let chart = ctx.session.active_chart_mut();
                        chart.rows.push(row);
                        created.push(ObjectRef::new(ObjectKind::Row, chart.rows.len() - 1));
                    }
                }
                debug!(rows = created.len(), "row block drawn");
                ctx.selection.set(created);
            }
            _ => {}
        }
        Transition::Stay
    }
}
