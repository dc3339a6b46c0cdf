//! The default tool: click to select, drag to move, drag on empty
//! space to rubber-band.

use seatkit_core::{Bbox, Point, Vector};

use crate::input::GestureEvent;
use crate::states::{EditorCtx, EditorState, StateKind, Transition};

#[derive(Debug, Default)]
enum Mode {
    #[default]
    Idle,
    /// Dragging the current selection. The displacement is only pending:
    /// the chart is untouched until the drag ends.
    Moving { pending: Vector },
    /// Dragging a rubber-band rectangle from this corner.
    Banding { from: Point },
}

#[derive(Debug, Default)]
pub struct SelectState {
    mode: Mode,
}

impl SelectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The uncommitted displacement of an in-flight move, for hosts that
    /// draw the selection at its dragged position.
    pub fn pending_move(&self) -> Option<Vector> {
        match self.mode {
            Mode::Moving { pending } => Some(pending),
            _ => None,
        }
    }
}

impl EditorState for SelectState {
    fn kind(&self) -> StateKind {
        StateKind::Select
    }

    /// Drops any in-flight drag without committing it.
    fn on_exit(&mut self, _ctx: &mut EditorCtx) {
        self.mode = Mode::Idle;
    }

    fn on_gesture(&mut self, ctx: &mut EditorCtx, event: GestureEvent) -> Transition {
        match event {
            GestureEvent::Click { at, modifiers, .. } => {
                let chart = ctx.session.active_chart();
                match chart.ref_at(at) {
                    Some(hit) if modifiers.shift => ctx.selection.toggle(hit),
                    Some(hit) => ctx.selection.select_only(hit),
                    None => ctx.selection.clear(),
                }
            }
            GestureEvent::DragStart { from, .. } => {
                let hit = ctx.session.active_chart().ref_at(from);
                match hit {
                    Some(r) => {
                        if !ctx.selection.contains(r) {
                            ctx.selection.select_only(r);
                        }
                        self.mode = Mode::Moving { pending: Vector::new(0.0, 0.0) };
                    }
                    None => {
                        ctx.selection.clear();
                        self.mode = Mode::Banding { from };
                    }
                }
            }
            GestureEvent::DragMove { delta, .. } => {
                if let Mode::Moving { pending } = &mut self.mode {
                    *pending = Vector::new(pending.dx + delta.dx, pending.dy + delta.dy);
                }
            }
            GestureEvent::DragEnd { from: _, to, .. } => {
                match std::mem::take(&mut self.mode) {
                    Mode::Banding { from } => {
                        let band = Bbox::new(from, to);
                        let hits = ctx.session.active_chart().refs_intersecting(&band);
                        ctx.selection.set(hits);
                    }
                    Mode::Moving { pending } => {
                        // the one and only chart mutation for the drag
                        let selection = &*ctx.selection;
                        selection.translate(ctx.session.active_chart_mut(), pending);
                        if ctx.session.settings.grid_snap {
                            snap_selection(ctx);
                        }
                    }
                    Mode::Idle => {}
                }
            }
            GestureEvent::Hover { .. } => {}
        }
        Transition::Stay
    }
}

/// Nudges the moved selection so its box corner lands on the grid.
fn snap_selection(ctx: &mut EditorCtx) {
    let chart = ctx.session.active_chart();
    let Some(bbox) = ctx.selection.bounding_box(chart) else {
        return;
    };
    let snapped = ctx.snap(bbox.min);
    let nudge = Vector::between(bbox.min, snapped);
    let selection = &*ctx.selection;
    selection.translate(ctx.session.active_chart_mut(), nudge);
}
