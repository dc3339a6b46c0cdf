//! Interaction state machine.
//!
//! Exactly one state is active at a time. Tools map to states; switching
//! tools (or a state requesting a transition) always runs the old
//! state's exit hook before the new state's init hook, so a half-drawn
//! polygon or an in-flight drag is settled before anything else starts.

mod annotate;
mod draw_row;
mod place;
mod polygon;
mod select;

pub use annotate::{CategoryPainting, SeatLabeling};
pub use draw_row::{RowBlockDrawing, RowDrawing};
pub use place::{PlaceKind, Placing};
pub use polygon::{PolygonDrawing, PolygonKind};
pub use select::SelectState;

use tracing::debug;

use seatkit_core::Point;

use crate::category::CategoryId;
use crate::chart::ChartSession;
use crate::input::{DragTracker, GestureEvent, MouseButton, PointerEvent};
use crate::selection::Selection;

/// Everything a state may touch while handling input.
pub struct EditorCtx<'a> {
    pub session: &'a mut ChartSession,
    pub selection: &'a mut Selection,
}

impl EditorCtx<'_> {
    /// Applies grid snapping when the chart has it enabled.
    pub fn snap(&self, p: Point) -> Point {
        if self.session.settings.grid_snap {
            p.snap_to_grid(self.session.settings.grid_snap_precision)
        } else {
            p
        }
    }

    pub fn next_uuid(&mut self) -> u64 {
        self.session.identity.fresh_uuid()
    }
}

/// Discriminant for the active state, for hosts that show tool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Select,
    RowDrawing,
    RowBlockDrawing,
    Placing,
    PolygonDrawing,
    CategoryPainting,
    SeatLabeling,
}

/// What a state wants to happen after handling an event.
pub enum Transition {
    Stay,
    To(Box<dyn EditorState>),
}

/// One mode of interaction. States own their in-progress geometry and
/// commit it to the chart on completion (or on exit, when the partial
/// work is worth keeping).
pub trait EditorState {
    fn kind(&self) -> StateKind;

    /// Runs when the state becomes active.
    fn on_init(&mut self, _ctx: &mut EditorCtx) {}

    /// Runs before the state is replaced. Settles or discards any
    /// in-progress work.
    fn on_exit(&mut self, _ctx: &mut EditorCtx) {}

    fn on_gesture(&mut self, ctx: &mut EditorCtx, event: GestureEvent) -> Transition;

    /// Escape or secondary click: abandon the tool and fall back to
    /// selection. The exit hook still runs, so in-progress work is
    /// settled the same way as on any other transition.
    fn on_escape(&mut self, _ctx: &mut EditorCtx) -> Transition {
        Transition::To(Box::new(SelectState::new()))
    }
}

/// Toolbar tools, each mapping to an initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Row,
    RowBlock,
    RoundTable,
    RectTable,
    Booth,
    Section,
    GaPolygon,
    GaCircle,
    GaRect,
    ShapeCircle,
    ShapeRect,
    Text,
    FocalPoint,
    /// Paint this category onto clicked seats and objects.
    PaintCategory(CategoryId),
    /// Number clicked seats starting from this value.
    LabelSeats(i64),
}

impl Tool {
    fn initial_state(self) -> Box<dyn EditorState> {
        match self {
            Tool::Select => Box::new(SelectState::new()),
            Tool::Row => Box::new(RowDrawing::new()),
            Tool::RowBlock => Box::new(RowBlockDrawing::new()),
            Tool::RoundTable => Box::new(Placing::new(PlaceKind::RoundTable)),
            Tool::RectTable => Box::new(Placing::new(PlaceKind::RectTable)),
            Tool::Booth => Box::new(Placing::new(PlaceKind::Booth)),
            Tool::Section => Box::new(PolygonDrawing::new(PolygonKind::Section)),
            Tool::GaPolygon => Box::new(PolygonDrawing::new(PolygonKind::GaArea)),
            Tool::GaCircle => Box::new(Placing::new(PlaceKind::GaCircle)),
            Tool::GaRect => Box::new(Placing::new(PlaceKind::GaRect)),
            Tool::ShapeCircle => Box::new(Placing::new(PlaceKind::ShapeCircle)),
            Tool::ShapeRect => Box::new(Placing::new(PlaceKind::ShapeRect)),
            Tool::Text => Box::new(Placing::new(PlaceKind::Text)),
            Tool::FocalPoint => Box::new(Placing::new(PlaceKind::FocalPoint)),
            Tool::PaintCategory(category) => Box::new(CategoryPainting::new(category)),
            Tool::LabelSeats(start) => Box::new(SeatLabeling::new(start)),
        }
    }
}

/// Drives the state machine: raw pointer events in, chart mutations out.
pub struct Editor {
    state: Box<dyn EditorState>,
    pub selection: Selection,
    tracker: DragTracker,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            state: Box::new(SelectState::new()),
            selection: Selection::new(),
            tracker: DragTracker::new(),
        }
    }

    pub fn state_kind(&self) -> StateKind {
        self.state.kind()
    }

    /// Switches to the tool's initial state, settling the current one
    /// first.
    pub fn set_tool(&mut self, session: &mut ChartSession, tool: Tool) {
        debug!(?tool, "tool selected");
        self.transition_to(session, tool.initial_state());
    }

    /// Replaces the active state: old exit, then new init, in that
    /// order, never interleaved.
    pub fn transition_to(&mut self, session: &mut ChartSession, mut next: Box<dyn EditorState>) {
        let mut ctx = EditorCtx {
            session,
            selection: &mut self.selection,
        };
        self.state.on_exit(&mut ctx);
        next.on_init(&mut ctx);
        self.state = next;
    }

    /// Feeds one raw pointer event through drag detection and into the
    /// active state.
    pub fn handle_pointer(&mut self, session: &mut ChartSession, event: PointerEvent) {
        let Some(gesture) = self.tracker.feed(event) else {
            return;
        };
        self.handle_gesture(session, gesture);
    }

    pub fn handle_gesture(&mut self, session: &mut ChartSession, gesture: GestureEvent) {
        let transition = {
            let mut ctx = EditorCtx {
                session,
                selection: &mut self.selection,
            };
            match gesture {
                GestureEvent::Click {
                    button: MouseButton::Right,
                    ..
                } => self.state.on_escape(&mut ctx),
                _ => self.state.on_gesture(&mut ctx, gesture),
            }
        };
        if let Transition::To(next) = transition {
            self.transition_to(session, next);
        }
    }

    /// Escape key: abandon the active tool. Equivalent to a secondary
    /// click.
    pub fn escape(&mut self, session: &mut ChartSession) {
        let transition = {
            let mut ctx = EditorCtx {
                session,
                selection: &mut self.selection,
            };
            self.state.on_escape(&mut ctx)
        };
        if let Transition::To(next) = transition {
            self.transition_to(session, next);
        }
    }
}
