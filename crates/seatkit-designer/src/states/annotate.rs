//! Annotation tools: painting a category onto seats and objects, and
//! labeling seats one click at a time.

use tracing::{debug, warn};

use crate::category::CategoryId;
use crate::input::GestureEvent;
use crate::states::{EditorCtx, EditorState, StateKind, Transition};

/// Clicking a seat assigns the active category (propagating to the
/// owning table); clicking a booth, area or section categorizes the
/// object itself.
#[derive(Debug)]
pub struct CategoryPainting {
    category: CategoryId,
}

impl CategoryPainting {
    pub fn new(category: CategoryId) -> Self {
        Self { category }
    }
}

impl EditorState for CategoryPainting {
    fn kind(&self) -> StateKind {
        StateKind::CategoryPainting
    }

    fn on_gesture(&mut self, ctx: &mut EditorCtx, event: GestureEvent) -> Transition {
        let GestureEvent::Click { at, .. } = event else {
            return Transition::Stay;
        };
        let target = {
            let chart = ctx.session.active_chart();
            match chart.seat_at(at) {
                Some(uuid) => Some((vec![uuid], Vec::new())),
                None => chart.ref_at(at).map(|r| (Vec::new(), vec![r])),
            }
        };
        let Some((seats, objects)) = target else {
            return Transition::Stay;
        };
        match ctx.session.apply_category_to_items(&seats, &objects, self.category) {
            Ok(applied) => debug!(category = self.category, applied, "category painted"),
            Err(err) => warn!(%err, "category paint refused"),
        }
        Transition::Stay
    }
}

/// Clicking seats labels them with an incrementing number, in click
/// order. The starting number is chosen when the tool is picked.
#[derive(Debug)]
pub struct SeatLabeling {
    next: i64,
}

impl SeatLabeling {
    pub fn new(start: i64) -> Self {
        Self { next: start }
    }
}

impl EditorState for SeatLabeling {
    fn kind(&self) -> StateKind {
        StateKind::SeatLabeling
    }

    fn on_gesture(&mut self, ctx: &mut EditorCtx, event: GestureEvent) -> Transition {
        let GestureEvent::Click { at, .. } = event else {
            return Transition::Stay;
        };
        let chart = ctx.session.active_chart_mut();
        let Some(uuid) = chart.seat_at(at) else {
            return Transition::Stay;
        };
        if let Some(chair) = chart.chair_mut(uuid) {
            chair.label = Some(self.next.to_string());
            debug!(seat = uuid, label = self.next, "seat labeled");
            self.next += 1;
        }
        Transition::Stay
    }
}
