//! Polygon drawing for sections and general-admission areas.
//!
//! Clicks append corners; clicking back near the first corner (with at
//! least three corners down) closes the outline. An outline left open
//! when the tool is switched away is discarded, never persisted.

use tracing::debug;

use crate::input::GestureEvent;
use crate::model::{GaArea, ObjectKind, ObjectRef, PolygonEvent, Section};
use crate::states::{EditorCtx, EditorState, StateKind, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonKind {
    Section,
    GaArea,
}

#[derive(Debug)]
pub struct PolygonDrawing {
    kind: PolygonKind,
    /// Index of the outline being drawn, if one is in progress.
    in_progress: Option<usize>,
}

impl PolygonDrawing {
    pub fn new(kind: PolygonKind) -> Self {
        Self {
            kind,
            in_progress: None,
        }
    }

    fn add_point(&mut self, ctx: &mut EditorCtx, at: seatkit_core::Point) {
        let at = ctx.snap(at);
        match self.kind {
            PolygonKind::Section => {
                // sections live on the master chart only
                let index = match self.in_progress {
                    Some(i) => i,
                    None => {
                        let uuid = ctx.next_uuid();
                        ctx.session.master.sections.push(Section::new(uuid));
                        ctx.session.master.sections.len() - 1
                    }
                };
                self.in_progress = Some(index);
                let corners: Vec<_> = ctx
                    .session
                    .master
                    .sections
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .flat_map(|(_, s)| s.points.iter().copied())
                    .collect();
                let event = ctx.session.master.sections[index].add_point(at, &corners);
                if event == PolygonEvent::Closed {
                    debug!(section = index, "section outline closed");
                    ctx.selection.select_only(ObjectRef::new(ObjectKind::Section, index));
                    self.in_progress = None;
                }
            }
            PolygonKind::GaArea => {
                let index = match self.in_progress {
                    Some(i) => i,
                    None => {
                        let uuid = ctx.next_uuid();
                        let chart = ctx.session.active_chart_mut();
                        chart.ga_areas.push(GaArea::polygon(uuid));
                        chart.ga_areas.len() - 1
                    }
                };
                self.in_progress = Some(index);
                let chart = ctx.session.active_chart_mut();
                let event = chart.ga_areas[index].add_point(at, &[]);
                if event == PolygonEvent::Closed {
                    debug!(area = index, "general admission outline closed");
                    ctx.selection.select_only(ObjectRef::new(ObjectKind::GaArea, index));
                    self.in_progress = None;
                }
            }
        }
    }
}

impl EditorState for PolygonDrawing {
    fn kind(&self) -> StateKind {
        StateKind::PolygonDrawing
    }

    /// Discards a half-drawn outline.
    fn on_exit(&mut self, ctx: &mut EditorCtx) {
        let Some(index) = self.in_progress.take() else {
            return;
        };
        match self.kind {
            PolygonKind::Section => {
                if ctx.session.master.sections.get(index).is_some_and(|s| !s.closed) {
                    ctx.session.master.sections.remove(index);
                    debug!("open section outline discarded");
                }
            }
            PolygonKind::GaArea => {
                let chart = ctx.session.active_chart_mut();
                if chart.ga_areas.get(index).is_some_and(|a| !a.is_complete()) {
                    chart.ga_areas.remove(index);
                    debug!("open general admission outline discarded");
                }
            }
        }
        ctx.selection.clear();
    }

    fn on_gesture(&mut self, ctx: &mut EditorCtx, event: GestureEvent) -> Transition {
        if let GestureEvent::Click { at, .. } = event {
            self.add_point(ctx, at);
        }
        Transition::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartSession;
    use crate::input::{Modifiers, MouseButton};
    use crate::selection::Selection;
    use crate::states::{Editor, Tool};
    use seatkit_core::Point;

    fn click(x: f64, y: f64) -> GestureEvent {
        GestureEvent::Click {
            at: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn clicks_build_and_close_a_section() {
        let mut session = ChartSession::new("t");
        let mut selection = Selection::new();
        let mut ctx = EditorCtx { session: &mut session, selection: &mut selection };
        let mut state = PolygonDrawing::new(PolygonKind::Section);

        for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)] {
            state.on_gesture(&mut ctx, click(x, y));
        }
        assert!(!session.master.sections[0].closed);

        let mut ctx = EditorCtx { session: &mut session, selection: &mut selection };
        // back near the first corner
        state.on_gesture(&mut ctx, click(3.0, 2.0));
        assert!(session.master.sections[0].closed);
        assert_eq!(session.master.sections[0].points.len(), 4);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn switching_tools_discards_an_open_outline() {
        let mut session = ChartSession::new("t");
        let mut editor = Editor::new();
        editor.set_tool(&mut session, Tool::Section);
        editor.handle_gesture(&mut session, click(0.0, 0.0));
        editor.handle_gesture(&mut session, click(100.0, 0.0));
        assert_eq!(session.master.sections.len(), 1);

        editor.set_tool(&mut session, Tool::Select);
        assert!(session.master.sections.is_empty());
    }

    #[test]
    fn right_click_abandons_the_tool_and_discards_the_outline() {
        let mut session = ChartSession::new("t");
        let mut editor = Editor::new();
        editor.set_tool(&mut session, Tool::Section);
        editor.handle_gesture(&mut session, click(0.0, 0.0));
        editor.handle_gesture(&mut session, click(100.0, 0.0));

        editor.handle_gesture(
            &mut session,
            GestureEvent::Click {
                at: Point::new(50.0, 50.0),
                button: MouseButton::Right,
                modifiers: Modifiers::default(),
            },
        );
        assert!(session.master.sections.is_empty());
        assert_eq!(editor.state_kind(), crate::states::StateKind::Select);
    }

    #[test]
    fn closed_outline_survives_tool_switch() {
        let mut session = ChartSession::new("t");
        let mut editor = Editor::new();
        editor.set_tool(&mut session, Tool::GaPolygon);
        for (x, y) in [(0.0, 0.0), (100.0, 0.0), (50.0, 100.0), (1.0, 1.0)] {
            editor.handle_gesture(&mut session, click(x, y));
        }
        assert!(session.master.ga_areas[0].is_complete());

        editor.set_tool(&mut session, Tool::Select);
        assert_eq!(session.master.ga_areas.len(), 1);
    }
}
