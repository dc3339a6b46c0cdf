//! State machine contract: one active state, exit always before init.

use std::cell::RefCell;
use std::rc::Rc;

use seatkit_designer::chart::ChartSession;
use seatkit_designer::input::GestureEvent;
use seatkit_designer::states::{Editor, EditorCtx, EditorState, StateKind, Tool, Transition};

struct Probe {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl EditorState for Probe {
    fn kind(&self) -> StateKind {
        StateKind::Select
    }

    fn on_init(&mut self, _ctx: &mut EditorCtx) {
        self.log.borrow_mut().push(format!("{} init", self.name));
    }

    fn on_exit(&mut self, _ctx: &mut EditorCtx) {
        self.log.borrow_mut().push(format!("{} exit", self.name));
    }

    fn on_gesture(&mut self, _ctx: &mut EditorCtx, _event: GestureEvent) -> Transition {
        Transition::Stay
    }
}

#[test]
fn old_state_exits_before_new_state_inits() {
    let mut session = ChartSession::new("t");
    let mut editor = Editor::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    editor.transition_to(
        &mut session,
        Box::new(Probe { name: "a", log: log.clone() }),
    );
    editor.transition_to(
        &mut session,
        Box::new(Probe { name: "b", log: log.clone() }),
    );

    let got = log.borrow().clone();
    assert_eq!(got, vec!["a init", "a exit", "b init"]);
}

#[test]
fn tools_map_to_exclusive_states() {
    let mut session = ChartSession::new("t");
    let mut editor = Editor::new();
    assert_eq!(editor.state_kind(), StateKind::Select);

    editor.set_tool(&mut session, Tool::Row);
    assert_eq!(editor.state_kind(), StateKind::RowDrawing);

    editor.set_tool(&mut session, Tool::RowBlock);
    assert_eq!(editor.state_kind(), StateKind::RowBlockDrawing);

    editor.set_tool(&mut session, Tool::Booth);
    assert_eq!(editor.state_kind(), StateKind::Placing);

    editor.set_tool(&mut session, Tool::Section);
    assert_eq!(editor.state_kind(), StateKind::PolygonDrawing);

    editor.set_tool(&mut session, Tool::PaintCategory(1));
    assert_eq!(editor.state_kind(), StateKind::CategoryPainting);

    editor.set_tool(&mut session, Tool::LabelSeats(1));
    assert_eq!(editor.state_kind(), StateKind::SeatLabeling);

    editor.set_tool(&mut session, Tool::Select);
    assert_eq!(editor.state_kind(), StateKind::Select);
}

#[test]
fn escape_returns_to_selection() {
    let mut session = ChartSession::new("t");
    let mut editor = Editor::new();
    editor.set_tool(&mut session, Tool::Row);

    editor.escape(&mut session);
    assert_eq!(editor.state_kind(), StateKind::Select);
}
