//! End-to-end editor workflows: draw, label, validate, save, reload.

use seatkit_core::Point;
use seatkit_designer::chart::ChartSession;
use seatkit_designer::input::{Modifiers, MouseButton, PointerEvent};
use seatkit_designer::labeling::AutoLabeler;
use seatkit_designer::serialization::{from_json, save_session, to_json};
use seatkit_designer::states::{Editor, Tool};
use seatkit_designer::validator::validate;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn drag(editor: &mut Editor, session: &mut ChartSession, from: (f64, f64), to: (f64, f64)) {
    let m = Modifiers::default();
    editor.handle_pointer(
        session,
        PointerEvent::Down { at: Point::new(from.0, from.1), button: MouseButton::Left, modifiers: m },
    );
    let mid = Point::new((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
    editor.handle_pointer(session, PointerEvent::Move { at: mid, modifiers: m });
    editor.handle_pointer(session, PointerEvent::Move { at: Point::new(to.0, to.1), modifiers: m });
    editor.handle_pointer(
        session,
        PointerEvent::Up { at: Point::new(to.0, to.1), button: MouseButton::Left, modifiers: m },
    );
}

fn click(editor: &mut Editor, session: &mut ChartSession, at: (f64, f64)) {
    let m = Modifiers::default();
    editor.handle_pointer(
        session,
        PointerEvent::Down { at: Point::new(at.0, at.1), button: MouseButton::Left, modifiers: m },
    );
    editor.handle_pointer(
        session,
        PointerEvent::Up { at: Point::new(at.0, at.1), button: MouseButton::Left, modifiers: m },
    );
}

#[test]
fn draw_label_validate_and_persist() {
    init_tracing();
    let mut session = ChartSession::new("Main Hall");
    session
        .categories
        .add_seated(seatkit_designer::Category::new(1, "Floor", "#cc0000"));

    let mut editor = Editor::new();

    // a row of five chairs and a table
    editor.set_tool(&mut session, Tool::Row);
    drag(&mut editor, &mut session, (0.0, 0.0), (100.0, 0.0));
    editor.set_tool(&mut session, Tool::RoundTable);
    click(&mut editor, &mut session, (400.0, 200.0));

    assert_eq!(session.master.rows.len(), 1);
    assert_eq!(session.master.rows[0].chairs.len(), 5);
    assert_eq!(session.master.round_tables.len(), 1);

    // label and categorize everything
    session.master.rows[0].label = Some("A".into());
    session.master.rows[0].chairs[0].label = Some("1".into());
    session.master.rows[0].chairs[1].label = Some("2".into());
    session.master.round_tables[0].label = Some("T1".into());
    let labeler = AutoLabeler::new();
    assert_eq!(labeler.label_chart(&mut session.master), 2);

    let seat_uuids: Vec<u64> = {
        let mut v = Vec::new();
        session.master.for_each_seat(|_, c| v.push(c.uuid));
        v
    };
    session.apply_category_to_items(&seat_uuids, &[], 1).unwrap();

    assert!(validate(&session.master).is_clean());

    // save, reload, and confirm ids survive the trip
    let doc = save_session(&mut session);
    let json = to_json(&doc).unwrap();
    let mut reloaded = from_json(&json).unwrap();

    let ids_before: Vec<_> = {
        let mut v = Vec::new();
        session.master.for_each_seat(|_, c| v.push(c.id));
        v
    };
    let _ = save_session(&mut reloaded);
    let ids_after: Vec<_> = {
        let mut v = Vec::new();
        reloaded.master.for_each_seat(|_, c| v.push(c.id));
        v
    };
    assert_eq!(ids_before, ids_after);
}

#[test]
fn auto_label_fills_strided_rows() {
    let mut session = ChartSession::new("t");
    let mut editor = Editor::new();
    editor.set_tool(&mut session, Tool::Row);
    drag(&mut editor, &mut session, (0.0, 0.0), (100.0, 0.0));

    let row = &mut session.master.rows[0];
    row.chairs[0].label = Some("1".into());
    row.chairs[1].label = Some("3".into());
    assert!(AutoLabeler::new().label_row(row));
    let labels: Vec<_> = row.chairs.iter().map(|c| c.label.clone().unwrap()).collect();
    assert_eq!(labels, vec!["1", "3", "5", "7", "9"]);
}

#[test]
fn selection_moves_survive_reload_with_same_ids() {
    let mut session = ChartSession::new("t");
    let mut editor = Editor::new();
    editor.set_tool(&mut session, Tool::Row);
    drag(&mut editor, &mut session, (0.0, 0.0), (50.0, 0.0));
    session.master.rows[0].label = Some("A".into());
    for (i, chair) in session.master.rows[0].chairs.iter_mut().enumerate() {
        chair.label = Some((i + 1).to_string());
    }

    let first = save_session(&mut session);

    // move the row; identity fields are untouched
    editor.set_tool(&mut session, Tool::Select);
    drag(&mut editor, &mut session, (0.0, 0.0), (200.0, 300.0));

    let second = save_session(&mut session);
    let ids = |doc: &seatkit_designer::ChartDocument| -> Vec<Option<u64>> {
        doc.chart.objects[0].chairs.iter().map(|c| c.id).collect()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn relabeling_invalidates_ids_on_next_save() {
    let mut session = ChartSession::new("t");
    let mut editor = Editor::new();
    editor.set_tool(&mut session, Tool::Row);
    drag(&mut editor, &mut session, (0.0, 0.0), (50.0, 0.0));
    session.master.rows[0].label = Some("A".into());
    session.master.rows[0].chairs[0].label = Some("1".into());

    let first = save_session(&mut session);
    session.master.rows[0].chairs[0].label = Some("7".into());
    let second = save_session(&mut session);

    assert_ne!(
        first.chart.objects[0].chairs[0].id,
        second.chart.objects[0].chairs[0].id
    );
}

#[test]
fn duplicate_seats_fail_validation_until_deduped() {
    let mut session = ChartSession::new("t");
    let mut editor = Editor::new();
    editor.set_tool(&mut session, Tool::Row);
    // two identical rows stacked on the same ray
    drag(&mut editor, &mut session, (0.0, 0.0), (50.0, 0.0));
    drag(&mut editor, &mut session, (0.0, 0.0), (50.0, 0.0));
    assert_eq!(session.master.rows.len(), 2);

    assert_eq!(session.dedupe_seats(), 3);
    let remaining: usize = session.master.rows.iter().map(|r| r.chairs.len()).sum();
    assert_eq!(remaining, 3);
}

#[test]
fn curved_row_keeps_chair_count_and_endpoints() {
    let mut session = ChartSession::new("t");
    let mut editor = Editor::new();
    editor.set_tool(&mut session, Tool::Row);
    drag(&mut editor, &mut session, (0.0, 0.0), (100.0, 0.0));

    let row = &mut session.master.rows[0];
    let first_before = row.chairs[0].center;
    let last_before = row.chairs[4].center;
    row.do_curve(20.0);

    assert_eq!(row.chairs.len(), 5);
    assert_eq!(row.chairs[0].center, first_before);
    assert_eq!(row.chairs[4].center, last_before);
    // the middle chair bulged off the chord
    assert!(row.chairs[2].center.y.abs() > 1.0);
}

#[test]
fn table_layouts_are_deterministic() {
    let mut session = ChartSession::new("t");
    let mut editor = Editor::new();
    editor.set_tool(&mut session, Tool::RectTable);
    click(&mut editor, &mut session, (100.0, 100.0));
    click(&mut editor, &mut session, (500.0, 100.0));

    let a: Vec<_> = session.master.rect_tables[0]
        .chairs
        .iter()
        .map(|c| (c.center.x - 100.0, c.center.y - 100.0))
        .collect();
    let b: Vec<_> = session.master.rect_tables[1]
        .chairs
        .iter()
        .map(|c| (c.center.x - 500.0, c.center.y - 100.0))
        .collect();
    assert_eq!(a, b);
}

#[test]
fn category_removal_detaches_across_sections() {
    let mut session = ChartSession::new("t");
    session
        .categories
        .add_seated(seatkit_designer::Category::new(5, "Balcony", "#00f"));

    let mut editor = Editor::new();
    editor.set_tool(&mut session, Tool::Section);
    for at in [(0.0, 0.0), (300.0, 0.0), (300.0, 300.0), (2.0, 2.0)] {
        click(&mut editor, &mut session, at);
    }
    assert!(session.master.sections[0].closed);

    session.enter_section(0).unwrap();
    editor.set_tool(&mut session, Tool::Row);
    drag(&mut editor, &mut session, (10.0, 10.0), (60.0, 10.0));
    let uuids: Vec<u64> = {
        let mut v = Vec::new();
        session.active_chart().for_each_seat(|_, c| v.push(c.uuid));
        v
    };
    session.apply_category_to_items(&uuids, &[], 5).unwrap();
    session.leave_section();

    let mut categories = std::mem::take(&mut session.categories);
    let detached = categories.remove_category(5, &mut session.master);
    assert_eq!(detached, uuids.len());
    session.master.sections[0]
        .interior
        .for_each_seat(|_, c| assert!(c.category.is_none()));
}
