//! Builds a small venue chart from scripted pointer input, validates it
//! and prints the persisted JSON document.
//!
//! Run with: cargo run --example build_chart

use anyhow::Result;
use seatkit_core::Point;
use seatkit_designer::chart::ChartSession;
use seatkit_designer::input::{Modifiers, MouseButton, PointerEvent};
use seatkit_designer::labeling::AutoLabeler;
use seatkit_designer::serialization::{save_session, to_json};
use seatkit_designer::states::{Editor, Tool};
use seatkit_designer::validator::validate;
use seatkit_designer::Category;

fn drag(editor: &mut Editor, session: &mut ChartSession, from: Point, to: Point) {
    let m = Modifiers::default();
    editor.handle_pointer(session, PointerEvent::Down { at: from, button: MouseButton::Left, modifiers: m });
    editor.handle_pointer(
        session,
        PointerEvent::Move { at: Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0), modifiers: m },
    );
    editor.handle_pointer(session, PointerEvent::Move { at: to, modifiers: m });
    editor.handle_pointer(session, PointerEvent::Up { at: to, button: MouseButton::Left, modifiers: m });
}

fn click(editor: &mut Editor, session: &mut ChartSession, at: Point) {
    let m = Modifiers::default();
    editor.handle_pointer(session, PointerEvent::Down { at, button: MouseButton::Left, modifiers: m });
    editor.handle_pointer(session, PointerEvent::Up { at, button: MouseButton::Left, modifiers: m });
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let mut session = ChartSession::new("Demo Hall");
    session.categories.add_seated(Category::new(1, "Floor", "#cc3333"));
    session.categories.add_seated(Category::new(2, "Balcony", "#3366cc"));

    let mut editor = Editor::new();

    // three rows of ten chairs
    editor.set_tool(&mut session, Tool::RowBlock);
    drag(&mut editor, &mut session, Point::new(0.0, 0.0), Point::new(225.0, 50.0));

    // a round table off to the side
    editor.set_tool(&mut session, Tool::RoundTable);
    click(&mut editor, &mut session, Point::new(450.0, 150.0));

    for (i, row) in session.master.rows.iter_mut().enumerate() {
        row.label = Some(((b'A' + i as u8) as char).to_string());
        for (j, chair) in row.chairs.iter_mut().take(2).enumerate() {
            chair.label = Some((j + 1).to_string());
        }
    }
    session.master.round_tables[0].label = Some("T1".to_string());
    AutoLabeler::new().label_chart(&mut session.master);

    let seats: Vec<u64> = {
        let mut v = Vec::new();
        session.master.for_each_seat(|_, c| v.push(c.uuid));
        v
    };
    session.apply_category_to_items(&seats, &[], 1)?;

    let report = validate(&session.master);
    println!("validation issues: {}", report.total());

    let doc = save_session(&mut session);
    println!("{}", to_json(&doc)?);
    Ok(())
}
