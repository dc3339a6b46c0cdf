//! Interactive seating chart editor core.
//!
//! Pure model plus an input-driven state machine. Hosts feed pointer
//! events in, read the scene back out through the render seam, and
//! persist charts as JSON documents with stable ticketing ids.
//!
//! The usual flow:
//!
//! ```
//! use seatkit_designer::chart::ChartSession;
//! use seatkit_designer::states::{Editor, Tool};
//! use seatkit_designer::input::{Modifiers, MouseButton, PointerEvent};
//! use seatkit_core::Point;
//!
//! let mut session = ChartSession::new("Main Hall");
//! let mut editor = Editor::new();
//! editor.set_tool(&mut session, Tool::Row);
//! editor.handle_pointer(&mut session, PointerEvent::Down {
//!     at: Point::new(0.0, 0.0),
//!     button: MouseButton::Left,
//!     modifiers: Modifiers::default(),
//! });
//! editor.handle_pointer(&mut session, PointerEvent::Move {
//!     at: Point::new(100.0, 0.0),
//!     modifiers: Modifiers::default(),
//! });
//! editor.handle_pointer(&mut session, PointerEvent::Up {
//!     at: Point::new(100.0, 0.0),
//!     button: MouseButton::Left,
//!     modifiers: Modifiers::default(),
//! });
//! assert_eq!(session.master.rows.len(), 1);
//! ```

pub mod category;
pub mod chart;
pub mod input;
pub mod labeling;
pub mod model;
pub mod render;
pub mod selection;
pub mod serialization;
pub mod states;
pub mod subchart;
pub mod validator;

pub use category::{Category, CategoryId, CategoryRegistry};
pub use chart::{ChartSession, ChartSettings, VenueType};
pub use selection::Selection;
pub use serialization::{from_json, load_session, save_session, to_json, ChartDocument};
pub use states::{Editor, EditorCtx, EditorState, StateKind, Tool, Transition};
pub use subchart::{SubChart, SubChartKind};
pub use validator::{validate, ValidationCounts};
