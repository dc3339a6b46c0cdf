//! Pointer input, normalized for the state machine.
//!
//! Hosts translate their native events into `PointerEvent`s in chart
//! coordinates; `DragTracker` turns the raw press/move/release stream
//! into clicks and drags using a small movement threshold, so a shaky
//! press still counts as a click.

use serde::{Deserialize, Serialize};

use seatkit_core::constants::DRAG_THRESHOLD;
use seatkit_core::{Point, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
}

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// A raw pointer event in chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { at: Point, button: MouseButton, modifiers: Modifiers },
    Move { at: Point, modifiers: Modifiers },
    Up { at: Point, button: MouseButton, modifiers: Modifiers },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { at, .. }
            | PointerEvent::Move { at, .. }
            | PointerEvent::Up { at, .. } => at,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match *self {
            PointerEvent::Down { modifiers, .. }
            | PointerEvent::Move { modifiers, .. }
            | PointerEvent::Up { modifiers, .. } => modifiers,
        }
    }
}

/// What a raw event amounted to once drag detection is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Press and release without crossing the drag threshold.
    Click { at: Point, button: MouseButton, modifiers: Modifiers },
    DragStart { from: Point, modifiers: Modifiers },
    DragMove { from: Point, to: Point, delta: Vector, modifiers: Modifiers },
    DragEnd { from: Point, to: Point, modifiers: Modifiers },
    /// A plain move with no button held.
    Hover { at: Point, modifiers: Modifiers },
}

/// Classifies press/move/release streams into clicks and drags.
#[derive(Debug, Default)]
pub struct DragTracker {
    press: Option<(Point, MouseButton)>,
    dragging: bool,
    last: Option<Point>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feeds one raw event; returns what it amounted to, if anything.
    pub fn feed(&mut self, event: PointerEvent) -> Option<GestureEvent> {
        match event {
            PointerEvent::Down { at, button, .. } => {
                self.press = Some((at, button));
                self.dragging = false;
                self.last = Some(at);
                None
            }
            PointerEvent::Move { at, modifiers } => {
                let Some((from, _)) = self.press else {
                    return Some(GestureEvent::Hover { at, modifiers });
                };
                if !self.dragging {
                    if from.distance_to(at) < DRAG_THRESHOLD {
                        return None;
                    }
                    self.dragging = true;
                    self.last = Some(at);
                    return Some(GestureEvent::DragStart { from, modifiers });
                }
                let prev = self.last.replace(at).unwrap_or(from);
                Some(GestureEvent::DragMove {
                    from,
                    to: at,
                    delta: Vector::between(prev, at),
                    modifiers,
                })
            }
            PointerEvent::Up { at, button: _, modifiers } => {
                // the press button wins if the host delivers a mismatched release
                let Some((from, pressed)) = self.press.take() else {
                    return None;
                };
                let was_drag = self.dragging;
                self.dragging = false;
                self.last = None;
                if was_drag {
                    Some(GestureEvent::DragEnd { from, to: at, modifiers })
                } else {
                    Some(GestureEvent::Click { at, button: pressed, modifiers })
                }
            }
        }
    }
}
