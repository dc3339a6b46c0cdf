use serde::{Deserialize, Serialize};

use seatkit_core::constants::DEFAULT_FONT_SIZE;
use seatkit_core::{Bbox, Point, Vector};

/// A free text annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLabel {
    pub uuid: u64,
    pub origin: Point,
    pub text: String,
    pub font_size: f64,
    pub color: String,
    pub rotation: f64,
    /// When set the label renders above every other layer.
    pub above_everything: bool,
}

impl TextLabel {
    pub fn new(uuid: u64, origin: Point, text: impl Into<String>) -> Self {
        Self {
            uuid,
            origin,
            text: text.into(),
            font_size: DEFAULT_FONT_SIZE,
            color: "#000000".to_string(),
            rotation: 0.0,
            above_everything: false,
        }
    }

    pub fn translate(&mut self, v: Vector) {
        self.origin = self.origin.translate(v);
    }

    pub fn rotate_around(&mut self, around: Point, degrees: f64) {
        self.origin = self.origin.rotate_around(around, degrees);
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
    }

    /// Approximate extent: the true box comes from the rendering surface,
    /// which measures actual glyphs. This estimate only feeds selection
    /// and chart bounds.
    pub fn bounding_box(&self) -> Bbox {
        let width = self.text.chars().count() as f64 * self.font_size * 0.6;
        Bbox::new(
            self.origin,
            Point::new(self.origin.x + width.max(self.font_size), self.origin.y + self.font_size),
        )
    }

    pub fn duplicate(&self, mut next_uuid: impl FnMut() -> u64) -> TextLabel {
        let mut copy = self.clone();
        copy.uuid = next_uuid();
        copy
    }
}
