use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use seatkit_core::constants::{CHAIR_RADIUS, CHAIR_SPACING};
use seatkit_core::{Bbox, Point, Vector};

use crate::category::CategoryId;
use crate::model::chair::Chair;

/// Chair placement modes for a rectangular table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RectTableLayout {
    /// All chairs along the top edge.
    OneSide,
    /// Chairs split between top and bottom edges.
    #[default]
    TwoSides,
    /// Two sides plus one chair at each short end.
    BothHeads,
}

/// A rectangular table with chairs laid out by a parametric layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectTable {
    pub uuid: u64,
    pub id: Option<u64>,
    pub id_key: Option<String>,
    pub label: Option<String>,
    pub category: Option<CategoryId>,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees around the table center.
    pub rotation: f64,
    pub layout: RectTableLayout,
    pub chairs: SmallVec<[Chair; 16]>,
}

impl RectTable {
    pub fn new(uuid: u64, center: Point, width: f64, height: f64) -> Self {
        Self {
            uuid,
            id: None,
            id_key: None,
            label: None,
            category: None,
            center,
            width,
            height,
            rotation: 0.0,
            layout: RectTableLayout::TwoSides,
            chairs: SmallVec::new(),
        }
    }

    pub fn set_chair_count(&mut self, count: u32, mut next_uuid: impl FnMut() -> u64) {
        let count = count as usize;
        while self.chairs.len() > count {
            self.chairs.pop();
        }
        while self.chairs.len() < count {
            let mut chair = Chair::new(self.center, next_uuid());
            chair.category = self.category;
            self.chairs.push(chair);
        }
        self.reposition_chairs();
    }

    /// Recomputes all chair centers from the layout parameters.
    ///
    /// Deterministic and idempotent: chair i always lands on the same spot
    /// for the same dimensions/rotation/layout, regardless of call order.
    pub fn reposition_chairs(&mut self) {
        let n = self.chairs.len();
        if n == 0 {
            return;
        }
        let positions = self.layout_positions(n);
        for (chair, local) in self.chairs.iter_mut().zip(positions) {
            let absolute = Point::new(self.center.x + local.x, self.center.y + local.y);
            chair.center = absolute.rotate_around(self.center, self.rotation);
        }
    }

    /// Chair centers relative to the table center, before rotation.
    /// Ordering: top side left-to-right, bottom side left-to-right, then
    /// left head, right head.
    fn layout_positions(&self, n: usize) -> Vec<Point> {
        let top_y = -self.height / 2.0 - CHAIR_SPACING;
        let bottom_y = self.height / 2.0 + CHAIR_SPACING;
        let mut out = Vec::with_capacity(n);

        let spread = |count: usize, y: f64, out: &mut Vec<Point>| {
            for j in 0..count {
                let x = -self.width / 2.0 + (j as f64 + 0.5) * self.width / count as f64;
                out.push(Point::new(x, y));
            }
        };

        match self.layout {
            RectTableLayout::OneSide => spread(n, top_y, &mut out),
            RectTableLayout::TwoSides => {
                let top = n.div_ceil(2);
                spread(top, top_y, &mut out);
                spread(n - top, bottom_y, &mut out);
            }
            RectTableLayout::BothHeads => {
                let heads = n.min(2);
                let sides = n - heads;
                let top = sides.div_ceil(2);
                spread(top, top_y, &mut out);
                spread(sides - top, bottom_y, &mut out);
                if heads >= 1 {
                    out.push(Point::new(-self.width / 2.0 - CHAIR_SPACING, 0.0));
                }
                if heads == 2 {
                    out.push(Point::new(self.width / 2.0 + CHAIR_SPACING, 0.0));
                }
            }
        }
        out
    }

    pub fn translate(&mut self, v: Vector) {
        self.center = self.center.translate(v);
        for chair in &mut self.chairs {
            chair.translate(v);
        }
    }

    pub fn rotate_around(&mut self, center: Point, degrees: f64) {
        self.center = self.center.rotate_around(center, degrees);
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
        self.reposition_chairs();
    }

    pub fn bounding_box(&self) -> Bbox {
        // Rotated rectangle corners plus the chair reach on every side.
        let reach_x = self.width / 2.0 + CHAIR_SPACING + CHAIR_RADIUS;
        let reach_y = self.height / 2.0 + CHAIR_SPACING + CHAIR_RADIUS;
        let corners = [
            Point::new(self.center.x - reach_x, self.center.y - reach_y),
            Point::new(self.center.x + reach_x, self.center.y - reach_y),
            Point::new(self.center.x + reach_x, self.center.y + reach_y),
            Point::new(self.center.x - reach_x, self.center.y + reach_y),
        ];
        Bbox::from_points(
            corners
                .iter()
                .map(|c| c.rotate_around(self.center, self.rotation)),
        )
        .expect("four corners always yield a box")
    }

    pub fn duplicate(&self, mut next_uuid: impl FnMut() -> u64) -> RectTable {
        let mut copy = self.clone();
        copy.uuid = next_uuid();
        copy.id = None;
        copy.id_key = None;
        for chair in &mut copy.chairs {
            chair.uuid = next_uuid();
            chair.id = None;
            chair.id_key = None;
        }
        copy
    }

    pub fn is_labeled(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.is_empty())
    }
}
