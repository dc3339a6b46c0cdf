use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use seatkit_core::constants::{CHAIR_RADIUS, CHAIR_SPACING};
use seatkit_core::{Bbox, Point, Vector};

use crate::category::CategoryId;
use crate::model::chair::Chair;

/// A round table with chairs distributed evenly around its rim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundTable {
    pub uuid: u64,
    pub id: Option<u64>,
    pub id_key: Option<String>,
    pub label: Option<String>,
    pub category: Option<CategoryId>,
    pub center: Point,
    pub radius: f64,
    /// Rotation in degrees; shifts where chair 0 sits on the ring.
    pub rotation: f64,
    pub chairs: SmallVec<[Chair; 16]>,
}

impl RoundTable {
    pub fn new(uuid: u64, center: Point, radius: f64) -> Self {
        Self {
            uuid,
            id: None,
            id_key: None,
            label: None,
            category: None,
            center,
            radius,
            rotation: 0.0,
            chairs: SmallVec::new(),
        }
    }

    /// Adjusts the chair count, then relays the ring. Surviving chairs
    /// keep label/category/uuid by index.
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

    /// Recomputes every chair center from the table parameters.
    ///
    /// Idempotent: with unchanged center/radius/rotation/count this
    /// produces the same ring every time, so it is safe to call after any
    /// parameter edit.
    pub fn reposition_chairs(&mut self) {
        let n = self.chairs.len();
        if n == 0 {
            return;
        }
        let ring = self.radius + CHAIR_SPACING;
        let step = 360.0 / n as f64;
        for (i, chair) in self.chairs.iter_mut().enumerate() {
            let angle = (self.rotation + step * i as f64).to_radians();
            chair.center = Point::new(
                self.center.x + ring * angle.cos(),
                self.center.y + ring * angle.sin(),
            );
        }
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
        let reach = self.radius + CHAIR_SPACING + CHAIR_RADIUS;
        Bbox::new(
            Point::new(self.center.x - reach, self.center.y - reach),
            Point::new(self.center.x + reach, self.center.y + reach),
        )
    }

    pub fn duplicate(&self, mut next_uuid: impl FnMut() -> u64) -> RoundTable {
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
