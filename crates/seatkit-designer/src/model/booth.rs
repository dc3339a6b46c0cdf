use serde::{Deserialize, Serialize};

use seatkit_core::{Bbox, Point, Vector};

use crate::category::CategoryId;

/// A booth: a sellable rectangular unit with no individual seats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booth {
    pub uuid: u64,
    pub id: Option<u64>,
    pub id_key: Option<String>,
    pub label: Option<String>,
    pub category: Option<CategoryId>,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Booth {
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
        }
    }

    pub fn translate(&mut self, v: Vector) {
        self.center = self.center.translate(v);
    }

    pub fn rotate_around(&mut self, center: Point, degrees: f64) {
        self.center = self.center.rotate_around(center, degrees);
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
    }

    pub fn corners(&self) -> [Point; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            Point::new(self.center.x - hw, self.center.y - hh),
            Point::new(self.center.x + hw, self.center.y - hh),
            Point::new(self.center.x + hw, self.center.y + hh),
            Point::new(self.center.x - hw, self.center.y + hh),
        ]
        .map(|c| c.rotate_around(self.center, self.rotation))
    }

    pub fn bounding_box(&self) -> Bbox {
        Bbox::from_points(self.corners()).expect("four corners always yield a box")
    }

    pub fn duplicate(&self, mut next_uuid: impl FnMut() -> u64) -> Booth {
        let mut copy = self.clone();
        copy.uuid = next_uuid();
        copy.id = None;
        copy.id_key = None;
        copy
    }

    pub fn is_labeled(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.is_empty())
    }
}
