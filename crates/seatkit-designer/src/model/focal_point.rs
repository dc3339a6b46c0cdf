use serde::{Deserialize, Serialize};

use seatkit_core::{Point, Vector};

/// The reference marker seats are ranked against (typically the stage).
/// At most one exists, on the master chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FocalPoint {
    pub point: Point,
}

impl FocalPoint {
    pub fn new(point: Point) -> Self {
        Self { point }
    }

    pub fn translate(&mut self, v: Vector) {
        self.point = self.point.translate(v);
    }

    /// Ranks seats by proximity, closest first. Feed it every seat of the
    /// chart; the result drives the proximity-highlight overlay.
    pub fn rank_seats(&self, seats: impl Iterator<Item = (u64, Point)>) -> Vec<(u64, f64)> {
        let mut ranked: Vec<(u64, f64)> = seats
            .map(|(uuid, center)| (uuid, self.point.distance_to(center)))
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}
