use serde::{Deserialize, Serialize};

use seatkit_core::{Point, Vector};

use crate::category::CategoryId;

/// Serialized sentinel for a chair that has not been labeled yet.
pub const UNSET_LABEL: &str = "unset";

/// A single seat. Always owned by a row or a table; the parent is implied
/// by where the chair lives, never stored as a back reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chair {
    pub center: Point,
    pub label: Option<String>,
    pub category: Option<CategoryId>,
    /// Stable ticketing id, assigned during identity reconciliation.
    pub id: Option<u64>,
    /// The reconciliation key the current id was issued under. A label or
    /// category edit makes this stale, which invalidates the id on the
    /// next save.
    pub id_key: Option<String>,
    pub uuid: u64,
}

impl Chair {
    pub fn new(center: Point, uuid: u64) -> Self {
        Self {
            center,
            label: None,
            category: None,
            id: None,
            id_key: None,
            uuid,
        }
    }

    /// The label as persisted: the sentinel when unset.
    pub fn label_or_unset(&self) -> &str {
        self.label.as_deref().unwrap_or(UNSET_LABEL)
    }

    /// Parses the label as an integer, for numbering-pattern detection.
    pub fn integer_label(&self) -> Option<i64> {
        self.label.as_deref()?.trim().parse().ok()
    }

    pub fn is_labeled(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.is_empty())
    }

    pub fn translate(&mut self, v: Vector) {
        self.center = self.center.translate(v);
    }

    pub fn rotate_around(&mut self, center: Point, degrees: f64) {
        self.center = self.center.rotate_around(center, degrees);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_label_parses_trimmed_integers() {
        let mut chair = Chair::new(Point::new(0.0, 0.0), 1);
        assert_eq!(chair.integer_label(), None);
        chair.label = Some(" 12 ".to_string());
        assert_eq!(chair.integer_label(), Some(12));
        chair.label = Some("A1".to_string());
        assert_eq!(chair.integer_label(), None);
    }

    #[test]
    fn unset_sentinel() {
        let chair = Chair::new(Point::new(0.0, 0.0), 1);
        assert_eq!(chair.label_or_unset(), "unset");
        assert!(!chair.is_labeled());
    }
}
