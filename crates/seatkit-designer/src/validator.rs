//! Pre-publish chart validation.
//!
//! Walks the whole chart tree and tallies everything a ticketing backend
//! would reject: seats without labels or categories, seats that are
//! indistinguishable from one another, and unlabeled seat containers.
//! Validation never mutates; it reports and the host decides.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::category::CategoryId;
use crate::subchart::SubChart;

/// Issue tallies keyed by the wire names the booking backend expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationCounts {
    #[serde(rename = "UNLABELED_SEATS")]
    pub unlabeled_seats: usize,
    /// Rows holding seats but carrying no label themselves.
    #[serde(rename = "UNLABELED_ROWS")]
    pub unlabeled_rows: usize,
    /// Tables (round or rectangular) holding seats but unlabeled.
    #[serde(rename = "UNLABELED_TABLES")]
    pub unlabeled_tables: usize,
    /// Seats sharing (parent label, seat label, category) with another
    /// seat. Every member of a clashing group counts, so a clashing pair
    /// reports 2; seats missing a label or category are excluded from
    /// grouping.
    #[serde(rename = "DUPLICATE_SEATS")]
    pub duplicate_seats: usize,
    #[serde(rename = "UNCATEGORIZED_SEATS")]
    pub uncategorized_seats: usize,
    /// Booths and general-admission areas without a category.
    #[serde(rename = "UNCATEGORIZED_GA")]
    pub uncategorized_ga: usize,
}

impl ValidationCounts {
    pub fn is_clean(&self) -> bool {
        *self == ValidationCounts::default()
    }

    pub fn total(&self) -> usize {
        self.unlabeled_seats
            + self.unlabeled_rows
            + self.unlabeled_tables
            + self.duplicate_seats
            + self.uncategorized_seats
            + self.uncategorized_ga
    }

    fn merge(&mut self, other: ValidationCounts) {
        self.unlabeled_seats += other.unlabeled_seats;
        self.unlabeled_rows += other.unlabeled_rows;
        self.unlabeled_tables += other.unlabeled_tables;
        self.duplicate_seats += other.duplicate_seats;
        self.uncategorized_seats += other.uncategorized_seats;
        self.uncategorized_ga += other.uncategorized_ga;
    }
}

/// Validates a chart and every section interior below it.
pub fn validate(chart: &SubChart) -> ValidationCounts {
    let mut counts = validate_one(chart);
    for section in &chart.sections {
        counts.merge(validate(&section.interior));
    }
    debug!(issues = counts.total(), "chart validated");
    counts
}

fn validate_one(chart: &SubChart) -> ValidationCounts {
    let mut counts = ValidationCounts::default();

    // seats grouped by parent label, then by (seat label, category)
    let mut groups: HashMap<String, HashMap<(String, CategoryId), usize>> = HashMap::new();

    chart.for_each_seat(|parent, chair| {
        if !chair.is_labeled() {
            counts.unlabeled_seats += 1;
        }
        if chair.category.is_none() {
            counts.uncategorized_seats += 1;
        }
        if let (true, Some(category)) = (chair.is_labeled(), chair.category) {
            let key = (chair.label_or_unset().to_string(), category);
            *groups.entry(parent.to_string()).or_default().entry(key).or_insert(0) += 1;
        }
    });

    for per_parent in groups.values() {
        for &n in per_parent.values() {
            if n >= 2 {
                counts.duplicate_seats += n;
            }
        }
    }

    for row in &chart.rows {
        if row.label.is_none() && !row.chairs.is_empty() {
            counts.unlabeled_rows += 1;
        }
    }
    for table in &chart.round_tables {
        if table.label.is_none() && !table.chairs.is_empty() {
            counts.unlabeled_tables += 1;
        }
    }
    for table in &chart.rect_tables {
        if table.label.is_none() && !table.chairs.is_empty() {
            counts.unlabeled_tables += 1;
        }
    }

    for booth in &chart.booths {
        if booth.category.is_none() {
            counts.uncategorized_ga += 1;
        }
    }
    for area in &chart.ga_areas {
        if area.category.is_none() {
            counts.uncategorized_ga += 1;
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chair, Row, Section};
    use crate::subchart::SubChartKind;
    use seatkit_core::Point;

    fn labeled_chair(x: f64, uuid: u64, label: &str, cat: Option<CategoryId>) -> Chair {
        let mut c = Chair::new(Point::new(x, 0.0), uuid);
        c.label = Some(label.to_string());
        c.category = cat;
        c
    }

    #[test]
    fn clean_chart_reports_nothing() {
        let mut chart = SubChart::new(SubChartKind::Master);
        let mut row = Row::new(1);
        row.label = Some("A".into());
        row.chairs.push(labeled_chair(0.0, 2, "1", Some(1)));
        row.chairs.push(labeled_chair(25.0, 3, "2", Some(1)));
        chart.rows.push(row);
        assert!(validate(&chart).is_clean());
    }

    #[test]
    fn same_label_different_category_is_not_a_duplicate() {
        let mut chart = SubChart::new(SubChartKind::Master);
        let mut row = Row::new(1);
        row.label = Some("A".into());
        row.chairs.push(labeled_chair(0.0, 2, "1", Some(1)));
        row.chairs.push(labeled_chair(25.0, 3, "1", Some(2)));
        chart.rows.push(row);
        assert_eq!(validate(&chart).duplicate_seats, 0);
    }

    #[test]
    fn same_label_different_parent_is_not_a_duplicate() {
        let mut chart = SubChart::new(SubChartKind::Master);
        for (uuid, name) in [(1u64, "A"), (10, "B")] {
            let mut row = Row::new(uuid);
            row.label = Some(name.into());
            row.chairs.push(labeled_chair(0.0, uuid + 1, "1", Some(1)));
            chart.rows.push(row);
        }
        assert_eq!(validate(&chart).duplicate_seats, 0);
    }

    #[test]
    fn uncategorized_clashes_are_not_duplicates() {
        let mut chart = SubChart::new(SubChartKind::Master);
        let mut row = Row::new(1);
        row.label = Some("A".into());
        row.chairs.push(labeled_chair(0.0, 2, "1", None));
        row.chairs.push(labeled_chair(25.0, 3, "1", None));
        chart.rows.push(row);
        let counts = validate(&chart);
        assert_eq!(counts.duplicate_seats, 0);
        assert_eq!(counts.uncategorized_seats, 2);
    }

    #[test]
    fn a_clashing_pair_counts_both_seats() {
        let mut chart = SubChart::new(SubChartKind::Master);
        let mut row = Row::new(1);
        row.label = Some("A".into());
        row.chairs.push(labeled_chair(0.0, 2, "1", Some(7)));
        row.chairs.push(labeled_chair(25.0, 3, "1", Some(7)));
        chart.rows.push(row);
        assert_eq!(validate(&chart).duplicate_seats, 2);
    }

    #[test]
    fn duplicates_count_every_clashing_seat() {
        let mut chart = SubChart::new(SubChartKind::Master);
        let mut row = Row::new(1);
        row.label = Some("A".into());
        for uuid in 2..5 {
            row.chairs.push(labeled_chair(uuid as f64 * 25.0, uuid, "1", Some(1)));
        }
        chart.rows.push(row);
        assert_eq!(validate(&chart).duplicate_seats, 3);
    }

    #[test]
    fn unlabeled_and_uncategorized_are_tallied() {
        let mut chart = SubChart::new(SubChartKind::Master);
        let mut row = Row::new(1);
        row.chairs.push(Chair::new(Point::new(0.0, 0.0), 2));
        chart.rows.push(row);
        chart.booths.push(crate::model::Booth::new(3, Point::new(50.0, 50.0), 80.0, 80.0));

        let counts = validate(&chart);
        assert_eq!(counts.unlabeled_seats, 1);
        assert_eq!(counts.uncategorized_seats, 1);
        assert_eq!(counts.unlabeled_rows, 1);
        assert_eq!(counts.unlabeled_tables, 0);
        assert_eq!(counts.uncategorized_ga, 1);
    }

    #[test]
    fn section_interiors_are_included() {
        let mut chart = SubChart::new(SubChartKind::Master);
        let mut section = Section::new(1);
        let mut row = Row::new(2);
        row.chairs.push(Chair::new(Point::new(0.0, 0.0), 3));
        section.interior.rows.push(row);
        chart.sections.push(section);

        let counts = validate(&chart);
        assert_eq!(counts.unlabeled_seats, 1);
        assert_eq!(counts.unlabeled_rows, 1);
    }

    #[test]
    fn wire_names_are_stable() {
        let json = serde_json::to_string(&ValidationCounts::default()).unwrap();
        for key in [
            "UNLABELED_SEATS",
            "UNLABELED_ROWS",
            "UNLABELED_TABLES",
            "DUPLICATE_SEATS",
            "UNCATEGORIZED_SEATS",
            "UNCATEGORIZED_GA",
        ] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }
}
