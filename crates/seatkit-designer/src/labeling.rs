//! Seat auto-labeling.
//!
//! The user labels one or two seats of a row by hand; the labeler infers
//! the progression and fills in the rest. Inference is pluggable: each
//! strategy either recognizes the seed pattern and proposes a full label
//! set, or declines with `None` and the next strategy gets a look.

use tracing::debug;

use crate::model::{Chair, Row};
use crate::subchart::SubChart;

/// One way of extending hand-entered seed labels to a whole row.
///
/// `seeds` are `(chair index, numeric label)` pairs for the chairs the
/// user labeled, in chair order. A strategy returns labels for every
/// chair of the row, or `None` when the seeds do not fit its pattern.
pub trait LabelingStrategy {
    fn name(&self) -> &'static str;

    fn infer(&self, seeds: &[(usize, i64)], total: usize) -> Option<Vec<String>>;
}

/// Arithmetic progression over integer labels.
///
/// The two lowest-index seeds fix the step, which must be integral and
/// consistent across every seed pair, and every extrapolated label must
/// stay positive. Handles descending runs and strides ("1, 3, 5, ...")
/// alike.
pub struct NumericProgression;

impl LabelingStrategy for NumericProgression {
    fn name(&self) -> &'static str {
        "numeric-progression"
    }

    fn infer(&self, seeds: &[(usize, i64)], total: usize) -> Option<Vec<String>> {
        let [(first_idx, first_val), (second_idx, second_val), ..] = *seeds else {
            return None;
        };
        let span = (second_idx - first_idx) as i64;
        let diff = second_val - first_val;
        if span == 0 || diff % span != 0 {
            return None;
        }
        let step = diff / span;
        // every seed must sit on the inferred line
        for &(idx, val) in seeds {
            if first_val + (idx as i64 - first_idx as i64) * step != val {
                return None;
            }
        }
        let labels: Vec<i64> = (0..total)
            .map(|i| first_val + (i as i64 - first_idx as i64) * step)
            .collect();
        if labels.iter().any(|&l| l <= 0) {
            return None;
        }
        Some(labels.iter().map(i64::to_string).collect())
    }
}

/// Runs strategies in order until one recognizes the seeds.
pub struct AutoLabeler {
    strategies: Vec<Box<dyn LabelingStrategy>>,
}

impl Default for AutoLabeler {
    fn default() -> Self {
        Self {
            strategies: vec![Box::new(NumericProgression)],
        }
    }
}

impl AutoLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_strategy(&mut self, strategy: Box<dyn LabelingStrategy>) {
        self.strategies.push(strategy);
    }

    /// Labels every chair of the row from its hand-labeled seeds.
    /// Returns `false` when the row opted out, is already fully labeled,
    /// or no strategy recognizes the seed pattern; the row is left
    /// untouched then.
    pub fn label_row(&self, row: &mut Row) -> bool {
        if !row.auto_labelable || row.chairs.len() < 2 || row.chairs.iter().all(Chair::is_labeled)
        {
            return false;
        }
        let seeds: Vec<(usize, i64)> = row
            .chairs
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.integer_label().map(|v| (i, v)))
            .collect();
        for strategy in &self.strategies {
            if let Some(labels) = strategy.infer(&seeds, row.chairs.len()) {
                debug!(strategy = strategy.name(), row = ?row.label, "row auto-labeled");
                for (chair, label) in row.chairs.iter_mut().zip(labels) {
                    chair.label = Some(label);
                }
                return true;
            }
        }
        false
    }

    /// Labels every eligible row of the chart, recursing into section
    /// interiors. Table chairs without labels get a plain 1..n sequence.
    /// Returns how many rows and tables were labeled.
    pub fn label_chart(&self, chart: &mut SubChart) -> usize {
        let mut labeled = 0;
        for row in &mut chart.rows {
            if self.label_row(row) {
                labeled += 1;
            }
        }
        for table in &mut chart.round_tables {
            if table.chairs.iter().all(|c| !c.is_labeled()) && !table.chairs.is_empty() {
                for (i, chair) in table.chairs.iter_mut().enumerate() {
                    chair.label = Some((i + 1).to_string());
                }
                labeled += 1;
            }
        }
        for table in &mut chart.rect_tables {
            if table.chairs.iter().all(|c| !c.is_labeled()) && !table.chairs.is_empty() {
                for (i, chair) in table.chairs.iter_mut().enumerate() {
                    chair.label = Some((i + 1).to_string());
                }
                labeled += 1;
            }
        }
        for section in &mut chart.sections {
            labeled += self.label_chart(&mut section.interior);
        }
        labeled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Chair;
    use seatkit_core::Point;

    fn row_of(n: usize) -> Row {
        let mut row = Row::new(1);
        for i in 0..n {
            row.chairs.push(Chair::new(Point::new(i as f64 * 25.0, 0.0), 10 + i as u64));
        }
        row
    }

    fn labels(row: &Row) -> Vec<String> {
        row.chairs.iter().map(|c| c.label_or_unset().to_string()).collect()
    }

    #[test]
    fn stride_of_two_is_inferred_from_two_seeds() {
        let mut row = row_of(5);
        row.chairs[0].label = Some("1".into());
        row.chairs[1].label = Some("3".into());
        assert!(AutoLabeler::new().label_row(&mut row));
        assert_eq!(labels(&row), vec!["1", "3", "5", "7", "9"]);
    }

    #[test]
    fn single_seed_is_not_enough() {
        let mut row = row_of(4);
        row.chairs[1].label = Some("7".into());
        assert!(!AutoLabeler::new().label_row(&mut row));
        assert!(row.chairs[0].label.is_none());
    }

    #[test]
    fn progressions_crossing_zero_are_rejected() {
        let mut row = row_of(5);
        row.chairs[0].label = Some("2".into());
        row.chairs[1].label = Some("1".into());
        // extrapolating would hit 0 and below
        assert!(!AutoLabeler::new().label_row(&mut row));
        assert!(row.chairs[2].label.is_none());
    }

    #[test]
    fn fully_labeled_row_is_left_alone() {
        let mut row = row_of(3);
        for (i, chair) in row.chairs.iter_mut().enumerate() {
            chair.label = Some((i + 10).to_string());
        }
        assert!(!AutoLabeler::new().label_row(&mut row));
        assert_eq!(row.chairs[2].label.as_deref(), Some("12"));
    }

    #[test]
    fn descending_progression() {
        let mut row = row_of(4);
        row.chairs[0].label = Some("10".into());
        row.chairs[1].label = Some("9".into());
        assert!(AutoLabeler::new().label_row(&mut row));
        assert_eq!(labels(&row), vec!["10", "9", "8", "7"]);
    }

    #[test]
    fn inconsistent_seeds_are_left_alone() {
        let mut row = row_of(5);
        row.chairs[0].label = Some("1".into());
        row.chairs[1].label = Some("3".into());
        row.chairs[2].label = Some("4".into());
        assert!(!AutoLabeler::new().label_row(&mut row));
        assert_eq!(row.chairs[2].label.as_deref(), Some("4"));
        assert!(row.chairs[3].label.is_none());
    }

    #[test]
    fn opted_out_row_is_skipped() {
        let mut row = row_of(3);
        row.auto_labelable = false;
        row.chairs[0].label = Some("1".into());
        assert!(!AutoLabeler::new().label_row(&mut row));
    }

    #[test]
    fn unlabeled_tables_get_sequential_labels() {
        let mut chart = SubChart::new(crate::subchart::SubChartKind::Master);
        let mut table = crate::model::RoundTable::new(1, Point::new(0.0, 0.0), 60.0);
        let mut uuid = 1;
        table.set_chair_count(3, || {
            uuid += 1;
            uuid
        });
        chart.round_tables.push(table);
        assert_eq!(AutoLabeler::new().label_chart(&mut chart), 1);
        let got: Vec<_> =
            chart.round_tables[0].chairs.iter().map(|c| c.label.clone().unwrap()).collect();
        assert_eq!(got, vec!["1", "2", "3"]);
    }
}
