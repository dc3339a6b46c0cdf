//! Top-level editing session.
//!
//! `ChartSession` owns everything an open document needs: the master
//! subchart, the category registry, the identity allocator, the id map
//! remembered from the last load, and the cursor into the section whose
//! interior is currently being edited.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use seatkit_core::constants::DEFAULT_GRID_PRECISION;
use seatkit_core::{ChartError, IdentityAllocator, Result};

use crate::category::{CategoryId, CategoryRegistry};
use crate::model::ObjectRef;
use crate::subchart::{SubChart, SubChartKind};

/// Kind of venue the chart describes. Only affects presentation
/// defaults in hosts, never editor behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VenueType {
    #[default]
    Theater,
    Arena,
    Stadium,
    Club,
    Festival,
}

/// Document-level toggles persisted alongside the chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSettings {
    pub show_row_labels: bool,
    pub show_row_lines: bool,
    /// Tables are booked as a unit rather than per seat.
    pub whole_table_booking: bool,
    pub show_all_buttons: bool,
    pub venue_type: VenueType,
    pub grid_snap: bool,
    pub grid_snap_precision: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            show_row_labels: true,
            show_row_lines: false,
            whole_table_booking: false,
            show_all_buttons: false,
            venue_type: VenueType::default(),
            grid_snap: false,
            grid_snap_precision: DEFAULT_GRID_PRECISION,
        }
    }
}

/// An open chart document plus everything needed to keep editing it.
#[derive(Debug, Clone)]
pub struct ChartSession {
    pub name: String,
    pub chart_id: uuid::Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub master: SubChart,
    pub categories: CategoryRegistry,
    pub identity: IdentityAllocator,
    pub settings: ChartSettings,
    /// id-key to stable id, as loaded from the persisted document. A key
    /// still present here at save time reuses its id; anything else gets
    /// a fresh one.
    pub loaded_ids: HashMap<String, u64>,
    /// Index into `master.sections` whose interior is being edited, or
    /// `None` when the master chart itself is active.
    active_section: Option<usize>,
}

impl ChartSession {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        let name = name.into();
        info!(chart = %name, "new chart session");
        Self {
            name,
            chart_id: uuid::Uuid::new_v4(),
            created_at: now,
            modified_at: now,
            master: SubChart::new(SubChartKind::Master),
            categories: CategoryRegistry::new(),
            identity: IdentityAllocator::new(),
            settings: ChartSettings::default(),
            loaded_ids: HashMap::new(),
            active_section: None,
        }
    }

    /// The subchart edits currently apply to.
    pub fn active_chart(&self) -> &SubChart {
        match self.active_section {
            Some(i) => &self.master.sections[i].interior,
            None => &self.master,
        }
    }

    pub fn active_chart_mut(&mut self) -> &mut SubChart {
        match self.active_section {
            Some(i) => &mut self.master.sections[i].interior,
            None => &mut self.master,
        }
    }

    pub fn in_section(&self) -> bool {
        self.active_section.is_some()
    }

    pub fn active_section_index(&self) -> Option<usize> {
        self.active_section
    }

    /// Descends into a section's interior. Editing inside a section never
    /// touches the master-level objects around it.
    pub fn enter_section(&mut self, index: usize) -> Result<()> {
        if index >= self.master.sections.len() {
            return Err(ChartError::document(format!("no section at index {index}")));
        }
        debug!(section = index, "entering section interior");
        self.active_section = Some(index);
        Ok(())
    }

    /// Returns to master-chart editing.
    pub fn leave_section(&mut self) {
        self.active_section = None;
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// Assigns a category to a batch of seats (by uuid) and whole objects
    /// (by handle) on the active chart. Seat assignment propagates to the
    /// owning table. Unknown category ids are refused up front so a batch
    /// never half-applies.
    pub fn apply_category_to_items(
        &mut self,
        seat_uuids: &[u64],
        objects: &[ObjectRef],
        category: CategoryId,
    ) -> Result<usize> {
        if !self.categories.contains(category) {
            return Err(ChartError::UnknownCategory { id: category });
        }
        let chart = match self.active_section {
            Some(i) => &mut self.master.sections[i].interior,
            None => &mut self.master,
        };
        let mut applied = 0;
        for &uuid in seat_uuids {
            if chart.apply_category_to_seat(uuid, category) {
                applied += 1;
            }
        }
        for &r in objects {
            use crate::model::ObjectKind;
            match r.kind {
                ObjectKind::Booth => {
                    if let Some(b) = chart.booths.get_mut(r.index) {
                        b.category = Some(category);
                        applied += 1;
                    }
                }
                ObjectKind::GaArea => {
                    if let Some(a) = chart.ga_areas.get_mut(r.index) {
                        a.category = Some(category);
                        applied += 1;
                    }
                }
                ObjectKind::Section => {
                    if let Some(s) = chart.sections.get_mut(r.index) {
                        s.category = Some(category);
                        applied += 1;
                    }
                }
                ObjectKind::RoundTable => {
                    if let Some(t) = chart.round_tables.get_mut(r.index) {
                        t.category = Some(category);
                        for chair in &mut t.chairs {
                            chair.category = Some(category);
                        }
                        applied += 1;
                    }
                }
                ObjectKind::RectTable => {
                    if let Some(t) = chart.rect_tables.get_mut(r.index) {
                        t.category = Some(category);
                        for chair in &mut t.chairs {
                            chair.category = Some(category);
                        }
                        applied += 1;
                    }
                }
                _ => {}
            }
        }
        debug!(category, applied, "category applied");
        Ok(applied)
    }

    /// Drops seats that sit exactly on top of an earlier seat (same
    /// rounded coordinates). Rows drawn twice over the same ray are the
    /// usual source. Returns how many were removed.
    pub fn dedupe_seats(&mut self) -> usize {
        let chart = self.active_chart_mut();
        let mut seen: std::collections::HashSet<(i64, i64)> = std::collections::HashSet::new();
        let mut removed = 0;
        let mut keep = |center: seatkit_core::Point| {
            // coordinates are already rounded to 2 decimals
            let key = ((center.x * 100.0) as i64, (center.y * 100.0) as i64);
            seen.insert(key)
        };
        for row in &mut chart.rows {
            let before = row.chairs.len();
            row.chairs.retain(|c| keep(c.center));
            removed += before - row.chairs.len();
        }
        for table in &mut chart.round_tables {
            let before = table.chairs.len();
            table.chairs.retain(|c| keep(c.center));
            removed += before - table.chairs.len();
        }
        for table in &mut chart.rect_tables {
            let before = table.chairs.len();
            table.chairs.retain(|c| keep(c.center));
            removed += before - table.chairs.len();
        }
        if removed > 0 {
            info!(removed, "duplicate seats pruned");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::model::{Chair, ObjectKind, Row, Section};
    use seatkit_core::Point;

    #[test]
    fn enter_section_switches_active_chart() {
        let mut session = ChartSession::new("Hall A");
        session.master.sections.push(Section::new(1));
        assert!(!session.in_section());

        session.enter_section(0).unwrap();
        assert!(session.in_section());
        assert_eq!(session.active_chart().kind, SubChartKind::Section);

        session.leave_section();
        assert_eq!(session.active_chart().kind, SubChartKind::Master);
    }

    #[test]
    fn enter_section_out_of_range_errors() {
        let mut session = ChartSession::new("Hall A");
        assert!(session.enter_section(0).is_err());
    }

    #[test]
    fn unknown_category_is_refused() {
        let mut session = ChartSession::new("Hall A");
        let err = session.apply_category_to_items(&[], &[], 42).unwrap_err();
        assert!(matches!(err, ChartError::UnknownCategory { id: 42 }));
    }

    #[test]
    fn category_applies_to_booth_handles() {
        let mut session = ChartSession::new("Hall A");
        session.categories.add_seated(Category::new(1, "Floor", "#f00"));
        let uuid = session.identity.fresh_uuid();
        session
            .master
            .booths
            .push(crate::model::Booth::new(uuid, Point::new(0.0, 0.0), 80.0, 80.0));

        let n = session
            .apply_category_to_items(&[], &[ObjectRef::new(ObjectKind::Booth, 0)], 1)
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(session.master.booths[0].category, Some(1));
    }

    #[test]
    fn dedupe_removes_stacked_seats() {
        let mut session = ChartSession::new("Hall A");
        let mut row = Row::new(1);
        row.chairs.push(Chair::new(Point::new(0.0, 0.0), 2));
        row.chairs.push(Chair::new(Point::new(25.0, 0.0), 3));
        row.chairs.push(Chair::new(Point::new(0.0, 0.0), 4));
        session.master.rows.push(row);

        assert_eq!(session.dedupe_seats(), 1);
        assert_eq!(session.master.rows[0].chairs.len(), 2);
        // kept the earlier of the stacked pair
        assert_eq!(session.master.rows[0].chairs[0].uuid, 2);
    }
}
