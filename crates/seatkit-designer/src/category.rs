//! Price/visual category registry.
//!
//! Categories are referenced by id from seats, tables, booths and
//! general-admission areas; the registry is the only owner of the
//! category values themselves, so a category is never duplicated.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::subchart::SubChart;

pub type CategoryId = u32;

/// A named price/visual classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub cat_id: CategoryId,
    pub label: String,
    pub color: String,
}

impl Category {
    pub fn new(cat_id: CategoryId, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            cat_id,
            label: label.into(),
            color: color.into(),
        }
    }
}

/// Seated and general-admission category lists, looked up by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRegistry {
    pub seated: Vec<Category>,
    pub general_admission: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a category: seated categories first, then
    /// general-admission. `None` when the id is unknown.
    pub fn get_category(&self, id: CategoryId) -> Option<&Category> {
        self.seated
            .iter()
            .find(|c| c.cat_id == id)
            .or_else(|| self.general_admission.iter().find(|c| c.cat_id == id))
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.get_category(id).is_some()
    }

    pub fn add_seated(&mut self, category: Category) {
        debug_assert!(!self.contains(category.cat_id), "duplicate category id");
        self.seated.push(category);
    }

    pub fn add_general_admission(&mut self, category: Category) {
        debug_assert!(!self.contains(category.cat_id), "duplicate category id");
        self.general_admission.push(category);
    }

    /// Removes a category and detaches it from every object referencing
    /// it anywhere in the chart tree, so no orphaned references survive.
    /// Returns how many objects were detached (their owners need a
    /// redraw).
    pub fn remove_category(&mut self, id: CategoryId, master: &mut SubChart) -> usize {
        self.seated.retain(|c| c.cat_id != id);
        self.general_admission.retain(|c| c.cat_id != id);
        let detached = detach_everywhere(master, id);
        debug!(category = id, detached, "category removed");
        detached
    }
}

fn detach_everywhere(chart: &mut SubChart, id: CategoryId) -> usize {
    let mut count = 0;
    let mut clear = |slot: &mut Option<CategoryId>| {
        if *slot == Some(id) {
            *slot = None;
            count += 1;
        }
    };

    for row in &mut chart.rows {
        for chair in &mut row.chairs {
            clear(&mut chair.category);
        }
    }
    for table in &mut chart.round_tables {
        clear(&mut table.category);
        for chair in &mut table.chairs {
            clear(&mut chair.category);
        }
    }
    for table in &mut chart.rect_tables {
        clear(&mut table.category);
        for chair in &mut table.chairs {
            clear(&mut chair.category);
        }
    }
    for booth in &mut chart.booths {
        clear(&mut booth.category);
    }
    for area in &mut chart.ga_areas {
        clear(&mut area.category);
    }
    for section in &mut chart.sections {
        clear(&mut section.category);
    }
    drop(clear);
    for section in &mut chart.sections {
        count += detach_everywhere(&mut section.interior, id);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subchart::SubChartKind;
    use seatkit_core::Point;

    #[test]
    fn lookup_prefers_seated_list() {
        let mut registry = CategoryRegistry::new();
        registry.add_seated(Category::new(1, "Floor", "#ff0000"));
        registry.add_general_admission(Category::new(2, "Lawn", "#00ff00"));
        assert_eq!(registry.get_category(1).unwrap().label, "Floor");
        assert_eq!(registry.get_category(2).unwrap().label, "Lawn");
        assert!(registry.get_category(99).is_none());
    }

    #[test]
    fn remove_detaches_every_reference() {
        let mut registry = CategoryRegistry::new();
        registry.add_seated(Category::new(7, "VIP", "#ffaa00"));

        let mut master = SubChart::new(SubChartKind::Master);
        let mut row = crate::model::Row::new(1);
        let mut chair = crate::model::Chair::new(Point::new(0.0, 0.0), 2);
        chair.category = Some(7);
        row.chairs.push(chair);
        master.rows.push(row);

        let mut booth = crate::model::Booth::new(3, Point::new(50.0, 50.0), 80.0, 80.0);
        booth.category = Some(7);
        master.booths.push(booth);

        let detached = registry.remove_category(7, &mut master);
        assert_eq!(detached, 2);
        assert!(master.rows[0].chairs[0].category.is_none());
        assert!(master.booths[0].category.is_none());
        assert!(registry.get_category(7).is_none());
    }
}
