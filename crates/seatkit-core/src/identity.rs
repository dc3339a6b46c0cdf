//! Identity allocation for scene objects.
//!
//! Numeric ids are the stable identifiers downstream ticketing references
//! point at; uuids are cheap process-unique handles for render bookkeeping
//! and duplication. Both come from one allocator owned by the chart
//! session — there is no ambient static counter, so two sessions never
//! interfere and tests are deterministic.

use serde::{Deserialize, Serialize};

/// Hands out monotonically increasing ids and uuids.
///
/// Ids are seeded above the highest id ever observed in a loaded document
/// (`seed_above`), so freshly created objects can never collide with
/// reloaded ones — including ids issued earlier in this session and
/// discarded since. Neither counter ever moves backwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityAllocator {
    next_id: u64,
    next_uuid: u64,
    /// Value of `next_id` right after the last document load; ids below
    /// this came from the document, ids at or above it were issued here.
    initial_id_at_load: u64,
}

impl IdentityAllocator {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            next_uuid: 1,
            initial_id_at_load: 1,
        }
    }

    /// Issues a fresh object id.
    pub fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Issues a fresh uuid.
    pub fn fresh_uuid(&mut self) -> u64 {
        let uuid = self.next_uuid;
        self.next_uuid += 1;
        uuid
    }

    /// Moves the id counter above `max_loaded_id`. Called once per
    /// document load; never lowers the counter.
    pub fn seed_above(&mut self, max_loaded_id: u64) {
        if max_loaded_id >= self.next_id {
            self.next_id = max_loaded_id + 1;
        }
        self.initial_id_at_load = self.next_id;
    }

    /// True when `id` was present in the loaded document rather than
    /// issued during this session.
    pub fn is_loaded_id(&self, id: u64) -> bool {
        id < self.initial_id_at_load
    }

    /// The next id that would be issued (diagnostics only).
    pub fn peek_next_id(&self) -> u64 {
        self.next_id
    }
}

impl Default for IdentityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut alloc = IdentityAllocator::new();
        let a = alloc.fresh_id();
        let b = alloc.fresh_id();
        assert!(b > a);
    }

    #[test]
    fn seed_above_skips_loaded_range() {
        let mut alloc = IdentityAllocator::new();
        alloc.seed_above(500);
        assert_eq!(alloc.fresh_id(), 501);
        assert!(alloc.is_loaded_id(400));
        assert!(!alloc.is_loaded_id(501));
    }

    #[test]
    fn seed_above_never_lowers_counter() {
        let mut alloc = IdentityAllocator::new();
        alloc.seed_above(500);
        alloc.fresh_id();
        alloc.seed_above(10);
        assert_eq!(alloc.fresh_id(), 502);
    }

    #[test]
    fn uuid_counter_is_independent() {
        let mut alloc = IdentityAllocator::new();
        alloc.seed_above(100);
        assert_eq!(alloc.fresh_uuid(), 1);
        assert_eq!(alloc.fresh_uuid(), 2);
    }
}
