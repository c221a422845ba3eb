//! # Identity Registry + Traversal Frontier
//!
//! The registry is a bijection from object handles to monotonically
//! increasing integer ids; the frontier is the FIFO worklist of
//! discovered-but-unvisited objects. The two are one structure because
//! get-or-create and enqueue must be a single operation: that atomicity
//! is the sole mechanism guaranteeing exactly-once visitation under
//! arbitrary aliasing and cycles.
//!
//! Scoped to one dump invocation. Never shared across concurrent dumps
//! of possibly-overlapping graphs.

use crate::types::{ObjRef, ObjectId};
use std::collections::{BTreeMap, VecDeque};

// =============================================================================
// REGISTRY
// =============================================================================

/// Identity registry plus traversal frontier for one dump pass.
///
/// Uses `BTreeMap` for deterministic ordering. Presence in the map
/// implies "already discovered": revisiting a known object never
/// re-enqueues or re-ids it.
#[derive(Debug, Default)]
pub struct Registry {
    /// Handle -> assigned id. The implicit visited-set.
    ids: BTreeMap<ObjRef, ObjectId>,
    /// FIFO of discovered-but-unvisited handles.
    frontier: VecDeque<ObjRef>,
    /// Next id to allocate. Ids start at 1; 0 is reserved.
    next_id: u64,
}

impl Registry {
    /// Create an empty registry. The first allocated id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: BTreeMap::new(),
            frontier: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Resolve a possibly-absent handle to its id.
    ///
    /// Absent resolves to the reserved id 0. A known handle resolves to
    /// its existing id. A new handle is appended to the frontier tail,
    /// allocated the next counter value, and recorded — get-or-create
    /// and enqueue in one step.
    pub fn resolve(&mut self, obj: Option<ObjRef>) -> ObjectId {
        let Some(handle) = obj else {
            return ObjectId::ROOT;
        };
        if let Some(id) = self.ids.get(&handle) {
            return *id;
        }
        let id = ObjectId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.ids.insert(handle, id);
        self.frontier.push_back(handle);
        id
    }

    /// Pop the frontier head. FIFO order gives breadth-first traversal
    /// and discovery-proximity-ordered ids.
    pub fn next(&mut self) -> Option<ObjRef> {
        self.frontier.pop_front()
    }

    /// Number of ids assigned so far.
    #[must_use]
    pub fn assigned(&self) -> u64 {
        self.ids.len() as u64
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_resolves_to_reserved_zero() {
        let mut registry = Registry::new();
        assert_eq!(registry.resolve(None), ObjectId::ROOT);
        // Reserved id never consumes the counter or enqueues anything.
        assert_eq!(registry.assigned(), 0);
        assert_eq!(registry.next(), None);
    }

    #[test]
    fn ids_start_at_one_in_discovery_order() {
        let mut registry = Registry::new();
        assert_eq!(registry.resolve(Some(ObjRef(90))), ObjectId(1));
        assert_eq!(registry.resolve(Some(ObjRef(10))), ObjectId(2));
        assert_eq!(registry.resolve(Some(ObjRef(50))), ObjectId(3));
    }

    #[test]
    fn aliased_handle_keeps_first_id_and_single_enqueue() {
        let mut registry = Registry::new();
        let first = registry.resolve(Some(ObjRef(7)));
        let second = registry.resolve(Some(ObjRef(7)));
        assert_eq!(first, second);
        assert_eq!(registry.assigned(), 1);
        assert_eq!(registry.next(), Some(ObjRef(7)));
        assert_eq!(registry.next(), None);
    }

    #[test]
    fn frontier_is_fifo() {
        let mut registry = Registry::new();
        registry.resolve(Some(ObjRef(3)));
        registry.resolve(Some(ObjRef(1)));
        registry.resolve(Some(ObjRef(2)));
        assert_eq!(registry.next(), Some(ObjRef(3)));
        assert_eq!(registry.next(), Some(ObjRef(1)));
        assert_eq!(registry.next(), Some(ObjRef(2)));
        assert_eq!(registry.next(), None);
    }

    #[test]
    fn popped_handles_stay_registered() {
        let mut registry = Registry::new();
        let id = registry.resolve(Some(ObjRef(4)));
        assert_eq!(registry.next(), Some(ObjRef(4)));
        // Revisiting after processing must not re-enqueue.
        assert_eq!(registry.resolve(Some(ObjRef(4))), id);
        assert_eq!(registry.next(), None);
    }
}
