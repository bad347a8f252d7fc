// Bounded, insertion-ordered selection of vehicles for side-by-side comparison

use crate::models::Vehicle;
use std::collections::VecDeque;
use std::sync::Arc;

pub const COMPARE_CAPACITY: usize = 3;

/// At most [`COMPARE_CAPACITY`] distinct vehicles, oldest first.
///
/// Entries share the catalog's `Arc<Vehicle>`, so comparison always reads catalog data.
#[derive(Debug, Clone, Default)]
pub struct CompareSet {
    entries: VecDeque<Arc<Vehicle>>,
}

impl CompareSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `vehicle`. A vehicle already present is left where it is. When the set is
    /// full the oldest entry is evicted first and returned.
    pub fn add(&mut self, vehicle: Arc<Vehicle>) -> Option<Arc<Vehicle>> {
        if self.contains(&vehicle.id) {
            return None;
        }
        let evicted = if self.entries.len() >= COMPARE_CAPACITY {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(vehicle);
        evicted
    }

    /// Removes the entry with this id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|v| v.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn vehicles(&self) -> Vec<Arc<Vehicle>> {
        self.entries.iter().cloned().collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|v| v.id.clone()).collect()
    }
}
