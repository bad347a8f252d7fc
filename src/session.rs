// Session-level owner of the inventory view and the compare set.
//
// Constructed once at startup and handed to whoever needs it. After every change to the
// compare set or the active location the whitelisted state is written to the session store.
// Inside a tokio runtime the write runs on the blocking pool; a failed write is logged and
// otherwise ignored, and the next change tries again.

use crate::catalog::Catalog;
use crate::compare::CompareSet;
use crate::inventory::InventoryState;
use crate::models::{FilterField, SortMode, Vehicle};
use crate::persistence::{PersistedState, SessionStore};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;

pub struct Session {
    inventory: InventoryState,
    compare: CompareSet,
    store: Arc<dyn SessionStore>,
    // Generation of the last snapshot written; older snapshots that arrive late are dropped
    saved_generation: Arc<Mutex<u64>>,
    generation: u64,
}

impl Session {
    /// Builds a session from whatever the store remembers. An unreadable store means
    /// "no prior state"; persisted ids missing from the catalog are dropped.
    pub fn restore(catalog: Arc<Catalog>, store: Arc<dyn SessionStore>) -> Self {
        let persisted = match store.load() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Failed to load session state, using defaults: {}", e);
                PersistedState::default()
            }
        };

        let mut compare = CompareSet::new();
        for id in &persisted.compare_set_ids {
            match catalog.find(id) {
                Some(vehicle) => {
                    compare.add(vehicle.clone());
                }
                None => tracing::debug!("Skipping unknown vehicle id '{}' from saved compare set", id),
            }
        }

        let mut inventory = InventoryState::new(catalog);
        inventory.set_active_location(persisted.active_location);

        tracing::info!(
            "Session restored: {} vehicle(s) in compare set, active location {:?}",
            compare.len(),
            inventory.active_location()
        );

        Self {
            inventory,
            compare,
            store,
            saved_generation: Arc::new(Mutex::new(0)),
            generation: 0,
        }
    }

    pub fn inventory(&self) -> &InventoryState {
        &self.inventory
    }

    pub fn compare(&self) -> &CompareSet {
        &self.compare
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.inventory.catalog()
    }

    /// The exact state handed to the session store.
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            compare_set_ids: self.compare.ids(),
            active_location: self.inventory.active_location().map(str::to_string),
        }
    }

    pub fn set_filter_field(&mut self, field: FilterField) {
        let touches_location = matches!(field, FilterField::Location(_));
        self.inventory.set_filter_field(field);
        if touches_location {
            self.persist();
        }
    }

    pub fn reset_filters(&mut self) {
        self.inventory.reset_filters();
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.inventory.set_sort_mode(mode);
    }

    pub fn set_active_location(&mut self, location: Option<String>) {
        self.inventory.set_active_location(location);
        self.persist();
    }

    pub fn add_to_compare(&mut self, vehicle: Arc<Vehicle>) {
        if let Some(evicted) = self.compare.add(vehicle) {
            tracing::debug!("Compare set full, evicted '{}'", evicted.id);
        }
        self.persist();
    }

    pub fn remove_from_compare(&mut self, id: &str) {
        self.compare.remove(id);
        self.persist();
    }

    pub fn clear_compare(&mut self) {
        self.compare.clear();
        self.persist();
    }

    fn persist(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let state = self.persisted_state();
        let store = self.store.clone();
        let saved_generation = self.saved_generation.clone();

        let save = move || {
            let mut saved = saved_generation.lock().unwrap_or_else(PoisonError::into_inner);
            if *saved > generation {
                tracing::debug!("Skipping stale session snapshot {}", generation);
                return;
            }
            *saved = generation;
            if let Err(e) = store.save(&state) {
                tracing::warn!("Failed to save session state: {}", e);
            }
        };

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(save);
            }
            Err(_) => save(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::persistence::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn load(&self) -> Result<PersistedState, PersistenceError> {
            Err(std::io::Error::other("disk unplugged").into())
        }

        fn save(&self, _state: &PersistedState) -> Result<(), PersistenceError> {
            Err(std::io::Error::other("disk unplugged").into())
        }
    }

    // Fails the first `failures` saves, then behaves like a memory store
    struct FlakyStore {
        failures: AtomicUsize,
        inner: MemoryStore,
    }

    impl SessionStore for FlakyStore {
        fn load(&self) -> Result<PersistedState, PersistenceError> {
            self.inner.load()
        }

        fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.save(state)
        }
    }

    #[derive(Default)]
    struct CountingStore {
        saves: AtomicUsize,
        inner: MemoryStore,
    }

    impl SessionStore for CountingStore {
        fn load(&self) -> Result<PersistedState, PersistenceError> {
            self.inner.load()
        }

        fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(state)
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::seed().unwrap())
    }

    #[test]
    fn restores_compare_set_and_location() {
        let store = Arc::new(MemoryStore::with_state(PersistedState {
            compare_set_ids: vec![
                "bmw-i7-2023".to_string(),
                "gone-from-catalog".to_string(),
                "audi-a8-2023".to_string(),
            ],
            active_location: Some("Munich".to_string()),
        }));
        let session = Session::restore(catalog(), store);

        assert_eq!(session.compare().ids(), vec!["bmw-i7-2023", "audi-a8-2023"]);
        assert_eq!(session.inventory().filters().location.as_deref(), Some("Munich"));
        assert!(session.inventory().result().iter().all(|v| v.location == "Munich"));
    }

    #[test]
    fn mutations_save_only_whitelisted_fields() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::restore(catalog(), store.clone());
        let i7 = session.catalog().find("bmw-i7-2023").unwrap().clone();

        session.add_to_compare(i7);
        session.set_active_location(Some("Paris".to_string()));
        session.set_sort_mode(SortMode::PriceDescending);

        assert_eq!(
            store.snapshot(),
            Some(PersistedState {
                compare_set_ids: vec!["bmw-i7-2023".to_string()],
                active_location: Some("Paris".to_string()),
            })
        );

        session.clear_compare();
        assert_eq!(store.snapshot().map(|s| s.compare_set_ids.len()), Some(0));
    }

    #[test]
    fn broken_store_is_not_fatal() {
        let mut session = Session::restore(catalog(), Arc::new(BrokenStore));
        assert!(session.compare().is_empty());
        assert_eq!(session.inventory().active_location(), None);

        let a8 = session.catalog().find("audi-a8-2023").unwrap().clone();
        session.add_to_compare(a8);
        session.set_active_location(Some("Berlin".to_string()));
        assert!(session.compare().contains("audi-a8-2023"));
        assert_eq!(session.inventory().result().len(), 2);
    }

    #[test]
    fn reset_keeps_restored_location() {
        let store = Arc::new(MemoryStore::with_state(PersistedState {
            compare_set_ids: Vec::new(),
            active_location: Some("London".to_string()),
        }));
        let mut session = Session::restore(catalog(), store);
        session.set_filter_field(FilterField::MinYear(2023));
        session.reset_filters();
        assert_eq!(session.inventory().filters().location.as_deref(), Some("London"));
        assert_eq!(session.inventory().result().len(), 2);
    }

    #[test]
    fn failed_save_is_retried_by_the_next_change() {
        let store = Arc::new(FlakyStore { failures: AtomicUsize::new(1), inner: MemoryStore::new() });
        let mut session = Session::restore(catalog(), store.clone());
        let a8 = session.catalog().find("audi-a8-2023").unwrap().clone();
        let i7 = session.catalog().find("bmw-i7-2023").unwrap().clone();

        session.set_active_location(Some("Berlin".to_string()));
        assert_eq!(store.inner.snapshot(), None);

        session.add_to_compare(a8);
        session.add_to_compare(i7);
        assert_eq!(
            store.inner.snapshot(),
            Some(PersistedState {
                compare_set_ids: vec!["audi-a8-2023".to_string(), "bmw-i7-2023".to_string()],
                active_location: Some("Berlin".to_string()),
            })
        );
    }

    #[test]
    fn restoring_more_than_capacity_keeps_the_last_three() {
        let store = Arc::new(MemoryStore::with_state(PersistedState {
            compare_set_ids: vec![
                "mercedes-s-class-2023".to_string(),
                "bmw-7-series-2023".to_string(),
                "audi-a8-2023".to_string(),
                "porsche-911-carrera-2023".to_string(),
                "tesla-model-s-plaid-2023".to_string(),
            ],
            active_location: None,
        }));
        let session = Session::restore(catalog(), store);
        assert_eq!(
            session.compare().ids(),
            vec!["audi-a8-2023", "porsche-911-carrera-2023", "tesla-model-s-plaid-2023"]
        );
    }

    #[test]
    fn only_location_filter_changes_are_saved() {
        let store = Arc::new(CountingStore::default());
        let mut session = Session::restore(catalog(), store.clone());

        session.set_filter_field(FilterField::MinYear(2023));
        session.set_sort_mode(SortMode::MileageAscending);
        session.reset_filters();
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
        assert_eq!(store.inner.snapshot(), None);

        session.set_filter_field(FilterField::Location(Some("Paris".to_string())));
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.inner.snapshot().and_then(|s| s.active_location),
            Some("Paris".to_string())
        );

        session.set_filter_field(FilterField::MaxPrice(150_000));
        session.reset_filters();
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn saves_inside_a_runtime_settle_on_the_latest_state() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::restore(catalog(), store.clone());
        let ids: Vec<String> = session.catalog().vehicles().iter().map(|v| v.id.clone()).collect();
        for (i, id) in ids.iter().enumerate() {
            let vehicle = session.catalog().find(id).unwrap().clone();
            session.add_to_compare(vehicle);
            let location = if i % 2 == 0 { "Munich" } else { "London" };
            session.set_active_location(Some(location.to_string()));
        }
        session.remove_from_compare("audi-e-tron-gt-2023");

        let expected = session.persisted_state();
        let mut settled = false;
        for _ in 0..200 {
            if store.snapshot().as_ref() == Some(&expected) {
                settled = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(settled, "last snapshot was {:?}", store.snapshot());
    }
}
