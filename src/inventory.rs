// Inventory view state: the current filters, sort mode and active location together with
// the result set derived from them.
//
// Every mutator finishes by recomputing the result, so a reader never sees a result that
// lags behind the configuration.

use crate::catalog::Catalog;
use crate::filter;
use crate::models::{FilterConfig, FilterField, SortMode, Vehicle};
use crate::sort::sort_vehicles;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct InventoryState {
    catalog: Arc<Catalog>,
    filters: FilterConfig,
    sort_mode: SortMode,
    active_location: Option<String>,
    result: Vec<Arc<Vehicle>>,
}

impl InventoryState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let filters = catalog.default_filters();
        let mut state = Self {
            catalog,
            filters,
            sort_mode: SortMode::default(),
            active_location: None,
            result: Vec::new(),
        };
        state.recompute();
        state
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn active_location(&self) -> Option<&str> {
        self.active_location.as_deref()
    }

    /// Filtered and sorted vehicles for the current configuration.
    pub fn result(&self) -> &[Arc<Vehicle>] {
        &self.result
    }

    /// Replaces one filter field. The location field is the active location, so it goes
    /// through [`Self::set_active_location`] to keep the two in sync.
    pub fn set_filter_field(&mut self, field: FilterField) {
        match field {
            FilterField::Brands(brands) => self.filters.brands = brands,
            FilterField::FuelTypes(fuel_types) => self.filters.fuel_types = fuel_types,
            FilterField::Conditions(conditions) => self.filters.conditions = conditions,
            FilterField::Transmission(transmission) => self.filters.transmission = transmission,
            FilterField::MinYear(year) => self.filters.min_year = year,
            FilterField::MaxYear(year) => self.filters.max_year = year,
            FilterField::MinPrice(price) => self.filters.min_price = price,
            FilterField::MaxPrice(price) => self.filters.max_price = price,
            FilterField::Location(location) => {
                self.set_active_location(location);
                return;
            }
        }
        self.recompute();
    }

    /// Restores catalog defaults for every field except the location, which keeps the
    /// active location.
    pub fn reset_filters(&mut self) {
        self.filters = FilterConfig {
            location: self.active_location.clone(),
            ..self.catalog.default_filters()
        };
        self.recompute();
    }

    /// Sets the active location and the filter's location to the same value. An empty
    /// string is treated as no location.
    pub fn set_active_location(&mut self, location: Option<String>) {
        let location = location.filter(|l| !l.is_empty());
        self.active_location = location.clone();
        self.filters.location = location;
        self.recompute();
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.recompute();
    }

    fn recompute(&mut self) {
        let matched = filter::apply(self.catalog.vehicles(), &self.filters);
        self.result = sort_vehicles(&matched, self.sort_mode);
        tracing::debug!(
            "Recomputed inventory: {} of {} vehicles, sort {:?}",
            self.result.len(),
            self.catalog.len(),
            self.sort_mode
        );
    }
}
