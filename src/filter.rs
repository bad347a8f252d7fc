// Filter predicate engine: does one vehicle satisfy a filter configuration?

use crate::models::{FilterConfig, Vehicle};
use std::sync::Arc;

/// Returns true when `vehicle` satisfies every active predicate of `filters`.
///
/// Empty sets and absent values do not restrict. Never fails: an inverted range such as
/// `min_year > max_year` just matches nothing.
pub fn matches(vehicle: &Vehicle, filters: &FilterConfig) -> bool {
    if let Some(location) = filters.location.as_deref() {
        if !location.is_empty() && vehicle.location != location {
            return false;
        }
    }

    if !filters.brands.is_empty() && !filters.brands.contains(&vehicle.brand) {
        return false;
    }

    if !filters.fuel_types.is_empty() && !filters.fuel_types.contains(&vehicle.fuel_type) {
        return false;
    }

    if !filters.conditions.is_empty() && !filters.conditions.contains(&vehicle.condition) {
        return false;
    }

    if let Some(transmission) = filters.transmission {
        if vehicle.transmission != transmission {
            return false;
        }
    }

    if vehicle.year < filters.min_year || vehicle.year > filters.max_year {
        return false;
    }

    let price = vehicle.effective_price();
    price >= filters.min_price && price <= filters.max_price
}

/// Keeps the vehicles that match `filters`, preserving input order.
pub fn apply(vehicles: &[Arc<Vehicle>], filters: &FilterConfig) -> Vec<Arc<Vehicle>> {
    vehicles
        .iter()
        .filter(|v| matches(v, filters))
        .cloned()
        .collect()
}
