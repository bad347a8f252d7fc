// Sort policy for inventory results

use crate::models::{SortMode, Vehicle};
use std::sync::Arc;

/// Returns a new, ordered copy of `vehicles`.
///
/// Uses a stable sort, so vehicles with equal keys keep their input order. No secondary key
/// is applied.
pub fn sort_vehicles(vehicles: &[Arc<Vehicle>], mode: SortMode) -> Vec<Arc<Vehicle>> {
    let mut sorted = vehicles.to_vec();
    match mode {
        SortMode::Newest => sorted.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
        SortMode::PriceAscending => sorted.sort_by_key(|v| v.effective_price()),
        SortMode::PriceDescending => {
            sorted.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()))
        }
        SortMode::MileageAscending => sorted.sort_by_key(|v| v.mileage),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn ids(vehicles: &[Arc<Vehicle>]) -> Vec<&str> {
        vehicles.iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn newest_first() {
        let catalog = Catalog::seed().unwrap();
        let sorted = sort_vehicles(catalog.vehicles(), SortMode::Newest);
        assert_eq!(
            ids(&sorted),
            vec![
                "mercedes-s-class-2023",
                "bmw-7-series-2023",
                "audi-a8-2023",
                "mercedes-amg-gt-63-2022",
                "porsche-911-carrera-2023",
                "tesla-model-s-plaid-2023",
                "bmw-i7-2023",
                "audi-e-tron-gt-2023",
            ]
        );
    }

    #[test]
    fn price_orders_use_effective_price() {
        let catalog = Catalog::seed().unwrap();
        let ascending = sort_vehicles(catalog.vehicles(), SortMode::PriceAscending);
        let prices: Vec<u32> = ascending.iter().map(|v| v.effective_price()).collect();
        assert_eq!(
            prices,
            vec![109000, 110000, 122000, 125000, 135000, 140000, 145000, 149000]
        );

        let descending = sort_vehicles(catalog.vehicles(), SortMode::PriceDescending);
        assert_eq!(descending.first().map(|v| v.id.as_str()), Some("mercedes-amg-gt-63-2022"));
        assert_eq!(descending.last().map(|v| v.id.as_str()), Some("bmw-7-series-2023"));
    }

    #[test]
    fn mileage_ties_keep_input_order() {
        let catalog = Catalog::seed().unwrap();
        let sorted = sort_vehicles(catalog.vehicles(), SortMode::MileageAscending);
        // Every vehicle but the used AMG has zero mileage, so they stay in catalog order.
        let mut expected: Vec<&str> = catalog
            .vehicles()
            .iter()
            .filter(|v| v.mileage == 0)
            .map(|v| v.id.as_str())
            .collect();
        expected.push("mercedes-amg-gt-63-2022");
        assert_eq!(ids(&sorted), expected);
    }

    #[test]
    fn input_is_untouched() {
        let catalog = Catalog::seed().unwrap();
        let before = ids(catalog.vehicles()).join(",");
        let _ = sort_vehicles(catalog.vehicles(), SortMode::PriceDescending);
        assert_eq!(ids(catalog.vehicles()).join(","), before);
    }
}
