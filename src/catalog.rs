// The immutable vehicle catalog and everything derived from it: facet lists for the filter
// sidebar, the default filter bounds, detail lookups and the read-only admin views.

use crate::error::CatalogError;
use crate::models::{Condition, FilterConfig, FuelType, Location, Status, Transmission, Vehicle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

const SEED_CATALOG: &str = include_str!("../data/catalog.json");

// Weight applied to reserved vehicles when estimating revenue
const RESERVED_REVENUE_SHARE: f64 = 0.5;

// On-disk shape of a catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    locations: Vec<Location>,
    vehicles: Vec<Vehicle>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
    pub sold: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    vehicles: Vec<Arc<Vehicle>>,
    locations: Vec<Location>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids and discounts that are not below list price.
    pub fn new(vehicles: Vec<Vehicle>, locations: Vec<Location>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for vehicle in &vehicles {
            if !seen.insert(vehicle.id.as_str()) {
                return Err(CatalogError::DuplicateId(vehicle.id.clone()));
            }
            if let Some(discounted) = vehicle.discounted_price {
                if discounted >= vehicle.price {
                    return Err(CatalogError::InvalidDiscount { id: vehicle.id.clone() });
                }
            }
        }

        Ok(Self {
            vehicles: vehicles.into_iter().map(Arc::new).collect(),
            locations,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.vehicles, file.locations)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// The dealership inventory bundled with the binary.
    pub fn seed() -> Result<Self, CatalogError> {
        Self::from_json_str(SEED_CATALOG)
    }

    pub fn vehicles(&self) -> &[Arc<Vehicle>] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn find(&self, id: &str) -> Option<&Arc<Vehicle>> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// The first `n` vehicles in catalog order, for the home page.
    pub fn featured(&self, n: usize) -> Vec<Arc<Vehicle>> {
        self.vehicles.iter().take(n).cloned().collect()
    }

    pub fn brands(&self) -> Vec<String> {
        distinct(self.vehicles.iter().map(|v| v.brand.clone()))
    }

    pub fn fuel_types(&self) -> Vec<FuelType> {
        distinct(self.vehicles.iter().map(|v| v.fuel_type))
    }

    pub fn conditions(&self) -> Vec<Condition> {
        distinct(self.vehicles.iter().map(|v| v.condition))
    }

    pub fn transmissions(&self) -> Vec<Transmission> {
        distinct(self.vehicles.iter().map(|v| v.transmission))
    }

    /// Filters that restrict nothing: empty sets and bounds spanning the observed years and
    /// effective prices. An empty catalog yields zero bounds.
    pub fn default_filters(&self) -> FilterConfig {
        let years = self.vehicles.iter().map(|v| v.year);
        let prices = self.vehicles.iter().map(|v| v.effective_price());

        FilterConfig {
            brands: Default::default(),
            fuel_types: Default::default(),
            conditions: Default::default(),
            transmission: None,
            min_year: years.clone().min().unwrap_or(0),
            max_year: years.max().unwrap_or(0),
            min_price: prices.clone().min().unwrap_or(0),
            max_price: prices.max().unwrap_or(0),
            location: None,
        }
    }

    pub fn status_counts(&self) -> BTreeMap<Status, usize> {
        let mut counts: BTreeMap<Status, usize> = Status::ALL.iter().map(|s| (*s, 0)).collect();
        for vehicle in &self.vehicles {
            *counts.entry(vehicle.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn dashboard(&self) -> DashboardStats {
        let counts = self.status_counts();
        let revenue_for = |status: Status| -> f64 {
            self.vehicles
                .iter()
                .filter(|v| v.status == status)
                .map(|v| f64::from(v.effective_price()))
                .sum()
        };

        DashboardStats {
            total: self.vehicles.len(),
            available: counts[&Status::Available],
            reserved: counts[&Status::Reserved],
            sold: counts[&Status::Sold],
            revenue: revenue_for(Status::Sold) + revenue_for(Status::Reserved) * RESERVED_REVENUE_SHARE,
        }
    }

    /// Admin inventory search: case-insensitive substring match on brand, model or year,
    /// combined with an optional status filter. Keeps catalog order.
    pub fn admin_search(&self, term: &str, status: Option<Status>) -> Vec<Arc<Vehicle>> {
        let term = term.to_lowercase();
        self.vehicles
            .iter()
            .filter(|v| {
                v.brand.to_lowercase().contains(&term)
                    || v.model.to_lowercase().contains(&term)
                    || v.year.to_string().contains(&term)
            })
            .filter(|v| status.is_none_or(|s| v.status == s))
            .cloned()
            .collect()
    }
}

// Distinct values in first-seen order
fn distinct<T: PartialEq>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
