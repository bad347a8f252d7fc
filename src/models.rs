// Data structures shared by the catalog, the inventory view and the HTTP layer
// e.g., Vehicle, FilterConfig, SortMode

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Condition {
    New,
    Used,
    #[serde(rename = "Certified Pre-Owned")]
    CertifiedPreOwned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Available,
    Reserved,
    Sold,
    Shipping,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Available, Status::Reserved, Status::Sold, Status::Shipping];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
    #[serde(rename = "Plug-in Hybrid")]
    PlugInHybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transmission {
    Automatic,
    Manual,
    #[serde(rename = "Semi-Automatic")]
    SemiAutomatic,
}

// Descriptive spec sheet, shown as-is in detail and comparison views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specs {
    pub engine: String,
    pub power: String,
    pub acceleration: String,
    pub top_speed: String,
    pub fuel_consumption: String,
    pub co2_emissions: String,
}

// A single vehicle in the dealership catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")] // Match the catalog JSON keys
pub struct Vehicle {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<u32>,
    pub mileage: u32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub condition: Condition,
    pub status: Status,
    pub location: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub specs: Specs,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    pub date_added: NaiveDate,
}

impl Vehicle {
    /// Price used for every price comparison: the discounted price when there is one.
    pub fn effective_price(&self) -> u32 {
        self.discounted_price.unwrap_or(self.price)
    }
}

// A physical dealership site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub country: String,
    pub address: String,
}

/// Narrowing predicates applied to the catalog.
///
/// Empty sets and `None` mean "no restriction". Year and price bounds are inclusive;
/// price bounds apply to [`Vehicle::effective_price`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub brands: BTreeSet<String>,
    pub fuel_types: BTreeSet<FuelType>,
    pub conditions: BTreeSet<Condition>,
    pub transmission: Option<Transmission>,
    pub min_year: u16,
    pub max_year: u16,
    pub min_price: u32,
    pub max_price: u32,
    pub location: Option<String>,
}

/// One field of a [`FilterConfig`] together with its replacement value.
///
/// Arrives over the wire as `{"field": "minPrice", "value": 140000}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FilterField {
    Brands(BTreeSet<String>),
    FuelTypes(BTreeSet<FuelType>),
    Conditions(BTreeSet<Condition>),
    Transmission(Option<Transmission>),
    MinYear(u16),
    MaxYear(u16),
    MinPrice(u32),
    MaxPrice(u32),
    Location(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    Newest,
    PriceAscending,
    PriceDescending,
    MileageAscending,
}
