// Handlers for the catalog, inventory and compare endpoints

use axum::{
    extract::{FromRequest, Path, State},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::SharedSession;
use crate::{
    error::AppError,
    models::{Condition, FilterConfig, FilterField, FuelType, Location, SortMode, Transmission, Vehicle},
    session::Session,
};

const FEATURED_COUNT: usize = 3;

// --- Response Wrappers ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    vehicles: Vec<Arc<Vehicle>>,
    total: usize,
    filters: FilterConfig,
    sort_mode: SortMode,
    active_location: Option<String>,
}

impl InventoryView {
    fn from_session(session: &Session) -> Self {
        let inventory = session.inventory();
        Self {
            vehicles: inventory.result().to_vec(),
            total: inventory.result().len(),
            filters: inventory.filters().clone(),
            sort_mode: inventory.sort_mode(),
            active_location: inventory.active_location().map(str::to_string),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareView {
    vehicles: Vec<Arc<Vehicle>>,
    ids: Vec<String>,
    size: usize,
}

impl CompareView {
    fn from_session(session: &Session) -> Self {
        let compare = session.compare();
        Self {
            vehicles: compare.vehicles(),
            ids: compare.ids(),
            size: compare.len(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FacetsResponse {
    brands: Vec<String>,
    fuel_types: Vec<FuelType>,
    conditions: Vec<Condition>,
    transmissions: Vec<Transmission>,
    locations: Vec<Location>,
    defaults: FilterConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VehicleDetail {
    vehicle: Arc<Vehicle>,
    in_compare: bool,
}

// --- Request Structs ---

// JSON body whose decoding failures come back as `AppError::BadRequest`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SortRequest {
    sort_mode: SortMode,
}

#[derive(Deserialize, Debug)]
pub struct LocationRequest {
    location: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CompareRequest {
    id: String,
}

// --- Catalog Handlers ---

pub async fn get_facets(State(session): State<SharedSession>) -> Result<impl IntoResponse, AppError> {
    let session = session.read().await;
    let catalog = session.catalog();
    Ok(Json(FacetsResponse {
        brands: catalog.brands(),
        fuel_types: catalog.fuel_types(),
        conditions: catalog.conditions(),
        transmissions: catalog.transmissions(),
        locations: catalog.locations().to_vec(),
        defaults: catalog.default_filters(),
    }))
}

pub async fn get_featured(State(session): State<SharedSession>) -> Result<impl IntoResponse, AppError> {
    let session = session.read().await;
    Ok(Json(session.catalog().featured(FEATURED_COUNT)))
}

pub async fn get_vehicle(
    State(session): State<SharedSession>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = session.read().await;
    let vehicle = session
        .catalog()
        .find(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Vehicle '{}' not found", id)))?;
    Ok(Json(VehicleDetail {
        in_compare: session.compare().contains(&id),
        vehicle,
    }))
}

// --- Inventory Handlers ---

pub async fn get_inventory(State(session): State<SharedSession>) -> Result<impl IntoResponse, AppError> {
    let session = session.read().await;
    Ok(Json(InventoryView::from_session(&session)))
}

pub async fn set_filter(
    State(session): State<SharedSession>,
    JsonBody(field): JsonBody<FilterField>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: set_filter {:?}", field);
    let mut session = session.write().await;
    session.set_filter_field(field);
    Ok(Json(InventoryView::from_session(&session)))
}

pub async fn reset_filters(State(session): State<SharedSession>) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: reset_filters");
    let mut session = session.write().await;
    session.reset_filters();
    Ok(Json(InventoryView::from_session(&session)))
}

pub async fn set_sort_mode(
    State(session): State<SharedSession>,
    JsonBody(request): JsonBody<SortRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: set_sort_mode {:?}", request.sort_mode);
    let mut session = session.write().await;
    session.set_sort_mode(request.sort_mode);
    Ok(Json(InventoryView::from_session(&session)))
}

// Navigation signal: the caller has already pulled the location out of its URL
pub async fn set_location(
    State(session): State<SharedSession>,
    JsonBody(request): JsonBody<LocationRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: set_location {:?}", request.location);
    let mut session = session.write().await;
    session.set_active_location(request.location);
    Ok(Json(InventoryView::from_session(&session)))
}

// --- Compare Handlers ---

pub async fn get_compare(State(session): State<SharedSession>) -> Result<impl IntoResponse, AppError> {
    let session = session.read().await;
    Ok(Json(CompareView::from_session(&session)))
}

pub async fn add_to_compare(
    State(session): State<SharedSession>,
    JsonBody(request): JsonBody<CompareRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: add_to_compare {}", request.id);
    let mut session = session.write().await;
    let vehicle = session
        .catalog()
        .find(&request.id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Vehicle '{}' not found", request.id)))?;
    session.add_to_compare(vehicle);
    Ok(Json(CompareView::from_session(&session)))
}

pub async fn remove_from_compare(
    State(session): State<SharedSession>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: remove_from_compare {}", id);
    let mut session = session.write().await;
    session.remove_from_compare(&id);
    Ok(Json(CompareView::from_session(&session)))
}

pub async fn clear_compare(State(session): State<SharedSession>) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: clear_compare");
    let mut session = session.write().await;
    session.clear_compare();
    Ok(Json(CompareView::from_session(&session)))
}
