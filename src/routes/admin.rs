// Read-only admin views over the catalog. Access control sits in front of this service.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::SharedSession;
use crate::{
    catalog::DashboardStats,
    error::AppError,
    models::Status,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResponse {
    stats: DashboardStats,
    status_counts: BTreeMap<Status, usize>,
}

#[derive(Deserialize, Debug)]
pub struct InventorySearchQuery {
    search: Option<String>,
    // A status label, or "All"
    status: Option<String>,
}

pub async fn get_dashboard(State(session): State<SharedSession>) -> Result<impl IntoResponse, AppError> {
    let session = session.read().await;
    let catalog = session.catalog();
    Ok(Json(DashboardResponse {
        stats: catalog.dashboard(),
        status_counts: catalog.status_counts(),
    }))
}

pub async fn search_inventory(
    State(session): State<SharedSession>,
    Query(query): Query<InventorySearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("API call: admin search_inventory {:?}", query);
    let status = parse_status(query.status.as_deref())?;
    let session = session.read().await;
    let vehicles = session
        .catalog()
        .admin_search(query.search.as_deref().unwrap_or(""), status);
    Ok(Json(vehicles))
}

fn parse_status(raw: Option<&str>) -> Result<Option<Status>, AppError> {
    match raw {
        None | Some("") | Some("All") => Ok(None),
        Some(label) => serde_json::from_value(Value::String(label.to_string()))
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Unknown status '{}'", label))),
    }
}
