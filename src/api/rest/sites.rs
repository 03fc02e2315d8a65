use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::site::Site;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sites", post(register_site).get(list_sites))
        .route("/sites/:code", get(get_site))
}

#[derive(Deserialize)]
pub struct RegisterSiteRequest {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

async fn register_site(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterSiteRequest>,
) -> Result<Json<Site>, AppError> {
    let location = GeoPoint::new(payload.lat, payload.lng)?;
    let site = Site::create(&payload.code, &payload.name, location)?;

    state.sites.insert(site.code.clone(), site.clone());

    info!(site_code = %site.code, "site registered");
    Ok(Json(site))
}

async fn list_sites(State(state): State<Arc<AppState>>) -> Json<Vec<Site>> {
    let sites = state
        .sites
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(sites)
}

async fn get_site(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Site>, AppError> {
    let key = code.trim().to_uppercase();
    let site = state
        .sites
        .get(&key)
        .ok_or_else(|| AppError::NotFound(format!("site {} not found", key)))?;

    Ok(Json(site.value().clone()))
}
