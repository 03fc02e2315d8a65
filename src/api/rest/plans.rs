use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::engine::capacity::check_stop_capacity;
use crate::error::AppError;
use crate::models::plan::DailyPlan;
use crate::models::site::Site;
use crate::models::stop::{PlannedStop, VisitCategory};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plans", post(create_plan))
        .route("/plans/:id", get(get_plan))
        .route("/plans/by-date/:office_id/:date", get(get_plan_by_date))
        .route(
            "/plans/by-date/:office_id/:date/unassigned",
            get(unassigned_sites),
        )
        .route("/plans/:id/assign", post(assign_site).delete(remove_site))
        .route("/plans/:id/suggest/:engineer_id", get(suggest_order))
        .route("/plans/:id/site-codes", get(assigned_site_codes))
        .route("/plans/:id/publish", post(publish_plan))
}

#[derive(Deserialize)]
pub struct CreatePlanRequest {
    pub office_id: Uuid,
    pub plan_date: NaiveDate,
    pub office_manager_id: Uuid,
}

#[derive(Deserialize)]
pub struct AssignSiteRequest {
    pub engineer_id: Uuid,
    pub site_code: String,
    pub visit_category: VisitCategory,
    #[serde(default)]
    pub priority: String,
}

#[derive(Deserialize)]
pub struct RemoveSiteRequest {
    pub engineer_id: Uuid,
    pub site_code: String,
}

async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<Json<DailyPlan>, AppError> {
    let duplicate = state.plans.iter().any(|entry| {
        entry.office_id == payload.office_id && entry.plan_date == payload.plan_date
    });
    if duplicate {
        return Err(AppError::Conflict(format!(
            "a plan for office {} on {} already exists",
            payload.office_id, payload.plan_date
        )));
    }

    let plan = DailyPlan::create(payload.office_id, payload.plan_date, payload.office_manager_id)?;
    state.plans.insert(plan.id, plan.clone());

    info!(plan_id = %plan.id, office_id = %plan.office_id, plan_date = %plan.plan_date, "daily plan created");
    Ok(Json(plan))
}

async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DailyPlan>, AppError> {
    let plan = state
        .plans
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("plan {} not found", id)))?;

    Ok(Json(plan.value().clone()))
}

async fn get_plan_by_date(
    State(state): State<Arc<AppState>>,
    Path((office_id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<DailyPlan>, AppError> {
    let plan = find_by_office_and_date(&state, office_id, date)?;
    Ok(Json(plan))
}

async fn assign_site(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignSiteRequest>,
) -> Result<Json<DailyPlan>, AppError> {
    let site_key = payload.site_code.trim().to_uppercase();
    let site = state
        .sites
        .get(&site_key)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("site {} not found", site_key)))?;

    let mut plan = state
        .plans
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("plan {} not found", id)))?;

    if let Err(err) = check_stop_capacity(
        &plan,
        payload.engineer_id,
        &site.code,
        state.config.max_stops_per_engineer,
    ) {
        state
            .metrics
            .site_assignments_total
            .with_label_values(&["rejected"])
            .inc();
        return Err(err);
    }

    plan.assign_site_to_engineer(
        payload.engineer_id,
        &site.code,
        site.location,
        payload.visit_category,
        &payload.priority,
    )?;

    // Keep the stored ordering fresh for the engineer that changed.
    plan.suggest_order(payload.engineer_id, state.config.average_speed_kmh)?;

    state
        .metrics
        .site_assignments_total
        .with_label_values(&["success"])
        .inc();

    if let Some(engineer_plan) = plan
        .engineer_plans
        .iter()
        .find(|p| p.engineer_id == payload.engineer_id)
    {
        let utilization =
            engineer_plan.stops.len() as f64 / state.config.max_stops_per_engineer as f64;
        state
            .metrics
            .engineer_utilization
            .with_label_values(&[&payload.engineer_id.to_string()])
            .set(utilization);
    }

    info!(
        plan_id = %id,
        engineer_id = %payload.engineer_id,
        site_code = %site.code,
        "site assigned"
    );

    Ok(Json(plan.clone()))
}

async fn remove_site(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RemoveSiteRequest>,
) -> Result<Json<DailyPlan>, AppError> {
    let mut plan = state
        .plans
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("plan {} not found", id)))?;

    plan.remove_site_from_engineer(payload.engineer_id, &payload.site_code)?;

    info!(
        plan_id = %id,
        engineer_id = %payload.engineer_id,
        site_code = %payload.site_code,
        "site removed"
    );

    Ok(Json(plan.clone()))
}

async fn suggest_order(
    State(state): State<Arc<AppState>>,
    Path((id, engineer_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<PlannedStop>>, AppError> {
    let mut plan = state
        .plans
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("plan {} not found", id)))?;

    let start = Instant::now();
    let ordered = plan.suggest_order(engineer_id, state.config.average_speed_kmh)?;
    state
        .metrics
        .route_suggestion_seconds
        .observe(start.elapsed().as_secs_f64());

    Ok(Json(ordered))
}

async fn assigned_site_codes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<String>>, AppError> {
    let plan = state
        .plans
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("plan {} not found", id)))?;

    Ok(Json(plan.assigned_site_codes()))
}

async fn unassigned_sites(
    State(state): State<Arc<AppState>>,
    Path((office_id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<Vec<Site>>, AppError> {
    let plan = find_by_office_and_date(&state, office_id, date)?;
    let assigned = plan.assigned_site_codes();

    let unassigned = state
        .sites
        .iter()
        .filter(|entry| !assigned.iter().any(|c| c.eq_ignore_ascii_case(entry.key())))
        .map(|entry| entry.value().clone())
        .collect();

    Ok(Json(unassigned))
}

async fn publish_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DailyPlan>, AppError> {
    let mut plan = state
        .plans
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("plan {} not found", id)))?;

    plan.publish()?;
    state.metrics.plans_published_total.inc();

    info!(plan_id = %id, "daily plan published");
    Ok(Json(plan.clone()))
}

fn find_by_office_and_date(
    state: &AppState,
    office_id: Uuid,
    date: NaiveDate,
) -> Result<DailyPlan, AppError> {
    state
        .plans
        .iter()
        .find(|entry| entry.office_id == office_id && entry.plan_date == date)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| {
            AppError::NotFound(format!("no plan for office {} on {}", office_id, date))
        })
}
