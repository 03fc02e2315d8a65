use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::routing;
use crate::error::AppError;
use crate::geo::GeoPoint;
use crate::models::stop::{PlannedStop, VisitCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Draft,
    Published,
    InProgress,
    Completed,
}

impl PlanStatus {
    /// Stop assignment is only allowed while the plan is a draft.
    pub fn is_modifiable(self) -> bool {
        matches!(self, PlanStatus::Draft)
    }

    /// The full lifecycle table. Only `Draft -> Published` is reachable
    /// through this service; the execution subsystem drives the rest.
    pub fn can_transition_to(self, next: PlanStatus) -> bool {
        matches!(
            (self, next),
            (PlanStatus::Draft, PlanStatus::Published)
                | (PlanStatus::Published, PlanStatus::InProgress)
                | (PlanStatus::InProgress, PlanStatus::Completed)
        )
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlanStatus::Draft => "Draft",
            PlanStatus::Published => "Published",
            PlanStatus::InProgress => "InProgress",
            PlanStatus::Completed => "Completed",
        };
        f.write_str(name)
    }
}

/// One engineer's stop list for the day, with the route totals computed by
/// the last `suggest_order` run. Created lazily on first assignment.
#[derive(Debug, Clone, Serialize)]
pub struct EngineerDayPlan {
    pub engineer_id: Uuid,
    pub stops: Vec<PlannedStop>,
    pub total_estimated_distance_km: f64,
    pub total_estimated_travel_minutes: u32,
}

impl EngineerDayPlan {
    pub fn create(engineer_id: Uuid) -> Result<Self, AppError> {
        if engineer_id.is_nil() {
            return Err(AppError::InvalidArgument("engineer id is required".to_string()));
        }

        Ok(Self {
            engineer_id,
            stops: Vec::new(),
            total_estimated_distance_km: 0.0,
            total_estimated_travel_minutes: 0,
        })
    }

    /// Appends a stop unless the site is already on this engineer's list
    /// (case-insensitive); duplicates are a silent no-op.
    pub fn add_stop(
        &mut self,
        site_code: &str,
        location: GeoPoint,
        visit_category: VisitCategory,
        priority: &str,
    ) -> Result<(), AppError> {
        if self.has_site(site_code) {
            return Ok(());
        }

        self.stops
            .push(PlannedStop::create(site_code, location, visit_category, priority)?);
        Ok(())
    }

    /// Removes the matching stop if present; absent is a no-op.
    pub fn remove_stop(&mut self, site_code: &str) {
        let code = site_code.trim();
        self.stops.retain(|s| !s.site_code.eq_ignore_ascii_case(code));
    }

    pub fn has_site(&self, site_code: &str) -> bool {
        let code = site_code.trim();
        self.stops.iter().any(|s| s.site_code.eq_ignore_ascii_case(code))
    }

    /// Recomputes the suggested visit order, rewriting every stop's routing
    /// fields and the plan totals, and returns the stops in visit order.
    pub fn suggest_order(&mut self, average_speed_kmh: f64) -> Result<Vec<PlannedStop>, AppError> {
        if average_speed_kmh <= 0.0 {
            return Err(AppError::InvalidArgument(
                "average speed must be greater than zero".to_string(),
            ));
        }

        if self.stops.is_empty() {
            return Ok(Vec::new());
        }

        let sequence = routing::visit_sequence(&self.stops);
        let totals = routing::apply_leg_estimates(&mut self.stops, &sequence, average_speed_kmh);
        self.total_estimated_distance_km = totals.distance_km;
        self.total_estimated_travel_minutes = totals.travel_minutes;

        let mut ordered = self.stops.clone();
        ordered.sort_by_key(|s| s.order);
        Ok(ordered)
    }
}

/// Aggregate root: one plan per office per day. Owns every engineer plan
/// and enforces that a site sits on at most one engineer's list.
#[derive(Debug, Clone, Serialize)]
pub struct DailyPlan {
    pub id: Uuid,
    pub office_id: Uuid,
    pub plan_date: NaiveDate,
    pub office_manager_id: Uuid,
    pub status: PlanStatus,
    pub engineer_plans: Vec<EngineerDayPlan>,
}

impl DailyPlan {
    pub fn create(
        office_id: Uuid,
        plan_date: NaiveDate,
        office_manager_id: Uuid,
    ) -> Result<Self, AppError> {
        if office_id.is_nil() {
            return Err(AppError::InvalidArgument("office id is required".to_string()));
        }

        if office_manager_id.is_nil() {
            return Err(AppError::InvalidArgument(
                "office manager id is required".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            office_id,
            plan_date,
            office_manager_id,
            status: PlanStatus::Draft,
            engineer_plans: Vec::new(),
        })
    }

    pub fn assign_site_to_engineer(
        &mut self,
        engineer_id: Uuid,
        site_code: &str,
        site_location: GeoPoint,
        visit_category: VisitCategory,
        priority: &str,
    ) -> Result<(), AppError> {
        self.ensure_modifiable()?;

        if engineer_id.is_nil() {
            return Err(AppError::InvalidArgument("engineer id is required".to_string()));
        }

        if site_code.trim().is_empty() {
            return Err(AppError::InvalidArgument("site code is required".to_string()));
        }

        // Reassignment support: a site belongs to exactly one engineer.
        for plan in &mut self.engineer_plans {
            plan.remove_stop(site_code);
        }

        let idx = match self
            .engineer_plans
            .iter()
            .position(|p| p.engineer_id == engineer_id)
        {
            Some(idx) => idx,
            None => {
                self.engineer_plans.push(EngineerDayPlan::create(engineer_id)?);
                self.engineer_plans.len() - 1
            }
        };

        self.engineer_plans[idx].add_stop(site_code, site_location, visit_category, priority)
    }

    pub fn remove_site_from_engineer(
        &mut self,
        engineer_id: Uuid,
        site_code: &str,
    ) -> Result<(), AppError> {
        self.ensure_modifiable()?;

        if let Some(plan) = self
            .engineer_plans
            .iter_mut()
            .find(|p| p.engineer_id == engineer_id)
        {
            plan.remove_stop(site_code);
        }

        Ok(())
    }

    /// Recompute the suggested route for one engineer. Deliberately not
    /// gated on `Draft`: published plans may still be re-ordered for
    /// display, only the stop set is frozen.
    pub fn suggest_order(
        &mut self,
        engineer_id: Uuid,
        average_speed_kmh: f64,
    ) -> Result<Vec<PlannedStop>, AppError> {
        if average_speed_kmh <= 0.0 {
            return Err(AppError::InvalidArgument(
                "average speed must be greater than zero".to_string(),
            ));
        }

        match self
            .engineer_plans
            .iter_mut()
            .find(|p| p.engineer_id == engineer_id)
        {
            Some(plan) => plan.suggest_order(average_speed_kmh),
            None => Ok(Vec::new()),
        }
    }

    /// Distinct site codes across every engineer's list, first-seen order.
    pub fn assigned_site_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = Vec::new();
        for plan in &self.engineer_plans {
            for stop in &plan.stops {
                if !codes.iter().any(|c| c.eq_ignore_ascii_case(&stop.site_code)) {
                    codes.push(stop.site_code.clone());
                }
            }
        }
        codes
    }

    pub fn publish(&mut self) -> Result<(), AppError> {
        if !self.status.can_transition_to(PlanStatus::Published) {
            return Err(AppError::InvalidTransition(format!(
                "cannot publish a plan in {} status",
                self.status
            )));
        }

        self.status = PlanStatus::Published;
        Ok(())
    }

    fn ensure_modifiable(&self) -> Result<(), AppError> {
        if !self.status.is_modifiable() {
            return Err(AppError::InvalidTransition(format!(
                "a plan in {} status cannot be modified",
                self.status
            )));
        }
        Ok(())
    }
}
