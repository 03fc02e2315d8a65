use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::GeoPoint;

/// Priority assigned to a stop when the dispatcher leaves it blank.
pub const DEFAULT_PRIORITY: &str = "P3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitCategory {
    Bm,
    Cm,
    Emergency,
    Installation,
    Upgrade,
    Inspection,
    Commissioning,
    Audit,
}

/// One site visit on one engineer's day. The routing fields (`order`,
/// `distance_from_previous_km`, `estimated_travel_minutes`) are rewritten
/// in place each time the owning plan recomputes its route.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStop {
    pub id: Uuid,
    pub order: u32,
    pub site_code: String,
    pub location: GeoPoint,
    pub visit_category: VisitCategory,
    pub priority: String,
    pub distance_from_previous_km: f64,
    pub estimated_travel_minutes: u32,
}

impl PlannedStop {
    pub fn create(
        site_code: &str,
        location: GeoPoint,
        visit_category: VisitCategory,
        priority: &str,
    ) -> Result<Self, AppError> {
        let site_code = site_code.trim();
        if site_code.is_empty() {
            return Err(AppError::InvalidArgument("site code is required".to_string()));
        }

        let priority = priority.trim();
        let priority = if priority.is_empty() {
            DEFAULT_PRIORITY.to_string()
        } else {
            priority.to_uppercase()
        };

        Ok(Self {
            id: Uuid::new_v4(),
            order: 0,
            site_code: site_code.to_uppercase(),
            location,
            visit_category,
            priority,
            distance_from_previous_km: 0.0,
            estimated_travel_minutes: 0,
        })
    }

    pub fn update_routing(
        &mut self,
        order: u32,
        distance_from_previous_km: f64,
        estimated_travel_minutes: u32,
    ) {
        self.order = order;
        self.distance_from_previous_km = distance_from_previous_km;
        self.estimated_travel_minutes = estimated_travel_minutes;
    }
}
