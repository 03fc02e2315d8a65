use uuid::Uuid;

use crate::error::AppError;
use crate::models::plan::DailyPlan;

/// Pre-assignment capacity guard. The limit is office-tunable configuration,
/// so it lives outside the aggregate; every assignment path must run it
/// before mutating the plan. Re-assigning a site the engineer already has
/// never counts against the limit.
pub fn check_stop_capacity(
    plan: &DailyPlan,
    engineer_id: Uuid,
    site_code: &str,
    max_stops: u32,
) -> Result<(), AppError> {
    let Some(engineer_plan) = plan
        .engineer_plans
        .iter()
        .find(|p| p.engineer_id == engineer_id)
    else {
        return Ok(());
    };

    if engineer_plan.has_site(site_code) {
        return Ok(());
    }

    if engineer_plan.stops.len() as u32 >= max_stops {
        return Err(AppError::CapacityExceeded { max: max_stops });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::check_stop_capacity;
    use crate::error::AppError;
    use crate::geo::GeoPoint;
    use crate::models::plan::DailyPlan;
    use crate::models::stop::VisitCategory;

    fn plan_with_stops(engineer: Uuid, count: usize) -> DailyPlan {
        let mut plan = DailyPlan::create(
            Uuid::from_u128(1),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            Uuid::from_u128(2),
        )
        .unwrap();

        for i in 0..count {
            plan.assign_site_to_engineer(
                engineer,
                &format!("CAI-{i:03}"),
                GeoPoint::new(30.0, 31.0 + i as f64 * 0.01).unwrap(),
                VisitCategory::Bm,
                "P3",
            )
            .unwrap();
        }

        plan
    }

    #[test]
    fn engineer_without_a_plan_passes() {
        let plan = plan_with_stops(Uuid::from_u128(3), 0);
        assert!(check_stop_capacity(&plan, Uuid::from_u128(9), "CAI-001", 1).is_ok());
    }

    #[test]
    fn under_the_limit_passes() {
        let engineer = Uuid::from_u128(3);
        let plan = plan_with_stops(engineer, 2);
        assert!(check_stop_capacity(&plan, engineer, "CAI-NEW", 3).is_ok());
    }

    #[test]
    fn at_the_limit_is_rejected() {
        let engineer = Uuid::from_u128(3);
        let plan = plan_with_stops(engineer, 3);
        let err = check_stop_capacity(&plan, engineer, "CAI-NEW", 3).unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded { max: 3 }));
    }

    #[test]
    fn reassigning_an_existing_site_passes_at_the_limit() {
        let engineer = Uuid::from_u128(3);
        let plan = plan_with_stops(engineer, 3);
        assert!(check_stop_capacity(&plan, engineer, "cai-001", 3).is_ok());
    }
}
