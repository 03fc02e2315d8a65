use dashmap::DashMap;
use uuid::Uuid;

use crate::config::Config;
use crate::models::plan::DailyPlan;
use crate::models::site::Site;
use crate::observability::metrics::Metrics;

/// In-memory store shared across handlers. Plans are keyed by id; sites by
/// their normalized code. Each plan entry is one consistency boundary, so a
/// handler takes one `get_mut` for the whole load-mutate-store cycle.
pub struct AppState {
    pub plans: DashMap<Uuid, DailyPlan>,
    pub sites: DashMap<String, Site>,
    pub config: Config,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            plans: DashMap::new(),
            sites: DashMap::new(),
            config,
            metrics: Metrics::new(),
        }
    }
}
