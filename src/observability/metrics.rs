use prometheus::{
    Encoder, GaugeVec, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub site_assignments_total: IntCounterVec,
    pub plans_published_total: IntCounter,
    pub route_suggestion_seconds: Histogram,
    pub engineer_utilization: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let site_assignments_total = IntCounterVec::new(
            Opts::new("site_assignments_total", "Total site assignments by outcome"),
            &["outcome"],
        )
        .expect("valid site_assignments_total metric");

        let plans_published_total =
            IntCounter::new("plans_published_total", "Total daily plans published")
                .expect("valid plans_published_total metric");

        let route_suggestion_seconds = Histogram::with_opts(HistogramOpts::new(
            "route_suggestion_seconds",
            "Latency of route order suggestion in seconds",
        ))
        .expect("valid route_suggestion_seconds metric");

        let engineer_utilization = GaugeVec::new(
            Opts::new(
                "engineer_utilization",
                "Assigned stops over the per-day limit [0..1]",
            ),
            &["engineer_id"],
        )
        .expect("valid engineer_utilization metric");

        registry
            .register(Box::new(site_assignments_total.clone()))
            .expect("register site_assignments_total");
        registry
            .register(Box::new(plans_published_total.clone()))
            .expect("register plans_published_total");
        registry
            .register(Box::new(route_suggestion_seconds.clone()))
            .expect("register route_suggestion_seconds");
        registry
            .register(Box::new(engineer_utilization.clone()))
            .expect("register engineer_utilization");

        Self {
            registry,
            site_assignments_total,
            plans_published_total,
            route_suggestion_seconds,
            engineer_utilization,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
