//! Suggested visit order for one engineer's day.
//!
//! Stops are split into priority bands processed in a fixed order; priority
//! always beats proximity. Within a band the route is built with a greedy
//! nearest-neighbor walk from the last placed stop. O(n²) over the stop
//! count, which stays in the low tens per engineer.

use crate::geo::GeoPoint;
use crate::models::stop::PlannedStop;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PriorityBand {
    P1,
    P2,
    Normal,
    Bm,
}

const BAND_ORDER: [PriorityBand; 4] = [
    PriorityBand::P1,
    PriorityBand::P2,
    PriorityBand::Normal,
    PriorityBand::Bm,
];

/// Unrecognized priority values fall through to the normal band; only
/// P1, P2 and BM are special.
fn classify(priority: &str) -> PriorityBand {
    if priority.eq_ignore_ascii_case("P1") {
        PriorityBand::P1
    } else if priority.eq_ignore_ascii_case("P2") {
        PriorityBand::P2
    } else if priority.eq_ignore_ascii_case("BM") {
        PriorityBand::Bm
    } else {
        PriorityBand::Normal
    }
}

/// Indices of `stops` in suggested visit order.
///
/// The first band processed has no cursor yet and seeds from its first stop
/// in insertion order; every later pick is the nearest remaining stop in the
/// band, ties broken by insertion order. Deterministic for a given stop set.
pub fn visit_sequence(stops: &[PlannedStop]) -> Vec<usize> {
    let mut sequence = Vec::with_capacity(stops.len());
    let mut cursor: Option<GeoPoint> = None;

    for band in BAND_ORDER {
        let mut remaining: Vec<usize> = (0..stops.len())
            .filter(|&i| classify(&stops[i].priority) == band)
            .collect();

        while !remaining.is_empty() {
            let pick = match cursor {
                None => 0,
                Some(here) => nearest(&here, stops, &remaining),
            };

            let idx = remaining.remove(pick);
            cursor = Some(stops[idx].location);
            sequence.push(idx);
        }
    }

    sequence
}

fn nearest(from: &GeoPoint, stops: &[PlannedStop], remaining: &[usize]) -> usize {
    let mut best = 0;
    let mut best_distance = from.distance_meters(&stops[remaining[0]].location);

    for (pos, &idx) in remaining.iter().enumerate().skip(1) {
        let distance = from.distance_meters(&stops[idx].location);
        if distance < best_distance {
            best = pos;
            best_distance = distance;
        }
    }

    best
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteTotals {
    pub distance_km: f64,
    pub travel_minutes: u32,
}

/// Walks `sequence` and rewrites each stop's 1-based order, leg distance
/// (km, 3 decimals) and leg minutes (half-away-from-zero, zero for a zero
/// leg) in place. Totals re-round the distance sum; minutes sum as-is.
pub fn apply_leg_estimates(
    stops: &mut [PlannedStop],
    sequence: &[usize],
    average_speed_kmh: f64,
) -> RouteTotals {
    let mut total_km = 0.0;
    let mut total_minutes = 0u32;
    let mut previous: Option<GeoPoint> = None;

    for (position, &idx) in sequence.iter().enumerate() {
        let location = stops[idx].location;

        let leg_km = match previous {
            Some(prev) => round_km(prev.distance_meters(&location) / 1000.0),
            None => 0.0,
        };

        let minutes = if leg_km <= 0.0 {
            0
        } else {
            (leg_km / average_speed_kmh * 60.0).round() as u32
        };

        stops[idx].update_routing(position as u32 + 1, leg_km, minutes);
        total_km += leg_km;
        total_minutes += minutes;
        previous = Some(location);
    }

    RouteTotals {
        distance_km: round_km(total_km),
        travel_minutes: total_minutes,
    }
}

fn round_km(km: f64) -> f64 {
    (km * 1000.0).round() / 1000.0
}
