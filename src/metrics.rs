use serde::Serialize;

use crate::error::{PlanError, Result};
use crate::route::Route;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct RouteMetrics {
    /// Grid steps along the route.
    pub distance: usize,
    pub estimated_time: f64,
    pub constraint_met: bool,
}

/// Travel statistics for `route` at `speed` cells per time unit, checked
/// against `time_budget`. An empty route has no statistics and yields
/// [`PlanError::NoPath`].
pub fn compute_metrics(route: &Route, speed: f64, time_budget: f64) -> Result<RouteMetrics> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(PlanError::InvalidSpeed(speed));
    }
    if route.is_empty() {
        return Err(PlanError::NoPath);
    }
    let distance = route.steps();
    let estimated_time = distance as f64 / speed;
    Ok(RouteMetrics {
        distance,
        estimated_time,
        constraint_met: estimated_time <= time_budget,
    })
}
