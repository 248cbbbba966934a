//! Multi-stop routes.
//!
//! Waypoints are ordered greedily: from the robot's current cell the next
//! stop is the unvisited waypoint nearest by Manhattan distance, ties going
//! to the waypoint listed first. The resulting tour is not guaranteed to be
//! the shortest one.

use std::collections::HashSet;

use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;

use crate::cell::{Bounds, Cell};
use crate::error::{Result, Role};
use crate::pathfinder::{Path, SearchLimits, check_cell, search};

/// A full journey from start through every waypoint to the end.
///
/// An empty route means at least one leg had no path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Route {
    path: Path,
    visit_order: Vec<Cell>,
    leg_steps: Vec<usize>,
}

impl Route {
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_legs(visit_order: Vec<Cell>, legs: &[Path]) -> Self {
        let mut path = Path::empty();
        for leg in legs {
            path.extend_with(leg);
        }
        Self {
            path,
            visit_order,
            leg_steps: legs.iter().map(Path::steps).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cells(&self) -> &[Cell] {
        self.path.cells()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn steps(&self) -> usize {
        self.path.steps()
    }

    /// Waypoints in the order the robot reaches them.
    pub fn visit_order(&self) -> &[Cell] {
        &self.visit_order
    }

    /// Steps of each leg, the final leg to the end included.
    pub fn leg_steps(&self) -> &[usize] {
        &self.leg_steps
    }
}

impl From<Route> for Path {
    fn from(route: Route) -> Self {
        route.path
    }
}

/// Plans a route from `start` through all `waypoints` to `end`.
///
/// Repeated waypoints are visited once. Inputs outside `bounds` or on an
/// obstacle are rejected; an unreachable stop yields an empty route.
pub fn optimize_route(
    start: Cell,
    end: Cell,
    waypoints: &[Cell],
    obstacles: &HashSet<Cell>,
    bounds: Bounds,
) -> Result<Route> {
    optimize_route_within(start, end, waypoints, obstacles, bounds, SearchLimits::default())
}

/// [`optimize_route`] with a budget applied to each leg's search.
pub fn optimize_route_within(
    start: Cell,
    end: Cell,
    waypoints: &[Cell],
    obstacles: &HashSet<Cell>,
    bounds: Bounds,
    limits: SearchLimits,
) -> Result<Route> {
    check_cell(Role::Start, start, obstacles, bounds)?;
    check_cell(Role::End, end, obstacles, bounds)?;
    for waypoint in waypoints {
        check_cell(Role::Waypoint, *waypoint, obstacles, bounds)?;
    }

    let mut unvisited = waypoints.iter().copied().unique().collect::<Vec<_>>();
    let mut visit_order = Vec::with_capacity(unvisited.len());
    let mut legs = Vec::with_capacity(unvisited.len() + 1);
    let mut current = start;

    while let Some(i) = unvisited
        .iter()
        .enumerate()
        .min_by_key(|(_, w)| current.manhattan_distance(**w))
        .map(|(i, _)| i)
    {
        let next = unvisited.remove(i);
        let Some(leg) = plan_leg(current, next, obstacles, bounds, limits) else {
            return Ok(Route::empty());
        };
        legs.push(leg);
        visit_order.push(next);
        current = next;
    }

    let Some(leg) = plan_leg(current, end, obstacles, bounds, limits) else {
        return Ok(Route::empty());
    };
    legs.push(leg);

    let route = Route::from_legs(visit_order, &legs);
    debug!(
        "Route {start} -> {end} via {} waypoints: {} steps in {} legs",
        route.visit_order.len(),
        route.steps(),
        legs.len()
    );
    Ok(route)
}

fn plan_leg(
    from: Cell,
    to: Cell,
    obstacles: &HashSet<Cell>,
    bounds: Bounds,
    limits: SearchLimits,
) -> Option<Path> {
    let leg = search(from, to, obstacles, bounds, limits);
    if leg.is_empty() {
        warn!("No path from {from} to {to}; abandoning route");
        None
    } else {
        debug!("Leg {from} -> {to}: {} steps", leg.steps());
        Some(leg)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Route, optimize_route, optimize_route_within};
    use crate::cell::{Bounds, Cell};
    use crate::error::{PlanError, Role};
    use crate::pathfinder::{SearchLimits, find_path};

    fn cells(coords: &[(usize, usize)]) -> Vec<Cell> {
        coords.iter().map(|c| Cell::from(*c)).collect()
    }

    #[test]
    fn test_single_waypoint_on_line() {
        let route = optimize_route(
            Cell::new(0, 0),
            Cell::new(0, 4),
            &[Cell::new(0, 2)],
            &HashSet::new(),
            Bounds::new(10, 15),
        )
        .unwrap();
        assert_eq!(route.cells(), cells(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]).as_slice());
        assert_eq!(route.steps(), 4);
        assert_eq!(route.visit_order(), &[Cell::new(0, 2)]);
        assert_eq!(route.leg_steps(), &[2, 2]);
    }

    #[test]
    fn test_no_waypoints_matches_find_path() {
        let obstacles = (0..=8).map(|row| Cell::new(row, 5)).collect::<HashSet<_>>();
        let bounds = Bounds::new(10, 15);
        let (start, end) = (Cell::new(0, 0), Cell::new(0, 10));
        let route = optimize_route(start, end, &[], &obstacles, bounds).unwrap();
        let path = find_path(start, end, &obstacles, bounds).unwrap();
        assert_eq!(route.path(), &path);
        assert_eq!(route.steps(), 28);
        assert!(route.visit_order().is_empty());
    }

    #[test]
    fn test_nearest_first() {
        let waypoints = cells(&[(0, 9), (0, 3), (5, 3)]);
        let bounds = Bounds::new(10, 10);
        let route =
            optimize_route(Cell::new(0, 0), Cell::new(9, 9), &waypoints, &HashSet::new(), bounds)
                .unwrap();
        assert_eq!(route.visit_order(), cells(&[(0, 3), (5, 3), (0, 9)]).as_slice());
        assert_eq!(route.steps(), 3 + 5 + 11 + 9);
    }

    #[test]
    fn test_tie_goes_to_first_listed() {
        let waypoints = cells(&[(0, 2), (2, 0)]);
        let bounds = Bounds::new(3, 3);
        let route =
            optimize_route(Cell::new(0, 0), Cell::new(0, 0), &waypoints, &HashSet::new(), bounds)
                .unwrap();
        assert_eq!(route.visit_order(), waypoints.as_slice());
        assert_eq!(route.cells().first(), Some(&Cell::new(0, 0)));
        assert_eq!(route.cells().last(), Some(&Cell::new(0, 0)));
        assert_eq!(route.steps(), 8);
    }

    #[test]
    fn test_every_waypoint_once_and_legs_sum() {
        let obstacles = cells(&[(1, 1), (1, 2), (1, 3), (3, 2), (3, 3), (3, 4)])
            .into_iter()
            .collect::<HashSet<_>>();
        let waypoints = cells(&[(4, 4), (0, 4), (2, 2), (4, 0), (2, 2)]);
        let bounds = Bounds::new(5, 5);
        let (start, end) = (Cell::new(0, 0), Cell::new(4, 2));
        let route = optimize_route(start, end, &waypoints, &obstacles, bounds).unwrap();
        assert!(!route.is_empty());
        assert!(route.path().is_connected());
        assert!(route.path().avoids(&obstacles));
        assert_eq!(route.visit_order().len(), 4);
        for w in waypoints.iter() {
            assert_eq!(route.visit_order().iter().filter(|v| *v == w).count(), 1);
            assert!(route.cells().contains(w));
        }
        assert_eq!(route.steps(), route.leg_steps().iter().sum::<usize>());
        assert_eq!(route.len(), route.steps() + 1);
    }

    #[test]
    fn test_unreachable_waypoint_fails_whole_route() {
        // (2,2) is boxed in.
        let obstacles =
            cells(&[(1, 2), (3, 2), (2, 1), (2, 3)]).into_iter().collect::<HashSet<_>>();
        let route = optimize_route(
            Cell::new(0, 0),
            Cell::new(4, 4),
            &cells(&[(0, 4), (2, 2)]),
            &obstacles,
            Bounds::new(5, 5),
        )
        .unwrap();
        assert_eq!(route, Route::empty());
        assert!(route.leg_steps().is_empty());
    }

    #[test]
    fn test_unreachable_end_fails_whole_route() {
        let obstacles = cells(&[(1, 0), (1, 1), (1, 2)]).into_iter().collect::<HashSet<_>>();
        let waypoints = [Cell::new(0, 2)];
        let bounds = Bounds::new(3, 3);
        let (start, end) = (Cell::new(0, 0), Cell::new(2, 2));
        let route = optimize_route(start, end, &waypoints, &obstacles, bounds).unwrap();
        assert!(route.is_empty());
    }

    #[test]
    fn test_conflicting_roles() {
        let obstacles = cells(&[(1, 1)]).into_iter().collect::<HashSet<_>>();
        let bounds = Bounds::new(3, 3);
        let (start, end) = (Cell::new(0, 0), Cell::new(2, 2));
        assert_eq!(
            optimize_route(start, end, &[Cell::new(1, 1)], &obstacles, bounds),
            Err(PlanError::Blocked { role: Role::Waypoint, cell: Cell::new(1, 1) })
        );
        assert_eq!(
            optimize_route(start, end, &[Cell::new(5, 1)], &obstacles, bounds),
            Err(PlanError::OutOfBounds { role: Role::Waypoint, cell: Cell::new(5, 1), bounds })
        );
        assert!(matches!(
            optimize_route(Cell::new(1, 1), Cell::new(2, 2), &[], &obstacles, bounds),
            Err(PlanError::Blocked { role: Role::Start, .. })
        ));
    }

    #[test]
    fn test_budget_applies_to_every_leg() {
        let obstacles = (0..=8).map(|row| Cell::new(row, 5)).collect::<HashSet<_>>();
        let bounds = Bounds::new(10, 15);
        let (start, end) = (Cell::new(0, 0), Cell::new(0, 10));
        let waypoints = [Cell::new(0, 2)];

        // The first leg fits in 5 expansions; the detour around the wall does not.
        let tight = SearchLimits::new().with_max_expansions(5);
        let starved =
            optimize_route_within(start, end, &waypoints, &obstacles, bounds, tight).unwrap();
        assert_eq!(starved, Route::empty());

        let ample = SearchLimits::new().with_max_expansions(150);
        let roomy =
            optimize_route_within(start, end, &waypoints, &obstacles, bounds, ample).unwrap();
        let unlimited = optimize_route(start, end, &waypoints, &obstacles, bounds).unwrap();
        assert_eq!(roomy, unlimited);
        assert_eq!(roomy.visit_order(), &waypoints);
        assert_eq!(roomy.leg_steps(), &[2, 26]);
    }

    #[test]
    fn test_deterministic() {
        let obstacles =
            cells(&[(2, 1), (2, 2), (2, 3), (5, 4)]).into_iter().collect::<HashSet<_>>();
        let waypoints = cells(&[(4, 4), (0, 6), (6, 0), (3, 3)]);
        let bounds = Bounds::new(7, 7);
        let (start, end) = (Cell::new(0, 0), Cell::new(6, 6));
        let plan = || optimize_route(start, end, &waypoints, &obstacles, bounds).unwrap();
        let first = plan();
        for _ in 0..10 {
            assert_eq!(plan(), first);
        }
    }
}
