//! Route planning for a warehouse robot on a 4-connected grid.
//!
//! [`find_path`] computes a shortest obstacle-free path between two cells
//! with A*. [`optimize_route`] visits a set of pickup points between a start
//! and an end cell, ordering them nearest-first and stitching one path per
//! leg. [`compute_metrics`] turns a route into distance and travel time.
//!
//! Every call is a pure function of its arguments. An unreachable target is
//! reported as an empty path or route; invalid inputs are rejected with a
//! [`PlanError`].

pub mod cell;
pub mod cmd;
pub mod error;
pub mod executor;
pub mod layout;
pub mod metrics;
pub mod pathfinder;
pub mod route;
pub mod search_iter;

pub use cell::{Bounds, Cell, Direction};
pub use error::{PlanError, Result, Role};
pub use executor::RouteExecutor;
pub use layout::Layout;
pub use metrics::{RouteMetrics, compute_metrics};
pub use pathfinder::{Path, SearchLimits, find_path, find_path_within, reachable_from};
pub use route::{Route, optimize_route, optimize_route_within};
