//! Error types for route planning.
//!
//! An unreachable target is not an error: the pathfinder and route planner
//! report it as an empty path. The variants here cover inputs the planner
//! refuses to search with.

use std::fmt::Display;

use thiserror::Error;

use crate::cell::{Bounds, Cell};

/// The part a cell plays in a planning request.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    Start,
    End,
    Waypoint,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Start => "start",
            Role::End => "end",
            Role::Waypoint => "waypoint",
        };
        write!(f, "{name}")
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("{role} {cell} lies outside the {bounds} grid")]
    OutOfBounds { role: Role, cell: Cell, bounds: Bounds },

    #[error("{role} {cell} is an obstacle")]
    Blocked { role: Role, cell: Cell },

    #[error("No path connects the route's stops")]
    NoPath,

    #[error("Robot speed must be a positive number of cells per time unit, got {0}")]
    InvalidSpeed(f64),

    #[error("Layout error: {0}")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
