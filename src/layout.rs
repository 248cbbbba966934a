//! Plain-text warehouse floors.
//!
//! A layout file holds optional `key = value` settings and `//` comments,
//! followed by a rectangular grid:
//!
//! ```text
//! // aisle with one pickup
//! speed = 2
//! budget = 15
//! S..#....
//! ...#..P.
//! .......E
//! ```
//!
//! `.` is free floor, `#` an obstacle, `S` the robot's start, `E` the
//! delivery point and `P` a pickup point.

use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

use itertools::Itertools;
use pest::Parser;
use pest_derive::Parser;

use crate::cell::{Bounds, Cell};
use crate::error::{PlanError, Result};
use crate::metrics::{RouteMetrics, compute_metrics};
use crate::pathfinder::reachable_from;
use crate::route::{Route, optimize_route};

#[derive(Parser)]
#[grammar = "layout.pest"]
struct LayoutParser;

pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_BUDGET: f64 = 30.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub bounds: Bounds,
    pub obstacles: HashSet<Cell>,
    pub start: Cell,
    pub end: Cell,
    /// Pickup points in row-major order.
    pub pickups: Vec<Cell>,
    /// Robot speed in cells per time unit.
    pub speed: f64,
    pub budget: f64,
}

impl Layout {
    pub fn plan(&self) -> Result<Route> {
        optimize_route(self.start, self.end, &self.pickups, &self.obstacles, self.bounds)
    }

    pub fn metrics(&self, route: &Route) -> Result<RouteMetrics> {
        compute_metrics(route, self.speed, self.budget)
    }

    /// Draws the floor with `*` on route cells that carry no other marking.
    pub fn render(&self, route: &Route) -> String {
        let on_route = route.cells().iter().copied().collect::<HashSet<_>>();
        self.render_with(|c| if on_route.contains(&c) { '*' } else { '.' })
    }

    /// Draws the floor with `o` on free cells the robot can reach from its
    /// start, and lists the required stops it cannot reach.
    pub fn render_reachable(&self) -> Result<String> {
        let reach = reachable_from(self.start, &self.obstacles, self.bounds)?;
        let mut result = self.render_with(|c| if reach.contains_key(&c) { 'o' } else { '.' });
        let unreachable = self
            .pickups
            .iter()
            .chain(std::iter::once(&self.end))
            .filter(|c| !reach.contains_key(*c))
            .collect::<Vec<_>>();
        if !unreachable.is_empty() {
            result.push_str(&format!("unreachable: {}\n", unreachable.iter().join(" ")));
        }
        Ok(result)
    }

    fn render_with<F: Fn(Cell) -> char>(&self, free: F) -> String {
        let mut result = String::with_capacity(self.bounds.area() + self.bounds.rows);
        for row in 0..self.bounds.rows {
            for col in 0..self.bounds.cols {
                let cell = Cell::new(row, col);
                result.push(self.marking(cell).unwrap_or_else(|| free(cell)));
            }
            result.push('\n');
        }
        result
    }

    fn marking(&self, cell: Cell) -> Option<char> {
        if cell == self.start {
            Some('S')
        } else if cell == self.end {
            Some('E')
        } else if self.obstacles.contains(&cell) {
            Some('#')
        } else if self.pickups.contains(&cell) {
            Some('P')
        } else {
            None
        }
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "speed = {}", self.speed)?;
        writeln!(f, "budget = {}", self.budget)?;
        write!(f, "{}", self.render(&Route::empty()))
    }
}

impl FromStr for Layout {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        let parsed = LayoutParser::parse(Rule::layout, s)
            .map_err(|e| PlanError::Layout(e.to_string()))?
            .next()
            .ok_or_else(|| PlanError::Layout("empty layout".to_string()))?;

        let mut speed = DEFAULT_SPEED;
        let mut budget = DEFAULT_BUDGET;
        let mut rows = vec![];
        for pair in parsed.into_inner() {
            match pair.as_rule() {
                Rule::setting => {
                    let mut inner = pair.into_inner();
                    let (Some(key), Some(value)) = (inner.next(), inner.next()) else {
                        continue;
                    };
                    let value = value
                        .as_str()
                        .parse::<f64>()
                        .map_err(|e| PlanError::Layout(format!("{}: {e}", key.as_str())))?;
                    match key.as_str() {
                        "speed" => speed = value,
                        "budget" => budget = value,
                        other => {
                            return Err(PlanError::Layout(format!("unknown setting '{other}'")));
                        }
                    }
                }
                Rule::grid => rows.extend(pair.into_inner().map(|r| r.as_str())),
                _ => {}
            }
        }

        let cols = rows.first().map_or(0, |r| r.len());
        if let Some((i, _)) = rows.iter().find_position(|r| r.len() != cols) {
            return Err(PlanError::Layout(format!(
                "row {i} has {} cells, expected {cols}",
                rows[i].len()
            )));
        }

        let mut obstacles = HashSet::new();
        let mut starts = vec![];
        let mut ends = vec![];
        let mut pickups = vec![];
        for (row, line) in rows.iter().enumerate() {
            for (col, tile) in line.chars().enumerate() {
                let cell = Cell::new(row, col);
                match tile {
                    '#' => {
                        obstacles.insert(cell);
                    }
                    'S' => starts.push(cell),
                    'E' => ends.push(cell),
                    'P' => pickups.push(cell),
                    _ => {}
                }
            }
        }

        Ok(Self {
            bounds: Bounds::new(rows.len(), cols),
            obstacles,
            start: exactly_one("start (S)", starts)?,
            end: exactly_one("end (E)", ends)?,
            pickups,
            speed,
            budget,
        })
    }
}

fn exactly_one(name: &str, found: Vec<Cell>) -> Result<Cell> {
    match found.as_slice() {
        [cell] => Ok(*cell),
        [] => Err(PlanError::Layout(format!("no {name} cell"))),
        many => Err(PlanError::Layout(format!(
            "{} {name} cells: {}",
            many.len(),
            many.iter().join(" ")
        ))),
    }
}
