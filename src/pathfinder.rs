//! Shortest paths on a 4-connected warehouse grid.
//!
//! Searches run A* with the Manhattan distance as heuristic and a uniform
//! step cost of 1, which makes every returned path a shortest one. Among
//! several shortest paths the result is fixed by two orders: neighbors are
//! generated up, down, left, right, and frontier entries with equal
//! estimated totals are expanded in the order they were queued.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::cell::{Bounds, Cell};
use crate::error::{PlanError, Result, Role};
use crate::search_iter::{BfsIter, PrioritySearchIter};

/// An ordered run of adjacent cells. The empty path means no path exists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Grid steps walked along the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    pub fn is_connected(&self) -> bool {
        self.cells.windows(2).all(|w| w[0].is_adjacent(w[1]))
    }

    pub fn avoids(&self, obstacles: &HashSet<Cell>) -> bool {
        self.cells.iter().all(|c| !obstacles.contains(c))
    }

    /// Appends `leg`, which must begin where this path ends. The shared
    /// junction cell is kept once.
    pub(crate) fn extend_with(&mut self, leg: &Path) {
        let skip = match (self.end(), leg.start()) {
            (Some(end), Some(start)) if end == start => 1,
            _ => 0,
        };
        self.cells.extend(leg.cells.iter().skip(skip).copied());
    }
}

impl From<Vec<Cell>> for Path {
    fn from(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// Optional bounds on a single search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Node expansions allowed before the search gives up and reports no
    /// path. `None` searches until the frontier is exhausted.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }
}

/// Shortest obstacle-free path from `start` to `end`.
///
/// Returns `Ok` with an empty path when `end` cannot be reached, and an error
/// when either endpoint is outside `bounds` or on an obstacle.
pub fn find_path(
    start: Cell,
    end: Cell,
    obstacles: &HashSet<Cell>,
    bounds: Bounds,
) -> Result<Path> {
    find_path_within(start, end, obstacles, bounds, SearchLimits::default())
}

/// [`find_path`] with a search budget. A search that runs out of budget
/// reports no path.
pub fn find_path_within(
    start: Cell,
    end: Cell,
    obstacles: &HashSet<Cell>,
    bounds: Bounds,
    limits: SearchLimits,
) -> Result<Path> {
    check_cell(Role::Start, start, obstacles, bounds)?;
    check_cell(Role::End, end, obstacles, bounds)?;
    Ok(search(start, end, obstacles, bounds, limits))
}

/// Step distance from `start` to every cell reachable from it, `start`
/// included at distance 0.
pub fn reachable_from(
    start: Cell,
    obstacles: &HashSet<Cell>,
    bounds: Bounds,
) -> Result<HashMap<Cell, usize>> {
    check_cell(Role::Start, start, obstacles, bounds)?;
    let mut searcher = BfsIter::new(start, |c: &Cell| free_neighbors(*c, obstacles, bounds));
    searcher.by_ref().for_each(drop);
    Ok(searcher.all_depths())
}

pub(crate) fn check_cell(
    role: Role,
    cell: Cell,
    obstacles: &HashSet<Cell>,
    bounds: Bounds,
) -> Result<()> {
    if !bounds.contains(cell) {
        Err(PlanError::OutOfBounds { role, cell, bounds })
    } else if obstacles.contains(&cell) {
        Err(PlanError::Blocked { role, cell })
    } else {
        Ok(())
    }
}

/// A* between two already validated cells.
pub(crate) fn search(
    start: Cell,
    end: Cell,
    obstacles: &HashSet<Cell>,
    bounds: Bounds,
    limits: SearchLimits,
) -> Path {
    if start == end {
        return Path::from(vec![start]);
    }
    let mut searcher = PrioritySearchIter::a_star(
        start,
        |c: &Cell| {
            free_neighbors(*c, obstacles, bounds)
                .into_iter()
                .map(|n| (n, 1_usize))
                .collect()
        },
        |c: &Cell| c.manhattan_distance(end),
    );
    let budget = limits.max_expansions.unwrap_or(usize::MAX);
    let found = searcher.by_ref().take(budget).any(|c| c == end);
    debug!(
        "A* {start} -> {end}: {} after {} expansions",
        if found { "found" } else { "no path" },
        searcher.expanded()
    );
    if !found {
        return Path::empty();
    }
    searcher
        .path_to(&end)
        .map(|cells| Path::from(Vec::from(cells)))
        .unwrap_or_default()
}

fn free_neighbors(cell: Cell, obstacles: &HashSet<Cell>, bounds: Bounds) -> Vec<Cell> {
    cell.manhattan_neighbors(bounds)
        .filter(|n| !obstacles.contains(n))
        .collect()
}
