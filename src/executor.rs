use std::collections::VecDeque;
use std::time::Duration;

use crossbeam::atomic::AtomicCell;
use itertools::Itertools;
use log::info;
use smol::Timer;

use crate::cell::Cell;
use crate::error::{PlanError, Result};
use crate::route::Route;

/// Walks a planned route one cell at a time. The executor keeps its own
/// copy of the cells, so the route itself is never touched.
pub struct RouteExecutor {
    path: VecDeque<Cell>,
    visited: usize,
}

impl RouteExecutor {
    pub fn new(route: &Route) -> Self {
        Self {
            path: route.cells().iter().copied().collect(),
            visited: 0,
        }
    }

    /// The cell the robot should move to next.
    pub fn waypoint(&self) -> Option<Cell> {
        self.path.front().copied()
    }

    pub fn advance(&mut self) {
        if self.path.pop_front().is_some() {
            self.visited += 1;
        }
    }

    pub fn remaining(&self) -> usize {
        self.path.len()
    }

    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn goal(&self) -> Option<Cell> {
        self.path.back().copied()
    }

    pub fn full_path_copy(&self) -> String {
        format!("[{}]", self.path.iter().join(","))
    }

    /// Calls `on_step` with each remaining cell and its index in the route,
    /// pausing `1 / speed` seconds between cells. Stops before the next step
    /// once `running` is cleared; returns whether the route was finished.
    pub async fn play<F: FnMut(usize, Cell)>(
        &mut self,
        speed: f64,
        running: &AtomicCell<bool>,
        mut on_step: F,
    ) -> Result<bool> {
        let delay = step_delay(speed)?;
        while let Some(cell) = self.waypoint() {
            if !running.load() {
                info!(
                    "Playback stopped at step {} with {} cells to go",
                    self.visited,
                    self.remaining()
                );
                return Ok(false);
            }
            on_step(self.visited, cell);
            self.advance();
            if self.remaining() > 0 {
                Timer::after(delay).await;
            }
        }
        Ok(true)
    }
}

/// Time the robot spends on each cell at `speed` cells per second.
pub fn step_delay(speed: f64) -> Result<Duration> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(PlanError::InvalidSpeed(speed));
    }
    Duration::try_from_secs_f64(1.0 / speed).map_err(|_| PlanError::InvalidSpeed(speed))
}
