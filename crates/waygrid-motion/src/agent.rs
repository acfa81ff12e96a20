//! One moving entity: its search, its movement, and replanning.

use std::path::{Path, PathBuf};

use waygrid_core::{Cell, GridQuery, Vec2};
use waygrid_paths::{Pathfinder, SearchConfig, SearchError, SearchStatus, center_of};

use crate::controller::{MoveState, MoveStatus, MovementController};
use crate::entity::Mover;

/// What an [`Agent`] is doing after a tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentStatus {
    /// A search is running; the agent may be walking a partial route.
    Searching,
    /// Walking a complete route.
    Moving,
    /// No path to the goal. The agent waits for the grid to change.
    Stranded,
    /// At the goal. The caller may remove the agent.
    Arrived,
}

/// A [`Mover`] with its own pathfinder and movement controller.
pub struct Agent<E: Mover> {
    entity: E,
    pathfinder: Pathfinder,
    controller: MovementController,
    status: AgentStatus,
    goal: Cell,
    /// Grid revision the current route was checked against.
    revision: u64,
    replans: usize,
    report_dir: PathBuf,
}

impl<E: Mover> Agent<E> {
    /// Place `entity` at the center of `start` and begin searching for `goal`.
    pub fn new<G: GridQuery + ?Sized>(
        entity: E,
        grid: &G,
        start: Cell,
        goal: Cell,
    ) -> Result<Self, SearchError> {
        let config = SearchConfig {
            step_limit: entity.step_limit(),
            footprint: entity.footprint(),
            ..SearchConfig::default()
        };
        let mut pathfinder = Pathfinder::new(config);
        pathfinder.new_search(grid, start, goal)?;
        log::debug!("entity {} spawned at {start}, heading for {goal}", entity.number());
        Ok(Self {
            controller: MovementController::new(center_of(grid, start)),
            entity,
            pathfinder,
            status: AgentStatus::Searching,
            goal,
            revision: grid.revision(),
            replans: 0,
            report_dir: PathBuf::from("."),
        })
    }

    /// Directory search reports are written to when the entity has debugging
    /// enabled. Defaults to the working directory.
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    #[inline]
    pub fn entity(&self) -> &E {
        &self.entity
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.controller.position()
    }

    #[inline]
    pub fn heading(&self) -> f64 {
        self.controller.heading()
    }

    /// Current smoothed route, complete or partial.
    #[inline]
    pub fn route(&self) -> &[Cell] {
        self.pathfinder.route()
    }

    #[inline]
    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    #[inline]
    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    #[inline]
    pub fn status(&self) -> AgentStatus {
        self.status
    }

    #[inline]
    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Searches restarted because the grid changed.
    #[inline]
    pub fn replans(&self) -> usize {
        self.replans
    }

    #[inline]
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Run one frame of `dt` seconds.
    pub fn tick<G: GridQuery + ?Sized>(&mut self, grid: &G, dt: f64) -> AgentStatus {
        if self.status == AgentStatus::Arrived {
            return self.status;
        }

        if grid.revision() != self.revision {
            self.revision = grid.revision();
            if self.status == AgentStatus::Stranded || !self.route_is_clear(grid) {
                self.replan(grid);
            }
        }

        if self.pathfinder.is_active() {
            match self.pathfinder.advance(grid) {
                SearchStatus::InProgress => {
                    let waypoints = self.waypoints(grid);
                    self.controller.follow(waypoints, false);
                    self.status = AgentStatus::Searching;
                }
                SearchStatus::Succeeded => {
                    let waypoints = self.waypoints(grid);
                    self.controller.follow(waypoints, true);
                    self.status = AgentStatus::Moving;
                    self.write_report();
                }
                SearchStatus::Failed => self.strand(),
                SearchStatus::Idle => {}
            }
        }

        if self.controller.tick(dt, self.entity.speed()) == MoveStatus::Arrived {
            log::info!(
                "entity {} arrived at {} after {} replans",
                self.entity.number(),
                self.goal,
                self.replans
            );
            self.status = AgentStatus::Arrived;
        }
        self.status
    }

    fn waypoints<G: GridQuery + ?Sized>(&self, grid: &G) -> Vec<Vec2> {
        self.pathfinder
            .route()
            .iter()
            .map(|&cell| center_of(grid, cell))
            .collect()
    }

    /// Whether the rest of the route, starting from the current position,
    /// is still free of blocked terrain.
    fn route_is_clear<G: GridQuery + ?Sized>(&self, grid: &G) -> bool {
        let mut from = self.controller.position();
        if self.controller.state() == MoveState::Traveling {
            if let Some(target) = self.controller.target() {
                if !self.pathfinder.line_of_sight(grid, from, target) {
                    log::debug!(
                        "entity {}: step to {target} is blocked",
                        self.entity.number()
                    );
                    return false;
                }
                from = target;
            }
        }
        for &next in self.controller.remaining() {
            if !self.pathfinder.line_of_sight(grid, from, next) {
                log::debug!(
                    "entity {}: route blocked between {from} and {next}",
                    self.entity.number()
                );
                return false;
            }
            from = next;
        }
        true
    }

    fn replan<G: GridQuery + ?Sized>(&mut self, grid: &G) {
        let pos = self.controller.position();
        let Some(here) = grid.cell_at_pixel(pos.x, pos.y) else {
            log::warn!("entity {} is off the grid at {pos}", self.entity.number());
            self.strand();
            return;
        };
        self.controller.stop();
        match self.pathfinder.new_search(grid, here, self.goal) {
            Ok(()) => {
                self.replans += 1;
                self.status = AgentStatus::Searching;
                log::debug!(
                    "entity {} replanning from {here} (replan #{})",
                    self.entity.number(),
                    self.replans
                );
            }
            Err(err) => {
                log::warn!("entity {}: {err}", self.entity.number());
                self.strand();
            }
        }
    }

    fn strand(&mut self) {
        if self.status != AgentStatus::Stranded {
            log::info!(
                "entity {}: no path to {}, waiting",
                self.entity.number(),
                self.goal
            );
        }
        self.controller.stop();
        self.status = AgentStatus::Stranded;
    }

    fn write_report(&self) {
        if !self.entity.debug_enabled() {
            return;
        }
        let Some(report) = self.pathfinder.report() else {
            return;
        };
        match report.write_to_dir(&self.report_dir, self.entity.number()) {
            Ok(path) => log::debug!("wrote search report to {}", path.display()),
            Err(err) => log::warn!(
                "entity {}: could not write search report to {}: {err}",
                self.entity.number(),
                self.report_dir.display()
            ),
        }
    }
}
