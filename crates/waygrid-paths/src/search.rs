//! Incremental A* search.
//!
//! A [`Pathfinder`] runs one search at a time for one entity. The search is
//! advanced in bounded batches of node expansions so that a long search can
//! be spread over several simulation ticks; between batches a partial route
//! towards the most promising node is available.

use std::fmt;

use waygrid_core::{Cell, GridQuery, Vec2};

use crate::heap::IndexedHeap;
use crate::node::{NodeArena, NodeId, NodeState};
use crate::report::{ReportEntry, SearchReport};
use crate::smooth::{self, Footprint, MAX_SAMPLE_FRACTION};
use crate::traits::{AstarPather, GridPather};

/// Pathfinder configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Node expansions per [`Pathfinder::advance`] call; 0 runs to completion.
    pub step_limit: usize,
    /// Line-of-sight sample spacing as a fraction of the cell size. Clamped
    /// to [`MAX_SAMPLE_FRACTION`]; non-positive values use that maximum.
    pub sample_spacing: f64,
    /// Bounding box used by route smoothing.
    pub footprint: Footprint,
    /// Allow diagonal steps past a blocked orthogonal neighbour, as long as
    /// the footprint clears the corner between the two cell centers.
    pub allow_corner_cutting: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step_limit: 0,
            sample_spacing: MAX_SAMPLE_FRACTION,
            footprint: Footprint::POINT,
            allow_corner_cutting: false,
        }
    }
}

impl SearchConfig {
    /// Sample spacing in pixels for a grid with `cell_size`.
    pub fn spacing_px(&self, cell_size: i32) -> f64 {
        let fraction = if self.sample_spacing > 0.0 {
            self.sample_spacing.min(MAX_SAMPLE_FRACTION)
        } else {
            MAX_SAMPLE_FRACTION
        };
        f64::from(cell_size) * fraction
    }
}

/// State of a [`Pathfinder`]'s current search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// No search requested, or the last one was discarded.
    Idle,
    /// Paused at the step limit; call `advance` again.
    InProgress,
    /// The goal was reached; the route is complete.
    Succeeded,
    /// The goal is unreachable; the route is empty.
    Failed,
}

impl SearchStatus {
    /// Whether the search has reached a final outcome.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Rejected search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The cell is outside the grid.
    OutOfBounds { cell: Cell },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { cell } => write!(f, "cell {cell} is outside the grid"),
        }
    }
}

impl std::error::Error for SearchError {}

enum Outcome {
    Found(NodeId),
    Exhausted,
    Paused,
}

/// Per-entity incremental A* search.
pub struct Pathfinder {
    config: SearchConfig,
    status: SearchStatus,
    start: Option<Cell>,
    goal: Option<Cell>,
    arena: NodeArena,
    open: IndexedHeap,
    nbuf: Vec<Cell>,
    expanded: usize,
    reopened: usize,
    last_expanded: Option<NodeId>,
    raw_path: Vec<Cell>,
    route: Vec<Cell>,
    path_cost: i32,
    report: Option<SearchReport>,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Pathfinder {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            status: SearchStatus::Idle,
            start: None,
            goal: None,
            arena: NodeArena::new(),
            open: IndexedHeap::new(),
            nbuf: Vec::with_capacity(8),
            expanded: 0,
            reopened: 0,
            last_expanded: None,
            raw_path: Vec::new(),
            route: Vec::new(),
            path_cost: 0,
            report: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Cap node expansions per [`advance`](Self::advance); 0 means unlimited.
    pub fn set_step_limit(&mut self, steps: usize) {
        self.config.step_limit = steps;
    }

    #[inline]
    pub fn step_limit(&self) -> usize {
        self.config.step_limit
    }

    #[inline]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Whether a search is running and needs more `advance` calls.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == SearchStatus::InProgress
    }

    #[inline]
    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Option<Cell> {
        self.goal
    }

    /// Nodes expanded by the current (or last) search.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Closed nodes put back on the open list because a cheaper way to them
    /// turned up. Always 0 with a consistent estimate.
    #[inline]
    pub fn reopened(&self) -> usize {
        self.reopened
    }

    /// Smoothed waypoints: complete after success, partial while in progress,
    /// empty after failure.
    #[inline]
    pub fn route(&self) -> &[Cell] {
        &self.route
    }

    /// The unsmoothed cell-by-cell path behind [`route`](Self::route).
    #[inline]
    pub fn raw_path(&self) -> &[Cell] {
        &self.raw_path
    }

    /// Movement cost of [`raw_path`](Self::raw_path).
    #[inline]
    pub fn path_cost(&self) -> i32 {
        self.path_cost
    }

    /// Diagnostics of the last successful search.
    #[inline]
    pub fn report(&self) -> Option<&SearchReport> {
        self.report.as_ref()
    }

    /// Start a new search from `start` to `goal`, replacing any previous one.
    ///
    /// Out-of-range cells are rejected and the pathfinder is left untouched.
    pub fn new_search<G: GridQuery + ?Sized>(
        &mut self,
        grid: &G,
        start: Cell,
        goal: Cell,
    ) -> Result<(), SearchError> {
        for cell in [start, goal] {
            if !grid.contains(cell) {
                return Err(SearchError::OutOfBounds { cell });
            }
        }

        self.reset();
        self.start = Some(start);
        self.goal = Some(goal);

        let (id, _) = self.arena.get_or_insert(start);
        let h = self.grid_pather(grid).estimate(start, goal);
        let node = self.arena.node_mut(id);
        node.set_costs(0, h);
        node.state = NodeState::Open;
        self.open.push(id, node.f);

        self.status = SearchStatus::InProgress;
        log::debug!("search {start} -> {goal} started (estimate {h})");
        Ok(())
    }

    /// Drop all search state. The pathfinder becomes idle.
    pub fn discard(&mut self) {
        self.reset();
    }

    /// Continue the search over `grid` with 8-connected octile costs.
    pub fn advance<G: GridQuery + ?Sized>(&mut self, grid: &G) -> SearchStatus {
        let pather = self.grid_pather(grid);
        self.advance_with(&pather, grid)
    }

    /// The default pather. Cut corners must leave room for the footprint.
    fn grid_pather<'a, G: GridQuery + ?Sized>(&self, grid: &'a G) -> GridPather<'a, G> {
        GridPather::new(grid, self.config.allow_corner_cutting)
            .with_clearance(self.config.spacing_px(grid.cell_size()), self.config.footprint)
    }

    /// Continue the search using `pather` for neighbors and costs, and
    /// `grid` for goal checks and smoothing.
    pub fn advance_with<P: AstarPather, G: GridQuery + ?Sized>(
        &mut self,
        pather: &P,
        grid: &G,
    ) -> SearchStatus {
        if self.status != SearchStatus::InProgress {
            return self.status;
        }
        let Some(goal) = self.goal else {
            return self.status;
        };
        if !grid.is_traversable(goal) {
            log::debug!("goal {goal} is not traversable");
            return self.fail();
        }

        let limit = self.config.step_limit;
        let mut steps = 0usize;
        let mut nbuf = std::mem::take(&mut self.nbuf);

        let outcome = loop {
            if self.open.is_empty() {
                break Outcome::Exhausted;
            }
            let Some(current) = self.open.pop_min() else {
                break Outcome::Exhausted;
            };

            let node = self.arena.node_mut(current);
            node.state = NodeState::Closed;
            if node.cell == goal {
                break Outcome::Found(current);
            }
            let (cell, g) = (node.cell, node.g);

            self.expanded += 1;
            steps += 1;
            self.last_expanded = Some(current);

            nbuf.clear();
            pather.neighbors(cell, &mut nbuf);
            for &next in nbuf.iter() {
                let candidate = g + pather.cost(cell, next);
                let (id, created) = self.arena.get_or_insert(next);
                if !created && self.arena.node(id).g <= candidate {
                    continue;
                }
                if !created {
                    match self.arena.node(id).state {
                        // Drop the stale entry before re-queuing at the new priority.
                        NodeState::Open => {
                            self.open.remove(id);
                        }
                        NodeState::Closed => {
                            self.reopened += 1;
                            log::trace!("reopening {next} at cost {candidate}");
                        }
                    }
                }
                let h = pather.estimate(next, goal);
                let n = self.arena.node_mut(id);
                n.parent = Some(current);
                n.set_costs(candidate, h);
                n.state = NodeState::Open;
                self.open.push(id, n.f);
            }

            if limit > 0 && steps >= limit {
                break Outcome::Paused;
            }
        };
        self.nbuf = nbuf;
        log::trace!("advance: {steps} expansions, {} open", self.open.len());

        match outcome {
            Outcome::Found(id) => self.succeed(grid, id),
            Outcome::Exhausted => {
                log::debug!("open set exhausted after {} expansions", self.expanded);
                self.fail()
            }
            Outcome::Paused => {
                if let Some(best) = self.last_expanded {
                    self.build_route(grid, best);
                }
                SearchStatus::InProgress
            }
        }
    }

    /// Whether an entity using this pathfinder's footprint can move straight
    /// from `a` to `b` on `grid` right now.
    pub fn line_of_sight<G: GridQuery + ?Sized>(&self, grid: &G, a: Vec2, b: Vec2) -> bool {
        smooth::line_of_sight(
            grid,
            a,
            b,
            self.config.spacing_px(grid.cell_size()),
            self.config.footprint,
        )
    }

    fn build_route<G: GridQuery + ?Sized>(&mut self, grid: &G, end: NodeId) {
        self.raw_path = self.arena.path_to(end);
        self.path_cost = self.arena.node(end).g;
        self.route = smooth::smooth(
            grid,
            &self.raw_path,
            self.config.spacing_px(grid.cell_size()),
            self.config.footprint,
        );
    }

    fn succeed<G: GridQuery + ?Sized>(&mut self, grid: &G, goal: NodeId) -> SearchStatus {
        self.build_route(grid, goal);
        let route = self
            .route
            .iter()
            .map(|&cell| ReportEntry {
                cell,
                total_cost: self
                    .arena
                    .lookup(cell)
                    .map_or(0, |id| self.arena.node(id).f),
            })
            .collect();
        if let (Some(start), Some(goal)) = (self.start, self.goal) {
            self.report = Some(SearchReport {
                start,
                goal,
                expanded: self.expanded,
                path_cost: self.path_cost,
                route,
            });
        }
        log::debug!(
            "search succeeded: cost {}, {} expansions, {} waypoints ({} raw)",
            self.path_cost,
            self.expanded,
            self.route.len(),
            self.raw_path.len()
        );
        self.release();
        self.status = SearchStatus::Succeeded;
        self.status
    }

    fn fail(&mut self) -> SearchStatus {
        self.route.clear();
        self.raw_path.clear();
        self.path_cost = 0;
        self.release();
        self.status = SearchStatus::Failed;
        self.status
    }

    /// Free per-search node storage.
    fn release(&mut self) {
        self.arena.clear();
        self.open.clear();
        self.last_expanded = None;
    }

    fn reset(&mut self) {
        self.release();
        self.status = SearchStatus::Idle;
        self.start = None;
        self.goal = None;
        self.expanded = 0;
        self.reopened = 0;
        self.raw_path.clear();
        self.route.clear();
        self.path_cost = 0;
        self.report = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{self, DIAGONAL_COST, STRAIGHT_COST};
    use crate::traits::{Pather, WeightedPather};
    use rand::{RngExt, SeedableRng};
    use std::collections::BinaryHeap;
    use std::cmp::Reverse;
    use waygrid_core::{GridLayout, TileMap};

    fn open_map(rows: i32, cols: i32) -> TileMap {
        TileMap::new(GridLayout::new(rows, cols, 20))
    }

    fn run(pf: &mut Pathfinder, grid: &TileMap) -> SearchStatus {
        loop {
            let status = pf.advance(grid);
            if status != SearchStatus::InProgress {
                return status;
            }
        }
    }

    fn solve(grid: &TileMap, start: Cell, goal: Cell, config: SearchConfig) -> Pathfinder {
        let mut pf = Pathfinder::new(config);
        pf.new_search(grid, start, goal).unwrap();
        run(&mut pf, grid);
        pf
    }

    /// Plain Dijkstra under the same move rules, as an optimality reference.
    fn reference_cost(grid: &TileMap, start: Cell, goal: Cell, corner_cutting: bool) -> Option<i32> {
        if !grid.is_traversable(goal) {
            return None;
        }
        let layout = *grid.layout();
        let spacing = SearchConfig::default().spacing_px(grid.cell_size());
        let pather = GridPather::new(grid, corner_cutting).with_clearance(spacing, Footprint::POINT);
        let mut dist = vec![i32::MAX; layout.len()];
        let mut heap = BinaryHeap::new();
        dist[layout.index(start)?] = 0;
        heap.push(Reverse((0, start)));
        let mut buf = Vec::new();
        while let Some(Reverse((d, cell))) = heap.pop() {
            if cell == goal {
                return Some(d);
            }
            if d > dist[layout.index(cell)?] {
                continue;
            }
            buf.clear();
            pather.neighbors(cell, &mut buf);
            for &n in &buf {
                let nd = d + pather.cost(cell, n);
                let ni = layout.index(n)?;
                if nd < dist[ni] {
                    dist[ni] = nd;
                    heap.push(Reverse((nd, n)));
                }
            }
        }
        None
    }

    fn assert_route_clear(grid: &TileMap, pf: &Pathfinder) {
        let spacing = f64::from(grid.cell_size()) * MAX_SAMPLE_FRACTION;
        for w in pf.route().windows(2) {
            let a = smooth::center_of(grid, w[0]);
            let b = smooth::center_of(grid, w[1]);
            for p in smooth::sample_segment(a, b, spacing) {
                assert!(
                    grid.is_walkable_at(p.x, p.y),
                    "segment {} -> {} crosses blocked terrain at {p}",
                    w[0],
                    w[1]
                );
            }
        }
    }

    #[test]
    fn open_grid_diagonal_is_one_segment() {
        let grid = open_map(5, 5);
        let pf = solve(&grid, Cell::new(0, 0), Cell::new(4, 4), SearchConfig::default());
        assert_eq!(pf.status(), SearchStatus::Succeeded);
        assert_eq!(pf.path_cost(), 4 * DIAGONAL_COST);
        assert_eq!(pf.raw_path().len(), 5);
        assert_eq!(pf.route(), &[Cell::new(0, 0), Cell::new(4, 4)]);
    }

    #[test]
    fn blocked_center_forces_detour() {
        let mut grid = open_map(5, 5);
        grid.set_walkable(Cell::new(2, 2), false);
        let pf = solve(&grid, Cell::new(0, 0), Cell::new(4, 4), SearchConfig::default());
        assert_eq!(pf.status(), SearchStatus::Succeeded);
        assert!(pf.path_cost() > 56);
        assert_eq!(
            Some(pf.path_cost()),
            reference_cost(&grid, Cell::new(0, 0), Cell::new(4, 4), false)
        );
        assert!(pf.route().len() >= 3);
        assert_eq!(pf.route().first(), Some(&Cell::new(0, 0)));
        assert_eq!(pf.route().last(), Some(&Cell::new(4, 4)));
        assert!(!pf.raw_path().contains(&Cell::new(2, 2)));
        assert_route_clear(&grid, &pf);
    }

    #[test]
    fn start_equals_goal() {
        let grid = open_map(5, 5);
        let mut pf = Pathfinder::default();
        pf.new_search(&grid, Cell::new(2, 3), Cell::new(2, 3)).unwrap();
        assert_eq!(pf.advance(&grid), SearchStatus::Succeeded);
        assert_eq!(pf.route(), &[Cell::new(2, 3)]);
        assert_eq!(pf.expanded(), 0);
        assert_eq!(pf.path_cost(), 0);
    }

    #[test]
    fn unwalkable_goal_fails() {
        let mut grid = open_map(5, 5);
        grid.set_walkable(Cell::new(4, 4), false);
        let pf = solve(&grid, Cell::new(0, 0), Cell::new(4, 4), SearchConfig::default());
        assert_eq!(pf.status(), SearchStatus::Failed);
        assert!(pf.route().is_empty());
        assert!(pf.report().is_none());
    }

    #[test]
    fn walled_off_goal_fails() {
        let grid = TileMap::parse(
            "..#..\n\
             ..#..\n\
             ..#..",
            20,
        )
        .unwrap();
        let pf = solve(&grid, Cell::new(0, 0), Cell::new(2, 4), SearchConfig::default());
        assert_eq!(pf.status(), SearchStatus::Failed);
        assert!(pf.route().is_empty());
        assert!(pf.raw_path().is_empty());
        // Every reachable cell on the left was expanded before giving up.
        assert_eq!(pf.expanded(), 6);
    }

    #[test]
    fn diagonal_squeeze_respects_corner_rule() {
        let grid = TileMap::parse(
            ".#\n\
             #.",
            20,
        )
        .unwrap();
        let strict = solve(&grid, Cell::new(0, 0), Cell::new(1, 1), SearchConfig::default());
        assert_eq!(strict.status(), SearchStatus::Failed);

        let loose = solve(
            &grid,
            Cell::new(0, 0),
            Cell::new(1, 1),
            SearchConfig {
                allow_corner_cutting: true,
                ..SearchConfig::default()
            },
        );
        assert_eq!(loose.status(), SearchStatus::Succeeded);
        assert_eq!(loose.path_cost(), DIAGONAL_COST);

        let boxed = solve(
            &grid,
            Cell::new(0, 0),
            Cell::new(1, 1),
            SearchConfig {
                allow_corner_cutting: true,
                footprint: Footprint::square(4.0),
                ..SearchConfig::default()
            },
        );
        assert_eq!(boxed.status(), SearchStatus::Failed);
    }

    #[test]
    fn corner_cutting_never_passes_where_walls_touch() {
        let grid = TileMap::parse(
            "#.\n\
             .#",
            20,
        )
        .unwrap();
        let config = SearchConfig {
            allow_corner_cutting: true,
            ..SearchConfig::default()
        };
        let pf = solve(&grid, Cell::new(0, 1), Cell::new(1, 0), config);
        assert_eq!(pf.status(), SearchStatus::Failed);
        assert!(pf.route().is_empty());
    }

    #[test]
    fn reopen_count_resets_with_each_search() {
        let grid = open_map(6, 6);
        let mut pf = Pathfinder::default();
        pf.new_search(&grid, Cell::new(0, 0), Cell::new(5, 3)).unwrap();
        run(&mut pf, &grid);
        assert_eq!(pf.status(), SearchStatus::Succeeded);
        assert_eq!(pf.reopened(), 0);
        pf.discard();
        assert_eq!(pf.reopened(), 0);
        assert_eq!(pf.expanded(), 0);
    }

    #[test]
    fn out_of_bounds_request_is_rejected_without_side_effects() {
        let grid = open_map(3, 3);
        let mut pf = Pathfinder::default();
        pf.new_search(&grid, Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        run(&mut pf, &grid);
        let route = pf.route().to_vec();

        let err = pf.new_search(&grid, Cell::new(0, 0), Cell::new(3, 0)).unwrap_err();
        assert_eq!(err, SearchError::OutOfBounds { cell: Cell::new(3, 0) });
        assert_eq!(err.to_string(), "cell (3,0) is outside the grid");
        assert!(pf.new_search(&grid, Cell::new(-1, 0), Cell::new(1, 1)).is_err());
        assert_eq!(pf.status(), SearchStatus::Succeeded);
        assert_eq!(pf.route(), route.as_slice());
        assert_eq!(pf.goal(), Some(Cell::new(2, 2)));
    }

    #[test]
    fn step_limit_yields_partial_routes_then_same_result() {
        let grid = TileMap::parse(
            "..........\n\
             .########.\n\
             .#......#.\n\
             .#.####.#.\n\
             ...#..#...",
            20,
        )
        .unwrap();
        let start = Cell::new(2, 2);
        let goal = Cell::new(4, 9);
        let full = solve(&grid, start, goal, SearchConfig::default());
        assert_eq!(full.status(), SearchStatus::Succeeded);

        let mut pf = Pathfinder::new(SearchConfig {
            step_limit: 3,
            ..SearchConfig::default()
        });
        pf.new_search(&grid, start, goal).unwrap();
        assert_eq!(pf.advance(&grid), SearchStatus::InProgress);
        assert_eq!(pf.expanded(), 3);
        assert!(!pf.route().is_empty());
        assert_eq!(pf.route()[0], start);

        let mut calls = 1;
        while pf.advance(&grid) == SearchStatus::InProgress {
            calls += 1;
            assert_eq!(pf.route().first(), Some(&start));
        }
        assert!(calls > 1);
        assert_eq!(pf.status(), SearchStatus::Succeeded);
        assert_eq!(pf.path_cost(), full.path_cost());
        assert_eq!(pf.route().last(), Some(&goal));
        // Terminal status is sticky.
        assert_eq!(pf.advance(&grid), SearchStatus::Succeeded);
    }

    #[test]
    fn report_lists_route_with_costs() {
        let grid = open_map(5, 5);
        let pf = solve(&grid, Cell::new(0, 0), Cell::new(4, 4), SearchConfig::default());
        let report = pf.report().unwrap();
        assert_eq!(report.start, Cell::new(0, 0));
        assert_eq!(report.goal, Cell::new(4, 4));
        assert_eq!(report.expanded, pf.expanded());
        assert_eq!(report.path_cost, 56);
        assert_eq!(report.route.len(), 2);
        assert_eq!(report.route[0].total_cost, 56);
        assert_eq!(report.route[1].total_cost, 56);
    }

    #[test]
    fn discard_returns_to_idle() {
        let grid = open_map(4, 4);
        let mut pf = Pathfinder::new(SearchConfig {
            step_limit: 1,
            ..SearchConfig::default()
        });
        pf.new_search(&grid, Cell::new(0, 0), Cell::new(3, 3)).unwrap();
        assert!(pf.is_active());
        pf.discard();
        assert_eq!(pf.status(), SearchStatus::Idle);
        assert!(pf.route().is_empty());
        assert_eq!(pf.advance(&grid), SearchStatus::Idle);
    }

    #[test]
    fn goal_blocked_mid_search_fails_on_next_advance() {
        let mut grid = open_map(6, 6);
        let mut pf = Pathfinder::new(SearchConfig {
            step_limit: 2,
            ..SearchConfig::default()
        });
        pf.new_search(&grid, Cell::new(0, 0), Cell::new(5, 5)).unwrap();
        assert_eq!(pf.advance(&grid), SearchStatus::InProgress);
        grid.set_walkable(Cell::new(5, 5), false);
        assert_eq!(pf.advance(&grid), SearchStatus::Failed);
        assert!(pf.route().is_empty());
    }

    struct SwampPather<'a> {
        inner: GridPather<'a, TileMap>,
        swamp: Cell,
    }

    impl Pather for SwampPather<'_> {
        fn neighbors(&self, cell: Cell, buf: &mut Vec<Cell>) {
            self.inner.neighbors(cell, buf);
        }
    }

    impl WeightedPather for SwampPather<'_> {
        fn cost(&self, from: Cell, to: Cell) -> i32 {
            let base = self.inner.cost(from, to);
            if to == self.swamp { base * 10 } else { base }
        }
    }

    impl AstarPather for SwampPather<'_> {
        fn estimate(&self, from: Cell, to: Cell) -> i32 {
            self.inner.estimate(from, to)
        }
    }

    #[test]
    fn custom_pather_costs_are_honoured() {
        let grid = open_map(3, 3);
        let pather = SwampPather {
            inner: GridPather::new(&grid, false),
            swamp: Cell::new(1, 1),
        };
        let mut pf = Pathfinder::default();
        pf.new_search(&grid, Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        assert_eq!(pf.advance_with(&pather, &grid), SearchStatus::Succeeded);
        assert!(!pf.raw_path().contains(&Cell::new(1, 1)));
        assert_eq!(pf.path_cost(), DIAGONAL_COST + 2 * STRAIGHT_COST);
    }

    /// Zero estimate everywhere except one cell, which is overestimated.
    struct LureEstimate<'a> {
        inner: GridPather<'a, TileMap>,
        lure: Cell,
    }

    impl Pather for LureEstimate<'_> {
        fn neighbors(&self, cell: Cell, buf: &mut Vec<Cell>) {
            self.inner.neighbors(cell, buf);
        }
    }

    impl WeightedPather for LureEstimate<'_> {
        fn cost(&self, from: Cell, to: Cell) -> i32 {
            self.inner.cost(from, to)
        }
    }

    impl AstarPather for LureEstimate<'_> {
        fn estimate(&self, from: Cell, _to: Cell) -> i32 {
            if from == self.lure { 20 } else { 0 }
        }
    }

    #[test]
    fn closed_nodes_reopen_under_an_inconsistent_estimate() {
        // (0,2) closes at cost 28 through the bottom row before the
        // overestimated (0,1) offers it at 20.
        let grid = open_map(2, 4);
        let pather = LureEstimate {
            inner: GridPather::new(&grid, false),
            lure: Cell::new(0, 1),
        };
        let mut pf = Pathfinder::default();
        pf.new_search(&grid, Cell::new(0, 0), Cell::new(0, 3)).unwrap();
        assert_eq!(pf.advance_with(&pather, &grid), SearchStatus::Succeeded);
        assert_eq!(pf.reopened(), 1);
        assert_eq!(pf.path_cost(), 3 * STRAIGHT_COST);
        assert_eq!(
            pf.raw_path(),
            &[Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2), Cell::new(0, 3)]
        );
    }

    fn random_grid(rng: &mut rand::rngs::StdRng, rows: i32, cols: i32, density: f64) -> TileMap {
        let mut grid = open_map(rows, cols);
        for cell in grid.layout().cells() {
            let r: f64 = rng.random();
            if r < density {
                grid.set_walkable(cell, false);
            }
        }
        grid
    }

    #[test]
    fn random_grids_are_optimal_and_clear() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        for round in 0..60 {
            let mut grid = random_grid(&mut rng, 12, 16, 0.3);
            let start = Cell::new(rng.random_range(0..12), rng.random_range(0..16));
            let goal = Cell::new(rng.random_range(0..12), rng.random_range(0..16));
            grid.set_walkable(start, true);
            let corner_cutting = round % 2 == 1;
            let config = SearchConfig {
                allow_corner_cutting: corner_cutting,
                step_limit: if round % 3 == 0 { 5 } else { 0 },
                ..SearchConfig::default()
            };
            let pf = solve(&grid, start, goal, config);
            let expected = reference_cost(&grid, start, goal, corner_cutting);

            match expected {
                Some(cost) => {
                    assert_eq!(pf.status(), SearchStatus::Succeeded, "round {round}");
                    assert_eq!(pf.path_cost(), cost, "round {round}");
                    assert_eq!(distance::path_cost(pf.raw_path()), cost);
                    assert_eq!(pf.route().first(), Some(&start));
                    assert_eq!(pf.route().last(), Some(&goal));
                    assert_eq!(pf.reopened(), 0, "round {round}");
                    assert_route_clear(&grid, &pf);
                }
                None => {
                    assert_eq!(pf.status(), SearchStatus::Failed, "round {round}");
                    assert!(pf.route().is_empty());
                }
            }
        }
    }

    #[test]
    fn repeated_searches_have_identical_cost() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(9);
        let mut grid = random_grid(&mut rng, 10, 10, 0.25);
        let start = Cell::new(0, 0);
        let goal = Cell::new(9, 9);
        grid.set_walkable(start, true);
        grid.set_walkable(goal, true);

        let mut pf = Pathfinder::default();
        pf.new_search(&grid, start, goal).unwrap();
        let first = run(&mut pf, &grid);
        let first_cost = pf.path_cost();
        let first_route = pf.route().to_vec();
        for _ in 0..3 {
            pf.new_search(&grid, start, goal).unwrap();
            assert_eq!(run(&mut pf, &grid), first);
            assert_eq!(pf.path_cost(), first_cost);
            assert_eq!(pf.route(), first_route.as_slice());
        }
    }

    #[test]
    fn spacing_is_clamped_to_quarter_cell() {
        let coarse = SearchConfig {
            sample_spacing: 0.5,
            ..SearchConfig::default()
        };
        assert_eq!(coarse.spacing_px(20), 5.0);
        let fine = SearchConfig {
            sample_spacing: 0.1,
            ..SearchConfig::default()
        };
        assert_eq!(fine.spacing_px(20), 2.0);
        let unset = SearchConfig {
            sample_spacing: 0.0,
            ..SearchConfig::default()
        };
        assert_eq!(unset.spacing_px(20), 5.0);
    }
}
