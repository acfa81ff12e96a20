use waygrid_core::{Cell, GridQuery};

use crate::distance;
use crate::smooth::{Footprint, center_of, line_of_sight};

/// Neighbor enumeration over cells.
pub trait Pather {
    /// Append neighbors of `cell` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, cell: Cell, buf: &mut Vec<Cell>);
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Cell, to: Cell) -> i32;
}

/// Full A* pather with an admissible heuristic.
pub trait AstarPather: WeightedPather {
    /// Heuristic estimate of distance from `from` to `to`.
    /// Must never overestimate the true cost (admissible).
    fn estimate(&self, from: Cell, to: Cell) -> i32;
}

/// 8-connected pather over a [`GridQuery`] with octile costs.
///
/// Traversability is read from the grid on every call. Unless corner cutting
/// is enabled, a diagonal step is only offered when both orthogonally
/// adjacent cells are traversable too. With corner cutting and a clearance
/// set, a diagonal step past a blocked cell must also keep line of sight
/// between the two cell centers.
pub struct GridPather<'a, G: GridQuery + ?Sized> {
    grid: &'a G,
    allow_corner_cutting: bool,
    clearance: Option<(f64, Footprint)>,
}

impl<'a, G: GridQuery + ?Sized> GridPather<'a, G> {
    pub fn new(grid: &'a G, allow_corner_cutting: bool) -> Self {
        Self {
            grid,
            allow_corner_cutting,
            clearance: None,
        }
    }

    /// Check cut corners by sampling every `spacing` pixels with `footprint`.
    pub fn with_clearance(mut self, spacing: f64, footprint: Footprint) -> Self {
        self.clearance = Some((spacing, footprint));
        self
    }

    fn can_cut(&self, from: Cell, to: Cell) -> bool {
        if !self.allow_corner_cutting {
            return false;
        }
        match self.clearance {
            Some((spacing, footprint)) => line_of_sight(
                self.grid,
                center_of(self.grid, from),
                center_of(self.grid, to),
                spacing,
                footprint,
            ),
            None => true,
        }
    }
}

impl<G: GridQuery + ?Sized> Pather for GridPather<'_, G> {
    fn neighbors(&self, cell: Cell, buf: &mut Vec<Cell>) {
        for n in cell.neighbors_8() {
            if !self.grid.is_traversable(n) {
                continue;
            }
            if cell.is_diagonal_to(n)
                && !(self.grid.is_traversable(Cell::new(cell.row, n.col))
                    && self.grid.is_traversable(Cell::new(n.row, cell.col)))
                && !self.can_cut(cell, n)
            {
                continue;
            }
            buf.push(n);
        }
    }
}

impl<G: GridQuery + ?Sized> WeightedPather for GridPather<'_, G> {
    #[inline]
    fn cost(&self, from: Cell, to: Cell) -> i32 {
        distance::step_cost(from, to)
    }
}

impl<G: GridQuery + ?Sized> AstarPather for GridPather<'_, G> {
    #[inline]
    fn estimate(&self, from: Cell, to: Cell) -> i32 {
        distance::octile(from, to)
    }
}
