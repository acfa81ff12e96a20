use crate::cell::Cell;
use crate::geom::{Point, Range};
use crate::layout::GridLayout;

/// Read-only query surface over a grid.
///
/// Pathfinding and movement only ever read the grid through this trait.
/// Implementors own terrain storage and may change traversability between
/// calls; consumers must not cache answers across searches.
pub trait GridQuery {
    /// Pixel layout of the grid.
    fn layout(&self) -> &GridLayout;

    /// Whether entities may enter `cell`. Must be `false` outside the grid.
    fn is_traversable(&self, cell: Cell) -> bool;

    /// Mutation counter. Implementations that change traversability at
    /// runtime bump it on every change so stale routes can be detected.
    fn revision(&self) -> u64 {
        0
    }

    #[inline]
    fn rows(&self) -> i32 {
        self.layout().rows()
    }

    #[inline]
    fn cols(&self) -> i32 {
        self.layout().cols()
    }

    #[inline]
    fn cell_size(&self) -> i32 {
        self.layout().cell_size()
    }

    #[inline]
    fn contains(&self, cell: Cell) -> bool {
        self.layout().contains(cell)
    }

    #[inline]
    fn bounds(&self, cell: Cell) -> Range {
        self.layout().bounds(cell)
    }

    #[inline]
    fn center(&self, cell: Cell) -> Point {
        self.layout().center(cell)
    }

    #[inline]
    fn cell_at_pixel(&self, x: f64, y: f64) -> Option<Cell> {
        self.layout().cell_at_pixel(x, y)
    }

    /// Whether pixel (x, y) lies inside a traversable cell.
    #[inline]
    fn is_walkable_at(&self, x: f64, y: f64) -> bool {
        self.cell_at_pixel(x, y)
            .is_some_and(|cell| self.is_traversable(cell))
    }
}

impl<G: GridQuery + ?Sized> GridQuery for &G {
    #[inline]
    fn layout(&self) -> &GridLayout {
        (**self).layout()
    }

    #[inline]
    fn is_traversable(&self, cell: Cell) -> bool {
        (**self).is_traversable(cell)
    }

    #[inline]
    fn revision(&self) -> u64 {
        (**self).revision()
    }
}
