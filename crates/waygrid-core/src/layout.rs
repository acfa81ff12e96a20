//! Pixel layout of a fixed-size grid.
//!
//! [`GridLayout`] maps between cell addresses and pixel space. The grid is
//! positioned at an `origin`, usually the margin that centers it inside a
//! larger canvas.

use crate::cell::Cell;
use crate::geom::{Point, Range};

/// Dimensions, cell size and pixel origin of a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    rows: i32,
    cols: i32,
    cell_size: i32,
    origin: Point,
}

impl GridLayout {
    /// A layout whose top-left pixel is (0, 0).
    ///
    /// Negative dimensions are treated as zero and `cell_size` is at least 1.
    pub fn new(rows: i32, cols: i32, cell_size: i32) -> Self {
        Self {
            rows: rows.max(0),
            cols: cols.max(0),
            cell_size: cell_size.max(1),
            origin: Point::ZERO,
        }
    }

    /// A layout centered in a `canvas_width` × `canvas_height` canvas.
    ///
    /// The margin on each axis is `(canvas - grid) / 2`; it is negative when
    /// the grid is larger than the canvas.
    pub fn centered(rows: i32, cols: i32, cell_size: i32, canvas_width: i32, canvas_height: i32) -> Self {
        let layout = Self::new(rows, cols, cell_size);
        let origin = Point::new(
            (canvas_width - layout.pixel_width()) / 2,
            (canvas_height - layout.pixel_height()) / 2,
        );
        layout.with_origin(origin)
    }

    /// Same dimensions, different pixel origin.
    #[inline]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn pixel_width(&self) -> i32 {
        self.cols * self.cell_size
    }

    #[inline]
    pub fn pixel_height(&self) -> i32 {
        self.rows * self.cell_size
    }

    /// The pixel rectangle covered by the whole grid.
    #[inline]
    pub fn clip(&self) -> Range {
        Range::from_origin(self.origin, self.pixel_width(), self.pixel_height())
    }

    /// Whether `cell` lies inside the grid.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    /// Row-major flat index of `cell`, or `None` if out of range.
    #[inline]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some((cell.row * self.cols + cell.col) as usize)
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn cell_at_index(&self, idx: usize) -> Cell {
        let cols = self.cols.max(1) as usize;
        Cell::new((idx / cols) as i32, (idx % cols) as i32)
    }

    /// Top-left pixel of `cell`. Defined for any address, in range or not.
    #[inline]
    pub fn top_left(&self, cell: Cell) -> Point {
        self.origin + Point::new(cell.col, cell.row) * self.cell_size
    }

    /// Pixel bounding box of `cell`.
    #[inline]
    pub fn bounds(&self, cell: Cell) -> Range {
        Range::from_origin(self.top_left(cell), self.cell_size, self.cell_size)
    }

    /// Pixel center of `cell`.
    #[inline]
    pub fn center(&self, cell: Cell) -> Point {
        let half = self.cell_size / 2;
        self.top_left(cell).shift(half, half)
    }

    /// The cell containing pixel (x, y), or `None` outside the grid.
    pub fn cell_at_pixel(&self, x: f64, y: f64) -> Option<Cell> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let size = f64::from(self.cell_size);
        let col = ((x - f64::from(self.origin.x)) / size).floor();
        let row = ((y - f64::from(self.origin.y)) / size).floor();
        if row < 0.0 || col < 0.0 || row >= f64::from(self.rows) || col >= f64::from(self.cols) {
            return None;
        }
        Some(Cell::new(row as i32, col as i32))
    }

    /// Row-major iterator over every cell of the grid.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (rows, cols) = (self.rows, self.cols);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }
}
