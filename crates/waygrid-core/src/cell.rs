//! The [`Cell`] type, a grid square addressed by row and column.

use std::fmt;

/// A grid cell address.
///
/// Rows grow downward (pixel Y), columns grow rightward (pixel X). A `Cell`
/// carries no terrain data; traversability and pixel geometry are queried
/// from a [`GridQuery`](crate::GridQuery).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    /// Create a new cell address.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return the cell offset by (drow, dcol).
    #[inline]
    pub const fn offset(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// All eight neighbours, clockwise from the one above.
    #[inline]
    pub fn neighbors_8(self) -> [Cell; 8] {
        [
            self.offset(-1, 0),
            self.offset(-1, 1),
            self.offset(0, 1),
            self.offset(1, 1),
            self.offset(1, 0),
            self.offset(1, -1),
            self.offset(0, -1),
            self.offset(-1, -1),
        ]
    }

    /// Whether `other` touches this cell diagonally (corner only).
    #[inline]
    pub fn is_diagonal_to(self, other: Cell) -> bool {
        self.row != other.row && self.col != other.col
    }
}

impl From<(i32, i32)> for Cell {
    #[inline]
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}
