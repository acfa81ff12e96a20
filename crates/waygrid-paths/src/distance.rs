use waygrid_core::Cell;

/// Cost of a horizontal or vertical step.
pub const STRAIGHT_COST: i32 = 10;
/// Cost of a diagonal step (≈ √2 × [`STRAIGHT_COST`]).
pub const DIAGONAL_COST: i32 = 14;

/// Octile distance between two cells in integer cost units.
///
/// Exact for an open 8-connected grid with [`STRAIGHT_COST`] and
/// [`DIAGONAL_COST`], so it never overestimates (admissible) and satisfies
/// the triangle inequality over single steps (consistent).
#[inline]
pub fn octile(a: Cell, b: Cell) -> i32 {
    let dr = (a.row - b.row).abs();
    let dc = (a.col - b.col).abs();
    let diagonal = dr.min(dc);
    let straight = dr + dc - 2 * diagonal;
    DIAGONAL_COST * diagonal + STRAIGHT_COST * straight
}

/// Cost of a single step between adjacent cells.
#[inline]
pub fn step_cost(from: Cell, to: Cell) -> i32 {
    if from.is_diagonal_to(to) {
        DIAGONAL_COST
    } else {
        STRAIGHT_COST
    }
}

/// Total step cost along a cell-by-cell path.
pub fn path_cost(path: &[Cell]) -> i32 {
    path.windows(2).map(|w| step_cost(w[0], w[1])).sum()
}
