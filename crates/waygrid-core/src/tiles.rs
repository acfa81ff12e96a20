//! An in-memory tile map implementing [`GridQuery`].
//!
//! [`TileMap`] stores one [`Tile`] per cell together with a [`GridLayout`].
//! Maps can be built programmatically or parsed from a small text format:
//!
//! ```text
//! S..#.
//! .#.#.
//! ...#G
//! ```
//!
//! `.` is walkable ground, `#` is blocked, `S` marks a walkable spawn cell
//! and `G` a walkable goal cell. Lines that contain only whitespace are
//! skipped, and surrounding whitespace is trimmed from every line.

use std::fmt;

use crate::cell::Cell;
use crate::layout::GridLayout;
use crate::query::GridQuery;

/// Terrain flags of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub walkable: bool,
    pub spawn: bool,
    pub goal: bool,
}

impl Tile {
    pub const FLOOR: Tile = Tile {
        walkable: true,
        spawn: false,
        goal: false,
    };
    pub const WALL: Tile = Tile {
        walkable: false,
        spawn: false,
        goal: false,
    };

    fn from_char(ch: char) -> Option<Tile> {
        match ch {
            '.' => Some(Tile::FLOOR),
            '#' => Some(Tile::WALL),
            'S' => Some(Tile {
                spawn: true,
                ..Tile::FLOOR
            }),
            'G' => Some(Tile {
                goal: true,
                ..Tile::FLOOR
            }),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match (self.walkable, self.spawn, self.goal) {
            (false, _, _) => '#',
            (true, true, _) => 'S',
            (true, false, true) => 'G',
            (true, false, false) => '.',
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::FLOOR
    }
}

/// A mutable grid of [`Tile`]s.
#[derive(Debug, Clone)]
pub struct TileMap {
    layout: GridLayout,
    tiles: Vec<Tile>,
    revision: u64,
}

impl TileMap {
    /// Create a map where every cell is walkable floor.
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            tiles: vec![Tile::FLOOR; layout.len()],
            revision: 0,
        }
    }

    /// Parse a map from text; see the module docs for the format.
    pub fn parse(text: &str, cell_size: i32) -> Result<Self, MapError> {
        let mut tiles = Vec::new();
        let mut width: Option<usize> = None;
        let mut rows = 0i32;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let found = line.chars().count();
            match width {
                None => width = Some(found),
                Some(expected) if expected != found => {
                    return Err(MapError::InconsistentWidth {
                        line: line_no + 1,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
            for (col, ch) in line.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or(MapError::InvalidChar {
                    ch,
                    row: rows,
                    col: col as i32,
                })?;
                tiles.push(tile);
            }
            rows += 1;
        }

        let cols = match width {
            Some(w) if w > 0 => w as i32,
            _ => return Err(MapError::Empty),
        };
        Ok(Self {
            layout: GridLayout::new(rows, cols, cell_size),
            tiles,
            revision: 0,
        })
    }

    /// Re-position the map on a new layout with the same dimensions.
    ///
    /// Layouts with different row or column counts are rejected and the map
    /// is returned unchanged.
    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        if layout.rows() == self.layout.rows() && layout.cols() == self.layout.cols() {
            self.layout = layout;
        } else {
            log::warn!(
                "ignoring layout {}x{}: map is {}x{}",
                layout.rows(),
                layout.cols(),
                self.layout.rows(),
                self.layout.cols()
            );
        }
        self
    }

    /// The tile at `cell`, or `None` outside the grid.
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        self.layout.index(cell).map(|i| self.tiles[i])
    }

    /// Set traversability of `cell`. Returns `false` if out of range.
    pub fn set_walkable(&mut self, cell: Cell, walkable: bool) -> bool {
        let Some(i) = self.layout.index(cell) else {
            return false;
        };
        if self.tiles[i].walkable != walkable {
            self.tiles[i].walkable = walkable;
            self.revision += 1;
            log::trace!("cell {cell} walkable={walkable} (revision {})", self.revision);
        }
        true
    }

    /// Flip traversability of `cell`, returning the new value.
    pub fn toggle_walkable(&mut self, cell: Cell) -> Option<bool> {
        let walkable = !self.tile(cell)?.walkable;
        self.set_walkable(cell, walkable);
        Some(walkable)
    }

    /// Set every cell's traversability at once.
    pub fn fill_walkable(&mut self, walkable: bool) {
        for tile in &mut self.tiles {
            tile.walkable = walkable;
        }
        self.revision += 1;
    }

    pub fn set_spawn(&mut self, cell: Cell, spawn: bool) -> bool {
        let Some(i) = self.layout.index(cell) else {
            return false;
        };
        self.tiles[i].spawn = spawn;
        true
    }

    pub fn set_goal(&mut self, cell: Cell, goal: bool) -> bool {
        let Some(i) = self.layout.index(cell) else {
            return false;
        };
        self.tiles[i].goal = goal;
        true
    }

    /// All cells flagged as spawn points, row-major.
    pub fn spawns(&self) -> Vec<Cell> {
        self.cells_where(|t| t.spawn)
    }

    /// All cells flagged as goals, row-major.
    pub fn goals(&self) -> Vec<Cell> {
        self.cells_where(|t| t.goal)
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.walkable).count()
    }

    fn cells_where(&self, f: impl Fn(&Tile) -> bool) -> Vec<Cell> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| f(t))
            .map(|(i, _)| self.layout.cell_at_index(i))
            .collect()
    }
}

impl GridQuery for TileMap {
    #[inline]
    fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[inline]
    fn is_traversable(&self, cell: Cell) -> bool {
        self.tile(cell).is_some_and(|t| t.walkable)
    }

    #[inline]
    fn revision(&self) -> u64 {
        self.revision
    }
}

impl fmt::Display for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.layout.cols().max(1) as usize;
        for row in self.tiles.chunks(cols) {
            let line: String = row.iter().map(|t| t.to_char()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Errors that can occur when parsing a text map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The text contains no map rows.
    Empty,
    /// A row's width differs from the first row.
    InconsistentWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside `.#SG` was found.
    InvalidChar { ch: char, row: i32, col: i32 },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map: no rows"),
            Self::InconsistentWidth {
                line,
                expected,
                found,
            } => write!(
                f,
                "map: line {line} has width {found}, expected {expected}"
            ),
            Self::InvalidChar { ch, row, col } => {
                write!(f, "map contains invalid character \u{201c}{ch}\u{201d} at ({row}, {col})")
            }
        }
    }
}

impl std::error::Error for MapError {}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "
        S..#.
        .#.#.
        ...#G
    ";

    #[test]
    fn parse_dimensions_and_flags() {
        let m = TileMap::parse(MAP, 20).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 5);
        assert_eq!(m.cell_size(), 20);
        assert_eq!(m.spawns(), vec![Cell::new(0, 0)]);
        assert_eq!(m.goals(), vec![Cell::new(2, 4)]);
        assert!(m.is_traversable(Cell::new(0, 0)));
        assert!(!m.is_traversable(Cell::new(0, 3)));
        assert!(!m.is_traversable(Cell::new(1, 1)));
        assert!(!m.is_traversable(Cell::new(5, 5)));
        assert_eq!(m.walkable_count(), 11);
    }

    #[test]
    fn display_round_trips() {
        let m = TileMap::parse(MAP, 20).unwrap();
        let text = m.to_string();
        let again = TileMap::parse(&text, 20).unwrap();
        assert_eq!(again.to_string(), text);
        assert!(text.starts_with("S..#.\n"));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(TileMap::parse("   \n\n", 10).unwrap_err(), MapError::Empty);
        assert_eq!(
            TileMap::parse("...\n..\n", 10).unwrap_err(),
            MapError::InconsistentWidth {
                line: 2,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            TileMap::parse("..\n.x\n", 10).unwrap_err(),
            MapError::InvalidChar {
                ch: 'x',
                row: 1,
                col: 1
            }
        );
    }

    #[test]
    fn toggling_bumps_revision() {
        let mut m = TileMap::new(GridLayout::new(3, 3, 10));
        assert_eq!(m.revision(), 0);
        assert_eq!(m.toggle_walkable(Cell::new(1, 1)), Some(false));
        assert_eq!(m.revision(), 1);
        assert!(!m.is_traversable(Cell::new(1, 1)));
        // No change, no bump.
        assert!(m.set_walkable(Cell::new(1, 1), false));
        assert_eq!(m.revision(), 1);
        assert_eq!(m.toggle_walkable(Cell::new(1, 1)), Some(true));
        assert_eq!(m.revision(), 2);
        assert_eq!(m.toggle_walkable(Cell::new(9, 9)), None);
        assert!(!m.set_walkable(Cell::new(-1, 0), true));
    }

    #[test]
    fn with_layout_keeps_dimensions() {
        let m = TileMap::parse(MAP, 20).unwrap();
        let moved = m.with_layout(GridLayout::centered(3, 5, 20, 200, 100));
        assert_eq!(moved.layout().origin(), crate::Point::new(50, 20));
        assert!(moved.is_walkable_at(60.0, 30.0));
        let same = moved.with_layout(GridLayout::new(4, 4, 20));
        assert_eq!(same.rows(), 3);
        assert_eq!(same.layout().origin(), crate::Point::new(50, 20));
    }

    #[test]
    fn spawn_and_goal_setters() {
        let mut m = TileMap::new(GridLayout::new(2, 2, 10));
        assert!(m.set_spawn(Cell::new(0, 1), true));
        assert!(m.set_goal(Cell::new(1, 0), true));
        assert!(!m.set_goal(Cell::new(2, 0), true));
        assert_eq!(m.spawns(), vec![Cell::new(0, 1)]);
        assert_eq!(m.goals(), vec![Cell::new(1, 0)]);
        m.fill_walkable(false);
        assert_eq!(m.walkable_count(), 0);
    }
}
