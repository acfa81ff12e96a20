//! Incremental pathfinding on 2D grids.
//!
//! The centerpiece is [`Pathfinder`], a per-entity A* search that can be
//! advanced a bounded number of node expansions at a time and exposes a
//! line-of-sight smoothed route once (or while) it runs:
//!
//! ```
//! use waygrid_core::{Cell, GridLayout, TileMap};
//! use waygrid_paths::{Pathfinder, SearchConfig, SearchStatus};
//!
//! let map = TileMap::new(GridLayout::new(5, 5, 20));
//! let mut pf = Pathfinder::new(SearchConfig::default());
//! pf.new_search(&map, Cell::new(0, 0), Cell::new(4, 4)).unwrap();
//! assert_eq!(pf.advance(&map), SearchStatus::Succeeded);
//! assert_eq!(pf.route(), &[Cell::new(0, 0), Cell::new(4, 4)]);
//! ```
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | step costs |
//! | [`AstarPather`] : [`WeightedPather`] | admissible estimate |
//!
//! [`GridPather`] implements all three over any [`GridQuery`] with octile
//! costs ([`STRAIGHT_COST`], [`DIAGONAL_COST`]).
//!
//! [`GridQuery`]: waygrid_core::GridQuery

mod distance;
mod heap;
mod node;
mod report;
mod search;
mod smooth;
mod traits;

pub use distance::{DIAGONAL_COST, STRAIGHT_COST, octile, path_cost, step_cost};
pub use heap::IndexedHeap;
pub use node::{NodeArena, NodeId, NodeState, SearchNode};
pub use report::{ReportEntry, SearchReport};
pub use search::{Pathfinder, SearchConfig, SearchError, SearchStatus};
pub use smooth::{Footprint, MAX_SAMPLE_FRACTION, center_of, line_of_sight, sample_segment, smooth};
pub use traits::{AstarPather, GridPather, Pather, WeightedPather};
