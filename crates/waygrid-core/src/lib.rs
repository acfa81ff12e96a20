//! **waygrid-core**: grid addressing and geometry shared by the waygrid
//! crates.
//!
//! This crate provides pixel-space geometry primitives, the [`Cell`] address
//! type, the [`GridLayout`] that maps between cells and pixels, and the
//! read-only [`GridQuery`] surface pathfinding and movement consume. A
//! concrete, mutable [`TileMap`] implements that surface for tests, tools
//! and demos.

pub mod cell;
pub mod geom;
pub mod layout;
pub mod query;
pub mod tiles;

pub use cell::Cell;
pub use geom::{Point, Range, Vec2};
pub use layout::GridLayout;
pub use query::GridQuery;
pub use tiles::{MapError, Tile, TileMap};
