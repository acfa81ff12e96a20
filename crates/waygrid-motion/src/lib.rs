//! Moving entities along planned routes.
//!
//! [`MovementController`] consumes a waypoint list one frame at a time,
//! producing position and heading. [`Agent`] ties a controller to a
//! [`Pathfinder`](waygrid_paths::Pathfinder) for one [`Mover`], advancing the
//! search, feeding routes to the controller and replanning when the grid
//! changes under it.

mod agent;
mod controller;
mod entity;

pub use agent::{Agent, AgentStatus};
pub use controller::{MoveState, MoveStatus, MovementController};
pub use entity::{DEFAULT_SPEED, DEFAULT_STEP_LIMIT, Entity, Mover, Walker};
