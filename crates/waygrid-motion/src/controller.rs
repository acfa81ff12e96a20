//! Frame-by-frame waypoint following.
//!
//! The controller moves each axis independently towards the current
//! waypoint at the given speed, clamping so it never overshoots. Arrival is
//! exact: a waypoint is reached when the position equals it on both axes.

use std::f64::consts::FRAC_PI_2;

use waygrid_core::Vec2;

/// Movement state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveState {
    /// Between waypoints, or holding at the end of a partial route.
    #[default]
    AwaitingNextWaypoint,
    Traveling,
    /// Reached the last waypoint of a complete route. Terminal.
    Arrived,
}

/// Result of one [`MovementController::tick`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveStatus {
    Moving,
    Arrived,
}

/// Follows a list of pixel-space waypoints.
#[derive(Clone, Debug)]
pub struct MovementController {
    position: Vec2,
    heading: f64,
    waypoints: Vec<Vec2>,
    index: usize,
    target: Option<Vec2>,
    complete: bool,
    /// The target is not part of the installed route.
    detour: bool,
    state: MoveState,
}

#[inline]
fn sign(d: f64) -> f64 {
    if d > 0.0 {
        1.0
    } else if d < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// One axis of movement: `(new coordinate, direction)`.
#[inline]
fn step_axis(from: f64, to: f64, step: f64) -> (f64, f64) {
    let d = to - from;
    let s = sign(d);
    if s == 0.0 || step <= 0.0 {
        (from, 0.0)
    } else if step >= d.abs() {
        (to, s)
    } else {
        (from + s * step, s)
    }
}

/// Index of the waypoint after the one closest to `target`, clamped to the
/// last waypoint.
fn resume_index(waypoints: &[Vec2], target: Vec2) -> usize {
    let closest = waypoints
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.distance(target).total_cmp(&b.distance(target)))
        .map_or(0, |(i, _)| i);
    (closest + 1).min(waypoints.len().saturating_sub(1))
}

impl MovementController {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            heading: 0.0,
            waypoints: Vec::new(),
            index: 0,
            target: None,
            complete: false,
            detour: false,
            state: MoveState::AwaitingNextWaypoint,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Heading in radians, measured from facing up (negative y).
    #[inline]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[inline]
    pub fn state(&self) -> MoveState {
        self.state
    }

    #[inline]
    pub fn waypoint_index(&self) -> usize {
        self.index
    }

    /// The waypoint currently being approached or last reached.
    #[inline]
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    #[inline]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Whether the installed route ends at the goal.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Waypoints from the current index on.
    pub fn remaining(&self) -> &[Vec2] {
        &self.waypoints[self.index.min(self.waypoints.len())..]
    }

    /// Move to `position` without traveling.
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Install a new route. `complete` is false for a partial route of a
    /// search still in progress.
    ///
    /// A reached target that appears in the new route resumes at the
    /// waypoint after it. A target still being approached is kept; when it
    /// is missing from the new route the controller finishes the step to it
    /// and then resumes after the new waypoint closest to it. Nothing is
    /// installed once the controller has arrived.
    pub fn follow(&mut self, waypoints: Vec<Vec2>, complete: bool) {
        if self.state == MoveState::Arrived {
            return;
        }
        self.detour = false;
        if let Some(target) = self.target {
            let reached = self.state == MoveState::AwaitingNextWaypoint;
            match waypoints.iter().position(|&w| w == target) {
                Some(i) if reached => self.index = i + 1,
                Some(i) => self.index = i,
                None => {
                    self.index = resume_index(&waypoints, target);
                    self.detour = !reached;
                }
            }
        } else {
            self.index = 0;
        }
        self.waypoints = waypoints;
        self.complete = complete;
    }

    /// Drop the route and hold in place.
    pub fn stop(&mut self) {
        if self.state == MoveState::Arrived {
            return;
        }
        self.waypoints.clear();
        self.index = 0;
        self.target = None;
        self.detour = false;
        self.complete = false;
        self.state = MoveState::AwaitingNextWaypoint;
    }

    /// Advance by `dt` seconds at `speed` pixels per second.
    pub fn tick(&mut self, dt: f64, speed: f64) -> MoveStatus {
        match self.state {
            MoveState::Arrived => return MoveStatus::Arrived,
            MoveState::AwaitingNextWaypoint => match self.waypoints.get(self.index) {
                Some(&next) => {
                    log::trace!("waypoint {} -> {next}", self.index);
                    self.target = Some(next);
                    self.state = MoveState::Traveling;
                }
                None => return MoveStatus::Moving,
            },
            MoveState::Traveling => {
                if let Some(target) = self.target {
                    let step = speed * dt;
                    let (x, sx) = step_axis(self.position.x, target.x, step);
                    let (y, sy) = step_axis(self.position.y, target.y, step);
                    if sx != 0.0 || sy != 0.0 {
                        self.heading = sy.atan2(sx) + FRAC_PI_2;
                    }
                    self.position = Vec2::new(x, y);
                }
            }
        }

        if self.target == Some(self.position) {
            if self.detour {
                self.detour = false;
                self.state = MoveState::AwaitingNextWaypoint;
                return MoveStatus::Moving;
            }
            if self.complete && self.index + 1 >= self.waypoints.len() {
                self.state = MoveState::Arrived;
                return MoveStatus::Arrived;
            }
            self.index += 1;
            self.state = MoveState::AwaitingNextWaypoint;
        }
        MoveStatus::Moving
    }
}
