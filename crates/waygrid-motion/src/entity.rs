//! Entity capabilities.

use waygrid_paths::Footprint;

/// Default walking speed in pixels per second.
pub const DEFAULT_SPEED: f64 = 75.0;

/// Default node expansions per search batch.
pub const DEFAULT_STEP_LIMIT: usize = 25;

/// Anything the simulation tracks.
pub trait Entity {
    /// Identifier used in logs and report file names.
    fn number(&self) -> u32;

    /// Whether search reports are written for this entity.
    fn debug_enabled(&self) -> bool {
        false
    }
}

/// An entity that plans routes and walks them.
pub trait Mover: Entity {
    /// Speed in pixels per second, applied to each axis independently.
    fn speed(&self) -> f64;

    /// Bounding box used for line-of-sight checks.
    fn footprint(&self) -> Footprint {
        Footprint::POINT
    }

    /// Node expansions per search batch; 0 searches to completion at once.
    fn step_limit(&self) -> usize {
        DEFAULT_STEP_LIMIT
    }
}

/// A plain walking [`Mover`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Walker {
    number: u32,
    speed: f64,
    footprint: Footprint,
    step_limit: usize,
    debug: bool,
}

impl Walker {
    /// A walker with default speed and step limit and a footprint a quarter
    /// of `cell_size` wide.
    pub fn new(number: u32, cell_size: i32) -> Self {
        Self {
            number,
            speed: DEFAULT_SPEED,
            footprint: Footprint::cell_fraction(cell_size, 0.25),
            step_limit: DEFAULT_STEP_LIMIT,
            debug: false,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    pub fn with_footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = footprint;
        self
    }

    pub fn with_step_limit(mut self, steps: usize) -> Self {
        self.step_limit = steps;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl Entity for Walker {
    fn number(&self) -> u32 {
        self.number
    }

    fn debug_enabled(&self) -> bool {
        self.debug
    }
}

impl Mover for Walker {
    fn speed(&self) -> f64 {
        self.speed
    }

    fn footprint(&self) -> Footprint {
        self.footprint
    }

    fn step_limit(&self) -> usize {
        self.step_limit
    }
}
