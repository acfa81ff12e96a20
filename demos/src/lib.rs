//! Headless walker simulation shared by the demo binaries.
//!
//! Walkers spawn on the map's spawn tiles, plan their way to a goal tile and
//! walk there while the simulation occasionally flips random cells between
//! floor and wall, forcing replans.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use rand::{Rng, RngExt, SeedableRng};
use serde::{Deserialize, Serialize};
use waygrid_core::{Cell, GridLayout, GridQuery, MapError, TileMap};
use waygrid_motion::{Agent, AgentStatus, Walker};

pub const DEFAULT_MAP: &str = "\
S.........#.........
..........#.........
...####...#...####..
...#..........#.....
...#...######.#.....
.......#....#.......
.......#....#...###.
..###..#.........#..
.......######....#..
.................#.G
S......#.........#..
.......#...........G";

/// Simulation parameters. Every field has a default, so a JSON file only
/// needs the fields it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Canvas the grid is centered in, in pixels.
    pub canvas_width: i32,
    pub canvas_height: i32,
    pub cell_size: i32,
    /// Text map: `.` floor, `#` wall, `S` spawn, `G` goal.
    pub map: String,
    pub walkers: u32,
    /// Pixels per second.
    pub speed: f64,
    /// Node expansions per walker per tick.
    pub step_limit: usize,
    /// Ticks per simulated second.
    pub tick_rate: f64,
    /// Upper bound on ticks to run.
    pub ticks: usize,
    /// Flip a random cell every this many ticks; 0 disables.
    pub toggle_every: usize,
    /// Write a search report per walker.
    pub debug: bool,
    pub report_dir: PathBuf,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            cell_size: 20,
            map: DEFAULT_MAP.to_string(),
            walkers: 4,
            speed: waygrid_motion::DEFAULT_SPEED,
            step_limit: waygrid_motion::DEFAULT_STEP_LIMIT,
            tick_rate: 60.0,
            ticks: 5000,
            toggle_every: 90,
            debug: false,
            report_dir: PathBuf::from("reports"),
            seed: 7,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        if self.tick_rate > 0.0 {
            1.0 / self.tick_rate
        } else {
            1.0 / 60.0
        }
    }
}

/// Failure to set up a simulation.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    Map(MapError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read config: {e}"),
            Self::Parse(e) => write!(f, "invalid config: {e}"),
            Self::Map(e) => write!(f, "invalid map: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Map(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<MapError> for ConfigError {
    fn from(e: MapError) -> Self {
        Self::Map(e)
    }
}

/// Counters reported at the end of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimSummary {
    pub ticks: usize,
    pub spawned: u32,
    pub arrived: u32,
    pub stranded: u32,
    pub replans: usize,
    pub toggles: usize,
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks: {}/{} arrived, {} stranded, {} replans, {} cells toggled",
            self.ticks, self.arrived, self.spawned, self.stranded, self.replans, self.toggles
        )
    }
}

/// A map plus the walkers crossing it.
pub struct Simulation {
    config: SimConfig,
    map: TileMap,
    agents: Vec<Agent<Walker>>,
    rng: rand::rngs::StdRng,
    summary: SimSummary,
}

impl Simulation {
    /// Parse the map, center it on the canvas and spawn the walkers.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let parsed = TileMap::parse(&config.map, config.cell_size)?;
        let layout = GridLayout::centered(
            parsed.rows(),
            parsed.cols(),
            config.cell_size,
            config.canvas_width,
            config.canvas_height,
        );
        let map = parsed.with_layout(layout);
        let rng = rand::rngs::StdRng::seed_from_u64(config.seed);
        let mut sim = Self {
            config,
            map,
            agents: Vec::new(),
            rng,
            summary: SimSummary::default(),
        };
        sim.spawn_walkers();
        Ok(sim)
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Mutable access to the terrain, as player input would have.
    #[inline]
    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    #[inline]
    pub fn agents(&self) -> &[Agent<Walker>] {
        &self.agents
    }

    #[inline]
    pub fn summary(&self) -> SimSummary {
        self.summary
    }

    /// Whether every walker has arrived.
    pub fn is_finished(&self) -> bool {
        self.agents.is_empty()
    }

    fn spawn_walkers(&mut self) {
        let walkable: Vec<Cell> = self
            .map
            .layout()
            .cells()
            .filter(|&c| self.map.is_traversable(c))
            .collect();
        let mut spawns = self.map.spawns();
        if spawns.is_empty() {
            spawns = walkable.clone();
        }
        let mut goals = self.map.goals();
        if goals.is_empty() {
            goals = walkable;
        }

        for number in 1..=self.config.walkers {
            let (Some(start), Some(goal)) = (pick(&mut self.rng, &spawns), pick(&mut self.rng, &goals))
            else {
                log::warn!("no walkable cells to spawn walker {number} on");
                return;
            };
            let walker = Walker::new(number, self.config.cell_size)
                .with_speed(self.config.speed)
                .with_step_limit(self.config.step_limit)
                .with_debug(self.config.debug);
            match Agent::new(walker, &self.map, start, goal) {
                Ok(agent) => {
                    self.agents
                        .push(agent.with_report_dir(self.config.report_dir.clone()));
                    self.summary.spawned += 1;
                }
                Err(err) => log::warn!("walker {number} not spawned: {err}"),
            }
        }
        log::info!(
            "spawned {} walkers on a {}x{} map",
            self.summary.spawned,
            self.map.rows(),
            self.map.cols()
        );
    }

    /// Flip a random cell that is neither a spawn nor a goal.
    fn toggle_random_cell(&mut self) {
        let cell = Cell::new(
            self.rng.random_range(0..self.map.rows()),
            self.rng.random_range(0..self.map.cols()),
        );
        let Some(tile) = self.map.tile(cell) else {
            return;
        };
        if tile.spawn || tile.goal {
            return;
        }
        if let Some(walkable) = self.map.toggle_walkable(cell) {
            self.summary.toggles += 1;
            log::debug!("cell {cell} is now {}", if walkable { "floor" } else { "wall" });
        }
    }

    /// Advance the simulation by one tick. Returns the number of walkers
    /// still on the map.
    pub fn step(&mut self) -> usize {
        self.summary.ticks += 1;
        let every = self.config.toggle_every;
        if every > 0 && self.summary.ticks % every == 0 {
            self.toggle_random_cell();
        }

        let dt = self.config.dt();
        let map = &self.map;
        let summary = &mut self.summary;
        self.agents.retain_mut(|agent| {
            let before = agent.replans();
            let status = agent.tick(map, dt);
            summary.replans += agent.replans() - before;
            if status == AgentStatus::Arrived {
                summary.arrived += 1;
                false
            } else {
                true
            }
        });
        self.summary.stranded = self
            .agents
            .iter()
            .filter(|a| a.status() == AgentStatus::Stranded)
            .count() as u32;
        self.agents.len()
    }

    /// Step until every walker arrives or the tick budget runs out.
    pub fn run(&mut self) -> SimSummary {
        while self.summary.ticks < self.config.ticks && !self.is_finished() {
            self.step();
        }
        self.summary
    }
}

fn pick<R: Rng>(rng: &mut R, cells: &[Cell]) -> Option<Cell> {
    if cells.is_empty() {
        return None;
    }
    cells.get(rng.random_range(0..cells.len())).copied()
}
