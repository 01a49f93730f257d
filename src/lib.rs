//! Tilt Maze - roll a ball through a grid of walls and holes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball kinematics, wall contacts, game state)
//! - `tuning`: Data-driven physics constants
//! - `progression`: Stage sequencing on top of `sim::Game`
//! - `platform`: Browser bindings

pub mod platform;
pub mod progression;
pub mod sim;
pub mod tuning;

pub use progression::{Advance, Campaign, CampaignError};
pub use sim::{Game, GameSnapshot, Stage, StageError};
pub use tuning::{Tuning, TuningError, TuningFile};

/// Game configuration constants
pub mod consts {
    use glam::DVec2;

    /// Fixed simulation timestep used by the drivers (100 Hz)
    pub const SIM_DT: f64 = 0.01;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Per-tick velocity retention (drag)
    pub const VELOCITY_DAMPING: f64 = 0.999;
    /// Fraction of the reflected velocity kept after a wall bounce
    pub const WALL_RESTITUTION: f64 = 0.5;
    /// Per-obstacle cap on contact retries within one tick
    pub const MAX_CONTACT_PASSES: u32 = 10;

    /// Ball radius in cells. Walls are unit cells, so contact happens within one cell of a wall centre.
    pub const BALL_RADIUS: f64 = 0.5;
    /// Ball start when the stage has no `B` marker
    pub const DEFAULT_BALL_START: DVec2 = DVec2::new(0.5, 0.5);
}

/// Centre of the grid cell at (x, y)
#[inline]
pub fn cell_center(x: u32, y: u32) -> glam::DVec2 {
    glam::DVec2::new(x as f64 + 0.5, y as f64 + 0.5)
}
