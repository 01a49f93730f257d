//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestep supplied by the caller, never read from a clock
//! - Stable iteration order (row-major, then by distance)
//! - No rendering or platform dependencies

pub mod ball;
pub mod board;
pub mod collision;
pub mod obstacle;
pub mod stage;
pub mod state;

pub use ball::{Ball, BallSnapshot};
pub use board::{Board, BoardSnapshot, ResolutionReport};
pub use collision::{Contact, bounce, corner_contact, face_contact, reflect_velocity};
pub use obstacle::{Obstacle, ObstacleKind, Resolution};
pub use stage::{Stage, StageError};
pub use state::{Exit, Game, GameSnapshot};
