//! The ball: a point mass with momentum

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Position handed to renderers. Velocity and acceleration stay private to the sim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Position in cells (cell (0, 0) spans [0, 1) x [0, 1))
    pub pos: DVec2,
    pub vel: DVec2,
    /// Held tilt; persists across ticks until the control changes
    pub accel: DVec2,
    /// Ball has left play (fell in a hole or rolled off the board)
    pub gone: bool,
}

impl Ball {
    pub fn new(pos: DVec2) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            accel: DVec2::ZERO,
            gone: false,
        }
    }

    /// Integrate one tick: damp velocity, add acceleration, then move
    pub fn update(&mut self, dt: f64, damping: f64) {
        self.vel = self.vel * damping + self.accel * dt;
        self.pos += self.vel * dt;
    }

    pub fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            x: self.pos.x,
            y: self.pos.y,
        }
    }
}
