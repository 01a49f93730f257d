//! Board and per-tick contact resolution
//!
//! Each tick every obstacle gets up to `max_contact_passes` attempts to
//! resolve its contact with the ball. Every pass visits the still-unresolved
//! obstacles nearest-first, measured against the ball as it is at that moment,
//! so a correction made by one wall is seen by the walls after it.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::obstacle::{Obstacle, Resolution};
use super::stage::{Stage, StageError};
use crate::tuning::Tuning;

/// Per-obstacle bookkeeping for one resolution, indexed like `Board::obstacles`
#[derive(Debug, Clone, Copy)]
struct PassState {
    unhandled: bool,
    stage: u32,
}

/// What one resolution did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Sweeps over the unresolved set
    pub passes: u32,
    /// Total `Obstacle::interact` calls
    pub interactions: u32,
    /// A wall corrected the ball
    pub wall_hit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u32,
    pub height: u32,
    pub obstacles: Vec<Obstacle>,
}

#[derive(Debug, Clone)]
pub struct Board {
    width: u32,
    height: u32,
    obstacles: Vec<Obstacle>,
}

impl Board {
    /// Build a board from a text layout
    pub fn new(width: u32, height: u32, layout: &str) -> Result<Self, StageError> {
        Ok(Self::from_stage(&Stage::parse(width, height, layout)?))
    }

    pub fn from_stage(stage: &Stage) -> Self {
        log::info!(
            "Board {}x{} with {} obstacles",
            stage.width,
            stage.height,
            stage.obstacles.len()
        );
        Self {
            width: stage.width,
            height: stage.height,
            obstacles: stage.obstacles.clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Resolve all obstacle contacts against the ball for this tick
    pub fn interact(&self, ball: &mut Ball, tuning: &Tuning) -> ResolutionReport {
        let max_stage = tuning.max_contact_passes();
        let mut res = Resolution::new(tuning);
        let mut passes = vec![
            PassState {
                unhandled: true,
                stage: 0,
            };
            self.obstacles.len()
        ];
        let mut report = ResolutionReport::default();
        let mut order: Vec<usize> = Vec::with_capacity(self.obstacles.len());

        while passes.iter().any(|p| p.unhandled && p.stage < max_stage) {
            order.clear();
            order.extend((0..self.obstacles.len()).filter(|&i| passes[i].unhandled));
            // Measured to the cell origin; stable sort keeps row-major order on ties
            let pos = ball.pos;
            order.sort_by(|&a, &b| {
                let da = self.obstacles[a].origin().distance_squared(pos);
                let db = self.obstacles[b].origin().distance_squared(pos);
                da.total_cmp(&db)
            });

            for &i in &order {
                let handled = self.obstacles[i].interact(ball, passes[i].stage, &mut res);
                passes[i].unhandled = !handled;
                passes[i].stage += 1;
                report.interactions += 1;
            }
            report.passes += 1;
        }

        report.wall_hit = res.wall_hit;
        log::trace!(
            "Resolution: {} passes, {} interactions",
            report.passes,
            report.interactions
        );
        report
    }

    /// Whether a point lies on the board (edges included)
    pub fn contains(&self, pos: glam::DVec2) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= self.width as f64 && pos.y <= self.height as f64
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            width: self.width,
            height: self.height,
            obstacles: self.obstacles.clone(),
        }
    }
}
