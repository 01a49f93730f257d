//! Text stage format
//!
//! A stage is a grid of symbols, one row per line:
//! - `W` wall
//! - `H` hole
//! - `B` ball start (first marker wins)
//! - anything else is open floor
//!
//! Line breaks are dropped before the grid is checked, so leading and
//! trailing newlines are harmless.

use core::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleKind};
use crate::consts::DEFAULT_BALL_START;
use crate::cell_center;

/// Ball start marker
pub const BALL_SYMBOL: char = 'B';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageError {
    ZeroDimension { width: u32, height: u32 },
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { width, height } => {
                write!(f, "stage dimensions must be positive: {width}x{height}")
            }
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "stage is not valid for its width / height: expected {expected} cells, got {actual}"
            ),
        }
    }
}

impl std::error::Error for StageError {}

/// A validated stage, ready to build any number of games from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub width: u32,
    pub height: u32,
    /// Obstacles in row-major order
    pub obstacles: Vec<Obstacle>,
    pub ball_start: DVec2,
}

impl Stage {
    pub fn parse(width: u32, height: u32, layout: &str) -> Result<Self, StageError> {
        if width == 0 || height == 0 {
            return Err(StageError::ZeroDimension { width, height });
        }

        let cells: Vec<char> = layout.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(StageError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }

        let mut obstacles = Vec::new();
        let mut ball_start = None;
        for (i, symbol) in cells.iter().enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            if let Some(kind) = ObstacleKind::from_symbol(*symbol) {
                obstacles.push(Obstacle::new(x, y, kind));
            } else if *symbol == BALL_SYMBOL && ball_start.is_none() {
                ball_start = Some(cell_center(x, y));
            }
        }

        Ok(Self {
            width,
            height,
            obstacles,
            ball_start: ball_start.unwrap_or(DEFAULT_BALL_START),
        })
    }

    /// Render back to the text format (ball marker included)
    pub fn to_layout(&self) -> String {
        let w = self.width as usize;
        let mut grid = vec!['_'; w * self.height as usize];
        for obstacle in &self.obstacles {
            grid[obstacle.y as usize * w + obstacle.x as usize] = obstacle.kind.symbol();
        }
        let start = self.ball_start.floor();
        if start.x >= 0.0 && start.y >= 0.0 {
            let (bx, by) = (start.x as usize, start.y as usize);
            if bx < w && by < self.height as usize && grid[by * w + bx] == '_' {
                grid[by * w + bx] = BALL_SYMBOL;
            }
        }
        grid.chunks(w)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
