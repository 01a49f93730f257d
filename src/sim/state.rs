//! Game state: one ball on one board
//!
//! A `Game` is never reset. When a stage ends the driver builds a new one.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallSnapshot};
use super::board::{Board, BoardSnapshot};
use super::stage::{Stage, StageError};
use crate::tuning::Tuning;

/// Why the ball left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exit {
    /// Fell into a hole
    Hole,
    /// Rolled off the edge of the board
    Escaped,
}

/// Read-only view for renderers and stage sequencing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub ball: BallSnapshot,
    pub board: BoardSnapshot,
    pub ended: bool,
    /// `None` while playing
    pub won: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Game {
    ball: Ball,
    board: Board,
    tuning: Tuning,
    ended: bool,
    exit: Option<Exit>,
    /// Simulation tick counter
    time_ticks: u64,
}

impl Game {
    pub fn new(width: u32, height: u32, layout: &str) -> Result<Self, StageError> {
        Ok(Self::from_stage(
            &Stage::parse(width, height, layout)?,
            Tuning::default(),
        ))
    }

    pub fn with_tuning(
        width: u32,
        height: u32,
        layout: &str,
        tuning: Tuning,
    ) -> Result<Self, StageError> {
        Ok(Self::from_stage(&Stage::parse(width, height, layout)?, tuning))
    }

    pub fn from_stage(stage: &Stage, tuning: Tuning) -> Self {
        Self {
            ball: Ball::new(stage.ball_start),
            board: Board::from_stage(stage),
            tuning,
            ended: false,
            exit: None,
            time_ticks: 0,
        }
    }

    /// Set the held tilt. Last write wins.
    pub fn change_control(&mut self, ax: f64, ay: f64) {
        self.ball.accel = DVec2::new(ax, ay);
    }

    /// Advance the simulation by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        // Ball is frozen once the game is over
        if self.ended {
            return;
        }
        self.time_ticks += 1;

        self.ball.update(dt, self.tuning.damping());
        self.board.interact(&mut self.ball, &self.tuning);

        if self.ball.gone {
            self.exit = Some(Exit::Hole);
        } else if !self.board.contains(self.ball.pos) {
            self.ball.gone = true;
            self.exit = Some(Exit::Escaped);
        }

        if self.ball.gone {
            self.ended = true;
            log::info!(
                "Game ended after {} ticks: {:?} at {}",
                self.time_ticks,
                self.exit,
                self.ball.pos
            );
        }
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// `Some(true)` for escaping the board, `Some(false)` for a hole
    pub fn won(&self) -> Option<bool> {
        self.exit.map(|exit| exit == Exit::Escaped)
    }

    /// Ticks simulated so far; stops counting once the game has ended
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn exit(&self) -> Option<Exit> {
        self.exit
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Mutable ball access for drivers that place or launch the ball
    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            ball: self.ball.snapshot(),
            board: self.board.snapshot(),
            ended: self.ended,
            won: self.won(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_control_is_held() {
        let mut game = Game::new(20, 1, &"_".repeat(20)).unwrap();
        game.change_control(1.0, 0.0);
        game.change_control(2.0, 0.0);
        game.update(SIM_DT);
        game.update(SIM_DT);
        assert_eq!(game.ball().accel, DVec2::new(2.0, 0.0));
        assert!(game.ball().vel.x > 0.0399);
    }

    #[test]
    fn test_hole_ends_game_lost() {
        let mut game = Game::new(3, 1, "B_H").unwrap();
        game.change_control(20.0, 0.0);
        for _ in 0..200 {
            game.update(SIM_DT);
        }
        assert!(game.ended());
        assert_eq!(game.exit(), Some(Exit::Hole));
        assert_eq!(game.won(), Some(false));
    }

    #[test]
    fn test_escape_ends_game_won() {
        let mut game = Game::new(3, 1, "B__").unwrap();
        game.change_control(20.0, 0.0);
        for _ in 0..200 {
            game.update(SIM_DT);
        }
        assert!(game.ended());
        assert_eq!(game.won(), Some(true));
        assert!(game.ball().pos.x > 3.0);
    }

    #[test]
    fn test_ended_is_one_shot() {
        let mut game = Game::new(2, 1, "BH").unwrap();
        game.change_control(30.0, 0.0);
        while !game.ended() {
            game.update(SIM_DT);
        }
        let frozen = game.ball().pos;
        let ticks = game.time_ticks();

        game.change_control(-30.0, 0.0);
        for _ in 0..50 {
            game.update(SIM_DT);
            assert!(game.ended());
        }
        assert_eq!(game.ball().pos, frozen);
        assert_eq!(game.time_ticks(), ticks);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let game = Game::new(2, 1, "WH").unwrap();
        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["ball"]["x"], 0.5);
        assert_eq!(json["board"]["obstacles"][0]["kind"], "wall");
        assert_eq!(json["board"]["obstacles"][1]["kind"], "hole");
        assert_eq!(json["board"]["obstacles"][1]["x"], 1);
        assert_eq!(json["ended"], false);
        assert!(json["won"].is_null());
    }
}
