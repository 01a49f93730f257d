//! Grid obstacles and their contact responses

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{HALF_CELL, bounce, corner_contact, face_contact};
use crate::cell_center;
use crate::tuning::Tuning;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Solid cell with rounded corners
    Wall,
    /// Swallows the ball once its centre is inside the cell
    Hole,
}

impl ObstacleKind {
    pub fn symbol(&self) -> char {
        match self {
            ObstacleKind::Wall => 'W',
            ObstacleKind::Hole => 'H',
        }
    }

    /// Unknown symbols map to no obstacle
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'W' => Some(ObstacleKind::Wall),
            'H' => Some(ObstacleKind::Hole),
            _ => None,
        }
    }
}

/// An obstacle occupying one grid cell. Immutable once the board is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: u32,
    pub y: u32,
    pub kind: ObstacleKind,
}

/// State shared by every obstacle during one board resolution
#[derive(Debug)]
pub struct Resolution<'a> {
    pub tuning: &'a Tuning,
    /// Set once any wall has corrected the ball this tick
    pub wall_hit: bool,
}

impl<'a> Resolution<'a> {
    pub fn new(tuning: &'a Tuning) -> Self {
        Self {
            tuning,
            wall_hit: false,
        }
    }
}

impl Obstacle {
    pub fn new(x: u32, y: u32, kind: ObstacleKind) -> Self {
        Self { x, y, kind }
    }

    pub fn center(&self) -> DVec2 {
        cell_center(self.x, self.y)
    }

    /// Top-left corner of the cell; the reference point for nearest-first ordering
    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.x as f64, self.y as f64)
    }

    /// Run one contact attempt against the ball
    ///
    /// `stage` is the number of earlier attempts this tick. Returns true when
    /// the obstacle is done for this tick.
    pub fn interact(&self, ball: &mut Ball, stage: u32, res: &mut Resolution<'_>) -> bool {
        match self.kind {
            ObstacleKind::Wall => self.interact_wall(ball, stage, res),
            ObstacleKind::Hole => self.interact_hole(ball),
        }
    }

    fn interact_wall(&self, ball: &mut Ball, stage: u32, res: &mut Resolution<'_>) -> bool {
        // Only one wall per tick may touch the ball, and none once it fell in
        if res.wall_hit || ball.gone {
            return true;
        }

        let radius = res.tuning.ball_radius();
        let contact = match stage {
            0 => face_contact(ball.pos, self.center(), radius),
            1 => corner_contact(ball.pos, self.center(), radius),
            _ => return true,
        };

        let Some(contact) = contact else {
            return false;
        };

        if let Some(pos) = contact.resolved_pos {
            log::debug!("Wall ({}, {}) face contact, normal {}", self.x, self.y, contact.normal);
            ball.pos = pos;
        } else {
            log::debug!("Wall ({}, {}) corner contact, normal {}", self.x, self.y, contact.normal);
        }
        ball.vel = bounce(ball.vel, contact.normal, res.tuning.restitution());
        res.wall_hit = true;
        true
    }

    fn interact_hole(&self, ball: &mut Ball) -> bool {
        let offset = (ball.pos - self.center()).abs();
        if ball.gone || offset.x >= HALF_CELL || offset.y >= HALF_CELL {
            return false;
        }

        log::debug!("Ball fell into hole ({}, {})", self.x, self.y);
        ball.gone = true;
        ball.vel = DVec2::ZERO;
        ball.accel = DVec2::ZERO;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving_ball(pos: DVec2, vel: DVec2) -> Ball {
        let mut ball = Ball::new(pos);
        ball.vel = vel;
        ball
    }

    #[test]
    fn test_symbols() {
        assert_eq!(ObstacleKind::from_symbol('W'), Some(ObstacleKind::Wall));
        assert_eq!(ObstacleKind::from_symbol('H'), Some(ObstacleKind::Hole));
        assert_eq!(ObstacleKind::from_symbol('_'), None);
        assert_eq!(ObstacleKind::from_symbol('B'), None);
        assert_eq!(ObstacleKind::Wall.symbol(), 'W');
    }

    #[test]
    fn test_wall_face_bounce() {
        let tuning = Tuning::default();
        let mut res = Resolution::new(&tuning);
        let wall = Obstacle::new(2, 0, ObstacleKind::Wall);
        let mut ball = moving_ball(DVec2::new(1.55, 0.5), DVec2::new(3.0, 0.0));

        assert!(wall.interact(&mut ball, 0, &mut res));
        assert!(res.wall_hit);
        assert_eq!(ball.pos, DVec2::new(1.5, 0.5));
        assert_eq!(ball.vel, DVec2::new(-1.5, 0.0));
    }

    #[test]
    fn test_wall_miss_requeues() {
        let tuning = Tuning::default();
        let mut res = Resolution::new(&tuning);
        let wall = Obstacle::new(4, 4, ObstacleKind::Wall);
        let mut ball = moving_ball(DVec2::new(0.5, 0.5), DVec2::new(1.0, 1.0));

        assert!(!wall.interact(&mut ball, 0, &mut res));
        assert!(!wall.interact(&mut ball, 1, &mut res));
        assert!(wall.interact(&mut ball, 2, &mut res));
        assert!(!res.wall_hit);
        assert_eq!(ball.vel, DVec2::new(1.0, 1.0));
    }

    #[test]
    fn test_wall_suppressed_after_hit() {
        let tuning = Tuning::default();
        let mut res = Resolution::new(&tuning);
        res.wall_hit = true;
        let wall = Obstacle::new(2, 0, ObstacleKind::Wall);
        let mut ball = moving_ball(DVec2::new(1.55, 0.5), DVec2::new(3.0, 0.0));

        assert!(wall.interact(&mut ball, 0, &mut res));
        assert_eq!(ball.pos, DVec2::new(1.55, 0.5));
        assert_eq!(ball.vel, DVec2::new(3.0, 0.0));
    }

    #[test]
    fn test_wall_ignores_swallowed_ball() {
        let tuning = Tuning::default();
        let mut res = Resolution::new(&tuning);
        let wall = Obstacle::new(2, 0, ObstacleKind::Wall);
        let mut ball = moving_ball(DVec2::new(1.55, 0.5), DVec2::ZERO);
        ball.gone = true;

        assert!(wall.interact(&mut ball, 0, &mut res));
        assert!(!res.wall_hit);
        assert_eq!(ball.pos, DVec2::new(1.55, 0.5));
    }

    #[test]
    fn test_contact_moving_away_still_counts() {
        let tuning = Tuning::default();
        let mut res = Resolution::new(&tuning);
        let wall = Obstacle::new(2, 0, ObstacleKind::Wall);
        let mut ball = moving_ball(DVec2::new(1.6, 0.5), DVec2::new(-1.0, 0.0));

        assert!(wall.interact(&mut ball, 0, &mut res));
        assert!(res.wall_hit);
        assert_eq!(ball.vel, DVec2::new(-1.0, 0.0));
        assert_eq!(ball.pos.x, 1.5);
    }

    #[test]
    fn test_hole_swallows_ball() {
        let hole = Obstacle::new(1, 1, ObstacleKind::Hole);
        let mut ball = moving_ball(DVec2::new(1.2, 1.9), DVec2::new(0.5, 0.0));
        ball.accel = DVec2::new(1.0, 1.0);

        assert!(hole.interact_hole(&mut ball));
        assert!(ball.gone);
        assert_eq!(ball.vel, DVec2::ZERO);
        assert_eq!(ball.accel, DVec2::ZERO);
    }

    #[test]
    fn test_hole_edge_is_safe() {
        let hole = Obstacle::new(1, 1, ObstacleKind::Hole);
        let mut ball = moving_ball(DVec2::new(2.0, 1.5), DVec2::ZERO);
        assert!(!hole.interact_hole(&mut ball));
        assert!(!ball.gone);
    }
}
