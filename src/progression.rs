//! Stage progression
//!
//! Walks an ordered list of stages. Winning a stage moves to the next one,
//! losing restarts it. Either way the old `Game` is dropped and a fresh one is
//! built; the held tilt carries over so input does not glitch across stages.

use core::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Game, GameSnapshot, Stage, StageError};
use crate::tuning::Tuning;

/// A stage as written in a campaign file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDef {
    pub width: u32,
    pub height: u32,
    pub layout: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CampaignError {
    NoStages,
    Stage { index: usize, source: StageError },
    Parse(String),
}

impl fmt::Display for CampaignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStages => write!(f, "campaign has no stages"),
            Self::Stage { index, source } => write!(f, "stage {index}: {source}"),
            Self::Parse(msg) => write!(f, "invalid campaign json: {msg}"),
        }
    }
}

impl std::error::Error for CampaignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stage { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result of `Campaign::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Current game still running
    Playing,
    /// Stage won, now on the given stage
    NextStage(usize),
    /// Stage lost, restarted the given stage
    Retry(usize),
    /// Last stage won
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub stage_index: usize,
    pub stage_count: usize,
    /// Attempts on the current stage, starting at 1
    pub attempt: u32,
    pub completed: bool,
    pub game: GameSnapshot,
}

#[derive(Debug, Clone)]
pub struct Campaign {
    stages: Vec<Stage>,
    tuning: Tuning,
    index: usize,
    attempt: u32,
    completed: bool,
    control: DVec2,
    game: Game,
}

impl Campaign {
    pub fn new(stages: Vec<Stage>, tuning: Tuning) -> Result<Self, CampaignError> {
        let first = stages.first().ok_or(CampaignError::NoStages)?;
        let game = Game::from_stage(first, tuning);
        log::info!("Campaign with {} stages", stages.len());
        Ok(Self {
            stages,
            tuning,
            index: 0,
            attempt: 1,
            completed: false,
            control: DVec2::ZERO,
            game,
        })
    }

    /// Build from stage definitions, validating each one
    pub fn from_defs(defs: &[StageDef], tuning: Tuning) -> Result<Self, CampaignError> {
        let stages = defs
            .iter()
            .enumerate()
            .map(|(index, def)| {
                Stage::parse(def.width, def.height, &def.layout)
                    .map_err(|source| CampaignError::Stage { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stages, tuning)
    }

    /// Parse a JSON array of `{ "width", "height", "layout" }`
    pub fn from_json(json: &str, tuning: Tuning) -> Result<Self, CampaignError> {
        let defs: Vec<StageDef> =
            serde_json::from_str(json).map_err(|e| CampaignError::Parse(e.to_string()))?;
        Self::from_defs(&defs, tuning)
    }

    pub fn change_control(&mut self, ax: f64, ay: f64) {
        self.control = DVec2::new(ax, ay);
        self.game.change_control(ax, ay);
    }

    pub fn update(&mut self, dt: f64) {
        self.game.update(dt);
    }

    /// Replace a finished game with the next one
    pub fn advance(&mut self) -> Advance {
        if self.completed {
            return Advance::Completed;
        }
        let Some(won) = self.game.won() else {
            return Advance::Playing;
        };

        if won {
            if self.index + 1 == self.stages.len() {
                self.completed = true;
                log::info!("Campaign completed");
                return Advance::Completed;
            }
            self.index += 1;
            self.attempt = 1;
            log::info!("Stage {} cleared, starting stage {}", self.index - 1, self.index);
            self.restart();
            Advance::NextStage(self.index)
        } else {
            self.attempt += 1;
            log::info!("Stage {} lost, attempt {}", self.index, self.attempt);
            self.restart();
            Advance::Retry(self.index)
        }
    }

    fn restart(&mut self) {
        self.game = Game::from_stage(&self.stages[self.index], self.tuning);
        self.game.change_control(self.control.x, self.control.y);
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn stage_index(&self) -> usize {
        self.index
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn snapshot(&self) -> CampaignSnapshot {
        CampaignSnapshot {
            stage_index: self.index,
            stage_count: self.stages.len(),
            attempt: self.attempt,
            completed: self.completed,
            game: self.game.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_campaign_rejected() {
        assert_eq!(
            Campaign::new(Vec::new(), Tuning::default()).unwrap_err(),
            CampaignError::NoStages
        );
    }

    #[test]
    fn test_bad_stage_reports_index() {
        let json = r#"[
            { "width": 2, "height": 1, "layout": "B_" },
            { "width": 2, "height": 2, "layout": "B_" }
        ]"#;
        let err = Campaign::from_json(json, Tuning::default()).unwrap_err();
        assert_eq!(
            err,
            CampaignError::Stage {
                index: 1,
                source: StageError::LengthMismatch {
                    expected: 4,
                    actual: 2
                }
            }
        );
    }

    #[test]
    fn test_playing_until_ended() {
        let json = r#"[{ "width": 4, "height": 1, "layout": "B___" }]"#;
        let mut campaign = Campaign::from_json(json, Tuning::default()).unwrap();
        campaign.update(0.01);
        assert_eq!(campaign.advance(), Advance::Playing);
        assert_eq!(campaign.snapshot().attempt, 1);
    }
}
