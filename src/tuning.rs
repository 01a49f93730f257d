//! Data-driven physics tuning
//!
//! Defaults reproduce the classic feel. A tuning file may override any subset
//! of fields; missing fields keep their defaults. A `Tuning` is always in
//! range: the only ways to build one go through validation.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics constants used by a single `Game`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TuningFile")]
pub struct Tuning {
    damping: f64,
    restitution: f64,
    max_contact_passes: u32,
    ball_radius: f64,
}

/// Tuning as written in a file, before validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningFile {
    /// Velocity multiplier applied every tick before acceleration
    pub damping: f64,
    /// Velocity fraction kept after reflecting off a wall
    pub restitution: f64,
    /// Retry cap per obstacle per tick
    pub max_contact_passes: u32,
    /// Ball radius in cells
    pub ball_radius: f64,
}

impl Default for TuningFile {
    fn default() -> Self {
        Self {
            damping: VELOCITY_DAMPING,
            restitution: WALL_RESTITUTION,
            max_contact_passes: MAX_CONTACT_PASSES,
            ball_radius: BALL_RADIUS,
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            damping: VELOCITY_DAMPING,
            restitution: WALL_RESTITUTION,
            max_contact_passes: MAX_CONTACT_PASSES,
            ball_radius: BALL_RADIUS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TuningError {
    Parse(String),
    OutOfRange { field: &'static str, value: f64 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
            Self::OutOfRange { field, value } => {
                write!(f, "tuning value out of range: {field} = {value}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl TuningFile {
    pub fn validate(&self) -> Result<(), TuningError> {
        // Above 1 the ball gains speed every tick
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(TuningError::OutOfRange {
                field: "damping",
                value: self.damping,
            });
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(TuningError::OutOfRange {
                field: "restitution",
                value: self.restitution,
            });
        }
        // Zero passes would skip every contact
        if self.max_contact_passes == 0 {
            return Err(TuningError::OutOfRange {
                field: "max_contact_passes",
                value: 0.0,
            });
        }
        // A radius above half a cell would reach past the neighbouring cell
        if !(self.ball_radius > 0.0 && self.ball_radius <= 0.5) {
            return Err(TuningError::OutOfRange {
                field: "ball_radius",
                value: self.ball_radius,
            });
        }
        Ok(())
    }
}

impl TryFrom<TuningFile> for Tuning {
    type Error = TuningError;

    fn try_from(file: TuningFile) -> Result<Self, Self::Error> {
        file.validate()?;
        Ok(Self {
            damping: file.damping,
            restitution: file.restitution,
            max_contact_passes: file.max_contact_passes,
            ball_radius: file.ball_radius,
        })
    }
}

impl Tuning {
    pub fn new(
        damping: f64,
        restitution: f64,
        max_contact_passes: u32,
        ball_radius: f64,
    ) -> Result<Self, TuningError> {
        Self::try_from(TuningFile {
            damping,
            restitution,
            max_contact_passes,
            ball_radius,
        })
    }

    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let file: TuningFile =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        let tuning = Self::try_from(file)?;
        log::info!("Loaded tuning: {tuning:?}");
        Ok(tuning)
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    pub fn max_contact_passes(&self) -> u32 {
        self.max_contact_passes
    }

    pub fn ball_radius(&self) -> f64 {
        self.ball_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let tuning = Tuning::default();
        assert_eq!(tuning.damping(), 0.999);
        assert_eq!(tuning.restitution(), 0.5);
        assert_eq!(tuning.max_contact_passes(), 10);
        assert_eq!(Tuning::try_from(TuningFile::default()), Ok(tuning));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "restitution": 0.8 }"#).unwrap();
        assert_eq!(tuning.restitution(), 0.8);
        assert_eq!(tuning.damping(), VELOCITY_DAMPING);
        assert_eq!(tuning.max_contact_passes(), MAX_CONTACT_PASSES);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = Tuning::from_json(r#"{ "damping": 1.5 }"#).unwrap_err();
        assert_eq!(
            err,
            TuningError::OutOfRange {
                field: "damping",
                value: 1.5
            }
        );

        let err = Tuning::from_json(r#"{ "max_contact_passes": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "max_contact_passes", .. }));
    }

    #[test]
    fn test_constructor_validates() {
        assert!(Tuning::new(0.999, 0.5, 10, 0.5).is_ok());
        assert!(matches!(
            Tuning::new(0.999, 0.5, 0, 0.5),
            Err(TuningError::OutOfRange { field: "max_contact_passes", .. })
        ));
        assert!(matches!(
            Tuning::new(1.01, 0.5, 10, 0.5),
            Err(TuningError::OutOfRange { field: "damping", .. })
        ));
        assert!(Tuning::new(0.999, f64::NAN, 10, 0.5).is_err());
    }

    #[test]
    fn test_direct_deserialize_validates() {
        // Nested tuning inside other documents goes through the same checks
        assert!(serde_json::from_str::<Tuning>(r#"{ "damping": 2.0 }"#).is_err());
        let tuning: Tuning = serde_json::from_str(r#"{ "ball_radius": 0.25 }"#).unwrap();
        assert_eq!(tuning.ball_radius(), 0.25);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ damping: "),
            Err(TuningError::Parse(_))
        ));
    }
}
