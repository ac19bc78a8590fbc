//! Data-driven game balance
//!
//! Every threshold the ball and the map generator use lives here. Defaults match
//! the shipped game; a JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("tuning value `{field}` is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Ball rest/recovery thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    /// Speed below which the ball counts as slowing to a stop (units/s)
    pub rest_speed_threshold: f32,
    /// How long the ball must stay below the rest threshold (seconds)
    pub rest_grace: f32,
    /// How long an in-flight ball may stay below the screen (seconds)
    pub off_screen_grace: f32,
    /// Visible screen height as a viewport fraction
    pub screen_height: f32,
    /// Minimum squared distance from the undo point for a restore to be allowed
    pub undo_min_distance_sq: f32,
    /// Vertical clearance added when restoring the undo point
    pub undo_clearance: f32,
    /// Upward impulse applied when popping out of a hole into a new course
    pub hole_bounce_impulse: f32,
    /// Delay before the hole behind the ball is sealed (seconds)
    pub hole_plug_delay: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            rest_speed_threshold: 0.15,
            rest_grace: 0.4,
            off_screen_grace: 1.0,
            screen_height: 1.0,
            undo_min_distance_sq: 0.5,
            undo_clearance: 0.275,
            hole_bounce_impulse: 5.0,
            hole_plug_delay: 0.4,
        }
    }
}

/// Launch and collision audio thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioTuning {
    pub medium_shot_force: f32,
    pub big_shot_force: f32,
    pub shot_pitch_variation: f32,

    /// Collisions at or below this relative speed are silent
    pub collision_trigger_force: f32,
    pub min_collision_volume_force: f32,
    pub max_collision_volume_force: f32,
    pub min_collision_volume: f32,
    pub max_collision_volume: f32,
    pub collision_pitch_variation: f32,

    /// Per-surface pitch contributions, added to `collision_pitch_variation`
    pub grass_pitch_variation: f32,
    pub rock_pitch_variation: f32,
    pub dirt_pitch_variation: f32,
    pub sand_pitch_variation: f32,
    pub sheep_pitch_variation: f32,
}

impl Default for AudioTuning {
    fn default() -> Self {
        Self {
            medium_shot_force: 10.0,
            big_shot_force: 19.0,
            shot_pitch_variation: 0.1,
            collision_trigger_force: 2.0,
            min_collision_volume_force: 2.0,
            max_collision_volume_force: 10.0,
            min_collision_volume: 0.1,
            max_collision_volume: 1.0,
            collision_pitch_variation: 0.2,
            grass_pitch_variation: 0.0,
            rock_pitch_variation: 0.0,
            dirt_pitch_variation: 0.0,
            sand_pitch_variation: 0.0,
            sheep_pitch_variation: 0.0,
        }
    }
}

/// Course generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapTuning {
    /// Seed mixed into every course seed
    pub world_seed: u64,
    /// First course index that draws from the normal wall pool
    pub normal_from_course: u32,
    /// First course index that draws from the hard wall pool
    pub hard_from_course: u32,
}

impl Default for MapTuning {
    fn default() -> Self {
        Self {
            world_seed: 0,
            normal_from_course: 3,
            hard_from_course: 8,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ball: BallTuning,
    pub audio: AudioTuning,
    pub map: MapTuning,
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall timers or divide by zero
    pub fn validate(&self) -> Result<(), TuningError> {
        let b = &self.ball;
        let a = &self.audio;

        positive("ball.rest_speed_threshold", b.rest_speed_threshold)?;
        positive("ball.rest_grace", b.rest_grace)?;
        positive("ball.off_screen_grace", b.off_screen_grace)?;
        positive("ball.screen_height", b.screen_height)?;
        non_negative("ball.undo_min_distance_sq", b.undo_min_distance_sq)?;
        non_negative("ball.hole_plug_delay", b.hole_plug_delay)?;
        non_negative("audio.shot_pitch_variation", a.shot_pitch_variation)?;
        non_negative("audio.collision_pitch_variation", a.collision_pitch_variation)?;
        non_negative("audio.grass_pitch_variation", a.grass_pitch_variation)?;
        non_negative("audio.rock_pitch_variation", a.rock_pitch_variation)?;
        non_negative("audio.dirt_pitch_variation", a.dirt_pitch_variation)?;
        non_negative("audio.sand_pitch_variation", a.sand_pitch_variation)?;
        non_negative("audio.sheep_pitch_variation", a.sheep_pitch_variation)?;

        if a.big_shot_force < a.medium_shot_force {
            return Err(TuningError::Invalid {
                field: "audio.big_shot_force",
                reason: format!(
                    "must be >= medium_shot_force ({} < {})",
                    a.big_shot_force, a.medium_shot_force
                ),
            });
        }
        if a.max_collision_volume_force <= a.min_collision_volume_force {
            return Err(TuningError::Invalid {
                field: "audio.max_collision_volume_force",
                reason: "must be greater than min_collision_volume_force".to_string(),
            });
        }
        if self.map.hard_from_course < self.map.normal_from_course {
            return Err(TuningError::Invalid {
                field: "map.hard_from_course",
                reason: "must not precede normal_from_course".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("expected a positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: format!("expected a non-negative number, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "ball": { "rest_grace": 0.8 } }"#).unwrap();
        assert_eq!(tuning.ball.rest_grace, 0.8);
        assert_eq!(tuning.ball.off_screen_grace, 1.0);
        assert_eq!(tuning.audio.big_shot_force, 19.0);
        assert_eq!(tuning.map.hard_from_course, 8);
    }

    #[test]
    fn test_json_round_trip() {
        let mut tuning = Tuning::default();
        tuning.map.world_seed = 42;
        let json = tuning.to_json().unwrap();
        let parsed = Tuning::from_json(&json).unwrap();
        assert_eq!(parsed.map.world_seed, 42);
    }

    #[test]
    fn test_rejects_inverted_shot_forces() {
        let err = Tuning::from_json(
            r#"{ "audio": { "medium_shot_force": 20.0, "big_shot_force": 5.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "audio.big_shot_force",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_rest_grace() {
        let err = Tuning::from_json(r#"{ "ball": { "rest_grace": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_bad_pitch_variation() {
        let mut tuning = Tuning::default();
        tuning.audio.collision_pitch_variation = f32::INFINITY;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid {
                field: "audio.collision_pitch_variation",
                ..
            })
        ));

        let json = r#"{ "audio": { "sand_pitch_variation": -0.5 } }"#;
        let err = Tuning::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "audio.sand_pitch_variation",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
    }
}
