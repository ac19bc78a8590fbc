//! Vertigolf - a golf ball climbing a procedurally stacked course
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball state machine, course generation, session loop)
//! - `audio`: Audio cue sink for launch and collision intents
//! - `persistence`: Ball position save/load
//! - `settings`: Player preferences (game mode, volume)
//! - `tuning`: Data-driven thresholds for the ball and the map

pub mod audio;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{GameMode, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Course dimensions (world units)
    pub const MAP_WIDTH: f32 = 28.0;
    pub const MAP_HEIGHT: f32 = 60.0;
    pub const GROUND_HEIGHT: f32 = 3.0;

    /// Gravity used by the reference point-mass body (units/s²)
    pub const GRAVITY: f32 = -9.81;

    /// Extra height added to a persisted position when the ball rests in a hole,
    /// so reloading doesn't drop it below the plugged hole
    pub const HOLE_PERSIST_CLEARANCE: f32 = 0.6;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
