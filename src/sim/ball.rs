//! Ball state machine
//!
//! Tracks whether the ball is flying or resting, whether it has been lost off
//! screen, and when the hole it just left should be plugged. Everything the
//! outside world has to react to (sounds, saves, seals, game over) is queued as
//! a `BallEvent` and drained by the session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::surface::{SoundCategory, SurfaceClassifier};
use super::undo::UndoPositionManager;
use crate::consts::MAP_WIDTH;
use crate::settings::GameMode;
use crate::tuning::{AudioTuning, BallTuning, Tuning};
use crate::{clamp01, lerp};

/// Identifier of a hole trigger in the course
pub type HoleId = u32;

/// Shot strength bucket, picks the launch sound bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchTier {
    Small,
    Medium,
    Big,
}

impl LaunchTier {
    pub fn from_force(magnitude: f32, audio: &AudioTuning) -> Self {
        if magnitude >= audio.big_shot_force {
            LaunchTier::Big
        } else if magnitude >= audio.medium_shot_force {
            LaunchTier::Medium
        } else {
            LaunchTier::Small
        }
    }
}

/// Rest/flight axis of the ball. Plugging is tracked separately by the plug timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallPhase {
    InFlight,
    AtRest,
}

/// Intents emitted for external collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum BallEvent {
    /// Play a launch sound; `pitch` is a multiplier around 1.0
    LaunchCue { tier: LaunchTier, pitch: f32 },
    /// Play a collision sound
    CollisionCue {
        category: SoundCategory,
        volume: f32,
        pitch: f32,
    },
    /// The ball came to rest; save where it is
    PersistPosition { position: Vec2, in_hole: bool },
    /// Seal the hole the ball just left
    SealHole(HoleId),
    /// The ball was moved back to its undo point
    Restored { position: Vec2 },
    /// The ball was lost in hard mode
    GameOver,
}

/// Per-tick inputs from the camera and the trigger system
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Ball position projected into the viewport
    pub viewport: Vec2,
    /// Hole trigger the ball overlapped during this step, if any
    pub overlapping_hole: Option<HoleId>,
}

#[derive(Debug, Clone)]
pub struct BallStateMachine {
    tuning: BallTuning,
    audio: AudioTuning,
    classifier: SurfaceClassifier,
    undo: UndoPositionManager,
    /// Where a lost ball goes when it was never shot
    spawn_point: Option<Vec2>,
    phase: BallPhase,
    containing_hole: Option<HoleId>,
    most_recent_hole: Option<HoleId>,
    rest_timer: f32,
    off_screen_timer: f32,
    hole_plug_timer: f32,
    /// Set by a launch so the launch impulse isn't heard as a collision
    suppress_next_collision: bool,
    rng: Pcg32,
    events: Vec<BallEvent>,
}

impl BallStateMachine {
    /// Create a state machine with an explicit jitter source
    pub fn new(tuning: &Tuning, rng: Pcg32) -> Self {
        Self {
            tuning: tuning.ball.clone(),
            audio: tuning.audio.clone(),
            classifier: SurfaceClassifier::new(&tuning.audio),
            undo: UndoPositionManager::new(
                tuning.ball.undo_min_distance_sq,
                tuning.ball.undo_clearance,
            ),
            spawn_point: None,
            phase: BallPhase::InFlight,
            containing_hole: None,
            most_recent_hole: None,
            rest_timer: 0.0,
            off_screen_timer: 0.0,
            hole_plug_timer: 0.0,
            suppress_next_collision: false,
            rng,
            events: Vec::new(),
        }
    }

    /// Create a state machine whose sound jitter differs between runs
    pub fn with_entropy(tuning: &Tuning) -> Self {
        Self::new(tuning, Pcg32::from_rng(&mut rand::rng()))
    }

    pub fn phase(&self) -> BallPhase {
        self.phase
    }

    pub fn is_at_rest(&self) -> bool {
        self.phase == BallPhase::AtRest
    }

    /// A hole seal countdown is running
    pub fn is_plugging(&self) -> bool {
        self.hole_plug_timer > 0.0
    }

    pub fn containing_hole(&self) -> Option<HoleId> {
        self.containing_hole
    }

    pub fn most_recent_hole(&self) -> Option<HoleId> {
        self.most_recent_hole
    }

    pub fn is_in_hole(&self) -> bool {
        self.containing_hole.is_some()
    }

    pub fn set_spawn_point(&mut self, spawn: Vec2) {
        self.spawn_point = Some(spawn);
    }

    pub fn undo_position(&self) -> Option<Vec2> {
        self.undo.point()
    }

    pub fn rest_timer(&self) -> f32 {
        self.rest_timer
    }

    pub fn off_screen_timer(&self) -> f32 {
        self.off_screen_timer
    }

    pub fn hole_plug_timer(&self) -> f32 {
        self.hole_plug_timer
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<BallEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hit the ball. Returns the launch tier, or `None` while a hole is being plugged.
    pub fn launch(&mut self, body: &mut dyn PhysicsBody, force: Vec2) -> Option<LaunchTier> {
        if self.is_plugging() {
            log::debug!("Launch rejected while plugging hole");
            return None;
        }

        self.rest_timer = 0.0;
        self.wake(body);
        // Recovery point is where the ball sat before the impulse
        self.undo.mark(body.position());

        let tier = LaunchTier::from_force(force.length(), &self.audio);
        let pitch = 1.0 + self.jitter(self.audio.shot_pitch_variation);
        self.events.push(BallEvent::LaunchCue { tier, pitch });

        self.suppress_next_collision = true;
        body.apply_impulse(force);
        log::debug!("Launched {:?} shot with force {}", tier, force);
        Some(tier)
    }

    /// Advance timers and run the transition checks for one fixed step
    pub fn tick(&mut self, body: &mut dyn PhysicsBody, input: &TickInput, mode: GameMode, dt: f32) {
        // 1. Rest detection
        if !self.is_at_rest() {
            if body.velocity().length() < self.tuning.rest_speed_threshold {
                self.rest_timer += dt;
                if self.rest_timer > self.tuning.rest_grace {
                    self.settle(body, input.overlapping_hole.is_some());
                }
            } else {
                self.rest_timer = 0.0;
            }
        }

        // 2. In flight below the screen for too long
        if !self.is_at_rest() {
            if input.viewport.y < 0.0 {
                self.off_screen_timer += dt;
                if self.off_screen_timer > self.tuning.off_screen_grace {
                    self.recover(body, mode);
                    self.off_screen_timer = 0.0;
                }
            } else {
                self.off_screen_timer = 0.0;
            }
        }

        // 3. A resting ball must always be on screen
        if self.is_at_rest() {
            let x = body.position().x;
            let off_horizontally = x < -MAP_WIDTH / 2.0 || x > MAP_WIDTH / 2.0;
            let off_vertically =
                input.viewport.y < 0.0 || input.viewport.y > self.tuning.screen_height;
            if off_horizontally || off_vertically {
                log::warn!("Resting ball is outside the frame at {}", body.position());
                self.recover(body, mode);
            }
        }

        // 4. Hole containment
        self.containing_hole = input.overlapping_hole;
        if let Some(hole) = input.overlapping_hole {
            self.most_recent_hole = Some(hole);
        }

        // 5. Plug countdown
        if self.hole_plug_timer > 0.0 {
            self.hole_plug_timer = (self.hole_plug_timer - dt).max(0.0);
            if self.hole_plug_timer == 0.0 {
                match self.most_recent_hole {
                    Some(hole) => {
                        log::info!("Sealing hole {hole}");
                        self.events.push(BallEvent::SealHole(hole));
                    }
                    None => log::warn!("Plug timer expired without a hole to seal"),
                }
            }
        }
    }

    /// React to a physics contact
    pub fn on_collision(&mut self, surface_id: &str, relative_speed: f32) {
        if self.suppress_next_collision {
            self.suppress_next_collision = false;
            return;
        }
        if relative_speed <= self.audio.collision_trigger_force {
            return;
        }
        let Some(class) = self.classifier.classify(surface_id) else {
            return;
        };

        let a = &self.audio;
        let force_range = a.max_collision_volume_force - a.min_collision_volume_force;
        let t = clamp01((relative_speed - a.min_collision_volume_force) / force_range);
        let volume = lerp(a.min_collision_volume, a.max_collision_volume, t);
        let variation = a.collision_pitch_variation + class.pitch_variation;
        let pitch = 1.0 + self.jitter(variation);

        self.events.push(BallEvent::CollisionCue {
            category: class.category,
            volume,
            pitch,
        });
    }

    /// Pop the ball out of the hole it arrived through and arm the plug timer
    pub fn bounce_from_hole(&mut self, body: &mut dyn PhysicsBody) {
        self.hole_plug_timer = self.tuning.hole_plug_delay;
        self.rest_timer = 0.0;
        self.wake(body);
        body.apply_impulse(Vec2::new(0.0, self.tuning.hole_bounce_impulse));
    }

    /// Move the ball back to its undo point. No-op (returns `false`) when there is
    /// no point, or the ball is already next to it.
    pub fn restore_undo_position(&mut self, body: &mut dyn PhysicsBody) -> bool {
        let Some(target) = self.undo.restore_target(body.position()) else {
            log::debug!("No undo position to restore");
            return false;
        };
        self.place(body, target);
        true
    }

    /// The ball was lost: hard mode ends the run, other modes restore
    fn recover(&mut self, body: &mut dyn PhysicsBody, mode: GameMode) {
        match mode {
            GameMode::Hard => {
                log::info!("Ball lost in hard mode");
                self.events.push(BallEvent::GameOver);
            }
            GameMode::Zen => match self.undo.recovery_target(self.spawn_point) {
                Some(target) => self.place(body, target),
                None => log::warn!("Ball lost with no undo position or spawn point"),
            },
        }
    }

    fn place(&mut self, body: &mut dyn PhysicsBody, target: Vec2) {
        body.set_position(target);
        body.set_velocity(Vec2::ZERO);
        self.wake(body);
        self.rest_timer = 0.0;
        self.events.push(BallEvent::Restored { position: target });
        log::info!("Restored ball to {target}");
    }

    fn settle(&mut self, body: &mut dyn PhysicsBody, in_hole: bool) {
        self.phase = BallPhase::AtRest;
        body.set_kinematic(true);
        let position = body.position();
        log::debug!("Ball came to rest at {position}");
        self.events
            .push(BallEvent::PersistPosition { position, in_hole });
    }

    fn wake(&mut self, body: &mut dyn PhysicsBody) {
        self.phase = BallPhase::InFlight;
        body.set_kinematic(false);
    }

    fn jitter(&mut self, range: f32) -> f32 {
        if range > 0.0 {
            self.rng.random_range(-range..=range)
        } else {
            0.0
        }
    }
}
