//! Simulation session
//!
//! Owns the ball, its body and the course track, runs the fixed-timestep loop
//! and hands the ball's intents to the audio and save collaborators.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::ball::{BallEvent, BallStateMachine, HoleId, LaunchTier, TickInput};
use super::body::{PhysicsBody, PointBody};
use super::map::{CourseTrack, MapError, MapGenerator};
use super::viewport::{CourseCamera, Viewport};
use crate::audio::AudioSink;
use crate::consts::{GROUND_HEIGHT, HOLE_PERSIST_CLEARANCE, MAX_SUBSTEPS, SIM_DT};
use crate::persistence::ProgressStore;
use crate::settings::GameMode;
use crate::tuning::Tuning;

/// Values shared by everything in a run
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub mode: GameMode,
    pub tuning: Tuning,
}

pub struct Session<S: ProgressStore, A: AudioSink> {
    context: SessionContext,
    ball: BallStateMachine,
    body: PointBody,
    courses: CourseTrack,
    store: S,
    audio: A,
    sealed_holes: Vec<HoleId>,
    restore_count: u32,
    game_over: bool,
    accumulator: f32,
    time_ticks: u64,
}

impl<S: ProgressStore, A: AudioSink> Session<S, A> {
    /// Start a run on `course_index`. The ball is placed on the course floor
    /// until a saved position is loaded.
    pub fn new(
        context: SessionContext,
        generator: MapGenerator,
        course_index: u32,
        store: S,
        audio: A,
        rng: Pcg32,
    ) -> Result<Self, MapError> {
        let courses = CourseTrack::start(generator, course_index)?;
        let mut body = PointBody::new(Vec2::new(0.0, courses.y_bottom() + GROUND_HEIGHT));
        body.ground = courses.current().ground_height();
        let mut ball = BallStateMachine::new(&context.tuning, rng);
        ball.set_spawn_point(body.pos);

        log::info!(
            "Session started on course {} in {} mode",
            course_index,
            context.mode.as_str()
        );

        Ok(Self {
            context,
            ball,
            body,
            courses,
            store,
            audio,
            sealed_holes: Vec::new(),
            restore_count: 0,
            game_over: false,
            accumulator: 0.0,
            time_ticks: 0,
        })
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn ball(&self) -> &BallStateMachine {
        &self.ball
    }

    pub fn body(&self) -> &PointBody {
        &self.body
    }

    pub fn courses(&self) -> &CourseTrack {
        &self.courses
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn sealed_holes(&self) -> &[HoleId] {
        &self.sealed_holes
    }

    pub fn restore_count(&self) -> u32 {
        self.restore_count
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Put the ball where it was saved, relative to the current course bottom
    pub fn load_persisted_position(&mut self) {
        if let Some((x, y)) = self.store.load_ball_position() {
            let pos = Vec2::new(x, y + self.courses.y_bottom());
            self.body.set_position(pos);
            log::info!("Loaded persisted ball position {pos}");
        }
    }

    /// Shoot the ball
    pub fn launch(&mut self, force: Vec2) -> Option<LaunchTier> {
        if self.game_over {
            return None;
        }
        let tier = self.ball.launch(&mut self.body, force);
        self.dispatch_events();
        tier
    }

    /// Player-invoked undo of the last shot
    pub fn undo(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let restored = self.ball.restore_undo_position(&mut self.body);
        self.dispatch_events();
        restored
    }

    /// The ball dropped into the exit hole: build the next course above
    pub fn enter_next_course(&mut self) -> Result<(), MapError> {
        let index = self.courses.begin_transition()?.index;
        self.body.ground = self.courses.current().ground_height();
        log::info!("Transitioning to course {index}");
        Ok(())
    }

    /// The camera reached the new course: release the old walls and pop the
    /// ball out of its hole
    pub fn finish_course_transition(&mut self) {
        let bottom = self.courses.finish_transition();
        log::debug!("Course bottom is now {bottom}");
        self.ball.set_spawn_point(Vec2::new(0.0, bottom + GROUND_HEIGHT));
        self.ball.bounce_from_hole(&mut self.body);
        self.dispatch_events();
    }

    /// Advance by a variable frame time using fixed substeps. Returns the number
    /// of steps taken.
    pub fn advance(&mut self, frame_dt: f32, overlapping_hole: Option<HoleId>) -> u32 {
        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.step(overlapping_hole);
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Drop backlog we couldn't simulate
        if steps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        steps
    }

    /// One fixed simulation step
    pub fn step(&mut self, overlapping_hole: Option<HoleId>) {
        if self.game_over {
            return;
        }
        self.time_ticks += 1;

        if let Some(contact) = self.body.step(SIM_DT) {
            self.ball.on_collision(&contact.surface, contact.relative_speed);
        }

        let camera = CourseCamera::new(self.courses.frame_bottom());
        let input = TickInput {
            viewport: camera.world_to_viewport(self.body.position()),
            overlapping_hole,
        };
        self.ball
            .tick(&mut self.body, &input, self.context.mode, SIM_DT);
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.ball.drain_events() {
            match event {
                BallEvent::LaunchCue { tier, pitch } => self.audio.play_launch_cue(tier, pitch),
                BallEvent::CollisionCue {
                    category,
                    volume,
                    pitch,
                } => self.audio.play_collision_cue(category, volume, pitch),
                BallEvent::PersistPosition { position, in_hole } => {
                    self.persist_position(position, in_hole)
                }
                BallEvent::SealHole(hole) => self.sealed_holes.push(hole),
                BallEvent::Restored { .. } => self.restore_count += 1,
                BallEvent::GameOver => {
                    log::info!("Game over after {} ticks", self.time_ticks);
                    self.game_over = true;
                }
            }
        }
    }

    fn persist_position(&mut self, position: Vec2, in_hole: bool) {
        let mut y = position.y - self.courses.y_bottom();
        if in_hole {
            y += HOLE_PERSIST_CLEARANCE;
        }
        if let Err(err) = self.store.save_ball_position(position.x, y) {
            log::error!("Failed to persist ball position: {err}");
        }
    }
}
