//! Procedural course generation
//!
//! A course is two columns of wall segments, one per side, stacked from the
//! course bottom until they reach `MAP_HEIGHT`. Segment choice comes from a
//! seeded PCG stream per side, so a given course index always produces the
//! same layout; the vertical offset only moves it.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{GROUND_HEIGHT, MAP_HEIGHT, MAP_WIDTH};
use crate::tuning::MapTuning;

/// Upper bound on segments stacked in one column
pub const MAX_WALLS_PER_SIDE: usize = 10_000;

/// Configuration errors raised while building a course
#[derive(Debug, Error, PartialEq)]
pub enum MapError {
    #[error("no wall prototypes registered")]
    NoPrototypes,
    #[error("wall prototype {id} has invalid height {height}")]
    InvalidHeight { id: u32, height: f32 },
    #[error("course {0} is still transitioning")]
    TransitionInProgress(u32),
}

/// Which column a wall belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// PCG stream id, keeps the two columns independent
    fn stream(self) -> u64 {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Horizontal anchor of the column
    pub fn x(self) -> f32 {
        match self {
            Side::Left => -MAP_WIDTH / 2.0,
            Side::Right => MAP_WIDTH / 2.0,
        }
    }
}

/// Wall pool a prototype belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Pools to try, nearest easier tier before any harder one
    fn fallback_order(self) -> [Difficulty; 3] {
        match self {
            Difficulty::Easy => [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard],
            Difficulty::Normal => [Difficulty::Normal, Difficulty::Easy, Difficulty::Hard],
            Difficulty::Hard => [Difficulty::Hard, Difficulty::Normal, Difficulty::Easy],
        }
    }
}

/// Maps a course index to the wall pool it draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyPolicy {
    pub normal_from: u32,
    pub hard_from: u32,
}

impl DifficultyPolicy {
    pub fn tier_for(&self, course_index: u32) -> Difficulty {
        if course_index >= self.hard_from {
            Difficulty::Hard
        } else if course_index >= self.normal_from {
            Difficulty::Normal
        } else {
            Difficulty::Easy
        }
    }
}

/// A wall piece that can be placed in a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallPrototype {
    pub id: u32,
    pub height: f32,
    pub difficulty: Difficulty,
}

/// A placed wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub prototype_id: u32,
    pub side: Side,
    pub height: f32,
    pub x: f32,
    /// Vertical center of the segment
    pub vertical_position: f32,
    /// Right-side walls are flipped horizontally
    pub mirrored: bool,
}

/// One generated screen of the climb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub index: u32,
    pub y_offset: f32,
    /// Left column bottom to top, then right column bottom to top
    pub segments: Vec<WallSegment>,
    pub ground_active: bool,
}

impl Course {
    pub fn side(&self, side: Side) -> impl Iterator<Item = &WallSegment> {
        self.segments.iter().filter(move |s| s.side == side)
    }

    pub fn top(&self) -> f32 {
        self.y_offset + MAP_HEIGHT
    }

    /// Height of the ground surface, when this course has one
    pub fn ground_height(&self) -> Option<f32> {
        self.ground_active.then_some(self.y_offset + GROUND_HEIGHT)
    }
}

/// Builds courses from the registered wall prototypes
#[derive(Debug, Clone)]
pub struct MapGenerator {
    prototypes: Vec<WallPrototype>,
    policy: DifficultyPolicy,
    world_seed: u64,
    map_height: f32,
}

impl MapGenerator {
    pub fn new(tuning: &MapTuning) -> Self {
        Self {
            prototypes: Vec::new(),
            policy: DifficultyPolicy {
                normal_from: tuning.normal_from_course,
                hard_from: tuning.hard_from_course,
            },
            world_seed: tuning.world_seed,
            map_height: MAP_HEIGHT,
        }
    }

    pub fn with_policy(mut self, policy: DifficultyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DifficultyPolicy {
        self.policy
    }

    pub fn prototypes(&self) -> &[WallPrototype] {
        &self.prototypes
    }

    /// Shortest wall accepted, so a column is always filled in roughly
    /// `MAX_WALLS_PER_SIDE` segments
    pub fn min_wall_height(&self) -> f32 {
        self.map_height / MAX_WALLS_PER_SIDE as f32
    }

    /// Add a wall prototype. Heights below `min_wall_height` and non-finite
    /// heights are refused since they could never fill a column.
    pub fn register(&mut self, prototype: WallPrototype) -> Result<(), MapError> {
        if !(prototype.height.is_finite() && prototype.height >= self.min_wall_height()) {
            return Err(MapError::InvalidHeight {
                id: prototype.id,
                height: prototype.height,
            });
        }
        self.prototypes.push(prototype);
        Ok(())
    }

    /// Procedurally generate a course. The same index always gives the same
    /// walls; `y_offset` only shifts them vertically.
    pub fn build_map(&self, course_index: u32, y_offset: f32) -> Result<Course, MapError> {
        let tier = self.policy.tier_for(course_index);
        let pool = self.pool_for(tier);
        if pool.is_empty() {
            return Err(MapError::NoPrototypes);
        }

        let course_seed = (course_index as u64)
            .wrapping_mul(2654435761)
            .wrapping_add(self.world_seed);

        let mut segments = Vec::new();
        for side in [Side::Left, Side::Right] {
            let mut rng = Pcg32::new(course_seed, side.stream());
            let mut wall_y = 0.0;
            while wall_y < self.map_height {
                let prototype = pool[rng.random_range(0..pool.len())];
                let local_y = wall_y + prototype.height / 2.0;
                segments.push(WallSegment {
                    prototype_id: prototype.id,
                    side,
                    height: prototype.height,
                    x: side.x(),
                    vertical_position: y_offset + local_y,
                    mirrored: side == Side::Right,
                });
                wall_y += prototype.height;
            }
        }

        log::info!(
            "Built course {} ({:?}) at y={}: {} wall segments",
            course_index,
            tier,
            y_offset,
            segments.len()
        );

        Ok(Course {
            index: course_index,
            y_offset,
            segments,
            // Only the very first course stands on the ground
            ground_active: course_index == 0,
        })
    }

    fn pool_for(&self, tier: Difficulty) -> Vec<&WallPrototype> {
        for candidate in tier.fallback_order() {
            let pool: Vec<&WallPrototype> = self
                .prototypes
                .iter()
                .filter(|p| p.difficulty == candidate)
                .collect();
            if !pool.is_empty() {
                if candidate != tier {
                    log::debug!("No {tier:?} walls registered, using {candidate:?}");
                }
                return pool;
            }
        }
        Vec::new()
    }
}

/// The course the ball is climbing, plus the one below it while the camera
/// is still moving up
#[derive(Debug, Clone)]
pub struct CourseTrack {
    generator: MapGenerator,
    current: Course,
    previous: Option<Course>,
}

impl CourseTrack {
    /// Build the first course of a run at the world origin
    pub fn start(generator: MapGenerator, course_index: u32) -> Result<Self, MapError> {
        let current = generator.build_map(course_index, 0.0)?;
        Ok(Self {
            generator,
            current,
            previous: None,
        })
    }

    pub fn current(&self) -> &Course {
        &self.current
    }

    pub fn previous(&self) -> Option<&Course> {
        self.previous.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.previous.is_some()
    }

    /// Bottom of the active course
    pub fn y_bottom(&self) -> f32 {
        self.current.y_offset
    }

    /// Bottom of the course the camera frames: the old course until the
    /// transition finishes
    pub fn frame_bottom(&self) -> f32 {
        self.previous
            .as_ref()
            .map_or(self.current.y_offset, |c| c.y_offset)
    }

    pub fn generator(&self) -> &MapGenerator {
        &self.generator
    }

    /// Build the next course on top of the current one, keeping the old course
    /// until `finish_transition`
    pub fn begin_transition(&mut self) -> Result<&Course, MapError> {
        if self.previous.is_some() {
            return Err(MapError::TransitionInProgress(self.current.index));
        }
        let next = self
            .generator
            .build_map(self.current.index + 1, self.current.top())?;
        self.previous = Some(std::mem::replace(&mut self.current, next));
        Ok(&self.current)
    }

    /// Drop the previous course. Returns the new course bottom.
    pub fn finish_transition(&mut self) -> f32 {
        if let Some(old) = self.previous.take() {
            log::info!(
                "Released course {} ({} walls)",
                old.index,
                old.segments.len()
            );
        }
        self.y_bottom()
    }
}
