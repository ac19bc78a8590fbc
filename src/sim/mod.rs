//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only (course layout from the course index, sound jitter injectable)
//! - Outside systems are reached through traits and queued events
//! - No rendering or platform dependencies

pub mod ball;
pub mod body;
pub mod map;
pub mod session;
pub mod surface;
pub mod undo;
pub mod viewport;

pub use ball::{BallEvent, BallPhase, BallStateMachine, HoleId, LaunchTier, TickInput};
pub use body::{Contact, PhysicsBody, PointBody};
pub use map::{
    Course, CourseTrack, Difficulty, DifficultyPolicy, MapError, MapGenerator, Side,
    WallPrototype, WallSegment,
};
pub use session::{Session, SessionContext};
pub use surface::{Classification, SoundCategory, SurfaceClassifier, SurfaceKind};
pub use undo::UndoPositionManager;
pub use viewport::{CourseCamera, Viewport};
