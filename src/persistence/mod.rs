//! Ball position persistence
//!
//! Only the ball's position is saved, stored relative to the bottom of the
//! course it rests in so it survives the course being rebuilt at another
//! offset.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save file io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Saved ball coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedBallPosition {
    pub x: f32,
    pub y: f32,
}

/// Storage for the saved ball position
pub trait ProgressStore {
    fn save_ball_position(&mut self, x: f32, y: f32) -> Result<(), PersistenceError>;
    fn load_ball_position(&self) -> Option<(f32, f32)>;
}

/// Keeps the save in memory (tests, demo runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub position: Option<SavedBallPosition>,
}

impl ProgressStore for MemoryStore {
    fn save_ball_position(&mut self, x: f32, y: f32) -> Result<(), PersistenceError> {
        self.position = Some(SavedBallPosition { x, y });
        Ok(())
    }

    fn load_ball_position(&self) -> Option<(f32, f32)> {
        self.position.map(|p| (p.x, p.y))
    }
}

/// Saves the position as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Option<SavedBallPosition>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl ProgressStore for JsonFileStore {
    fn save_ball_position(&mut self, x: f32, y: f32) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&SavedBallPosition { x, y })?;
        // Write then rename so a crash never leaves a half-written save
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!("Saved ball position ({x}, {y})");
        Ok(())
    }

    fn load_ball_position(&self) -> Option<(f32, f32)> {
        match self.read() {
            Ok(position) => position.map(|p| (p.x, p.y)),
            Err(err) => {
                log::warn!("Ignoring save {}: {}", self.path.display(), err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vertigolf-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load_ball_position(), None);
        store.save_ball_position(1.5, 2.5).unwrap();
        assert_eq!(store.load_ball_position(), Some((1.5, 2.5)));
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("save");
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load_ball_position(), None);
        store.save_ball_position(-3.0, 12.25).unwrap();
        assert_eq!(JsonFileStore::new(&path).load_ball_position(), Some((-3.0, 12.25)));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{ \"x\": ").unwrap();
        assert_eq!(JsonFileStore::new(&path).load_ball_position(), None);
        let _ = std::fs::remove_file(&path);
    }
}
