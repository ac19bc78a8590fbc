//! Undo point for the ball
//!
//! The position captured right before a shot. Used both when the ball is lost
//! off screen and when the player asks to take the shot back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UndoPositionManager {
    point: Option<Vec2>,
    /// Restores closer than this (squared) are refused
    min_distance_sq: f32,
    /// Height added on restore so the ball doesn't spawn inside the surface
    clearance: f32,
}

impl UndoPositionManager {
    pub fn new(min_distance_sq: f32, clearance: f32) -> Self {
        Self {
            point: None,
            min_distance_sq,
            clearance,
        }
    }

    /// Record the position the ball was shot from
    pub fn mark(&mut self, position: Vec2) {
        self.point = Some(position);
    }

    pub fn clear(&mut self) {
        self.point = None;
    }

    pub fn point(&self) -> Option<Vec2> {
        self.point
    }

    pub fn can_restore(&self, current: Vec2) -> bool {
        self.point
            .is_some_and(|p| current.distance_squared(p) > self.min_distance_sq)
    }

    /// Where a restore would put the ball, if a restore is allowed
    pub fn restore_target(&self, current: Vec2) -> Option<Vec2> {
        if !self.can_restore(current) {
            return None;
        }
        self.point.map(|p| p + Vec2::new(0.0, self.clearance))
    }

    /// Where a lost ball goes: the undo point regardless of distance, else `fallback`
    pub fn recovery_target(&self, fallback: Option<Vec2>) -> Option<Vec2> {
        self.point
            .or(fallback)
            .map(|p| p + Vec2::new(0.0, self.clearance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> UndoPositionManager {
        UndoPositionManager::new(0.5, 0.275)
    }

    #[test]
    fn test_never_set_cannot_restore() {
        let undo = manager();
        assert!(!undo.can_restore(Vec2::new(10.0, 10.0)));
        assert_eq!(undo.restore_target(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_origin_is_a_valid_point() {
        let mut undo = manager();
        undo.mark(Vec2::ZERO);
        assert_eq!(
            undo.restore_target(Vec2::new(3.0, 0.0)),
            Some(Vec2::new(0.0, 0.275))
        );
    }

    #[test]
    fn test_too_close_cannot_restore() {
        let mut undo = manager();
        undo.mark(Vec2::new(1.0, 1.0));
        // distance² = 0.5 exactly is still refused
        assert!(!undo.can_restore(Vec2::new(1.5, 1.5)));
        assert!(undo.can_restore(Vec2::new(1.6, 1.5)));
    }

    #[test]
    fn test_recovery_ignores_distance() {
        let mut undo = manager();
        let spawn = Some(Vec2::new(0.0, 3.0));
        assert_eq!(undo.recovery_target(None), None);
        assert_eq!(undo.recovery_target(spawn), Some(Vec2::new(0.0, 3.275)));

        undo.mark(Vec2::new(14.5, 10.0));
        // Sitting right on the point still recovers
        assert!(!undo.can_restore(Vec2::new(14.5, 10.0)));
        assert_eq!(undo.recovery_target(spawn), Some(Vec2::new(14.5, 10.275)));
    }

    #[test]
    fn test_clear() {
        let mut undo = manager();
        undo.mark(Vec2::new(4.0, 4.0));
        undo.clear();
        assert_eq!(undo.point(), None);
    }
}
