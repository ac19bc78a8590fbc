//! Physics collaborator
//!
//! The ball state machine never integrates motion itself; it talks to a body
//! through this trait. `PointBody` is the reference implementation used by the
//! headless session and the tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY;

/// Operations the ball needs from the physics engine
pub trait PhysicsBody {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, vel: Vec2);
    /// Instantaneous change of momentum
    fn apply_impulse(&mut self, impulse: Vec2);
    /// Kinematic bodies are frozen in place and ignore forces
    fn set_kinematic(&mut self, kinematic: bool);
    fn is_kinematic(&self) -> bool;
}

/// A contact reported by `PointBody::step`
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub surface: String,
    pub relative_speed: f32,
}

/// Unit-mass point with gravity and an optional flat ground plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub gravity: f32,
    /// Ground plane height, if the course has an active ground
    pub ground: Option<f32>,
    /// Fraction of normal speed kept after hitting the ground
    pub restitution: f32,
    /// Tangential speed multiplier applied on ground contact
    pub friction: f32,
    kinematic: bool,
}

impl PointBody {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            mass: 1.0,
            gravity: GRAVITY,
            ground: None,
            restitution: 0.4,
            friction: 0.8,
            kinematic: false,
        }
    }

    /// Integrate one step. Returns the ground contact, if any.
    pub fn step(&mut self, dt: f32) -> Option<Contact> {
        if self.kinematic {
            return None;
        }

        self.vel.y += self.gravity * dt;
        self.pos += self.vel * dt;

        let ground = self.ground?;
        if self.pos.y > ground || self.vel.y >= 0.0 {
            return None;
        }

        let impact = -self.vel.y;
        self.pos.y = ground;
        self.vel.y = impact * self.restitution;
        self.vel.x *= self.friction;
        // Kill micro-bounces so the ball can settle
        if self.vel.y < 0.5 {
            self.vel.y = 0.0;
        }
        if self.vel.x.abs() < 0.05 {
            self.vel.x = 0.0;
        }

        Some(Contact {
            surface: "Ground".to_string(),
            relative_speed: impact,
        })
    }
}

impl PhysicsBody for PointBody {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        if !self.kinematic {
            self.vel += impulse / self.mass;
        }
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
        if kinematic {
            self.vel = Vec2::ZERO;
        }
    }

    fn is_kinematic(&self) -> bool {
        self.kinematic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinematic_body_does_not_move() {
        let mut body = PointBody::new(Vec2::new(0.0, 5.0));
        body.set_kinematic(true);
        body.apply_impulse(Vec2::new(3.0, 3.0));
        assert!(body.step(0.02).is_none());
        assert_eq!(body.pos, Vec2::new(0.0, 5.0));
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_ground_contact_reports_speed() {
        let mut body = PointBody::new(Vec2::new(0.0, 0.05));
        body.ground = Some(0.0);
        body.vel = Vec2::new(0.0, -6.0);
        let contact = body.step(0.02).unwrap();
        assert_eq!(contact.surface, "Ground");
        assert!(contact.relative_speed > 6.0);
        assert_eq!(body.pos.y, 0.0);
        assert!(body.vel.y > 0.0);
    }

    #[test]
    fn test_settles_on_ground() {
        let mut body = PointBody::new(Vec2::new(0.0, 2.0));
        body.ground = Some(0.0);
        for _ in 0..500 {
            body.step(0.02);
        }
        assert_eq!(body.pos.y, 0.0);
        assert!(body.vel.length() < 0.15);
    }
}
