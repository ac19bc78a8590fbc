//! Collision surface classification
//!
//! Maps the name of the collider the ball hit to the sound category that should
//! play and the extra pitch variation that surface adds.

use serde::{Deserialize, Serialize};

use crate::tuning::AudioTuning;

/// Every collider the ball can produce a sound against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    Ground,
    Wall,
    Dirt,
    Grass,
    Sand,
    Rock,
    Sheep,
    Plug,
}

impl SurfaceKind {
    /// Parse a collider name (exact match, as the scene names them)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Ground" => Some(SurfaceKind::Ground),
            "Wall" => Some(SurfaceKind::Wall),
            "Dirt" => Some(SurfaceKind::Dirt),
            "Grass" => Some(SurfaceKind::Grass),
            "Sand" => Some(SurfaceKind::Sand),
            "Rock" => Some(SurfaceKind::Rock),
            "Sheep" => Some(SurfaceKind::Sheep),
            "Plug" => Some(SurfaceKind::Plug),
            _ => None,
        }
    }

    pub fn category(&self) -> SoundCategory {
        match self {
            SurfaceKind::Ground | SurfaceKind::Grass => SoundCategory::Grass,
            SurfaceKind::Wall | SurfaceKind::Rock | SurfaceKind::Plug => SoundCategory::Rock,
            SurfaceKind::Dirt => SoundCategory::Dirt,
            SurfaceKind::Sand => SoundCategory::Sand,
            SurfaceKind::Sheep => SoundCategory::Sheep,
        }
    }
}

/// Sound bank a collision cue draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCategory {
    Grass,
    Rock,
    Dirt,
    Sand,
    Sheep,
}

/// Result of classifying a collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub surface: SurfaceKind,
    pub category: SoundCategory,
    /// Added to the base collision pitch variation
    pub pitch_variation: f32,
}

/// Per-category pitch contributions
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceClassifier {
    grass: f32,
    rock: f32,
    dirt: f32,
    sand: f32,
    sheep: f32,
}

impl SurfaceClassifier {
    pub fn new(audio: &AudioTuning) -> Self {
        Self {
            grass: audio.grass_pitch_variation,
            rock: audio.rock_pitch_variation,
            dirt: audio.dirt_pitch_variation,
            sand: audio.sand_pitch_variation,
            sheep: audio.sheep_pitch_variation,
        }
    }

    pub fn pitch_variation(&self, category: SoundCategory) -> f32 {
        match category {
            SoundCategory::Grass => self.grass,
            SoundCategory::Rock => self.rock,
            SoundCategory::Dirt => self.dirt,
            SoundCategory::Sand => self.sand,
            SoundCategory::Sheep => self.sheep,
        }
    }

    /// Classify a collider by name. Unknown names are logged and yield `None`.
    pub fn classify(&self, surface_id: &str) -> Option<Classification> {
        let Some(surface) = SurfaceKind::from_name(surface_id) else {
            log::error!("Audio event encountered unhandled collider name {surface_id:?}");
            return None;
        };
        let category = surface.category();
        Some(Classification {
            surface,
            category,
            pitch_variation: self.pitch_variation(category),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SurfaceClassifier {
        SurfaceClassifier::new(&AudioTuning {
            grass_pitch_variation: 0.01,
            rock_pitch_variation: 0.02,
            dirt_pitch_variation: 0.03,
            sand_pitch_variation: 0.04,
            sheep_pitch_variation: 0.3,
            ..Default::default()
        })
    }

    #[test]
    fn test_sheep_uses_only_sheep_variation() {
        let c = classifier().classify("Sheep").unwrap();
        assert_eq!(c.surface, SurfaceKind::Sheep);
        assert_eq!(c.category, SoundCategory::Sheep);
        assert!((c.pitch_variation - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_shared_categories() {
        let classifier = classifier();
        for name in ["Ground", "Grass"] {
            assert_eq!(classifier.classify(name).unwrap().category, SoundCategory::Grass);
        }
        for name in ["Wall", "Rock", "Plug"] {
            let c = classifier.classify(name).unwrap();
            assert_eq!(c.category, SoundCategory::Rock);
            assert!((c.pitch_variation - 0.02).abs() < 1e-6);
        }
        assert_eq!(classifier.classify("Dirt").unwrap().category, SoundCategory::Dirt);
        assert_eq!(classifier.classify("Sand").unwrap().category, SoundCategory::Sand);
    }

    #[test]
    fn test_unknown_surface_is_none() {
        assert!(classifier().classify("Nonsense").is_none());
        // Names are case-sensitive, like the scene's collider names
        assert!(classifier().classify("sheep").is_none());
    }
}
