//! Audio cue sink
//!
//! The simulation only decides *which* sound should play and how loud; actual
//! playback belongs to the platform. `AudioManager` applies the player's volume
//! settings and logs the cue.

use crate::settings::Settings;
use crate::sim::{LaunchTier, SoundCategory};

/// Receiver for sound intents
pub trait AudioSink {
    fn play_launch_cue(&mut self, tier: LaunchTier, pitch: f32);
    fn play_collision_cue(&mut self, category: SoundCategory, volume: f32, pitch: f32);
}

/// A cue after volume settings were applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayedCue {
    Launch {
        tier: LaunchTier,
        volume: f32,
        pitch: f32,
    },
    Collision {
        category: SoundCategory,
        volume: f32,
        pitch: f32,
    },
}

/// Audio manager for the game
#[derive(Debug, Clone, Default)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Most recent cue, for HUD/debug display
    last: Option<PlayedCue>,
    played: u64,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            muted: settings.muted,
            last: None,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn last(&self) -> Option<PlayedCue> {
        self.last
    }

    /// Number of cues that were audible
    pub fn played(&self) -> u64 {
        self.played
    }

    fn emit(&mut self, cue: PlayedCue) {
        log::debug!("Audio cue {cue:?}");
        self.last = Some(cue);
        self.played += 1;
    }
}

impl AudioSink for AudioManager {
    fn play_launch_cue(&mut self, tier: LaunchTier, pitch: f32) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        self.emit(PlayedCue::Launch {
            tier,
            volume,
            pitch,
        });
    }

    fn play_collision_cue(&mut self, category: SoundCategory, volume: f32, pitch: f32) {
        let volume = volume * self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        self.emit(PlayedCue::Collision {
            category,
            volume,
            pitch,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_volume_scaled_by_settings() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        let mut audio = AudioManager::new(&settings);
        audio.play_collision_cue(SoundCategory::Rock, 0.8, 1.0);
        assert_eq!(
            audio.last(),
            Some(PlayedCue::Collision {
                category: SoundCategory::Rock,
                volume: 0.2,
                pitch: 1.0,
            })
        );
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new(&Settings::default());
        audio.set_muted(true);
        audio.play_launch_cue(LaunchTier::Big, 1.0);
        audio.play_collision_cue(SoundCategory::Sheep, 1.0, 1.0);
        assert_eq!(audio.played(), 0);
        assert_eq!(audio.last(), None);
    }
}
