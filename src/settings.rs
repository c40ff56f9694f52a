//! Player preferences
//!
//! Value type plus its JSON form. Reading and writing the file belongs to
//! the host; a missing or corrupt document falls back to defaults.

use serde::{Deserialize, Serialize};

/// Volume preferences, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 0.5,
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

impl Settings {
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = clamp_volume(volume);
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = clamp_volume(volume);
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = clamp_volume(volume);
    }

    /// Gain applied to sound effects
    pub fn effective_sfx(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }

    /// Gain applied to music
    pub fn effective_music(&self) -> f32 {
        self.master_volume * self.music_volume
    }

    /// Parse saved settings, clamping out-of-range values. Corrupt input
    /// yields defaults.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                settings.set_master_volume(settings.master_volume);
                settings.set_sfx_volume(settings.sfx_volume);
                settings.set_music_volume(settings.music_volume);
                settings
            }
            Err(e) => {
                log::warn!("Settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volumes_are_clamped() {
        let mut s = Settings::default();
        s.set_master_volume(1.7);
        s.set_sfx_volume(-0.2);
        s.set_music_volume(f32::NAN);
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.sfx_volume, 0.0);
        assert_eq!(s.music_volume, 0.0);
    }

    #[test]
    fn test_corrupt_json_gives_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
        assert_eq!(Settings::from_json(""), Settings::default());
    }

    #[test]
    fn test_saved_settings_load_back() {
        let mut s = Settings::default();
        s.set_music_volume(0.25);
        assert_eq!(Settings::from_json(&s.to_json()), s);

        let loud = Settings::from_json(r#"{ "master_volume": 3.0 }"#);
        assert_eq!(loud.master_volume, 1.0);
        assert_eq!(loud.music_volume, 0.5);
    }
}
