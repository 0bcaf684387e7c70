//! Game settings and preferences
//!
//! Persisted separately from game saves, best-effort.

use serde::{Deserialize, Serialize};

use crate::storage::Storage;

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Visual Effects ===
    /// Ball trails
    pub trails: bool,
    /// Brick break shrink/fade animation
    pub break_animation: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (minimize flashes and shake)
    pub reduced_motion: bool,
    /// High contrast mode
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trails: true,
            break_animation: true,
            show_fps: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "brickbreak_settings";

    /// Effective break animation (respects reduced_motion)
    pub fn effective_break_animation(&self) -> bool {
        self.break_animation && !self.reduced_motion
    }

    /// Effective sound volume
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(storage: &Storage) -> Self {
        if let Some(json) = storage.get_item(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring corrupt settings: {e}"),
            }
        }
        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings, best-effort
    pub fn save(&self, storage: &Storage) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}
