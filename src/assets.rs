//! Asset table collaborator
//!
//! Assets resolve through an explicit load phase before the game loop starts.
//! Missing files are acceptable: lookups never fail, they fall back to a
//! generated placeholder, and audio playback silently no-ops when the backend
//! is absent.

use std::collections::HashMap;
use std::path::PathBuf;

/// A loaded (or placeholder) image
#[derive(Debug, Clone)]
pub struct ImageHandle {
    pub name: String,
    /// Raw file bytes; None for generated placeholders
    pub bytes: Option<Vec<u8>>,
    pub placeholder: bool,
}

/// Sound effect names used by the game loop
pub mod sounds {
    pub const PADDLE_HIT: &str = "paddle_hit";
    pub const WALL_HIT: &str = "wall_hit";
    pub const BRICK_HIT: &str = "brick_hit";
    pub const BRICK_BREAK: &str = "brick_break";
    pub const ITEM_COLLECT: &str = "item_collect";
    pub const BALL_LOST: &str = "ball_lost";
    pub const LEVEL_CLEAR: &str = "level_clear";
    pub const LAUNCH: &str = "launch";
    pub const GAME_OVER: &str = "game_over";
}

/// Ready-to-query asset table
pub struct AssetLibrary {
    images: HashMap<String, ImageHandle>,
    /// Shared placeholder returned for names that were never loaded
    fallback: ImageHandle,
    /// Whether an audio backend is available
    audio_enabled: bool,
    volume: f32,
}

impl AssetLibrary {
    /// Load the named images from a base directory
    ///
    /// `on_progress` is called after each entry with (loaded, total); it runs
    /// once more with (total, total) on completion. Load failures produce
    /// placeholders, never errors.
    pub fn load<F>(base_dir: impl Into<PathBuf>, names: &[&str], mut on_progress: F) -> Self
    where
        F: FnMut(usize, usize),
    {
        let base_dir = base_dir.into();
        let total = names.len();
        let mut images = HashMap::with_capacity(total);

        for (i, name) in names.iter().enumerate() {
            let path = base_dir.join(format!("{name}.png"));
            let handle = match std::fs::read(&path) {
                Ok(bytes) => ImageHandle {
                    name: name.to_string(),
                    bytes: Some(bytes),
                    placeholder: false,
                },
                Err(e) => {
                    log::warn!("Asset {name} missing ({e}), using placeholder");
                    Self::make_placeholder(name)
                }
            };
            images.insert(name.to_string(), handle);
            on_progress(i + 1, total);
        }
        on_progress(total, total);
        log::info!(
            "Assets ready: {} loaded, {} placeholders",
            images.values().filter(|h| !h.placeholder).count(),
            images.values().filter(|h| h.placeholder).count()
        );

        Self {
            images,
            fallback: Self::make_placeholder("fallback"),
            audio_enabled: false,
            volume: 1.0,
        }
    }

    /// An empty library where everything is a placeholder (headless/test use)
    pub fn placeholder_only() -> Self {
        Self {
            images: HashMap::new(),
            fallback: Self::make_placeholder("fallback"),
            audio_enabled: false,
            volume: 1.0,
        }
    }

    fn make_placeholder(name: &str) -> ImageHandle {
        ImageHandle {
            name: name.to_string(),
            bytes: None,
            placeholder: true,
        }
    }

    /// Look up an image; unknown names return the shared placeholder
    pub fn image(&self, name: &str) -> &ImageHandle {
        self.images.get(name).unwrap_or(&self.fallback)
    }

    /// Set the playback volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Mark the audio backend ready (or gone); playback no-ops until a
    /// frontend calls this with `true`
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// Play a named sound, fire-and-forget
    ///
    /// No-ops when the backend is absent or the effective volume is zero.
    pub fn play_audio(&self, name: &str, volume: f32) {
        let vol = (self.volume * volume).clamp(0.0, 1.0);
        if !self.audio_enabled || vol <= 0.0 {
            return;
        }
        log::trace!("play {name} at {vol:.2}");
    }
}
