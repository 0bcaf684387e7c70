//! Brickbreak - a deterministic brick-breaker simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, entities, levels, collisions, game loop)
//! - `assets`: Asset table collaborator (images/audio with generated fallbacks)
//! - `storage`: Best-effort key/value persistence
//! - `settings`: Data-driven preferences
//! - `highscores`: High score tracking

pub mod assets;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod storage;

pub use highscores::HighScores;
pub use settings::Settings;
pub use storage::Storage;

/// Game configuration constants
pub mod consts {
    /// Logical playfield size (scaled to fit the display surface)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Nominal frame time at 60 Hz; entity velocities are in pixels per frame
    pub const FRAME_TIME_MS: f32 = 1000.0 / 60.0;
    /// Frame delta clamp to avoid a spiral of death after tab backgrounding
    pub const MAX_FRAME_DELTA_MS: f32 = 200.0;
    /// Maximum fixed substeps drained per rendered frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    pub const PADDLE_Y: f32 = 560.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Width multiplier while an extend power-up is active
    pub const PADDLE_EXTEND_FACTOR: f32 = 1.5;
    /// Extend power-up duration in ticks (10 seconds at 60 Hz)
    pub const PADDLE_EXTEND_TICKS: u32 = 600;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Launch speed in pixels per frame
    pub const BALL_START_SPEED: f32 = 5.0;
    pub const BALL_MIN_SPEED: f32 = 2.0;
    pub const BALL_MAX_SPEED: f32 = 10.0;
    /// Speed boost applied on each paddle hit (multiplicative, capped at max)
    pub const PADDLE_SPEEDUP: f32 = 1.05;
    /// Bounce angle bound off the paddle, degrees from vertical
    pub const BOUNCE_MAX_DEG: f32 = 60.0;

    /// Brick grid defaults
    pub const GRID_COLS: u32 = 10;
    pub const BASE_ROWS: u32 = 4;
    pub const GRID_TOP: f32 = 60.0;
    pub const GRID_SIDE_MARGIN: f32 = 20.0;
    pub const BRICK_GAP: f32 = 4.0;
    pub const BRICK_HEIGHT: f32 = 24.0;
    /// Shrink/fade animation after the breaking hit (~300 ms at 60 Hz)
    pub const BREAK_ANIM_TICKS: u32 = 18;

    /// Item (power-up) defaults
    pub const ITEM_SIZE: f32 = 24.0;
    /// Fall speed in pixels per frame
    pub const ITEM_FALL_SPEED: f32 = 2.5;

    /// Timed effect durations in ticks
    pub const SLOW_TICKS: u32 = 360;
    pub const FAST_TICKS: u32 = 360;
    pub const LASER_TICKS: u32 = 480;

    /// Run structure
    pub const START_LIVES: u8 = 3;
    pub const MAX_LEVELS: u32 = 8;
    /// Level-complete / game-over overlay duration (2 seconds at 60 Hz)
    pub const TRANSITION_TICKS: u32 = 120;
}

/// Convert a frame delta in milliseconds to a step scale where 1.0 is one
/// nominal 60 Hz frame
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::FRAME_TIME_MS
}
