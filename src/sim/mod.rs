//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{BrickCollision, collect_items, resolve_ball_bricks, resolve_ball_paddle};
pub use geometry::{
    Circle, CircleRectHit, HitSide, Rect, circle_rect_collision, paddle_bounce_vx, rect_intersect,
};
pub use level::{Level, generate_level, should_skip_cell};
pub use state::{
    Ball, BallState, Brick, BrickHitResult, BrickKind, GamePhase, GameState, Item, ItemKind,
    Paddle,
};
pub use tick::{TickInput, tick};
