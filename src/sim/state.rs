//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::level::Level;
use crate::consts::*;
use crate::frame_scale;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Asset load phase before the menu is shown
    Loading,
    /// Title menu, waiting for start input
    Menu,
    /// Active gameplay (includes serving with an attached ball)
    Playing,
    /// Game is paused
    Paused,
    /// Level cleared, transition overlay before the next level
    LevelComplete,
    /// Lives exhausted
    GameOver,
    /// Last level cleared
    GameComplete,
}

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Ball rides the paddle at a horizontal offset from paddle center
    Attached { offset: f32 },
    /// Ball is free-moving
    Free,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 20;

/// A ball entity
///
/// Position is the circle center; velocities are pixels per 60 Hz frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
    /// Trail history for rendering (newest first, no gameplay effect)
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl Ball {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            state: BallState::Attached { offset: 0.0 },
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, BallState::Attached { .. })
    }

    /// Record current position to trail (call each tick when free)
    pub fn record_trail(&mut self) {
        let speed = self.vel.length();
        self.trail.insert(0, TrailPoint { pos: self.pos, speed });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    /// Clear trail (on respawn/attach)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Derive position from the carrying paddle; velocity is ignored while
    /// attached
    pub fn update_attached(&mut self, paddle: &Paddle) {
        if let BallState::Attached { offset } = self.state {
            self.pos = Vec2::new(
                paddle.rect.center_x() + offset,
                paddle.rect.y - self.radius,
            );
        }
    }

    /// Release from the paddle with the given velocity
    pub fn launch(&mut self, vel: Vec2) {
        if self.is_attached() {
            self.vel = vel;
            self.state = BallState::Free;
            self.clear_trail();
        }
    }

    /// Integrate one step and reflect off the left/right/top walls,
    /// repositioning in-bounds so the ball cannot tunnel through a wall on
    /// the bounce frame. The bottom boundary is not reflected; crossing it
    /// is handled by the game loop as a lost ball.
    pub fn update(&mut self, dt_ms: f32) {
        if self.is_attached() {
            return;
        }
        let step = frame_scale(dt_ms);
        self.pos += self.vel * step;

        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x = -self.vel.x;
        } else if self.pos.x + self.radius > SCREEN_WIDTH {
            self.pos.x = SCREEN_WIDTH - self.radius;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vel.y = -self.vel.y;
        }
    }

    /// Ball has fully crossed the bottom screen boundary
    pub fn is_out_of_bounds(&self) -> bool {
        self.pos.y - self.radius > SCREEN_HEIGHT
    }

    /// Clamp speed into the playable window, preserving direction
    pub fn clamp_speed(&mut self, min: f32, max: f32) {
        let speed = self.vel.length();
        if speed <= f32::EPSILON {
            return;
        }
        if speed < min {
            self.vel = self.vel / speed * min;
        } else if speed > max {
            self.vel = self.vel / speed * max;
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Width without any extend effect
    pub base_width: f32,
    /// Horizontal speed in pixels per frame
    pub speed: f32,
    /// Remaining extend power-up ticks; width reverts when it expires
    pub extend_ticks: u32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                (SCREEN_WIDTH - PADDLE_WIDTH) / 2.0,
                PADDLE_Y,
                PADDLE_WIDTH,
                PADDLE_HEIGHT,
            ),
            base_width: PADDLE_WIDTH,
            speed: PADDLE_SPEED,
            extend_ticks: 0,
        }
    }
}

impl Paddle {
    /// Move by a [-1, 1] input axis and clamp into the screen
    pub fn move_axis(&mut self, axis: f32, dt_ms: f32) {
        let step = frame_scale(dt_ms);
        self.rect.x += axis.clamp(-1.0, 1.0) * self.speed * step;
        self.clamp_to_bounds();
    }

    /// Absolute pointer positioning (pointer x maps to paddle center)
    pub fn set_center_x(&mut self, x: f32) {
        self.rect.x = x - self.rect.w / 2.0;
        self.clamp_to_bounds();
    }

    /// Enforce `0 <= x <= screen_width - width`
    pub fn clamp_to_bounds(&mut self) {
        self.rect.x = self.rect.x.clamp(0.0, SCREEN_WIDTH - self.rect.w);
    }

    /// Start (or refresh) the extend effect, widening around the center
    pub fn apply_extend(&mut self) {
        let center = self.rect.center_x();
        self.rect.w = self.base_width * PADDLE_EXTEND_FACTOR;
        self.rect.x = center - self.rect.w / 2.0;
        self.extend_ticks = PADDLE_EXTEND_TICKS;
        self.clamp_to_bounds();
    }

    /// Decrement the extend timer, reverting width on expiry
    pub fn tick_extend(&mut self) {
        if self.extend_ticks > 0 {
            self.extend_ticks -= 1;
            if self.extend_ticks == 0 {
                let center = self.rect.center_x();
                self.rect.w = self.base_width;
                self.rect.x = center - self.rect.w / 2.0;
                self.clamp_to_bounds();
            }
        }
    }

    /// Reset position and width (on life loss)
    pub fn reset(&mut self) {
        let w = self.base_width;
        self.rect = Rect::new((SCREEN_WIDTH - w) / 2.0, PADDLE_Y, w, PADDLE_HEIGHT);
        self.extend_ticks = 0;
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    Strong,
    Unbreakable,
}

impl BrickKind {
    /// Hits to break; -1 marks unbreakable
    pub fn max_hits(&self) -> i32 {
        match self {
            BrickKind::Normal => 1,
            BrickKind::Strong => 2,
            BrickKind::Unbreakable => -1,
        }
    }

    /// Point value on the breaking hit (unbreakable: per hit)
    pub fn points(&self) -> u32 {
        match self {
            BrickKind::Normal => 10,
            BrickKind::Strong => 20,
            BrickKind::Unbreakable => 5,
        }
    }
}

/// Outcome of a single `Brick::hit` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickHitResult {
    pub broken: bool,
    pub points: u32,
    pub item: Option<ItemKind>,
}

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub rect: Rect,
    pub kind: BrickKind,
    /// Accumulated hits; doubles as the damage-tint index for rendering
    pub hits: u32,
    pub broken: bool,
    /// Shrink/fade animation ticks remaining after the breaking hit
    pub breaking_ticks: u32,
    /// Item spawned when this brick breaks
    pub item: Option<ItemKind>,
}

impl Brick {
    pub fn new(id: u32, rect: Rect, kind: BrickKind, item: Option<ItemKind>) -> Self {
        Self {
            id,
            rect,
            kind,
            hits: 0,
            broken: false,
            breaking_ticks: 0,
            item,
        }
    }

    /// Brick still participates in collision
    pub fn is_active(&self) -> bool {
        !self.broken
    }

    /// Breaking animation finished; brick is no longer rendered
    pub fn is_expired(&self) -> bool {
        self.broken && self.breaking_ticks == 0
    }

    /// Register one hit
    ///
    /// Unbreakable bricks always earn the same points and never progress
    /// toward breaking. Multi-hit bricks earn half points on intermediate
    /// hits. The breaking hit earns full points, reports the carried item,
    /// and starts the shrink/fade animation. Hits after breaking are no-ops.
    pub fn hit(&mut self) -> BrickHitResult {
        if self.broken {
            return BrickHitResult {
                broken: true,
                points: 0,
                item: None,
            };
        }

        let max_hits = self.kind.max_hits();
        if max_hits < 0 {
            self.hits += 1;
            return BrickHitResult {
                broken: false,
                points: self.kind.points(),
                item: None,
            };
        }

        self.hits += 1;
        if self.hits >= max_hits as u32 {
            self.broken = true;
            self.breaking_ticks = BREAK_ANIM_TICKS;
            BrickHitResult {
                broken: true,
                points: self.kind.points(),
                item: self.item.take(),
            }
        } else {
            BrickHitResult {
                broken: false,
                points: self.kind.points() / 2,
                item: None,
            }
        }
    }

    /// Advance the breaking animation
    pub fn tick_breaking(&mut self) {
        if self.broken && self.breaking_ticks > 0 {
            self.breaking_ticks -= 1;
        }
    }
}

/// Item (power-up) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Extend,
    Slow,
    Multi,
    Life,
    Laser,
    Fast,
    Warp,
}

/// A falling pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub collected: bool,
    pub active: bool,
}

impl Item {
    pub fn new(id: u32, kind: ItemKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::new(0.0, ITEM_FALL_SPEED),
            collected: false,
            active: true,
        }
    }

    /// Bounding rect for paddle-overlap collection
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.pos.x - ITEM_SIZE / 2.0,
            self.pos.y - ITEM_SIZE / 2.0,
            ITEM_SIZE,
            ITEM_SIZE,
        )
    }

    /// Integrate straight-line fall; self-deactivates below the screen
    pub fn update(&mut self, dt_ms: f32) {
        if !self.active {
            return;
        }
        self.pos += self.vel * frame_scale(dt_ms);
        if self.pos.y - ITEM_SIZE / 2.0 > SCREEN_HEIGHT {
            self.active = false;
        }
    }

    /// Collect the item; idempotent
    pub fn collect(&mut self) -> Option<ItemKind> {
        if self.collected || !self.active {
            return None;
        }
        self.collected = true;
        self.active = false;
        Some(self.kind)
    }
}

/// Active timed power-up effects (paddle extend lives on the paddle itself)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub slow_ticks: u32,
    pub fast_ticks: u32,
    pub laser_ticks: u32,
}

impl ActiveEffects {
    pub fn decay(&mut self) {
        self.slow_ticks = self.slow_ticks.saturating_sub(1);
        self.fast_ticks = self.fast_ticks.saturating_sub(1);
        self.laser_ticks = self.laser_ticks.saturating_sub(1);
    }
}

/// Complete game state (deterministic, serializable)
///
/// All randomness derives from `seed` plus the level number, so the state
/// carries no live RNG and replays/saves reproduce exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current level index (0-based)
    pub level_index: u32,
    /// Player lives
    pub lives: u8,
    /// Score
    pub score: u64,
    /// Best score seen, updated live whenever exceeded
    pub high_score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Overlay timer for level-complete / game-over transitions
    pub transition_ticks: u32,
    /// Player paddle
    pub paddle: Paddle,
    /// Active balls (sorted by id for determinism)
    pub balls: Vec<Ball>,
    /// Active level and its bricks
    pub level: Level,
    /// Falling items (sorted by id for determinism)
    pub items: Vec<Item>,
    /// Active power-up effects
    pub effects: ActiveEffects,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed, sitting at the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            level_index: 0,
            lives: START_LIVES,
            score: 0,
            high_score: 0,
            time_ticks: 0,
            phase: GamePhase::Menu,
            transition_ticks: 0,
            paddle: Paddle::default(),
            balls: Vec::new(),
            level: Level::empty(),
            items: Vec::new(),
            effects: ActiveEffects::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a ball attached to the paddle
    pub fn spawn_ball_attached(&mut self) {
        let id = self.next_entity_id();
        let mut ball = Ball::new(id);
        ball.update_attached(&self.paddle);
        self.balls.push(ball);
    }

    /// Record score and refresh the live high score
    pub fn add_score(&mut self, points: u32) {
        self.score += points as u64;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    /// Ensure entity vectors are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
        self.items.sort_by_key(|i| i.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_TIME_MS;

    #[test]
    fn test_attached_ball_follows_paddle() {
        let mut paddle = Paddle::default();
        paddle.rect.x = 100.0;
        let mut ball = Ball::new(1);
        ball.state = BallState::Attached { offset: 10.0 };
        ball.update_attached(&paddle);
        assert_eq!(ball.pos.x, paddle.rect.center_x() + 10.0);
        assert_eq!(ball.pos.y, paddle.rect.y - ball.radius);

        // Velocity is ignored while attached
        ball.vel = Vec2::new(99.0, 99.0);
        ball.update(FRAME_TIME_MS);
        assert_eq!(ball.pos.x, paddle.rect.center_x() + 10.0);
    }

    #[test]
    fn test_launch_scenario() {
        // Ball at rest on the paddle at (350, 550), launched with (3, -4)
        let mut ball = Ball::new(1);
        ball.pos = Vec2::new(350.0, 550.0);
        ball.launch(Vec2::new(3.0, -4.0));
        assert!(!ball.is_attached());

        ball.update(FRAME_TIME_MS);
        assert!((ball.pos.x - 353.0).abs() < 1e-4);
        assert!((ball.pos.y - 546.0).abs() < 1e-4);
    }

    #[test]
    fn test_ball_wall_reflection_repositions() {
        let mut ball = Ball::new(1);
        ball.state = BallState::Free;
        ball.pos = Vec2::new(10.0, 300.0);
        ball.vel = Vec2::new(-8.0, 0.0);
        ball.update(FRAME_TIME_MS);
        assert_eq!(ball.pos.x, ball.radius);
        assert!(ball.vel.x > 0.0);

        ball.pos = Vec2::new(300.0, 9.0);
        ball.vel = Vec2::new(0.0, -8.0);
        ball.update(FRAME_TIME_MS);
        assert_eq!(ball.pos.y, ball.radius);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_ball_bottom_not_reflected() {
        let mut ball = Ball::new(1);
        ball.state = BallState::Free;
        ball.pos = Vec2::new(300.0, SCREEN_HEIGHT - 2.0);
        ball.vel = Vec2::new(0.0, 8.0);
        for _ in 0..4 {
            ball.update(FRAME_TIME_MS);
        }
        assert!(ball.vel.y > 0.0);
        assert!(ball.is_out_of_bounds());
    }

    #[test]
    fn test_paddle_clamps_to_bounds() {
        let mut paddle = Paddle::default();
        for _ in 0..200 {
            paddle.move_axis(-1.0, FRAME_TIME_MS);
        }
        assert_eq!(paddle.rect.x, 0.0);
        for _ in 0..400 {
            paddle.move_axis(1.0, FRAME_TIME_MS);
        }
        assert_eq!(paddle.rect.x, SCREEN_WIDTH - paddle.rect.w);

        paddle.set_center_x(-50.0);
        assert_eq!(paddle.rect.x, 0.0);
    }

    #[test]
    fn test_paddle_extend_expires() {
        let mut paddle = Paddle::default();
        paddle.apply_extend();
        assert!((paddle.rect.w - PADDLE_WIDTH * PADDLE_EXTEND_FACTOR).abs() < 1e-4);
        for _ in 0..PADDLE_EXTEND_TICKS {
            paddle.tick_extend();
        }
        assert_eq!(paddle.extend_ticks, 0);
        assert!((paddle.rect.w - PADDLE_WIDTH).abs() < 1e-4);
    }

    #[test]
    fn test_normal_brick_hit_table() {
        let mut brick = Brick::new(1, Rect::new(0.0, 0.0, 60.0, 24.0), BrickKind::Normal, None);
        let result = brick.hit();
        assert_eq!(
            result,
            BrickHitResult {
                broken: true,
                points: 10,
                item: None
            }
        );
        // Further hits never score again
        let again = brick.hit();
        assert!(again.broken);
        assert_eq!(again.points, 0);
    }

    #[test]
    fn test_strong_brick_hit_table() {
        let mut brick = Brick::new(1, Rect::new(0.0, 0.0, 60.0, 24.0), BrickKind::Strong, None);
        let first = brick.hit();
        assert_eq!(
            first,
            BrickHitResult {
                broken: false,
                points: 10,
                item: None
            }
        );
        let second = brick.hit();
        assert_eq!(
            second,
            BrickHitResult {
                broken: true,
                points: 20,
                item: None
            }
        );
    }

    #[test]
    fn test_unbreakable_brick_never_breaks() {
        let mut brick = Brick::new(
            1,
            Rect::new(0.0, 0.0, 60.0, 24.0),
            BrickKind::Unbreakable,
            None,
        );
        for _ in 0..100 {
            let result = brick.hit();
            assert!(!result.broken);
            assert_eq!(result.points, 5);
        }
        assert!(!brick.broken);
    }

    #[test]
    fn test_brick_item_reported_once() {
        let mut brick = Brick::new(
            1,
            Rect::new(0.0, 0.0, 60.0, 24.0),
            BrickKind::Normal,
            Some(ItemKind::Extend),
        );
        let result = brick.hit();
        assert_eq!(result.item, Some(ItemKind::Extend));
        assert_eq!(brick.hit().item, None);
    }

    #[test]
    fn test_brick_breaking_animation_expires() {
        let mut brick = Brick::new(1, Rect::new(0.0, 0.0, 60.0, 24.0), BrickKind::Normal, None);
        brick.hit();
        assert!(!brick.is_expired());
        for _ in 0..BREAK_ANIM_TICKS {
            brick.tick_breaking();
        }
        assert!(brick.is_expired());
    }

    #[test]
    fn test_item_collect_idempotent() {
        let mut item = Item::new(1, ItemKind::Life, Vec2::new(100.0, 100.0));
        assert_eq!(item.collect(), Some(ItemKind::Life));
        assert_eq!(item.collect(), None);
    }

    #[test]
    fn test_item_falls_off_screen() {
        let mut item = Item::new(1, ItemKind::Slow, Vec2::new(100.0, SCREEN_HEIGHT - 5.0));
        for _ in 0..20 {
            item.update(FRAME_TIME_MS);
        }
        assert!(!item.active);
        assert_eq!(item.collect(), None);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut ball = Ball::new(1);
        ball.state = BallState::Free;
        for _ in 0..TRAIL_LENGTH * 2 {
            ball.record_trail();
        }
        assert_eq!(ball.trail.len(), TRAIL_LENGTH);
    }
}
