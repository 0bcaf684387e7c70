//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! fixed step; the loop driver owns the accumulator and delta clamping.

use glam::Vec2;

use super::collision::{collect_items, resolve_ball_bricks, resolve_ball_paddle};
use super::geometry::paddle_bounce_vx;
use super::level::generate_level;
use super::state::{Ball, BallState, GamePhase, GameState, Item, ItemKind};
use crate::consts::*;

/// Input snapshot for a single tick (deterministic)
///
/// Produced once per frame before the update pass, decoupling event arrival
/// time from simulation time. Axis and pointer can both be present; the
/// pointer wins, matching last-writer semantics of the input sources.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard paddle axis in [-1, 1]
    pub axis: f32,
    /// Absolute pointer x in logical canvas coordinates
    pub pointer_x: Option<f32>,
    /// Launch attached balls (space/click/tap)
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start/confirm from menu and end screens
    pub start: bool,
    /// Skip to next level (debug/testing)
    pub skip_level: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Loading | GamePhase::Paused => return,
        GamePhase::Menu => {
            if input.start || input.launch {
                start_run(state);
            }
            return;
        }
        GamePhase::GameOver | GamePhase::GameComplete => {
            // Delay the end-screen menu briefly so the final frame is visible
            state.transition_ticks = state.transition_ticks.saturating_sub(1);
            if state.transition_ticks == 0 && (input.start || input.launch) {
                state.phase = GamePhase::Menu;
            }
            return;
        }
        GamePhase::LevelComplete => {
            state.time_ticks += 1;
            state.transition_ticks = state.transition_ticks.saturating_sub(1);
            if state.transition_ticks == 0 {
                advance_level(state);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    // Debug: jump straight to the next level
    if input.skip_level {
        state.level.force_clear();
    }

    state.time_ticks += 1;

    // Idle/demo mode - AI plays the game
    let mut input = input.clone();
    if input.idle_mode {
        drive_idle_input(state, &mut input);
    }
    let input = &input;

    // Paddle movement: pointer position wins over the keyboard axis
    if let Some(x) = input.pointer_x {
        state.paddle.set_center_x(x);
    } else if input.axis != 0.0 {
        state.paddle.move_axis(input.axis, dt_ms);
    }
    state.paddle.tick_extend();

    // Attached balls ride the paddle; launch on input
    for ball in &mut state.balls {
        ball.update_attached(&state.paddle);
    }
    if input.launch {
        let paddle_rect = state.paddle.rect;
        for ball in &mut state.balls {
            if ball.is_attached() {
                let vx = paddle_bounce_vx(ball.pos.x, &paddle_rect, BALL_START_SPEED);
                let vy = -(BALL_START_SPEED * BALL_START_SPEED - vx * vx)
                    .max(0.0)
                    .sqrt();
                ball.launch(Vec2::new(vx, vy));
            }
        }
    }

    // Integrate free balls (walls handled inside update)
    for ball in &mut state.balls {
        ball.update(dt_ms);
    }

    // Collision resolution; items spawn deferred to keep the borrow local
    let mut items_to_spawn: Vec<(ItemKind, Vec2)> = Vec::new();
    let mut scored: u32 = 0;
    for ball in &mut state.balls {
        resolve_ball_paddle(ball, &state.paddle);

        if let Some(hit) = resolve_ball_bricks(ball, &mut state.level) {
            scored += hit.result.points;
            if let Some(kind) = hit.result.item {
                items_to_spawn.push((kind, hit.spawn_pos));
            }
        }
    }
    state.add_score(scored);

    for (kind, pos) in items_to_spawn {
        let id = state.next_entity_id();
        state.items.push(Item::new(id, kind, pos));
    }

    // Advance brick breaking animations; fully faded bricks leave the vector
    for brick in &mut state.level.bricks {
        brick.tick_breaking();
    }
    state.level.bricks.retain(|b| !b.is_expired());

    // Items fall and get collected
    for item in &mut state.items {
        item.update(dt_ms);
    }
    let collected = collect_items(&mut state.items, &state.paddle);
    state.items.retain(|i| i.active);
    for kind in collected {
        apply_item(state, kind);
    }

    // Timed effect bookkeeping
    state.effects.decay();
    if state.effects.slow_ticks > 0 {
        for ball in state.balls.iter_mut().filter(|b| !b.is_attached()) {
            ball.clamp_speed(BALL_MIN_SPEED, BALL_MAX_SPEED * 0.6);
        }
    } else if state.effects.fast_ticks > 0 {
        for ball in state.balls.iter_mut().filter(|b| !b.is_attached()) {
            ball.clamp_speed(BALL_START_SPEED * 1.4, BALL_MAX_SPEED);
        }
    }

    // Record trails for rendering
    for ball in state.balls.iter_mut().filter(|b| !b.is_attached()) {
        ball.record_trail();
    }

    // Lost balls leave play at the bottom boundary
    state.balls.retain(|b| !b.is_out_of_bounds());
    if state.balls.is_empty() {
        state.lives = state.lives.saturating_sub(1);
        if state.lives == 0 {
            log::info!("Game over at level {} with score {}", state.level_index + 1, state.score);
            state.phase = GamePhase::GameOver;
            state.transition_ticks = TRANSITION_TICKS;
        } else {
            state.paddle.reset();
            state.spawn_ball_attached();
        }
        state.normalize_order();
        return;
    }

    // Clear detection
    if state.level.is_cleared() {
        if state.level_index + 1 >= MAX_LEVELS {
            log::info!("Game complete! Final score {}", state.score);
            state.phase = GamePhase::GameComplete;
        } else {
            state.phase = GamePhase::LevelComplete;
        }
        state.transition_ticks = TRANSITION_TICKS;
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Begin a fresh run from the menu
fn start_run(state: &mut GameState) {
    state.score = 0;
    state.lives = START_LIVES;
    state.level_index = 0;
    state.time_ticks = 0;
    state.balls.clear();
    state.items.clear();
    state.effects = Default::default();
    state.paddle.reset();
    generate_level(state);
    state.spawn_ball_attached();
    state.phase = GamePhase::Playing;
    log::info!("Run started with seed {}", state.seed);
}

/// Replace the cleared level with the next one
fn advance_level(state: &mut GameState) {
    state.level_index += 1;
    state.balls.clear();
    state.items.clear();
    state.effects = Default::default();
    state.paddle.reset();
    generate_level(state);
    state.spawn_ball_attached();
    state.phase = GamePhase::Playing;
}

/// Apply a collected power-up
fn apply_item(state: &mut GameState, kind: ItemKind) {
    log::debug!("Collected item {:?}", kind);
    match kind {
        ItemKind::Extend => state.paddle.apply_extend(),
        ItemKind::Slow => {
            state.effects.slow_ticks = SLOW_TICKS;
            state.effects.fast_ticks = 0;
        }
        ItemKind::Fast => {
            state.effects.fast_ticks = FAST_TICKS;
            state.effects.slow_ticks = 0;
        }
        ItemKind::Multi => {
            // Split two extra balls off an existing free ball
            if let Some(source) = state.balls.iter().find(|b| !b.is_attached()).cloned() {
                for angle in [0.5_f32, -0.5] {
                    let (sin, cos) = angle.sin_cos();
                    let vel = Vec2::new(
                        source.vel.x * cos - source.vel.y * sin,
                        source.vel.x * sin + source.vel.y * cos,
                    );
                    let id = state.next_entity_id();
                    let mut ball = Ball::new(id);
                    ball.state = BallState::Free;
                    ball.pos = source.pos;
                    ball.vel = vel;
                    state.balls.push(ball);
                }
            }
        }
        ItemKind::Life => state.lives = state.lives.saturating_add(1),
        ItemKind::Laser => state.effects.laser_ticks = LASER_TICKS,
        // The original's exit portal: the level counts as cleared immediately
        ItemKind::Warp => state.level.force_clear(),
    }
}

/// Demo AI: launch, chase the most dangerous ball, grab items when safe
fn drive_idle_input(state: &GameState, input: &mut TickInput) {
    if state.balls.iter().any(|b| b.is_attached()) {
        input.launch = true;
    }

    // The most dangerous ball is the lowest one still heading down
    let threat = state
        .balls
        .iter()
        .filter(|b| !b.is_attached() && b.vel.y > 0.0)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let all_safe = state
        .balls
        .iter()
        .filter(|b| !b.is_attached())
        .all(|b| b.vel.y < 0.0 || b.pos.y < SCREEN_HEIGHT * 0.5);

    if all_safe {
        // Go grab the lowest falling item
        if let Some(item) = state.items.iter().filter(|i| i.active).max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        }) {
            input.pointer_x = Some(item.pos.x);
            return;
        }
    }

    if let Some(ball) = threat {
        // Lead the ball slightly along its trajectory
        let frames_to_paddle = ((state.paddle.rect.y - ball.pos.y) / ball.vel.y).max(0.0);
        let predicted = ball.pos.x + ball.vel.x * frames_to_paddle.min(30.0);
        input.pointer_x = Some(predicted.clamp(0.0, SCREEN_WIDTH));
    }
}
