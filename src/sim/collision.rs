//! Per-frame collision orchestration
//!
//! Stateless passes over borrowed entities: ball↔paddle, ball↔bricks,
//! item↔paddle. Mutation happens through entity methods only; nothing here
//! holds state across frames.

use glam::Vec2;

use super::geometry::{
    Circle, HitSide, circle_rect_collision, paddle_bounce_vx, rect_intersect, reflect_for_side,
};
use super::level::Level;
use super::state::{Ball, BrickHitResult, Item, ItemKind, Paddle};
use crate::consts::{BALL_MAX_SPEED, PADDLE_SPEEDUP};

/// A resolved ball↔brick hit, relayed to the tick for scoring and item drops
#[derive(Debug, Clone, Copy)]
pub struct BrickCollision {
    pub brick_id: u32,
    pub side: HitSide,
    pub result: BrickHitResult,
    /// Brick center, used as the item spawn point
    pub spawn_pos: Vec2,
}

/// Resolve a ball bouncing off the paddle
///
/// Only evaluated for a free ball moving downward at the moment of overlap,
/// which prevents repeated re-triggering while the ball is embedded in the
/// paddle. On a hit the bounce angle comes from the hit position along the
/// paddle width, Y is forced upward, speed gets a capped boost, and the ball
/// is repositioned flush above the paddle top (anti-sticking).
pub fn resolve_ball_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    if ball.is_attached() || ball.vel.y <= 0.0 {
        return false;
    }

    let circle = Circle::new(ball.pos, ball.radius);
    if circle_rect_collision(&circle, &paddle.rect).is_none() {
        return false;
    }

    let speed = (ball.vel.length() * PADDLE_SPEEDUP).min(BALL_MAX_SPEED);
    let vx = paddle_bounce_vx(ball.pos.x, &paddle.rect, speed);
    let vy = -(speed * speed - vx * vx).max(0.0).sqrt();
    ball.vel = Vec2::new(vx, vy);
    ball.pos.y = paddle.rect.y - ball.radius;
    true
}

/// Scan bricks in array (row-major) order and resolve the first geometric hit
///
/// Reflects the X or Y velocity component based on the detected side, applies
/// the brick's `hit()`, and short-circuits: at most one brick is resolved per
/// ball per frame. A ball touching multiple bricks resolves only the first
/// found, and fast balls may tunnel through thin bricks; this is a known
/// simplification (no swept testing).
pub fn resolve_ball_bricks(ball: &mut Ball, level: &mut Level) -> Option<BrickCollision> {
    if ball.is_attached() {
        return None;
    }

    let circle = Circle::new(ball.pos, ball.radius);
    let hit = level
        .bricks
        .iter()
        .enumerate()
        .find_map(|(idx, brick)| {
            if !brick.is_active() {
                return None;
            }
            circle_rect_collision(&circle, &brick.rect).map(|h| (idx, h))
        });

    let (idx, geo) = hit?;

    ball.vel = reflect_for_side(ball.vel, geo.side);

    let brick = &mut level.bricks[idx];
    let result = brick.hit();
    let collision = BrickCollision {
        brick_id: brick.id,
        side: geo.side,
        result,
        spawn_pos: brick.rect.center(),
    };
    if result.broken {
        level.register_break();
    }
    Some(collision)
}

/// Collect every active item overlapping the paddle rectangle
///
/// Collection is idempotent per item; returns the kinds picked up this frame.
pub fn collect_items(items: &mut [Item], paddle: &Paddle) -> Vec<ItemKind> {
    let mut collected = Vec::new();
    for item in items.iter_mut() {
        if item.active && rect_intersect(&item.rect(), &paddle.rect) {
            if let Some(kind) = item.collect() {
                collected.push(kind);
            }
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::geometry::Rect;
    use crate::sim::state::{BallState, Brick, BrickKind, GameState};

    fn free_ball(pos: Vec2, vel: Vec2) -> Ball {
        let mut ball = Ball::new(1);
        ball.state = BallState::Free;
        ball.pos = pos;
        ball.vel = vel;
        ball
    }

    fn level_with(bricks: Vec<Brick>) -> Level {
        let total = bricks
            .iter()
            .filter(|b| b.kind != BrickKind::Unbreakable)
            .count() as u32;
        Level {
            bricks,
            rows: 1,
            cols: 1,
            total_breakable: total,
            broken_count: 0,
        }
    }

    #[test]
    fn test_paddle_hit_requires_downward_motion() {
        let paddle = Paddle::default();
        let on_paddle = Vec2::new(paddle.rect.center_x(), paddle.rect.y - 2.0);

        let mut rising = free_ball(on_paddle, Vec2::new(0.0, -5.0));
        assert!(!resolve_ball_paddle(&mut rising, &paddle));

        let mut falling = free_ball(on_paddle, Vec2::new(0.0, 5.0));
        assert!(resolve_ball_paddle(&mut falling, &paddle));
        assert!(falling.vel.y < 0.0);
        // Repositioned flush above the paddle, so the next frame cannot
        // re-trigger while moving upward
        assert_eq!(falling.pos.y, paddle.rect.y - falling.radius);
    }

    #[test]
    fn test_paddle_center_hit_bounces_straight_up() {
        let paddle = Paddle::default();
        let mut ball = free_ball(
            Vec2::new(paddle.rect.center_x(), paddle.rect.y - 2.0),
            Vec2::new(0.0, 5.0),
        );
        assert!(resolve_ball_paddle(&mut ball, &paddle));
        assert!(ball.vel.x.abs() < 1e-4);
    }

    #[test]
    fn test_paddle_speedup_capped() {
        let paddle = Paddle::default();
        let mut ball = free_ball(
            Vec2::new(paddle.rect.center_x(), paddle.rect.y - 2.0),
            Vec2::new(0.0, BALL_MAX_SPEED),
        );
        assert!(resolve_ball_paddle(&mut ball, &paddle));
        assert!(ball.vel.length() <= BALL_MAX_SPEED + 1e-4);
    }

    #[test]
    fn test_ball_bricks_first_hit_only() {
        // Two adjacent bricks, ball overlaps both; only the first in array
        // order resolves
        let bricks = vec![
            Brick::new(10, Rect::new(100.0, 100.0, 60.0, 24.0), BrickKind::Normal, None),
            Brick::new(11, Rect::new(160.0, 100.0, 60.0, 24.0), BrickKind::Normal, None),
        ];
        let mut level = level_with(bricks);
        let mut ball = free_ball(Vec2::new(160.0, 130.0), Vec2::new(0.0, -5.0));

        let hit = resolve_ball_bricks(&mut ball, &mut level).unwrap();
        assert_eq!(hit.brick_id, 10);
        assert!(hit.result.broken);
        assert_eq!(level.broken_count, 1);
        assert!(level.bricks[1].is_active());
    }

    #[test]
    fn test_ball_brick_side_reflection() {
        let bricks = vec![Brick::new(
            10,
            Rect::new(100.0, 100.0, 60.0, 24.0),
            BrickKind::Normal,
            None,
        )];
        let mut level = level_with(bricks);

        // Hit from below reflects Y
        let mut ball = free_ball(Vec2::new(130.0, 128.0), Vec2::new(0.0, -5.0));
        let hit = resolve_ball_bricks(&mut ball, &mut level).unwrap();
        assert_eq!(hit.side, HitSide::Bottom);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_broken_brick_is_skipped() {
        let bricks = vec![Brick::new(
            10,
            Rect::new(100.0, 100.0, 60.0, 24.0),
            BrickKind::Normal,
            None,
        )];
        let mut level = level_with(bricks);
        level.bricks[0].hit();
        let mut ball = free_ball(Vec2::new(130.0, 128.0), Vec2::new(0.0, -5.0));
        assert!(resolve_ball_bricks(&mut ball, &mut level).is_none());
    }

    #[test]
    fn test_item_collection_idempotent_pass() {
        let paddle = Paddle::default();
        let mut items = vec![
            Item::new(1, ItemKind::Extend, paddle.rect.center()),
            Item::new(2, ItemKind::Life, Vec2::new(10.0, 10.0)),
        ];
        let collected = collect_items(&mut items, &paddle);
        assert_eq!(collected, vec![ItemKind::Extend]);

        // Second pass collects nothing
        assert!(collect_items(&mut items, &paddle).is_empty());
    }

    #[test]
    fn test_attached_ball_ignores_bricks() {
        let mut state = GameState::new(1);
        state.spawn_ball_attached();
        let mut level = level_with(vec![Brick::new(
            10,
            Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
            BrickKind::Normal,
            None,
        )]);
        let mut ball = state.balls[0].clone();
        assert!(resolve_ball_bricks(&mut ball, &mut level).is_none());
    }
}
