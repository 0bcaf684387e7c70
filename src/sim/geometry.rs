//! Rectangle/circle geometry and paddle bounce math
//!
//! Pure, stateless functions. Out-of-range inputs (zero-size rects,
//! degenerate circles) degrade to "no collision" rather than panicking.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BALL_MAX_SPEED, BOUNCE_MAX_DEG};

/// Axis-aligned rectangle with top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// A circle described by center and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Which face of a rectangle a circle struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl HitSide {
    /// True for left/right faces (reflects the X velocity component)
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        matches!(self, HitSide::Left | HitSide::Right)
    }
}

/// Result of a circle-vs-rect overlap check
#[derive(Debug, Clone, Copy)]
pub struct CircleRectHit {
    /// Struck face, classified from the circle center's normalized offset
    pub side: HitSide,
    /// Closest point on the rect to the circle center
    pub closest: Vec2,
    /// Distance from circle center to that point
    pub distance: f32,
}

/// Standard AABB overlap test
#[inline]
pub fn rect_intersect(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Check collision between a circle and a rectangle
///
/// Clamps the circle center into the rect to find the closest point; a
/// collision holds iff the squared distance to that point is within radius².
///
/// Side classification compares the normalized horizontal vs. vertical offset
/// of the circle center relative to the rect. This is an approximation, not
/// exact edge/corner geometry; ties break toward the horizontal faces.
pub fn circle_rect_collision(circle: &Circle, rect: &Rect) -> Option<CircleRectHit> {
    if rect.w <= 0.0 || rect.h <= 0.0 || circle.radius <= 0.0 {
        return None;
    }

    let closest = Vec2::new(
        circle.center.x.clamp(rect.x, rect.right()),
        circle.center.y.clamp(rect.y, rect.bottom()),
    );
    let offset = circle.center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > circle.radius * circle.radius {
        return None;
    }

    let rel_x = (circle.center.x - rect.x) / rect.w;
    let rel_y = (circle.center.y - rect.y) / rect.h;

    let side = if (rel_x - 0.5).abs() >= (rel_y - 0.5).abs() {
        if rel_x < 0.5 { HitSide::Left } else { HitSide::Right }
    } else if rel_y < 0.5 {
        HitSide::Top
    } else {
        HitSide::Bottom
    };

    Some(CircleRectHit {
        side,
        closest,
        distance: dist_sq.sqrt(),
    })
}

/// Compute the X velocity component for a ball bouncing off the paddle
///
/// The hit position along the paddle width maps linearly to a bounce angle in
/// [-60°, +60°] from vertical. Total speed magnitude is preserved; the caller
/// forces the Y component upward and may apply a speed-up factor.
pub fn paddle_bounce_vx(ball_center_x: f32, paddle_rect: &Rect, speed: f32) -> f32 {
    let hit_fraction = if paddle_rect.w > 0.0 {
        ((ball_center_x - paddle_rect.x) / paddle_rect.w).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let angle_deg = hit_fraction * (2.0 * BOUNCE_MAX_DEG) - BOUNCE_MAX_DEG;
    speed.min(BALL_MAX_SPEED) * angle_deg.to_radians().sin()
}

/// Reflect a velocity component for the struck side: left/right faces flip X,
/// top/bottom faces flip Y
pub fn reflect_for_side(vel: Vec2, side: HitSide) -> Vec2 {
    if side.is_horizontal() {
        Vec2::new(-vel.x, vel.y)
    } else {
        Vec2::new(vel.x, -vel.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_intersect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(rect_intersect(&a, &b));
        assert!(rect_intersect(&b, &a));
    }

    #[test]
    fn test_rect_intersect_touching_edges_miss() {
        // Strict inequalities: rects sharing an edge do not intersect
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!rect_intersect(&a, &b));
    }

    #[test]
    fn test_circle_rect_miss() {
        let rect = Rect::new(100.0, 100.0, 60.0, 20.0);
        let circle = Circle::new(Vec2::new(0.0, 0.0), 8.0);
        assert!(circle_rect_collision(&circle, &rect).is_none());
    }

    #[test]
    fn test_circle_rect_side_classification() {
        let rect = Rect::new(100.0, 100.0, 60.0, 20.0);

        // Approaching from above, center of the brick
        let above = Circle::new(Vec2::new(130.0, 96.0), 8.0);
        let hit = circle_rect_collision(&above, &rect).unwrap();
        assert_eq!(hit.side, HitSide::Top);

        // Approaching from below
        let below = Circle::new(Vec2::new(130.0, 124.0), 8.0);
        let hit = circle_rect_collision(&below, &rect).unwrap();
        assert_eq!(hit.side, HitSide::Bottom);

        // Approaching the left face at mid height
        let left = Circle::new(Vec2::new(96.0, 110.0), 8.0);
        let hit = circle_rect_collision(&left, &rect).unwrap();
        assert_eq!(hit.side, HitSide::Left);

        // Approaching the right face
        let right = Circle::new(Vec2::new(164.0, 110.0), 8.0);
        let hit = circle_rect_collision(&right, &rect).unwrap();
        assert_eq!(hit.side, HitSide::Right);
    }

    #[test]
    fn test_circle_rect_degenerate_rect() {
        let rect = Rect::new(100.0, 100.0, 0.0, 20.0);
        let circle = Circle::new(Vec2::new(100.0, 110.0), 8.0);
        assert!(circle_rect_collision(&circle, &rect).is_none());
    }

    #[test]
    fn test_paddle_bounce_center_is_straight_up() {
        let paddle = Rect::new(350.0, 560.0, 100.0, 16.0);
        let vx = paddle_bounce_vx(400.0, &paddle, 5.0);
        assert!(vx.abs() < 1e-5);
    }

    #[test]
    fn test_paddle_bounce_edges_hit_angle_bound() {
        let paddle = Rect::new(350.0, 560.0, 100.0, 16.0);
        let speed = 5.0;
        let expected = speed * 60.0_f32.to_radians().sin();

        let left = paddle_bounce_vx(350.0, &paddle, speed);
        let right = paddle_bounce_vx(450.0, &paddle, speed);
        assert!((left + expected).abs() < 1e-4);
        assert!((right - expected).abs() < 1e-4);

        // Hits past the edge clamp to the bound
        let past = paddle_bounce_vx(500.0, &paddle, speed);
        assert!((past - expected).abs() < 1e-4);
    }

    #[test]
    fn test_reflect_for_side() {
        let vel = Vec2::new(3.0, -4.0);
        assert_eq!(reflect_for_side(vel, HitSide::Left), Vec2::new(-3.0, -4.0));
        assert_eq!(reflect_for_side(vel, HitSide::Top), Vec2::new(3.0, 4.0));
    }

    /// Brute-force minimum distance from a point to a rect by sampling its
    /// perimeter and interior
    fn brute_force_min_dist(p: Vec2, rect: &Rect) -> f32 {
        if rect.contains_point(p) {
            return 0.0;
        }
        let mut min = f32::MAX;
        let steps = 200;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            for q in [
                Vec2::new(rect.x + t * rect.w, rect.y),
                Vec2::new(rect.x + t * rect.w, rect.bottom()),
                Vec2::new(rect.x, rect.y + t * rect.h),
                Vec2::new(rect.right(), rect.y + t * rect.h),
            ] {
                min = min.min((p - q).length());
            }
        }
        min
    }

    proptest! {
        #[test]
        fn prop_circle_rect_matches_brute_force(
            cx in -50.0_f32..250.0,
            cy in -50.0_f32..250.0,
            rx in 0.0_f32..100.0,
            ry in 0.0_f32..100.0,
            rw in 1.0_f32..120.0,
            rh in 1.0_f32..120.0,
            radius in 1.0_f32..40.0,
        ) {
            let rect = Rect::new(rx, ry, rw, rh);
            let circle = Circle::new(Vec2::new(cx, cy), radius);
            let hit = circle_rect_collision(&circle, &rect);
            let true_dist = brute_force_min_dist(circle.center, &rect);

            // Skip near-boundary cases where sampling resolution dominates
            if (true_dist - radius).abs() > 0.5 {
                prop_assert_eq!(hit.is_some(), true_dist <= radius);
            }
        }

        #[test]
        fn prop_bounce_preserves_speed_bound(
            hit_x in 300.0_f32..500.0,
            speed in 0.1_f32..10.0,
        ) {
            let paddle = Rect::new(350.0, 560.0, 100.0, 16.0);
            let vx = paddle_bounce_vx(hit_x, &paddle, speed);
            prop_assert!(vx.abs() <= speed + 1e-4);
        }
    }
}
