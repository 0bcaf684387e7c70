//! Level and brick grid generation
//!
//! Layouts are deterministic for a given (seed, level) pair: the cell skip
//! patterns and brick types are pure functions of level/row/col, while item
//! drops roll on the seeded RNG.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::{Brick, BrickKind, GameState, ItemKind};
use crate::consts::*;

/// Fixed item-drop probability table. Weights need not sum to 1; a draw is
/// `rng * total_weight` walked cumulatively.
const ITEM_WEIGHTS: &[(ItemKind, f32)] = &[
    (ItemKind::Extend, 25.0),
    (ItemKind::Slow, 20.0),
    (ItemKind::Multi, 15.0),
    (ItemKind::Fast, 15.0),
    (ItemKind::Laser, 12.0),
    (ItemKind::Life, 8.0),
    (ItemKind::Warp, 5.0),
];

/// Base chance for a breakable brick to carry an item
const ITEM_DROP_CHANCE: f32 = 0.12;
/// Extra drop chance per level
const ITEM_LEVEL_BONUS: f32 = 0.01;
/// Center-column drop boost on early levels
const ITEM_CENTER_BOOST: f32 = 0.08;

/// An ordered collection of bricks plus clear bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Bricks in row-major order (collision scan order)
    pub bricks: Vec<Brick>,
    pub rows: u32,
    pub cols: u32,
    /// Breakable brick count fixed at generation time
    pub total_breakable: u32,
    /// Bricks broken so far
    pub broken_count: u32,
}

impl Level {
    /// Placeholder level before the first generation
    pub fn empty() -> Self {
        Self {
            bricks: Vec::new(),
            rows: 0,
            cols: 0,
            total_breakable: 0,
            broken_count: 0,
        }
    }

    /// Level is cleared once every breakable brick is broken
    pub fn is_cleared(&self) -> bool {
        self.broken_count >= self.total_breakable
    }

    /// Record a broken brick
    pub fn register_break(&mut self) {
        self.broken_count += 1;
    }

    /// Satisfy the clear condition immediately (warp item)
    pub fn force_clear(&mut self) {
        self.broken_count = self.total_breakable;
    }

    /// Fraction of breakable bricks broken, for HUD display
    pub fn clear_fraction(&self) -> f32 {
        if self.total_breakable == 0 {
            1.0
        } else {
            self.broken_count as f32 / self.total_breakable as f32
        }
    }
}

/// Number of brick rows for a 1-based level number
pub fn rows_for_level(level_n: u32) -> u32 {
    BASE_ROWS + (level_n / 2).min(3)
}

/// Whether a grid cell stays empty for the given 1-based level number
///
/// Each level draws a different pattern; levels past the named set fall back
/// to a modulo scatter.
pub fn should_skip_cell(level_n: u32, row: u32, col: u32, rows: u32, cols: u32) -> bool {
    match level_n {
        // Full grid
        1 => false,
        // Checkerboard
        2 => (row + col) % 2 == 1,
        // Nested rectangles: alternating concentric rings
        3 => {
            let ring = row.min(rows - 1 - row).min(col).min(cols - 1 - col);
            ring % 2 == 1
        }
        // Pyramid widening downward from the center column
        4 => {
            let center = (cols - 1) as f32 / 2.0;
            (col as f32 - center).abs() > row as f32 + 0.5
        }
        // Tunnel: a vertical corridor through the middle
        5 => {
            let mid = cols / 2;
            col == mid || col + 1 == mid
        }
        // Spiral: concentric rings with a per-ring opening
        6 => {
            let ring = row.min(rows - 1 - row).min(col).min(cols - 1 - col);
            if ring % 2 == 1 {
                true
            } else {
                // Opening lets the ball wind inward
                row == ring && col == ring + 1
            }
        }
        // Modulo scatter for high levels
        n => (row * 7 + col * 3 + n) % 5 == 0,
    }
}

/// Brick type for a surviving cell
///
/// The top row and corners bias toward stronger/indestructible bricks as the
/// level rises; early levels are all normal bricks.
pub fn brick_kind_for(level_n: u32, row: u32, col: u32, cols: u32) -> BrickKind {
    if level_n <= 2 {
        return BrickKind::Normal;
    }

    let corner = col == 0 || col == cols - 1;
    if row == 0 {
        if corner && level_n >= 5 {
            return BrickKind::Unbreakable;
        }
        if level_n >= 6 && col % 4 == 0 {
            return BrickKind::Unbreakable;
        }
        return BrickKind::Strong;
    }
    if corner && level_n >= 4 {
        return BrickKind::Strong;
    }
    if level_n >= 5 && row == 1 && col % 3 == 1 {
        return BrickKind::Strong;
    }
    BrickKind::Normal
}

/// Weighted draw over the item table
fn roll_item_kind(rng: &mut Pcg32) -> ItemKind {
    let total: f32 = ITEM_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut draw = rng.random::<f32>() * total;
    for &(kind, weight) in ITEM_WEIGHTS {
        if draw < weight {
            return kind;
        }
        draw -= weight;
    }
    // Floating point remainder lands on the last entry
    ITEM_WEIGHTS[ITEM_WEIGHTS.len() - 1].0
}

/// Chance for a breakable brick at (level, col) to carry an item
fn item_drop_chance(level_n: u32, col: u32, cols: u32) -> f32 {
    let mut chance = ITEM_DROP_CHANCE + ITEM_LEVEL_BONUS * level_n as f32;
    let center = (cols - 1) as f32 / 2.0;
    if level_n <= 3 && (col as f32 - center).abs() <= 1.0 {
        chance += ITEM_CENTER_BOOST;
    }
    chance
}

/// Generate the brick grid for the state's current level index
///
/// Replaces `state.level` wholesale; bricks are never resurrected.
pub fn generate_level(state: &mut GameState) {
    let level_n = state.level_index + 1;
    let rows = rows_for_level(level_n);
    let cols = GRID_COLS;

    // Derive a fresh stream from the run seed and level number so replays of
    // the same run reproduce identical drops
    let level_seed = (level_n as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(state.seed);
    let mut rng = Pcg32::seed_from_u64(level_seed);

    let brick_w =
        (SCREEN_WIDTH - 2.0 * GRID_SIDE_MARGIN - (cols - 1) as f32 * BRICK_GAP) / cols as f32;

    let mut bricks = Vec::with_capacity((rows * cols) as usize);
    let mut total_breakable = 0u32;

    for row in 0..rows {
        for col in 0..cols {
            if should_skip_cell(level_n, row, col, rows, cols) {
                continue;
            }

            let kind = brick_kind_for(level_n, row, col, cols);
            let rect = Rect::new(
                GRID_SIDE_MARGIN + col as f32 * (brick_w + BRICK_GAP),
                GRID_TOP + row as f32 * (BRICK_HEIGHT + BRICK_GAP),
                brick_w,
                BRICK_HEIGHT,
            );

            let item = if kind != BrickKind::Unbreakable {
                total_breakable += 1;
                let roll: f32 = rng.random();
                if roll < item_drop_chance(level_n, col, cols) {
                    Some(roll_item_kind(&mut rng))
                } else {
                    None
                }
            } else {
                None
            };

            let id = state.next_entity_id();
            bricks.push(Brick::new(id, rect, kind, item));
        }
    }

    log::info!(
        "Level {}: {} bricks ({} breakable), {} rows",
        level_n,
        bricks.len(),
        total_breakable,
        rows
    );

    state.level = Level {
        bricks,
        rows,
        cols,
        total_breakable,
        broken_count: 0,
    };
}
