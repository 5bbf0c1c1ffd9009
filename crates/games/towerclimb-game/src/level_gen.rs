use rand::Rng;
use serde::{Deserialize, Serialize};

use towerclimb_core::geometry::Rect;

use crate::config::{LevelConfig, WindowConfig};

/// A static platform. Floors never change after generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub rect: Rect,
}

/// Which window edge a wall sits on, or which way a level steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// A screen-fixed side wall spanning the full window height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
    pub side: Side,
}

impl Wall {
    pub fn is_left(&self) -> bool {
        self.side == Side::Left
    }
}

/// The full-width floor at the bottom of the window.
pub fn base_floor(window: &WindowConfig, level: &LevelConfig) -> Floor {
    Floor {
        rect: Rect::new(
            0,
            window.height - level.floor_thickness,
            window.width,
            level.floor_thickness,
        ),
    }
}

/// The two side walls, left first.
pub fn build_walls(window: &WindowConfig, level: &LevelConfig) -> [Wall; 2] {
    let t = level.wall_thickness;
    [
        Wall {
            rect: Rect::new(0, 0, t, window.height),
            side: Side::Left,
        },
        Wall {
            rect: Rect::new(window.width - t, 0, t, window.height),
            side: Side::Right,
        },
    ]
}

/// Base floor followed by `level.level_count` generated floors, bottom to top.
pub fn build_level<R: Rng + ?Sized>(
    rng: &mut R,
    window: &WindowConfig,
    level: &LevelConfig,
) -> Vec<Floor> {
    let mut floors = Vec::with_capacity(level.level_count + 1);
    floors.push(base_floor(window, level));
    floors.extend(generate_floors(rng, window, level));
    tracing::debug!(floors = floors.len(), "Generated level");
    floors
}

/// Generate ascending floors, each `platform_gap` above the previous one.
///
/// Every level steps left or right of the previous floor by a normally
/// distributed offset whose mean grows each level up to
/// `max_jump - jump_margin`, while floors shrink toward `min_floor_width`.
/// Floors always lie within `[0, window.width]`.
pub fn generate_floors<R: Rng + ?Sized>(
    rng: &mut R,
    window: &WindowConfig,
    level: &LevelConfig,
) -> Vec<Floor> {
    let w = window.width;
    let offset_cap = level.max_jump - level.jump_margin;

    let mut mean_offset = level.initial_offset;
    let mut floor_width = level.initial_floor_width;
    let mut last_left = level.reference_inset;
    let mut last_right = w - level.reference_inset;
    let mut last_top = window.height;

    let mut floors = Vec::with_capacity(level.level_count);
    for _ in 0..level.level_count {
        let side = if rng.random_bool(0.5) {
            Side::Right
        } else {
            Side::Left
        };

        mean_offset = (mean_offset + level.offset_step).min(offset_cap);
        floor_width = (floor_width - level.floor_width_step).max(level.min_floor_width);
        let x_offset = sample_offset(rng, f64::from(mean_offset), level.offset_sigma);

        // Half-width tests are done doubled to stay in integers.
        let (left, width) = match side {
            Side::Right => {
                if 2 * (last_right + x_offset) + floor_width > 2 * w {
                    (last_left - x_offset - floor_width, floor_width)
                } else {
                    let left = last_right + x_offset;
                    let width = if left + floor_width < w {
                        floor_width
                    } else {
                        w - left - 1
                    };
                    (left, width)
                }
            },
            Side::Left => {
                if 2 * (last_left - x_offset) - floor_width < 0 {
                    (last_right + x_offset, floor_width)
                } else {
                    ((last_left - x_offset - floor_width).max(0), floor_width)
                }
            },
        };
        let (left, width) = fit_span(left, width, w, level.min_floor_width);

        last_top -= level.platform_gap;
        let rect = Rect::new(left, last_top, width, level.floor_thickness);
        last_left = rect.left();
        last_right = rect.right();
        floors.push(Floor { rect });
    }
    floors
}

/// Clip `[left, left + width)` to `[0, window_width]`. A span that lies
/// entirely outside is moved inside at `min_width` instead.
fn fit_span(left: i32, width: i32, window_width: i32, min_width: i32) -> (i32, i32) {
    let right = (left + width).min(window_width);
    let clipped_left = left.max(0);
    if right > clipped_left {
        return (clipped_left, right - clipped_left);
    }
    let width = min_width.clamp(1, window_width);
    (left.clamp(0, window_width - width), width)
}

/// Round a normal sample to whole pixels, ties to even.
fn sample_offset<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64) -> i32 {
    (mean + sigma * standard_normal(rng)).round_ties_even() as i32
}

/// Box-Muller transform over two uniform draws.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // 1 - [0, 1) keeps the logarithm finite.
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
