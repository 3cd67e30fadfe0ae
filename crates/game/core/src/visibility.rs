//! Field of view, light falloff and line of sight.
//!
//! Light is computed by recursive shadowcasting over eight octants. Cells
//! within [`FULL_LIGHT_RADIUS`] are fully lit; beyond that light falls off
//! linearly to zero at the outer radius. Cells brighter than
//! [`EXPLORE_THRESHOLD`] are marked explored on the level overlay for good.

use std::collections::HashMap;

use tracing::trace;

use crate::cache::{CacheToken, TokenCache};
use crate::state::{Grid, Level, LightKey, LightMap, Position};

pub const FULL_LIGHT_RADIUS: f32 = 2.0;
pub const EXPLORE_THRESHOLD: f32 = 0.05;

/// Octant transforms: (xx, xy, yx, yy).
const OCTANTS: [(i32, i32, i32, i32); 8] = [
    (1, 0, 0, 1),
    (0, 1, 1, 0),
    (0, -1, 1, 0),
    (-1, 0, 0, 1),
    (-1, 0, 0, -1),
    (0, -1, -1, 0),
    (0, 1, -1, 0),
    (1, 0, 0, -1),
];

/// Light contributed at euclidean distance `distance` for a given outer radius.
pub fn falloff(distance: f32, radius: u32) -> f32 {
    let radius = radius as f32;
    if distance <= FULL_LIGHT_RADIUS {
        return 1.0;
    }
    if radius <= FULL_LIGHT_RADIUS {
        return 0.0;
    }
    ((radius - distance) / (radius - FULL_LIGHT_RADIUS)).clamp(0.0, 1.0)
}

/// Computes light around `origin`. Only in-grid cells with positive light are kept.
pub fn compute_light(grid: &Grid, origin: Position, radius: u32) -> LightMap {
    let mut lit: HashMap<Position, f32> = HashMap::new();
    if grid.contains(origin) {
        lit.insert(origin, 1.0);
    }
    let mut caster = Caster {
        grid,
        origin,
        radius: radius as i32,
        lit: &mut lit,
    };
    for octant in OCTANTS {
        caster.cast(1, 1.0, 0.0, octant);
    }
    LightMap::new(
        lit.into_iter()
            .filter(|(_, light)| *light > 0.0)
            .collect(),
    )
}

struct Caster<'a> {
    grid: &'a Grid,
    origin: Position,
    radius: i32,
    lit: &'a mut HashMap<Position, f32>,
}

impl Caster<'_> {
    fn cast(&mut self, row: i32, mut start: f32, end: f32, (xx, xy, yx, yy): (i32, i32, i32, i32)) {
        if start < end {
            return;
        }
        let radius_sq = self.radius * self.radius;
        let mut next_start = start;
        for distance in row..=self.radius {
            let dy = -distance;
            let mut blocked = false;
            for dx in -distance..=0 {
                let cell = Position::new(
                    self.origin.x + dx * xx + dy * xy,
                    self.origin.y + dx * yx + dy * yy,
                );
                let left = (dx as f32 - 0.5) / (dy as f32 + 0.5);
                let right = (dx as f32 + 0.5) / (dy as f32 - 0.5);
                if start < right {
                    continue;
                }
                if end > left {
                    break;
                }

                let distance_sq = dx * dx + dy * dy;
                if distance_sq <= radius_sq && self.grid.contains(cell) {
                    let light = falloff((distance_sq as f32).sqrt(), self.radius as u32);
                    self.lit.insert(cell, light);
                }

                let opaque = self.grid.is_opaque(cell);
                if blocked {
                    if opaque {
                        next_start = right;
                    } else {
                        blocked = false;
                        start = next_start;
                    }
                } else if opaque && distance < self.radius {
                    blocked = true;
                    self.cast(distance + 1, start, left, (xx, xy, yx, yy));
                    next_start = right;
                }
            }
            if blocked {
                break;
            }
        }
    }
}

/// Recomputes light around `origin` on the level and marks explored cells.
///
/// Light maps are memoized per (origin, depth) under `token`; a new level or
/// session version drops every stored map.
pub fn refresh(
    level: &mut Level,
    origin: Position,
    radius: u32,
    cache: &mut TokenCache<LightKey, LightMap>,
    token: CacheToken,
) {
    let grid = &level.grid;
    let light = cache.get_or_insert_with(token, (origin, level.kind.depth()), || {
        trace!(%origin, "computing light");
        compute_light(grid, origin, radius)
    });
    for (cell, value) in light.iter() {
        if value > EXPLORE_THRESHOLD {
            level.explored.mark(cell);
        }
    }
    level.light = light.clone();
}

/// Bresenham line test. Endpoints are never checked, only the cells between.
pub fn line_of_sight(grid: &Grid, from: Position, to: Position) -> bool {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut error = dx + dy;
    let mut x = from.x;
    let mut y = from.y;
    loop {
        if x == to.x && y == to.y {
            return true;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += sx;
        }
        if doubled <= dx {
            error += dx;
            y += sy;
        }
        let cell = Position::new(x, y);
        if cell != to && grid.is_opaque(cell) {
            return false;
        }
    }
}
