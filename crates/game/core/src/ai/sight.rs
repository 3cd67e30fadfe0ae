//! What an enemy can perceive this tick.

use crate::collision::Occupancy;
use crate::config::SimConfig;
use crate::state::{Direction, Enemy, Level, Player, Position};
use crate::visibility::line_of_sight;

/// Read-only blackboard for one enemy decision.
#[derive(Clone, Copy)]
pub struct AiContext<'a> {
    pub level: &'a Level,
    pub player: &'a Player,
    pub day: u32,
    pub config: &'a SimConfig,
}

impl<'a> AiContext<'a> {
    pub fn new(level: &'a Level, player: &'a Player, day: u32, config: &'a SimConfig) -> Self {
        Self {
            level,
            player,
            day,
            config,
        }
    }

    pub fn occupancy(&self) -> Occupancy<'a> {
        Occupancy::new(self.level, self.player.position, self.day)
    }

    pub fn distance(&self, enemy: &Enemy) -> u32 {
        enemy.position.manhattan(self.player.position)
    }

    /// Sight check: range, cloak, then Bresenham line of sight.
    ///
    /// A cloaked player is only noticed from an adjacent cell.
    pub fn sees_player(&self, enemy: &Enemy) -> bool {
        let distance = self.distance(enemy);
        if distance > self.config.sight_range(enemy.behavior) {
            return false;
        }
        if self.player.buffs.is_cloaked() && distance != 1 {
            return false;
        }
        line_of_sight(&self.level.grid, enemy.position, self.player.position)
    }

    /// First direction whose ray reaches an uncloaked player.
    ///
    /// Rays are cast north, south, east, then west, up to the sentinel range,
    /// and stop at the first non-walkable cell.
    pub fn firing_line(&self, from: Position) -> Option<Direction> {
        if self.player.buffs.is_cloaked() {
            return None;
        }
        Direction::ALL.into_iter().find(|direction| {
            let mut cell = from;
            for _ in 0..self.config.sentinel_range {
                cell = cell.step(*direction);
                if cell == self.player.position {
                    return true;
                }
                if !self.level.grid.is_walkable(cell) {
                    return false;
                }
            }
            false
        })
    }
}
