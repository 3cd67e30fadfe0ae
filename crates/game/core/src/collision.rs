//! The single authority for "can an actor occupy this cell".
//!
//! Player movement, enemy AI and NPC scheduling all go through
//! [`Occupancy::can_step`]; none of them keeps a private notion of blocking.

use crate::state::{EntityId, Grid, Level, Position};

/// Out-of-bounds cells, walls and blocking decorations are not walkable.
pub fn is_walkable(grid: &Grid, position: Position) -> bool {
    grid.is_walkable(position)
}

/// Occupancy view of a level at a given day.
#[derive(Clone, Copy)]
pub struct Occupancy<'a> {
    level: &'a Level,
    player: Position,
    day: u32,
}

impl<'a> Occupancy<'a> {
    pub fn new(level: &'a Level, player: Position, day: u32) -> Self {
        Self { level, player, day }
    }

    /// Whether `excluding` (or the player, with [`EntityId::PLAYER`]) may step onto `position`.
    ///
    /// Fails on non-walkable cells, on the player's cell, and on cells held by
    /// any other appeared actor. Actors gated to a later day never block.
    pub fn can_step(&self, position: Position, excluding: EntityId) -> bool {
        if !is_walkable(&self.level.grid, position) {
            return false;
        }
        if position == self.player {
            return false;
        }
        !self.level.actors.iter().any(|actor| {
            actor.id() != excluding && actor.position() == position && actor.has_appeared(self.day)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        Actor, Appearance, Grid, LevelId, LevelKind, Room, SystemNpc, TileKind,
    };

    fn level_with_clerk(appears_on_day: u32) -> (Level, EntityId) {
        let mut level = Level::new(
            LevelId(1),
            LevelKind::Town,
            Grid::from_rows(&["....", ".#..", "...."]).unwrap(),
            vec![Room::new(0, 0, 4, 3)],
            Position::ORIGIN,
        );
        let id = level.allocate_id();
        level.actors.push(Actor::SystemNpc(SystemNpc {
            id,
            position: Position::new(3, 0),
            appearance: Appearance::new('$', "clerk"),
            service: "shop".into(),
            appears_on_day,
        }));
        (level, id)
    }

    #[test]
    fn walls_and_bounds_block() {
        let (level, _) = level_with_clerk(1);
        let occupancy = Occupancy::new(&level, Position::ORIGIN, 1);
        assert!(!occupancy.can_step(Position::new(1, 1), EntityId(99)));
        assert!(!occupancy.can_step(Position::new(4, 0), EntityId(99)));
        assert!(occupancy.can_step(Position::new(2, 2), EntityId(99)));
    }

    #[test]
    fn player_cell_blocks_everyone_else() {
        let (level, _) = level_with_clerk(1);
        let occupancy = Occupancy::new(&level, Position::new(2, 0), 1);
        assert!(!occupancy.can_step(Position::new(2, 0), EntityId(5)));
    }

    #[test]
    fn appeared_actors_block_but_not_themselves() {
        let (level, clerk) = level_with_clerk(1);
        let occupancy = Occupancy::new(&level, Position::ORIGIN, 1);
        assert!(!occupancy.can_step(Position::new(3, 0), EntityId::PLAYER));
        assert!(occupancy.can_step(Position::new(3, 0), clerk));
    }

    #[test]
    fn unappeared_actors_never_block() {
        let (level, _) = level_with_clerk(3);
        let occupancy = Occupancy::new(&level, Position::ORIGIN, 2);
        assert!(occupancy.can_step(Position::new(3, 0), EntityId::PLAYER));
        let later = Occupancy::new(&level, Position::ORIGIN, 3);
        assert!(!later.can_step(Position::new(3, 0), EntityId::PLAYER));
    }

    #[test]
    fn decorations_block() {
        let (mut level, _) = level_with_clerk(1);
        level.grid.set(Position::new(2, 2), TileKind::Decoration);
        let occupancy = Occupancy::new(&level, Position::ORIGIN, 1);
        assert!(!occupancy.can_step(Position::new(2, 2), EntityId::PLAYER));
    }
}
