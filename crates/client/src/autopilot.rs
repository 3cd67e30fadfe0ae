//! Scripted player for headless runs.

use undercity_core::pathfinding::find_path;
use undercity_core::{Direction, Intent, Level, Position, SimState};

/// Picks the player's next intent.
///
/// In town the autopilot waits. Inside a generated level it strikes an
/// adjacent enemy, otherwise walks to the nearest item, and heads for the
/// stairs once the floor is picked clean.
pub fn next_intent(state: &SimState) -> Intent {
    let Some(expedition) = &state.expedition else {
        return Intent::Wait;
    };
    let level = &expedition.level;
    let position = state.player.position;

    if let Some(enemy) = level
        .enemies()
        .find(|enemy| enemy.position.manhattan(position) == 1)
        && let Some(direction) = direction_between(position, enemy.position)
    {
        return Intent::Move(direction);
    }

    let Some(target) = nearest_item(level, position).or(level.exit) else {
        return Intent::Wait;
    };
    match find_path(&level.grid, position, target).as_slice() {
        [from, next, ..] => direction_between(*from, *next).map_or(Intent::Wait, Intent::Move),
        _ => Intent::Wait,
    }
}

fn nearest_item(level: &Level, from: Position) -> Option<Position> {
    level
        .items
        .iter()
        .map(|item| item.position)
        .min_by_key(|position| position.manhattan(from))
}

fn direction_between(from: Position, to: Position) -> Option<Direction> {
    match (to.x - from.x, to.y - from.y) {
        (dx, 0) => Direction::from_dx(dx),
        (0, dy) => Direction::from_dy(dy),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use undercity_core::state::{Expedition, Grid, Item, ItemKind, LevelId, LevelKind, Room, TileKind};
    use undercity_core::{EntityId, Player};

    fn expedition(player: Position) -> SimState {
        let grid = Grid::filled(8, 8, TileKind::Floor);
        let mut level = Level::new(
            LevelId(2),
            LevelKind::Depth(1),
            grid,
            vec![Room::new(0, 0, 8, 8)],
            player,
        );
        level.exit = Some(Position::new(7, 7));
        let mut state = SimState::new(Player::new(player, 30, 5, 1));
        state.expedition = Some(Expedition {
            level,
            return_position: Position::ORIGIN,
        });
        state
    }

    #[test]
    fn waits_in_town() {
        let state = SimState::new(Player::new(Position::ORIGIN, 30, 5, 1));
        assert_eq!(next_intent(&state), Intent::Wait);
    }

    #[test]
    fn heads_for_the_exit_on_an_empty_floor() {
        let state = expedition(Position::new(7, 5));
        assert_eq!(next_intent(&state), Intent::Move(Direction::South));
    }

    #[test]
    fn prefers_items_over_the_exit() {
        let mut state = expedition(Position::new(3, 3));
        let level = &mut state.expedition.as_mut().unwrap().level;
        level.items.push(Item::new(
            EntityId(40),
            Position::new(1, 3),
            ItemKind::Currency { value: 5 },
        ));
        assert_eq!(next_intent(&state), Intent::Move(Direction::West));
    }

    #[test]
    fn direction_needs_a_cardinal_neighbour() {
        assert_eq!(
            direction_between(Position::new(1, 1), Position::new(1, 0)),
            Some(Direction::North)
        );
        assert_eq!(direction_between(Position::new(1, 1), Position::new(2, 2)), None);
    }
}
