use tracing::{debug, warn};

use crate::env::RandomSource;
use crate::state::{Grid, Position, Room, TileKind};

/// Finds a free floor cell inside the rooms.
///
/// Tries `attempts` random (room, cell) draws, then scans the first room
/// left-to-right, top-to-bottom, and finally returns the first room's corner
/// even if it is taken. With no rooms at all the origin is returned.
pub fn find_empty_cell(
    grid: &Grid,
    rooms: &[Room],
    is_free: impl Fn(Position) -> bool,
    attempts: u32,
    rng: &mut dyn RandomSource,
) -> Position {
    let usable = |cell: Position| grid.get(cell) == Some(TileKind::Floor) && is_free(cell);

    let Some(first) = rooms.first() else {
        warn!("empty-cell search without rooms");
        return Position::default();
    };

    for _ in 0..attempts {
        let room = &rooms[rng.below(rooms.len() as u32) as usize];
        let cell = Position::new(
            room.x + rng.below(room.width) as i32,
            room.y + rng.below(room.height) as i32,
        );
        if usable(cell) {
            return cell;
        }
    }

    if let Some(cell) = first.cells().find(|cell| usable(*cell)) {
        debug!(%cell, "random placement exhausted, scanned first room");
        return cell;
    }

    debug!("first room full, accepting overlap at its corner");
    first.corner()
}
