//! Level generation and population.
//!
//! Both run once per level entry. Neither can fail: degenerate layouts fall
//! back to a fixed two-room map and exhausted placement searches fall back to
//! a deterministic scan and then a fixed cell.
mod placement;
mod population;

pub use placement::find_empty_cell;
pub use population::{PopulationSummary, populate};

use tracing::debug;

use crate::env::RandomSource;
use crate::state::{Grid, Position, Room, TileKind};

const MIN_ROOM_WIDTH: u32 = 4;
const MAX_ROOM_WIDTH: u32 = 10;
const MIN_ROOM_HEIGHT: u32 = 3;
const MAX_ROOM_HEIGHT: u32 = 7;
const ROOM_ATTEMPTS: u32 = 400;
const FALLBACK_ROOM: u32 = 5;

/// Freshly dug grid with its rooms and fixed points.
#[derive(Clone, Debug)]
pub struct GeneratedMap {
    pub grid: Grid,
    pub rooms: Vec<Room>,
    /// Center of the first room; the player arrives here.
    pub entry: Position,
    /// Center of the last room, holding the stairs up.
    pub exit: Position,
    /// Whether the deterministic fallback layout was used.
    pub fallback: bool,
}

/// Target dug fraction in percent: 35% plus 3% per depth.
pub fn dig_target_percent(depth: u32) -> u32 {
    35 + 3 * depth
}

/// Digs a room-and-corridor level.
///
/// Rooms are placed at random with a one-cell margin until the dug fraction of
/// the interior reaches [`dig_target_percent`] or the attempt budget runs out.
/// Each room after the first is joined to its predecessor by an L-shaped
/// corridor, so every floor cell is reachable from the entry room.
pub fn generate_level(width: u32, height: u32, depth: u32, rng: &mut dyn RandomSource) -> GeneratedMap {
    let mut grid = Grid::filled(width, height, TileKind::Wall);
    let interior = width.saturating_sub(2) * height.saturating_sub(2);
    let target = interior * dig_target_percent(depth) / 100;

    let mut rooms: Vec<Room> = Vec::new();
    let mut dug = 0;
    let mut attempts = 0;
    while dug < target && attempts < ROOM_ATTEMPTS {
        attempts += 1;
        let Some(room) = random_room(width, height, rng) else {
            break;
        };
        if rooms.iter().any(|other| room.intersects(other, 1)) {
            continue;
        }
        dug += carve_room(&mut grid, &room);
        if let Some(previous) = rooms.last() {
            dug += carve_corridor(&mut grid, previous.center(), room.center(), rng.coin());
        }
        rooms.push(room);
    }

    let fallback = rooms.len() < 2;
    if fallback {
        debug!(width, height, depth, rooms = rooms.len(), "degenerate layout, using fallback rooms");
        (grid, rooms) = fallback_layout(width, height);
    }

    let entry = rooms[0].center();
    let exit = rooms[rooms.len() - 1].center();
    grid.set(exit, TileKind::StairsUp);
    place_terminals(&mut grid, &rooms, depth);

    debug!(depth, rooms = rooms.len(), dug, target, "generated level");
    GeneratedMap {
        grid,
        rooms,
        entry,
        exit,
        fallback,
    }
}

fn random_room(width: u32, height: u32, rng: &mut dyn RandomSource) -> Option<Room> {
    let max_w = MAX_ROOM_WIDTH.min(width.checked_sub(2)?);
    let max_h = MAX_ROOM_HEIGHT.min(height.checked_sub(2)?);
    if max_w < MIN_ROOM_WIDTH || max_h < MIN_ROOM_HEIGHT {
        return None;
    }
    let room_w = MIN_ROOM_WIDTH + rng.below(max_w - MIN_ROOM_WIDTH + 1);
    let room_h = MIN_ROOM_HEIGHT + rng.below(max_h - MIN_ROOM_HEIGHT + 1);
    // Keep a wall ring around the map edge.
    let x = 1 + rng.below(width - 1 - room_w);
    let y = 1 + rng.below(height - 1 - room_h);
    Some(Room::new(x as i32, y as i32, room_w, room_h))
}

/// Sets every room cell to floor, returning how many cells changed.
fn carve_room(grid: &mut Grid, room: &Room) -> u32 {
    let mut dug = 0;
    for cell in room.cells() {
        if grid.get(cell) == Some(TileKind::Wall) && grid.set(cell, TileKind::Floor) {
            dug += 1;
        }
    }
    dug
}

fn carve_cell(grid: &mut Grid, cell: Position) -> u32 {
    u32::from(grid.get(cell) == Some(TileKind::Wall) && grid.set(cell, TileKind::Floor))
}

/// L-shaped corridor between two points.
fn carve_corridor(grid: &mut Grid, from: Position, to: Position, horizontal_first: bool) -> u32 {
    let corner = if horizontal_first {
        Position::new(to.x, from.y)
    } else {
        Position::new(from.x, to.y)
    };
    carve_straight(grid, from, corner) + carve_straight(grid, corner, to)
}

fn carve_straight(grid: &mut Grid, from: Position, to: Position) -> u32 {
    let mut dug = 0;
    for x in from.x.min(to.x)..=from.x.max(to.x) {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            dug += carve_cell(grid, Position::new(x, y));
        }
    }
    dug
}

/// Two 5x5 rooms in opposite corners joined by a corridor.
fn fallback_layout(width: u32, height: u32) -> (Grid, Vec<Room>) {
    let mut grid = Grid::filled(width, height, TileKind::Wall);
    let far_x = (width as i32 - 1 - FALLBACK_ROOM as i32).max(1);
    let far_y = (height as i32 - 1 - FALLBACK_ROOM as i32).max(1);
    let rooms = vec![
        Room::new(1, 1, FALLBACK_ROOM, FALLBACK_ROOM),
        Room::new(far_x, far_y, FALLBACK_ROOM, FALLBACK_ROOM),
    ];
    for room in &rooms {
        carve_room(&mut grid, room);
    }
    carve_corridor(&mut grid, rooms[0].center(), rooms[1].center(), true);
    (grid, rooms)
}

/// Terminals at offset (+1, +1) in the rooms after the first.
///
/// A candidate that is not plain floor is skipped, not retried elsewhere.
fn place_terminals(grid: &mut Grid, rooms: &[Room], depth: u32) {
    let count = 1 + depth / 3;
    for room in rooms.iter().skip(1).take(count as usize) {
        let cell = Position::new(room.x + 1, room.y + 1);
        if grid.get(cell) == Some(TileKind::Floor) {
            grid.set(cell, TileKind::Terminal);
        } else {
            debug!(%cell, "terminal candidate is not floor, skipping");
        }
    }
}
