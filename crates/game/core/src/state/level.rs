//! Level container: grid, rooms, entity and item collections, overlays.

use std::fmt;

use super::{Actor, Enemy, EntityId, Grid, Item, Npc, Position, Room, ZoneMap};

/// Identity of a level instance. Never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelId(pub u32);

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Whether a level has time-of-day semantics (town) or is a generated depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelKind {
    Town,
    Depth(u32),
}

impl LevelKind {
    pub const fn depth(self) -> u32 {
        match self {
            LevelKind::Town => 0,
            LevelKind::Depth(depth) => depth,
        }
    }

    pub const fn is_town(self) -> bool {
        matches!(self, LevelKind::Town)
    }
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelKind::Town => f.write_str("town"),
            LevelKind::Depth(depth) => write!(f, "depth {depth}"),
        }
    }
}

/// Per-cell boolean overlay of cells ever lit. Cells are only ever set.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ExploredOverlay {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl ExploredOverlay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        (position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn mark(&mut self, position: Position) {
        if let Some(index) = self.index(position) {
            self.cells[index] = true;
        }
    }

    pub fn is_explored(&self, position: Position) -> bool {
        self.index(position).is_some_and(|index| self.cells[index])
    }

    pub fn explored_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }
}

/// Sparse light values produced by the visibility pass.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LightMap {
    cells: Vec<(Position, f32)>,
}

impl LightMap {
    pub fn new(mut cells: Vec<(Position, f32)>) -> Self {
        cells.sort_by_key(|(cell, _)| *cell);
        cells.dedup_by_key(|(cell, _)| *cell);
        Self { cells }
    }

    pub fn light_at(&self, position: Position) -> f32 {
        self.cells
            .binary_search_by_key(&position, |(cell, _)| *cell)
            .map_or(0.0, |index| self.cells[index].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, f32)> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Carry-over values accumulated on a generated level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunTally {
    pub currency: u32,
    pub kills: u32,
}

#[derive(Clone, Debug)]
pub struct Level {
    pub id: LevelId,
    pub kind: LevelKind,
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub actors: Vec<Actor>,
    pub items: Vec<Item>,
    pub explored: ExploredOverlay,
    /// Light from the most recent visibility pass.
    pub light: LightMap,
    /// Zone overlay; empty on generated levels.
    pub zones: ZoneMap,
    pub entry: Position,
    pub exit: Option<Position>,
    /// Level-local turn counter driving ambient cadence.
    pub turn: u64,
    pub tally: RunTally,
    next_entity_id: u32,
}

impl Level {
    pub fn new(id: LevelId, kind: LevelKind, grid: Grid, rooms: Vec<Room>, entry: Position) -> Self {
        let explored = ExploredOverlay::new(grid.width(), grid.height());
        Self {
            id,
            kind,
            grid,
            rooms,
            actors: Vec::new(),
            items: Vec::new(),
            explored,
            light: LightMap::default(),
            zones: ZoneMap::default(),
            entry,
            exit: None,
            turn: 0,
            tally: RunTally::default(),
            next_entity_id: EntityId::PLAYER.0 + 1,
        }
    }

    /// Allocates a fresh entity id. Ids are never reused within a level.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn depth(&self) -> u32 {
        self.kind.depth()
    }

    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id() == id)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.actor(id).and_then(Actor::as_enemy)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.actors
            .iter_mut()
            .find(|actor| actor.id() == id)
            .and_then(Actor::as_enemy_mut)
    }

    pub fn npc(&self, id: EntityId) -> Option<&Npc> {
        self.actor(id).and_then(Actor::as_npc)
    }

    pub fn npc_mut(&mut self, id: EntityId) -> Option<&mut Npc> {
        self.actors
            .iter_mut()
            .find(|actor| actor.id() == id)
            .and_then(Actor::as_npc_mut)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.actors.iter().filter_map(Actor::as_enemy)
    }

    pub fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.actors.iter_mut().filter_map(Actor::as_enemy_mut)
    }

    pub fn npcs(&self) -> impl Iterator<Item = &Npc> {
        self.actors.iter().filter_map(Actor::as_npc)
    }

    pub fn npcs_mut(&mut self) -> impl Iterator<Item = &mut Npc> {
        self.actors.iter_mut().filter_map(Actor::as_npc_mut)
    }

    /// Snapshot of enemy ids in collection order, for per-turn iteration.
    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.enemies().map(|enemy| enemy.id).collect()
    }

    pub fn npc_ids(&self) -> Vec<EntityId> {
        self.npcs().map(|npc| npc.id).collect()
    }

    pub fn has_enemies(&self) -> bool {
        self.enemies().next().is_some()
    }

    /// Appeared actor standing on `position`, if any.
    pub fn actor_at(&self, position: Position, day: u32) -> Option<&Actor> {
        self.actors
            .iter()
            .find(|actor| actor.position() == position && actor.has_appeared(day))
    }

    pub fn remove_actor(&mut self, id: EntityId) -> Option<Actor> {
        let index = self.actors.iter().position(|actor| actor.id() == id)?;
        Some(self.actors.remove(index))
    }

    pub fn item_at(&self, position: Position) -> Option<&Item> {
        self.items.iter().find(|item| item.position == position)
    }

    pub fn take_item_at(&mut self, position: Position) -> Option<Item> {
        let index = self.items.iter().position(|item| item.position == position)?;
        Some(self.items.remove(index))
    }

    /// Whether an item or an actor already claims the cell.
    pub fn is_claimed(&self, position: Position) -> bool {
        self.item_at(position).is_some() || self.actors.iter().any(|a| a.position() == position)
    }
}
