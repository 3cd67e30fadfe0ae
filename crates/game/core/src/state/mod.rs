//! Authoritative simulation state.
//!
//! [`SimState`] replaces any global game object: every subsystem receives the
//! pieces it needs by reference, and the turn engine owns the `&mut` borrow for
//! the duration of a turn. The town level persists for the whole session; a
//! generated level lives inside an [`Expedition`] and is dropped on exit.
mod actor;
mod clock;
mod common;
mod events;
mod grid;
mod item;
mod level;
mod zone;

pub use actor::{
    Actor, ActorRef, AiState, Behavior, Enemy, GoalKind, Npc, Player, PlayerBuffs, SystemNpc,
    ZoneAnchors,
};
pub use clock::{ClockAdvance, TimePeriod, WorldClock};
pub use common::{Appearance, Direction, EntityId, Position};
pub use events::{
    AmbientCue, BURST_PARTICLES, Combatant, DamageFeedback, EventLog, Particle, SimEvent,
};
pub use grid::{Grid, GridParseError, Room, TileKind};
pub use item::{Item, ItemKind, ModuleKind};
pub use level::{ExploredOverlay, Level, LevelId, LevelKind, LightMap, RunTally};
pub use zone::{ZoneCells, ZoneKind, ZoneMap};

use crate::cache::{CacheToken, TokenCache};
use crate::error::SimError;

/// Persistent totals merged from finished expeditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Totals {
    pub currency: u32,
    pub kills: u32,
    pub deepest: u32,
}

impl Totals {
    pub fn merge(&mut self, tally: RunTally) {
        self.currency += tally.currency;
        self.kills += tally.kills;
    }
}

/// A generated level plus where to put the player back in town.
#[derive(Clone, Debug)]
pub struct Expedition {
    pub level: Level,
    pub return_position: Position,
}

/// Mutable view of the active level together with the player and event sink.
pub struct Scene<'a> {
    pub level: &'a mut Level,
    pub player: &'a mut Player,
    pub events: &'a mut EventLog,
    pub clock: &'a WorldClock,
}

/// Cache key for a light computation: origin and depth under a level token.
pub type LightKey = (Position, u32);

/// Memo tables that live for a session and are keyed by [`CacheToken`].
#[derive(Clone, Debug, Default)]
pub struct SessionCaches {
    pub light: TokenCache<LightKey, LightMap>,
    /// Walkable zone cells of the town, computed once per session.
    pub zones: TokenCache<(), ZoneCells>,
}

impl SessionCaches {
    pub fn invalidate(&mut self) {
        self.light.invalidate();
        self.zones.invalidate();
    }
}

#[derive(Clone, Debug)]
pub struct SimState {
    pub player: Player,
    pub clock: WorldClock,
    /// Shared turn counter across every level.
    pub turn: u64,
    pub town: Option<Level>,
    pub expedition: Option<Expedition>,
    pub totals: Totals,
    pub events: EventLog,
    pub victory: bool,
    /// Session version; bumped on restart to invalidate session caches.
    pub version: u32,
    pub caches: SessionCaches,
    next_level_id: u32,
}

impl SimState {
    /// Empty state with no level loaded. A session must be started before turns run.
    pub fn new(player: Player) -> Self {
        Self {
            player,
            clock: WorldClock::default(),
            turn: 0,
            town: None,
            expedition: None,
            totals: Totals::default(),
            events: EventLog::default(),
            victory: false,
            version: 0,
            caches: SessionCaches::default(),
            next_level_id: 1,
        }
    }

    pub fn allocate_level_id(&mut self) -> LevelId {
        let id = LevelId(self.next_level_id);
        self.next_level_id += 1;
        id
    }

    pub fn in_expedition(&self) -> bool {
        self.expedition.is_some()
    }

    /// The generated level when on an expedition, otherwise the town.
    pub fn active_level(&self) -> Result<&Level, SimError> {
        match &self.expedition {
            Some(expedition) => Ok(&expedition.level),
            None => self.town.as_ref().ok_or(SimError::NoActiveLevel),
        }
    }

    pub fn active_level_mut(&mut self) -> Result<&mut Level, SimError> {
        match &mut self.expedition {
            Some(expedition) => Ok(&mut expedition.level),
            None => self.town.as_mut().ok_or(SimError::NoActiveLevel),
        }
    }

    /// Splits the state into disjoint borrows of the active level and its companions.
    pub fn scene(&mut self) -> Result<Scene<'_>, SimError> {
        let level = match &mut self.expedition {
            Some(expedition) => &mut expedition.level,
            None => self.town.as_mut().ok_or(SimError::NoActiveLevel)?,
        };
        Ok(Scene {
            level,
            player: &mut self.player,
            events: &mut self.events,
            clock: &self.clock,
        })
    }

    /// Like [`SimState::scene`], also lending out the session caches.
    pub fn scene_and_caches(&mut self) -> Result<(Scene<'_>, &mut SessionCaches), SimError> {
        let level = match &mut self.expedition {
            Some(expedition) => &mut expedition.level,
            None => self.town.as_mut().ok_or(SimError::NoActiveLevel)?,
        };
        let scene = Scene {
            level,
            player: &mut self.player,
            events: &mut self.events,
            clock: &self.clock,
        };
        Ok((scene, &mut self.caches))
    }

    pub fn cache_token(&self) -> Result<CacheToken, SimError> {
        Ok(CacheToken::new(self.active_level()?.id, self.version))
    }

    /// Every actor on the active level plus the player, for presentation.
    pub fn actor_refs(&self) -> Result<Vec<ActorRef<'_>>, SimError> {
        let level = self.active_level()?;
        let day = self.clock.day();
        let mut refs = vec![ActorRef::Player(&self.player)];
        refs.extend(
            level
                .actors
                .iter()
                .filter(|actor| actor.has_appeared(day))
                .map(ActorRef::from),
        );
        Ok(refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_level_is_a_sequencing_error() {
        let mut state = SimState::new(Player::new(Position::ORIGIN, 20, 4, 1));
        assert!(matches!(state.active_level(), Err(SimError::NoActiveLevel)));
        assert!(state.scene().is_err());
    }

    #[test]
    fn expedition_shadows_town() {
        let mut state = SimState::new(Player::new(Position::ORIGIN, 20, 4, 1));
        let town_id = state.allocate_level_id();
        let grid = Grid::filled(3, 3, TileKind::Floor);
        state.town = Some(Level::new(town_id, LevelKind::Town, grid.clone(), vec![], Position::ORIGIN));
        assert_eq!(state.active_level().unwrap().id, town_id);

        let depth_id = state.allocate_level_id();
        state.expedition = Some(Expedition {
            level: Level::new(depth_id, LevelKind::Depth(1), grid, vec![], Position::ORIGIN),
            return_position: Position::new(1, 1),
        });
        assert_eq!(state.active_level().unwrap().id, depth_id);
        assert_ne!(town_id, depth_id);
    }
}
