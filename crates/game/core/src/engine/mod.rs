//! Turn orchestration and session transitions.
//!
//! The [`TurnEngine`] is the only writer of [`SimState`] between turns. It
//! borrows the state for its lifetime and sequences one discrete turn across
//! every subsystem, in a fixed order that never skips a step:
//!
//! 1. resolve the player intent (bump-to-attack, bump-to-talk, move, pickup)
//! 2. trigger the tile the player landed on (stairs, terminals)
//! 3. advance counters, the town clock and buff countdowns
//! 4. recompute visibility around the player
//! 5. run enemy AI, then the NPC scheduler in town
//! 6. emit ambient cues
//!
//! Session operations (start, enter/exit a depth, restart) live in
//! [`session`](self::session) on the same type.
mod session;
mod turns;

pub use session::build_town;

use crate::cache::CacheToken;
use crate::config::SimConfig;
use crate::state::{Direction, Level, LevelKind, SessionCaches, SimEvent, SimState, ZoneCells};

/// One player command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Step, attacking or talking to whatever stands in the way.
    Move(Direction),
    Wait,
    /// Act on the adjacent cell without moving.
    Interact(Direction),
}

/// What happened during one turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    pub turn: u64,
    /// Level active at the end of the turn.
    pub level: LevelKind,
    pub events: Vec<SimEvent>,
    pub exited_level: bool,
    pub player_alive: bool,
    pub victory: bool,
}

/// Turn engine borrowing the authoritative state.
pub struct TurnEngine<'a> {
    state: &'a mut SimState,
    config: &'a SimConfig,
}

impl<'a> TurnEngine<'a> {
    pub fn new(state: &'a mut SimState, config: &'a SimConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &SimState {
        self.state
    }

    pub fn config(&self) -> &SimConfig {
        self.config
    }
}

/// Walkable town zone cells, computed once per token.
fn zone_cells<'c>(caches: &'c mut SessionCaches, level: &Level, token: CacheToken) -> &'c ZoneCells {
    caches
        .zones
        .get_or_insert_with(token, (), || level.zones.walkable_cells(&level.grid))
}
