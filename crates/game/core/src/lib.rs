//! Deterministic turn-based simulation core for the undercity.
//!
//! `undercity-core` owns the rules: level generation and population,
//! shadowcast visibility, pathfinding, collision, enemy AI, combat, the town
//! NPC scheduler and the turn orchestrator. It performs no I/O. Content,
//! narrative memory, player-death handling and randomness are injected through
//! the oracle traits in [`env`], and every state change flows through
//! [`engine::TurnEngine`].
pub mod ai;
pub mod cache;
pub mod collision;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod generation;
pub mod npc;
pub mod pathfinding;
pub mod rules;
pub mod state;
pub mod visibility;

#[cfg(test)]
mod fixtures;

pub use cache::{CacheToken, TokenCache};
pub use config::SimConfig;
pub use engine::{Intent, TurnEngine, TurnReport, build_town};
pub use env::{
    CURFEW_TEMPLATE, ContentOracle, DeathLog, EnemyTemplate, ItemTable, NarrativeMemory,
    NarrativeOracle, NarrativeValue, NpcProfile, PlayerDeathHandler, PlayerTemplate,
    RandomSource, ScriptedRng, SimEnv, SimRng, SystemNpcProfile, TownLayout,
};
pub use error::{ErrorSeverity, GameError, SimError};
pub use npc::DailySchedule;
pub use rules::{Condition, EnemyTable, Rule, RuleList, SlotRule};
pub use state::{
    Actor, Direction, EntityId, Level, LevelKind, Player, Position, SimEvent, SimState,
    TimePeriod, Totals, WorldClock,
};
