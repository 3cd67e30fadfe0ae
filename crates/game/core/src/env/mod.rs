//! Traits describing the simulation's external collaborators.
//!
//! Content, narrative state, player death and randomness are all supplied
//! from outside. The [`SimEnv`] aggregate bundles them so the engine can reach
//! everything it needs without hard coupling to concrete implementations.
mod content;
mod death;
mod narrative;
mod rng;

pub use content::{
    CURFEW_TEMPLATE, ContentOracle, EnemyTemplate, ItemTable, NpcProfile, NpcProfileBuilder,
    PlayerTemplate, ScaledStats, SystemNpcProfile, TownLayout,
};
pub use death::{DeathLog, PlayerDeathHandler};
pub use narrative::{
    NarrativeMemory, NarrativeOracle, NarrativeValue, Notification, NotificationKind,
};
pub use rng::{RandomSource, ScriptedRng, SimRng};

/// Collaborators threaded through every turn.
pub struct SimEnv<'a> {
    pub content: &'a dyn ContentOracle,
    pub narrative: &'a mut dyn NarrativeOracle,
    pub death: &'a mut dyn PlayerDeathHandler,
    pub rng: &'a mut dyn RandomSource,
}

impl<'a> SimEnv<'a> {
    pub fn new(
        content: &'a dyn ContentOracle,
        narrative: &'a mut dyn NarrativeOracle,
        death: &'a mut dyn PlayerDeathHandler,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            content,
            narrative,
            death,
            rng,
        }
    }
}
