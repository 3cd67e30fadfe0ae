use crate::state::Behavior;

/// Simulation tunables. Every field has a default; content data may override any subset.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    // ===== generation =====
    pub level_width: u32,
    pub level_height: u32,
    /// Deepest generated level; clearing it wins the run.
    pub max_depth: u32,
    /// Random placement tries before the deterministic scan.
    pub placement_attempts: u32,

    // ===== visibility =====
    pub light_radius: u32,

    // ===== enemy AI =====
    pub tracker_sight: u32,
    pub sentinel_sight: u32,
    pub default_sight: u32,
    pub alert_ticks: u32,
    pub sound_radius: u32,
    pub sentinel_range: u32,
    pub flank_distance: u32,

    // ===== npc scheduling =====
    pub talk_radius: u32,
    pub follow_limit: u32,
    pub idle_min: u32,
    pub idle_max: u32,
    pub wander_radius: u32,
    pub minutes_per_turn: u32,

    // ===== combat and buffs =====
    pub cloak_turns: u32,
    pub firewall_pool: u32,
    pub overclock_multiplier: u32,
    pub emp_radius: u32,
    pub emp_stun_turns: u32,
    /// Hp percentage under which a hit is reported as critical.
    pub low_hp_percent: u32,

    // ===== ambient cadence =====
    pub hum_interval: u64,
    pub prompt_interval: u64,
}

impl SimConfig {
    pub const DEFAULT_LEVEL_WIDTH: u32 = 60;
    pub const DEFAULT_LEVEL_HEIGHT: u32 = 30;
    pub const DEFAULT_MAX_DEPTH: u32 = 5;
    pub const DEFAULT_LIGHT_RADIUS: u32 = 8;
    pub const DEFAULT_ALERT_TICKS: u32 = 8;

    pub fn new() -> Self {
        Self {
            level_width: Self::DEFAULT_LEVEL_WIDTH,
            level_height: Self::DEFAULT_LEVEL_HEIGHT,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            placement_attempts: 200,
            light_radius: Self::DEFAULT_LIGHT_RADIUS,
            tracker_sight: 20,
            sentinel_sight: 6,
            default_sight: 8,
            alert_ticks: Self::DEFAULT_ALERT_TICKS,
            sound_radius: 8,
            sentinel_range: 6,
            flank_distance: 4,
            talk_radius: 8,
            follow_limit: 3,
            idle_min: 2,
            idle_max: 6,
            wander_radius: 6,
            minutes_per_turn: 5,
            cloak_turns: 10,
            firewall_pool: 10,
            overclock_multiplier: 3,
            emp_radius: 3,
            emp_stun_turns: 3,
            low_hp_percent: 30,
            hum_interval: 15,
            prompt_interval: 40,
        }
    }

    pub fn sight_range(&self, behavior: Behavior) -> u32 {
        match behavior {
            Behavior::Tracker => self.tracker_sight,
            Behavior::Sentinel => self.sentinel_sight,
            Behavior::Chaser | Behavior::Curfew => self.default_sight,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
