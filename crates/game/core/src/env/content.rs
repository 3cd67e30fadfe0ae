//! Static templates and the content oracle interface.
//!
//! Templates can be deserialized from RON files (behind the `serde` feature)
//! and spawned into live actors. The [`ContentOracle`] trait lets the content
//! crate provide them by id without the core knowing where they came from.

use crate::npc::DailySchedule;
use crate::rules::{Condition, EnemyTable, RuleList};
use crate::state::{
    Appearance, Behavior, Enemy, EntityId, ModuleKind, Npc, Player, Position, SystemNpc,
    ZoneAnchors,
};

/// Depth-scaled combat stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaledStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    pub appearance: Appearance,
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub behavior: Behavior,
}

impl EnemyTemplate {
    /// Stats at `depth` (1-based).
    ///
    /// hp grows 30% and atk 20% per depth below the first, both floored;
    /// def gains one point every two depths. Integer tenths keep the floor exact.
    pub fn scaled(&self, depth: u32) -> ScaledStats {
        let steps = depth.saturating_sub(1);
        ScaledStats {
            hp: self.hp * (10 + 3 * steps) / 10,
            atk: self.atk * (10 + 2 * steps) / 10,
            def: self.def + steps / 2,
        }
    }

    pub fn spawn(&self, id: EntityId, position: Position, depth: u32) -> Enemy {
        let stats = self.scaled(depth);
        Enemy {
            id,
            position,
            appearance: self.appearance.clone(),
            template: self.id.clone(),
            hp: stats.hp,
            max_hp: stats.hp,
            atk: stats.atk,
            def: stats.def,
            behavior: self.behavior,
            ai: Default::default(),
            alert_target: None,
            alert_timer: 0,
            patrol_target: None,
            stun_turns: 0,
        }
    }
}

/// Item payload tuning for population.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTable {
    pub currency_base: u32,
    pub currency_per_depth: u32,
    pub consumable_heal: u32,
}

impl ItemTable {
    pub fn currency_value(&self, depth: u32) -> u32 {
        self.currency_base + self.currency_per_depth * depth
    }
}

impl Default for ItemTable {
    fn default() -> Self {
        Self {
            currency_base: 10,
            currency_per_depth: 5,
            consumable_heal: 6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerTemplate {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
}

impl PlayerTemplate {
    pub fn spawn(&self, position: Position) -> Player {
        Player::new(position, self.hp, self.atk, self.def)
    }
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        Self {
            hp: 30,
            atk: 5,
            def: 1,
        }
    }
}

/// Persistent town character definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcProfile {
    pub id: String,
    pub appearance: Appearance,
    pub spawn: Position,
    pub anchors: ZoneAnchors,
    pub pace: u32,
    pub wants_talk: bool,
    pub appears_on_day: u32,
    pub schedule: RuleList<Condition, DailySchedule>,
}

impl NpcProfile {
    pub fn builder(id: impl Into<String>) -> NpcProfileBuilder {
        NpcProfileBuilder::new(id)
    }

    pub fn spawn(&self, id: EntityId) -> Npc {
        Npc {
            id,
            position: self.spawn,
            appearance: self.appearance.clone(),
            profile: self.id.clone(),
            anchors: self.anchors,
            pace: self.pace.max(1),
            goal: None,
            goal_position: None,
            wants_talk: self.wants_talk,
            talked_today: false,
            follow_turns: 0,
            idle_turns: 0,
            pace_counter: 0,
            appears_on_day: self.appears_on_day,
        }
    }
}

/// Builder for constructing NPC profiles in code.
pub struct NpcProfileBuilder {
    id: String,
    appearance: Option<Appearance>,
    spawn: Position,
    anchors: ZoneAnchors,
    pace: u32,
    wants_talk: bool,
    appears_on_day: u32,
    schedule: Option<RuleList<Condition, DailySchedule>>,
}

impl NpcProfileBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            appearance: None,
            spawn: Position::ORIGIN,
            anchors: ZoneAnchors::default(),
            pace: 1,
            wants_talk: false,
            appears_on_day: 1,
            schedule: None,
        }
    }

    pub fn appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn spawn(mut self, spawn: Position) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn anchors(mut self, anchors: ZoneAnchors) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn pace(mut self, pace: u32) -> Self {
        self.pace = pace;
        self
    }

    pub fn wants_talk(mut self, wants_talk: bool) -> Self {
        self.wants_talk = wants_talk;
        self
    }

    pub fn appears_on_day(mut self, day: u32) -> Self {
        self.appears_on_day = day;
        self
    }

    pub fn schedule(mut self, schedule: RuleList<Condition, DailySchedule>) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn build(self) -> NpcProfile {
        let appearance = self
            .appearance
            .unwrap_or_else(|| Appearance::new('n', self.id.clone()));
        NpcProfile {
            id: self.id,
            appearance,
            spawn: self.spawn,
            anchors: self.anchors,
            pace: self.pace,
            wants_talk: self.wants_talk,
            appears_on_day: self.appears_on_day,
            schedule: self
                .schedule
                .unwrap_or_else(|| RuleList::new(DailySchedule::default())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemNpcProfile {
    pub id: String,
    pub appearance: Appearance,
    pub position: Position,
    pub service: String,
    pub appears_on_day: u32,
}

impl SystemNpcProfile {
    pub fn spawn(&self, id: EntityId) -> SystemNpc {
        SystemNpc {
            id,
            position: self.position,
            appearance: self.appearance.clone(),
            service: self.service.clone(),
            appears_on_day: self.appears_on_day,
        }
    }
}

/// Town map, zone overlay and fixed points.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TownLayout {
    pub rows: Vec<String>,
    pub zones: Vec<String>,
    pub player_start: Position,
    /// Cells where curfew enforcers appear at night.
    pub curfew_posts: Vec<Position>,
}

/// Template id used for night-time curfew enforcers.
pub const CURFEW_TEMPLATE: &str = "curfew_enforcer";

/// Oracle providing static content by id.
pub trait ContentOracle {
    fn enemy(&self, id: &str) -> Option<&EnemyTemplate>;

    fn enemy_table(&self) -> &EnemyTable;

    fn item_table(&self) -> &ItemTable;

    fn module_catalog(&self) -> &[ModuleKind];

    fn player_template(&self) -> &PlayerTemplate;

    fn npc_profiles(&self) -> &[NpcProfile];

    fn npc_profile(&self, id: &str) -> Option<&NpcProfile> {
        self.npc_profiles().iter().find(|profile| profile.id == id)
    }

    fn system_npcs(&self) -> &[SystemNpcProfile];

    fn town(&self) -> &TownLayout;
}
