//! Actor variants.
//!
//! Level entity collections store [`Actor`] values; the player persists across
//! levels and lives on [`crate::state::SimState`] instead. [`ActorRef`] joins
//! both into the closed four-way view the presentation layer matches on.

use super::{Appearance, EntityId, Position, ZoneKind};

// ============================================================================
// Player
// ============================================================================

/// Short-lived player buffs, each bounded by its own countdown or one-shot use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PlayerBuffs {
    pub cloak_turns: u32,
    /// One-shot damage multiplier, consumed by the next player strike.
    pub overclock: bool,
    pub firewall_hp: u32,
}

impl PlayerBuffs {
    pub const fn is_cloaked(&self) -> bool {
        self.cloak_turns > 0
    }

    /// Countdown applied once per turn.
    pub fn tick(&mut self) {
        self.cloak_turns = self.cloak_turns.saturating_sub(1);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub position: Position,
    pub appearance: Appearance,
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub buffs: PlayerBuffs,
}

impl Player {
    pub fn new(position: Position, hp: u32, atk: u32, def: u32) -> Self {
        Self {
            position,
            appearance: Appearance::new('@', "you"),
            hp,
            max_hp: hp,
            atk,
            def,
            buffs: PlayerBuffs::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }
}

// ============================================================================
// Enemy
// ============================================================================

/// Enemy archetype selecting which actions are available per AI state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Behavior {
    Chaser,
    Sentinel,
    Tracker,
    /// Scripted town enforcer that bypasses the state machine.
    Curfew,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiState {
    #[default]
    Patrol,
    Alert,
    Hunting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Position,
    pub appearance: Appearance,
    /// Content template this enemy was spawned from.
    pub template: String,
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub behavior: Behavior,
    pub ai: AiState,
    pub alert_target: Option<Position>,
    pub alert_timer: u32,
    pub patrol_target: Option<Position>,
    pub stun_turns: u32,
}

impl Enemy {
    pub fn is_stunned(&self) -> bool {
        self.stun_turns > 0
    }

    /// Puts a non-hunting enemy on alert towards `target`.
    ///
    /// Returns false (and leaves the enemy untouched) when it is already hunting.
    pub fn hear(&mut self, target: Position, timer: u32) -> bool {
        if self.ai == AiState::Hunting {
            return false;
        }
        self.ai = AiState::Alert;
        self.alert_target = Some(target);
        self.alert_timer = timer;
        true
    }
}

// ============================================================================
// NPCs
// ============================================================================

/// Goal an NPC is walking towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GoalKind {
    Home,
    Cafe,
    Terminal,
    Garden,
    Wander,
    /// Talk override tracking the player's live position. Never scheduled.
    Player,
}

impl GoalKind {
    pub const fn zone(self) -> Option<ZoneKind> {
        match self {
            GoalKind::Home => Some(ZoneKind::Home),
            GoalKind::Cafe => Some(ZoneKind::Cafe),
            GoalKind::Terminal => Some(ZoneKind::Terminal),
            GoalKind::Garden => Some(ZoneKind::Garden),
            GoalKind::Wander | GoalKind::Player => None,
        }
    }
}

/// Per-NPC reference points used when a zone has no walkable cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneAnchors {
    pub home: Position,
    pub cafe: Position,
    pub terminal: Position,
    pub garden: Position,
}

impl ZoneAnchors {
    pub const fn anchor(&self, zone: ZoneKind) -> Position {
        match zone {
            ZoneKind::Home => self.home,
            ZoneKind::Cafe => self.cafe,
            ZoneKind::Terminal => self.terminal,
            ZoneKind::Garden => self.garden,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Npc {
    pub id: EntityId,
    pub position: Position,
    pub appearance: Appearance,
    /// Content profile id; also the key for narrative milestones.
    pub profile: String,
    pub anchors: ZoneAnchors,
    /// Ticks per action while following the schedule.
    pub pace: u32,
    pub goal: Option<GoalKind>,
    pub goal_position: Option<Position>,
    pub wants_talk: bool,
    pub talked_today: bool,
    pub follow_turns: u32,
    pub idle_turns: u32,
    pub pace_counter: u32,
    /// First day the NPC exists in the world.
    pub appears_on_day: u32,
}

impl Npc {
    pub fn is_pursuing_player(&self) -> bool {
        self.goal == Some(GoalKind::Player)
    }
}

/// Stationary service character (vendor, clerk).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemNpc {
    pub id: EntityId,
    pub position: Position,
    pub appearance: Appearance,
    pub service: String,
    pub appears_on_day: u32,
}

// ============================================================================
// Tagged variants
// ============================================================================

/// Entity stored in a level's actor collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    Enemy(Enemy),
    Npc(Npc),
    SystemNpc(SystemNpc),
}

impl Actor {
    pub fn id(&self) -> EntityId {
        match self {
            Actor::Enemy(enemy) => enemy.id,
            Actor::Npc(npc) => npc.id,
            Actor::SystemNpc(system) => system.id,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Actor::Enemy(enemy) => enemy.position,
            Actor::Npc(npc) => npc.position,
            Actor::SystemNpc(system) => system.position,
        }
    }

    pub fn appearance(&self) -> &Appearance {
        match self {
            Actor::Enemy(enemy) => &enemy.appearance,
            Actor::Npc(npc) => &npc.appearance,
            Actor::SystemNpc(system) => &system.appearance,
        }
    }

    /// Day-gated characters do not exist (or block) before their first day.
    pub fn has_appeared(&self, day: u32) -> bool {
        match self {
            Actor::Enemy(_) => true,
            Actor::Npc(npc) => day >= npc.appears_on_day,
            Actor::SystemNpc(system) => day >= system.appears_on_day,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Actor::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match self {
            Actor::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn as_npc(&self) -> Option<&Npc> {
        match self {
            Actor::Npc(npc) => Some(npc),
            _ => None,
        }
    }

    pub fn as_npc_mut(&mut self) -> Option<&mut Npc> {
        match self {
            Actor::Npc(npc) => Some(npc),
            _ => None,
        }
    }
}

/// Closed view over every actor kind, player included.
#[derive(Clone, Copy, Debug)]
pub enum ActorRef<'a> {
    Player(&'a Player),
    Enemy(&'a Enemy),
    Npc(&'a Npc),
    SystemNpc(&'a SystemNpc),
}

impl<'a> ActorRef<'a> {
    pub fn position(&self) -> Position {
        match self {
            ActorRef::Player(player) => player.position,
            ActorRef::Enemy(enemy) => enemy.position,
            ActorRef::Npc(npc) => npc.position,
            ActorRef::SystemNpc(system) => system.position,
        }
    }

    pub fn appearance(&self) -> &'a Appearance {
        match self {
            ActorRef::Player(player) => &player.appearance,
            ActorRef::Enemy(enemy) => &enemy.appearance,
            ActorRef::Npc(npc) => &npc.appearance,
            ActorRef::SystemNpc(system) => &system.appearance,
        }
    }
}

impl<'a> From<&'a Actor> for ActorRef<'a> {
    fn from(actor: &'a Actor) -> Self {
        match actor {
            Actor::Enemy(enemy) => ActorRef::Enemy(enemy),
            Actor::Npc(npc) => ActorRef::Npc(npc),
            Actor::SystemNpc(system) => ActorRef::SystemNpc(system),
        }
    }
}
