//! Ephemeral plain-data events for the presentation layer.
//!
//! Subsystems push into the [`EventLog`] during a turn; the caller drains it
//! once the turn completes. Nothing in the simulation reads events back.

use arrayvec::ArrayVec;

use super::{Direction, EntityId, ItemKind, LevelKind, Position, TimePeriod};

/// Number of particles in a death burst.
pub const BURST_PARTICLES: usize = 8;

/// Who took damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combatant {
    Player,
    Enemy(EntityId),
}

/// One particle of a radial death burst. Angle in radians, speed in cells per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub angle: f32,
    pub speed: f32,
}

/// Feedback signal raised when the player takes hp damage and survives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum DamageFeedback {
    Hurt,
    /// The hit pushed hp below the low-health threshold.
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum AmbientCue {
    Hum,
    Prompt,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    Damage {
        target: Combatant,
        position: Position,
        amount: u32,
    },
    /// Firewall pool soaked up some or all of a hit.
    Absorbed {
        amount: u32,
    },
    DeathBurst {
        position: Position,
        particles: ArrayVec<Particle, BURST_PARTICLES>,
    },
    SoundWave {
        origin: Position,
        radius: u32,
    },
    Shot {
        shooter: EntityId,
        direction: Direction,
        from: Position,
        to: Position,
    },
    Pickup {
        position: Position,
        kind: ItemKind,
    },
    EmpPulse {
        origin: Position,
        stunned: u32,
    },
    TerminalUsed {
        position: Position,
    },
    Talked {
        npc: EntityId,
        profile: String,
    },
    ServiceVisited {
        id: EntityId,
        service: String,
    },
    PlayerFeedback(DamageFeedback),
    PeriodChanged(TimePeriod),
    NewDay(u32),
    Ambient(AmbientCue),
    LevelEntered(LevelKind),
    LevelExited(LevelKind),
    Victory,
    PlayerDied,
}

/// Append-only event buffer drained once per turn.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
