use super::{EntityId, Position};

/// Upgrade module types that can be found on generated levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModuleKind {
    /// Adds cloak turns; enemies cannot sight a cloaked player beyond adjacency.
    Cloak,
    /// Arms the one-shot damage multiplier for the next player strike.
    Overclock,
    /// Adds to the pool that absorbs incoming damage before hp.
    Firewall,
    /// Permanent +1 defense.
    Plating,
    /// Stuns nearby enemies on pickup.
    Emp,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 5] = [
        ModuleKind::Cloak,
        ModuleKind::Overclock,
        ModuleKind::Firewall,
        ModuleKind::Plating,
        ModuleKind::Emp,
    ];
}

/// Item payload by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Currency { value: u32 },
    Consumable { heal: u32 },
    Module(ModuleKind),
}

/// Item lying on a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: EntityId,
    pub position: Position,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(id: EntityId, position: Position, kind: ItemKind) -> Self {
        Self { id, position, kind }
    }
}
