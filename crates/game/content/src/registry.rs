//! In-memory content catalog implementing the core's content oracle.

use std::collections::HashSet;

use tracing::debug;
use undercity_core::state::{Grid, ModuleKind, Position};
use undercity_core::{
    CURFEW_TEMPLATE, ContentOracle, EnemyTable, EnemyTemplate, ItemTable, NpcProfile,
    PlayerTemplate, SystemNpcProfile, TownLayout,
};

use crate::builtin;
use crate::error::ContentError;

/// Every template the simulation can ask for.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentRegistry {
    pub enemies: Vec<EnemyTemplate>,
    pub enemy_table: EnemyTable,
    pub items: ItemTable,
    pub modules: Vec<ModuleKind>,
    pub player: PlayerTemplate,
    pub npcs: Vec<NpcProfile>,
    pub system_npcs: Vec<SystemNpcProfile>,
    pub town: TownLayout,
}

impl ContentRegistry {
    /// Catalog compiled into the crate: four enemy templates, a small town with
    /// a zone overlay, three residents and a quartermaster.
    pub fn builtin() -> Self {
        builtin::registry()
    }

    /// Checks cross references the simulation relies on.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in this order: duplicate ids, enemy
    /// table entries naming unknown templates, a missing curfew template, an
    /// unparsable town, and fixed town points that are not walkable.
    pub fn validate(&self) -> Result<(), ContentError> {
        unique("enemy", self.enemies.iter().map(|t| t.id.as_str()))?;
        unique("npc", self.npcs.iter().map(|p| p.id.as_str()))?;
        unique("system npc", self.system_npcs.iter().map(|p| p.id.as_str()))?;

        let table = &self.enemy_table;
        let referenced = table
            .rules()
            .iter()
            .map(|rule| &rule.then)
            .chain(std::iter::once(table.fallback()));
        for id in referenced {
            if self.enemy(id).is_none() {
                return Err(ContentError::UnknownTemplate(id.clone()));
            }
        }
        if self.enemy(CURFEW_TEMPLATE).is_none() {
            return Err(ContentError::MissingCurfewTemplate(CURFEW_TEMPLATE));
        }

        let grid = Grid::from_rows(&self.town.rows)?;
        let walkable = |what: String, position: Position| {
            if grid.is_walkable(position) {
                Ok(())
            } else {
                Err(ContentError::BlockedTownCell { what, position })
            }
        };
        walkable("player start".into(), self.town.player_start)?;
        for post in &self.town.curfew_posts {
            walkable("curfew post".into(), *post)?;
        }
        for npc in &self.npcs {
            walkable(format!("npc `{}` spawn", npc.id), npc.spawn)?;
        }
        for system in &self.system_npcs {
            walkable(format!("system npc `{}`", system.id), system.position)?;
        }

        debug!(
            enemies = self.enemies.len(),
            npcs = self.npcs.len(),
            system_npcs = self.system_npcs.len(),
            "content validated"
        );
        Ok(())
    }
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

impl ContentOracle for ContentRegistry {
    fn enemy(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.iter().find(|template| template.id == id)
    }

    fn enemy_table(&self) -> &EnemyTable {
        &self.enemy_table
    }

    fn item_table(&self) -> &ItemTable {
        &self.items
    }

    fn module_catalog(&self) -> &[ModuleKind] {
        &self.modules
    }

    fn player_template(&self) -> &PlayerTemplate {
        &self.player
    }

    fn npc_profiles(&self) -> &[NpcProfile] {
        &self.npcs
    }

    fn system_npcs(&self) -> &[SystemNpcProfile] {
        &self.system_npcs
    }

    fn town(&self) -> &TownLayout {
        &self.town
    }
}
