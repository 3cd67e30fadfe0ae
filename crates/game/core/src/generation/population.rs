use tracing::debug;

use crate::config::SimConfig;
use crate::env::{ContentOracle, RandomSource};
use crate::error::SimError;
use crate::state::{Actor, Item, ItemKind, Level, Position};

use super::find_empty_cell;

/// Counts of what was placed on a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PopulationSummary {
    pub enemies: u32,
    pub currency: u32,
    pub consumables: u32,
    pub modules: u32,
}

impl PopulationSummary {
    /// Expected counts for a depth.
    pub fn for_depth(depth: u32) -> Self {
        Self {
            enemies: 3 + 2 * depth,
            currency: 5 + 2 * depth,
            consumables: 2 + depth / 2,
            modules: 1 + depth / 2,
        }
    }
}

/// Stocks a generated level with depth-scaled enemies and items.
///
/// Enemy types come from the content's slot table, so type choice is fixed by
/// slot index and depth; only positions and module kinds are random.
///
/// # Errors
///
/// Returns [`SimError::MissingTemplate`] if the slot table names an enemy
/// template the content does not define.
pub fn populate(
    level: &mut Level,
    reserved: Position,
    content: &dyn ContentOracle,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) -> Result<PopulationSummary, SimError> {
    let depth = level.depth();
    let counts = PopulationSummary::for_depth(depth);
    let table = content.enemy_table();

    for slot in 0..counts.enemies {
        let template_id = table.evaluate(|rule| rule.matches(slot, depth));
        let template = content
            .enemy(template_id)
            .ok_or_else(|| SimError::MissingTemplate(template_id.clone()))?;
        let position = free_cell(level, reserved, config, rng);
        let id = level.allocate_id();
        level.actors.push(Actor::Enemy(template.spawn(id, position, depth)));
    }

    let items = content.item_table();
    let mut kinds = Vec::new();
    kinds.extend((0..counts.currency).map(|_| ItemKind::Currency {
        value: items.currency_value(depth),
    }));
    kinds.extend((0..counts.consumables).map(|_| ItemKind::Consumable {
        heal: items.consumable_heal,
    }));
    let catalog = content.module_catalog();
    let mut modules = 0;
    if !catalog.is_empty() {
        for _ in 0..counts.modules {
            let kind = catalog[rng.below(catalog.len() as u32) as usize];
            kinds.push(ItemKind::Module(kind));
            modules += 1;
        }
    }

    for kind in kinds {
        let position = free_cell(level, reserved, config, rng);
        let id = level.allocate_id();
        level.items.push(Item::new(id, position, kind));
    }

    let summary = PopulationSummary { modules, ..counts };
    debug!(depth, ?summary, "populated level");
    Ok(summary)
}

fn free_cell(
    level: &Level,
    reserved: Position,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) -> Position {
    find_empty_cell(
        &level.grid,
        &level.rooms,
        |cell| cell != reserved && !level.is_claimed(cell),
        config.placement_attempts,
        rng,
    )
}
