//! Enemy catalog loader.

use std::path::Path;

use serde::Deserialize;
use undercity_core::rules::default_enemy_table;
use undercity_core::state::ModuleKind;
use undercity_core::{EnemyTable, EnemyTemplate, ItemTable, PlayerTemplate};

use crate::loaders::{LoadResult, read_file};

/// Contents of `enemies.ron`.
///
/// Only `templates` is required. The slot table, item tuning, module pool
/// and player template fall back to the built-in values.
///
/// ```ron
/// (
///     templates: [
///         (id: "drone", appearance: (glyph: 'd', name: "drone"),
///          hp: 8, atk: 3, def: 0, behavior: Chaser),
///     ],
///     table: (
///         rules: [(when: (min_depth: 2, modulus: 3, remainder: 1), then: "sentinel")],
///         fallback: "drone",
///     ),
/// )
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct EnemyCatalog {
    pub templates: Vec<EnemyTemplate>,
    #[serde(default = "default_enemy_table")]
    pub table: EnemyTable,
    #[serde(default)]
    pub items: ItemTable,
    #[serde(default = "all_modules")]
    pub modules: Vec<ModuleKind>,
    #[serde(default)]
    pub player: PlayerTemplate,
}

fn all_modules() -> Vec<ModuleKind> {
    ModuleKind::ALL.to_vec()
}

/// Loader for enemy templates and population tables from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<EnemyCatalog> {
        let content = read_file(path)?;
        let catalog: EnemyCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy RON at {}: {}", path.display(), e))?;
        if catalog.modules.is_empty() {
            anyhow::bail!("{}: module pool must not be empty", path.display());
        }
        Ok(catalog)
    }
}
