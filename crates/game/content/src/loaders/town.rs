//! Town layout loader.

use std::path::Path;

use undercity_core::TownLayout;
use undercity_core::state::{Grid, ZoneMap};

use crate::loaders::{LoadResult, read_file};

/// Loader for `town.ron`. Tile rows and zone rows are parsed once here so a
/// broken layout is reported at load time rather than at session start.
pub struct TownLoader;

impl TownLoader {
    pub fn load(path: &Path) -> LoadResult<TownLayout> {
        let content = read_file(path)?;
        let town: TownLayout = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse town RON at {}: {}", path.display(), e))?;
        Grid::from_rows(&town.rows)
            .map_err(|e| anyhow::anyhow!("{}: bad tile rows: {}", path.display(), e))?;
        if !town.zones.is_empty() {
            ZoneMap::from_rows(&town.zones)
                .map_err(|e| anyhow::anyhow!("{}: bad zone rows: {}", path.display(), e))?;
        }
        Ok(town)
    }
}
