//! Content factory for building the registry from data files.

use std::path::{Path, PathBuf};

use tracing::info;
use undercity_core::{SimConfig, TownLayout};

use crate::loaders::{
    ConfigLoader, EnemyCatalog, EnemyLoader, LoadResult, NpcCatalog, NpcLoader, TownLoader,
};
use crate::registry::ContentRegistry;

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── enemies.ron
/// ├── npcs.ron
/// └── town.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load simulation tunables from `config.toml`, or defaults when the file is absent.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(SimConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_enemies(&self) -> LoadResult<EnemyCatalog> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    pub fn load_npcs(&self) -> LoadResult<NpcCatalog> {
        NpcLoader::load(&self.data_dir.join("npcs.ron"))
    }

    pub fn load_town(&self) -> LoadResult<TownLayout> {
        TownLoader::load(&self.data_dir.join("town.ron"))
    }

    /// Loads every catalog and validates the cross references between them.
    pub fn load_registry(&self) -> LoadResult<ContentRegistry> {
        let enemies = self.load_enemies()?;
        let residents = self.load_npcs()?;
        let town = self.load_town()?;

        let registry = ContentRegistry {
            enemies: enemies.templates,
            enemy_table: enemies.table,
            items: enemies.items,
            modules: enemies.modules,
            player: enemies.player,
            npcs: residents.npcs,
            system_npcs: residents.system_npcs,
            town,
        };
        registry.validate().map_err(|e| {
            anyhow::anyhow!("Invalid content in {}: {}", self.data_dir.display(), e)
        })?;
        info!(
            dir = %self.data_dir.display(),
            enemies = registry.enemies.len(),
            npcs = registry.npcs.len(),
            "content loaded"
        );
        Ok(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), SimConfig::default());
    }

    #[test]
    fn missing_catalogs_fail() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert!(factory.load_registry().is_err());
    }
}
