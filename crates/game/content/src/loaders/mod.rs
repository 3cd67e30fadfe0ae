//! Content loaders for reading game data from files.
//!
//! Enemy catalogs, town residents and the town layout are RON; simulation
//! tunables are TOML. Every loader returns [`LoadResult`] so file and parse
//! failures carry the offending path.

pub mod config;
pub mod enemies;
pub mod factory;
pub mod npcs;
pub mod town;

pub use config::ConfigLoader;
pub use enemies::{EnemyCatalog, EnemyLoader};
pub use factory::ContentFactory;
pub use npcs::{NpcCatalog, NpcLoader};
pub use town::TownLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
