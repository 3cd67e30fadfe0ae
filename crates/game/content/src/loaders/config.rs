//! Simulation tunables loader.

use std::path::Path;

use undercity_core::SimConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`SimConfig`] from TOML files.
///
/// Any field left out of the file keeps its default.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML at {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        let config: SimConfig = toml::from_str(content)?;
        if config.idle_min > config.idle_max {
            anyhow::bail!(
                "idle_min ({}) must not exceed idle_max ({})",
                config.idle_min,
                config.idle_max
            );
        }
        if config.max_depth == 0 {
            anyhow::bail!("max_depth must be at least 1");
        }
        Ok(config)
    }
}
