//! Runner configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Headless runner settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Directory holding `config.toml` and the RON catalogs. `None` uses the
    /// built-in catalog and default tunables.
    pub data_dir: Option<PathBuf>,
    /// Seed for the single random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Turn budget for the whole run.
    pub turns: u32,
    /// Town turns spent between expeditions.
    pub town_turns: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed: None,
            turns: 500,
            town_turns: 12,
        }
    }
}

impl RunnerConfig {
    /// Construct runner configuration from environment variables.
    ///
    /// Environment variables:
    /// - `UNDERCITY_DATA_DIR` - Content directory (default: built-in catalog)
    /// - `UNDERCITY_SEED` - Random seed (default: entropy)
    /// - `UNDERCITY_TURNS` - Turn budget (default: 500)
    /// - `UNDERCITY_TOWN_TURNS` - Turns spent in town between expeditions (default: 12)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("UNDERCITY_DATA_DIR")
            && !dir.is_empty()
        {
            config.data_dir = Some(PathBuf::from(dir));
        }
        config.seed = read_env::<u64>("UNDERCITY_SEED");
        if let Some(turns) = read_env::<u32>("UNDERCITY_TURNS") {
            config.turns = turns;
        }
        if let Some(town_turns) = read_env::<u32>("UNDERCITY_TOWN_TURNS") {
            config.town_turns = town_turns.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
