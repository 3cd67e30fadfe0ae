//! Headless session driver.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use undercity_content::{ContentFactory, ContentRegistry};
use undercity_core::state::LevelKind;
use undercity_core::{
    GameError, NarrativeMemory, Player, PlayerDeathHandler, SimConfig, SimEnv, SimError, SimRng,
    SimState, Totals, TurnEngine, TurnReport,
};

use crate::autopilot::next_intent;
use crate::config::RunnerConfig;

/// Patches the player up and asks the runner to pull them out of the level.
#[derive(Debug, Default)]
pub struct Evacuation {
    pub deaths: u32,
    pending: bool,
}

impl PlayerDeathHandler for Evacuation {
    fn on_player_death(&mut self, player: &mut Player, level: LevelKind) {
        self.deaths += 1;
        self.pending = true;
        player.hp = player.max_hp;
        warn!(%level, deaths = self.deaths, "player went down, evacuating");
    }
}

/// Outcome of a headless run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub turns: u32,
    pub expeditions: u32,
    pub deaths: u32,
    pub totals: Totals,
    pub victory: bool,
}

/// Owns everything a session needs and drives it with the autopilot.
pub struct Runner {
    state: SimState,
    sim_config: SimConfig,
    content: ContentRegistry,
    narrative: NarrativeMemory,
    evacuation: Evacuation,
    rng: SimRng,
    config: RunnerConfig,
}

impl Runner {
    /// Loads content from `config.data_dir`, or uses the built-in catalog.
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let (sim_config, content) = match &config.data_dir {
            Some(dir) => {
                let factory = ContentFactory::new(dir);
                let sim_config = factory.load_config()?;
                let content = factory
                    .load_registry()
                    .with_context(|| format!("loading content from {}", dir.display()))?;
                (sim_config, content)
            }
            None => {
                info!("no data directory configured, using built-in content");
                (SimConfig::default(), ContentRegistry::builtin())
            }
        };
        let rng = match config.seed {
            Some(seed) => SimRng::seeded(seed),
            None => SimRng::from_entropy(),
        };
        let player = content.player.spawn(content.town.player_start);

        Ok(Self {
            state: SimState::new(player),
            sim_config,
            content,
            narrative: NarrativeMemory::default(),
            evacuation: Evacuation::default(),
            rng,
            config,
        })
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Runs until the turn budget is spent or the deepest level is cleared.
    pub fn run(&mut self) -> Result<RunSummary> {
        self.with_engine(|engine, env| engine.new_session(env))
            .map_err(describe)?;

        let mut depth = 1;
        let mut town_turns = 0;
        let mut expeditions = 0;
        let mut turns = 0;
        while turns < self.config.turns {
            if !self.state.in_expedition() && town_turns >= self.config.town_turns {
                let max_depth = self.sim_config.max_depth;
                self.with_engine(|engine, env| engine.enter_level(depth, env))
                    .map_err(describe)?;
                expeditions += 1;
                town_turns = 0;
                info!(depth, max_depth, "expedition started");
            }

            let intent = next_intent(&self.state);
            let report = self
                .with_engine(|engine, env| engine.run_turn(intent, env))
                .map_err(describe)?;
            turns += 1;
            self.log_turn(&report);

            if report.victory {
                break;
            }
            if report.exited_level {
                depth = (depth + 1).min(self.sim_config.max_depth);
            }
            if self.evacuation.pending {
                self.evacuation.pending = false;
                if self.state.in_expedition() {
                    self.with_engine(|engine, _| engine.exit_level())
                        .map_err(describe)?;
                }
            }
            if !self.state.in_expedition() {
                town_turns += 1;
            }
        }

        Ok(RunSummary {
            turns,
            expeditions,
            deaths: self.evacuation.deaths,
            totals: self.state.totals,
            victory: self.state.victory,
        })
    }

    fn with_engine<T>(&mut self, f: impl FnOnce(&mut TurnEngine<'_>, &mut SimEnv<'_>) -> T) -> T {
        let mut env = SimEnv::new(
            &self.content,
            &mut self.narrative,
            &mut self.evacuation,
            &mut self.rng,
        );
        let mut engine = TurnEngine::new(&mut self.state, &self.sim_config);
        f(&mut engine, &mut env)
    }

    fn log_turn(&self, report: &TurnReport) {
        debug!(
            turn = report.turn,
            level = %report.level,
            events = report.events.len(),
            hp = self.state.player.hp,
            "turn"
        );
        if report.exited_level {
            info!(totals = ?self.state.totals, "back in town");
        }
    }
}

fn describe(error: SimError) -> anyhow::Error {
    anyhow::anyhow!("{} [{}] ({})", error, error.error_code(), error.severity().as_str())
}
