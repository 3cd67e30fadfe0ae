//! Undercity headless runner binary.
//!
//! Plays a scripted session against the simulation core and logs a summary.
//!
//! # Examples
//!
//! ```bash
//! UNDERCITY_SEED=7 UNDERCITY_TURNS=2000 cargo run -p undercity-sim
//! UNDERCITY_DATA_DIR=data RUST_LOG=undercity_core=debug cargo run -p undercity-sim
//! ```

use anyhow::Result;
use undercity_sim::{Runner, RunnerConfig};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunnerConfig::from_env();
    tracing::info!("Starting undercity runner");
    tracing::info!("Data dir: {:?}", config.data_dir);
    tracing::info!("Seed: {:?}", config.seed);

    let mut runner = Runner::new(config)?;
    let summary = runner.run()?;

    tracing::info!(
        turns = summary.turns,
        expeditions = summary.expeditions,
        deaths = summary.deaths,
        deepest = summary.totals.deepest,
        currency = summary.totals.currency,
        kills = summary.totals.kills,
        victory = summary.victory,
        "run complete"
    );
    Ok(())
}
