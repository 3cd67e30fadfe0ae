//! Headless runner for the undercity simulation.
//!
//! # Architecture
//!
//! ```text
//! Runner
//!   ├─→ RunnerConfig   (environment: data dir, seed, turn budget)
//!   ├─→ ContentRegistry (built-in or loaded from RON/TOML)
//!   ├─→ TurnEngine      (one borrow per turn over SimState)
//!   └─→ autopilot       (scripted player intents)
//! ```

pub mod autopilot;
pub mod config;
pub mod runner;

pub use config::RunnerConfig;
pub use runner::{Evacuation, RunSummary, Runner};
