//! Data-driven content for the undercity simulation.
//!
//! This crate provides the [`ContentRegistry`] that implements the core's
//! content oracle, either from the built-in catalog or from data files:
//! - Enemy templates, slot table and item tuning (RON)
//! - Town residents and service characters (RON)
//! - Town layout with its zone overlay (RON)
//! - Simulation tunables (TOML)
//!
//! Content is consumed through the oracle and never appears in simulation state.

mod builtin;
pub mod error;
pub mod registry;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use error::ContentError;
pub use registry::ContentRegistry;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EnemyCatalog, EnemyLoader, NpcCatalog, NpcLoader, TownLoader,
};
